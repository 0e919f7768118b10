//! Shared file reading for both collection modes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::error::CoreError;

/// Reads a file as UTF-8, falling back to a lossy conversion for files with
/// invalid byte sequences so that a stray non-UTF-8 byte does not lose the
/// rest of the file.
pub fn read_file_content(path: &Path) -> Result<String, CoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(err) if err.kind() == ErrorKind::InvalidData => {
            let bytes = fs::read(path).map_err(|e| CoreError::Io(e, path.to_path_buf()))?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        Err(err) => Err(CoreError::Io(err, path.to_path_buf())),
    }
}

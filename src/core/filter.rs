//! Pure predicate logic deciding whether a scanned entry is kept.

use std::path::Path;

use super::ScanRequest;

/// Decides whether an entry survives the request's filters.
///
/// Rules are applied in order and short-circuit on the first rejection:
/// exclusion substrings, hidden base name, then (files only) extension
/// suffix and file-name pattern. Directories are only subject to the first
/// two rules; rejecting a directory prunes its entire subtree, so the
/// walkers must not descend into it.
pub fn should_include(path: &Path, is_dir: bool, request: &ScanRequest) -> bool {
    if is_excluded(path, &request.exclusions) {
        return false;
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    if request.ignore_hidden && name.starts_with('.') {
        return false;
    }

    if is_dir {
        return true;
    }

    if !request.extensions.is_empty() && !matches_extension(&name, &request.extensions) {
        return false;
    }

    if let Some(pattern) = &request.name_pattern {
        if !pattern.is_match(&name) {
            return false;
        }
    }

    true
}

/// The exclusion rule on its own: true when any non-empty exclusion string
/// occurs anywhere in the path. The Flat Collector's counting pre-pass
/// prunes with this rule alone.
pub fn is_excluded(path: &Path, exclusions: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    exclusions
        .iter()
        .any(|needle| !needle.is_empty() && path_str.contains(needle.as_str()))
}

/// Suffix match against `.{ext}`; a leading dot on the configured extension
/// is tolerated so `"py"` and `".py"` behave the same.
fn matches_extension(name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        let ext = ext.trim_start_matches('.');
        !ext.is_empty() && name.ends_with(&format!(".{ext}"))
    })
}

//! Synchronous, single-root recursive scan producing a hierarchical result.

use std::fs;
use std::path::Path;

use super::error::CoreError;
use super::file_handler::read_file_content;
use super::filter::should_include;
use super::minify::minify_source;
use super::{ScanRequest, TreeNode};

/// Walks one directory tree depth-first and returns it as a forest of
/// [`TreeNode`]s.
///
/// This scanner blocks the caller for the whole traversal; the concurrent
/// multi-root variant lives in [`super::FlatCollector`].
pub struct TreeScanner;

impl TreeScanner {
    /// Scans `root` under the request's filters.
    ///
    /// Children are sorted by file name so a tree is reproducible across
    /// runs. An unreadable directory is dropped together with its subtree;
    /// an unreadable file is dropped alone. Neither aborts the scan.
    /// Symlinks are never followed, which also rules out cycles.
    pub fn scan(root: &Path, request: &ScanRequest) -> Result<Vec<TreeNode>, CoreError> {
        if !root.is_dir() {
            return Err(CoreError::NotADirectory(root.to_path_buf()));
        }
        let forest = Self::scan_dir(root, root, request);
        tracing::info!(root = %root.display(), nodes = forest.len(), "tree scan finished");
        Ok(forest)
    }

    fn scan_dir(dir: &Path, root: &Path, request: &ScanRequest) -> Vec<TreeNode> {
        let mut nodes = Vec::new();

        let reader = match fs::read_dir(dir) {
            Ok(reader) => reader,
            Err(err) => {
                // Inaccessible subtree is simply absent from the result.
                tracing::warn!(path = %dir.display(), %err, "skipping unreadable directory");
                return nodes;
            }
        };

        let mut entries: Vec<fs::DirEntry> = reader.filter_map(Result::ok).collect();
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(_) => continue,
            };
            if file_type.is_symlink() {
                continue;
            }
            if !should_include(&path, file_type.is_dir(), request) {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_string_lossy()
                .into_owned();

            if file_type.is_dir() {
                let contents = Self::scan_dir(&path, root, request);
                nodes.push(TreeNode::Folder {
                    name,
                    path: relative,
                    contents,
                });
            } else {
                let filecontent = if request.include_content {
                    match read_file_content(&path) {
                        Ok(content) if request.minify => Some(minify_source(&content)),
                        Ok(content) => Some(content),
                        Err(err) => {
                            tracing::warn!(path = %path.display(), %err, "skipping unreadable file");
                            continue;
                        }
                    }
                } else {
                    None
                };
                nodes.push(TreeNode::File {
                    filename: name,
                    path: relative,
                    filecontent,
                });
            }
        }

        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_scan_builds_nested_folders() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/main.rs", "fn main() {}");
        write(dir.path(), "README.md", "# readme");

        let request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        let forest = TreeScanner::scan(dir.path(), &request).unwrap();

        assert_eq!(forest.len(), 2);
        match &forest[1] {
            TreeNode::Folder { name, contents, .. } => {
                assert_eq!(name, "src");
                assert_eq!(contents.len(), 1);
                match &contents[0] {
                    TreeNode::File {
                        filename,
                        filecontent,
                        ..
                    } => {
                        assert_eq!(filename, "main.rs");
                        assert_eq!(filecontent.as_deref(), Some("fn main() {}"));
                    }
                    other => panic!("expected file node, got {other:?}"),
                }
            }
            other => panic!("expected folder node, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_without_content() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "data");

        let mut request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        request.include_content = false;
        let forest = TreeScanner::scan(dir.path(), &request).unwrap();

        assert_eq!(
            forest,
            vec![TreeNode::File {
                filename: "a.txt".to_string(),
                path: "a.txt".to_string(),
                filecontent: None,
            }]
        );
    }

    #[test]
    fn test_scan_applies_minify() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "lib.js", "// header\nlet  a = 1;\n");

        let mut request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        request.minify = true;
        let forest = TreeScanner::scan(dir.path(), &request).unwrap();

        match &forest[0] {
            TreeNode::File { filecontent, .. } => {
                assert_eq!(filecontent.as_deref(), Some("let a = 1;"));
            }
            other => panic!("expected file node, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_prunes_hidden_and_keeps_empty_folders() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".git/config", "secret");
        fs::create_dir(dir.path().join("empty")).unwrap();

        let mut request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        request.ignore_hidden = true;
        let forest = TreeScanner::scan(dir.path(), &request).unwrap();

        assert_eq!(
            forest,
            vec![TreeNode::Folder {
                name: "empty".to_string(),
                path: "empty".to_string(),
                contents: vec![],
            }]
        );
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let result = TreeScanner::scan(&PathBuf::from("/no/such/dir"), &ScanRequest::default());
        assert!(matches!(result, Err(CoreError::NotADirectory(_))));
    }
}

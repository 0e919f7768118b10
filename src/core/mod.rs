pub mod collector;
pub mod error;
pub mod export;
pub mod file_handler;
pub mod filter;
pub mod minify;
pub mod scanner;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use error::CoreError;

/// Describes a single scan: which roots to walk, which entries to keep, and
/// how to shape the collected content.
///
/// The extension list and the name pattern are independent filters; when both
/// are set a file must satisfy both.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    /// Roots to walk. The [`scanner::TreeScanner`] uses exactly the first
    /// root; the [`collector::FlatCollector`] walks all of them in order.
    pub roots: Vec<PathBuf>,
    /// Allowed file extensions, e.g. `["py", "rs"]`. Empty means no
    /// extension filtering. A leading dot is optional.
    pub extensions: Vec<String>,
    /// Optional pattern searched (not anchored) against the file name.
    pub name_pattern: Option<Regex>,
    /// A path is dropped when any of these strings occurs anywhere in it.
    /// Matching directories are pruned without descending.
    pub exclusions: Vec<String>,
    /// When false, file nodes and flat entries carry no content.
    pub include_content: bool,
    /// Skip entries whose base name starts with a dot.
    pub ignore_hidden: bool,
    /// Key flat entries by path relative to their root instead of absolute.
    pub use_relative_paths: bool,
    /// Run the per-mode minify transform over each file's content.
    pub minify: bool,
}

impl ScanRequest {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            include_content: true,
            use_relative_paths: true,
            ..Default::default()
        }
    }

    /// Sets the file-name pattern, validating it eagerly so that a malformed
    /// pattern fails here instead of on every file during the walk.
    pub fn with_name_pattern(mut self, pattern: &str) -> Result<Self, CoreError> {
        self.name_pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }
}

/// One node of the hierarchical scan result produced by the Tree Scanner.
///
/// Serializes with a `type` tag (`"folder"` / `"file"`) and the field names
/// the export formats expose. Owned by the scan that produced it and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Folder {
        name: String,
        path: String,
        contents: Vec<TreeNode>,
    },
    File {
        filename: String,
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        filecontent: Option<String>,
    },
}

impl TreeNode {
    /// The path label used by the text and JSONL exports.
    pub fn path(&self) -> &str {
        match self {
            TreeNode::Folder { path, .. } => path,
            TreeNode::File { path, .. } => path,
        }
    }
}

/// The flat result mapping: collection key to file content.
///
/// Insertion-ordered so exports reproduce collection order. Two roots may
/// produce the same relative key; the later write wins.
pub type FlatMap = IndexMap<String, String>;

/// Events emitted by the Flat Collector while it runs.
///
/// A single run emits these strictly ordered on one channel: interleaved
/// `Progress`/`FileCollected` events followed by exactly one `Finished`.
#[derive(Debug, Clone)]
pub enum CollectEvent {
    /// Integer percentage of processed files. Monotonically non-decreasing
    /// within a run; may pass 100 if the tree grew between the counting
    /// pre-pass and the walk.
    Progress(u32),
    /// A file was read and stored under the given key.
    FileCollected(String),
    /// The walk finished; carries the complete result mapping.
    Finished(FlatMap),
}

pub use collector::FlatCollector;
pub use export::{ExportData, ExportFormat, Exporter};
pub use scanner::TreeScanner;

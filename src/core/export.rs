//! Serializes a collection result to plain text, JSON, YAML, or JSON Lines.

use serde::Serialize;
use std::fs;
use std::path::Path;

use super::error::CoreError;
use super::{FlatMap, TreeNode};

const RECORD_START: &str = "=====================FILE-START==================";
const RECORD_END: &str = "----------------------FILE-END-------------------";

/// The serialization format for an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One labeled block per entry, separated by wide delimiters.
    PlainText,
    /// A single JSON document. The minify toggle switches between compact
    /// and 2-space pretty output; both carry identical semantic content.
    Json,
    /// A single YAML document. Unicode content is written as-is, never
    /// escaped down to ASCII.
    Yaml,
    /// One JSON object per line, in collection order.
    JsonLines,
}

/// Either result shape the pipeline can produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportData {
    /// Hierarchical forest from the Tree Scanner.
    Tree(Vec<TreeNode>),
    /// Flat mapping from the Flat Collector.
    Flat(FlatMap),
}

/// One JSONL line: a single path/content pair.
#[derive(Serialize)]
struct JsonlRecord<'a> {
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
}

/// Stateless serializer for both result shapes.
pub struct Exporter;

impl Exporter {
    /// Renders `data` in the given format.
    ///
    /// `minified` only affects [`ExportFormat::Json`] density; every other
    /// format has a single canonical rendering.
    pub fn export_to_string(
        data: &ExportData,
        format: ExportFormat,
        minified: bool,
    ) -> Result<String, CoreError> {
        match format {
            ExportFormat::PlainText => Ok(Self::to_plain_text(data)),
            ExportFormat::Json => {
                if minified {
                    Ok(serde_json::to_string(data)?)
                } else {
                    Ok(serde_json::to_string_pretty(data)?)
                }
            }
            ExportFormat::Yaml => Ok(serde_yml::to_string(data)?),
            ExportFormat::JsonLines => Self::to_jsonl(data),
        }
    }

    /// Renders `data` and writes it to `path`.
    ///
    /// Write failures are fatal to the export and surface with the
    /// destination path and the underlying cause.
    pub fn export_to_file(
        data: &ExportData,
        format: ExportFormat,
        minified: bool,
        path: &Path,
    ) -> Result<(), CoreError> {
        let output = Self::export_to_string(data, format, minified)?;
        fs::write(path, output).map_err(|source| {
            tracing::error!(path = %path.display(), %source, "export write failed");
            CoreError::ExportWrite {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(path = %path.display(), ?format, "export written");
        Ok(())
    }

    fn to_plain_text(data: &ExportData) -> String {
        let mut out = String::new();
        out.push_str("# file-tree-export\n");
        out.push_str(&format!(
            "# Generated: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("# Total entries: {}\n\n", Self::entry_count(data)));

        match data {
            ExportData::Flat(map) => {
                for (key, content) in map {
                    Self::push_record(&mut out, key, Some(content));
                }
            }
            ExportData::Tree(forest) => {
                for node in forest {
                    Self::push_tree_node(&mut out, node);
                }
            }
        }
        out
    }

    fn push_tree_node(out: &mut String, node: &TreeNode) {
        match node {
            TreeNode::Folder { path, contents, .. } => {
                out.push_str(&format!("folder: {path}\n\n"));
                for child in contents {
                    Self::push_tree_node(out, child);
                }
            }
            TreeNode::File {
                path, filecontent, ..
            } => {
                Self::push_record(out, path, filecontent.as_deref());
            }
        }
    }

    fn push_record(out: &mut String, path: &str, content: Option<&str>) {
        out.push_str(&format!("file: {path}\n"));
        if let Some(content) = content {
            out.push_str(RECORD_START);
            out.push('\n');
            out.push_str(content);
            if !content.ends_with('\n') {
                out.push('\n');
            }
            out.push_str(RECORD_END);
            out.push('\n');
        }
        out.push('\n');
    }

    fn to_jsonl(data: &ExportData) -> Result<String, CoreError> {
        let mut out = String::new();
        match data {
            ExportData::Flat(map) => {
                for (key, content) in map {
                    let record = JsonlRecord {
                        path: key,
                        content: Some(content),
                    };
                    out.push_str(&serde_json::to_string(&record)?);
                    out.push('\n');
                }
            }
            ExportData::Tree(forest) => {
                for node in forest {
                    Self::push_jsonl_node(&mut out, node)?;
                }
            }
        }
        Ok(out)
    }

    fn push_jsonl_node(out: &mut String, node: &TreeNode) -> Result<(), CoreError> {
        match node {
            TreeNode::Folder { contents, .. } => {
                for child in contents {
                    Self::push_jsonl_node(out, child)?;
                }
            }
            TreeNode::File {
                path, filecontent, ..
            } => {
                let record = JsonlRecord {
                    path,
                    content: filecontent.as_deref(),
                };
                out.push_str(&serde_json::to_string(&record)?);
                out.push('\n');
            }
        }
        Ok(())
    }

    fn entry_count(data: &ExportData) -> usize {
        fn count_nodes(nodes: &[TreeNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    TreeNode::Folder { contents, .. } => 1 + count_nodes(contents),
                    TreeNode::File { .. } => 1,
                })
                .sum()
        }
        match data {
            ExportData::Flat(map) => map.len(),
            ExportData::Tree(forest) => count_nodes(forest),
        }
    }
}

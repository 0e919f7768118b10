//! Core pipeline of the file/folder exporter: directory traversal, filter
//! evaluation, content minification, and multi-format export.
//!
//! The interactive front-end is an external collaborator: it builds a
//! [`core::ScanRequest`], runs either the [`core::TreeScanner`] (single root,
//! synchronous, hierarchical result) or the [`core::FlatCollector`] (multiple
//! roots, background task, flat result with progress events), and hands the
//! outcome to the [`core::Exporter`].

pub mod config;
pub mod core;

//! Concurrent multi-root collection into a flat path-to-content mapping.
//!
//! The collector is designed to run as a single background task. It talks to
//! its caller only through the [`CollectEvent`] channel: percentage updates,
//! one notification per stored file, and a terminal `Finished` event with the
//! complete mapping. Each run owns its result map and counters exclusively.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use walkdir::WalkDir;

use super::error::CoreError;
use super::file_handler::read_file_content;
use super::filter::{is_excluded, should_include};
use super::minify::flatten_whitespace;
use super::{CollectEvent, FlatMap, ScanRequest};

const YIELD_INTERVAL: usize = 10;

/// Walks every root of a [`ScanRequest`] and collects matching files into an
/// insertion-ordered mapping.
pub struct FlatCollector {
    request: ScanRequest,
}

impl FlatCollector {
    pub fn new(request: ScanRequest) -> Self {
        Self { request }
    }

    /// Runs the collection, emitting events as it goes.
    ///
    /// A counting pre-pass establishes the progress denominator; it prunes
    /// directories by the exclusion list only, so the reported percentage is
    /// an approximation whenever hidden pruning applies or the tree changes
    /// between the passes. Within one run the percentage never decreases.
    ///
    /// Unreadable files are logged and walked past; they count as processed
    /// but never reach the result. Keys collide when two roots produce the
    /// same relative path, and the later write wins. Cancellation is checked
    /// between files and surfaces as [`CoreError::Cancelled`].
    pub async fn collect(
        &self,
        events: UnboundedSender<CollectEvent>,
        cancel_flag: Arc<AtomicBool>,
    ) -> Result<FlatMap, CoreError> {
        let total = self.count_total_files();
        tracing::info!(
            roots = self.request.roots.len(),
            total,
            "starting flat collection"
        );

        let mut result = FlatMap::new();
        let mut processed: usize = 0;

        for root in &self.request.roots {
            let walker = WalkDir::new(root)
                .follow_links(false)
                .into_iter()
                .filter_entry(|entry| {
                    // The root itself is never filtered; only entries below it.
                    entry.depth() == 0
                        || !entry.file_type().is_dir()
                        || should_include(entry.path(), true, &self.request)
                });

            for entry in walker {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::warn!(%err, "skipping unreadable entry");
                        continue;
                    }
                };
                if !entry.file_type().is_file() {
                    continue;
                }

                if cancel_flag.load(Ordering::Relaxed) {
                    tracing::info!(processed, "collection cancelled");
                    return Err(CoreError::Cancelled);
                }

                let path = entry.path();
                processed += 1;

                if should_include(path, false, &self.request) {
                    match self.collect_file(path) {
                        Ok(content) => {
                            let key = self.entry_key(path, root);
                            result.insert(key.clone(), content);
                            let _ = events.send(CollectEvent::FileCollected(key));
                        }
                        Err(err) => {
                            tracing::warn!(path = %path.display(), %err, "failed to read file");
                        }
                    }
                }

                let _ = events.send(CollectEvent::Progress(percentage(processed, total)));

                if processed % YIELD_INTERVAL == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }

        tracing::info!(collected = result.len(), processed, "flat collection finished");
        let _ = events.send(CollectEvent::Finished(result.clone()));
        Ok(result)
    }

    /// Counts files under all roots, pruning by the exclusion list only.
    /// Hidden and extension filtering are deliberately not applied here.
    fn count_total_files(&self) -> usize {
        self.request
            .roots
            .iter()
            .map(|root| {
                WalkDir::new(root)
                    .follow_links(false)
                    .into_iter()
                    .filter_entry(|entry| {
                        entry.depth() == 0
                            || !entry.file_type().is_dir()
                            || !is_excluded(entry.path(), &self.request.exclusions)
                    })
                    .filter_map(Result::ok)
                    .filter(|entry| entry.file_type().is_file())
                    .count()
            })
            .sum()
    }

    fn collect_file(&self, path: &Path) -> Result<String, CoreError> {
        if !self.request.include_content {
            return Ok(String::new());
        }
        let content = read_file_content(path)?;
        Ok(if self.request.minify {
            flatten_whitespace(&content)
        } else {
            content
        })
    }

    fn entry_key(&self, path: &Path, root: &Path) -> String {
        if self.request.use_relative_paths {
            path.strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned()
        } else {
            path.to_string_lossy().into_owned()
        }
    }
}

fn percentage(processed: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    (processed * 100 / total) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tokio::sync::mpsc;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    async fn run(request: ScanRequest) -> (FlatMap, Vec<CollectEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let collector = FlatCollector::new(request);
        let result = collector
            .collect(tx, Arc::new(AtomicBool::new(false)))
            .await
            .unwrap();
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        (result, events)
    }

    #[tokio::test]
    async fn test_collects_relative_keys() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");
        write(dir.path(), "sub/b.txt", "beta");

        let (result, _) = run(ScanRequest::new(vec![dir.path().to_path_buf()])).await;

        assert_eq!(result.get("a.txt").map(String::as_str), Some("alpha"));
        let sub_key = PathBuf::from("sub").join("b.txt");
        assert_eq!(
            result.get(sub_key.to_string_lossy().as_ref()).map(String::as_str),
            Some("beta")
        );
    }

    #[tokio::test]
    async fn test_absolute_keys_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "alpha");

        let mut request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        request.use_relative_paths = false;
        let (result, _) = run(request).await;

        let expected = dir.path().join("a.txt").to_string_lossy().into_owned();
        assert!(result.contains_key(&expected));
    }

    #[tokio::test]
    async fn test_key_collision_last_writer_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(first.path(), "same.txt", "from first");
        write(second.path(), "same.txt", "from second");

        let request = ScanRequest::new(vec![
            first.path().to_path_buf(),
            second.path().to_path_buf(),
        ]);
        let (result, _) = run(request).await;

        assert_eq!(result.len(), 1);
        assert_eq!(result.get("same.txt").map(String::as_str), Some("from second"));
    }

    #[tokio::test]
    async fn test_progress_reaches_hundred_monotonically() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "1");
        write(dir.path(), "b.txt", "2");
        write(dir.path(), "c.py", "3");

        let (_, events) = run(ScanRequest::new(vec![dir.path().to_path_buf()])).await;

        let percentages: Vec<u32> = events
            .iter()
            .filter_map(|event| match event {
                CollectEvent::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert_eq!(percentages.len(), 3);
        assert!(percentages.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*percentages.last().unwrap(), 100);
    }

    #[tokio::test]
    async fn test_finished_event_carries_full_mapping() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "only.txt", "payload");

        let (result, events) = run(ScanRequest::new(vec![dir.path().to_path_buf()])).await;

        match events.last() {
            Some(CollectEvent::Finished(map)) => assert_eq!(map, &result),
            other => panic!("expected terminal Finished event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_matching_files_count_toward_progress() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.py", "print(1)");
        write(dir.path(), "b.txt", "ignored");

        let mut request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        request.extensions = vec!["py".to_string()];
        let (result, events) = run(request).await;

        assert_eq!(result.len(), 1);
        let progress_count = events
            .iter()
            .filter(|event| matches!(event, CollectEvent::Progress(_)))
            .count();
        assert_eq!(progress_count, 2);
    }

    #[tokio::test]
    async fn test_minify_uses_whitespace_flattening() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "code.py", "    def f():\n        pass\n");

        let mut request = ScanRequest::new(vec![dir.path().to_path_buf()]);
        request.minify = true;
        let (result, _) = run(request).await;

        assert_eq!(
            result.get("code.py").map(String::as_str),
            Some("def f():     pass")
        );
    }

    #[tokio::test]
    async fn test_cancellation_between_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.txt", "1");
        write(dir.path(), "b.txt", "2");

        let (tx, _rx) = mpsc::unbounded_channel();
        let cancel_flag = Arc::new(AtomicBool::new(true));
        let collector = FlatCollector::new(ScanRequest::new(vec![dir.path().to_path_buf()]));
        let result = collector.collect(tx, cancel_flag).await;

        assert!(matches!(result, Err(CoreError::Cancelled)));
    }

    #[test]
    fn test_percentage_with_zero_total() {
        assert_eq!(percentage(0, 0), 100);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(3, 3), 100);
        assert_eq!(percentage(4, 3), 133);
    }
}

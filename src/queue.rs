use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::model::SourceDocument;

/// A document waiting to be split, with the chunk size the user typed for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub source: SourceDocument,
    /// Raw chunk-size text; only validated when the split runs
    pub chunk_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueItem {
    Ready(QueueEntry),
    /// Could not be read when added; reported as failed by the split
    Unreadable { path: PathBuf, reason: String },
}

impl QueueItem {
    pub fn path(&self) -> &Path {
        match self {
            QueueItem::Ready(entry) => &entry.source.path,
            QueueItem::Unreadable { path, .. } => path,
        }
    }
}

/// Ordered set of documents to split, one item per distinct path
#[derive(Debug, Default)]
pub struct SplitQueue {
    items: Vec<QueueItem>,
}

impl SplitQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `path` and queue it. Returns `Ok(false)` if it is already queued.
    ///
    /// A file that cannot be read stays in the queue as unreadable, so the
    /// split reports it in order; the read error is also returned.
    pub fn add<P: AsRef<Path>>(&mut self, path: P) -> Result<bool> {
        let path = path.as_ref();
        if self.contains(path) {
            debug!("Already queued: {}", path.display());
            return Ok(false);
        }
        match SourceDocument::read(path) {
            Ok(source) => {
                self.push(source);
                Ok(true)
            }
            Err(e) => {
                self.items.push(QueueItem::Unreadable {
                    path: path.to_path_buf(),
                    reason: format!("{:#}", e),
                });
                Err(e)
            }
        }
    }

    /// Queue a document whose descriptor is already known
    pub fn push(&mut self, source: SourceDocument) {
        if self.contains(&source.path) {
            return;
        }
        debug!(
            "Queued {} ({} pages, {} bytes)",
            source.path.display(),
            source.total_pages,
            source.size_bytes
        );
        let chunk_input = source.total_pages.to_string();
        self.items.push(QueueItem::Ready(QueueEntry {
            source,
            chunk_input,
        }));
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        self.items.iter().any(|item| item.path() == path)
    }

    /// Change the chunk size text for one document. Returns `false` if no
    /// readable queued document matches `path`.
    ///
    /// `path` matches a queued document when it is the same path, resolves to
    /// the same file, or is a file name shared by exactly one queued document.
    pub fn set_chunk_input<P: AsRef<Path>>(&mut self, path: P, input: impl Into<String>) -> bool {
        match self.find_entry(path.as_ref()) {
            Some(index) => {
                if let QueueItem::Ready(entry) = &mut self.items[index] {
                    entry.chunk_input = input.into();
                }
                true
            }
            None => false,
        }
    }

    fn find_entry(&self, path: &Path) -> Option<usize> {
        let ready = || {
            self.items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| match item {
                    QueueItem::Ready(entry) => Some((index, entry.source.path.as_path())),
                    QueueItem::Unreadable { .. } => None,
                })
        };

        if let Some((index, _)) = ready().find(|(_, queued)| *queued == path) {
            return Some(index);
        }

        if let Ok(wanted) = std::fs::canonicalize(path) {
            let found = ready().find(|(_, queued)| {
                std::fs::canonicalize(queued).is_ok_and(|queued| queued == wanted)
            });
            if let Some((index, _)) = found {
                return Some(index);
            }
        }

        let name = path.file_name()?;
        let mut by_name = ready().filter(|(_, queued)| queued.file_name() == Some(name));
        match (by_name.next(), by_name.next()) {
            (Some((index, _)), None) => Some(index),
            _ => None,
        }
    }

    /// Apply the same chunk size text to every queued document
    pub fn set_all_chunk_inputs(&mut self, input: &str) {
        for item in &mut self.items {
            if let QueueItem::Ready(entry) = item {
                entry.chunk_input = input.to_string();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items, readable or not, in the order they were added
    pub fn items(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.iter()
    }

    /// Readable documents in the order they were added
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.items.iter().filter_map(|item| match item {
            QueueItem::Ready(entry) => Some(entry),
            QueueItem::Unreadable { .. } => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::write_test_pdf;

    fn queued(paths: &[&str]) -> SplitQueue {
        let mut queue = SplitQueue::new();
        for path in paths {
            queue.push(SourceDocument {
                path: PathBuf::from(path),
                total_pages: 10,
                size_bytes: 0,
            });
        }
        queue
    }

    #[test]
    fn test_add_reads_descriptor_and_defaults_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_pdf(dir.path(), "a.pdf", 5);

        let mut queue = SplitQueue::new();
        assert!(queue.add(&path).unwrap());

        let entry = queue.iter().next().unwrap();
        assert_eq!(entry.source.total_pages, 5);
        assert!(entry.source.size_bytes > 0);
        assert_eq!(entry.chunk_input, "5");
    }

    #[test]
    fn test_add_same_path_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_pdf(dir.path(), "a.pdf", 2);

        let mut queue = SplitQueue::new();
        assert!(queue.add(&path).unwrap());
        assert!(!queue.add(&path).unwrap());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_add_unreadable_file_is_kept_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.pdf");
        std::fs::write(&broken, b"not a pdf").unwrap();
        let good = write_test_pdf(dir.path(), "good.pdf", 2);

        let mut queue = SplitQueue::new();
        assert!(queue.add(&broken).is_err());
        assert!(queue.add(&good).unwrap());

        let paths: Vec<_> = queue.items().map(|item| item.path().to_path_buf()).collect();
        assert_eq!(paths, vec![broken.clone(), good]);
        assert!(matches!(
            queue.items().next().unwrap(),
            QueueItem::Unreadable { reason, .. } if reason.contains("broken.pdf")
        ));
        assert_eq!(queue.iter().count(), 1);
        assert!(!queue.set_chunk_input(&broken, "1"));
    }

    #[test]
    fn test_chunk_overrides() {
        let mut queue = queued(&["a.pdf", "b.pdf"]);

        queue.set_all_chunk_inputs("4");
        assert!(queue.set_chunk_input("b.pdf", "abc"));
        assert!(!queue.set_chunk_input("c.pdf", "1"));

        let inputs: Vec<_> = queue.iter().map(|e| e.chunk_input.as_str()).collect();
        assert_eq!(inputs, vec!["4", "abc"]);
    }

    #[test]
    fn test_override_by_file_name() {
        let mut queue = queued(&["docs/2023/report.pdf", "docs/summary.pdf"]);
        assert!(queue.set_chunk_input("report.pdf", "3"));
        assert_eq!(queue.iter().next().unwrap().chunk_input, "3");
    }

    #[test]
    fn test_override_by_ambiguous_file_name_is_rejected() {
        let mut queue = queued(&["2023/report.pdf", "2024/report.pdf"]);
        assert!(!queue.set_chunk_input("report.pdf", "3"));
        assert!(queue.set_chunk_input("2024/report.pdf", "3"));
        let inputs: Vec<_> = queue.iter().map(|e| e.chunk_input.as_str()).collect();
        assert_eq!(inputs, vec!["10", "3"]);
    }

    #[test]
    fn test_override_by_equivalent_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let first = write_test_pdf(dir.path(), "report.pdf", 2);
        let second = write_test_pdf(&dir.path().join("sub"), "report.pdf", 2);

        let mut queue = SplitQueue::new();
        queue.add(&first).unwrap();
        queue.add(&second).unwrap();

        // Same file as `first`, spelled differently
        let detour = dir.path().join("sub").join("..").join("report.pdf");
        assert!(queue.set_chunk_input(&detour, "1"));
        let inputs: Vec<_> = queue.iter().map(|e| e.chunk_input.as_str()).collect();
        assert_eq!(inputs, vec!["1", "2"]);
    }
}

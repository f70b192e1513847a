use chrono::{DateTime, Local};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::config::SplitConfig;
use crate::error::{Result, SplitError};
use crate::model::{DocumentReport, DocumentStatus, OutputDocument, SessionReport};
use crate::partition::{part_file_name, plan, resolve_chunk_size, SplitPlan};
use crate::pdf::{file_size, PdfDocument};
use crate::queue::{QueueEntry, QueueItem, SplitQueue};

pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Splitter { config }
    }

    /// Effective chunk size for a queued document
    pub fn chunk_size_for(&self, entry: &QueueEntry) -> NonZeroU32 {
        resolve_chunk_size(&entry.chunk_input, self.config.fallback_chunk_size)
    }

    /// Split every queued document into `{output_root}/{timestamp}/`.
    ///
    /// Documents are processed in queue order. A document that fails, or
    /// could not be read when it was queued, is recorded as failed and the
    /// rest still run.
    pub fn run<P: AsRef<Path>>(
        &self,
        queue: &SplitQueue,
        output_root: P,
        now: DateTime<Local>,
    ) -> Result<SessionReport> {
        if queue.is_empty() {
            return Err(SplitError::NothingToSplit);
        }

        let output_dir = self.create_session_dir(output_root.as_ref(), now)?;
        info!(
            "Splitting {} document(s) into {}",
            queue.len(),
            output_dir.display()
        );

        let mut documents = Vec::with_capacity(queue.len());
        for item in queue.items() {
            let status = match item {
                QueueItem::Ready(entry) => match self.split_entry(entry, &output_dir) {
                    Ok(status) => status,
                    Err(e) => {
                        error!("{}", e);
                        DocumentStatus::Failed {
                            reason: e.to_string(),
                        }
                    }
                },
                QueueItem::Unreadable { reason, .. } => DocumentStatus::Failed {
                    reason: reason.clone(),
                },
            };
            documents.push(DocumentReport {
                source_path: item.path().to_path_buf(),
                status,
            });
        }

        Ok(SessionReport {
            output_dir,
            documents,
        })
    }

    /// Create (if absent) the directory shared by one split session
    pub fn create_session_dir(&self, output_root: &Path, now: DateTime<Local>) -> Result<PathBuf> {
        let name = now.format(&self.config.session_dir_format).to_string();
        let dir = output_root.join(name);
        std::fs::create_dir_all(&dir).map_err(|source| SplitError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    fn split_entry(&self, entry: &QueueEntry, output_dir: &Path) -> Result<DocumentStatus> {
        let source = &entry.source;
        let chunk_size = self.chunk_size_for(entry);

        let spans = match plan(source.total_pages, chunk_size) {
            SplitPlan::Unsplit => {
                info!(
                    "{}: chunk size {} covers all {} pages, not splitting",
                    source.file_name(),
                    chunk_size,
                    source.total_pages
                );
                return Ok(DocumentStatus::Unsplit {
                    document: source.clone(),
                });
            }
            SplitPlan::Parts(spans) => spans,
        };

        // Dropped at the end of this call, before the next document is opened
        let doc = PdfDocument::open(&source.path).map_err(|e| SplitError::Open {
            path: source.path.clone(),
            reason: format!("{:#}", e),
        })?;

        let base_name = source.base_name();
        let mut parts = Vec::with_capacity(spans.len());
        for (index, span) in spans.iter().enumerate() {
            let output_path = output_dir.join(part_file_name(&base_name, index + 1));

            let mut part = doc.extract_span(*span).map_err(|e| SplitError::Extract {
                path: source.path.clone(),
                first: span.start + 1,
                last: span.end,
                reason: format!("{:#}", e),
            })?;
            PdfDocument::save(&mut part, &output_path).map_err(|e| SplitError::Save {
                path: output_path.clone(),
                reason: format!("{:#}", e),
            })?;
            let size_bytes = file_size(&output_path).map_err(|e| SplitError::Save {
                path: output_path.clone(),
                reason: format!("{:#}", e),
            })?;

            info!("Created {}", output_path.display());
            debug!(
                "{}: pages {}-{} -> {} ({} bytes)",
                source.file_name(),
                span.start + 1,
                span.end,
                output_path.display(),
                size_bytes
            );

            parts.push(OutputDocument {
                path: output_path,
                size_bytes,
                page_count: span.len(),
                source_path: source.path.clone(),
            });
        }

        Ok(DocumentStatus::Split { parts })
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Splitter::new(SplitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SourceDocument;
    use crate::pdf::fixtures::write_test_pdf;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 31, 9, 45, 0).unwrap()
    }

    #[test]
    fn test_empty_queue_creates_nothing() {
        let out = tempfile::tempdir().unwrap();
        let err = Splitter::default()
            .run(&SplitQueue::new(), out.path(), fixed_time())
            .unwrap_err();
        assert!(matches!(err, SplitError::NothingToSplit));
        assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_session_dir_name_and_idempotence() {
        let out = tempfile::tempdir().unwrap();
        let splitter = Splitter::default();
        let first = splitter.create_session_dir(out.path(), fixed_time()).unwrap();
        let second = splitter.create_session_dir(out.path(), fixed_time()).unwrap();
        assert_eq!(first, out.path().join("20240131_094500"));
        assert_eq!(first, second);
        assert!(first.is_dir());
    }

    #[test]
    fn test_split_seven_pages_by_three() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let path = write_test_pdf(src.path(), "report.pdf", 7);

        let mut queue = SplitQueue::new();
        queue.add(&path).unwrap();
        queue.set_chunk_input(&path, "3");

        let report = Splitter::default()
            .run(&queue, out.path(), fixed_time())
            .unwrap();

        let session_dir = out.path().join("20240131_094500");
        assert_eq!(report.output_dir, session_dir);
        assert_eq!(report.documents.len(), 1);

        let parts = report.documents[0].parts();
        let names: Vec<_> = parts.iter().map(|p| p.file_name()).collect();
        assert_eq!(
            names,
            vec!["report_part_1.pdf", "report_part_2.pdf", "report_part_3.pdf"]
        );
        let counts: Vec<_> = parts.iter().map(|p| p.page_count).collect();
        assert_eq!(counts, vec![3, 3, 1]);

        for part in parts {
            assert_eq!(part.source_path, path);
            assert_eq!(part.size_bytes, std::fs::metadata(&part.path).unwrap().len());
            let written = PdfDocument::open(&part.path).unwrap();
            assert_eq!(written.page_count(), part.page_count);
        }
    }

    #[test]
    fn test_default_chunk_input_leaves_document_unsplit() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let path = write_test_pdf(src.path(), "short.pdf", 4);

        let mut queue = SplitQueue::new();
        queue.add(&path).unwrap();

        let report = Splitter::default()
            .run(&queue, out.path(), fixed_time())
            .unwrap();

        match &report.documents[0].status {
            DocumentStatus::Unsplit { document } => assert_eq!(document.total_pages, 4),
            other => panic!("expected unsplit, got {:?}", other),
        }
        assert_eq!(report.written_files().count(), 0);
        assert_eq!(std::fs::read_dir(&report.output_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_chunk_input_uses_fallback() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let path = write_test_pdf(src.path(), "long.pdf", 25);

        let mut queue = SplitQueue::new();
        queue.add(&path).unwrap();
        queue.set_chunk_input(&path, "twenty");

        let splitter = Splitter::default();
        let entry = queue.iter().next().unwrap();
        assert_eq!(splitter.chunk_size_for(entry).get(), 20);

        let report = splitter.run(&queue, out.path(), fixed_time()).unwrap();
        let counts: Vec<_> = report.written_files().map(|p| p.page_count).collect();
        assert_eq!(counts, vec![20, 5]);
    }

    #[test]
    fn test_injected_fallback() {
        let splitter = Splitter::new(SplitConfig {
            fallback_chunk_size: NonZeroU32::new(2).unwrap(),
            ..SplitConfig::default()
        });
        let entry = QueueEntry {
            source: SourceDocument {
                path: "x.pdf".into(),
                total_pages: 9,
                size_bytes: 0,
            },
            chunk_input: "-1".to_string(),
        };
        assert_eq!(splitter.chunk_size_for(&entry).get(), 2);
    }

    #[test]
    fn test_failed_document_does_not_stop_batch() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let good = write_test_pdf(src.path(), "good.pdf", 4);
        let doomed = write_test_pdf(src.path(), "doomed.pdf", 4);

        let mut queue = SplitQueue::new();
        queue.add(&doomed).unwrap();
        queue.add(&good).unwrap();
        queue.set_all_chunk_inputs("2");

        // Vanishes between being queued and being split
        std::fs::remove_file(&doomed).unwrap();

        let report = Splitter::default()
            .run(&queue, out.path(), fixed_time())
            .unwrap();

        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.documents[0].source_path, doomed);
        match &report.documents[0].status {
            DocumentStatus::Failed { reason } => assert!(reason.contains("doomed.pdf")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(report.documents[1].parts().len(), 2);
    }

    #[test]
    fn test_all_unreadable_documents_are_reported_failed() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let garbage = src.path().join("garbage.pdf");
        std::fs::write(&garbage, b"not a pdf").unwrap();
        let missing = src.path().join("missing.pdf");

        let mut queue = SplitQueue::new();
        assert!(queue.add(&garbage).is_err());
        assert!(queue.add(&missing).is_err());

        let report = Splitter::default()
            .run(&queue, out.path(), fixed_time())
            .unwrap();

        let sources: Vec<_> = report.documents.iter().map(|d| d.source_path.clone()).collect();
        assert_eq!(sources, vec![garbage, missing]);
        assert_eq!(report.failures().count(), 2);
        match &report.documents[1].status {
            DocumentStatus::Failed { reason } => assert!(reason.contains("missing.pdf")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_parts_overwrite_existing_files() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let path = write_test_pdf(src.path(), "dup.pdf", 2);

        let mut queue = SplitQueue::new();
        queue.add(&path).unwrap();
        queue.set_chunk_input(&path, "1");

        let splitter = Splitter::default();
        splitter.run(&queue, out.path(), fixed_time()).unwrap();
        let report = splitter.run(&queue, out.path(), fixed_time()).unwrap();

        assert_eq!(report.failures().count(), 0);
        assert_eq!(std::fs::read_dir(&report.output_dir).unwrap().count(), 2);
    }
}

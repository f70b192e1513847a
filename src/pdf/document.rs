use anyhow::{Context, Result};
use lopdf::Document;
use std::path::{Path, PathBuf};

use crate::partition::PageSpan;

pub struct PdfDocument {
    pub doc: Document,
    #[allow(dead_code)]
    pub path: PathBuf,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument {
            doc,
            path: path.to_path_buf(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Copy the pages of `span` into a new document, dropping everything else
    pub fn extract_span(&self, span: PageSpan) -> Result<Document> {
        let total = self.page_count();
        if span.start >= span.end || span.end > total {
            anyhow::bail!(
                "Pages {}-{} are out of range (1-{})",
                span.start + 1,
                span.end,
                total
            );
        }

        let mut new_doc = self.doc.clone();
        let pages_to_delete: Vec<u32> = (1..=total)
            .filter(|page| *page <= span.start || *page > span.end)
            .collect();
        if !pages_to_delete.is_empty() {
            new_doc.delete_pages(&pages_to_delete);
        }

        // Objects only reachable from deleted pages would otherwise bloat every part
        new_doc.prune_objects();
        new_doc.compress();

        Ok(new_doc)
    }

    /// Save to a file. The file handle is closed before this returns.
    pub fn save<P: AsRef<Path>>(doc: &mut Document, path: P) -> Result<()> {
        let file = doc
            .save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Size of a file on disk in bytes
pub fn file_size<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    Ok(metadata.len())
}

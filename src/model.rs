use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::pdf::{file_size, PdfDocument};

/// A PDF as it was when added: where it is, how many pages, how big
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub total_pages: u32,
    pub size_bytes: u64,
}

impl SourceDocument {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let total_pages = PdfDocument::open(path)?.page_count();
        let size_bytes = file_size(path)?;
        Ok(SourceDocument {
            path: path.to_path_buf(),
            total_pages,
            size_bytes,
        })
    }

    /// File name without extension, used to name the parts
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// One file written by a split
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub page_count: u32,
    pub source_path: PathBuf,
}

impl OutputDocument {
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Chunk size was not smaller than the page count; nothing written
    Unsplit { document: SourceDocument },
    Split { parts: Vec<OutputDocument> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source_path: PathBuf,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentReport {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, DocumentStatus::Failed { .. })
    }

    pub fn parts(&self) -> &[OutputDocument] {
        match &self.status {
            DocumentStatus::Split { parts } => parts,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionReport {
    pub output_dir: PathBuf,
    pub documents: Vec<DocumentReport>,
}

impl SessionReport {
    pub fn failures(&self) -> impl Iterator<Item = &DocumentReport> {
        self.documents.iter().filter(|d| d.is_failed())
    }

    /// Every file written during the session, in order
    pub fn written_files(&self) -> impl Iterator<Item = &OutputDocument> {
        self.documents.iter().flat_map(|d| d.parts())
    }
}

/// Size in KiB rounded to two decimals, as shown in listings
pub fn size_kb(size_bytes: u64) -> f64 {
    (size_bytes as f64 / 1024.0 * 100.0).round() / 100.0
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

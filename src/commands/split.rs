use crate::config::SplitConfig;
use crate::inputs::collect_pdf_paths;
use crate::model::{size_kb, DocumentStatus, SessionReport};
use crate::queue::SplitQueue;
use crate::session::Splitter;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

pub struct SplitOptions {
    /// Chunk size text applied to every input
    pub pages: Option<String>,
    /// Per-file chunk size text, applied after `pages`
    pub chunks: Vec<(PathBuf, String)>,
    pub config: SplitConfig,
    pub json: bool,
}

pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
    inputs: &[P],
    output_dir: Q,
    options: &SplitOptions,
) -> Result<()> {
    let paths = collect_pdf_paths(inputs)?;

    let mut queue = SplitQueue::new();
    for path in &paths {
        if let Err(e) = queue.add(path) {
            error!("{:#}", e);
        }
    }

    if let Some(pages) = &options.pages {
        queue.set_all_chunk_inputs(pages);
    }
    for (path, pages) in &options.chunks {
        if !queue.set_chunk_input(path, pages.as_str()) {
            warn!("--chunk {} matches no readable queued file", path.display());
        }
    }

    let splitter = Splitter::new(options.config.clone());
    let report = splitter
        .run(&queue, &output_dir, chrono::Local::now())
        .with_context(|| format!("Split into {} failed", output_dir.as_ref().display()))?;

    if options.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        print_report(&report);
    }

    let failed = report.failures().count();
    if failed > 0 {
        anyhow::bail!(
            "{} of {} document(s) could not be split",
            failed,
            report.documents.len()
        );
    }

    Ok(())
}

fn print_report(report: &SessionReport) {
    println!("Output folder: {}", report.output_dir.display());

    for doc in &report.documents {
        match &doc.status {
            DocumentStatus::Unsplit { document } => {
                println!(
                    "{} ({:.2} KB, {} pages): not split",
                    document.file_name(),
                    size_kb(document.size_bytes),
                    document.total_pages
                );
            }
            DocumentStatus::Split { parts } => {
                println!("{}:", doc.source_path.display());
                for part in parts {
                    println!(
                        "  {} ({:.2} KB, {} pages)",
                        part.file_name(),
                        size_kb(part.size_bytes),
                        part.page_count
                    );
                }
            }
            DocumentStatus::Failed { reason } => {
                println!("{}: FAILED: {}", doc.source_path.display(), reason);
            }
        }
    }

    println!("\n{} file(s) written.", report.written_files().count());
}

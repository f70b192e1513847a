use crate::model::SourceDocument;
use crate::partition::{part_file_name, plan, resolve_chunk_size, SplitPlan};
use anyhow::Result;
use std::num::NonZeroU32;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P, pages: Option<&str>, fallback: NonZeroU32) -> Result<()> {
    let doc = SourceDocument::read(&path)?;
    println!("{}", describe(&doc, pages, fallback));
    Ok(())
}

/// Render the parts `doc` would be split into. Without `pages` the chunk size
/// is the page count, so the document stays whole.
fn describe(doc: &SourceDocument, pages: Option<&str>, fallback: NonZeroU32) -> String {
    let input = pages
        .map(str::to_string)
        .unwrap_or_else(|| doc.total_pages.to_string());
    let chunk_size = resolve_chunk_size(&input, fallback);

    let mut out = format!(
        "{}: {} pages, {} pages per part\n",
        doc.file_name(),
        doc.total_pages,
        chunk_size
    );

    match plan(doc.total_pages, chunk_size) {
        SplitPlan::Unsplit => {
            out.push_str("Chunk size covers the whole document; it would not be split.");
        }
        SplitPlan::Parts(spans) => {
            let base_name = doc.base_name();
            for (index, span) in spans.iter().enumerate() {
                out.push_str(&format!(
                    "  {}: pages {}-{} ({} pages)\n",
                    part_file_name(&base_name, index + 1),
                    span.start + 1,
                    span.end,
                    span.len()
                ));
            }
            out.push_str(&format!("\n{} part(s).", spans.len()));
        }
    }

    out
}

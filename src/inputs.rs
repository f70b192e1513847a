use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand input arguments into PDF file paths.
///
/// Files are taken as given. Directories are walked recursively and every
/// `*.pdf` inside is collected in sorted order.
pub fn collect_pdf_paths<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).follow_links(true) {
                let entry = entry
                    .with_context(|| format!("Failed to scan directory: {}", input.display()))?;
                if entry.file_type().is_file() && is_pdf(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            paths.extend(found);
        } else {
            paths.push(input.to_path_buf());
        }
    }
    Ok(paths)
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

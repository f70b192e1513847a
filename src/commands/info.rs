use crate::model::{size_kb, SourceDocument};
use anyhow::Result;
use std::path::Path;
use tracing::error;

pub fn run<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    let mut failed = 0;

    for path in paths {
        match SourceDocument::read(path) {
            Ok(doc) => println!("{}", describe(&doc)),
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) could not be read", failed, paths.len());
    }

    Ok(())
}

fn describe(doc: &SourceDocument) -> String {
    format!(
        "File: {}\nPath: {}\nSize: {:.2} KB\nPages: {}\n",
        doc.file_name(),
        doc.path.display(),
        size_kb(doc.size_bytes),
        doc.total_pages
    )
}

pub mod document;

pub use document::{file_size, PdfDocument};

use std::num::{IntErrorKind, NonZeroU32};
use tracing::warn;

/// A contiguous run of pages, zero-based, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl PageSpan {
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// 1-based page numbers covered by this span, as lopdf numbers them
    pub fn page_numbers(&self) -> Vec<u32> {
        (self.start + 1..=self.end).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitPlan {
    /// The chunk size is not smaller than the page count
    Unsplit,
    Parts(Vec<PageSpan>),
}

/// Cut `[0, total_pages)` into consecutive spans of `chunk_size` pages.
/// The last span is shorter when `chunk_size` does not divide `total_pages`.
pub fn partition(total_pages: u32, chunk_size: NonZeroU32) -> Vec<PageSpan> {
    let step = chunk_size.get();
    let mut spans = Vec::with_capacity(total_pages.div_ceil(step) as usize);
    let mut start = 0;
    while start < total_pages {
        let end = start.saturating_add(step).min(total_pages);
        spans.push(PageSpan { start, end });
        start = end;
    }
    spans
}

/// Decide whether a document needs splitting at all, and if so how.
pub fn plan(total_pages: u32, chunk_size: NonZeroU32) -> SplitPlan {
    if chunk_size.get() >= total_pages {
        SplitPlan::Unsplit
    } else {
        SplitPlan::Parts(partition(total_pages, chunk_size))
    }
}

/// Turn user-entered chunk-size text into a usable chunk size.
///
/// Anything that is not a positive integer is replaced with `fallback`; the
/// substitution is only visible in the log. Integers too large for `u32`
/// saturate, which leaves any document unsplit.
pub fn resolve_chunk_size(input: &str, fallback: NonZeroU32) -> NonZeroU32 {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let value = match digits.parse::<u32>() {
            Ok(n) => n,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => u32::MAX,
            Err(_) => 0,
        };
        if let Some(n) = NonZeroU32::new(value) {
            return n;
        }
    }

    warn!(
        "Invalid chunk size {:?}, using default of {} pages",
        input, fallback
    );
    fallback
}

/// Output file name for the `part`-th span (1-based)
pub fn part_file_name(base_name: &str, part: usize) -> String {
    format!("{}_part_{}.pdf", base_name, part)
}

use std::num::NonZeroU32;

/// Chunk size used when the requested one is not a positive integer.
pub const DEFAULT_CHUNK_SIZE: NonZeroU32 = match NonZeroU32::new(20) {
    Some(n) => n,
    None => unreachable!(),
};

/// `chrono` format for the per-session output directory, e.g. `20240131_094500`
pub const SESSION_DIR_FORMAT: &str = "%Y%m%d_%H%M%S";

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub fallback_chunk_size: NonZeroU32,
    pub session_dir_format: String,
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            fallback_chunk_size: DEFAULT_CHUNK_SIZE,
            session_dir_format: SESSION_DIR_FORMAT.to_string(),
        }
    }
}

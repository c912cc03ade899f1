// src/fs/mod.rs
//! Filesystem module - checks that the configured source is playable audio.

pub mod detection;

// Re-export commonly used types
pub use detection::{FileCategory, FileType, detect_file_type, ensure_audio};

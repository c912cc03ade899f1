// src/fs/detection.rs
//! File type detection using magic numbers and extension-based fallback.

use std::{fmt, path::Path};

use anyhow::{Context, Result, bail};
use infer::{Infer, MatcherType};
use mime_guess::MimeGuess;

/// High-level file categories.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum FileCategory {
    Image,
    Audio,
    Video,
    Document,
    Binary,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileCategory::Image => "Image",
            FileCategory::Audio => "Audio",
            FileCategory::Video => "Video",
            FileCategory::Document => "Document",
            FileCategory::Binary => "Binary",
        };
        write!(f, "{}", s)
    }
}

/// Holds a detected MIME type + category.
#[derive(Debug)]
pub struct FileType {
    pub mime: String,
    pub category: FileCategory,
}

/// Detect MIME type & category for a given file path.
///
/// Magic numbers win; the extension is only consulted when sniffing finds
/// nothing (headerless MP3 streams, for instance).
pub fn detect_file_type(path: &Path) -> Result<FileType> {
    let sniffed = Infer::new()
        .get_from_path(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let file_type = match sniffed {
        Some(kind) => FileType {
            mime: kind.mime_type().to_string(),
            category: category_of_matcher(kind.matcher_type()),
        },
        None => {
            let mime = MimeGuess::from_path(path).first_or_octet_stream();
            FileType {
                category: category_of_mime(mime.type_().as_str()),
                mime: mime.to_string(),
            }
        }
    };
    Ok(file_type)
}

fn category_of_matcher(matcher: MatcherType) -> FileCategory {
    match matcher {
        MatcherType::Image => FileCategory::Image,
        MatcherType::Audio => FileCategory::Audio,
        MatcherType::Video => FileCategory::Video,
        MatcherType::Doc | MatcherType::Text | MatcherType::Book => FileCategory::Document,
        _ => FileCategory::Binary,
    }
}

fn category_of_mime(top_level: &str) -> FileCategory {
    match top_level {
        "image" => FileCategory::Image,
        "audio" => FileCategory::Audio,
        "video" => FileCategory::Video,
        "text" => FileCategory::Document,
        _ => FileCategory::Binary,
    }
}

/// Fail unless `path` is an existing audio file.
pub fn ensure_audio(path: &Path) -> Result<FileType> {
    if !path.is_file() {
        bail!("{} is not a file", path.display());
    }
    let file_type = detect_file_type(path)?;
    if file_type.category != FileCategory::Audio {
        bail!(
            "{} looks like {} ({}), not audio",
            path.display(),
            file_type.category,
            file_type.mime
        );
    }
    Ok(file_type)
}

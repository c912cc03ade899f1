// src/audio/metadata.rs
//! Track metadata extraction using Lofty.

use std::path::Path;

use anyhow::{Context, Result};
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::Accessor;

use super::resource::TrackInfo;

/// Probe `path` for its duration and primary tags.
/// This is safe to call from a background thread.
pub fn load_track_info(path: &Path) -> Result<TrackInfo> {
    let tagged_file = Probe::open(path)
        .with_context(|| format!("opening {}", path.display()))?
        .read()
        .with_context(|| format!("reading tags of {}", path.display()))?;

    // Fall back to whichever tag is present when the format's primary one is missing
    let tag = tagged_file
        .primary_tag()
        .or_else(|| tagged_file.first_tag());

    let title = tag.and_then(|t| t.title().map(|s| s.into_owned()));
    let artist = tag.and_then(|t| t.artist().map(|s| s.into_owned()));

    let duration = tagged_file.properties().duration();
    let duration_secs = (!duration.is_zero()).then(|| duration.as_secs_f64());

    Ok(TrackInfo {
        duration_secs,
        title,
        artist,
    })
}

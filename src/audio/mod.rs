// src/audio/mod.rs
//! Audio module - the media resource seam and its rodio implementation.

pub mod metadata;
pub mod player;
pub mod resource;

// Re-export commonly used types
pub use metadata::load_track_info;
pub use player::RodioMedia;
pub use resource::{MediaError, MediaEvent, MediaResource, TrackInfo};

// src/audio/resource.rs
//! The boundary between the player panel and whatever actually plays audio.
//!
//! Play and pause are requests: the resource answers later with a
//! [`MediaEvent::PlayResolved`] or [`MediaEvent::PauseResolved`], which the
//! panel picks up through [`MediaResource::poll_event`].

use thiserror::Error;

/// Why a media request could not be honoured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("no source loaded")]
    NotLoaded,
    #[error("cannot open source: {0}")]
    Open(String),
    #[error("cannot decode source: {0}")]
    Decode(String),
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("media backend is gone")]
    Disconnected,
}

/// Track information reported once the source has been probed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackInfo {
    /// Total length in seconds, when the container reports one.
    pub duration_secs: Option<f64>,
    pub title: Option<String>,
    pub artist: Option<String>,
}

/// Notifications emitted by a media resource.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// Metadata is available; the duration becomes known here.
    MetadataLoaded(TrackInfo),
    /// Playback advanced to the given position (seconds).
    TimeUpdate(f64),
    /// The source played through to its end and stopped.
    Ended,
    /// Completion of a [`MediaResource::request_play`].
    PlayResolved(Result<(), MediaError>),
    /// Completion of a [`MediaResource::request_pause`].
    PauseResolved(Result<(), MediaError>),
}

/// A playable media resource owned by the panel.
pub trait MediaResource {
    /// Ask the resource to start playing. Answered by `PlayResolved`.
    fn request_play(&mut self);

    /// Ask the resource to pause. Answered by `PauseResolved`.
    fn request_pause(&mut self);

    /// Move the playback position (seconds).
    fn set_position(&mut self, secs: f64);

    /// Set the output volume, `0.0..=1.0`.
    fn set_volume(&mut self, level: f32);

    /// Next pending notification, if any. Never blocks.
    fn poll_event(&mut self) -> Option<MediaEvent>;
}

impl<M: MediaResource + ?Sized> MediaResource for Box<M> {
    fn request_play(&mut self) {
        (**self).request_play();
    }

    fn request_pause(&mut self) {
        (**self).request_pause();
    }

    fn set_position(&mut self, secs: f64) {
        (**self).set_position(secs);
    }

    fn set_volume(&mut self, level: f32) {
        (**self).set_volume(level);
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        (**self).poll_event()
    }
}

// src/app/playback.rs
//! Playback, transport and volume state mirrored from the media resource.

use tracing::{debug, error, warn};

use crate::audio::{MediaError, MediaResource, TrackInfo};

/// Volume slider granularity.
pub const VOLUME_STEP: f32 = 0.1;

/// The panel's view of playback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Position in seconds.
    pub current_time: f64,
    /// Length in seconds, 0 until metadata loads.
    pub duration: f64,
    /// Output level in `0.0..=1.0`.
    pub volume: f32,
}

impl PlaybackState {
    /// Fraction of the track already played, for the seek gauge.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
        }
    }
}

/// A play or pause request that has not been answered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRequest {
    Play,
    Pause,
}

/// What a call to [`PlaybackController::toggle_play`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Requested(PendingRequest),
    /// Another request is still in flight; nothing was sent.
    Busy,
}

/// Owns play/pause intent and keeps [`PlaybackState`] in step with the resource.
///
/// Only one play/pause request may be in flight at a time. `is_playing` only
/// changes when the resource confirms a request, so a rejected play or pause
/// leaves the toggle where it was.
#[derive(Debug, Default)]
pub struct PlaybackController {
    state: PlaybackState,
    pending: Option<PendingRequest>,
}

impl PlaybackController {
    pub fn new(volume: f32) -> Self {
        Self {
            state: PlaybackState {
                volume: clamp_volume(volume).unwrap_or(1.0),
                ..PlaybackState::default()
            },
            pending: None,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn pending(&self) -> Option<PendingRequest> {
        self.pending
    }

    /// Request pause when playing, play otherwise.
    pub fn toggle_play<M: MediaResource + ?Sized>(&mut self, media: &mut M) -> ToggleOutcome {
        if let Some(pending) = self.pending {
            debug!("toggle ignored, {pending:?} request still pending");
            return ToggleOutcome::Busy;
        }

        let request = if self.state.is_playing {
            media.request_pause();
            PendingRequest::Pause
        } else {
            media.request_play();
            PendingRequest::Play
        };
        self.pending = Some(request);
        ToggleOutcome::Requested(request)
    }

    /// Completion of a play request.
    pub fn on_play_resolved(&mut self, result: Result<(), MediaError>) {
        if !self.settle(PendingRequest::Play) {
            return;
        }
        match result {
            Ok(()) => self.state.is_playing = true,
            Err(err) => error!("error playing audio: {err}"),
        }
    }

    /// Completion of a pause request.
    pub fn on_pause_resolved(&mut self, result: Result<(), MediaError>) {
        if !self.settle(PendingRequest::Pause) {
            return;
        }
        match result {
            Ok(()) => self.state.is_playing = false,
            Err(err) => error!("error pausing audio: {err}"),
        }
    }

    /// Clear the pending slot if it holds `request`.
    fn settle(&mut self, request: PendingRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            warn!(
                "unexpected {request:?} completion while pending is {:?}",
                self.pending
            );
            false
        }
    }

    pub fn on_metadata_loaded(&mut self, info: &TrackInfo) {
        self.state.duration = info
            .duration_secs
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(0.0);
        if self.state.duration > 0.0 {
            self.state.current_time = self.clamp_time(self.state.current_time);
        }
        debug!("duration is {:.2}s", self.state.duration);
    }

    pub fn on_time_update(&mut self, position: f64) {
        if !position.is_finite() {
            return;
        }
        // Until the duration is known the reported position is taken as is
        self.state.current_time = if self.state.duration > 0.0 {
            self.clamp_time(position)
        } else {
            position.max(0.0)
        };
    }

    /// The resource reached the end of the source and stopped on its own.
    pub fn on_ended(&mut self) {
        self.state.is_playing = false;
        if self.state.duration > 0.0 {
            self.state.current_time = self.state.duration;
        }
    }

    /// Move to `target` seconds, clamped to the track. The local position is
    /// updated right away without waiting for the resource.
    pub fn seek<M: MediaResource + ?Sized>(&mut self, media: &mut M, target: f64) -> f64 {
        let target = if target.is_finite() { target } else { 0.0 };
        let target = self.clamp_time(target);
        media.set_position(target);
        self.state.current_time = target;
        target
    }

    pub fn seek_by<M: MediaResource + ?Sized>(&mut self, media: &mut M, delta: f64) -> f64 {
        self.seek(media, self.state.current_time + delta)
    }

    pub fn set_volume<M: MediaResource + ?Sized>(&mut self, media: &mut M, level: f32) {
        let Some(level) = clamp_volume(level) else {
            warn!("ignoring volume {level}");
            return;
        };
        self.state.volume = level;
        media.set_volume(level);
    }

    /// Nudge the volume by `delta`, snapping to the slider grid.
    pub fn adjust_volume<M: MediaResource + ?Sized>(&mut self, media: &mut M, delta: f32) {
        let steps = ((self.state.volume + delta) / VOLUME_STEP).round();
        self.set_volume(media, steps * VOLUME_STEP);
    }

    fn clamp_time(&self, secs: f64) -> f64 {
        secs.clamp(0.0, self.state.duration.max(0.0))
    }
}

fn clamp_volume(level: f32) -> Option<f32> {
    level.is_finite().then(|| level.clamp(0.0, 1.0))
}

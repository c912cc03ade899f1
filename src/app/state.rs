// src/app/state.rs
//! Application state: the player panel bound to one media resource.

use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Frame, style::Color};
use tracing::{debug, info};

use crate::{
    app::{
        equalizer::{BAR_COUNT, EqualizerAnimator},
        playback::{PlaybackController, PlaybackState, ToggleOutcome, VOLUME_STEP},
    },
    audio::{MediaEvent, MediaResource, TrackInfo},
    config::Config,
    ui::{
        keybindings::{PlayerAction, key_to_action},
        widgets::{PanelView, render_player_panel},
    },
};

/// Main application state.
pub struct App<M: MediaResource> {
    /// The media resource this panel drives
    media: M,
    /// Play/pause, transport and volume state
    controller: PlaybackController,
    /// Decorative equalizer
    equalizer: EqualizerAnimator,
    /// Tags reported with the metadata
    track: Option<TrackInfo>,
    rng: StdRng,
    seek_step: f64,
    accent: Color,
}

impl<M: MediaResource> App<M> {
    /// Create the panel around `media`.
    pub fn new(media: M, config: &Config) -> Self {
        Self::with_rng(media, config, StdRng::from_entropy())
    }

    /// Like [`App::new`] with a caller-supplied RNG for the equalizer.
    pub fn with_rng(media: M, config: &Config, rng: StdRng) -> Self {
        Self {
            media,
            controller: PlaybackController::new(config.initial_volume),
            equalizer: EqualizerAnimator::new(config.tick_interval()),
            track: None,
            rng,
            seek_step: config.seek_step_secs,
            accent: config.accent_color(),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        self.controller.state()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.pending().is_some()
    }

    pub fn track(&self) -> Option<&TrackInfo> {
        self.track.as_ref()
    }

    pub fn equalizer(&self) -> &EqualizerAnimator {
        &self.equalizer
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn toggle_play(&mut self) -> ToggleOutcome {
        self.controller.toggle_play(&mut self.media)
    }

    pub fn seek(&mut self, target: f64) -> f64 {
        self.controller.seek(&mut self.media, target)
    }

    pub fn set_volume(&mut self, level: f32) {
        self.controller.set_volume(&mut self.media, level);
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        match key_to_action(&key) {
            PlayerAction::TogglePlay => {
                self.toggle_play();
            }
            PlayerAction::SeekBackward => {
                self.controller.seek_by(&mut self.media, -self.seek_step);
            }
            PlayerAction::SeekForward => {
                self.controller.seek_by(&mut self.media, self.seek_step);
            }
            PlayerAction::SeekStart => {
                self.seek(0.0);
            }
            PlayerAction::SeekEnd => {
                let end = self.state().duration;
                self.seek(end);
            }
            PlayerAction::VolumeUp => {
                self.controller.adjust_volume(&mut self.media, VOLUME_STEP);
            }
            PlayerAction::VolumeDown => {
                self.controller.adjust_volume(&mut self.media, -VOLUME_STEP);
            }
            PlayerAction::Quit => return true,
            PlayerAction::None => {}
        }
        false
    }

    /// Drain pending media notifications. Returns how many were handled.
    pub fn process_media_events(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(event) = self.media.poll_event() {
            self.apply_event(event);
            handled += 1;
        }
        self.equalizer.sync(self.state().is_playing, now);
        handled
    }

    fn apply_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::MetadataLoaded(info) => {
                self.controller.on_metadata_loaded(&info);
                info!(
                    title = info.title.as_deref().unwrap_or("-"),
                    duration = self.state().duration,
                    "metadata loaded"
                );
                self.track = Some(info);
            }
            MediaEvent::TimeUpdate(position) => self.controller.on_time_update(position),
            MediaEvent::Ended => {
                debug!("playback ended");
                self.controller.on_ended();
            }
            MediaEvent::PlayResolved(result) => self.controller.on_play_resolved(result),
            MediaEvent::PauseResolved(result) => self.controller.on_pause_resolved(result),
        }
    }

    /// Fire the equalizer timer if due.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        self.equalizer.on_tick(now, &mut self.rng)
    }

    /// How long the event loop may sleep: until the equalizer's next tick, or
    /// `idle` when the equalizer is stopped.
    pub fn next_wakeup(&self, now: Instant, idle: Duration) -> Duration {
        match self.equalizer.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }

    /// Bar heights as drawn right now.
    pub fn bar_heights(&self) -> [f32; BAR_COUNT] {
        self.equalizer.rendered(self.state().is_playing)
    }

    /// Draw the application UI.
    pub fn draw(&self, f: &mut Frame<'_>, now: Instant) {
        let view = PanelView {
            state: self.state(),
            bars: self.bar_heights(),
            phase: self.equalizer.phase(now),
            track: self.track.as_ref(),
            pending: self.is_pending(),
            accent: self.accent,
        };
        render_player_panel(f, f.area(), &view);
    }

    /// Stop the equalizer timer before the panel goes away.
    pub fn shutdown(&mut self) {
        self.equalizer.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::app::equalizer::AnimatorState;
    use crate::audio::MediaError;

    /// Answers requests with queued results, the way a slow device would.
    #[derive(Default)]
    struct Scripted {
        events: VecDeque<MediaEvent>,
        play_results: VecDeque<Result<(), MediaError>>,
        positions: Vec<f64>,
        volumes: Vec<f32>,
    }

    impl MediaResource for Scripted {
        fn request_play(&mut self) {
            let result = self.play_results.pop_front().unwrap_or(Ok(()));
            self.events.push_back(MediaEvent::PlayResolved(result));
        }
        fn request_pause(&mut self) {
            self.events.push_back(MediaEvent::PauseResolved(Ok(())));
        }
        fn set_position(&mut self, secs: f64) {
            self.positions.push(secs);
        }
        fn set_volume(&mut self, level: f32) {
            self.volumes.push(level);
        }
        fn poll_event(&mut self) -> Option<MediaEvent> {
            self.events.pop_front()
        }
    }

    fn app() -> App<Scripted> {
        let mut media = Scripted::default();
        media.events.push_back(MediaEvent::MetadataLoaded(TrackInfo {
            duration_secs: Some(120.0),
            ..TrackInfo::default()
        }));
        let mut app = App::with_rng(media, &Config::default(), StdRng::seed_from_u64(5));
        app.process_media_events(Instant::now());
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn play_confirmation_starts_the_equalizer() {
        let mut app = app();
        assert_eq!(app.equalizer().state(), AnimatorState::Idle);

        app.on_key(key(KeyCode::Char(' ')));
        assert!(app.is_pending());
        assert!(!app.state().is_playing);

        app.process_media_events(Instant::now());
        assert!(app.state().is_playing);
        assert!(app.equalizer().is_animating());
    }

    #[test]
    fn rejected_play_keeps_equalizer_idle() {
        let mut app = app();
        app.media_mut()
            .play_results
            .push_back(Err(MediaError::Output("no device".into())));

        app.toggle_play();
        app.process_media_events(Instant::now());
        assert!(!app.state().is_playing);
        assert!(!app.equalizer().is_animating());
        assert!(!app.is_pending());
    }

    #[test]
    fn ended_stops_the_equalizer() {
        let mut app = app();
        app.toggle_play();
        app.process_media_events(Instant::now());

        app.media_mut().events.push_back(MediaEvent::Ended);
        app.process_media_events(Instant::now());
        assert!(!app.state().is_playing);
        assert_eq!(app.state().current_time, 120.0);
        assert_eq!(app.equalizer().next_deadline(), None);
    }

    #[test]
    fn seek_keys_move_by_step_and_jump_to_ends() {
        let mut app = app();
        app.on_key(key(KeyCode::Right));
        app.on_key(key(KeyCode::Right));
        assert_eq!(app.state().current_time, 10.0);
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.state().current_time, 5.0);
        app.on_key(key(KeyCode::End));
        assert_eq!(app.state().current_time, 120.0);
        app.on_key(key(KeyCode::Home));
        assert_eq!(app.media().positions, vec![5.0, 10.0, 5.0, 120.0, 0.0]);
    }

    #[test]
    fn volume_keys_step_by_a_tenth() {
        let mut app = app();
        app.on_key(key(KeyCode::Down));
        app.on_key(key(KeyCode::Down));
        assert!((app.state().volume - 0.8).abs() < 1e-6);
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.media().volumes.len(), 3);
    }

    #[test]
    fn quit_key_reports_quit() {
        let mut app = app();
        assert!(app.on_key(key(KeyCode::Char('q'))));
        assert!(!app.on_key(key(KeyCode::Char('x'))));
    }

    #[test]
    fn sleeps_until_next_tick_only_while_animating() {
        let mut app = app();
        let idle = Duration::from_millis(250);
        let now = Instant::now();
        assert_eq!(app.next_wakeup(now, idle), idle);

        app.toggle_play();
        app.process_media_events(now);
        assert_eq!(app.next_wakeup(now, idle), Duration::from_millis(100));

        app.shutdown();
        assert_eq!(app.next_wakeup(now, idle), idle);
    }
}

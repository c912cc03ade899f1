// src/app/equalizer.rs
//! Decorative equalizer: random bar magnitudes refreshed on a fixed timer
//! while playback runs. Nothing here looks at the audio signal.

use std::time::{Duration, Instant};

use rand::Rng;

/// Number of bars in the equalizer.
pub const BAR_COUNT: usize = 8;
/// Upper bound (exclusive) of a bar magnitude.
pub const MAX_MAGNITUDE: f32 = 100.0;
/// Phase offset between neighbouring bars' glow.
pub const BAR_STAGGER: Duration = Duration::from_millis(100);

/// Animator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Animating {
        /// When the animation (re)started, for the per-bar glow phase.
        since: Instant,
        /// Next scheduled regeneration.
        next_tick: Instant,
    },
}

#[derive(Debug, Clone)]
pub struct EqualizerAnimator {
    state: AnimatorState,
    interval: Duration,
    magnitudes: [f32; BAR_COUNT],
}

impl EqualizerAnimator {
    pub fn new(interval: Duration) -> Self {
        Self {
            state: AnimatorState::Idle,
            interval,
            magnitudes: [MAX_MAGNITUDE / 2.0; BAR_COUNT],
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimatorState::Animating { .. })
    }

    /// Stored magnitudes, whatever the state.
    pub fn magnitudes(&self) -> &[f32; BAR_COUNT] {
        &self.magnitudes
    }

    /// Enter `Animating` and arm the timer. No-op when already animating.
    pub fn start(&mut self, now: Instant) {
        if self.is_animating() {
            return;
        }
        self.state = AnimatorState::Animating {
            since: now,
            next_tick: now + self.interval,
        };
    }

    /// Return to `Idle`; the timer is disarmed.
    pub fn stop(&mut self) {
        self.state = AnimatorState::Idle;
    }

    /// Follow the playback flag.
    pub fn sync(&mut self, is_playing: bool, now: Instant) {
        if is_playing {
            self.start(now);
        } else {
            self.stop();
        }
    }

    /// When the timer next fires, or `None` while idle.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            AnimatorState::Idle => None,
            AnimatorState::Animating { next_tick, .. } => Some(next_tick),
        }
    }

    /// Fire the timer if due. Returns true when the bars were regenerated.
    ///
    /// Ticks missed while the loop was busy are coalesced into one.
    pub fn on_tick<R: Rng>(&mut self, now: Instant, rng: &mut R) -> bool {
        let AnimatorState::Animating { since, next_tick } = self.state else {
            return false;
        };
        if now < next_tick {
            return false;
        }

        self.regenerate(rng);

        let mut next_tick = next_tick + self.interval;
        if next_tick <= now {
            next_tick = now + self.interval;
        }
        self.state = AnimatorState::Animating { since, next_tick };
        true
    }

    fn regenerate<R: Rng>(&mut self, rng: &mut R) {
        for magnitude in self.magnitudes.iter_mut() {
            *magnitude = rng.gen_range(0.0..MAX_MAGNITUDE);
        }
    }

    /// Heights to draw: the stored magnitudes while playing, all 0 otherwise.
    pub fn rendered(&self, is_playing: bool) -> [f32; BAR_COUNT] {
        if is_playing && self.is_animating() {
            self.magnitudes
        } else {
            [0.0; BAR_COUNT]
        }
    }

    /// Time since the animation started, or `None` while idle. Drives the
    /// per-bar glow phase in the widget.
    pub fn phase(&self, now: Instant) -> Option<Duration> {
        match self.state {
            AnimatorState::Idle => None,
            AnimatorState::Animating { since, .. } => Some(now.saturating_duration_since(since)),
        }
    }
}

impl Default for EqualizerAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const TICK: Duration = Duration::from_millis(100);

    #[test]
    fn idle_has_no_deadline_and_ignores_ticks() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut eq = EqualizerAnimator::new(TICK);
        let before = *eq.magnitudes();

        assert_eq!(eq.next_deadline(), None);
        assert!(!eq.on_tick(Instant::now() + TICK * 5, &mut rng));
        assert_eq!(*eq.magnitudes(), before);
    }

    #[test]
    fn start_arms_the_timer() {
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        eq.start(now);
        assert_eq!(eq.next_deadline(), Some(now + TICK));

        // Restarting while animating keeps the schedule
        eq.start(now + TICK / 2);
        assert_eq!(eq.next_deadline(), Some(now + TICK));

        eq.stop();
        assert_eq!(eq.state(), AnimatorState::Idle);
        assert_eq!(eq.next_deadline(), None);
    }

    #[test]
    fn tick_before_deadline_does_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        eq.start(now);
        assert!(!eq.on_tick(now + TICK / 2, &mut rng));
    }

    #[test]
    fn every_tick_replaces_all_bars_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        eq.start(now);

        let mut previous = *eq.magnitudes();
        for n in 1..=20u32 {
            assert!(eq.on_tick(now + TICK * n, &mut rng));
            let current = *eq.magnitudes();
            assert!(current.iter().all(|m| (0.0..MAX_MAGNITUDE).contains(m)));
            assert!(current.iter().zip(previous.iter()).all(|(a, b)| a != b));
            previous = current;
        }
    }

    #[test]
    fn missed_ticks_are_coalesced() {
        let mut rng = StdRng::seed_from_u64(3);
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        eq.start(now);

        let late = now + TICK * 10;
        assert!(eq.on_tick(late, &mut rng));
        assert_eq!(eq.next_deadline(), Some(late + TICK));
        assert!(!eq.on_tick(late, &mut rng));
    }

    #[test]
    fn paused_bars_render_flat() {
        let mut rng = StdRng::seed_from_u64(9);
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        eq.start(now);
        eq.on_tick(now + TICK, &mut rng);
        assert!(eq.magnitudes().iter().any(|m| *m > 0.0));

        assert_eq!(eq.rendered(false), [0.0; BAR_COUNT]);
        eq.stop();
        assert_eq!(eq.rendered(true), [0.0; BAR_COUNT]);
    }

    #[test]
    fn playing_bars_show_every_magnitude_from_the_first_frame() {
        let mut rng = StdRng::seed_from_u64(11);
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        eq.start(now);
        eq.on_tick(now + TICK, &mut rng);

        assert_eq!(eq.rendered(true), *eq.magnitudes());
        assert!(eq.rendered(true).iter().all(|h| *h > 0.0));
    }

    #[test]
    fn phase_counts_from_start() {
        let now = Instant::now();
        let mut eq = EqualizerAnimator::new(TICK);
        assert_eq!(eq.phase(now), None);

        eq.start(now);
        assert_eq!(eq.phase(now + TICK * 3), Some(TICK * 3));
        eq.stop();
        assert_eq!(eq.phase(now + TICK), None);
    }
}

// src/app/mod.rs
//! Application module - panel state and logic.

pub mod equalizer;
pub mod playback;
pub mod state;

// Re-export the App struct
pub use equalizer::{AnimatorState, EqualizerAnimator};
pub use playback::{PendingRequest, PlaybackController, PlaybackState, ToggleOutcome};
pub use state::App;

// src/ui/widgets/mod.rs
//! Custom widgets for the neonplayer UI.

pub mod equalizer;
pub mod player_panel;

// Re-export widget rendering functions
pub use equalizer::EqualizerBars;
pub use player_panel::{PanelView, render_player_panel};

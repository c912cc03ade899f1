// src/lib.rs
//! neonplayer - a terminal audio player panel.
//!
//! Time readout, a decorative equalizer and play/pause/seek/volume controls
//! bound to a single audio file.

pub mod app;
pub mod audio;
pub mod config;
pub mod fs;
pub mod logging;
pub mod ui;

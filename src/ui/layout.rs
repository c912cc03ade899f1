// src/ui/layout.rs
//! Layout computation for the player panel.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the left display column (time readout over equalizer).
const DISPLAY_WIDTH: u16 = 26;

/// Computed areas for the panel, all inside its border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    /// Left column frame
    pub display: Rect,
    pub readout: Rect,
    pub bars: Rect,
    pub caption: Rect,
    /// Play/pause icon beside the seek gauge
    pub toggle: Rect,
    pub seek: Rect,
    pub volume_icon: Rect,
    pub volume: Rect,
    pub hints: Rect,
}

/// Split the panel's inner area into its sections.
pub fn compute_layout(inner: Rect) -> PanelLayout {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(DISPLAY_WIDTH),
            Constraint::Length(2),
            Constraint::Min(10),
        ])
        .split(inner);
    let (display, controls) = (columns[0], columns[2]);

    // Display block has its own border; split what is inside it
    let display_inner = Rect {
        x: display.x.saturating_add(1),
        y: display.y.saturating_add(1),
        width: display.width.saturating_sub(2),
        height: display.height.saturating_sub(2),
    };
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(display_inner);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(controls);

    let transport = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(right[1]);
    let volume = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(4), Constraint::Length(16), Constraint::Min(0)])
        .split(right[3]);

    PanelLayout {
        display,
        readout: left[0],
        bars: left[1],
        caption: right[0],
        toggle: transport[0],
        seek: transport[1],
        volume_icon: volume[0],
        volume: volume[1],
        hints: right[4],
    }
}

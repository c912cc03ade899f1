// src/ui/widgets/player_panel.rs
//! The player panel: time readout and equalizer on the left, transport and
//! volume controls on the right.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, LineGauge, Paragraph, Wrap},
};

use crate::app::equalizer::BAR_COUNT;
use crate::app::playback::PlaybackState;
use crate::audio::TrackInfo;
use crate::ui::format::format_time;
use crate::ui::keybindings::KEY_HINTS;
use crate::ui::layout::compute_layout;

use super::equalizer::EqualizerBars;

/// Everything the panel draws. The panel keeps no state of its own.
pub struct PanelView<'a> {
    pub state: &'a PlaybackState,
    /// Bar heights already gated by play state.
    pub bars: [f32; BAR_COUNT],
    /// Time since the equalizer started, for the staggered glow.
    pub phase: Option<Duration>,
    pub track: Option<&'a TrackInfo>,
    /// A play/pause request is in flight.
    pub pending: bool,
    pub accent: Color,
}

/// Render the player panel.
pub fn render_player_panel(f: &mut Frame<'_>, area: Rect, view: &PanelView<'_>) {
    let accent = Style::default().fg(view.accent);
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(accent)
        .title(" neonplayer ");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let layout = compute_layout(inner);
    let state = view.state;

    // Left: readout and bars
    f.render_widget(
        Block::default().borders(Borders::ALL).border_style(accent),
        layout.display,
    );
    f.render_widget(
        Paragraph::new(format_time(state.current_time))
            .style(accent.add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        layout.readout,
    );
    f.render_widget(
        EqualizerBars::new(&view.bars).style(accent).phase(view.phase),
        layout.bars,
    );

    // Right: caption
    let mut caption = vec![Line::from(Span::styled(
        format!(
            "YOU'RE AT {} SINCE THE START",
            format_time(state.current_time)
        ),
        accent,
    ))];
    if let Some(line) = view.track.and_then(track_line) {
        caption.push(Line::from(Span::styled(line, accent.add_modifier(Modifier::ITALIC))));
    }
    f.render_widget(Paragraph::new(caption).wrap(Wrap { trim: true }), layout.caption);

    // Transport
    let icon = if view.pending {
        " … "
    } else if state.is_playing {
        " ⏸ "
    } else {
        " ⏵ "
    };
    f.render_widget(
        Paragraph::new(Span::styled(icon, accent.add_modifier(Modifier::BOLD))),
        layout.toggle,
    );
    f.render_widget(
        LineGauge::default()
            .filled_style(accent)
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .line_set(symbols::line::THICK)
            .ratio(state.progress())
            .label(format!(
                "{} / {}",
                format_time(state.current_time),
                format_time(state.duration)
            )),
        layout.seek,
    );

    // Volume
    f.render_widget(Paragraph::new(Span::styled(" 🔊 ", accent)), layout.volume_icon);
    f.render_widget(
        LineGauge::default()
            .filled_style(accent)
            .unfilled_style(Style::default().fg(Color::DarkGray))
            .ratio(f64::from(state.volume).clamp(0.0, 1.0))
            .label(format!("{:>3}%", (state.volume * 100.0).round() as u32)),
        layout.volume,
    );

    f.render_widget(
        Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
        layout.hints,
    );
}

/// "Title - Artist", or whichever half is known.
fn track_line(track: &TrackInfo) -> Option<String> {
    match (&track.title, &track.artist) {
        (Some(title), Some(artist)) => Some(format!("{title} - {artist}")),
        (Some(title), None) => Some(title.clone()),
        (None, Some(artist)) => Some(artist.clone()),
        (None, None) => None,
    }
}

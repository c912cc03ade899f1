// src/ui/widgets/equalizer.rs
//! Equalizer bars drawn with block characters.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use crate::app::equalizer::{BAR_COUNT, BAR_STAGGER, MAX_MAGNITUDE};

/// Length of one glow on/off half-cycle.
const GLOW_HALF_PERIOD: Duration = Duration::from_millis(400);

/// Eighth-block glyphs, from one eighth to full.
const PARTIALS: [&str; 8] = ["▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Vertical bars sharing the area width, one per magnitude.
pub struct EqualizerBars<'a> {
    heights: &'a [f32; BAR_COUNT],
    style: Style,
    /// Time since the animation started; `None` disables the glow.
    phase: Option<Duration>,
}

impl<'a> EqualizerBars<'a> {
    pub fn new(heights: &'a [f32; BAR_COUNT]) -> Self {
        Self {
            heights,
            style: Style::default().fg(Color::Green),
            phase: None,
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn phase(mut self, phase: Option<Duration>) -> Self {
        self.phase = phase;
        self
    }
}

/// Whether bar `index` has its top cell lit at `phase`. Each bar runs the
/// same on/off cycle shifted by `index × BAR_STAGGER`; heights are untouched.
pub fn glows(index: usize, phase: Duration) -> bool {
    let shifted = phase.as_millis() + (BAR_STAGGER * index as u32).as_millis();
    (shifted / GLOW_HALF_PERIOD.as_millis()) % 2 == 0
}

impl Widget for EqualizerBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        // One column gap between bars, as wide as the area allows
        let gap = 1u16;
        let count = BAR_COUNT as u16;
        let bar_width = (area.width.saturating_sub(gap * (count - 1)) / count).max(1);
        let rows = area.height as usize;

        for (i, height) in self.heights.iter().enumerate() {
            let x0 = area.x + i as u16 * (bar_width + gap);
            if x0 >= area.right() {
                break;
            }
            // Height in eighths of a cell
            let fraction = (height / MAX_MAGNITUDE).clamp(0.0, 1.0);
            let eighths = (fraction * (rows * 8) as f32).round() as usize;

            for row_from_bottom in 0..rows {
                let filled = eighths.saturating_sub(row_from_bottom * 8).min(8);
                if filled == 0 {
                    break;
                }
                let y = area.bottom() - 1 - row_from_bottom as u16;
                let symbol = PARTIALS[filled - 1];
                let is_top = eighths <= (row_from_bottom + 1) * 8;
                let style = match self.phase {
                    Some(phase) if is_top && glows(i, phase) => self.style.add_modifier(Modifier::BOLD),
                    _ => self.style,
                };
                for x in x0..(x0 + bar_width).min(area.right()) {
                    buf[(x, y)].set_symbol(symbol).set_style(style);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(heights: &[f32; BAR_COUNT], area: Rect) -> Buffer {
        let mut buf = Buffer::empty(area);
        EqualizerBars::new(heights).render(area, &mut buf);
        buf
    }

    fn lit_cells(buf: &Buffer) -> usize {
        buf.content().iter().filter(|c| c.symbol() != " ").count()
    }

    #[test]
    fn zero_heights_draw_nothing() {
        let buf = draw(&[0.0; BAR_COUNT], Rect::new(0, 0, 23, 4));
        assert_eq!(lit_cells(&buf), 0);
    }

    #[test]
    fn full_bar_fills_its_column() {
        let mut heights = [0.0; BAR_COUNT];
        heights[0] = 99.99;
        let buf = draw(&heights, Rect::new(0, 0, 23, 4));

        for y in 0..4u16 {
            assert_eq!(buf[(0u16, y)].symbol(), "█");
            assert_eq!(buf[(1u16, y)].symbol(), "█");
            // gap column
            assert_eq!(buf[(2u16, y)].symbol(), " ");
        }
    }

    #[test]
    fn half_bar_fills_lower_half() {
        let mut heights = [0.0; BAR_COUNT];
        heights[7] = 50.0;
        let area = Rect::new(0, 0, 23, 4);
        let buf = draw(&heights, area);

        let x: u16 = 7 * 3;
        assert_eq!(buf[(x, 3u16)].symbol(), "█");
        assert_eq!(buf[(x, 2u16)].symbol(), "█");
        assert_eq!(buf[(x, 1u16)].symbol(), " ");
    }

    #[test]
    fn glow_is_shifted_per_bar() {
        // Bar 0 is lit for the first half-cycle, bar 4 starts 400ms later
        assert!(glows(0, Duration::ZERO));
        assert!(!glows(4, Duration::ZERO));
        assert!(!glows(0, GLOW_HALF_PERIOD));
        assert!(glows(4, GLOW_HALF_PERIOD));
    }

    #[test]
    fn glow_marks_top_cell_without_changing_height() {
        let heights = [50.0; BAR_COUNT];
        let area = Rect::new(0, 0, 23, 4);
        let mut buf = Buffer::empty(area);
        EqualizerBars::new(&heights)
            .phase(Some(Duration::ZERO))
            .render(area, &mut buf);

        let plain = draw(&heights, area);
        let symbols = |b: &Buffer| b.content().iter().map(|c| c.symbol().to_owned()).collect::<Vec<_>>();
        assert_eq!(symbols(&buf), symbols(&plain));
        // Bar 0 glows at phase 0: its top filled cell is bold, the one below is not
        assert!(buf[(0u16, 2u16)].modifier.contains(Modifier::BOLD));
        assert!(!buf[(0u16, 3u16)].modifier.contains(Modifier::BOLD));
        // Bar 4 is in its dark half-cycle
        assert!(!buf[(12u16, 2u16)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let buf = draw(&[80.0; BAR_COUNT], Rect::new(0, 0, 3, 1));
        assert!(lit_cells(&buf) > 0);
    }
}

// src/ui/keybindings.rs
//! Keyboard input handling and key mappings.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Panel actions derived from key events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerAction {
    TogglePlay,
    SeekBackward,
    SeekForward,
    SeekStart,
    SeekEnd,
    VolumeUp,
    VolumeDown,
    Quit,
    None,
}

/// Convert a key event to a panel action.
pub fn key_to_action(key: &KeyEvent) -> PlayerAction {
    // Key releases arrive on some platforms; only presses and repeats count
    if key.kind == KeyEventKind::Release {
        return PlayerAction::None;
    }

    match key.code {
        KeyCode::Char(' ') => PlayerAction::TogglePlay,
        KeyCode::Left => PlayerAction::SeekBackward,
        KeyCode::Right => PlayerAction::SeekForward,
        KeyCode::Home => PlayerAction::SeekStart,
        KeyCode::End => PlayerAction::SeekEnd,
        KeyCode::Up | KeyCode::Char('+') | KeyCode::Char('=') => PlayerAction::VolumeUp,
        KeyCode::Down | KeyCode::Char('-') => PlayerAction::VolumeDown,
        KeyCode::Char('q') | KeyCode::Esc => PlayerAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => PlayerAction::Quit,
        _ => PlayerAction::None,
    }
}

/// One-line key reference shown at the bottom of the panel.
pub const KEY_HINTS: &str = "space play/pause  ←/→ seek  ↑/↓ volume  q quit";

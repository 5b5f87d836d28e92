//! Simulated modal editing overlay.
//!
//! This is not a Vim engine: three mutually exclusive modes, changed only by
//! explicit chords through a fixed transition table.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Color;

use crate::editor::CursorStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalMode {
    #[default]
    Normal,
    Insert,
    Visual,
}

/// Chords that drive mode changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalChord {
    EnterInsert,
    EnterVisual,
    Cancel,
}

/// What the overlay wants done with a key after consulting the current mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Mode changed; the key is consumed.
    Transition(ModalMode),
    /// Move the cursor without editing.
    Move(Motion),
    /// Extend the selection (Visual mode).
    Select(Motion),
    /// Hand the key to the editor untouched.
    PassThrough,
    /// Swallow the key.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Down,
    Up,
    Right,
}

impl ModalMode {
    /// The transition table. Anything not listed leaves the mode unchanged.
    pub fn apply(self, chord: ModalChord) -> ModalMode {
        match (self, chord) {
            (_, ModalChord::Cancel) => ModalMode::Normal,
            (ModalMode::Normal, ModalChord::EnterInsert) => ModalMode::Insert,
            (ModalMode::Normal, ModalChord::EnterVisual) => ModalMode::Visual,
            (mode, _) => mode,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModalMode::Normal => "NORMAL",
            ModalMode::Insert => "INSERT",
            ModalMode::Visual => "VISUAL",
        }
    }

    pub fn indicator_color(self) -> Color {
        match self {
            ModalMode::Normal => Color::Rgb(74, 222, 128),
            ModalMode::Insert => Color::Rgb(96, 165, 250),
            ModalMode::Visual => Color::Rgb(248, 113, 113),
        }
    }

    pub fn cursor_style(self) -> CursorStyle {
        match self {
            ModalMode::Normal => CursorStyle::Block,
            ModalMode::Insert => CursorStyle::Line,
            ModalMode::Visual => CursorStyle::Underline,
        }
    }

    /// Decide what a key does in this mode.
    pub fn interpret(self, key: &KeyEvent) -> ModalAction {
        if let Some(chord) = chord_for(self, key) {
            return ModalAction::Transition(self.apply(chord));
        }
        match self {
            ModalMode::Insert => ModalAction::PassThrough,
            ModalMode::Normal => match motion_for(key) {
                Some(motion) => ModalAction::Move(motion),
                None if is_plain_char(key) => ModalAction::Ignore,
                None => ModalAction::PassThrough,
            },
            ModalMode::Visual => match motion_for(key) {
                Some(motion) => ModalAction::Select(motion),
                None if is_plain_char(key) => ModalAction::Ignore,
                None => ModalAction::PassThrough,
            },
        }
    }
}

fn is_plain_char(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char(_) | KeyCode::Enter | KeyCode::Tab | KeyCode::Backspace | KeyCode::Delete)
        && !key.modifiers.contains(KeyModifiers::CONTROL)
}

fn chord_for(mode: ModalMode, key: &KeyEvent) -> Option<ModalChord> {
    if key.code == KeyCode::Esc {
        return Some(ModalChord::Cancel);
    }
    if mode != ModalMode::Normal || !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return None;
    }
    match key.code {
        KeyCode::Char('i') => Some(ModalChord::EnterInsert),
        KeyCode::Char('v') => Some(ModalChord::EnterVisual),
        _ => None,
    }
}

fn motion_for(key: &KeyEvent) -> Option<Motion> {
    if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
        return None;
    }
    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Some(Motion::Left),
        KeyCode::Char('j') | KeyCode::Down => Some(Motion::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Motion::Up),
        KeyCode::Char('l') | KeyCode::Right => Some(Motion::Right),
        _ => None,
    }
}

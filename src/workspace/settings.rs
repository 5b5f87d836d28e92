//! Editor settings record and how it is pushed to the editing widget.

use crate::editor::{CursorStyle, EditorOptions, EditorSurface};
use crate::workspace::modal::ModalMode;
use crate::workspace::tabs::Language;

/// Allowed font sizes, in points.
pub const FONT_SIZES: [u16; 4] = [12, 14, 16, 18];
/// Allowed indentation widths.
pub const TAB_SIZES: [usize; 3] = [2, 4, 8];

pub const DEFAULT_FONT_SIZE: u16 = 14;
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Colour scheme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeKind {
    #[default]
    Dark,
    Light,
    HighContrast,
}

impl ThemeKind {
    /// Parse a config/CLI value. Unknown values are dark.
    pub fn from_name(s: &str) -> Self {
        match s {
            "light" => ThemeKind::Light,
            "high-contrast" | "high_contrast" | "hc" => ThemeKind::HighContrast,
            _ => ThemeKind::Dark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeKind::Dark => "Dark",
            ThemeKind::Light => "Light",
            ThemeKind::HighContrast => "High Contrast",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ThemeKind::Dark => ThemeKind::Light,
            ThemeKind::Light => ThemeKind::HighContrast,
            ThemeKind::HighContrast => ThemeKind::Dark,
        }
    }

    pub fn previous(&self) -> Self {
        self.next().next()
    }
}

/// Pick the allowed value closest to `value`; ties go to the smaller one.
fn nearest<T: Copy + Into<i64>>(allowed: &[T], value: T) -> T {
    let target: i64 = value.into();
    let mut best = allowed[0];
    for &candidate in allowed {
        if (candidate.into() - target).abs() < (best.into() - target).abs() {
            best = candidate;
        }
    }
    best
}

/// Step through `allowed` from `current`, clamped at both ends.
fn step<T: Copy + PartialEq>(allowed: &[T], current: T, delta: isize) -> T {
    let idx = allowed.iter().position(|v| *v == current).unwrap_or(0) as isize;
    let next = (idx + delta).clamp(0, allowed.len() as isize - 1) as usize;
    allowed[next]
}

/// User-facing editor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    theme: ThemeKind,
    font_size: u16,
    tab_size: usize,
    word_wrap: bool,
    minimap_visible: bool,
    modal_editing_enabled: bool,
    breathing_animation: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: ThemeKind::Dark,
            font_size: DEFAULT_FONT_SIZE,
            tab_size: DEFAULT_TAB_SIZE,
            word_wrap: false,
            minimap_visible: true,
            modal_editing_enabled: true,
            breathing_animation: true,
        }
    }
}

impl EditorSettings {
    pub fn theme(&self) -> ThemeKind {
        self.theme
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn word_wrap(&self) -> bool {
        self.word_wrap
    }

    pub fn minimap_visible(&self) -> bool {
        self.minimap_visible
    }

    pub fn modal_editing_enabled(&self) -> bool {
        self.modal_editing_enabled
    }

    pub fn breathing_animation(&self) -> bool {
        self.breathing_animation
    }

    pub fn set_theme(&mut self, theme: ThemeKind) {
        self.theme = theme;
    }

    /// Set the font size, snapping to the nearest allowed size.
    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = nearest(&FONT_SIZES, size);
    }

    /// Set the tab size, snapping to the nearest allowed width.
    pub fn set_tab_size(&mut self, size: usize) {
        let snapped = nearest(&TAB_SIZES.map(|s| s as u32), size.min(u32::MAX as usize) as u32);
        self.tab_size = snapped as usize;
    }

    pub fn set_word_wrap(&mut self, on: bool) {
        self.word_wrap = on;
    }

    pub fn set_minimap_visible(&mut self, on: bool) {
        self.minimap_visible = on;
    }

    pub fn set_modal_editing_enabled(&mut self, on: bool) {
        self.modal_editing_enabled = on;
    }

    pub fn set_breathing_animation(&mut self, on: bool) {
        self.breathing_animation = on;
    }

    pub fn cycle_theme(&mut self, forward: bool) {
        self.theme = if forward {
            self.theme.next()
        } else {
            self.theme.previous()
        };
    }

    pub fn step_font_size(&mut self, delta: isize) {
        self.font_size = step(&FONT_SIZES, self.font_size, delta);
    }

    pub fn step_tab_size(&mut self, delta: isize) {
        self.tab_size = step(&TAB_SIZES, self.tab_size, delta);
    }

    /// The complete widget configuration for the current state.
    pub fn options(&self, zen: bool, language: Language, mode: Option<ModalMode>) -> EditorOptions {
        EditorOptions {
            theme: self.theme,
            font_size: self.font_size,
            tab_size: self.tab_size,
            word_wrap: self.word_wrap,
            minimap: self.minimap_visible && !zen,
            language,
            line_numbers: !zen,
            highlight_current_line: !zen,
            cursor_style: mode.map(ModalMode::cursor_style).unwrap_or(CursorStyle::Line),
            vertical_padding: if zen { 1 } else { 0 },
        }
    }

    /// Push every field to the widget. There is no partial apply.
    pub fn apply(
        &self,
        zen: bool,
        language: Language,
        mode: Option<ModalMode>,
        widget: &mut impl EditorSurface,
    ) {
        let options = self.options(zen, language, mode);
        tracing::debug!(?options, "applying editor options");
        widget.apply_options(&options);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorState;

    #[test]
    fn defaults() {
        let s = EditorSettings::default();
        assert_eq!(s.theme(), ThemeKind::Dark);
        assert_eq!(s.font_size(), 14);
        assert_eq!(s.tab_size(), 4);
        assert!(!s.word_wrap());
        assert!(s.minimap_visible());
        assert!(s.modal_editing_enabled());
        assert!(s.breathing_animation());
    }

    #[test]
    fn font_size_snaps_to_allowed_set() {
        let mut s = EditorSettings::default();
        s.set_font_size(16);
        assert_eq!(s.font_size(), 16);
        s.set_font_size(3);
        assert_eq!(s.font_size(), 12);
        s.set_font_size(100);
        assert_eq!(s.font_size(), 18);
        s.set_font_size(15);
        assert_eq!(s.font_size(), 14);
    }

    #[test]
    fn tab_size_snaps_to_allowed_set() {
        let mut s = EditorSettings::default();
        s.set_tab_size(8);
        assert_eq!(s.tab_size(), 8);
        s.set_tab_size(0);
        assert_eq!(s.tab_size(), 2);
        s.set_tab_size(7);
        assert_eq!(s.tab_size(), 8);
        s.set_tab_size(3);
        assert_eq!(s.tab_size(), 2);
    }

    #[test]
    fn setters_are_idempotent() {
        let mut a = EditorSettings::default();
        a.set_word_wrap(true);
        a.set_theme(ThemeKind::Light);
        let snapshot = a.clone();
        a.set_word_wrap(true);
        a.set_theme(ThemeKind::Light);
        assert_eq!(a, snapshot);
    }

    #[test]
    fn stepping_clamps_at_ends() {
        let mut s = EditorSettings::default();
        s.step_font_size(1);
        s.step_font_size(1);
        s.step_font_size(1);
        assert_eq!(s.font_size(), 18);
        s.step_tab_size(-5);
        assert_eq!(s.tab_size(), 2);
    }

    #[test]
    fn theme_cycles_both_ways() {
        let mut s = EditorSettings::default();
        s.cycle_theme(true);
        assert_eq!(s.theme(), ThemeKind::Light);
        s.cycle_theme(false);
        s.cycle_theme(false);
        assert_eq!(s.theme(), ThemeKind::HighContrast);
    }

    #[test]
    fn theme_kind_parsing() {
        assert_eq!(ThemeKind::from_name("light"), ThemeKind::Light);
        assert_eq!(ThemeKind::from_name("high-contrast"), ThemeKind::HighContrast);
        assert_eq!(ThemeKind::from_name("neon"), ThemeKind::Dark);
    }

    #[test]
    fn zen_hides_chrome_in_options() {
        let s = EditorSettings::default();
        let normal = s.options(false, Language::TypeScript, Some(ModalMode::Normal));
        assert!(normal.minimap);
        assert!(normal.line_numbers);
        assert_eq!(normal.vertical_padding, 0);
        assert_eq!(normal.cursor_style, CursorStyle::Block);

        let zen = s.options(true, Language::TypeScript, None);
        assert!(!zen.minimap);
        assert!(!zen.line_numbers);
        assert!(!zen.highlight_current_line);
        assert_eq!(zen.vertical_padding, 1);
        assert_eq!(zen.cursor_style, CursorStyle::Line);
    }

    #[test]
    fn apply_reasserts_every_field() {
        let mut s = EditorSettings::default();
        s.set_word_wrap(true);
        s.set_tab_size(2);
        let mut editor = EditorState::new("x");
        s.apply(false, Language::Json, Some(ModalMode::Insert), &mut editor);
        assert_eq!(
            editor.options(),
            &s.options(false, Language::Json, Some(ModalMode::Insert))
        );

        // A second apply replaces the whole record, not just changed fields.
        s.set_word_wrap(false);
        s.apply(true, Language::Css, None, &mut editor);
        assert_eq!(editor.options(), &s.options(true, Language::Css, None));
    }
}

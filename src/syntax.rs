//! Syntax highlighting backed by syntect's bundled grammars and themes.

use ratatui::style::Color;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::workspace::settings::ThemeKind;
use crate::workspace::tabs::Language;

/// Bundled syntect theme used for each settings theme.
pub fn theme_name(kind: ThemeKind) -> &'static str {
    match kind {
        ThemeKind::Dark => "base16-ocean.dark",
        ThemeKind::Light => "InspiredGitHub",
        ThemeKind::HighContrast => "base16-eighties.dark",
    }
}

/// Convert syntect color to ratatui Color.
pub fn to_color(c: syntect::highlighting::Color) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Grammars plus the three themes, loaded once at startup.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    dark: Theme,
    light: Theme,
    high_contrast: Theme,
}

impl Highlighter {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_nonewlines();
        let mut themes = ThemeSet::load_defaults();
        let mut take = |kind: ThemeKind| {
            themes
                .themes
                .remove(theme_name(kind))
                .unwrap_or_default()
        };
        Self {
            dark: take(ThemeKind::Dark),
            light: take(ThemeKind::Light),
            high_contrast: take(ThemeKind::HighContrast),
            syntax_set,
        }
    }

    pub fn syntax_set(&self) -> &SyntaxSet {
        &self.syntax_set
    }

    /// Grammar for `language`, plain text when the bundle lacks it.
    pub fn syntax_for(&self, language: Language) -> &SyntaxReference {
        self.syntax_set
            .find_syntax_by_name(language.syntax_name())
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    pub fn theme_for(&self, kind: ThemeKind) -> &Theme {
        match kind {
            ThemeKind::Dark => &self.dark,
            ThemeKind::Light => &self.light,
            ThemeKind::HighContrast => &self.high_contrast,
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_exist() {
        let themes = ThemeSet::load_defaults();
        for kind in [ThemeKind::Dark, ThemeKind::Light, ThemeKind::HighContrast] {
            assert!(themes.themes.contains_key(theme_name(kind)), "{:?}", kind);
        }
    }

    #[test]
    fn languages_resolve_to_grammars() {
        let hl = Highlighter::new();
        assert_eq!(hl.syntax_for(Language::TypeScript).name, "JavaScript");
        assert_eq!(hl.syntax_for(Language::Json).name, "JSON");
        assert_eq!(hl.syntax_for(Language::Css).name, "CSS");
        assert_eq!(hl.syntax_for(Language::PlainText).name, "Plain Text");
    }

    #[test]
    fn themes_differ_per_kind() {
        let hl = Highlighter::new();
        assert_ne!(
            hl.theme_for(ThemeKind::Dark).name,
            hl.theme_for(ThemeKind::Light).name
        );
    }

    #[test]
    fn color_conversion() {
        let c = syntect::highlighting::Color {
            r: 1,
            g: 2,
            b: 3,
            a: 255,
        };
        assert_eq!(to_color(c), Color::Rgb(1, 2, 3));
    }
}

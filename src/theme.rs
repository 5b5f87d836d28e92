//! Theme data model: built-in palettes and JSON colour theme files.
//!
//! Three palettes match the three settings themes. A Monaco-style JSON theme
//! (`{ "base": "vs-dark", "colors": { "editor.background": "#011627" } }`) can
//! be loaded in the background and overlaid on the palette of its base kind.

use std::collections::HashMap;
use std::path::Path;

use ratatui::style::Color;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::workspace::settings::ThemeKind;

// ── Runtime theme colors ─────────────────────────────────────────────────────

/// All runtime colors used in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    // Sidebar
    pub sidebar_bg: Color,
    pub sidebar_fg: Color,
    pub sidebar_selected_bg: Color,
    pub sidebar_selected_fg: Color,
    pub sidebar_dir_fg: Color,
    pub sidebar_active_fg: Color,

    // Tab bar
    pub tab_bar_bg: Color,
    pub tab_active_bg: Color,
    pub tab_active_fg: Color,
    pub tab_inactive_fg: Color,

    // Editor
    pub editor_bg: Color,
    pub editor_fg: Color,
    pub editor_line_nr: Color,
    pub editor_line_nr_current: Color,
    pub editor_gutter_sep: Color,
    pub editor_cursor_fg: Color,
    pub editor_cursor_bg: Color,
    pub editor_current_line_bg: Color,
    pub editor_selection_bg: Color,
    pub minimap_fg: Color,
    pub minimap_viewport_bg: Color,

    // Status bar
    pub status_bg: Color,
    pub status_fg: Color,

    // Borders & overlays
    pub border_fg: Color,
    pub border_focused_fg: Color,
    pub dialog_bg: Color,
    pub dialog_border_fg: Color,
    pub dialog_selected_bg: Color,

    // Semantic colors
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub accent_fg: Color,
    pub dim_fg: Color,
}

// ── Built-in palettes ────────────────────────────────────────────────────────

/// Dark theme on a zinc base with blue accents.
pub fn dark_theme() -> ThemeColors {
    ThemeColors {
        sidebar_bg: Color::Rgb(24, 24, 27),          // #18181b (zinc-900)
        sidebar_fg: Color::Rgb(212, 212, 216),       // #d4d4d8 (zinc-300)
        sidebar_selected_bg: Color::Rgb(63, 63, 70), // #3f3f46 (zinc-700)
        sidebar_selected_fg: Color::Rgb(244, 244, 245),
        sidebar_dir_fg: Color::Rgb(161, 161, 170), // #a1a1aa (zinc-400)
        sidebar_active_fg: Color::Rgb(96, 165, 250), // #60a5fa (blue-400)

        tab_bar_bg: Color::Rgb(24, 24, 27),
        tab_active_bg: Color::Rgb(39, 39, 42), // #27272a (zinc-800)
        tab_active_fg: Color::Rgb(244, 244, 245),
        tab_inactive_fg: Color::Rgb(113, 113, 122), // #71717a (zinc-500)

        editor_bg: Color::Rgb(1, 22, 39),   // #011627
        editor_fg: Color::Rgb(214, 222, 235), // #d6deeb
        editor_line_nr: Color::Rgb(75, 100, 121),
        editor_line_nr_current: Color::Rgb(199, 146, 234),
        editor_gutter_sep: Color::Rgb(39, 39, 42),
        editor_cursor_fg: Color::Rgb(1, 22, 39),
        editor_cursor_bg: Color::Rgb(128, 164, 194),
        editor_current_line_bg: Color::Rgb(11, 37, 58),
        editor_selection_bg: Color::Rgb(29, 59, 83),
        minimap_fg: Color::Rgb(63, 63, 70),
        minimap_viewport_bg: Color::Rgb(39, 39, 42),

        status_bg: Color::Rgb(24, 24, 27),
        status_fg: Color::Rgb(161, 161, 170),

        border_fg: Color::Rgb(63, 63, 70),
        border_focused_fg: Color::Rgb(96, 165, 250),
        dialog_bg: Color::Rgb(39, 39, 42),
        dialog_border_fg: Color::Rgb(82, 82, 91), // #52525b (zinc-600)
        dialog_selected_bg: Color::Rgb(63, 63, 70),

        error_fg: Color::Rgb(248, 113, 113),   // red-400
        warning_fg: Color::Rgb(250, 204, 21),  // yellow-400
        success_fg: Color::Rgb(74, 222, 128),  // green-400
        accent_fg: Color::Rgb(96, 165, 250),   // blue-400
        dim_fg: Color::Rgb(113, 113, 122),
    }
}

/// Light theme on a zinc base.
pub fn light_theme() -> ThemeColors {
    ThemeColors {
        sidebar_bg: Color::Rgb(244, 244, 245),         // #f4f4f5 (zinc-100)
        sidebar_fg: Color::Rgb(63, 63, 70),            // zinc-700
        sidebar_selected_bg: Color::Rgb(212, 212, 216), // zinc-300
        sidebar_selected_fg: Color::Rgb(24, 24, 27),
        sidebar_dir_fg: Color::Rgb(82, 82, 91),
        sidebar_active_fg: Color::Rgb(37, 99, 235), // blue-600

        tab_bar_bg: Color::Rgb(244, 244, 245),
        tab_active_bg: Color::Rgb(255, 255, 255),
        tab_active_fg: Color::Rgb(24, 24, 27),
        tab_inactive_fg: Color::Rgb(113, 113, 122),

        editor_bg: Color::Rgb(255, 255, 255),
        editor_fg: Color::Rgb(39, 39, 42),
        editor_line_nr: Color::Rgb(161, 161, 170),
        editor_line_nr_current: Color::Rgb(37, 99, 235),
        editor_gutter_sep: Color::Rgb(228, 228, 231),
        editor_cursor_fg: Color::Rgb(255, 255, 255),
        editor_cursor_bg: Color::Rgb(39, 39, 42),
        editor_current_line_bg: Color::Rgb(244, 244, 245),
        editor_selection_bg: Color::Rgb(191, 219, 254), // blue-200
        minimap_fg: Color::Rgb(212, 212, 216),
        minimap_viewport_bg: Color::Rgb(228, 228, 231),

        status_bg: Color::Rgb(228, 228, 231),
        status_fg: Color::Rgb(63, 63, 70),

        border_fg: Color::Rgb(212, 212, 216),
        border_focused_fg: Color::Rgb(37, 99, 235),
        dialog_bg: Color::Rgb(250, 250, 250),
        dialog_border_fg: Color::Rgb(161, 161, 170),
        dialog_selected_bg: Color::Rgb(228, 228, 231),

        error_fg: Color::Rgb(220, 38, 38),
        warning_fg: Color::Rgb(202, 138, 4),
        success_fg: Color::Rgb(22, 163, 74),
        accent_fg: Color::Rgb(37, 99, 235),
        dim_fg: Color::Rgb(161, 161, 170),
    }
}

/// High-contrast theme: pure black, white text, yellow and cyan accents.
pub fn high_contrast_theme() -> ThemeColors {
    ThemeColors {
        sidebar_bg: Color::Black,
        sidebar_fg: Color::White,
        sidebar_selected_bg: Color::Rgb(0, 0, 160),
        sidebar_selected_fg: Color::White,
        sidebar_dir_fg: Color::Rgb(0, 255, 255),
        sidebar_active_fg: Color::Rgb(255, 255, 0),

        tab_bar_bg: Color::Black,
        tab_active_bg: Color::Rgb(0, 0, 160),
        tab_active_fg: Color::White,
        tab_inactive_fg: Color::Rgb(200, 200, 200),

        editor_bg: Color::Black,
        editor_fg: Color::White,
        editor_line_nr: Color::Rgb(200, 200, 200),
        editor_line_nr_current: Color::Rgb(255, 255, 0),
        editor_gutter_sep: Color::White,
        editor_cursor_fg: Color::Black,
        editor_cursor_bg: Color::Rgb(255, 255, 0),
        editor_current_line_bg: Color::Rgb(40, 40, 40),
        editor_selection_bg: Color::Rgb(0, 0, 160),
        minimap_fg: Color::Rgb(160, 160, 160),
        minimap_viewport_bg: Color::Rgb(60, 60, 60),

        status_bg: Color::Black,
        status_fg: Color::White,

        border_fg: Color::White,
        border_focused_fg: Color::Rgb(255, 255, 0),
        dialog_bg: Color::Black,
        dialog_border_fg: Color::Rgb(0, 255, 255),
        dialog_selected_bg: Color::Rgb(0, 0, 160),

        error_fg: Color::Rgb(255, 80, 80),
        warning_fg: Color::Rgb(255, 255, 0),
        success_fg: Color::Rgb(0, 255, 0),
        accent_fg: Color::Rgb(0, 255, 255),
        dim_fg: Color::Rgb(200, 200, 200),
    }
}

/// Built-in palette for a settings theme.
pub fn palette_for(kind: ThemeKind) -> ThemeColors {
    match kind {
        ThemeKind::Dark => dark_theme(),
        ThemeKind::Light => light_theme(),
        ThemeKind::HighContrast => high_contrast_theme(),
    }
}

// ── Color helpers ────────────────────────────────────────────────────────────

/// Parse `"#rrggbb"` or `"#rrggbbaa"` into a colour. Alpha is ignored.
/// Returns `None` for malformed input.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    if hex.len() == 8 {
        u8::from_str_radix(&hex[6..8], 16).ok()?;
    }
    Some(Color::Rgb(r, g, b))
}

/// Linear mix of two RGB colours, `t` in `[0, 1]`. Non-RGB colours snap at the midpoint.
pub fn blend(from: Color, to: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    match (from, to) {
        (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r1, r2), mix(g1, g2), mix(b1, b2))
        }
        _ if t < 0.5 => from,
        _ => to,
    }
}

// ── Theme files ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    base: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

/// A parsed colour theme file, ready to overlay on a built-in palette.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomTheme {
    pub name: String,
    /// The settings theme this file refines.
    pub base: ThemeKind,
    colors: HashMap<String, Color>,
}

fn base_kind(base: Option<&str>) -> ThemeKind {
    match base {
        Some("vs") | Some("light") => ThemeKind::Light,
        Some("hc-black") | Some("hc-light") => ThemeKind::HighContrast,
        _ => ThemeKind::Dark,
    }
}

impl CustomTheme {
    /// Parse theme JSON. Unknown keys and malformed colours are skipped.
    pub fn parse(json: &str, fallback_name: &str) -> Result<Self> {
        let file: ThemeFile =
            serde_json::from_str(json).map_err(|e| AppError::Theme(e.to_string()))?;
        let colors: HashMap<String, Color> = file
            .colors
            .iter()
            .filter_map(|(key, value)| parse_hex_color(value).map(|c| (key.clone(), c)))
            .collect();
        if colors.is_empty() {
            return Err(AppError::Theme("no usable colors".into()));
        }
        Ok(Self {
            name: file.name.unwrap_or_else(|| fallback_name.to_string()),
            base: base_kind(file.base.as_deref()),
            colors,
        })
    }

    pub fn color(&self, key: &str) -> Option<Color> {
        self.colors.get(key).copied()
    }

    /// Overlay the file's colours onto `theme`.
    pub fn apply(&self, theme: &mut ThemeColors) {
        let targets: [(&str, &mut Color); 20] = [
            ("editor.background", &mut theme.editor_bg),
            ("editor.foreground", &mut theme.editor_fg),
            ("editorLineNumber.foreground", &mut theme.editor_line_nr),
            ("editorLineNumber.activeForeground", &mut theme.editor_line_nr_current),
            ("editor.lineHighlightBackground", &mut theme.editor_current_line_bg),
            ("editor.selectionBackground", &mut theme.editor_selection_bg),
            ("editorCursor.foreground", &mut theme.editor_cursor_bg),
            ("editorGutter.background", &mut theme.editor_gutter_sep),
            ("sideBar.background", &mut theme.sidebar_bg),
            ("sideBar.foreground", &mut theme.sidebar_fg),
            ("list.activeSelectionBackground", &mut theme.sidebar_selected_bg),
            ("editorGroupHeader.tabsBackground", &mut theme.tab_bar_bg),
            ("tab.activeBackground", &mut theme.tab_active_bg),
            ("tab.activeForeground", &mut theme.tab_active_fg),
            ("tab.inactiveForeground", &mut theme.tab_inactive_fg),
            ("statusBar.background", &mut theme.status_bg),
            ("statusBar.foreground", &mut theme.status_fg),
            ("editorWidget.background", &mut theme.dialog_bg),
            ("editorWidget.border", &mut theme.dialog_border_fg),
            ("focusBorder", &mut theme.border_focused_fg),
        ];
        for (key, slot) in targets {
            if let Some(color) = self.color(key) {
                *slot = color;
            }
        }
    }
}

/// Read and parse a theme file without blocking the UI task.
pub async fn load_theme_file(path: &Path) -> Result<CustomTheme> {
    let json = tokio::fs::read_to_string(path).await?;
    let fallback = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "custom".to_string());
    CustomTheme::parse(&json, &fallback)
}

/// The palette in effect: built-in for `kind`, refined by `custom` when its base matches.
pub fn resolve_theme(kind: ThemeKind, custom: Option<&CustomTheme>) -> ThemeColors {
    let mut theme = palette_for(kind);
    if let Some(custom) = custom.filter(|c| c.base == kind) {
        custom.apply(&mut theme);
    }
    theme
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const NIGHT_OWL: &str = r##"{
        "name": "Night Owl",
        "base": "vs-dark",
        "inherit": true,
        "rules": [],
        "colors": {
            "editor.background": "#011627",
            "editor.foreground": "#d6deeb",
            "editor.selectionBackground": "#1d3b53",
            "statusBar.background": "#011627ff",
            "bogus.key": "#123456",
            "editorCursor.foreground": "not-a-color"
        }
    }"##;

    #[test]
    fn test_parse_hex_color_valid() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#1a1b26"), Some(Color::Rgb(26, 27, 38)));
        assert_eq!(parse_hex_color("ff0000"), Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn test_parse_hex_color_with_alpha() {
        assert_eq!(parse_hex_color("#01162780"), Some(Color::Rgb(1, 22, 39)));
        assert_eq!(parse_hex_color("#011627zz"), None);
    }

    #[test]
    fn test_parse_hex_color_invalid() {
        assert_eq!(parse_hex_color("#zzzzzz"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#ééé"), None);
    }

    #[test]
    fn test_palettes_differ() {
        let dark = dark_theme();
        let light = light_theme();
        let hc = high_contrast_theme();
        assert_ne!(dark.editor_bg, light.editor_bg);
        assert_ne!(dark.editor_bg, hc.editor_bg);
        assert_eq!(palette_for(ThemeKind::Light), light);
    }

    #[test]
    fn test_blend() {
        let a = Color::Rgb(0, 0, 0);
        let b = Color::Rgb(200, 100, 50);
        assert_eq!(blend(a, b, 0.0), a);
        assert_eq!(blend(a, b, 1.0), b);
        assert_eq!(blend(a, b, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(blend(Color::Reset, b, 0.2), Color::Reset);
    }

    #[test]
    fn test_parse_theme_file() {
        let theme = CustomTheme::parse(NIGHT_OWL, "night-owl").expect("parse");
        assert_eq!(theme.name, "Night Owl");
        assert_eq!(theme.base, ThemeKind::Dark);
        assert_eq!(theme.color("editor.background"), Some(Color::Rgb(1, 22, 39)));
        assert_eq!(theme.color("statusBar.background"), Some(Color::Rgb(1, 22, 39)));
        assert_eq!(theme.color("editorCursor.foreground"), None);
    }

    #[test]
    fn test_parse_rejects_bad_json_and_empty_colors() {
        assert!(matches!(
            CustomTheme::parse("{ not json", "x"),
            Err(AppError::Theme(_))
        ));
        assert!(matches!(
            CustomTheme::parse(r#"{ "base": "vs", "colors": {} }"#, "x"),
            Err(AppError::Theme(_))
        ));
    }

    #[test]
    fn test_overlay_only_for_matching_base() {
        let custom = CustomTheme::parse(NIGHT_OWL, "night-owl").expect("parse");
        let dark = resolve_theme(ThemeKind::Dark, Some(&custom));
        assert_eq!(dark.editor_selection_bg, Color::Rgb(29, 59, 83));
        assert_eq!(dark.status_bg, Color::Rgb(1, 22, 39));
        // Unmapped keys leave the palette alone.
        assert_eq!(dark.editor_cursor_bg, dark_theme().editor_cursor_bg);

        let light = resolve_theme(ThemeKind::Light, Some(&custom));
        assert_eq!(light, light_theme());
    }

    #[tokio::test]
    async fn test_load_theme_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("night-owl.json");
        std::fs::write(&path, r##"{ "base": "vs", "colors": { "editor.background": "#fbfbfb" } }"##)
            .expect("write");
        let theme = load_theme_file(&path).await.expect("load");
        assert_eq!(theme.name, "night-owl");
        assert_eq!(theme.base, ThemeKind::Light);
    }

    #[tokio::test]
    async fn test_load_missing_theme_file_is_io_error() {
        let result = load_theme_file(Path::new("/nonexistent/theme.json")).await;
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}

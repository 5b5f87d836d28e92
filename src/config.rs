//! Application configuration: TOML file loading, CLI overrides, and defaults.
//!
//! Resolution order (first found wins, values merge/override):
//! 1. CLI flags (`--theme`, `--no-minimap`, `--zen`, etc.)
//! 2. Explicit `--config <path>`
//! 3. `$ZEN_EDITOR_CONFIG` environment variable (path to config file)
//! 4. Project-local `.zen-editor.toml` in the current working directory
//! 5. Global `~/.config/zen-editor/config.toml`
//! 6. Built-in defaults

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::workspace::quick_access::QuickAccess;
use crate::workspace::settings::{EditorSettings, ThemeKind, DEFAULT_FONT_SIZE, DEFAULT_TAB_SIZE};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "ZEN_EDITOR_CONFIG";

// ── Section configs ──────────────────────────────────────────────────────────

/// Editor settings as written in `[editor]`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct EditorConfig {
    /// "dark", "light" or "high-contrast".
    pub theme: Option<String>,
    pub font_size: Option<u16>,
    pub tab_size: Option<usize>,
    pub word_wrap: Option<bool>,
    pub minimap: Option<bool>,
    pub modal_editing: Option<bool>,
    pub breathing_animation: Option<bool>,
}

/// Startup layout, `[layout]`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub show_sidebar: Option<bool>,
    /// Start in zen mode.
    pub zen: Option<bool>,
    /// Enable mouse support.
    pub mouse: Option<bool>,
}

/// Optional colour theme file, `[theme]`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    /// Path to a JSON colour theme.
    pub file: Option<PathBuf>,
}

/// Pinned files, `[quick_access]`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QuickAccessConfig {
    pub paths: Option<Vec<String>>,
}

// ── Top-level config ─────────────────────────────────────────────────────────

/// Top-level application configuration.
///
/// All fields are optional so that partial configs from different sources
/// can be merged together (CLI overrides file, file overrides defaults).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub editor: EditorConfig,
    pub layout: LayoutConfig,
    pub theme: ThemeConfig,
    pub quick_access: QuickAccessConfig,
}

// ── Config file locator ──────────────────────────────────────────────────────

/// Candidate config file paths, highest priority first.
///
/// Does NOT include the CLI `--config` path; that is handled separately.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        paths.push(PathBuf::from(env_path));
    }

    if let Ok(cwd) = std::env::current_dir() {
        paths.push(cwd.join(".zen-editor.toml"));
    }

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("zen-editor").join("config.toml"));
    }

    paths
}

/// Read and parse a TOML config file. Missing files are skipped quietly;
/// unparsable ones are skipped with a warning.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    match AppConfig::parse(&content) {
        Ok(cfg) => {
            tracing::debug!(path = %path.display(), "loaded config file");
            Some(cfg)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
            None
        }
    }
}

// ── Merge logic ──────────────────────────────────────────────────────────────

impl AppConfig {
    /// Parse a TOML document.
    pub fn parse(content: &str) -> Result<AppConfig> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Merge `other` on top of `self`; `other`'s `Some` values win.
    pub fn merge(self, other: &AppConfig) -> AppConfig {
        AppConfig {
            editor: EditorConfig {
                theme: other.editor.theme.clone().or(self.editor.theme),
                font_size: other.editor.font_size.or(self.editor.font_size),
                tab_size: other.editor.tab_size.or(self.editor.tab_size),
                word_wrap: other.editor.word_wrap.or(self.editor.word_wrap),
                minimap: other.editor.minimap.or(self.editor.minimap),
                modal_editing: other.editor.modal_editing.or(self.editor.modal_editing),
                breathing_animation: other
                    .editor
                    .breathing_animation
                    .or(self.editor.breathing_animation),
            },
            layout: LayoutConfig {
                show_sidebar: other.layout.show_sidebar.or(self.layout.show_sidebar),
                zen: other.layout.zen.or(self.layout.zen),
                mouse: other.layout.mouse.or(self.layout.mouse),
            },
            theme: ThemeConfig {
                file: other.theme.file.clone().or(self.theme.file),
            },
            quick_access: QuickAccessConfig {
                paths: other.quick_access.paths.clone().or(self.quick_access.paths),
            },
        }
    }

    /// Load the final merged configuration.
    ///
    /// `cli_config_path` is an explicit config file path from `--config`.
    /// `cli_overrides` are partial overrides derived from CLI flags.
    pub fn load(cli_config_path: Option<&Path>, cli_overrides: Option<&AppConfig>) -> AppConfig {
        let mut config = AppConfig::default();

        // Lowest priority first so higher ones overwrite.
        for path in candidate_paths().iter().rev() {
            if let Some(file_cfg) = load_file(path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(cli_path) = cli_config_path {
            if let Some(file_cfg) = load_file(cli_path) {
                config = config.merge(&file_cfg);
            }
        }

        if let Some(overrides) = cli_overrides {
            config = config.merge(overrides);
        }

        config
    }

    // ── Convenience getters with built-in defaults ──────────────────────────

    pub fn theme_kind(&self) -> ThemeKind {
        self.editor
            .theme
            .as_deref()
            .map(ThemeKind::from_name)
            .unwrap_or_default()
    }

    pub fn font_size(&self) -> u16 {
        self.editor.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn tab_size(&self) -> usize {
        self.editor.tab_size.unwrap_or(DEFAULT_TAB_SIZE)
    }

    pub fn word_wrap(&self) -> bool {
        self.editor.word_wrap.unwrap_or(false)
    }

    pub fn minimap(&self) -> bool {
        self.editor.minimap.unwrap_or(true)
    }

    pub fn modal_editing(&self) -> bool {
        self.editor.modal_editing.unwrap_or(true)
    }

    pub fn breathing_animation(&self) -> bool {
        self.editor.breathing_animation.unwrap_or(true)
    }

    pub fn show_sidebar(&self) -> bool {
        self.layout.show_sidebar.unwrap_or(true)
    }

    pub fn start_in_zen(&self) -> bool {
        self.layout.zen.unwrap_or(false)
    }

    pub fn mouse_enabled(&self) -> bool {
        self.layout.mouse.unwrap_or(true)
    }

    pub fn theme_file(&self) -> Option<&Path> {
        self.theme.file.as_deref()
    }

    /// The editor settings record. Out-of-domain sizes snap to the nearest allowed value.
    pub fn editor_settings(&self) -> EditorSettings {
        let mut settings = EditorSettings::default();
        settings.set_theme(self.theme_kind());
        settings.set_font_size(self.font_size());
        settings.set_tab_size(self.tab_size());
        settings.set_word_wrap(self.word_wrap());
        settings.set_minimap_visible(self.minimap());
        settings.set_modal_editing_enabled(self.modal_editing());
        settings.set_breathing_animation(self.breathing_animation());
        settings
    }

    pub fn quick_access(&self) -> QuickAccess {
        match &self.quick_access.paths {
            Some(paths) => QuickAccess::from_paths(paths),
            None => QuickAccess::default(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

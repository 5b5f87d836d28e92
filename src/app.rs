use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::editor::{CursorStyle, EditorState, EditorSurface};
use crate::error::Result;
use crate::syntax::Highlighter;
use crate::theme::{resolve_theme, CustomTheme, ThemeColors};
use crate::workspace::modal::ModalMode;
use crate::workspace::palette::PaletteCommand;
use crate::workspace::quick_access::{QuickAccess, SLOT_COUNT};
use crate::workspace::settings::EditorSettings;
use crate::workspace::tree::NodeKind;
use crate::workspace::Workspace;

/// Terminals narrower than this hide the sidebar.
pub const NARROW_WIDTH: u16 = 80;
/// How long a status message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);
/// Delay before the palette input takes the terminal cursor.
pub const PALETTE_FOCUS_DELAY: Duration = Duration::from_millis(100);
/// Length of one breathing cycle of the zen indicator.
const BREATH_PERIOD: Duration = Duration::from_millis(2000);

/// Which pane receives keys when no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Editor,
    Sidebar,
}

/// The overlay drawn on top of the editor, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Palette,
    Settings,
    Help,
}

/// One row of the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsRow {
    Theme,
    FontSize,
    TabSize,
    WordWrap,
    Minimap,
    ModalEditing,
    Breathing,
    QuickAccess(usize),
    Save,
}

impl SettingsRow {
    pub const ALL: [SettingsRow; 12] = [
        SettingsRow::Theme,
        SettingsRow::FontSize,
        SettingsRow::TabSize,
        SettingsRow::WordWrap,
        SettingsRow::Minimap,
        SettingsRow::ModalEditing,
        SettingsRow::Breathing,
        SettingsRow::QuickAccess(0),
        SettingsRow::QuickAccess(1),
        SettingsRow::QuickAccess(2),
        SettingsRow::QuickAccess(3),
        SettingsRow::Save,
    ];

    pub fn label(&self) -> String {
        match self {
            SettingsRow::Theme => "Theme".into(),
            SettingsRow::FontSize => "Font Size".into(),
            SettingsRow::TabSize => "Tab Size".into(),
            SettingsRow::WordWrap => "Word Wrap".into(),
            SettingsRow::Minimap => "Show Minimap".into(),
            SettingsRow::ModalEditing => "Modal Editing".into(),
            SettingsRow::Breathing => "Breathing Animation".into(),
            SettingsRow::QuickAccess(slot) => format!("Quick Access {}", slot + 1),
            SettingsRow::Save => "Save Settings".into(),
        }
    }
}

/// Uncommitted copy of the settings being edited in the panel.
#[derive(Debug, Clone)]
pub struct SettingsDraft {
    pub settings: EditorSettings,
    pub quick_access: QuickAccess,
    pub selected: usize,
}

impl SettingsDraft {
    pub fn new(settings: EditorSettings, quick_access: QuickAccess) -> Self {
        Self {
            settings,
            quick_access,
            selected: 0,
        }
    }

    pub fn row(&self) -> SettingsRow {
        SettingsRow::ALL[self.selected.min(SettingsRow::ALL.len() - 1)]
    }

    /// Move the row cursor, clamped.
    pub fn move_selection(&mut self, delta: isize) {
        let max = SettingsRow::ALL.len() as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    /// Change the focused value. Booleans toggle for any `delta`.
    pub fn adjust(&mut self, delta: isize) {
        let row = self.row();
        let s = &mut self.settings;
        match row {
            SettingsRow::Theme => s.cycle_theme(delta >= 0),
            SettingsRow::FontSize => s.step_font_size(delta),
            SettingsRow::TabSize => s.step_tab_size(delta),
            SettingsRow::WordWrap => s.set_word_wrap(!s.word_wrap()),
            SettingsRow::Minimap => s.set_minimap_visible(!s.minimap_visible()),
            SettingsRow::ModalEditing => s.set_modal_editing_enabled(!s.modal_editing_enabled()),
            SettingsRow::Breathing => s.set_breathing_animation(!s.breathing_animation()),
            SettingsRow::QuickAccess(_) | SettingsRow::Save => {}
        }
    }

    /// Append to the focused quick-access path. Other rows ignore text.
    pub fn insert_char(&mut self, c: char) {
        if let SettingsRow::QuickAccess(slot) = self.row() {
            let mut path = self.quick_access.get(slot).unwrap_or_default().to_string();
            path.push(c);
            self.quick_access.set(slot, &path);
        }
    }

    pub fn delete_char(&mut self) {
        if let SettingsRow::QuickAccess(slot) = self.row() {
            let mut path = self.quick_access.get(slot).unwrap_or_default().to_string();
            path.pop();
            self.quick_access.set(slot, &path);
        }
    }

    /// Display text for a row's current value.
    pub fn value_label(&self, row: SettingsRow) -> String {
        let on_off = |b: bool| if b { "On" } else { "Off" }.to_string();
        let s = &self.settings;
        match row {
            SettingsRow::Theme => s.theme().label().to_string(),
            SettingsRow::FontSize => format!("{}px", s.font_size()),
            SettingsRow::TabSize => format!("{} spaces", s.tab_size()),
            SettingsRow::WordWrap => on_off(s.word_wrap()),
            SettingsRow::Minimap => on_off(s.minimap_visible()),
            SettingsRow::ModalEditing => on_off(s.modal_editing_enabled()),
            SettingsRow::Breathing => on_off(s.breathing_animation()),
            SettingsRow::QuickAccess(slot) => {
                self.quick_access.get(slot).unwrap_or_default().to_string()
            }
            SettingsRow::Save => String::new(),
        }
    }
}

/// Screen regions from the last draw, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct LayoutAreas {
    pub sidebar: Option<Rect>,
    /// Clickable tab labels and the path each one activates.
    pub tabs: Vec<(Rect, String)>,
    /// Text area of the editor, right of the gutter.
    pub editor: Rect,
    /// Buffer line and starting char of each drawn editor row.
    pub editor_rows: Vec<(usize, usize)>,
    /// Clickable quick-access dots and their slot.
    pub quick_access: Vec<(Rect, usize)>,
}

/// Main application state.
pub struct App {
    pub workspace: Workspace,
    pub editor: EditorState,
    pub highlighter: Highlighter,
    pub colors: ThemeColors,
    pub custom_theme: Option<CustomTheme>,
    pub mode: ModalMode,
    pub focus: Focus,
    pub overlay: Overlay,
    pub settings_draft: Option<SettingsDraft>,
    pub sidebar_visible: bool,
    pub zen: bool,
    pub should_quit: bool,
    pub status_message: Option<(String, Instant)>,
    pub layout: LayoutAreas,
    pub width: u16,
    started: Instant,
    /// Path whose content is currently in the editor.
    loaded_path: Option<String>,
    /// Editor revision last written back to the content cache.
    synced_revision: u64,
}

impl App {
    pub fn new(config: &AppConfig) -> Self {
        let workspace = Workspace::new(config.editor_settings(), config.quick_access());
        let colors = resolve_theme(workspace.settings.theme(), None);
        let mut app = Self {
            workspace,
            editor: EditorState::new(""),
            highlighter: Highlighter::new(),
            colors,
            custom_theme: None,
            mode: ModalMode::Normal,
            focus: Focus::Editor,
            overlay: Overlay::None,
            settings_draft: None,
            sidebar_visible: config.show_sidebar(),
            zen: false,
            should_quit: false,
            status_message: None,
            layout: LayoutAreas::default(),
            width: u16::MAX,
            started: Instant::now(),
            loaded_path: None,
            synced_revision: 0,
        };
        if config.start_in_zen() {
            app.toggle_zen();
        }
        app.sync_editor();
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    // ── Editor synchronisation ──────────────────────────────────────────────

    /// The overlay mode, or `None` while modal editing is disabled.
    pub fn modal_mode(&self) -> Option<ModalMode> {
        self.workspace
            .settings
            .modal_editing_enabled()
            .then_some(self.mode)
    }

    /// Push the full options record to the editor and refresh the palette.
    pub fn apply_settings(&mut self) {
        let language = self.workspace.active_language();
        let mode = self.modal_mode();
        self.workspace
            .settings
            .apply(self.zen, language, mode, &mut self.editor);
        self.colors = resolve_theme(self.workspace.settings.theme(), self.custom_theme.as_ref());
    }

    /// Load the active file into the editor when it changed.
    pub fn sync_editor(&mut self) {
        let active = self.workspace.active_file().map(str::to_string);
        if active == self.loaded_path {
            return;
        }
        let text = active
            .as_deref()
            .map(|p| self.workspace.get_content(p))
            .unwrap_or_default();
        self.editor.set_value(&text);
        self.editor.clear_selection();
        if self.mode == ModalMode::Visual {
            self.mode = ModalMode::Normal;
        }
        self.synced_revision = self.editor.revision();
        if let Some(path) = active.as_deref() {
            self.workspace.tree.select_path(path);
        }
        self.loaded_path = active;
        self.apply_settings();
    }

    /// Write editor text back to the content cache after a change.
    pub fn commit_edits(&mut self) {
        let revision = self.editor.revision();
        if revision == self.synced_revision {
            return;
        }
        if let Some(path) = self.loaded_path.as_deref() {
            self.workspace.set_content(path, &self.editor.value());
        }
        self.synced_revision = revision;
    }

    pub fn cursor_style(&self) -> CursorStyle {
        self.editor.options().cursor_style
    }

    // ── Files and tabs ──────────────────────────────────────────────────────

    pub fn open_file(&mut self, path: &str) -> bool {
        self.commit_edits();
        let opened = self.workspace.open(path);
        if opened {
            self.sync_editor();
        } else {
            self.set_status_message(format!("Not in project: {}", path));
        }
        opened
    }

    pub fn close_tab(&mut self, path: &str) {
        self.commit_edits();
        self.workspace.close(path);
        self.sync_editor();
    }

    pub fn close_active_tab(&mut self) {
        if let Some(path) = self.workspace.active_file().map(str::to_string) {
            self.close_tab(&path);
        }
    }

    pub fn activate_tab(&mut self, path: &str) {
        self.commit_edits();
        if self.workspace.activate(path) {
            self.sync_editor();
        }
    }

    pub fn cycle_tab(&mut self, forward: bool) {
        self.commit_edits();
        if forward {
            self.workspace.next_tab();
        } else {
            self.workspace.previous_tab();
        }
        self.sync_editor();
    }

    pub fn quick_jump(&mut self, slot: usize) {
        if slot >= SLOT_COUNT {
            return;
        }
        self.commit_edits();
        if self.workspace.quick_jump(slot) {
            self.sync_editor();
        } else {
            let path = self.workspace.quick_access.get(slot).unwrap_or_default();
            self.set_status_message(format!("Not in project: {}", path));
        }
    }

    // ── Layout ──────────────────────────────────────────────────────────────

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_visible = !self.sidebar_visible;
        if !self.sidebar_visible {
            self.focus = Focus::Editor;
        }
        tracing::debug!(visible = self.sidebar_visible, "toggled sidebar");
    }

    pub fn focus_sidebar(&mut self) {
        self.sidebar_visible = true;
        self.focus = Focus::Sidebar;
        if let Some(path) = self.workspace.active_file().map(str::to_string) {
            self.workspace.tree.select_path(&path);
        }
    }

    /// Entering zen hides the sidebar; leaving it does not bring it back.
    pub fn toggle_zen(&mut self) {
        self.zen = !self.zen;
        if self.zen {
            self.sidebar_visible = false;
            self.focus = Focus::Editor;
        }
        tracing::debug!(zen = self.zen, "toggled zen mode");
        self.apply_settings();
    }

    pub fn handle_resize(&mut self, width: u16, _height: u16) {
        self.width = width;
        if width < NARROW_WIDTH && self.sidebar_visible {
            self.sidebar_visible = false;
            self.focus = Focus::Editor;
            tracing::debug!(width, "narrow terminal, hiding sidebar");
        }
    }

    pub fn is_narrow(&self) -> bool {
        self.width < NARROW_WIDTH
    }

    /// Act on the sidebar row under the cursor: folders toggle, files open.
    pub fn sidebar_activate(&mut self) {
        let Some(row) = self.workspace.tree.selected_row() else {
            return;
        };
        match row.kind {
            NodeKind::Folder => self.workspace.toggle_folder(&row.path),
            NodeKind::File => {
                if self.open_file(&row.path) {
                    self.focus = Focus::Editor;
                    if self.is_narrow() {
                        self.sidebar_visible = false;
                    }
                }
            }
        }
    }

    // ── Modal overlay ───────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: ModalMode) {
        if self.mode == mode {
            return;
        }
        if self.mode == ModalMode::Visual {
            self.editor.clear_selection();
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "modal transition");
        self.mode = mode;
        self.apply_settings();
    }

    // ── Palette ─────────────────────────────────────────────────────────────

    /// Show the palette. Returns the generation for the deferred focus event.
    pub fn open_palette(&mut self) -> u64 {
        self.overlay = Overlay::Palette;
        self.workspace.open_palette()
    }

    pub fn close_palette(&mut self) {
        self.workspace.close_palette();
        self.overlay = Overlay::None;
    }

    pub fn palette_focus(&mut self, generation: u64) {
        self.workspace.palette.focus(generation);
    }

    pub fn confirm_palette(&mut self) {
        self.commit_edits();
        if let Some(path) = self.workspace.confirm_selection() {
            tracing::debug!(path = %path, "opened from palette");
            self.overlay = Overlay::None;
            self.focus = Focus::Editor;
            self.sync_editor();
        }
    }

    pub fn run_palette_command(&mut self, command: PaletteCommand) {
        self.close_palette();
        match command {
            PaletteCommand::ToggleZenMode => self.toggle_zen(),
            PaletteCommand::ToggleFileExplorer => self.toggle_sidebar(),
        }
    }

    // ── Settings panel ──────────────────────────────────────────────────────

    pub fn open_settings(&mut self) {
        if self.overlay == Overlay::Palette {
            self.close_palette();
        }
        self.settings_draft = Some(SettingsDraft::new(
            self.workspace.settings.clone(),
            self.workspace.quick_access.clone(),
        ));
        self.overlay = Overlay::Settings;
    }

    /// Commit the draft and push it to the editor.
    pub fn save_settings(&mut self) {
        let Some(draft) = self.settings_draft.take() else {
            return;
        };
        self.workspace.settings = draft.settings;
        self.workspace.quick_access = draft.quick_access;
        if !self.workspace.settings.modal_editing_enabled() {
            self.editor.clear_selection();
            self.mode = ModalMode::Normal;
        }
        self.overlay = Overlay::None;
        self.apply_settings();
        tracing::info!(settings = ?self.workspace.settings, "settings saved");
        self.set_status_message("Settings saved".to_string());
    }

    pub fn discard_settings(&mut self) {
        self.settings_draft = None;
        self.overlay = Overlay::None;
    }

    // ── Help ────────────────────────────────────────────────────────────────

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Overlay::Help => Overlay::None,
            _ => Overlay::Help,
        };
    }

    // ── Theme file ──────────────────────────────────────────────────────────

    /// Adopt a background-loaded theme; failures keep the current palette.
    pub fn handle_theme_loaded(&mut self, result: Result<CustomTheme>) {
        match result {
            Ok(theme) => {
                tracing::info!(name = %theme.name, base = ?theme.base, "theme loaded");
                let message = if theme.base == self.workspace.settings.theme() {
                    format!("Theme loaded: {}", theme.name)
                } else {
                    format!("Theme loaded: {} (applies to {})", theme.name, theme.base.label())
                };
                self.custom_theme = Some(theme);
                self.apply_settings();
                self.set_status_message(message);
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load theme file");
                self.set_status_message(format!("Failed to load theme: {}", e));
            }
        }
    }

    // ── Status / animation ──────────────────────────────────────────────────

    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// The status message, if it has not expired.
    pub fn status_text(&self) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    /// Drop expired status messages.
    pub fn tick(&mut self) {
        if self
            .status_message
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
        {
            self.status_message = None;
        }
    }

    /// Breathing phase in `[0, 1]`, or `None` when the animation is off.
    pub fn pulse(&self) -> Option<f32> {
        if !self.workspace.settings.breathing_animation() {
            return None;
        }
        let period = BREATH_PERIOD.as_secs_f32();
        let t = self.started.elapsed().as_secs_f32() % period / period;
        Some((1.0 - (t * std::f32::consts::TAU).cos()) / 2.0)
    }
}

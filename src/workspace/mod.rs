//! The workspace registry: project tree, open tabs, file contents, command
//! palette, settings and quick-access list.
//!
//! All transitions are plain methods on [`Workspace`] so the presentation layer
//! only reads state and dispatches intents.

pub mod contents;
pub mod modal;
pub mod palette;
pub mod quick_access;
pub mod settings;
pub mod tabs;
pub mod tree;

use contents::FileContents;
use palette::PaletteState;
use quick_access::QuickAccess;
use settings::EditorSettings;
use tabs::{Language, Tabs};
use tree::ProjectTree;

/// Tabs open when the editor starts.
const INITIAL_TABS: [&str; 3] = [
    "src/components/Button.tsx",
    "src/components/Card.tsx",
    "src/lib/utils.ts",
];

/// In-memory workspace state.
#[derive(Debug)]
pub struct Workspace {
    pub tree: ProjectTree,
    pub contents: FileContents,
    pub tabs: Tabs,
    pub palette: PaletteState,
    pub settings: EditorSettings,
    pub quick_access: QuickAccess,
    /// Flattened file list; the tree never changes after startup.
    files: Vec<String>,
}

impl Workspace {
    pub fn new(settings: EditorSettings, quick_access: QuickAccess) -> Self {
        let tree = ProjectTree::sample();
        let files = tree.flatten();
        let mut workspace = Self {
            tree,
            contents: FileContents::with_samples(),
            tabs: Tabs::default(),
            palette: PaletteState::default(),
            settings,
            quick_access,
            files,
        };
        for path in INITIAL_TABS {
            workspace.tabs.open(path);
        }
        workspace.tabs.activate(INITIAL_TABS[0]);
        workspace.tree.select_path(INITIAL_TABS[0]);
        workspace
    }

    /// Every file path in tree order.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn active_file(&self) -> Option<&str> {
        self.tabs.active()
    }

    /// Content-type tag of the active file.
    pub fn active_language(&self) -> Language {
        self.active_file()
            .map(Language::from_path)
            .unwrap_or_default()
    }

    // ── Tree ────────────────────────────────────────────────────────────────

    pub fn toggle_folder(&mut self, path: &str) {
        self.tree.toggle_folder(path);
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        self.tree.is_expanded(path)
    }

    // ── Contents ────────────────────────────────────────────────────────────

    pub fn get_content(&self, path: &str) -> String {
        self.contents.get_content(path)
    }

    pub fn set_content(&mut self, path: &str, text: &str) {
        self.contents.set_content(path, text);
    }

    // ── Tabs ────────────────────────────────────────────────────────────────

    /// Open `path` as the active tab. Paths outside the project tree are rejected.
    pub fn open(&mut self, path: &str) -> bool {
        if !self.tree.contains_file(path) {
            tracing::warn!(path, "refusing to open path outside the project tree");
            return false;
        }
        self.contents.ensure_entry(path);
        self.tabs.open(path);
        tracing::debug!(path, language = ?Language::from_path(path), "opened file");
        true
    }

    pub fn close(&mut self, path: &str) {
        self.tabs.close(path);
        tracing::debug!(path, active = ?self.tabs.active(), "closed tab");
    }

    pub fn activate(&mut self, path: &str) -> bool {
        self.tabs.activate(path)
    }

    /// Activate the tab after the active one, wrapping around.
    pub fn next_tab(&mut self) {
        self.tabs.cycle(1);
    }

    pub fn previous_tab(&mut self) {
        self.tabs.cycle(-1);
    }

    // ── Palette ─────────────────────────────────────────────────────────────

    /// Show the palette. Returns the generation to use for the deferred focus event.
    pub fn open_palette(&mut self) -> u64 {
        self.palette.open()
    }

    pub fn close_palette(&mut self) {
        self.palette.close();
    }

    /// Current matches for `query`, without touching palette state.
    pub fn search(&self, query: &str) -> Vec<String> {
        palette::search(&self.files, query)
    }

    pub fn palette_insert_char(&mut self, c: char) {
        self.palette.insert_char(c);
        self.palette.refresh(&self.files);
    }

    pub fn palette_delete_char(&mut self) {
        self.palette.delete_char();
        self.palette.refresh(&self.files);
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.palette.move_selection(delta);
    }

    /// Open the highlighted match and close the palette.
    ///
    /// Returns the opened path; with no matches nothing happens and the palette stays open.
    pub fn confirm_selection(&mut self) -> Option<String> {
        let path = self.palette.selected()?.to_string();
        self.open(&path);
        self.palette.close();
        Some(path)
    }

    // ── Quick access ────────────────────────────────────────────────────────

    /// Open the file pinned in `slot`.
    pub fn quick_jump(&mut self, slot: usize) -> bool {
        match self.quick_access.get(slot).map(str::to_string) {
            Some(path) => self.open(&path),
            None => false,
        }
    }
}

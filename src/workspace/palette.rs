/// Case-insensitive substring search over `files`, preserving their order.
///
/// An empty query matches nothing; the palette shows a placeholder instead.
pub fn search(files: &[String], query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    files
        .iter()
        .filter(|path| path.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Named actions listed below the file results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCommand {
    ToggleZenMode,
    ToggleFileExplorer,
}

impl PaletteCommand {
    pub const ALL: [PaletteCommand; 2] = [
        PaletteCommand::ToggleZenMode,
        PaletteCommand::ToggleFileExplorer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaletteCommand::ToggleZenMode => "Toggle Zen Mode",
            PaletteCommand::ToggleFileExplorer => "Toggle File Explorer",
        }
    }

    pub fn chord(&self) -> &'static str {
        match self {
            PaletteCommand::ToggleZenMode => "Ctrl+Shift+Z",
            PaletteCommand::ToggleFileExplorer => "Ctrl+B",
        }
    }
}

/// Command palette overlay state.
#[derive(Debug, Default)]
pub struct PaletteState {
    pub visible: bool,
    pub query: String,
    /// Byte offset of the input cursor within `query`.
    pub cursor_position: usize,
    pub matches: Vec<String>,
    pub selected_index: usize,
    /// Set by the deferred focus event; the input owns the terminal cursor once true.
    pub input_focused: bool,
    /// Bumped on every open so stale focus events can be told apart.
    pub generation: u64,
}

impl PaletteState {
    /// Show the palette with an empty query. Returns the generation for the focus event.
    pub fn open(&mut self) -> u64 {
        self.visible = true;
        self.query.clear();
        self.cursor_position = 0;
        self.matches.clear();
        self.selected_index = 0;
        self.input_focused = false;
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.input_focused = false;
    }

    /// Apply a deferred focus event. Events for an earlier opening are ignored.
    pub fn focus(&mut self, generation: u64) {
        if self.visible && generation == self.generation {
            self.input_focused = true;
        }
    }

    /// Recompute matches for the current query and reset the cursor.
    pub fn refresh(&mut self, files: &[String]) {
        self.matches = search(files, &self.query);
        self.selected_index = 0;
    }

    /// Move the result cursor by `delta`, clamped to the match list.
    pub fn move_selection(&mut self, delta: isize) {
        if self.matches.is_empty() {
            self.selected_index = 0;
            return;
        }
        let max = self.matches.len() - 1;
        let next = self.selected_index as isize + delta;
        self.selected_index = next.clamp(0, max as isize) as usize;
    }

    /// The match under the cursor.
    pub fn selected(&self) -> Option<&str> {
        self.matches.get(self.selected_index).map(String::as_str)
    }

    pub fn insert_char(&mut self, c: char) {
        self.query.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    pub fn delete_char(&mut self) {
        if let Some(prev) = self.query[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
            self.query.remove(self.cursor_position);
        }
    }

    pub fn move_cursor_left(&mut self) {
        if let Some(prev) = self.query[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if let Some(next) = self.query[self.cursor_position..].chars().next() {
            self.cursor_position += next.len_utf8();
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor_position = self.query.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::tree::ProjectTree;

    fn files() -> Vec<String> {
        ProjectTree::sample().flatten()
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(search(&files(), "").is_empty());
    }

    #[test]
    fn search_is_case_insensitive() {
        let expected = vec!["src/components/Button.tsx".to_string()];
        assert_eq!(search(&files(), "button"), expected);
        assert_eq!(search(&files(), "BUTTON"), expected);
    }

    #[test]
    fn search_matches_whole_path_in_order() {
        assert_eq!(
            search(&files(), "src/app"),
            vec!["src/app/layout.tsx", "src/app/page.tsx"]
        );
        assert_eq!(search(&files(), ".json"), vec!["package.json", "tsconfig.json"]);
        assert!(search(&files(), "nothing-here").is_empty());
    }

    #[test]
    fn refresh_with_empty_query_clears_previous_matches() {
        let mut palette = PaletteState::default();
        palette.open();
        palette.insert_char('t');
        palette.refresh(&files());
        assert!(!palette.matches.is_empty());
        palette.delete_char();
        palette.refresh(&files());
        assert!(palette.matches.is_empty());
    }

    #[test]
    fn move_selection_clamps_without_wrap() {
        let mut palette = PaletteState::default();
        palette.open();
        palette.query = "tsx".into();
        palette.refresh(&files());
        let last = palette.matches.len() - 1;
        for _ in 0..20 {
            palette.move_selection(1);
        }
        assert_eq!(palette.selected_index, last);
        for _ in 0..20 {
            palette.move_selection(-1);
        }
        assert_eq!(palette.selected_index, 0);
    }

    #[test]
    fn move_selection_on_empty_stays_zero() {
        let mut palette = PaletteState::default();
        palette.move_selection(1);
        assert_eq!(palette.selected_index, 0);
        assert!(palette.selected().is_none());
    }

    #[test]
    fn open_resets_query_and_cursor() {
        let mut palette = PaletteState::default();
        palette.open();
        palette.query = "card".into();
        palette.cursor_position = 4;
        palette.refresh(&files());
        palette.selected_index = 0;
        palette.close();
        palette.open();
        assert!(palette.visible);
        assert!(palette.query.is_empty());
        assert_eq!(palette.cursor_position, 0);
        assert_eq!(palette.selected_index, 0);
        assert!(palette.matches.is_empty());
    }

    #[test]
    fn refresh_resets_selection() {
        let mut palette = PaletteState::default();
        palette.open();
        palette.query = "s".into();
        palette.refresh(&files());
        palette.move_selection(3);
        palette.refresh(&files());
        assert_eq!(palette.selected_index, 0);
    }

    #[test]
    fn stale_focus_is_ignored() {
        let mut palette = PaletteState::default();
        let first = palette.open();
        palette.close();
        let second = palette.open();
        palette.focus(first);
        assert!(!palette.input_focused);
        palette.focus(second);
        assert!(palette.input_focused);
    }

    #[test]
    fn focus_after_close_is_ignored() {
        let mut palette = PaletteState::default();
        let generation = palette.open();
        palette.close();
        palette.focus(generation);
        assert!(!palette.input_focused);
    }

    #[test]
    fn query_editing_is_utf8_safe() {
        let mut palette = PaletteState::default();
        palette.insert_char('é');
        palette.insert_char('x');
        palette.move_cursor_left();
        palette.move_cursor_left();
        assert_eq!(palette.cursor_position, 0);
        palette.move_cursor_right();
        assert_eq!(palette.cursor_position, 2);
        palette.delete_char();
        assert_eq!(palette.query, "x");
        palette.cursor_end();
        assert_eq!(palette.cursor_position, 1);
        palette.cursor_home();
        palette.delete_char();
        assert_eq!(palette.query, "x");
    }
}

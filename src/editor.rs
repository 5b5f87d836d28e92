use std::time::Instant;

use crate::workspace::settings::{ThemeKind, DEFAULT_FONT_SIZE, DEFAULT_TAB_SIZE};
use crate::workspace::tabs::Language;

/// Terminal cursor shape requested by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    Block,
    #[default]
    Line,
    Underline,
}

/// Complete configuration pushed to the editing surface.
///
/// Every apply replaces the whole record; there are no partial updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub theme: ThemeKind,
    /// Carried for display only; a terminal cell grid has no font size.
    pub font_size: u16,
    pub tab_size: usize,
    pub word_wrap: bool,
    pub minimap: bool,
    pub language: Language,
    pub line_numbers: bool,
    pub highlight_current_line: bool,
    pub cursor_style: CursorStyle,
    /// Blank rows kept above and below the text.
    pub vertical_padding: u16,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            theme: ThemeKind::Dark,
            font_size: DEFAULT_FONT_SIZE,
            tab_size: DEFAULT_TAB_SIZE,
            word_wrap: false,
            minimap: true,
            language: Language::PlainText,
            line_numbers: true,
            highlight_current_line: true,
            cursor_style: CursorStyle::Line,
            vertical_padding: 0,
        }
    }
}

/// Line/column of the cursor, both 0-indexed, column in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CursorPosition {
    pub line: usize,
    pub col: usize,
}

/// The seam between the workspace and whatever widget edits text.
pub trait EditorSurface {
    /// Replace the whole text. Clears selection and undo history.
    fn set_value(&mut self, text: &str);
    fn value(&self) -> String;
    fn cursor(&self) -> CursorPosition;
    fn set_cursor(&mut self, position: CursorPosition);
    fn apply_options(&mut self, options: &EditorOptions);
    /// Monotonic counter bumped by every text change.
    fn revision(&self) -> u64;
}

/// A single reversible edit action in the editor.
#[derive(Debug, Clone)]
pub enum EditorAction {
    /// A line was split at (line, col) by Enter.
    SplitLine {
        line: usize,
        col: usize,
        indent: String,
    },
    /// Two lines were joined (line+1 was appended to line).
    JoinLine { line: usize, col: usize },
    /// A run of consecutive character inserts.
    InsertGroup {
        line: usize,
        start_col: usize,
        chars: String,
    },
    /// A run of consecutive character deletes.
    DeleteGroup {
        line: usize,
        start_col: usize,
        chars: String,
    },
    InsertLine { line: usize, content: String },
    RemoveLine { line: usize, content: String },
    /// Several sub-actions undone as one step.
    Compound { actions: Vec<EditorAction> },
}

/// Anchor end of a selection; the cursor is the active end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor_line: usize,
    pub anchor_col: usize,
}

impl Selection {
    pub fn new(line: usize, col: usize) -> Self {
        Self {
            anchor_line: line,
            anchor_col: col,
        }
    }
}

/// Full state for the text editor.
#[derive(Debug)]
pub struct EditorState {
    /// Lines of text in the buffer.
    pub buffer: Vec<String>,
    pub cursor_line: usize,
    /// Cursor column in chars.
    pub cursor_col: usize,
    /// Whether the buffer changed since the last `set_value`.
    pub modified: bool,
    /// Line index of the topmost visible line.
    pub scroll_offset: usize,
    /// Char index of the leftmost visible column (no-wrap only).
    pub scroll_col: usize,
    pub undo_stack: Vec<EditorAction>,
    /// Current position in the undo stack (for redo support).
    pub undo_index: usize,
    /// Internal line clipboard.
    pub editor_clipboard: Vec<String>,
    /// Visible text rows, set during render.
    pub visible_height: usize,
    /// Visible text columns, set during render.
    pub visible_width: usize,
    pub last_edit_time: Option<Instant>,
    pub grouping_active: bool,
    pub current_group: String,
    pub group_start_line: usize,
    pub group_start_col: usize,
    pub group_is_delete: bool,
    pub selection: Option<Selection>,
    options: EditorOptions,
    revision: u64,
}

/// Maximum entries in the undo stack.
const MAX_UNDO_ENTRIES: usize = 1000;

/// Consecutive edits within this window are undone together.
const GROUPING_TIMEOUT_MS: u128 = 500;

fn split_lines(content: &str) -> Vec<String> {
    let mut buffer: Vec<String> = content.lines().map(String::from).collect();
    // A trailing newline is kept as an empty last line so `value` round-trips.
    if content.ends_with('\n') || buffer.is_empty() {
        buffer.push(String::new());
    }
    buffer
}

impl EditorState {
    pub fn new(content: &str) -> Self {
        Self {
            buffer: split_lines(content),
            cursor_line: 0,
            cursor_col: 0,
            modified: false,
            scroll_offset: 0,
            scroll_col: 0,
            undo_stack: Vec::new(),
            undo_index: 0,
            editor_clipboard: Vec::new(),
            visible_height: 24,
            visible_width: 80,
            last_edit_time: None,
            grouping_active: false,
            current_group: String::new(),
            group_start_line: 0,
            group_start_col: 0,
            group_is_delete: false,
            selection: None,
            options: EditorOptions::default(),
            revision: 0,
        }
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    pub fn line_count(&self) -> usize {
        self.buffer.len()
    }

    /// Width of the line number gutter (digits + space + separator).
    pub fn gutter_width(&self) -> u16 {
        if !self.options.line_numbers {
            return 0;
        }
        let digits = self.line_count().max(1).to_string().len() as u16;
        digits + 2
    }

    /// Set the cursor to a specific line and column, clamping to valid bounds.
    pub fn set_cursor_position(&mut self, line: usize, col: usize) {
        self.cursor_line = line.min(self.buffer.len().saturating_sub(1));
        self.cursor_col = col.min(self.current_line_len());
        self.selection = None;
        self.ensure_cursor_visible();
    }

    /// Length of the current line in chars.
    pub fn current_line_len(&self) -> usize {
        self.buffer
            .get(self.cursor_line)
            .map(|l| l.chars().count())
            .unwrap_or(0)
    }

    pub fn clamp_cursor(&mut self) {
        if self.cursor_line >= self.buffer.len() {
            self.cursor_line = self.buffer.len().saturating_sub(1);
        }
        let line_len = self.current_line_len();
        if self.cursor_col > line_len {
            self.cursor_col = line_len;
        }
    }

    /// Scroll the viewport so the cursor stays visible.
    pub fn ensure_cursor_visible(&mut self) {
        let margin = 2usize;
        if self.visible_height == 0 {
            return;
        }
        if self.cursor_line < self.scroll_offset + margin {
            self.scroll_offset = self.cursor_line.saturating_sub(margin);
        }
        let bottom = self.scroll_offset + self.visible_height;
        if self.cursor_line >= bottom.saturating_sub(margin) {
            self.scroll_offset = self
                .cursor_line
                .saturating_sub(self.visible_height.saturating_sub(margin + 1));
        }

        if self.options.word_wrap || self.visible_width == 0 {
            self.scroll_col = 0;
        } else if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + self.visible_width {
            self.scroll_col = self.cursor_col + 1 - self.visible_width;
        }
    }

    fn touch(&mut self) {
        self.modified = true;
        self.revision = self.revision.wrapping_add(1);
    }

    // ── Undo/Redo infrastructure ──────────────────────────────────────

    /// Flush any pending character group before recording a non-char action.
    pub fn flush_group(&mut self) {
        if self.grouping_active && !self.current_group.is_empty() {
            let action = if self.group_is_delete {
                EditorAction::DeleteGroup {
                    line: self.group_start_line,
                    start_col: self.group_start_col,
                    chars: self.current_group.clone(),
                }
            } else {
                EditorAction::InsertGroup {
                    line: self.group_start_line,
                    start_col: self.group_start_col,
                    chars: self.current_group.clone(),
                }
            };
            self.push_undo_action(action);
        }
        self.grouping_active = false;
        self.current_group.clear();
    }

    fn push_undo_action(&mut self, action: EditorAction) {
        self.undo_stack.truncate(self.undo_index);
        self.undo_stack.push(action);
        if self.undo_stack.len() > MAX_UNDO_ENTRIES {
            let excess = self.undo_stack.len() - MAX_UNDO_ENTRIES;
            self.undo_stack.drain(..excess);
        }
        self.undo_index = self.undo_stack.len();
    }

    /// Record a single action (non-grouped) in the undo stack.
    pub fn record_action(&mut self, action: EditorAction) {
        self.flush_group();
        self.push_undo_action(action);
    }

    fn group_continues(&self, line: usize, delete: bool, now: Instant) -> bool {
        self.grouping_active
            && self.group_is_delete == delete
            && self.group_start_line == line
            && self
                .last_edit_time
                .map(|t| now.duration_since(t).as_millis() < GROUPING_TIMEOUT_MS)
                .unwrap_or(false)
    }

    fn start_group(&mut self, line: usize, col: usize, ch: char, delete: bool) {
        self.flush_group();
        self.grouping_active = true;
        self.group_is_delete = delete;
        self.group_start_line = line;
        self.group_start_col = col;
        self.current_group = ch.to_string();
    }

    pub fn record_char_insert(&mut self, line: usize, col: usize, ch: char) {
        let now = Instant::now();
        if self.group_continues(line, false, now) {
            self.current_group.push(ch);
        } else {
            self.start_group(line, col, ch, false);
        }
        self.last_edit_time = Some(now);
    }

    /// Backspace runs accumulate right to left; forward deletes left to right.
    pub fn record_char_delete(&mut self, line: usize, col: usize, ch: char) {
        let now = Instant::now();
        if self.group_continues(line, true, now) {
            if col < self.group_start_col {
                self.current_group.insert(0, ch);
                self.group_start_col = col;
            } else {
                self.current_group.push(ch);
            }
        } else {
            self.start_group(line, col, ch, true);
        }
        self.last_edit_time = Some(now);
    }

    // ── Buffer mutation ───────────────────────────────────────────────

    /// Insert a character at the cursor, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        if self.selection.is_some() {
            self.delete_selection();
        }
        self.record_char_insert(self.cursor_line, self.cursor_col, ch);
        if let Some(line) = self.buffer.get_mut(self.cursor_line) {
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.insert(byte_idx, ch);
            self.cursor_col += 1;
            self.touch();
            self.ensure_cursor_visible();
        }
    }

    /// Backspace. Deletes the selection if there is one.
    pub fn delete_char_before(&mut self) {
        if self.selection.is_some() {
            self.delete_selection();
            return;
        }
        if self.cursor_col > 0 {
            let cur_line = self.cursor_line;
            let cur_col = self.cursor_col;
            let prev_byte_idx = char_to_byte_index(&self.buffer[cur_line], cur_col - 1);
            let deleted = self.buffer[cur_line].remove(prev_byte_idx);
            self.record_char_delete(cur_line, cur_col - 1, deleted);
            self.cursor_col -= 1;
            self.touch();
        } else if self.cursor_line > 0 {
            self.flush_group();
            let current_line = self.buffer.remove(self.cursor_line);
            self.cursor_line -= 1;
            let join_col = self.current_line_len();
            self.buffer[self.cursor_line].push_str(&current_line);
            self.cursor_col = join_col;
            self.record_action(EditorAction::JoinLine {
                line: self.cursor_line,
                col: join_col,
            });
            self.touch();
        }
        self.ensure_cursor_visible();
    }

    /// Delete key. Deletes the selection if there is one.
    pub fn delete_char_at(&mut self) {
        if self.selection.is_some() {
            self.delete_selection();
            return;
        }
        let line_len = self.current_line_len();
        if self.cursor_col < line_len {
            let cur_line = self.cursor_line;
            let cur_col = self.cursor_col;
            let byte_idx = char_to_byte_index(&self.buffer[cur_line], cur_col);
            let deleted = self.buffer[cur_line].remove(byte_idx);
            self.record_char_delete(cur_line, cur_col, deleted);
            self.touch();
        } else if self.cursor_line + 1 < self.buffer.len() {
            self.flush_group();
            let next_line = self.buffer.remove(self.cursor_line + 1);
            self.buffer[self.cursor_line].push_str(&next_line);
            self.record_action(EditorAction::JoinLine {
                line: self.cursor_line,
                col: line_len,
            });
            self.touch();
        }
    }

    /// Split the current line at the cursor, copying its leading whitespace.
    pub fn insert_newline(&mut self) {
        if self.selection.is_some() {
            self.delete_selection();
        }
        self.flush_group();

        if let Some(line) = self.buffer.get(self.cursor_line) {
            let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            let new_line = format!("{}{}", indent, &line[byte_idx..]);

            self.buffer[self.cursor_line].truncate(byte_idx);
            self.buffer.insert(self.cursor_line + 1, new_line);

            self.record_action(EditorAction::SplitLine {
                line: self.cursor_line,
                col: self.cursor_col,
                indent: indent.clone(),
            });

            self.cursor_line += 1;
            self.cursor_col = indent.chars().count();
            self.touch();
            self.ensure_cursor_visible();
        }
    }

    // ── Navigation ────────────────────────────────────────────────────

    pub fn move_up(&mut self) {
        self.selection = None;
        self.step_up();
    }

    pub fn move_down(&mut self) {
        self.selection = None;
        self.step_down();
    }

    pub fn move_left(&mut self) {
        self.selection = None;
        self.step_left();
    }

    pub fn move_right(&mut self) {
        self.selection = None;
        self.step_right();
    }

    pub fn move_home(&mut self) {
        self.selection = None;
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    pub fn move_end(&mut self) {
        self.selection = None;
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    pub fn move_to_top(&mut self) {
        self.selection = None;
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    pub fn move_to_bottom(&mut self) {
        self.selection = None;
        self.cursor_line = self.buffer.len().saturating_sub(1);
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    pub fn page_up(&mut self) {
        self.selection = None;
        self.step_page(false);
    }

    pub fn page_down(&mut self) {
        self.selection = None;
        self.step_page(true);
    }

    fn step_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_cursor();
            self.ensure_cursor_visible();
        }
    }

    fn step_down(&mut self) {
        if self.cursor_line + 1 < self.buffer.len() {
            self.cursor_line += 1;
            self.clamp_cursor();
            self.ensure_cursor_visible();
        }
    }

    fn step_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.current_line_len();
        }
        self.ensure_cursor_visible();
    }

    fn step_right(&mut self) {
        if self.cursor_col < self.current_line_len() {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.buffer.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
        self.ensure_cursor_visible();
    }

    fn step_page(&mut self, down: bool) {
        let jump = self.visible_height.max(1);
        self.cursor_line = if down {
            (self.cursor_line + jump).min(self.buffer.len().saturating_sub(1))
        } else {
            self.cursor_line.saturating_sub(jump)
        };
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    // ── Selection-aware navigation (Shift+Arrow, Visual mode) ─────────

    fn ensure_selection_anchor(&mut self) {
        if self.selection.is_none() {
            self.selection = Some(Selection::new(self.cursor_line, self.cursor_col));
        }
    }

    pub fn select_up(&mut self) {
        self.ensure_selection_anchor();
        self.step_up();
    }

    pub fn select_down(&mut self) {
        self.ensure_selection_anchor();
        self.step_down();
    }

    pub fn select_left(&mut self) {
        self.ensure_selection_anchor();
        self.step_left();
    }

    pub fn select_right(&mut self) {
        self.ensure_selection_anchor();
        self.step_right();
    }

    pub fn select_home(&mut self) {
        self.ensure_selection_anchor();
        self.cursor_col = 0;
        self.ensure_cursor_visible();
    }

    pub fn select_end(&mut self) {
        self.ensure_selection_anchor();
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    pub fn select_page_up(&mut self) {
        self.ensure_selection_anchor();
        self.step_page(false);
    }

    pub fn select_page_down(&mut self) {
        self.ensure_selection_anchor();
        self.step_page(true);
    }

    /// Select all text in the buffer (Ctrl+A).
    pub fn select_all(&mut self) {
        self.selection = Some(Selection::new(0, 0));
        self.cursor_line = self.buffer.len().saturating_sub(1);
        self.cursor_col = self.current_line_len();
        self.ensure_cursor_visible();
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ── Selection helpers ─────────────────────────────────────────────

    /// Ordered `((line, col), (line, col))` bounds of the selection.
    pub fn selection_range(&self) -> Option<((usize, usize), (usize, usize))> {
        let sel = self.selection.as_ref()?;
        let a = (sel.anchor_line, sel.anchor_col);
        let b = (self.cursor_line, self.cursor_col);
        Some(if a <= b { (a, b) } else { (b, a) })
    }

    pub fn is_selected(&self, line: usize, col: usize) -> bool {
        match self.selection_range() {
            Some((start, end)) => (line, col) >= start && (line, col) < end,
            None => false,
        }
    }

    pub fn selected_text(&self) -> String {
        let Some(((sl, sc), (el, ec))) = self.selection_range() else {
            return String::new();
        };
        let mut result = String::new();
        for line_idx in sl..=el {
            let Some(line) = self.buffer.get(line_idx) else {
                break;
            };
            let start = if line_idx == sl { char_to_byte_index(line, sc) } else { 0 };
            let end = if line_idx == el { char_to_byte_index(line, ec) } else { line.len() };
            result.push_str(&line[start..end]);
            if line_idx != el {
                result.push('\n');
            }
        }
        result
    }

    /// Delete the selected text as one undo step and park the cursor at its start.
    pub fn delete_selection(&mut self) {
        let Some(((sl, sc), (el, ec))) = self.selection_range() else {
            return;
        };
        self.selection = None;
        self.flush_group();

        if sl == el {
            if let Some(line) = self.buffer.get_mut(sl) {
                let start = char_to_byte_index(line, sc);
                let end = char_to_byte_index(line, ec);
                let deleted: String = line.drain(start..end).collect();
                if !deleted.is_empty() {
                    self.record_action(EditorAction::DeleteGroup {
                        line: sl,
                        start_col: sc,
                        chars: deleted,
                    });
                }
            }
        } else {
            let mut actions = Vec::new();

            let end_tail = self
                .buffer
                .get(el)
                .map(|line| line[char_to_byte_index(line, ec)..].to_string())
                .unwrap_or_default();

            // Highest index first so earlier indices stay valid.
            for line_idx in (sl + 1..=el).rev() {
                if line_idx < self.buffer.len() {
                    let content = self.buffer.remove(line_idx);
                    actions.push(EditorAction::RemoveLine {
                        line: line_idx,
                        content,
                    });
                }
            }

            if let Some(line) = self.buffer.get_mut(sl) {
                let start_byte = char_to_byte_index(line, sc);
                let deleted_part = line[start_byte..].to_string();
                line.truncate(start_byte);
                if !deleted_part.is_empty() {
                    actions.push(EditorAction::DeleteGroup {
                        line: sl,
                        start_col: sc,
                        chars: deleted_part,
                    });
                }
                if !end_tail.is_empty() {
                    line.push_str(&end_tail);
                    actions.push(EditorAction::InsertGroup {
                        line: sl,
                        start_col: sc,
                        chars: end_tail,
                    });
                }
            }

            if !actions.is_empty() {
                self.record_action(EditorAction::Compound { actions });
            }
        }

        self.cursor_line = sl;
        self.cursor_col = sc;
        self.touch();
        self.clamp_cursor();
        self.ensure_cursor_visible();
    }

    // ── Undo/Redo ─────────────────────────────────────────────────────

    pub fn undo(&mut self) {
        self.flush_group();
        if self.undo_index == 0 {
            return;
        }
        self.undo_index -= 1;
        let action = self.undo_stack[self.undo_index].clone();
        self.selection = None;
        self.apply_reverse(&action);
        self.ensure_cursor_visible();
        self.touch();
    }

    pub fn redo(&mut self) {
        self.flush_group();
        if self.undo_index >= self.undo_stack.len() {
            return;
        }
        let action = self.undo_stack[self.undo_index].clone();
        self.selection = None;
        self.apply_forward(&action);
        self.undo_index += 1;
        self.ensure_cursor_visible();
        self.touch();
    }

    fn apply_reverse(&mut self, action: &EditorAction) {
        match action {
            EditorAction::SplitLine { line, col, .. } => {
                if *line + 1 < self.buffer.len() {
                    let next = self.buffer.remove(*line + 1);
                    let indent_len = next.chars().take_while(|c| c.is_whitespace()).count();
                    let remainder = &next[char_to_byte_index(&next, indent_len)..];
                    let trunc_pos = char_to_byte_index(&self.buffer[*line], *col);
                    self.buffer[*line].truncate(trunc_pos);
                    self.buffer[*line].push_str(remainder);
                }
                self.cursor_line = *line;
                self.cursor_col = *col;
            }
            EditorAction::JoinLine { line, col } => {
                if let Some(l) = self.buffer.get_mut(*line) {
                    let byte_idx = char_to_byte_index(l, *col);
                    let rest = l.split_off(byte_idx);
                    self.buffer.insert(*line + 1, rest);
                }
                self.cursor_line = *line + 1;
                self.cursor_col = 0;
            }
            EditorAction::InsertGroup {
                line,
                start_col,
                chars,
            } => {
                self.remove_chars(*line, *start_col, chars);
            }
            EditorAction::DeleteGroup {
                line,
                start_col,
                chars,
            } => {
                self.insert_chars(*line, *start_col, chars);
            }
            EditorAction::InsertLine { line, .. } => {
                if *line < self.buffer.len() {
                    self.buffer.remove(*line);
                }
                self.cursor_line = line.saturating_sub(1);
                self.clamp_cursor();
            }
            EditorAction::RemoveLine { line, content } => {
                self.buffer.insert(*line, content.clone());
                self.cursor_line = *line;
                self.cursor_col = 0;
            }
            EditorAction::Compound { actions } => {
                for a in actions.iter().rev() {
                    self.apply_reverse(a);
                }
            }
        }
    }

    fn apply_forward(&mut self, action: &EditorAction) {
        match action {
            EditorAction::SplitLine { line, col, indent } => {
                if let Some(l) = self.buffer.get_mut(*line) {
                    let byte_idx = char_to_byte_index(l, *col);
                    let remainder = l.split_off(byte_idx);
                    self.buffer
                        .insert(*line + 1, format!("{}{}", indent, remainder));
                }
                self.cursor_line = *line + 1;
                self.cursor_col = indent.chars().count();
            }
            EditorAction::JoinLine { line, col } => {
                if *line + 1 < self.buffer.len() {
                    let next = self.buffer.remove(*line + 1);
                    self.buffer[*line].push_str(&next);
                }
                self.cursor_line = *line;
                self.cursor_col = *col;
            }
            EditorAction::InsertGroup {
                line,
                start_col,
                chars,
            } => {
                self.insert_chars(*line, *start_col, chars);
            }
            EditorAction::DeleteGroup {
                line,
                start_col,
                chars,
            } => {
                self.remove_chars(*line, *start_col, chars);
            }
            EditorAction::InsertLine { line, content } => {
                self.buffer.insert(*line, content.clone());
                self.cursor_line = *line;
                self.cursor_col = 0;
            }
            EditorAction::RemoveLine { line, .. } => {
                if *line < self.buffer.len() {
                    self.buffer.remove(*line);
                }
                if self.buffer.is_empty() {
                    self.buffer.push(String::new());
                }
                self.cursor_line = line.saturating_sub(1);
                self.clamp_cursor();
            }
            EditorAction::Compound { actions } => {
                for a in actions {
                    self.apply_forward(a);
                }
            }
        }
    }

    fn insert_chars(&mut self, line: usize, col: usize, chars: &str) {
        if let Some(l) = self.buffer.get_mut(line) {
            let byte_idx = char_to_byte_index(l, col);
            l.insert_str(byte_idx, chars);
        }
        self.cursor_line = line;
        self.cursor_col = col + chars.chars().count();
    }

    fn remove_chars(&mut self, line: usize, col: usize, chars: &str) {
        if let Some(l) = self.buffer.get_mut(line) {
            let start = char_to_byte_index(l, col);
            let end = char_to_byte_index(l, col + chars.chars().count());
            l.replace_range(start..end, "");
        }
        self.cursor_line = line;
        self.cursor_col = col;
    }

    // ── Clipboard ─────────────────────────────────────────────────────

    /// Copy the selection, or the current line when nothing is selected.
    pub fn copy_line(&mut self) {
        if self.selection.is_some() {
            let text = self.selected_text();
            if !text.is_empty() {
                self.editor_clipboard = text.split('\n').map(String::from).collect();
            }
        } else if let Some(line) = self.buffer.get(self.cursor_line) {
            self.editor_clipboard = vec![line.clone()];
        }
    }

    /// Cut the selection, or the current line when nothing is selected.
    pub fn cut_line(&mut self) {
        if self.selection.is_some() {
            self.copy_line();
            self.delete_selection();
            return;
        }
        self.copy_line();
        if self.buffer.len() <= 1 {
            // The last line is cleared rather than removed.
            let content = std::mem::take(&mut self.buffer[self.cursor_line]);
            if !content.is_empty() {
                self.record_action(EditorAction::DeleteGroup {
                    line: self.cursor_line,
                    start_col: 0,
                    chars: content,
                });
            }
            self.cursor_col = 0;
            self.touch();
            return;
        }
        let content = self.buffer.remove(self.cursor_line);
        self.record_action(EditorAction::RemoveLine {
            line: self.cursor_line,
            content,
        });
        self.clamp_cursor();
        self.ensure_cursor_visible();
        self.touch();
    }

    /// Insert the clipboard lines below the cursor line.
    pub fn paste(&mut self) {
        if self.editor_clipboard.is_empty() {
            return;
        }
        if self.selection.is_some() {
            self.delete_selection();
        }
        self.flush_group();
        let lines = self.editor_clipboard.clone();
        let mut actions = Vec::with_capacity(lines.len());
        for (i, content) in lines.iter().enumerate() {
            let insert_at = self.cursor_line + 1 + i;
            self.buffer.insert(insert_at, content.clone());
            actions.push(EditorAction::InsertLine {
                line: insert_at,
                content: content.clone(),
            });
        }
        self.record_action(EditorAction::Compound { actions });
        self.cursor_line += lines.len();
        self.clamp_cursor();
        self.ensure_cursor_visible();
        self.touch();
    }

    // ── Tab / Indent ──────────────────────────────────────────────────

    /// Insert spaces up to the next tab stop.
    pub fn insert_tab(&mut self) {
        if self.selection.is_some() {
            self.delete_selection();
        }
        let width = self.options.tab_size.max(1);
        let indent = " ".repeat(width - self.cursor_col % width);
        self.flush_group();
        if let Some(line) = self.buffer.get_mut(self.cursor_line) {
            let byte_idx = char_to_byte_index(line, self.cursor_col);
            line.insert_str(byte_idx, &indent);
            let old_col = self.cursor_col;
            self.cursor_col += indent.len();
            self.record_action(EditorAction::InsertGroup {
                line: self.cursor_line,
                start_col: old_col,
                chars: indent,
            });
            self.touch();
            self.ensure_cursor_visible();
        }
    }

    /// Remove up to one indentation level from the start of the line (Shift+Tab).
    pub fn dedent(&mut self) {
        let width = self.options.tab_size.max(1);
        let Some(line) = self.buffer.get_mut(self.cursor_line) else {
            return;
        };
        let remove_count = if line.starts_with('\t') {
            1
        } else {
            line.chars().take_while(|c| *c == ' ').count().min(width)
        };
        if remove_count == 0 {
            return;
        }
        let removed: String = line.drain(..remove_count).collect();
        self.cursor_col = self.cursor_col.saturating_sub(remove_count);
        self.record_action(EditorAction::DeleteGroup {
            line: self.cursor_line,
            start_col: 0,
            chars: removed,
        });
        self.touch();
    }
}

impl EditorSurface for EditorState {
    fn set_value(&mut self, text: &str) {
        self.buffer = split_lines(text);
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
        self.scroll_col = 0;
        self.selection = None;
        self.undo_stack.clear();
        self.undo_index = 0;
        self.grouping_active = false;
        self.current_group.clear();
        self.modified = false;
        self.revision = self.revision.wrapping_add(1);
    }

    fn value(&self) -> String {
        self.buffer.join("\n")
    }

    fn cursor(&self) -> CursorPosition {
        CursorPosition {
            line: self.cursor_line,
            col: self.cursor_col,
        }
    }

    fn set_cursor(&mut self, position: CursorPosition) {
        self.set_cursor_position(position.line, position.col);
    }

    fn apply_options(&mut self, options: &EditorOptions) {
        self.options = options.clone();
        self.ensure_cursor_visible();
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Convert a char column to a byte index, saturating at the end of `s`.
fn char_to_byte_index(s: &str, char_col: usize) -> usize {
    s.char_indices()
        .nth(char_col)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_empty_content() {
        let state = EditorState::new("");
        assert_eq!(state.buffer, vec![""]);
        assert_eq!(state.cursor_line, 0);
        assert_eq!(state.cursor_col, 0);
        assert!(!state.modified);
    }

    #[test]
    fn test_new_with_trailing_newline() {
        let state = EditorState::new("hello\nworld\n");
        assert_eq!(state.buffer, vec!["hello", "world", ""]);
        assert_eq!(state.value(), "hello\nworld\n");
    }

    #[test]
    fn test_new_without_trailing_newline() {
        let state = EditorState::new("hello\nworld");
        assert_eq!(state.buffer, vec!["hello", "world"]);
        assert_eq!(state.value(), "hello\nworld");
    }

    #[test]
    fn test_insert_char() {
        let mut state = EditorState::new("hello");
        state.cursor_col = 5;
        state.insert_char('!');
        assert_eq!(state.buffer[0], "hello!");
        assert_eq!(state.cursor_col, 6);
        assert!(state.modified);
    }

    #[test]
    fn test_insert_char_multibyte() {
        let mut state = EditorState::new("héllo");
        state.cursor_col = 2;
        state.insert_char('x');
        assert_eq!(state.buffer[0], "héxllo");
        assert_eq!(state.current_line_len(), 6);
    }

    #[test]
    fn test_delete_char_before() {
        let mut state = EditorState::new("hello");
        state.cursor_col = 5;
        state.delete_char_before();
        assert_eq!(state.buffer[0], "hell");
        assert_eq!(state.cursor_col, 4);
    }

    #[test]
    fn test_delete_char_before_at_line_start_joins() {
        let mut state = EditorState::new("hello\nworld");
        state.cursor_line = 1;
        state.cursor_col = 0;
        state.delete_char_before();
        assert_eq!(state.buffer, vec!["helloworld"]);
        assert_eq!(state.cursor_line, 0);
        assert_eq!(state.cursor_col, 5);
    }

    #[test]
    fn test_delete_char_at_end_joins() {
        let mut state = EditorState::new("hello\nworld");
        state.cursor_col = 5;
        state.delete_char_at();
        assert_eq!(state.buffer, vec!["helloworld"]);
    }

    #[test]
    fn test_insert_newline_auto_indent() {
        let mut state = EditorState::new("    hello");
        state.cursor_col = 9;
        state.insert_newline();
        assert_eq!(state.buffer, vec!["    hello", "    "]);
        assert_eq!(state.cursor_col, 4);
    }

    #[test]
    fn test_navigation() {
        let mut state = EditorState::new("line1\nline2\nline3");
        state.move_down();
        state.move_down();
        state.move_down();
        assert_eq!(state.cursor_line, 2);
        state.move_up();
        assert_eq!(state.cursor_line, 1);

        state.cursor_col = 3;
        state.move_right();
        assert_eq!(state.cursor_col, 4);
        state.move_left();
        assert_eq!(state.cursor_col, 3);

        state.move_home();
        assert_eq!(state.cursor_col, 0);
        state.move_end();
        assert_eq!(state.cursor_col, 5);
    }

    #[test]
    fn test_cursor_clamp_on_line_change() {
        let mut state = EditorState::new("longline\nhi");
        state.cursor_col = 8;
        state.move_down();
        assert_eq!(state.cursor_col, 2);
    }

    #[test]
    fn test_page_up_down() {
        let text = (0..50).map(|i| format!("line{}", i)).collect::<Vec<_>>().join("\n");
        let mut state = EditorState::new(&text);
        state.visible_height = 10;
        state.page_down();
        assert_eq!(state.cursor_line, 10);
        state.page_down();
        assert_eq!(state.cursor_line, 20);
        state.page_up();
        assert_eq!(state.cursor_line, 10);
    }

    #[test]
    fn test_undo_redo_grouped_typing() {
        let mut state = EditorState::new("hello");
        state.cursor_col = 5;
        for c in " world".chars() {
            state.insert_char(c);
        }
        state.undo();
        assert_eq!(state.buffer[0], "hello");
        state.redo();
        assert_eq!(state.buffer[0], "hello world");
    }

    #[test]
    fn test_undo_backspace_run() {
        let mut state = EditorState::new("abcdef");
        state.cursor_col = 6;
        state.delete_char_before();
        state.delete_char_before();
        state.delete_char_before();
        assert_eq!(state.buffer[0], "abc");
        state.undo();
        assert_eq!(state.buffer[0], "abcdef");
    }

    #[test]
    fn test_undo_forward_delete_run() {
        let mut state = EditorState::new("abcdef");
        state.delete_char_at();
        state.delete_char_at();
        assert_eq!(state.buffer[0], "cdef");
        state.undo();
        assert_eq!(state.buffer[0], "abcdef");
    }

    #[test]
    fn test_undo_newline() {
        let mut state = EditorState::new("helloworld");
        state.cursor_col = 5;
        state.insert_newline();
        assert_eq!(state.buffer, vec!["hello", "world"]);
        state.undo();
        assert_eq!(state.buffer, vec!["helloworld"]);
        state.redo();
        assert_eq!(state.buffer, vec!["hello", "world"]);
    }

    #[test]
    fn test_undo_join_line() {
        let mut state = EditorState::new("hello\nworld");
        state.cursor_line = 1;
        state.delete_char_before();
        state.undo();
        assert_eq!(state.buffer, vec!["hello", "world"]);
    }

    #[test]
    fn test_selection_text_and_delete() {
        let mut state = EditorState::new("alpha\nbeta\ngamma");
        state.cursor_col = 2;
        state.select_down();
        state.select_down();
        assert_eq!(state.selected_text(), "pha\nbeta\nga");
        assert!(state.is_selected(1, 0));
        assert!(!state.is_selected(2, 2));
        state.delete_selection();
        assert_eq!(state.buffer, vec!["almma"]);
        assert_eq!((state.cursor_line, state.cursor_col), (0, 2));
        state.undo();
        assert_eq!(state.buffer, vec!["alpha", "beta", "gamma"]);
        state.redo();
        assert_eq!(state.buffer, vec!["almma"]);
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut state = EditorState::new("hello world");
        state.select_end();
        state.insert_char('x');
        assert_eq!(state.buffer[0], "x");
        assert!(state.selection.is_none());
    }

    #[test]
    fn test_copy_paste() {
        let mut state = EditorState::new("line1\nline2\nline3");
        state.cursor_line = 1;
        state.copy_line();
        assert_eq!(state.editor_clipboard, vec!["line2"]);
        state.cursor_line = 2;
        state.paste();
        assert_eq!(state.buffer, vec!["line1", "line2", "line3", "line2"]);
        state.undo();
        assert_eq!(state.buffer, vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_cut_paste() {
        let mut state = EditorState::new("line1\nline2\nline3");
        state.cursor_line = 1;
        state.cut_line();
        assert_eq!(state.buffer, vec!["line1", "line3"]);
        state.cursor_line = 0;
        state.paste();
        assert_eq!(state.buffer, vec!["line1", "line2", "line3"]);
    }

    #[test]
    fn test_cut_only_line_clears_it() {
        let mut state = EditorState::new("solo");
        state.cut_line();
        assert_eq!(state.buffer, vec![""]);
        state.undo();
        assert_eq!(state.buffer, vec!["solo"]);
    }

    #[test]
    fn test_tab_follows_tab_size() {
        let mut state = EditorState::new("hello");
        state.insert_tab();
        assert_eq!(state.buffer[0], "    hello");

        let options = EditorOptions {
            tab_size: 2,
            ..EditorOptions::default()
        };
        state.apply_options(&options);
        state.cursor_col = 5;
        state.insert_tab();
        assert_eq!(state.buffer[0], "    h ello");
        assert_eq!(state.cursor_col, 6);
    }

    #[test]
    fn test_dedent() {
        let mut state = EditorState::new("      hello");
        state.cursor_col = 6;
        state.dedent();
        assert_eq!(state.buffer[0], "  hello");
        assert_eq!(state.cursor_col, 2);
        state.dedent();
        assert_eq!(state.buffer[0], "hello");
        state.dedent();
        assert_eq!(state.buffer[0], "hello");
    }

    #[test]
    fn test_ensure_cursor_visible() {
        let text = (0..50).map(|i| format!("line{}", i)).collect::<Vec<_>>().join("\n");
        let mut state = EditorState::new(&text);
        state.visible_height = 10;
        state.cursor_line = 30;
        state.ensure_cursor_visible();
        assert!(state.scroll_offset <= state.cursor_line);
        assert!(state.cursor_line < state.scroll_offset + state.visible_height);
    }

    #[test]
    fn test_horizontal_scroll_follows_cursor() {
        let mut state = EditorState::new(&"x".repeat(100));
        state.visible_width = 20;
        state.move_end();
        assert_eq!(state.scroll_col, 81);
        state.move_home();
        assert_eq!(state.scroll_col, 0);
    }

    #[test]
    fn test_gutter_hidden_without_line_numbers() {
        let mut state = EditorState::new("a\nb");
        assert_eq!(state.gutter_width(), 3);
        state.apply_options(&EditorOptions {
            line_numbers: false,
            ..EditorOptions::default()
        });
        assert_eq!(state.gutter_width(), 0);
    }

    #[test]
    fn test_surface_set_value_resets_state() {
        let mut state = EditorState::new("old");
        state.cursor_col = 3;
        state.insert_char('!');
        let before = state.revision();
        state.set_value("new\ntext");
        assert!(state.revision() > before);
        assert_eq!(state.value(), "new\ntext");
        assert_eq!(state.cursor(), CursorPosition::default());
        assert!(state.undo_stack.is_empty());
        assert!(!state.modified);
    }

    #[test]
    fn test_revision_bumps_on_edits_only() {
        let mut state = EditorState::new("abc");
        let start = state.revision();
        state.move_right();
        state.select_all();
        assert_eq!(state.revision(), start);
        state.clear_selection();
        state.insert_char('x');
        assert_eq!(state.revision(), start + 1);
        state.undo();
        assert_eq!(state.revision(), start + 2);

        // Typing over a selection deletes, then inserts.
        state.select_all();
        let before = state.revision();
        state.insert_char('y');
        assert_eq!(state.value(), "y");
        assert!(state.revision() > before);
    }

    #[test]
    fn test_set_cursor_clamps() {
        let mut state = EditorState::new("ab\ncd");
        state.set_cursor(CursorPosition { line: 9, col: 9 });
        assert_eq!(state.cursor(), CursorPosition { line: 1, col: 2 });
    }

    #[test]
    fn test_char_to_byte_index() {
        assert_eq!(char_to_byte_index("hello", 2), 2);
        assert_eq!(char_to_byte_index("hi", 10), 2);
        assert_eq!(char_to_byte_index("héllo", 2), 3);
    }
}

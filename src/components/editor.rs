use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};
use syntect::easy::HighlightLines;
use syntect::highlighting::Theme;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::editor::EditorState;
use crate::syntax::to_color;
use crate::theme::ThemeColors;

/// Columns taken by the minimap, including its left margin.
pub const MINIMAP_WIDTH: u16 = 12;
/// The minimap is dropped when the text would get narrower than this.
const MIN_TEXT_WIDTH: u16 = 24;
/// Buffer chars folded into one minimap cell.
const MINIMAP_CHARS_PER_CELL: usize = 2;

/// Display cells taken by `ch` when it starts at display column `col`.
fn char_width(ch: char, col: usize, tab_size: usize) -> usize {
    if ch == '\t' {
        let tab = tab_size.max(1);
        tab - col % tab
    } else {
        1
    }
}

/// Char index in `line` drawn at display column `x` of a row starting at char `start`.
///
/// Positions past the end of the line map to the line length.
pub fn char_col_at(line: &str, start: usize, x: usize, tab_size: usize) -> usize {
    let mut col = 0;
    for (i, ch) in line.chars().enumerate().skip(start) {
        let w = char_width(ch, col, tab_size);
        if x < col + w {
            return i;
        }
        col += w;
    }
    line.chars().count()
}

/// Display width of `line[start..end]` (char indices).
fn display_width(line: &str, start: usize, end: usize, tab_size: usize) -> usize {
    let mut col = 0;
    for ch in line.chars().skip(start).take(end.saturating_sub(start)) {
        col += char_width(ch, col, tab_size);
    }
    col
}

/// Char offsets at which each wrapped row of `line` starts.
fn wrap_starts(line: &str, width: usize, tab_size: usize) -> Vec<usize> {
    let mut starts = vec![0];
    if width == 0 {
        return starts;
    }
    let mut col = 0;
    for (i, ch) in line.chars().enumerate() {
        if col > 0 && col + char_width(ch, col, tab_size) > width {
            starts.push(i);
            col = 0;
        }
        col += char_width(ch, col, tab_size);
    }
    starts
}

/// Where each part of the editor goes for one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorLayout {
    pub gutter: Rect,
    pub text: Rect,
    pub minimap: Option<Rect>,
    /// Buffer line and first char of every drawn text row.
    pub rows: Vec<(usize, usize)>,
}

impl EditorLayout {
    fn split(editor: &EditorState, area: Rect) -> (Rect, Rect, Option<Rect>) {
        let options = editor.options();
        let pad = options.vertical_padding.min(area.height / 2);
        let body = Rect::new(area.x, area.y + pad, area.width, area.height - pad * 2);

        let show_minimap = options.minimap && body.width >= MIN_TEXT_WIDTH + MINIMAP_WIDTH;
        let minimap_w = if show_minimap { MINIMAP_WIDTH } else { 0 };
        let gutter_w = editor.gutter_width().min(body.width);
        let text_w = body.width.saturating_sub(gutter_w + minimap_w);

        let gutter = Rect::new(body.x, body.y, gutter_w, body.height);
        let text = Rect::new(body.x + gutter_w, body.y, text_w, body.height);
        let minimap = show_minimap.then(|| {
            Rect::new(text.x + text_w, body.y, MINIMAP_WIDTH, body.height)
        });
        (gutter, text, minimap)
    }

    /// Rows from `scroll_offset` down, dropping the first `skip` wrapped rows of the top line.
    fn rows_from(editor: &EditorState, text: Rect, skip: usize) -> Vec<(usize, usize)> {
        let height = text.height as usize;
        let mut rows = Vec::with_capacity(height);
        let wrap = editor.options().word_wrap;
        let tab_size = editor.options().tab_size;
        for line in editor.scroll_offset..editor.line_count() {
            if rows.len() >= height {
                break;
            }
            if wrap {
                let starts = wrap_starts(&editor.buffer[line], text.width as usize, tab_size);
                let skip = if line == editor.scroll_offset { skip } else { 0 };
                for start in starts.into_iter().skip(skip).take(height - rows.len()) {
                    rows.push((line, start));
                }
            } else {
                rows.push((line, editor.scroll_col));
            }
        }
        rows
    }

    /// Size the viewport to `area`, scroll the cursor into view, and lay out the rows.
    pub fn fit(editor: &mut EditorState, area: Rect) -> Self {
        let (gutter, text, minimap) = Self::split(editor, area);
        editor.visible_height = text.height as usize;
        editor.visible_width = text.width as usize;
        editor.ensure_cursor_visible();

        let mut rows = Self::rows_from(editor, text, 0);
        if editor.options().word_wrap && editor.cursor_line < editor.line_count() {
            // The wrapped row holding the cursor must be drawn, not just its line.
            let starts = wrap_starts(
                &editor.buffer[editor.cursor_line],
                text.width as usize,
                editor.options().tab_size,
            );
            let segment = starts
                .iter()
                .rposition(|&start| start <= editor.cursor_col)
                .unwrap_or(0);
            let target = (editor.cursor_line, starts[segment]);

            while editor.scroll_offset < editor.cursor_line && !rows.contains(&target) {
                editor.scroll_offset += 1;
                rows = Self::rows_from(editor, text, 0);
            }
            // A line taller than the viewport loses its leading rows.
            if !rows.contains(&target) {
                let skip = (segment + 1).saturating_sub(text.height as usize);
                rows = Self::rows_from(editor, text, skip);
            }
        }

        Self {
            gutter,
            text,
            minimap,
            rows,
        }
    }

    /// Screen cell of the cursor, if it is on a drawn row.
    pub fn cursor_position(&self, editor: &EditorState) -> Option<Position> {
        let (row, &(line, start)) = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.0 == editor.cursor_line && row.1 <= editor.cursor_col)
            .last()?;
        let text = editor.buffer.get(line)?;
        let x = display_width(text, start, editor.cursor_col, editor.options().tab_size);
        let x = (x as u16).min(self.text.width.saturating_sub(1));
        Some(Position::new(self.text.x + x, self.text.y + row as u16))
    }
}

/// Widget for rendering the editor view with line numbers, syntax highlighting and a minimap.
pub struct EditorWidget<'a> {
    editor: &'a EditorState,
    layout: &'a EditorLayout,
    theme: &'a ThemeColors,
    syntax_set: &'a SyntaxSet,
    syntax: &'a SyntaxReference,
    syntax_theme: &'a Theme,
}

impl<'a> EditorWidget<'a> {
    pub fn new(
        editor: &'a EditorState,
        layout: &'a EditorLayout,
        theme: &'a ThemeColors,
        syntax_set: &'a SyntaxSet,
        syntax: &'a SyntaxReference,
        syntax_theme: &'a Theme,
    ) -> Self {
        Self {
            editor,
            layout,
            theme,
            syntax_set,
            syntax,
            syntax_theme,
        }
    }

    /// Foreground colour of every char of `line`.
    fn highlight(&self, highlighter: &mut HighlightLines, line: &str) -> Vec<(char, Color)> {
        match highlighter.highlight_line(line, self.syntax_set) {
            Ok(spans) => spans
                .iter()
                .flat_map(|(style, text)| {
                    let fg = to_color(style.foreground);
                    text.chars().map(move |ch| (ch, fg))
                })
                .collect(),
            Err(_) => line.chars().map(|ch| (ch, self.theme.editor_fg)).collect(),
        }
    }

    fn render_gutter(&self, buf: &mut Buffer) {
        let gutter = self.layout.gutter;
        if gutter.width < 2 {
            return;
        }
        let digits = (gutter.width - 2) as usize;
        let sep_style = Style::default()
            .fg(self.theme.editor_gutter_sep)
            .bg(self.theme.editor_bg);

        let mut previous_line = None;
        for y in gutter.y..gutter.bottom() {
            let row = (y - gutter.y) as usize;
            match self.layout.rows.get(row) {
                Some(&(line, _)) if previous_line != Some(line) => {
                    previous_line = Some(line);
                    let style = if line == self.editor.cursor_line {
                        Style::default()
                            .fg(self.theme.editor_line_nr_current)
                            .bg(self.theme.editor_bg)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                            .fg(self.theme.editor_line_nr)
                            .bg(self.theme.editor_bg)
                    };
                    let num = Span::styled(format!("{:>width$} ", line + 1, width = digits), style);
                    buf.set_span(gutter.x, y, &num, gutter.width - 1);
                }
                Some(_) => {}
                None => {
                    let tilde = Style::default().fg(self.theme.dim_fg).bg(self.theme.editor_bg);
                    buf.set_string(gutter.x, y, "~", tilde);
                }
            }
            buf.set_string(gutter.right() - 1, y, "│", sep_style);
        }
    }

    fn render_minimap(&self, area: Rect, buf: &mut Buffer) {
        let height = area.height as usize;
        let total = self.editor.line_count();
        let visible = self.layout.rows.len().max(1);
        let first = if total <= height {
            0
        } else {
            let max_first = total - height;
            let scroll_range = total.saturating_sub(visible).max(1);
            (self.editor.scroll_offset * max_first / scroll_range).min(max_first)
        };
        let view_start = self.editor.scroll_offset;
        let view_end = self.layout.rows.last().map_or(view_start, |&(line, _)| line);

        let cells = area.width.saturating_sub(1) as usize;
        for row in 0..height {
            let line = first + row;
            let Some(text) = self.editor.buffer.get(line) else {
                break;
            };
            let y = area.y + row as u16;
            let bg = if (view_start..=view_end).contains(&line) {
                self.theme.minimap_viewport_bg
            } else {
                self.theme.editor_bg
            };
            let chars: Vec<char> = text.chars().collect();
            for cell in 0..cells {
                let from = cell * MINIMAP_CHARS_PER_CELL;
                let ink = chars
                    .iter()
                    .skip(from)
                    .take(MINIMAP_CHARS_PER_CELL)
                    .any(|c| !c.is_whitespace());
                let symbol = if ink { "▪" } else { " " };
                buf.set_string(
                    area.x + 1 + cell as u16,
                    y,
                    symbol,
                    Style::default().fg(self.theme.minimap_fg).bg(bg),
                );
            }
        }
    }
}

impl<'a> Widget for EditorWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.editor_bg));

        let options = self.editor.options();
        let text_area = self.layout.text;
        let mut highlighter = HighlightLines::new(self.syntax, self.syntax_theme);

        // Syntax state depends on every line above the viewport.
        let first_line = self.layout.rows.first().map_or(0, |&(line, _)| line);
        for line in self.editor.buffer.iter().take(first_line) {
            let _ = highlighter.highlight_line(line, self.syntax_set);
        }

        let mut current: Option<(usize, Vec<(char, Color)>)> = None;
        for (row, &(line, start)) in self.layout.rows.iter().enumerate() {
            let y = text_area.y + row as u16;
            if current.as_ref().map(|(l, _)| *l) != Some(line) {
                let colored = self.highlight(&mut highlighter, &self.editor.buffer[line]);
                current = Some((line, colored));
            }
            let Some((_, colored)) = current.as_ref() else {
                continue;
            };

            let is_current_line = options.highlight_current_line && line == self.editor.cursor_line;
            let row_bg = if is_current_line {
                self.theme.editor_current_line_bg
            } else {
                self.theme.editor_bg
            };
            buf.set_style(
                Rect::new(text_area.x, y, text_area.width, 1),
                Style::default().bg(row_bg),
            );

            let mut x = 0usize;
            for (col, &(ch, fg)) in colored.iter().enumerate().skip(start) {
                let w = char_width(ch, x, options.tab_size);
                if x + w > text_area.width as usize {
                    break;
                }
                let bg = if self.editor.is_selected(line, col) {
                    self.theme.editor_selection_bg
                } else {
                    row_bg
                };
                let style = Style::default().fg(fg).bg(bg);
                if ch == '\t' {
                    buf.set_string(text_area.x + x as u16, y, " ".repeat(w), style);
                } else {
                    buf.set_string(text_area.x + x as u16, y, ch.to_string(), style);
                }
                x += w;
            }
        }

        if options.line_numbers {
            self.render_gutter(buf);
        }
        if let Some(minimap) = self.layout.minimap {
            self.render_minimap(minimap, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorOptions, EditorSurface};
    use syntect::highlighting::ThemeSet;

    fn test_theme() -> ThemeColors {
        crate::theme::dark_theme()
    }

    fn test_syntax() -> (SyntaxSet, Theme) {
        let ss = SyntaxSet::load_defaults_nonewlines();
        let ts = ThemeSet::load_defaults();
        let theme = ts.themes["base16-ocean.dark"].clone();
        (ss, theme)
    }

    fn render(editor: &mut EditorState, area: Rect) -> (Buffer, EditorLayout) {
        let layout = EditorLayout::fit(editor, area);
        let theme = test_theme();
        let (ss, st) = test_syntax();
        let syntax = ss.find_syntax_plain_text().clone();
        let mut buf = Buffer::empty(area);
        EditorWidget::new(editor, &layout, &theme, &ss, &syntax, &st).render(area, &mut buf);
        (buf, layout)
    }

    fn with_options(content: &str, f: impl FnOnce(&mut EditorOptions)) -> EditorState {
        let mut editor = EditorState::new(content);
        let mut options = EditorOptions::default();
        f(&mut options);
        editor.apply_options(&options);
        editor
    }

    #[test]
    fn test_editor_widget_renders_lines() {
        let mut editor = EditorState::new("line1\nline2\nline3");
        let area = Rect::new(0, 0, 40, 5);
        let (buf, _) = render(&mut editor, area);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains("1 │line1"));
        assert!(content.contains("3 │line3"));
    }

    #[test]
    fn test_editor_widget_tilde_beyond_buffer() {
        let mut editor = EditorState::new("line1");
        let area = Rect::new(0, 0, 40, 5);
        let (buf, _) = render(&mut editor, area);

        let content = buffer_to_string(&buf, area);
        assert!(content.contains('~'));
    }

    #[test]
    fn test_zen_options_drop_gutter_and_pad() {
        let mut editor = with_options("alpha\nbeta", |o| {
            o.line_numbers = false;
            o.minimap = false;
            o.vertical_padding = 1;
        });
        let area = Rect::new(0, 0, 30, 6);
        let (buf, layout) = render(&mut editor, area);

        assert_eq!(layout.gutter.width, 0);
        assert_eq!(layout.text, Rect::new(0, 1, 30, 4));
        let content = buffer_to_string(&buf, area);
        assert!(content.lines().nth(1).is_some_and(|l| l.starts_with("alpha")));
        assert!(!content.contains('~'));
    }

    #[test]
    fn test_minimap_takes_right_columns() {
        let mut editor = EditorState::new("fn main() {}\n");
        let area = Rect::new(0, 0, 60, 4);
        let (buf, layout) = render(&mut editor, area);
        let minimap = layout.minimap.expect("minimap shown");
        assert_eq!(minimap.right(), 60);
        assert_eq!(buf.cell((minimap.x + 1, 0)).map(|c| c.symbol()), Some("▪"));
    }

    #[test]
    fn test_minimap_dropped_when_narrow() {
        let mut editor = EditorState::new("x");
        let layout = EditorLayout::fit(&mut editor, Rect::new(0, 0, 30, 4));
        assert!(layout.minimap.is_none());
    }

    #[test]
    fn test_word_wrap_splits_rows() {
        let mut editor = with_options("abcdefghij\nxy", |o| {
            o.word_wrap = true;
            o.line_numbers = false;
            o.minimap = false;
        });
        let area = Rect::new(0, 0, 4, 5);
        let (buf, layout) = render(&mut editor, area);
        assert_eq!(layout.rows, vec![(0, 0), (0, 4), (0, 8), (1, 0)]);
        let content = buffer_to_string(&buf, area);
        assert!(content.starts_with("abcd\nefgh\nij  \nxy"));
    }

    #[test]
    fn test_wrap_scrolls_to_cursor() {
        let mut editor = with_options("aaaaaaaa\nbbbbbbbb\ncc", |o| {
            o.word_wrap = true;
            o.line_numbers = false;
            o.minimap = false;
        });
        editor.cursor_line = 2;
        let layout = EditorLayout::fit(&mut editor, Rect::new(0, 0, 4, 3));
        assert!(layout.rows.iter().any(|&(line, _)| line == 2));
        assert_eq!(layout.cursor_position(&editor), Some(Position::new(0, layout.rows.len() as u16 - 1)));
    }

    #[test]
    fn test_wrap_shows_cursor_segment() {
        let long = "c".repeat(40);
        let mut editor = with_options(&format!("a\nb\n{}", long), |o| {
            o.word_wrap = true;
            o.line_numbers = false;
            o.minimap = false;
        });
        editor.cursor_line = 2;
        editor.cursor_col = 35;
        let layout = EditorLayout::fit(&mut editor, Rect::new(0, 0, 10, 3));
        assert!(layout.rows.contains(&(2, 30)));
        let pos = layout.cursor_position(&editor).expect("cursor drawn");
        let row = layout.rows.iter().position(|&r| r == (2, 30)).expect("row") as u16;
        assert_eq!(pos, Position::new(5, row));
    }

    #[test]
    fn test_wrap_scrolls_past_earlier_segments() {
        let long = "c".repeat(25);
        let mut editor = with_options(&format!("a\nb\n{}", long), |o| {
            o.word_wrap = true;
            o.line_numbers = false;
            o.minimap = false;
        });
        editor.cursor_line = 2;
        editor.cursor_col = 22;
        let layout = EditorLayout::fit(&mut editor, Rect::new(0, 0, 10, 3));
        assert_eq!(layout.rows, vec![(2, 0), (2, 10), (2, 20)]);
        assert_eq!(layout.cursor_position(&editor), Some(Position::new(2, 2)));
    }

    #[test]
    fn test_cursor_position_after_gutter() {
        let mut editor = EditorState::new("hello\nworld");
        editor.set_cursor_position(1, 3);
        let layout = EditorLayout::fit(&mut editor, Rect::new(2, 1, 40, 5));
        assert_eq!(layout.cursor_position(&editor), Some(Position::new(2 + 3 + 3, 2)));
    }

    #[test]
    fn test_horizontal_scroll_shifts_text() {
        let mut editor = with_options("0123456789abcdef", |o| {
            o.line_numbers = false;
            o.minimap = false;
        });
        let area = Rect::new(0, 0, 6, 1);
        editor.visible_width = 6;
        editor.set_cursor_position(0, 10);
        let (buf, layout) = render(&mut editor, area);
        assert_eq!(layout.rows, vec![(0, 5)]);
        assert_eq!(buffer_to_string(&buf, area), "56789a\n");
    }

    #[test]
    fn test_selection_background() {
        let mut editor = with_options("abc", |o| {
            o.line_numbers = false;
            o.minimap = false;
        });
        editor.select_right();
        let area = Rect::new(0, 0, 10, 1);
        let (buf, _) = render(&mut editor, area);
        let theme = test_theme();
        assert_eq!(buf.cell((0, 0)).map(|c| c.bg), Some(theme.editor_selection_bg));
        assert_eq!(buf.cell((1, 0)).map(|c| c.bg), Some(theme.editor_current_line_bg));
    }

    #[test]
    fn test_char_col_at_expands_tabs() {
        assert_eq!(char_col_at("\tab", 0, 0, 4), 0);
        assert_eq!(char_col_at("\tab", 0, 3, 4), 0);
        assert_eq!(char_col_at("\tab", 0, 4, 4), 1);
        assert_eq!(char_col_at("\tab", 0, 9, 4), 3);
        assert_eq!(char_col_at("héllo", 2, 1, 4), 3);
    }

    #[test]
    fn test_wrap_starts() {
        assert_eq!(wrap_starts("", 4, 4), vec![0]);
        assert_eq!(wrap_starts("abcd", 4, 4), vec![0]);
        assert_eq!(wrap_starts("abcde", 4, 4), vec![0, 4]);
    }

    fn buffer_to_string(buf: &Buffer, area: Rect) -> String {
        let mut s = String::new();
        for y in area.y..area.y + area.height {
            for x in area.x..area.x + area.width {
                s.push_str(buf.cell((x, y)).map(|c| c.symbol()).unwrap_or(" "));
            }
            s.push('\n');
        }
        s
    }
}

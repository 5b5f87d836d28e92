use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::theme::ThemeColors;
use crate::workspace::palette::{PaletteCommand, PaletteState};

/// Rows below the results: header plus one row per command.
const COMMAND_ROWS: u16 = PaletteCommand::ALL.len() as u16 + 1;

/// Where the palette sits: top-centred, 60% wide.
pub fn palette_rect(area: Rect) -> Rect {
    let percent = |v: u16| (u32::from(v) * 60 / 100) as u16;
    let width = percent(area.width).clamp(30, 80).min(area.width);
    let height = percent(area.height).clamp(10, 24).min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + (area.height.saturating_sub(height) / 5).min(3);
    Rect::new(x, y, width, height)
}

fn inner_rect(area: Rect) -> Rect {
    palette_block().inner(palette_rect(area))
}

fn palette_block<'a>() -> Block<'a> {
    Block::default()
        .title(" Go to File ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
}

/// Terminal cursor cell for the query input, once the input has focus.
pub fn input_cursor(area: Rect, state: &PaletteState) -> Option<Position> {
    if !state.visible || !state.input_focused {
        return None;
    }
    let inner = inner_rect(area);
    if inner.width < 3 || inner.height == 0 {
        return None;
    }
    let before = state.query[..state.cursor_position].chars().count() as u16;
    let x = (inner.x + 2 + before).min(inner.right() - 1);
    Some(Position::new(x, inner.y))
}

/// Char range of the first case-insensitive occurrence of `query` in `path`.
fn match_range(path: &str, query: &str) -> Option<(usize, usize)> {
    let fold = |c: char| c.to_lowercase().next().unwrap_or(c);
    let hay: Vec<char> = path.chars().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (0..=hay.len() - needle.len())
        .find(|&i| hay[i..i + needle.len()] == needle[..])
        .map(|i| (i, i + needle.len()))
}

/// Command palette overlay (Ctrl+P).
pub struct PaletteWidget<'a> {
    state: &'a PaletteState,
    theme: &'a ThemeColors,
}

impl<'a> PaletteWidget<'a> {
    pub fn new(state: &'a PaletteState, theme: &'a ThemeColors) -> Self {
        Self { state, theme }
    }

    fn result_line(&self, path: &'a str, selected: bool) -> Line<'a> {
        let base = if selected {
            Style::default()
                .fg(self.theme.editor_fg)
                .bg(self.theme.dialog_selected_bg)
        } else {
            Style::default().fg(self.theme.sidebar_fg).bg(self.theme.dialog_bg)
        };
        let highlight = base.fg(self.theme.accent_fg).add_modifier(Modifier::BOLD);
        let marker = if selected { "▸ " } else { "  " };

        let mut spans = vec![Span::styled(marker, base.fg(self.theme.accent_fg))];
        match match_range(path, &self.state.query) {
            Some((start, end)) => {
                let byte = |i: usize| path.char_indices().nth(i).map_or(path.len(), |(b, _)| b);
                let (s, e) = (byte(start), byte(end));
                spans.push(Span::styled(&path[..s], base));
                spans.push(Span::styled(&path[s..e], highlight));
                spans.push(Span::styled(&path[e..], base));
            }
            None => spans.push(Span::styled(path, base)),
        }
        Line::from(spans)
    }
}

impl<'a> Widget for PaletteWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 6 || area.width < 20 {
            return;
        }
        let rect = palette_rect(area);
        Clear.render(rect, buf);

        let bg = Style::default().fg(self.theme.editor_fg).bg(self.theme.dialog_bg);
        let block = palette_block()
            .style(bg)
            .border_style(Style::default().fg(self.theme.dialog_border_fg));
        let inner = block.inner(rect);
        block.render(rect, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        // Row 0: query input
        let prompt = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let input = Line::from(vec![
            Span::styled("> ", prompt),
            Span::styled(self.state.query.as_str(), bg),
        ]);
        buf.set_line(inner.x, inner.y, &input, inner.width);

        // Row 1: separator
        if inner.height > 1 {
            let sep = Line::from(Span::styled(
                "─".repeat(inner.width as usize),
                Style::default().fg(self.theme.border_fg),
            ));
            buf.set_line(inner.x, inner.y + 1, &sep, inner.width);
        }

        // Results, leaving room for the command list
        let results_top = inner.y + 2;
        let results_height = inner.height.saturating_sub(2 + COMMAND_ROWS) as usize;
        let dim = Style::default().fg(self.theme.dim_fg).bg(self.theme.dialog_bg);

        if self.state.query.is_empty() {
            if results_height > 0 {
                let hint = Line::from(Span::styled("Type to search files...", dim));
                buf.set_line(inner.x, results_top, &hint, inner.width);
            }
        } else if self.state.matches.is_empty() {
            if results_height > 0 {
                let msg = format!("No files found matching \"{}\"", self.state.query);
                buf.set_line(inner.x, results_top, &Line::from(Span::styled(msg, dim)), inner.width);
            }
        } else {
            let scroll = (self.state.selected_index + 1).saturating_sub(results_height);
            for (i, path) in self
                .state
                .matches
                .iter()
                .enumerate()
                .skip(scroll)
                .take(results_height)
            {
                let y = results_top + (i - scroll) as u16;
                let selected = i == self.state.selected_index;
                if selected {
                    buf.set_style(
                        Rect::new(inner.x, y, inner.width, 1),
                        Style::default().bg(self.theme.dialog_selected_bg),
                    );
                }
                buf.set_line(inner.x, y, &self.result_line(path, selected), inner.width);
            }
        }

        // Command list pinned to the bottom
        if inner.height >= 2 + COMMAND_ROWS {
            let top = inner.bottom() - COMMAND_ROWS;
            let header = Line::from(Span::styled(
                "Commands",
                dim.add_modifier(Modifier::BOLD),
            ));
            buf.set_line(inner.x, top, &header, inner.width);
            for (i, command) in PaletteCommand::ALL.iter().enumerate() {
                let y = top + 1 + i as u16;
                let chord = command.chord();
                let label = Span::styled(format!("  {}", command.label()), bg);
                buf.set_line(inner.x, y, &Line::from(label), inner.width);
                let chord_x = inner.right().saturating_sub(chord.len() as u16);
                buf.set_string(chord_x, y, chord, dim);
            }
        }
    }
}

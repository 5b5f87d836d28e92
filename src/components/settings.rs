use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use crate::app::{SettingsDraft, SettingsRow};
use crate::theme::ThemeColors;
use crate::workspace::quick_access::SLOT_CHORDS;

const PANEL_WIDTH: u16 = 60;
const LABEL_WIDTH: usize = 22;
/// Rows plus the quick-access header, two spacers, and the hint.
const CONTENT_HEIGHT: u16 = SettingsRow::ALL.len() as u16 + 5;
const HINT: &str = "↑↓ move  ←→ change  Ctrl+S save  Esc cancel";

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

fn panel_block<'a>() -> Block<'a> {
    Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
}

fn inner_rect(area: Rect) -> Rect {
    panel_block().inner(centered_rect(PANEL_WIDTH, CONTENT_HEIGHT + 2, area))
}

/// Line offset of `SettingsRow::ALL[index]` inside the panel.
fn line_of(index: usize) -> u16 {
    let index = index as u16;
    match SettingsRow::ALL.get(index as usize) {
        Some(SettingsRow::QuickAccess(_)) => index + 2,
        Some(SettingsRow::Save) => index + 3,
        _ => index,
    }
}

/// Terminal cursor for the quick-access path being typed, if one is focused.
pub fn settings_cursor(area: Rect, draft: &SettingsDraft) -> Option<Position> {
    let SettingsRow::QuickAccess(_) = draft.row() else {
        return None;
    };
    let inner = inner_rect(area);
    let y = inner.y + line_of(draft.selected);
    if y >= inner.bottom() || inner.width == 0 {
        return None;
    }
    let typed = draft.value_label(draft.row()).chars().count() as u16;
    let x = (inner.x + LABEL_WIDTH as u16 + typed).min(inner.right() - 1);
    Some(Position::new(x, y))
}

/// Settings panel overlay rendering an uncommitted draft.
pub struct SettingsWidget<'a> {
    draft: &'a SettingsDraft,
    theme: &'a ThemeColors,
}

impl<'a> SettingsWidget<'a> {
    pub fn new(draft: &'a SettingsDraft, theme: &'a ThemeColors) -> Self {
        Self { draft, theme }
    }

    fn row_line(&self, row: SettingsRow, selected: bool, width: u16) -> Line<'static> {
        let base = if selected {
            Style::default()
                .fg(self.theme.editor_fg)
                .bg(self.theme.dialog_selected_bg)
        } else {
            Style::default().fg(self.theme.sidebar_fg).bg(self.theme.dialog_bg)
        };
        let value_style = base.fg(self.theme.accent_fg);

        match row {
            SettingsRow::Save => {
                let label = format!("[ {} ]", row.label());
                let pad = (width as usize).saturating_sub(label.chars().count()) / 2;
                Line::from(vec![
                    Span::styled(" ".repeat(pad), base),
                    Span::styled(label, base.fg(self.theme.success_fg).add_modifier(Modifier::BOLD)),
                ])
            }
            SettingsRow::QuickAccess(slot) => {
                let value = self.draft.value_label(row);
                let mut spans = vec![
                    Span::styled(format!("{:<w$}", row.label(), w = LABEL_WIDTH), base),
                    Span::styled(value.clone(), value_style),
                ];
                let chord = SLOT_CHORDS.get(slot).copied().unwrap_or_default();
                let used = LABEL_WIDTH + value.chars().count() + chord.len();
                if used < width as usize {
                    spans.push(Span::styled(" ".repeat(width as usize - used), base));
                    spans.push(Span::styled(chord, base.fg(self.theme.dim_fg)));
                }
                Line::from(spans)
            }
            _ => {
                let value = if selected {
                    format!("‹ {} ›", self.draft.value_label(row))
                } else {
                    self.draft.value_label(row)
                };
                let label = row.label();
                let gap = (width as usize)
                    .saturating_sub(label.chars().count() + value.chars().count())
                    .max(1);
                Line::from(vec![
                    Span::styled(label, base),
                    Span::styled(" ".repeat(gap), base),
                    Span::styled(value, value_style.add_modifier(Modifier::BOLD)),
                ])
            }
        }
    }
}

impl<'a> Widget for SettingsWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < 6 {
            return;
        }
        let rect = centered_rect(PANEL_WIDTH, CONTENT_HEIGHT + 2, area);
        Clear.render(rect, buf);

        let block = panel_block()
            .style(Style::default().fg(self.theme.editor_fg).bg(self.theme.dialog_bg))
            .border_style(Style::default().fg(self.theme.dialog_border_fg));
        let inner = block.inner(rect);
        block.render(rect, buf);
        if inner.width == 0 {
            return;
        }

        let header = Style::default()
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::BOLD);
        let first_slot = SettingsRow::ALL
            .iter()
            .position(|r| matches!(r, SettingsRow::QuickAccess(_)))
            .unwrap_or(0);
        let header_y = inner.y + line_of(first_slot) - 1;
        if header_y < inner.bottom() {
            buf.set_string(inner.x, header_y, "Quick Access", header);
        }

        for (i, row) in SettingsRow::ALL.iter().enumerate() {
            let y = inner.y + line_of(i);
            if y >= inner.bottom() {
                break;
            }
            let selected = i == self.draft.selected;
            if selected {
                buf.set_style(
                    Rect::new(inner.x, y, inner.width, 1),
                    Style::default().bg(self.theme.dialog_selected_bg),
                );
            }
            buf.set_line(inner.x, y, &self.row_line(*row, selected, inner.width), inner.width);
        }

        let hint_y = inner.bottom() - 1;
        if hint_y > inner.y + line_of(SettingsRow::ALL.len() - 1) {
            buf.set_string(inner.x, hint_y, HINT, Style::default().fg(self.theme.dim_fg));
        }
    }
}

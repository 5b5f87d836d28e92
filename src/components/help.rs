use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::theme::ThemeColors;

/// A single keybinding entry.
struct KeyEntry {
    key: &'static str,
    description: &'static str,
}

/// A named group of keybindings.
struct KeyCategory {
    name: &'static str,
    entries: &'static [KeyEntry],
}

const GLOBAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Ctrl+P",
        description: "Go to file / command palette",
    },
    KeyEntry {
        key: "Ctrl+Shift+Z / F11",
        description: "Toggle zen mode",
    },
    KeyEntry {
        key: "Ctrl+B",
        description: "Toggle file explorer",
    },
    KeyEntry {
        key: "Ctrl+E",
        description: "Switch focus editor / explorer",
    },
    KeyEntry {
        key: "Ctrl+H/J/K/L",
        description: "Jump to quick-access slot 1-4",
    },
    KeyEntry {
        key: "Alt+1..4",
        description: "Jump to quick-access slot 1-4",
    },
    KeyEntry {
        key: "Ctrl+Tab / Ctrl+PgDn",
        description: "Next tab",
    },
    KeyEntry {
        key: "Ctrl+S-Tab / Ctrl+PgUp",
        description: "Previous tab",
    },
    KeyEntry {
        key: "Ctrl+W",
        description: "Close tab",
    },
    KeyEntry {
        key: "Ctrl+, / F2",
        description: "Open settings",
    },
    KeyEntry {
        key: "F1",
        description: "Toggle this help",
    },
    KeyEntry {
        key: "Ctrl+Q",
        description: "Quit",
    },
];

const MODAL_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "i",
        description: "Insert mode",
    },
    KeyEntry {
        key: "v",
        description: "Visual mode",
    },
    KeyEntry {
        key: "Esc",
        description: "Back to normal mode",
    },
    KeyEntry {
        key: "h j k l / Arrows",
        description: "Move (extends selection in visual)",
    },
    KeyEntry {
        key: "?",
        description: "Toggle this help (normal mode)",
    },
];

const EDITING_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Ctrl+Z / Ctrl+Y",
        description: "Undo / redo",
    },
    KeyEntry {
        key: "Ctrl+A",
        description: "Select all",
    },
    KeyEntry {
        key: "Ctrl+C / Ctrl+X",
        description: "Copy / cut line or selection",
    },
    KeyEntry {
        key: "Ctrl+V",
        description: "Paste",
    },
    KeyEntry {
        key: "Shift+Arrows",
        description: "Extend selection",
    },
    KeyEntry {
        key: "Tab / Shift+Tab",
        description: "Indent / dedent",
    },
];

const EXPLORER_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "j/k or Up/Down",
        description: "Move selection",
    },
    KeyEntry {
        key: "Enter / l / Space",
        description: "Open file or toggle folder",
    },
    KeyEntry {
        key: "Right / Left / h",
        description: "Expand / collapse folder",
    },
    KeyEntry {
        key: "Esc / Tab",
        description: "Back to editor",
    },
];

const OVERLAY_KEYS: &[KeyEntry] = &[
    KeyEntry {
        key: "Up/Down",
        description: "Move through results or settings",
    },
    KeyEntry {
        key: "Enter",
        description: "Open file / change setting",
    },
    KeyEntry {
        key: "Left/Right",
        description: "Change setting value",
    },
    KeyEntry {
        key: "Ctrl+S",
        description: "Save settings",
    },
    KeyEntry {
        key: "Esc",
        description: "Close without saving",
    },
];

const CATEGORIES: &[KeyCategory] = &[
    KeyCategory {
        name: "Global",
        entries: GLOBAL_KEYS,
    },
    KeyCategory {
        name: "Modal Editing",
        entries: MODAL_KEYS,
    },
    KeyCategory {
        name: "Editing",
        entries: EDITING_KEYS,
    },
    KeyCategory {
        name: "File Explorer",
        entries: EXPLORER_KEYS,
    },
    KeyCategory {
        name: "Palette & Settings",
        entries: OVERLAY_KEYS,
    },
];

const KEY_WIDTH: usize = 24;

/// Help overlay widget showing all keybindings.
pub struct HelpOverlay<'a> {
    theme: &'a ThemeColors,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a ThemeColors) -> Self {
        Self { theme }
    }

    fn build_content_lines(&self) -> Vec<Line<'static>> {
        let accent = Style::default()
            .fg(self.theme.accent_fg)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(Span::styled(" Keybinding Reference ", accent)));
        lines.push(Line::from(""));

        for category in CATEGORIES {
            lines.push(Line::from(vec![
                Span::styled(format!("── {} ", category.name), accent),
                Span::styled("─".repeat(40), Style::default().fg(self.theme.dim_fg)),
            ]));
            for entry in category.entries {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<width$}", entry.key, width = KEY_WIDTH),
                        Style::default()
                            .fg(self.theme.warning_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        entry.description,
                        Style::default().fg(self.theme.editor_fg),
                    ),
                ]));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(self.theme.dim_fg),
        )));
        lines
    }

    /// Number of content lines, for sizing.
    pub fn total_lines() -> usize {
        // title, blank, footer
        let fixed = 3;
        fixed
            + CATEGORIES
                .iter()
                .map(|c| c.entries.len() + 2)
                .sum::<usize>()
    }
}

impl<'a> Widget for HelpOverlay<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (u32::from(area.width) * 70 / 100).min(72) as u16;
        let height = (Self::total_lines() as u16 + 2).min(area.height);
        if width < 20 || height < 3 {
            return;
        }
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        let overlay_area = Rect::new(x, y, width, height);

        Clear.render(overlay_area, buf);
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border_focused_fg))
            .style(Style::default().bg(self.theme.dialog_bg));
        let inner = block.inner(overlay_area);
        block.render(overlay_area, buf);

        let content = self.build_content_lines();
        let visible = inner.height as usize;
        for (i, line) in content.iter().take(visible).enumerate() {
            buf.set_line(
                inner.x + 1,
                inner.y + i as u16,
                line,
                inner.width.saturating_sub(2),
            );
        }

        if content.len() > visible {
            let more = Span::styled(
                format!(" +{} more ", content.len() - visible),
                Style::default().fg(self.theme.dim_fg),
            );
            let w = more.width() as u16;
            let ind_x = overlay_area.right().saturating_sub(w + 1);
            buf.set_span(ind_x, overlay_area.bottom() - 1, &more, w);
        }
    }
}

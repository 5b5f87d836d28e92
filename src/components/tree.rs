use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::theme::ThemeColors;
use crate::workspace::tree::{NodeKind, ProjectTree, TreeRow};

/// Sidebar widget that renders the project tree with box-drawing characters.
pub struct TreeWidget<'a> {
    tree: &'a ProjectTree,
    rows: &'a [TreeRow],
    theme: &'a ThemeColors,
    active_file: Option<&'a str>,
    focused: bool,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree: &'a ProjectTree, rows: &'a [TreeRow], theme: &'a ThemeColors) -> Self {
        Self {
            tree,
            rows,
            theme,
            active_file: None,
            focused: false,
            block: None,
        }
    }

    pub fn active_file(mut self, path: Option<&'a str>) -> Self {
        self.active_file = path;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Build the indentation prefix for `rows[index]`.
    ///
    /// Continuation lines depend on whether each ancestor was the last of its siblings.
    fn build_prefix(rows: &[TreeRow], index: usize) -> String {
        let row = &rows[index];
        if row.depth == 0 {
            return String::new();
        }

        let mut parts: Vec<&str> = Vec::new();
        for d in 1..row.depth {
            let mut ancestor_is_last = false;
            for j in (0..index).rev() {
                if rows[j].depth == d {
                    ancestor_is_last = rows[j].is_last_sibling;
                    break;
                }
                if rows[j].depth < d {
                    break;
                }
            }
            parts.push(if ancestor_is_last { "   " } else { "│  " });
        }
        parts.push(if row.is_last_sibling { "└─ " } else { "├─ " });
        parts.join("")
    }

    fn indicator(row: &TreeRow) -> &'static str {
        match row.kind {
            NodeKind::Folder if row.is_expanded => "▾ ",
            NodeKind::Folder => "▸ ",
            NodeKind::File => "",
        }
    }
}

impl<'a> Widget for TreeWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.theme.sidebar_bg));
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.rows.is_empty() || visible_height == 0 {
            return;
        }

        let visible = self
            .rows
            .iter()
            .enumerate()
            .skip(self.tree.scroll_offset)
            .take(visible_height);

        for (i, (idx, row)) in visible.enumerate() {
            let y = inner_area.y + i as u16;
            let is_selected = self.focused && idx == self.tree.selected_index;
            let is_active = self.active_file == Some(row.path.as_str());

            let style = if is_selected {
                Style::default()
                    .bg(self.theme.sidebar_selected_bg)
                    .fg(self.theme.sidebar_selected_fg)
                    .add_modifier(Modifier::BOLD)
            } else if is_active {
                Style::default()
                    .bg(self.theme.sidebar_bg)
                    .fg(self.theme.sidebar_active_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                match row.kind {
                    NodeKind::Folder => Style::default()
                        .bg(self.theme.sidebar_bg)
                        .fg(self.theme.sidebar_dir_fg),
                    NodeKind::File => Style::default()
                        .bg(self.theme.sidebar_bg)
                        .fg(self.theme.sidebar_fg),
                }
            };

            let prefix = Self::build_prefix(self.rows, idx);
            let line = Line::from(vec![
                Span::styled(
                    prefix,
                    Style::default().bg(style.bg.unwrap_or(self.theme.sidebar_bg)).fg(self.theme.dim_fg),
                ),
                Span::styled(format!("{}{}", Self::indicator(row), row.name), style),
            ]);
            if is_selected {
                buf.set_style(Rect::new(inner_area.x, y, inner_area.width, 1), style);
            }
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}

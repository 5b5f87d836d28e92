use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::Widget,
};

use crate::theme::ThemeColors;

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn tab_label(path: &str) -> String {
    format!(" {} ", file_name(path))
}

/// Screen cell ranges of each tab, left to right. Tabs that do not fit are dropped.
pub fn tab_rects(area: Rect, paths: &[String]) -> Vec<(Rect, String)> {
    let mut rects = Vec::new();
    let mut x = area.x;
    for path in paths {
        let width = tab_label(path).chars().count() as u16;
        if x + width > area.right() {
            break;
        }
        rects.push((Rect::new(x, area.y, width, 1), path.clone()));
        // one cell for the separator
        x += width + 1;
    }
    rects
}

/// One-row bar listing open tabs by file name.
pub struct TabBarWidget<'a> {
    paths: &'a [String],
    active: Option<&'a str>,
    theme: &'a ThemeColors,
}

impl<'a> TabBarWidget<'a> {
    pub fn new(paths: &'a [String], active: Option<&'a str>, theme: &'a ThemeColors) -> Self {
        Self {
            paths,
            active,
            theme,
        }
    }
}

impl<'a> Widget for TabBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let bar = Style::default()
            .fg(self.theme.tab_inactive_fg)
            .bg(self.theme.tab_bar_bg);
        buf.set_style(area, bar);

        for (rect, path) in tab_rects(area, self.paths) {
            let style = if self.active == Some(path.as_str()) {
                Style::default()
                    .fg(self.theme.tab_active_fg)
                    .bg(self.theme.tab_active_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                bar
            };
            let span = Span::styled(tab_label(&path), style);
            buf.set_span(rect.x, rect.y, &span, rect.width);
            if rect.right() < area.right() {
                buf.set_string(rect.right(), rect.y, "│", bar.fg(self.theme.border_fg));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn paths() -> Vec<String> {
        vec![
            "src/components/Button.tsx".to_string(),
            "src/components/Card.tsx".to_string(),
            "src/lib/utils.ts".to_string(),
        ]
    }

    fn row(buf: &Buffer) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf.cell((x, 0)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn rects_follow_labels() {
        let rects = tab_rects(Rect::new(0, 0, 80, 1), &paths());
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[0].0, Rect::new(0, 0, 12, 1));
        assert_eq!(rects[1].0.x, 13);
        assert_eq!(rects[2].1, "src/lib/utils.ts");
    }

    #[test]
    fn overflowing_tabs_are_dropped() {
        let rects = tab_rects(Rect::new(0, 0, 20, 1), &paths());
        assert_eq!(rects.len(), 1);
    }

    #[test]
    fn renders_names_and_active_style() {
        let tc = theme::dark_theme();
        let paths = paths();
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        TabBarWidget::new(&paths, Some("src/components/Card.tsx"), &tc).render(area, &mut buf);
        let text = row(&buf);
        assert!(text.starts_with(" Button.tsx │ Card.tsx │ utils.ts "));
        assert_eq!(buf.cell((14, 0)).map(|c| c.bg), Some(tc.tab_active_bg));
        assert_eq!(buf.cell((1, 0)).map(|c| c.bg), Some(tc.tab_bar_bg));
    }

    #[test]
    fn empty_bar_is_filled() {
        let tc = theme::dark_theme();
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        TabBarWidget::new(&[], None, &tc).render(area, &mut buf);
        assert_eq!(buf.cell((5, 0)).map(|c| c.bg), Some(tc.tab_bar_bg));
    }
}

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::editor::CursorPosition;
use crate::theme::{blend, ThemeColors};
use crate::workspace::modal::ModalMode;
use crate::workspace::tabs::Language;

/// Colour of the zen indicator dot.
pub const PULSE_COLOR: Color = Color::Rgb(34, 211, 238);

/// Status bar: modal indicator, active path, cursor position, zen indicator, language.
pub struct StatusBarWidget<'a> {
    path: &'a str,
    theme: &'a ThemeColors,
    mode: Option<ModalMode>,
    cursor: CursorPosition,
    language: Language,
    zen: bool,
    pulse: Option<f32>,
    status_message: Option<&'a str>,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path,
            theme,
            mode: None,
            cursor: CursorPosition::default(),
            language: Language::PlainText,
            zen: false,
            pulse: None,
            status_message: None,
        }
    }

    /// Show the modal indicator. `None` hides it.
    pub fn mode(mut self, mode: Option<ModalMode>) -> Self {
        self.mode = mode;
        self
    }

    pub fn cursor(mut self, cursor: CursorPosition) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Zen state and breathing phase (`None` for a steady dot).
    pub fn zen(mut self, zen: bool, pulse: Option<f32>) -> Self {
        self.zen = zen;
        self.pulse = pulse;
        self
    }

    /// A transient message shown in place of the path.
    pub fn status_message(mut self, msg: Option<&'a str>) -> Self {
        self.status_message = msg;
        self
    }

    fn right_spans(&self, base: Style) -> Vec<Span<'static>> {
        let dot_target = if self.zen { PULSE_COLOR } else { self.theme.dim_fg };
        let dot_color = match self.pulse {
            Some(t) => blend(self.theme.status_bg, dot_target, 0.35 + 0.65 * t),
            None => dot_target,
        };
        let zen_label = if self.zen { "Zen Mode" } else { "Normal Mode" };
        vec![
            Span::styled(
                format!("Ln {}, Col {}", self.cursor.line + 1, self.cursor.col + 1),
                base,
            ),
            Span::styled("  ", base),
            Span::styled("●", base.fg(dot_color)),
            Span::styled(format!(" {}", zen_label), base),
            Span::styled(format!("  {}", self.language.display_name()), base),
            Span::styled("  UTF-8 ", base),
        ]
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;
        let fg = if self.zen {
            self.theme.dim_fg
        } else {
            self.theme.status_fg
        };
        let base = Style::default().fg(fg).bg(self.theme.status_bg);
        buf.set_style(area, base);

        let mut left: Vec<Span> = Vec::new();
        if let Some(mode) = self.mode {
            left.push(Span::styled(
                format!(" {} ", mode.label()),
                Style::default()
                    .fg(self.theme.status_bg)
                    .bg(mode.indicator_color())
                    .add_modifier(Modifier::BOLD),
            ));
        }
        left.push(Span::styled(" ", base));
        match self.status_message {
            Some(msg) => left.push(Span::styled(
                msg.to_string(),
                base.fg(self.theme.success_fg),
            )),
            None => left.push(Span::styled(self.path.to_string(), base)),
        }

        let right = self.right_spans(base);
        let right_len: usize = right.iter().map(|s| s.content.chars().count()).sum();
        let left_len: usize = left.iter().map(|s| s.content.chars().count()).sum();

        let mut spans = left;
        if left_len + right_len <= width {
            spans.push(Span::styled(" ".repeat(width - left_len - right_len), base));
            spans.extend(right);
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

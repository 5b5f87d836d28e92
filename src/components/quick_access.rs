use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::components::status_bar::PULSE_COLOR;
use crate::theme::ThemeColors;
use crate::workspace::quick_access::{QuickAccess, SLOT_COUNT};

/// Cells between two dots.
const DOT_GAP: u16 = 2;

/// One cell per slot, centred in `area`.
pub fn dot_rects(area: Rect) -> Vec<(Rect, usize)> {
    let total = SLOT_COUNT as u16 * (1 + DOT_GAP) - DOT_GAP;
    if area.height == 0 || area.width < total {
        return Vec::new();
    }
    let start = area.x + (area.width - total) / 2;
    (0..SLOT_COUNT)
        .map(|slot| {
            let x = start + slot as u16 * (1 + DOT_GAP);
            (Rect::new(x, area.y, 1, 1), slot)
        })
        .collect()
}

/// Bottom bar with one dot per quick-access slot.
pub struct QuickAccessBar<'a> {
    slots: &'a QuickAccess,
    active: Option<&'a str>,
    theme: &'a ThemeColors,
}

impl<'a> QuickAccessBar<'a> {
    pub fn new(slots: &'a QuickAccess, active: Option<&'a str>, theme: &'a ThemeColors) -> Self {
        Self {
            slots,
            active,
            theme,
        }
    }
}

impl<'a> Widget for QuickAccessBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg = Style::default().bg(self.theme.editor_bg);
        buf.set_style(area, bg);

        let current = self.active.and_then(|p| self.slots.position(p));
        for (rect, slot) in dot_rects(area) {
            let empty = self.slots.get(slot).map_or(true, str::is_empty);
            let (symbol, style) = if current == Some(slot) {
                ("●", bg.fg(PULSE_COLOR).add_modifier(Modifier::BOLD))
            } else if empty {
                ("○", bg.fg(self.theme.dim_fg))
            } else {
                ("●", bg.fg(self.theme.dim_fg))
            };
            buf.set_string(rect.x, rect.y, symbol, style);
        }
    }
}

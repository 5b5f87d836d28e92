use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{App, Focus, Overlay};
use crate::components::editor::{EditorLayout, EditorWidget};
use crate::components::help::HelpOverlay;
use crate::components::palette::{input_cursor, PaletteWidget};
use crate::components::quick_access::{dot_rects, QuickAccessBar};
use crate::components::settings::{settings_cursor, SettingsWidget};
use crate::components::status_bar::StatusBarWidget;
use crate::components::tabs::{tab_rects, TabBarWidget};
use crate::components::tree::TreeWidget;
use crate::editor::EditorSurface;

/// Preferred sidebar width in columns.
const SIDEBAR_WIDTH: u16 = 30;

fn sidebar_width(total: u16) -> u16 {
    SIDEBAR_WIDTH.min(total / 3)
}

/// Render the application UI and record hit-test regions on `app.layout`.
pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let tab_height = if app.zen { 0 } else { 1 };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(tab_height),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    let (tab_area, body_area, quick_area, status_area) = (rows[0], rows[1], rows[2], rows[3]);

    // Tab bar
    app.layout.tabs = if tab_area.height > 0 {
        let paths = app.workspace.tabs.paths();
        frame.render_widget(
            TabBarWidget::new(paths, app.workspace.active_file(), &app.colors),
            tab_area,
        );
        tab_rects(tab_area, paths)
    } else {
        Vec::new()
    };

    // Editor on the left, explorer on the right
    let show_sidebar = app.sidebar_visible && !app.zen && body_area.width > 0;
    let (editor_area, sidebar_area) = if show_sidebar {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(sidebar_width(body_area.width)),
            ])
            .split(body_area);
        (columns[0], Some(columns[1]))
    } else {
        (body_area, None)
    };

    app.layout.sidebar = None;
    if let Some(sidebar_area) = sidebar_area {
        let focused = app.focus == Focus::Sidebar && app.overlay == Overlay::None;
        let border = if focused {
            app.colors.border_focused_fg
        } else {
            app.colors.border_fg
        };
        let block = Block::default()
            .title(" EXPLORER ")
            .title_style(
                Style::default()
                    .fg(app.colors.dim_fg)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(border));
        let inner = block.inner(sidebar_area);
        app.workspace.tree.update_scroll(inner.height as usize);
        app.layout.sidebar = Some(inner);

        let rows = app.workspace.tree.visible_rows();
        let tree = TreeWidget::new(&app.workspace.tree, &rows, &app.colors)
            .active_file(app.workspace.active_file())
            .focused(focused)
            .block(block);
        frame.render_widget(tree, sidebar_area);
    }

    // Editor
    let editor_layout = EditorLayout::fit(&mut app.editor, editor_area);
    app.layout.editor = editor_layout.text;
    app.layout.editor_rows = editor_layout.rows.clone();
    let language = app.workspace.active_language();
    let theme_kind = app.workspace.settings.theme();
    let editor_widget = EditorWidget::new(
        &app.editor,
        &editor_layout,
        &app.colors,
        app.highlighter.syntax_set(),
        app.highlighter.syntax_for(language),
        app.highlighter.theme_for(theme_kind),
    );
    frame.render_widget(editor_widget, editor_area);

    // Quick-access dots and status bar
    frame.render_widget(
        QuickAccessBar::new(
            &app.workspace.quick_access,
            app.workspace.active_file(),
            &app.colors,
        ),
        quick_area,
    );
    app.layout.quick_access = dot_rects(quick_area);

    let pulse = app.pulse();
    let status = StatusBarWidget::new(app.workspace.active_file().unwrap_or_default(), &app.colors)
        .mode(app.modal_mode())
        .cursor(app.editor.cursor())
        .language(language)
        .zen(app.zen, pulse)
        .status_message(app.status_text());
    frame.render_widget(status, status_area);

    // Overlays
    match app.overlay {
        Overlay::Palette => {
            frame.render_widget(PaletteWidget::new(&app.workspace.palette, &app.colors), area);
        }
        Overlay::Settings => {
            if let Some(draft) = &app.settings_draft {
                frame.render_widget(SettingsWidget::new(draft, &app.colors), area);
            }
        }
        Overlay::Help => frame.render_widget(HelpOverlay::new(&app.colors), area),
        Overlay::None => {}
    }

    if let Some(position) = cursor_position(app, area, &editor_layout) {
        frame.set_cursor_position(position);
    }
}

/// Where the terminal cursor goes this frame. `None` leaves it hidden.
fn cursor_position(app: &App, area: Rect, editor_layout: &EditorLayout) -> Option<Position> {
    match app.overlay {
        Overlay::Palette => input_cursor(area, &app.workspace.palette),
        Overlay::Settings => app
            .settings_draft
            .as_ref()
            .and_then(|draft| settings_cursor(area, draft)),
        Overlay::Help => None,
        Overlay::None if app.focus == Focus::Editor && app.workspace.active_file().is_some() => {
            editor_layout.cursor_position(&app.editor)
        }
        Overlay::None => None,
    }
}

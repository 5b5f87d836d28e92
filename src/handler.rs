use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tokio::sync::mpsc;

use crate::app::{App, Focus, Overlay, SettingsRow, PALETTE_FOCUS_DELAY};
use crate::components::editor::char_col_at;
use crate::event::{self, Event};
use crate::workspace::modal::{ModalAction, ModalMode, Motion};
use crate::workspace::palette::PaletteCommand;
use crate::workspace::tree::NodeKind;

/// Rows scrolled per mouse wheel notch.
const WHEEL_STEP: usize = 3;

fn ctrl(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_zen_chord(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::F(11) => true,
        KeyCode::Char('Z') => ctrl(key),
        KeyCode::Char('z') => ctrl(key) && key.modifiers.contains(KeyModifiers::SHIFT),
        _ => false,
    }
}

fn is_sidebar_chord(key: &KeyEvent) -> bool {
    ctrl(key) && matches!(key.code, KeyCode::Char('b') | KeyCode::Char('B'))
}

/// Slot addressed by a quick-jump chord: Ctrl+H/J/K/L or Alt+1..4.
fn quick_slot(key: &KeyEvent) -> Option<usize> {
    if ctrl(key) && !key.modifiers.contains(KeyModifiers::ALT) {
        return match key.code {
            KeyCode::Char('h') => Some(0),
            KeyCode::Char('j') => Some(1),
            KeyCode::Char('k') => Some(2),
            KeyCode::Char('l') => Some(3),
            _ => None,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        if let KeyCode::Char(c @ '1'..='4') = key.code {
            return Some(c as usize - '1' as usize);
        }
    }
    None
}

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent, tx: &mpsc::UnboundedSender<Event>) {
    if ctrl(&key) && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
        app.quit();
        return;
    }

    match app.overlay {
        Overlay::Palette => handle_palette_key(app, key),
        Overlay::Settings => handle_settings_key(app, key),
        Overlay::Help => handle_help_key(app, key),
        Overlay::None => {
            if !handle_global_key(app, key, tx) {
                match app.focus {
                    Focus::Sidebar => handle_sidebar_key(app, key),
                    Focus::Editor => handle_editor_key(app, key),
                }
            }
        }
    }

    app.commit_edits();
}

/// Chords that work whenever no overlay is open. Returns whether the key was consumed.
fn handle_global_key(app: &mut App, key: KeyEvent, tx: &mpsc::UnboundedSender<Event>) -> bool {
    if is_zen_chord(&key) {
        app.toggle_zen();
        return true;
    }
    if is_sidebar_chord(&key) {
        app.toggle_sidebar();
        return true;
    }
    if let Some(slot) = quick_slot(&key) {
        app.quick_jump(slot);
        app.focus = Focus::Editor;
        return true;
    }

    match key.code {
        KeyCode::F(1) => app.toggle_help(),
        KeyCode::F(2) => app.open_settings(),
        KeyCode::Char(',') if ctrl(&key) => app.open_settings(),
        KeyCode::Char('p') if ctrl(&key) => {
            let generation = app.open_palette();
            event::schedule(tx, PALETTE_FOCUS_DELAY, Event::PaletteFocus(generation));
        }
        KeyCode::Char('w') if ctrl(&key) => app.close_active_tab(),
        KeyCode::Char('e') if ctrl(&key) => {
            if app.focus == Focus::Sidebar {
                app.focus = Focus::Editor;
            } else {
                app.focus_sidebar();
            }
        }
        KeyCode::Tab if ctrl(&key) => app.cycle_tab(true),
        KeyCode::BackTab if ctrl(&key) => app.cycle_tab(false),
        KeyCode::PageDown if ctrl(&key) => app.cycle_tab(true),
        KeyCode::PageUp if ctrl(&key) => app.cycle_tab(false),
        _ => return false,
    }
    true
}

// ── Overlays ─────────────────────────────────────────────────────────────────

fn handle_palette_key(app: &mut App, key: KeyEvent) {
    if is_zen_chord(&key) {
        app.run_palette_command(PaletteCommand::ToggleZenMode);
        return;
    }
    if is_sidebar_chord(&key) {
        app.run_palette_command(PaletteCommand::ToggleFileExplorer);
        return;
    }

    match key.code {
        KeyCode::Esc => app.close_palette(),
        KeyCode::Enter => app.confirm_palette(),
        KeyCode::Up => app.workspace.move_selection(-1),
        KeyCode::Down => app.workspace.move_selection(1),
        KeyCode::Char('p') if ctrl(&key) => app.workspace.move_selection(-1),
        KeyCode::Char('n') if ctrl(&key) => app.workspace.move_selection(1),
        KeyCode::Left => app.workspace.palette.move_cursor_left(),
        KeyCode::Right => app.workspace.palette.move_cursor_right(),
        KeyCode::Home => app.workspace.palette.cursor_home(),
        KeyCode::End => app.workspace.palette.cursor_end(),
        KeyCode::Backspace => app.workspace.palette_delete_char(),
        KeyCode::Char(c) if !ctrl(&key) => app.workspace.palette_insert_char(c),
        _ => {}
    }
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    let Some(row) = app.settings_draft.as_ref().map(|d| d.row()) else {
        app.overlay = Overlay::None;
        return;
    };
    let commit = ctrl(&key) && key.code == KeyCode::Char('s');
    if commit || (key.code == KeyCode::Enter && row == SettingsRow::Save) {
        app.save_settings();
        return;
    }
    if key.code == KeyCode::Esc {
        app.discard_settings();
        return;
    }

    let editing_path = matches!(row, SettingsRow::QuickAccess(_));
    let Some(draft) = app.settings_draft.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Up | KeyCode::BackTab => draft.move_selection(-1),
        KeyCode::Down | KeyCode::Tab => draft.move_selection(1),
        KeyCode::Enter if editing_path => draft.move_selection(1),
        KeyCode::Enter => draft.adjust(1),
        KeyCode::Left if !editing_path => draft.adjust(-1),
        KeyCode::Right if !editing_path => draft.adjust(1),
        KeyCode::Backspace => draft.delete_char(),
        KeyCode::Char(c) if editing_path && !ctrl(&key) => draft.insert_char(c),
        KeyCode::Char(' ') => draft.adjust(1),
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q')) {
        app.overlay = Overlay::None;
    }
}

// ── Sidebar ──────────────────────────────────────────────────────────────────

fn handle_sidebar_key(app: &mut App, key: KeyEvent) {
    let selected = app.workspace.tree.selected_row();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.workspace.tree.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.workspace.tree.select_next(),
        KeyCode::Home | KeyCode::Char('g') => app.workspace.tree.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.workspace.tree.select_last(),
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('l') => app.sidebar_activate(),
        KeyCode::Right => {
            if let Some(row) = selected.filter(|r| r.kind == NodeKind::Folder && !r.is_expanded) {
                app.workspace.toggle_folder(&row.path);
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if let Some(row) = selected.filter(|r| r.is_expanded) {
                app.workspace.toggle_folder(&row.path);
            }
        }
        KeyCode::Esc | KeyCode::Tab => app.focus = Focus::Editor,
        _ => {}
    }
}

// ── Editor ───────────────────────────────────────────────────────────────────

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    let Some(mode) = app.modal_mode() else {
        if key.code == KeyCode::Esc {
            app.editor.clear_selection();
        } else {
            edit_key(app, key);
        }
        return;
    };

    if mode == ModalMode::Normal && key.code == KeyCode::Char('?') {
        app.toggle_help();
        return;
    }

    match mode.interpret(&key) {
        ModalAction::Transition(next) => app.set_mode(next),
        ModalAction::Move(motion) => match motion {
            Motion::Left => app.editor.move_left(),
            Motion::Down => app.editor.move_down(),
            Motion::Up => app.editor.move_up(),
            Motion::Right => app.editor.move_right(),
        },
        ModalAction::Select(motion) => match motion {
            Motion::Left => app.editor.select_left(),
            Motion::Down => app.editor.select_down(),
            Motion::Up => app.editor.select_up(),
            Motion::Right => app.editor.select_right(),
        },
        ModalAction::PassThrough => edit_key(app, key),
        ModalAction::Ignore => {}
    }
}

/// Keys understood by the editing widget itself.
fn edit_key(app: &mut App, key: KeyEvent) {
    let editor = &mut app.editor;
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl(&key) {
        match key.code {
            KeyCode::Char('z') => editor.undo(),
            KeyCode::Char('y') => editor.redo(),
            KeyCode::Char('a') => editor.select_all(),
            KeyCode::Char('c') => editor.copy_line(),
            KeyCode::Char('x') => editor.cut_line(),
            KeyCode::Char('v') => editor.paste(),
            KeyCode::Home => editor.move_to_top(),
            KeyCode::End => editor.move_to_bottom(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Up if shift => editor.select_up(),
        KeyCode::Down if shift => editor.select_down(),
        KeyCode::Left if shift => editor.select_left(),
        KeyCode::Right if shift => editor.select_right(),
        KeyCode::Home if shift => editor.select_home(),
        KeyCode::End if shift => editor.select_end(),
        KeyCode::PageUp if shift => editor.select_page_up(),
        KeyCode::PageDown if shift => editor.select_page_down(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),
        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Home => editor.move_home(),
        KeyCode::End => editor.move_end(),
        KeyCode::PageUp => editor.page_up(),
        KeyCode::PageDown => editor.page_down(),
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Backspace => editor.delete_char_before(),
        KeyCode::Delete => editor.delete_char_at(),
        KeyCode::Tab => editor.insert_tab(),
        KeyCode::BackTab => editor.dedent(),
        KeyCode::Char(c) => editor.insert_char(c),
        _ => {}
    }
}

// ── Mouse ────────────────────────────────────────────────────────────────────

fn hit(area: Rect, column: u16, row: u16) -> bool {
    area.contains(Position::new(column, row))
}

/// Handle a mouse event against the regions recorded by the last draw.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.overlay != Overlay::None {
        return;
    }
    let (column, row) = (mouse.column, mouse.row);
    let in_sidebar = app.layout.sidebar.filter(|a| hit(*a, column, row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(area) = in_sidebar {
                let tree = &mut app.workspace.tree;
                let index = tree.scroll_offset + (row - area.y) as usize;
                if index < tree.visible_rows().len() {
                    tree.selected_index = index;
                    app.focus = Focus::Sidebar;
                    app.sidebar_activate();
                }
                return;
            }
            let tab = app
                .layout
                .tabs
                .iter()
                .find(|(area, _)| hit(*area, column, row))
                .map(|(_, path)| path.clone());
            if let Some(path) = tab {
                app.activate_tab(&path);
                app.focus = Focus::Editor;
                return;
            }
            let slot = app
                .layout
                .quick_access
                .iter()
                .find(|(area, _)| hit(*area, column, row))
                .map(|(_, slot)| *slot);
            if let Some(slot) = slot {
                app.quick_jump(slot);
                return;
            }
            if hit(app.layout.editor, column, row) {
                app.focus = Focus::Editor;
                place_cursor(app, column, row);
            }
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let down = mouse.kind == MouseEventKind::ScrollDown;
            if in_sidebar.is_some() {
                let tree = &mut app.workspace.tree;
                for _ in 0..WHEEL_STEP {
                    if down {
                        tree.select_next();
                    } else {
                        tree.select_previous();
                    }
                }
            } else if hit(app.layout.editor, column, row) {
                let editor = &mut app.editor;
                let max = editor.line_count().saturating_sub(1);
                editor.scroll_offset = if down {
                    (editor.scroll_offset + WHEEL_STEP).min(max)
                } else {
                    editor.scroll_offset.saturating_sub(WHEEL_STEP)
                };
            }
        }
        _ => {}
    }
}

fn place_cursor(app: &mut App, column: u16, row: u16) {
    let area = app.layout.editor;
    let Some(&(line, start)) = app.layout.editor_rows.get((row - area.y) as usize) else {
        return;
    };
    let tab_size = app.editor.options().tab_size;
    let text = app.editor.buffer.get(line).cloned().unwrap_or_default();
    let col = char_col_at(&text, start, (column - area.x) as usize, tab_size);
    app.editor.set_cursor_position(line, col);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::editor::EditorSurface;

    fn app() -> App {
        App::new(&AppConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl_key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn press(app: &mut App, ev: KeyEvent) {
        let (tx, _rx) = mpsc::unbounded_channel();
        handle_key_event(app, ev, &tx);
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn ctrl_q_quits_from_any_overlay() {
        let mut app = app();
        app.open_settings();
        press(&mut app, ctrl_key('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn normal_mode_swallows_typing() {
        let mut app = app();
        let before = app.editor.value();
        type_str(&mut app, "xyz");
        assert_eq!(app.editor.value(), before);
    }

    #[test]
    fn insert_mode_types_and_commits() {
        let mut app = app();
        press(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.mode, ModalMode::Insert);
        type_str(&mut app, "ab");
        assert!(app.editor.value().starts_with("ab"));
        assert_eq!(
            app.workspace.get_content("src/components/Button.tsx"),
            app.editor.value()
        );
        press(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, ModalMode::Normal);
    }

    #[test]
    fn normal_mode_motions_move_cursor() {
        let mut app = app();
        press(&mut app, key(KeyCode::Char('j')));
        press(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.editor.cursor_line, 1);
        assert_eq!(app.editor.cursor_col, 1);
    }

    #[test]
    fn visual_mode_selects_and_escape_clears() {
        let mut app = app();
        press(&mut app, key(KeyCode::Char('v')));
        press(&mut app, key(KeyCode::Char('l')));
        press(&mut app, key(KeyCode::Char('l')));
        assert_eq!(app.editor.selected_text().chars().count(), 2);
        press(&mut app, key(KeyCode::Esc));
        assert!(app.editor.selection.is_none());
    }

    #[test]
    fn disabled_modal_edits_directly() {
        let mut app = app();
        app.workspace.settings.set_modal_editing_enabled(false);
        app.apply_settings();
        type_str(&mut app, "i");
        assert!(app.editor.value().starts_with('i'));
        assert_eq!(app.mode, ModalMode::Normal);
    }

    #[test]
    fn undo_restores_text() {
        let mut app = app();
        let before = app.editor.value();
        press(&mut app, key(KeyCode::Char('i')));
        type_str(&mut app, "qq");
        press(&mut app, ctrl_key('z'));
        assert_eq!(app.editor.value(), before);
    }

    #[test]
    fn zen_chords() {
        let mut app = app();
        press(&mut app, KeyEvent::new(KeyCode::Char('Z'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
        assert!(app.zen);
        press(&mut app, key(KeyCode::F(11)));
        assert!(!app.zen);
        press(&mut app, ctrl_key('z'));
        assert!(!app.zen);
    }

    #[test]
    fn sidebar_chord_toggles() {
        let mut app = app();
        press(&mut app, ctrl_key('b'));
        assert!(!app.sidebar_visible);
        press(&mut app, ctrl_key('b'));
        assert!(app.sidebar_visible);
    }

    #[test]
    fn quick_jump_chords() {
        let mut app = app();
        press(&mut app, ctrl_key('l'));
        assert_eq!(app.workspace.active_file(), Some("src/app/page.tsx"));
        press(&mut app, KeyEvent::new(KeyCode::Char('2'), KeyModifiers::ALT));
        assert_eq!(app.workspace.active_file(), Some("src/components/Card.tsx"));
    }

    #[test]
    fn tab_chords() {
        let mut app = app();
        press(&mut app, KeyEvent::new(KeyCode::PageDown, KeyModifiers::CONTROL));
        assert_eq!(app.workspace.active_file(), Some("src/components/Card.tsx"));
        press(&mut app, KeyEvent::new(KeyCode::PageUp, KeyModifiers::CONTROL));
        assert_eq!(app.workspace.active_file(), Some("src/components/Button.tsx"));
        press(&mut app, ctrl_key('w'));
        assert!(!app.workspace.tabs.is_open("src/components/Button.tsx"));
        assert_eq!(app.workspace.active_file(), Some("src/components/Card.tsx"));
    }

    #[tokio::test]
    async fn palette_flow() {
        let mut app = app();
        let (tx, mut rx) = mpsc::unbounded_channel();
        handle_key_event(&mut app, ctrl_key('p'), &tx);
        assert_eq!(app.overlay, Overlay::Palette);
        assert!(!app.workspace.palette.input_focused);

        for c in "utils".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)), &tx);
        }
        assert_eq!(app.workspace.palette.matches, vec!["src/lib/utils.ts"]);

        match rx.recv().await {
            Some(Event::PaletteFocus(generation)) => app.palette_focus(generation),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(app.workspace.palette.input_focused);

        handle_key_event(&mut app, key(KeyCode::Enter), &tx);
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.workspace.active_file(), Some("src/lib/utils.ts"));
    }

    #[tokio::test]
    async fn palette_keeps_typing_out_of_editor() {
        let mut app = app();
        press(&mut app, ctrl_key('p'));
        press(&mut app, key(KeyCode::Char('i')));
        assert_eq!(app.mode, ModalMode::Normal);
        assert_eq!(app.workspace.palette.query, "i");
        press(&mut app, key(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
    }

    #[tokio::test]
    async fn palette_command_chord_closes_palette() {
        let mut app = app();
        press(&mut app, ctrl_key('p'));
        press(&mut app, key(KeyCode::F(11)));
        assert!(app.zen);
        assert_eq!(app.overlay, Overlay::None);
    }

    #[test]
    fn settings_keys() {
        let mut app = app();
        press(&mut app, key(KeyCode::F(2)));
        assert_eq!(app.overlay, Overlay::Settings);
        press(&mut app, key(KeyCode::Right));
        press(&mut app, ctrl_key('s'));
        assert_eq!(app.overlay, Overlay::None);
        assert_eq!(app.colors, crate::theme::palette_for(crate::workspace::settings::ThemeKind::Light));
    }

    #[test]
    fn settings_quick_access_text_editing() {
        let mut app = app();
        press(&mut app, ctrl_key(','));
        for _ in 0..7 {
            press(&mut app, key(KeyCode::Down));
        }
        for _ in 0.."src/components/Button.tsx".len() {
            press(&mut app, key(KeyCode::Backspace));
        }
        type_str(&mut app, "tsconfig.json");
        press(&mut app, key(KeyCode::Esc));
        assert_eq!(app.workspace.quick_access.get(0), Some("src/components/Button.tsx"));

        press(&mut app, key(KeyCode::F(2)));
        for _ in 0..7 {
            press(&mut app, key(KeyCode::Down));
        }
        press(&mut app, key(KeyCode::Backspace));
        press(&mut app, key(KeyCode::Char('X')));
        press(&mut app, ctrl_key('s'));
        assert_eq!(
            app.workspace.quick_access.get(0),
            Some("src/components/Button.tsX")
        );
    }

    #[test]
    fn help_toggles() {
        let mut app = app();
        press(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.overlay, Overlay::Help);
        press(&mut app, key(KeyCode::Esc));
        assert_eq!(app.overlay, Overlay::None);
        press(&mut app, key(KeyCode::F(1)));
        assert_eq!(app.overlay, Overlay::Help);
    }

    #[test]
    fn sidebar_navigation() {
        let mut app = app();
        press(&mut app, ctrl_key('e'));
        assert_eq!(app.focus, Focus::Sidebar);
        press(&mut app, key(KeyCode::Char('g')));
        press(&mut app, key(KeyCode::Char('h')));
        assert!(!app.workspace.is_expanded("src"));
        press(&mut app, key(KeyCode::Right));
        assert!(app.workspace.is_expanded("src"));
        press(&mut app, key(KeyCode::Char('G')));
        press(&mut app, key(KeyCode::Enter));
        assert_eq!(app.workspace.active_file(), Some("tsconfig.json"));
        assert_eq!(app.focus, Focus::Editor);
    }

    #[test]
    fn mouse_clicks_activate_tabs_and_slots() {
        let mut app = app();
        app.layout.tabs = vec![(Rect::new(10, 0, 8, 1), "src/lib/utils.ts".to_string())];
        app.layout.quick_access = vec![(Rect::new(40, 20, 1, 1), 1)];
        let click = |column, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, click(12, 0));
        assert_eq!(app.workspace.active_file(), Some("src/lib/utils.ts"));
        handle_mouse_event(&mut app, click(40, 20));
        assert_eq!(app.workspace.active_file(), Some("src/components/Card.tsx"));
    }

    #[test]
    fn mouse_click_places_editor_cursor() {
        let mut app = app();
        app.layout.editor = Rect::new(5, 1, 40, 10);
        app.layout.editor_rows = vec![(0, 0), (1, 0), (2, 0)];
        handle_mouse_event(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 8,
                row: 2,
                modifiers: KeyModifiers::NONE,
            },
        );
        let expected = app.editor.buffer[1].chars().count().min(3);
        assert_eq!((app.editor.cursor_line, app.editor.cursor_col), (1, expected));
    }
}

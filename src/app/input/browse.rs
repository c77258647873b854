use super::edit_text;
use crate::app::{self, RuntimeContext};
use crate::ui::{App, Focus, InputMode, Overlay, ReportPane, Screen};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

const PAGE: isize = 20;

/// Handle key events on the dashboard, project list and report screens
pub(super) fn handle_browse_input(
    app: &mut App,
    key: KeyEvent,
    ctx: &mut RuntimeContext,
) -> Result<()> {
    if app.input_mode == InputMode::Search {
        handle_search(app, key);
        return Ok(());
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('L') => app.overlay = Overlay::ConfirmLogout,
        KeyCode::Char(c @ '1'..='3') => {
            if let Some(screen) = Screen::from_nav_index(c as usize - '1' as usize) {
                app::navigate(app, ctx, screen);
            }
        }
        KeyCode::Char('/') => {
            if app.screen != Screen::Projects {
                app.focus = Focus::Sidebar;
            }
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('r') => app::refresh(app, ctx),
        KeyCode::Tab => app.toggle_focus(),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::PageDown => app.scroll_code(PAGE),
        KeyCode::PageUp => app.scroll_code(-PAGE),
        KeyCode::Enter => open_selected(app, ctx),
        KeyCode::Esc => {
            if app.focus == Focus::Sidebar {
                app.focus = Focus::Main;
            } else if app.screen == Screen::Report {
                app::navigate(app, ctx, Screen::Projects);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.active_query_mut().clear();
            app.input_mode = InputMode::Normal;
        }
        _ => {
            if edit_text(app.active_query_mut(), &key) {
                app.clamp_cursors();
            }
        }
    }
}

fn open_selected(app: &mut App, ctx: &mut RuntimeContext) {
    if app.focus == Focus::Sidebar {
        if let Some(id) = app.selected_recent_id() {
            app::open_report(app, ctx, id);
        }
        return;
    }
    match app.screen {
        Screen::Projects => {
            if let Some(id) = app.selected_project_id() {
                app::open_report(app, ctx, id);
            }
        }
        Screen::Report if app.report_pane == ReportPane::Files => {
            app.report_pane = ReportPane::Code;
        }
        _ => {}
    }
}

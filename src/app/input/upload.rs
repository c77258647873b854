use super::{ctrl, edit_text};
use crate::app::{self, background, RuntimeContext};
use crate::ui::{App, Screen};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle key events on the new-project form
pub(super) fn handle_upload_input(
    app: &mut App,
    key: KeyEvent,
    ctx: &mut RuntimeContext,
) -> Result<()> {
    if ctrl(&key, 's') {
        submit(app, ctx);
        return Ok(());
    }
    if ctrl(&key, 'd') {
        app.upload.remove_last_member();
        return Ok(());
    }

    let in_members = app.upload.focused_field() == "members";
    match key.code {
        KeyCode::Esc => {
            ctx.member_search.cancel();
            app::navigate(app, ctx, Screen::Dashboard);
        }
        KeyCode::Tab => app.upload.next_field(),
        KeyCode::BackTab => app.upload.prev_field(),
        KeyCode::Down if in_members => {
            let len = app.upload.member_results.len();
            if app.upload.result_cursor + 1 < len {
                app.upload.result_cursor += 1;
            }
        }
        KeyCode::Up if in_members => {
            app.upload.result_cursor = app.upload.result_cursor.saturating_sub(1);
        }
        KeyCode::Down => app.upload.next_field(),
        KeyCode::Up => app.upload.prev_field(),
        KeyCode::Enter if in_members => {
            if app.upload.add_selected_result() {
                ctx.member_search.cancel();
            }
        }
        KeyCode::Enter => app.upload.next_field(),
        _ => {
            if !edit_text(app.upload.focused_mut(), &key) {
                return Ok(());
            }
            app.upload.error = None;
            if in_members {
                schedule_member_search(app, ctx);
            }
        }
    }
    Ok(())
}

fn schedule_member_search(app: &mut App, ctx: &mut RuntimeContext) {
    match app.upload.on_query_changed() {
        Some(query) => {
            let tx = ctx.tx.clone();
            let client = app.session.client();
            ctx.member_search.trigger(async move {
                background::search_member(tx, client, query);
            });
        }
        None => ctx.member_search.cancel(),
    }
}

fn submit(app: &mut App, ctx: &RuntimeContext) {
    if app.upload.submitting {
        return;
    }
    match app.upload.to_request() {
        Ok(request) => {
            app.upload.errors = Default::default();
            app.upload.error = None;
            app.upload.submitting = true;
            background::create_project(ctx.tx.clone(), app.session.client(), request);
        }
        Err(errors) => app.upload.errors = errors,
    }
}

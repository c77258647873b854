//! Key handling, split by what currently owns the keyboard

mod auth;
mod browse;
mod overlay;
mod upload;

use crate::app::RuntimeContext;
use crate::ui::{App, Overlay, Screen};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent, ctx: &mut RuntimeContext) -> Result<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return Ok(());
    }

    if app.overlay != Overlay::None {
        return overlay::handle_overlay_input(app, key, ctx);
    }

    match app.screen {
        Screen::Login | Screen::Signup => auth::handle_auth_input(app, key, ctx),
        Screen::Upload => upload::handle_upload_input(app, key, ctx),
        Screen::Dashboard | Screen::Projects | Screen::Report => {
            browse::handle_browse_input(app, key, ctx)
        }
    }
}

/// Plain typing into a text field. Returns true when `buf` changed.
fn edit_text(buf: &mut String, key: &KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }
    match key.code {
        KeyCode::Char(c) => {
            buf.push(c);
            true
        }
        KeyCode::Backspace => buf.pop().is_some(),
        _ => false,
    }
}

fn ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

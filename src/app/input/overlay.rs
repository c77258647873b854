use crate::app::RuntimeContext;
use crate::ui::{App, Overlay};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle key events when an overlay is active
pub(super) fn handle_overlay_input(
    app: &mut App,
    key: KeyEvent,
    ctx: &mut RuntimeContext,
) -> Result<()> {
    match app.overlay {
        Overlay::ConfirmLogout => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                app.close_overlay();
                crate::app::sign_out(app, ctx, "Signed out");
            }
            KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => app.close_overlay(),
            _ => {}
        },
        Overlay::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => app.close_overlay(),
            _ => {}
        },
        Overlay::None => {}
    }
    Ok(())
}

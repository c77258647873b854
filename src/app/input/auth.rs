use super::{ctrl, edit_text};
use crate::app::background;
use crate::app::RuntimeContext;
use crate::forms::SignupForm;
use crate::ui::{App, Screen};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

/// Handle key events on the sign-in and sign-up forms
pub(super) fn handle_auth_input(
    app: &mut App,
    key: KeyEvent,
    ctx: &mut RuntimeContext,
) -> Result<()> {
    match app.screen {
        Screen::Signup => handle_signup(app, key, ctx),
        _ => handle_login(app, key, ctx),
    }
    Ok(())
}

fn handle_login(app: &mut App, key: KeyEvent, ctx: &mut RuntimeContext) {
    if ctrl(&key, 'n') {
        app.set_screen(Screen::Signup);
        return;
    }
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => app.login.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.login.prev_field(),
        KeyCode::Enter => submit_login(app, ctx),
        _ => {
            if edit_text(app.login.focused_mut(), &key) {
                app.login.error = None;
            }
        }
    }
}

fn submit_login(app: &mut App, ctx: &RuntimeContext) {
    if app.login.submitting {
        return;
    }
    let errors = app.login.validate();
    if let Some(first) = errors.first() {
        app.login.error = Some(first.to_string());
        return;
    }
    app.login.submitting = true;
    app.login.error = None;
    background::login(
        ctx.tx.clone(),
        app.session.client(),
        app.login.email.trim().to_string(),
        app.login.password.clone(),
    );
}

fn handle_signup(app: &mut App, key: KeyEvent, ctx: &mut RuntimeContext) {
    if ctrl(&key, 'l') {
        ctx.username_check.cancel();
        app.set_screen(Screen::Login);
        return;
    }
    if ctrl(&key, 's') {
        submit_signup(app, ctx);
        return;
    }
    match key.code {
        KeyCode::Esc => {
            ctx.username_check.cancel();
            app.set_screen(Screen::Login);
        }
        KeyCode::Tab | KeyCode::Down => app.signup.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.signup.prev_field(),
        KeyCode::Enter => {
            if app.signup.focus + 1 == SignupForm::FIELDS.len() {
                submit_signup(app, ctx);
            } else {
                app.signup.next_field();
            }
        }
        _ => {
            if !edit_text(app.signup.focused_mut(), &key) {
                return;
            }
            app.signup.error = None;
            if app.signup.focused_field() == "username" {
                schedule_username_check(app, ctx);
            }
        }
    }
}

fn schedule_username_check(app: &mut App, ctx: &mut RuntimeContext) {
    match app.signup.on_username_changed() {
        Some(username) => {
            let tx = ctx.tx.clone();
            let client = app.session.client();
            ctx.username_check.trigger(async move {
                background::check_username(tx, client, username);
            });
        }
        None => ctx.username_check.cancel(),
    }
}

fn submit_signup(app: &mut App, ctx: &RuntimeContext) {
    if app.signup.submitting {
        return;
    }
    match app.signup.to_payload() {
        Ok(payload) => {
            app.signup.errors = Default::default();
            app.signup.error = None;
            app.signup.submitting = true;
            background::signup(ctx.tx.clone(), app.session.client(), payload);
        }
        Err(errors) => app.signup.errors = errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::config::Config;
    use crate::forms::UsernameStatus;
    use crate::session::{MemoryStore, Session};
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc;

    fn setup() -> (App, RuntimeContext, mpsc::Receiver<crate::app::messages::BackgroundMessage>) {
        let (tx, rx) = mpsc::channel();
        let client = ApiClient::new("http://127.0.0.1:9/api/v1").unwrap();
        let app = App::new(Session::new(client, Box::new(MemoryStore::default())));
        (app, RuntimeContext::new(tx, Config::default()), rx)
    }

    fn type_str(app: &mut App, ctx: &mut RuntimeContext, s: &str) {
        for c in s.chars() {
            handle_auth_input(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), ctx)
                .unwrap();
        }
    }

    #[test]
    fn test_empty_login_is_not_sent() {
        let (mut app, mut ctx, _rx) = setup();
        handle_auth_input(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE), &mut ctx)
            .unwrap();
        assert!(!app.login.submitting);
        assert_eq!(app.login.error.as_deref(), Some("Email is required"));
    }

    #[test]
    fn test_ctrl_n_opens_signup() {
        let (mut app, mut ctx, _rx) = setup();
        handle_auth_input(
            &mut app,
            KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL),
            &mut ctx,
        )
        .unwrap();
        assert_eq!(app.screen, Screen::Signup);
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_username_debounces() {
        let (mut app, mut ctx, _rx) = setup();
        app.set_screen(Screen::Signup);

        type_str(&mut app, &mut ctx, "al");
        assert_eq!(app.signup.username_status, UsernameStatus::Idle);
        assert!(!ctx.username_check.is_pending());

        type_str(&mut app, &mut ctx, "ice");
        assert_eq!(app.signup.username_status, UsernameStatus::Checking);
        assert!(ctx.username_check.is_pending());

        // back under the threshold cancels the pending check
        for _ in 0..3 {
            handle_auth_input(
                &mut app,
                KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE),
                &mut ctx,
            )
            .unwrap();
        }
        assert_eq!(app.signup.username, "al");
        assert_eq!(app.signup.username_status, UsernameStatus::Idle);
        assert!(!ctx.username_check.is_pending());
    }

    #[test]
    fn test_invalid_signup_sets_field_errors() {
        let (mut app, mut ctx, _rx) = setup();
        app.set_screen(Screen::Signup);
        handle_auth_input(
            &mut app,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
            &mut ctx,
        )
        .unwrap();
        assert!(!app.signup.submitting);
        assert_eq!(
            app.signup.errors.get("username"),
            Some("Username must be at least 3 characters")
        );
    }
}

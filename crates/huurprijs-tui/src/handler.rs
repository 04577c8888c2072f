use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use huurprijs_core::Effect;
use crate::app::{App, ServiceStatus};
use crate::tui::{AppEvent, EventSender};

pub fn handle_event(app: &mut App, event: AppEvent, tx: &EventSender) {
    match event {
        AppEvent::Key(key) => handle_key(app, key, tx),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::Prediction(outcome) => app.finish_prediction(outcome),
        AppEvent::Health(online) => {
            app.service_status = if online {
                ServiceStatus::Online
            } else {
                ServiceStatus::Offline
            };
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &EventSender) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => {
            if app.visible_error().is_some() {
                app.error_hidden = true;
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Enter => submit(app, tx),

        // Field focus
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_prev(),

        // Chat scrolling
        KeyCode::PageUp => app.scroll_chat_up(),
        KeyCode::PageDown => app.scroll_chat_down(),

        // Editing
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.insert_char(c)
        }

        _ => {}
    }
}

/// Run the controller's submit transition and, when it asks for it, spawn the
/// prediction request. The result comes back as [`AppEvent::Prediction`].
fn submit(app: &mut App, tx: &EventSender) {
    match app.controller.submit() {
        Effect::Dispatch(request) => {
            app.error_hidden = false;
            app.scroll_chat_to_bottom();

            let client = app.client.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let outcome = client.predict(&request).await;
                let _ = tx.send(AppEvent::Prediction(outcome));
            });
        }
        Effect::Invalid(fields) => {
            // Jump to the first offending field
            if let Some(first) = fields.iter().next() {
                app.focused = first.index();
                app.cursor_end();
            }
        }
        Effect::Rejected | Effect::None => {}
    }
}

/// Probe the service once and report the result into the event loop.
pub fn spawn_health_check(app: &App, tx: &EventSender) {
    let client = app.client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let online = match client.health().await {
            Ok(online) => online,
            Err(err) => {
                tracing::info!(error = %err, "health check failed");
                false
            }
        };
        let _ = tx.send(AppEvent::Health(online));
    });
}

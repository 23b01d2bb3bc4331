use crate::app::App;
use crate::card::editor::EditorField;
use crate::card::view::Side;
use crate::state::app_state::Overlay;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        quit();
    }

    match guard.state.overlay {
        Overlay::Editor => handle_editor_keys(key_event, &mut guard),
        Overlay::Help | Overlay::MoreInfo => match key_event.code {
            KeyCode::Esc | KeyCode::Enter => guard.close_overlay(),
            Char('?') => guard.toggle_help(),
            Char('q') => quit(),
            _ => {}
        },
        Overlay::None => handle_card_keys(key_event, &mut guard),
    }
}

fn handle_card_keys(key_event: KeyEvent, app: &mut App) {
    match key_event.code {
        Char('q') => quit(),

        // Round navigation
        KeyCode::Left | Char('p') => app.previous_round(),
        KeyCode::Right | Char('n') => app.next_round(),
        Char('r') => app.return_to_live_round(),

        // Fixtures
        Char('j') | KeyCode::Down => app.cursor_down(),
        Char('k') | KeyCode::Up => app.cursor_up(),
        Char('h') => app.reveal(Side::Home),
        Char('a') => app.reveal(Side::Away),
        KeyCode::Enter => app.select_fixture(),

        // Global
        Char('e') => app.open_editor(),
        Char('?') => app.toggle_help(),
        Char('f') => app.toggle_full_screen(),
        Char('"') => app.toggle_show_logs(),

        _ => {}
    }
}

/// Typing goes to the focused field; Enter commits it and the resulting config
/// change is applied like any other host notification.
fn handle_editor_keys(key_event: KeyEvent, app: &mut App) {
    let editor = &mut app.state.editor;
    let event = match (editor.focus, key_event.code) {
        (_, KeyCode::Esc) => {
            app.close_overlay();
            return;
        }
        (_, KeyCode::Tab) => {
            editor.focus = editor.focus.next();
            None
        }

        (EditorField::Entity, KeyCode::Down) => {
            if editor.dropdown_open {
                editor.move_highlight(1);
            } else {
                editor.toggle_dropdown();
            }
            None
        }
        (EditorField::Entity, KeyCode::Up) => {
            editor.move_highlight(-1);
            None
        }
        (EditorField::Entity, KeyCode::Enter) => {
            if editor.dropdown_open {
                editor.pick_highlighted()
            } else {
                editor.toggle_dropdown();
                None
            }
        }
        (EditorField::Entity, KeyCode::Backspace) => {
            editor.pop_search_char();
            None
        }
        (EditorField::Entity, Char(c)) => {
            editor.push_search_char(c);
            None
        }

        (EditorField::TeamId, KeyCode::Enter) => Some(editor.commit_team_id()),
        (EditorField::TeamId, KeyCode::Backspace) => {
            editor.team_input.pop();
            None
        }
        (EditorField::TeamId, Char(c)) => {
            editor.push_team_char(c);
            None
        }

        (EditorField::League, KeyCode::Enter) => Some(editor.commit_league()),
        (EditorField::League, KeyCode::Backspace) => {
            editor.league_input.pop();
            None
        }
        (EditorField::League, Char(c)) => {
            editor.push_league_char(c);
            None
        }

        _ => None,
    };

    if let Some(event) = event {
        app.on_host_event(event);
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}

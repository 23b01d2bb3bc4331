mod app;
mod card;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::card::host::DESCRIPTOR;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{SourceRequest, SourceResponse, UiEvent};
use crate::state::refresher::PeriodicRefresher;
use crate::state::source::{LoadingState, StatesWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use fixture_api::source::StatesSource;
use log::{error, info};
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut settings = AppSettings::load();
    if handle_cli_args(&mut settings) {
        return Ok(());
    }

    better_panic::install();

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    // Fails before the terminal is switched over so the error stays readable.
    let states_path = settings.states_path.clone();
    let refresh_interval = settings.refresh_interval;
    let app = Arc::new(Mutex::new(App::new(settings)?));

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (source_req_tx, source_req_rx) = mpsc::channel::<SourceRequest>(100);
    let (source_resp_tx, source_resp_rx) = mpsc::channel::<SourceResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // States source thread
    info!("reading states from {}", states_path.display());
    let states_worker = StatesWorker::new(StatesSource::new(states_path), source_req_rx, source_resp_tx);
    let source_task = tokio::spawn(states_worker.run());

    // Periodic states reload
    let periodic_updater = PeriodicRefresher::new(source_req_tx.clone(), refresh_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Trigger the first load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, source_req_tx, source_resp_rx).await;

    input_handler.abort();
    source_task.abort();
    periodic_task.abort();

    Ok(())
}

/// Returns true when the process should exit without starting the UI.
fn handle_cli_args(settings: &mut AppSettings) -> bool {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return true;
            }
            "-V" | "--version" => {
                println!("fixtures-tui {}", env!("CARGO_PKG_VERSION"));
                return true;
            }
            "-s" | "--states" => match args.next() {
                Some(path) => settings.states_path = PathBuf::from(path),
                None => {
                    eprintln!("--states needs a path\n\n{}", usage_text());
                    std::process::exit(2);
                }
            },
            _ => {
                eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
                std::process::exit(2);
            }
        }
    }
    false
}

fn usage_text() -> String {
    format!(
        "fixtures-tui - {name} ({card_type})
{description}{preview}

Usage:
  fixtures-tui [--states PATH]
  fixtures-tui --help
  fixtures-tui --version

Environment:
  FIXTURES_STATES_JSON   Path to the entity states document (default states.json)
  FIXTURES_REFRESH_SECS  Seconds between reloads of the states document (default 30)
  FIXTURES_UTC_OFFSET    Show dates at a fixed UTC offset such as +02:00 (default local time)
  FIXTURES_LOG           Log level (error, warn, info, debug, trace)",
        name = DESCRIPTOR.name,
        card_type = DESCRIPTOR.card_type,
        description = DESCRIPTOR.description,
        preview = if DESCRIPTOR.preview { " (preview)" } else { "" },
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    source_requests: mpsc::Sender<SourceRequest>,
    mut source_responses: mpsc::Receiver<SourceResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &source_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = source_responses.recv() => {
                handle_source_response(response, &app, &mut loading).await;
                let mut app_guard = app.lock().await;
                draw::draw(&mut terminal, &mut app_guard, loading);
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    source_requests: &mpsc::Sender<SourceRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = source_requests.send(SourceRequest::LoadStates).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_source_response(
    response: SourceResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) {
    match response {
        SourceResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        SourceResponse::StatesLoaded { states } => {
            let mut guard = app.lock().await;
            guard.on_states_loaded(states);
        }
        SourceResponse::Error { message } => {
            error!("States source error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

use crate::state::source::LoadingState;
use crossterm::event::KeyEvent;
use fixture_api::States;

#[derive(Debug, Clone)]
pub enum SourceRequest {
    LoadStates,
}

#[derive(Debug)]
pub enum SourceResponse {
    LoadingStateChanged { loading_state: LoadingState },
    StatesLoaded { states: States },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}

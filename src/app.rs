use crate::card::host::{CardConfig, ElementRegistry, HostEvent};
use crate::card::view::Side;
use crate::card::{CardAction, CardError, FixtureCard};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, Overlay};
use crate::state::config_store;
use chrono::{Local, Utc};
use fixture_api::States;
use log::{error, info, warn};

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    registry: ElementRegistry,
}

impl App {
    /// Loads the saved card config and hands it to the card. A missing companion
    /// element is fatal; an unreadable config file falls back to the stub config.
    pub fn new(settings: AppSettings) -> Result<Self, CardError> {
        Self::with_registry(settings, ElementRegistry::with_builtin())
    }

    pub fn with_registry(settings: AppSettings, registry: ElementRegistry) -> Result<Self, CardError> {
        if let Some(level) = settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        let config = config_store::load_card_config(&settings.config_path).unwrap_or_else(|e| {
            warn!("{e}, starting from an empty card config");
            crate::card::host::stub_config()
        });

        let mut state = AppState::new();
        state.card = FixtureCard::with_zone(settings.zone);
        state.card.set_config(config.clone(), &registry)?;
        state.editor.set_config(config);
        if state.card.config().is_some_and(|c| c.entity.is_empty()) {
            state.overlay = Overlay::Editor;
        }

        Ok(Self { settings, state, registry })
    }

    // -----------------------------------------------------------------------
    // Source response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_states_loaded(&mut self, states: States) {
        self.state.last_error = None;
        self.state.last_loaded_at = Some(Local::now().format("%H:%M:%S").to_string());
        self.state.editor.set_states(&states);
        if self.state.card.set_states(&states, Utc::now()) {
            self.state.cursor.clamp(&self.state.card);
        }
        self.state.states = Some(states);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    // -----------------------------------------------------------------------
    // Card interactions
    // -----------------------------------------------------------------------

    pub fn previous_round(&mut self) {
        self.navigate(CardAction::PreviousRound);
    }

    pub fn next_round(&mut self) {
        self.navigate(CardAction::NextRound);
    }

    pub fn return_to_live_round(&mut self) {
        self.navigate(CardAction::ReturnToLive);
    }

    fn navigate(&mut self, action: CardAction) {
        let before = self.state.card.round();
        self.dispatch(action);
        if self.state.card.round() != before {
            self.state.cursor.reset();
        }
    }

    pub fn reveal(&mut self, side: Side) {
        if let Some(id) = self.state.cursor.selected(&self.state.card) {
            self.dispatch(CardAction::Reveal(id, side));
        }
    }

    pub fn select_fixture(&mut self) {
        if let Some(id) = self.state.cursor.selected(&self.state.card) {
            self.dispatch(CardAction::Select(id));
        }
    }

    pub fn cursor_down(&mut self) {
        self.state.cursor.down(&self.state.card);
    }

    pub fn cursor_up(&mut self) {
        self.state.cursor.up();
    }

    fn dispatch(&mut self, action: CardAction) {
        if let Some(event) = self.state.card.dispatch(action, Utc::now()) {
            self.on_host_event(event);
        }
    }

    /// Notifications coming out of the card or its editor.
    pub fn on_host_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::ConfigChanged { config } => self.apply_config(config),
            HostEvent::MoreInfo { entity_id } => {
                info!("more info requested for {entity_id}");
                self.state.more_info = Some(entity_id);
                self.state.overlay = Overlay::MoreInfo;
            }
        }
    }

    fn apply_config(&mut self, config: CardConfig) {
        if let Err(e) = self.state.card.set_config(config.clone(), &self.registry) {
            error!("{e}");
            self.state.last_error = Some(e.to_string());
            return;
        }
        if let Err(e) = config_store::save_card_config(&self.settings.config_path, &config) {
            error!("{e}");
            self.state.last_error = Some(e);
        }
        info!("card config updated: entity={}", config.entity);

        if let Some(states) = self.state.states.as_ref() {
            self.state.card.set_states(states, Utc::now());
        }
        self.state.cursor.clamp(&self.state.card);
    }

    // -----------------------------------------------------------------------
    // Overlays and view toggles
    // -----------------------------------------------------------------------

    pub fn open_editor(&mut self) {
        if let Some(config) = self.state.card.config() {
            self.state.editor.set_config(config.clone());
        }
        if let Some(states) = self.state.states.as_ref() {
            self.state.editor.set_states(states);
        }
        self.state.overlay = Overlay::Editor;
    }

    pub fn toggle_help(&mut self) {
        self.state.overlay = match self.state.overlay {
            Overlay::Help => Overlay::None,
            _ => Overlay::Help,
        };
    }

    pub fn close_overlay(&mut self) {
        self.state.overlay = Overlay::None;
        self.state.more_info = None;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

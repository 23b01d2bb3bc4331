use crate::card::host::{CardConfig, HostEvent};
use fixture_api::States;

const SENSOR_PREFIX: &str = "sensor.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOption {
    pub entity_id: String,
    pub friendly_name: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EditorField {
    #[default]
    Entity,
    TeamId,
    League,
}

impl EditorField {
    pub fn next(self) -> Self {
        match self {
            EditorField::Entity => EditorField::TeamId,
            EditorField::TeamId => EditorField::League,
            EditorField::League => EditorField::Entity,
        }
    }
}

/// Companion editor: picks the sensor entity and edits the tracked team and league.
/// Every committed change is reported as a [`HostEvent::ConfigChanged`] carrying
/// the whole config.
#[derive(Debug, Default)]
pub struct CardEditor {
    config: CardConfig,
    all_entities: Vec<EntityOption>,
    filtered: Vec<EntityOption>,
    pub search: String,
    pub team_input: String,
    pub league_input: String,
    pub dropdown_open: bool,
    pub highlighted: usize,
    pub focus: EditorField,
}

impl CardEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_config(&mut self, config: CardConfig) {
        self.team_input = config.team_id.clone().unwrap_or_default();
        self.league_input = config.league.clone().unwrap_or_default();
        self.config = config;
    }

    /// Rebuild the entity options from the current states.
    pub fn set_states(&mut self, states: &States) {
        let mut options: Vec<EntityOption> = states
            .iter()
            .filter(|e| e.entity_id.starts_with(SENSOR_PREFIX))
            .map(|e| EntityOption {
                entity_id: e.entity_id.clone(),
                friendly_name: e.label().to_string(),
            })
            .collect();
        options.sort_by_cached_key(|o| o.friendly_name.to_lowercase());
        self.all_entities = options;
        self.apply_filter();
    }

    pub fn options(&self) -> &[EntityOption] {
        &self.filtered
    }

    /// Label for the selected entity: its friendly name when known.
    pub fn entity_label(&self) -> &str {
        self.all_entities
            .iter()
            .find(|o| o.entity_id == self.config.entity)
            .map_or(self.config.entity.as_str(), |o| o.friendly_name.as_str())
    }

    pub fn filter(&mut self, term: &str) {
        self.search = term.to_string();
        self.apply_filter();
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut term = std::mem::take(&mut self.search);
        term.push(c);
        self.dropdown_open = true;
        self.filter(&term);
    }

    pub fn pop_search_char(&mut self) {
        let mut term = std::mem::take(&mut self.search);
        term.pop();
        self.filter(&term);
    }

    fn apply_filter(&mut self) {
        let term = self.search.trim().to_lowercase();
        self.filtered = self
            .all_entities
            .iter()
            .filter(|o| {
                o.friendly_name.to_lowercase().contains(&term)
                    || o.entity_id.to_lowercase().contains(&term)
            })
            .cloned()
            .collect();
        self.highlighted = self.highlighted.min(self.filtered.len().saturating_sub(1));
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    pub fn move_highlight(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            self.highlighted = 0;
            return;
        }
        let max = self.filtered.len() - 1;
        self.highlighted = self.highlighted.saturating_add_signed(delta).min(max);
    }

    pub fn pick_highlighted(&mut self) -> Option<HostEvent> {
        let entity_id = self.filtered.get(self.highlighted)?.entity_id.clone();
        Some(self.set_entity(&entity_id))
    }

    pub fn set_entity(&mut self, entity_id: &str) -> HostEvent {
        self.config.entity = entity_id.to_string();
        self.dropdown_open = false;
        self.search.clear();
        self.apply_filter();
        self.config_changed()
    }

    pub fn push_team_char(&mut self, c: char) {
        self.team_input.push(c);
    }

    /// League ids are numeric; anything else is ignored.
    pub fn push_league_char(&mut self, c: char) {
        if c.is_ascii_digit() {
            self.league_input.push(c);
        }
    }

    pub fn commit_team_id(&mut self) -> HostEvent {
        self.config.team_id = Some(self.team_input.trim().to_string());
        self.config_changed()
    }

    pub fn commit_league(&mut self) -> HostEvent {
        self.config.league = Some(self.league_input.trim().to_string());
        self.config_changed()
    }

    fn config_changed(&self) -> HostEvent {
        HostEvent::ConfigChanged { config: self.config.clone() }
    }
}

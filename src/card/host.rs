//! The contract between the card and whatever hosts it: configuration, the element
//! registry consulted at setup time, and the notifications the card emits.

use crate::card::editor::CardEditor;
use fixture_api::TeamId;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

pub const CARD_TYPE: &str = "football-fixture-card";
pub const EDITOR_TYPE: &str = "football-fixture-card-editor";
/// Companion element the card cannot work without.
pub const ENTITY_ROW_ELEMENT: &str = "entity-row";

/// Team tracked when the configuration names none (FC Barcelona).
pub const DEFAULT_TEAM_ID: TeamId = 529;

/// Layout hint, in card units.
pub const CARD_SIZE: u16 = 3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardConfig {
    #[serde(default)]
    pub entity: String,
    #[serde(
        rename = "teamId",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub team_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub league: Option<String>,
}

impl CardConfig {
    pub fn for_entity(entity: impl Into<String>) -> Self {
        Self { entity: entity.into(), ..Default::default() }
    }

    /// The configured team id, or [`DEFAULT_TEAM_ID`] when it is unset, zero or
    /// not a number.
    pub fn tracked_team_id(&self) -> TeamId {
        self.team_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<TeamId>().ok())
            .filter(|id| *id != 0)
            .unwrap_or(DEFAULT_TEAM_ID)
    }
}

/// `teamId` and `league` arrive as numbers or strings depending on who wrote
/// the config.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

pub fn stub_config() -> CardConfig {
    CardConfig {
        team_id: Some(String::new()),
        league: Some(String::new()),
        ..CardConfig::for_entity(String::new())
    }
}

/// Factory for the companion editor.
pub fn config_element() -> CardEditor {
    CardEditor::new()
}

/// Notifications that leave the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    ConfigChanged { config: CardConfig },
    MoreInfo { entity_id: String },
}

/// Shown in card pickers and `--help`.
#[derive(Debug, Clone, Copy)]
pub struct CardDescriptor {
    pub card_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub preview: bool,
}

pub const DESCRIPTOR: CardDescriptor = CardDescriptor {
    card_type: CARD_TYPE,
    name: "Football Fixture Card",
    description: "Round-by-round football fixtures with spoiler-protected scores",
    preview: false,
};

/// Names of the UI elements the host has made available.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    defined: BTreeSet<String>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the card, its editor and the entity row.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.define(ENTITY_ROW_ELEMENT);
        registry.define(CARD_TYPE);
        registry.define(EDITOR_TYPE);
        registry
    }

    /// Returns false, keeping the first definition, when `name` already exists.
    pub fn define(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.defined.contains(&name) {
            warn!("element {name} is already defined, ignoring redefinition");
            return false;
        }
        self.defined.insert(name)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.defined.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracked_team_falls_back_to_default() {
        assert_eq!(CardConfig::default().tracked_team_id(), DEFAULT_TEAM_ID);
        assert_eq!(stub_config().tracked_team_id(), DEFAULT_TEAM_ID);

        let mut config = CardConfig::for_entity("sensor.laliga");
        config.team_id = Some("0".into());
        assert_eq!(config.tracked_team_id(), DEFAULT_TEAM_ID);
        config.team_id = Some("Real Madrid".into());
        assert_eq!(config.tracked_team_id(), DEFAULT_TEAM_ID);
        config.team_id = Some(" 541 ".into());
        assert_eq!(config.tracked_team_id(), 541);
    }

    #[test]
    fn config_accepts_numeric_team_and_league() {
        let config: CardConfig =
            serde_json::from_str(r#"{"entity":"sensor.laliga","teamId":541,"league":140}"#)
                .unwrap();
        assert_eq!(config.team_id.as_deref(), Some("541"));
        assert_eq!(config.league.as_deref(), Some("140"));
        assert_eq!(config.tracked_team_id(), 541);
    }

    #[test]
    fn config_serializes_with_host_field_names() {
        let mut config = CardConfig::for_entity("sensor.laliga");
        config.team_id = Some("529".into());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["teamId"], "529");
        assert!(json.get("league").is_none());
    }

    #[test]
    fn registry_keeps_first_definition() {
        let mut registry = ElementRegistry::new();
        assert!(!registry.is_defined(ENTITY_ROW_ELEMENT));
        assert!(registry.define(ENTITY_ROW_ELEMENT));
        assert!(!registry.define(ENTITY_ROW_ELEMENT));
        assert!(registry.is_defined(ENTITY_ROW_ELEMENT));
    }

    #[test]
    fn builtin_registry_has_companion_elements() {
        let registry = ElementRegistry::with_builtin();
        assert!(registry.is_defined(ENTITY_ROW_ELEMENT));
        assert!(registry.is_defined(CARD_TYPE));
        assert!(registry.is_defined(EDITOR_TYPE));
    }
}

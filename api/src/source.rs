use crate::hass::{
    self, CURRENT_ROUND, FRIENDLY_NAME, MAX_ROUND, RawEntity, RawFixture, StatesDocument,
};
use crate::{EntityState, Fixture, Score, Snapshot, States};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub type SourceResult<T> = Result<T, SourceError>;

/// Reads a states document from disk. Every call re-reads the file, so whatever
/// writes it (a Home Assistant export job, a test harness) controls the cadence.
#[derive(Debug, Clone)]
pub struct StatesSource {
    path: PathBuf,
}

#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error, String),
    Parsing(serde_json::Error, String),
    NotFound(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(e, path) => write!(f, "Could not read {path}: {e}"),
            SourceError::Parsing(e, path) => write!(f, "Invalid states json at {path}: {e}"),
            SourceError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io(e, _) => Some(e),
            SourceError::Parsing(e, _) => Some(e),
            SourceError::NotFound(_) => None,
        }
    }
}

impl StatesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn fetch_states(&self) -> SourceResult<States> {
        let display = self.path.display().to_string();
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(format!("states file {display}")));
            }
            Err(e) => return Err(SourceError::Io(e, display)),
        };
        parse_states(&content).map_err(|e| SourceError::Parsing(e, display))
    }
}

/// Parse a whole states document. Individual fixtures that are not objects are
/// dropped; everything else degrades to placeholders rather than failing.
pub fn parse_states(json: &str) -> Result<States, serde_json::Error> {
    let document: StatesDocument = serde_json::from_str(json)?;
    Ok(States::new(
        document
            .into_entities()
            .into_iter()
            .map(|(entity_id, raw)| map_entity(entity_id, raw)),
    ))
}

// ---------------------------------------------------------------------------
// Mapping: wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_entity(entity_id: String, raw: RawEntity) -> EntityState {
    let state = match raw.state {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => "unknown".to_string(),
        Some(other) => other.to_string(),
    };
    let friendly_name = raw
        .attributes
        .get(FRIENDLY_NAME)
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .map(ToString::to_string);

    EntityState {
        entity_id,
        state,
        friendly_name,
        last_updated: raw.last_updated,
        snapshot: map_snapshot(&raw.attributes),
    }
}

fn map_snapshot(attributes: &Map<String, Value>) -> Snapshot {
    let mut rounds = BTreeMap::new();
    for (key, value) in attributes {
        let Some(round) = hass::parse_round_key(key) else {
            continue;
        };
        let fixtures = value
            .as_array()
            .map(|entries| entries.iter().filter_map(map_fixture).collect())
            .unwrap_or_default();
        rounds.insert(round, fixtures);
    }

    Snapshot {
        current_round: attributes.get(CURRENT_ROUND).and_then(hass::coerce_round),
        max_round: attributes.get(MAX_ROUND).and_then(hass::coerce_round),
        rounds,
    }
}

fn map_fixture(value: &Value) -> Option<Fixture> {
    if !value.is_object() {
        return None;
    }
    let raw: RawFixture = serde_json::from_value(value.clone()).ok()?;
    let score = raw.score.unwrap_or_default();

    Some(Fixture {
        date: raw.date.as_ref().and_then(hass::parse_date),
        home_team: raw.home_team.unwrap_or_default(),
        away_team: raw.away_team.unwrap_or_default(),
        home_team_id: raw.home_team_id.as_ref().and_then(hass::coerce_int),
        away_team_id: raw.away_team_id.as_ref().and_then(hass::coerce_int),
        home_team_logo: raw.home_team_logo.filter(|url| !url.is_empty()),
        away_team_logo: raw.away_team_logo.filter(|url| !url.is_empty()),
        score: Score {
            home: score.home.as_ref().and_then(hass::coerce_goals),
            away: score.away.as_ref().and_then(hass::coerce_goals),
        },
    })
}

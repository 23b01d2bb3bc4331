/// Home Assistant states document: raw serde shapes for `/api/states` style dumps.
/// These map to our clean domain types via the mapping functions in source.rs.
///
/// Sensors are loose about types: ids and scores show up as numbers or numeric
/// strings, rounds may be missing or zero. Every numeric field is therefore kept as
/// a raw `Value` here and coerced during mapping.
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const CURRENT_ROUND: &str = "current_round";
pub const MAX_ROUND: &str = "max_round";
pub const FRIENDLY_NAME: &str = "friendly_name";

const ROUND_KEY_PREFIX: &str = "Round ";
const ROUND_KEY_SUFFIX: &str = " Fixtures";

// ---------------------------------------------------------------------------
// States document
// ---------------------------------------------------------------------------

/// Either the REST list form or a map keyed by entity id.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum StatesDocument {
    List(Vec<RawEntity>),
    Keyed(BTreeMap<String, RawEntity>),
}

impl StatesDocument {
    /// Flatten into `(entity_id, entity)` pairs. In the keyed form the map key
    /// wins over any `entity_id` inside the value.
    pub fn into_entities(self) -> Vec<(String, RawEntity)> {
        match self {
            StatesDocument::List(list) => list
                .into_iter()
                .filter_map(|e| Some((e.entity_id.clone()?, e)))
                .collect(),
            StatesDocument::Keyed(map) => map.into_iter().collect(),
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawEntity {
    #[serde(default)]
    pub entity_id: Option<String>,
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

// ---------------------------------------------------------------------------
// Fixtures  (`Round <n> Fixtures` attribute entries)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RawFixture {
    pub date: Option<Value>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_team_id: Option<Value>,
    pub away_team_id: Option<Value>,
    pub home_team_logo: Option<String>,
    pub away_team_logo: Option<String>,
    pub score: Option<RawScore>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RawScore {
    pub home: Option<Value>,
    pub away: Option<Value>,
}

/// `Round 12 Fixtures` → 12.
pub fn parse_round_key(key: &str) -> Option<u32> {
    key.strip_prefix(ROUND_KEY_PREFIX)?
        .strip_suffix(ROUND_KEY_SUFFIX)?
        .trim()
        .parse()
        .ok()
        .filter(|round| *round >= 1)
}

pub fn round_key(round: u32) -> String {
    format!("{ROUND_KEY_PREFIX}{round}{ROUND_KEY_SUFFIX}")
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

/// Integer from a JSON number or a numeric string. Fractions are rejected.
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Round numbers start at 1; zero or negative means "unknown".
pub fn coerce_round(value: &Value) -> Option<u32> {
    coerce_int(value)
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

pub fn coerce_goals(value: &Value) -> Option<u32> {
    coerce_int(value).and_then(|n| u32::try_from(n).ok())
}

/// Kickoff from an RFC 3339 string, a naive `YYYY-MM-DDTHH:MM:SS` string (read as
/// UTC) or epoch milliseconds. None for anything else.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"]
                        .iter()
                        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                        .map(|naive| naive.and_utc())
                })
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

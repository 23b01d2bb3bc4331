pub mod hass;
pub mod source;

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Numeric team identifier as delivered by the fixtures sensor.
pub type TeamId = i64;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the states document wire format
// ---------------------------------------------------------------------------

/// All entities of one states document, keyed by entity id.
#[derive(Debug, Clone, Default)]
pub struct States {
    entities: BTreeMap<String, EntityState>,
}

impl States {
    pub fn new(entities: impl IntoIterator<Item = EntityState>) -> Self {
        Self {
            entities: entities
                .into_iter()
                .map(|e| (e.entity_id.clone(), e))
                .collect(),
        }
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entities.get(entity_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityState> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityState {
    pub entity_id: String,
    pub state: String,
    pub friendly_name: Option<String>,
    pub last_updated: Option<String>,
    pub snapshot: Snapshot,
}

impl EntityState {
    /// Friendly name if the entity has one, else its id.
    pub fn label(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.entity_id)
    }
}

/// The fixture data carried by one entity: live round, navigation bound and
/// the fixtures of every round the sensor knows about.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub current_round: Option<u32>,
    pub max_round: Option<u32>,
    pub rounds: BTreeMap<u32, Vec<Fixture>>,
}

impl Snapshot {
    /// Fixtures of `round`, empty when the sensor has no entry for it.
    pub fn fixtures(&self, round: u32) -> &[Fixture] {
        self.rounds.get(&round).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The authoritative round: `current_round`, or round 1 when unknown,
    /// never above `max_round`.
    pub fn live_round(&self) -> u32 {
        let round = self.current_round.unwrap_or(1);
        match self.max_round {
            Some(max) => round.min(max.max(1)),
            None => round,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixture {
    /// Kickoff instant. None when the sensor sent something unparseable.
    pub date: Option<DateTime<Utc>>,
    pub home_team: String,
    pub away_team: String,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub home_team_logo: Option<String>,
    pub away_team_logo: Option<String>,
    pub score: Score,
}

impl Fixture {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == Some(team_id) || self.away_team_id == Some(team_id)
    }
}

/// Both sides are set once a match has kicked off, both None before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl Score {
    pub fn home_leads(&self) -> bool {
        matches!((self.home, self.away), (Some(h), Some(a)) if h > a)
    }

    pub fn away_leads(&self) -> bool {
        matches!((self.home, self.away), (Some(h), Some(a)) if a > h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current: Option<u32>, max: Option<u32>) -> Snapshot {
        Snapshot { current_round: current, max_round: max, rounds: BTreeMap::new() }
    }

    #[test]
    fn live_round_defaults_to_first_round() {
        assert_eq!(snapshot(None, None).live_round(), 1);
        assert_eq!(snapshot(None, Some(38)).live_round(), 1);
    }

    #[test]
    fn live_round_never_exceeds_max_round() {
        assert_eq!(snapshot(Some(40), Some(38)).live_round(), 38);
        assert_eq!(snapshot(Some(12), Some(38)).live_round(), 12);
    }

    #[test]
    fn missing_round_has_no_fixtures() {
        assert!(snapshot(Some(1), None).fixtures(7).is_empty());
    }

    #[test]
    fn score_leads_require_both_sides() {
        let full = Score { home: Some(2), away: Some(1) };
        assert!(full.home_leads());
        assert!(!full.away_leads());

        let partial = Score { home: Some(2), away: None };
        assert!(!partial.home_leads());
        assert!(!partial.away_leads());

        let level = Score { home: Some(1), away: Some(1) };
        assert!(!level.home_leads());
        assert!(!level.away_leads());
    }

    #[test]
    fn involves_matches_on_either_side_by_id() {
        let fixture = Fixture {
            home_team: "Barcelona".into(),
            home_team_id: Some(529),
            away_team_id: Some(541),
            ..Default::default()
        };
        assert!(fixture.involves(529));
        assert!(fixture.involves(541));
        assert!(!fixture.involves(530));
    }

    #[test]
    fn states_lookup_by_entity_id() {
        let states = States::new([EntityState {
            entity_id: "sensor.laliga".into(),
            friendly_name: Some("La Liga".into()),
            ..Default::default()
        }]);
        assert_eq!(states.len(), 1);
        assert_eq!(states.get("sensor.laliga").map(EntityState::label), Some("La Liga"));
        assert!(states.get("sensor.other").is_none());
    }
}

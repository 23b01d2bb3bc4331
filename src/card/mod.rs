pub mod editor;
pub mod host;
pub mod round;
pub mod view;

use crate::card::host::{CardConfig, ENTITY_ROW_ELEMENT, ElementRegistry, HostEvent};
use crate::card::round::RoundState;
use crate::card::view::{DisplayGroup, FixtureId, Side};
use chrono::{DateTime, FixedOffset, Local, Utc};
use fixture_api::{Snapshot, States, TeamId};
use log::{debug, info};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug)]
pub enum CardError {
    ResourceNotLoaded(String),
}

impl fmt::Display for CardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardError::ResourceNotLoaded(name) => write!(f, "Resource is not loaded: {name}"),
        }
    }
}

impl std::error::Error for CardError {}

/// User interactions the card responds to once its listeners are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    PreviousRound,
    NextRound,
    ReturnToLive,
    Reveal(FixtureId, Side),
    Select(FixtureId),
}

/// Timezone the card paints dates in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Zone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

/// The fixture card: holds the round state across snapshot pushes and repaints
/// the view model whenever the state or the data changes.
#[derive(Debug, Default)]
pub struct FixtureCard {
    config: Option<CardConfig>,
    round: RoundState,
    snapshot: Option<Snapshot>,
    listeners_attached: bool,
    groups: Vec<DisplayGroup>,
    revealed: HashSet<(FixtureId, Side)>,
    zone: Zone,
}

impl FixtureCard {
    pub fn with_zone(zone: Zone) -> Self {
        Self { zone, ..Self::default() }
    }

    /// Fails when the entity row element is missing; the card must not render then.
    pub fn set_config(
        &mut self,
        config: CardConfig,
        registry: &ElementRegistry,
    ) -> Result<(), CardError> {
        if !registry.is_defined(ENTITY_ROW_ELEMENT) {
            return Err(CardError::ResourceNotLoaded(ENTITY_ROW_ELEMENT.to_string()));
        }

        let entity_changed = self
            .config
            .as_ref()
            .is_some_and(|current| current.entity != config.entity);
        if entity_changed {
            info!("card entity changed to {}", config.entity);
            self.round = RoundState::Uninitialized;
            self.snapshot = None;
            self.groups.clear();
            self.revealed.clear();
        }
        self.config = Some(config);
        Ok(())
    }

    pub fn config(&self) -> Option<&CardConfig> {
        self.config.as_ref()
    }

    /// Push the latest states. Returns false, leaving everything untouched, when
    /// the configured entity has no state yet.
    pub fn set_states(&mut self, states: &States, now: DateTime<Utc>) -> bool {
        let Some(config) = self.config.as_ref() else {
            return false;
        };
        let Some(entity) = states.get(&config.entity) else {
            debug!("no state for {} yet, skipping paint", config.entity);
            return false;
        };

        let snapshot = entity.snapshot.clone();
        self.round = self.round.reconcile(&snapshot);
        self.snapshot = Some(snapshot);

        self.attach_listeners();
        self.paint(now);
        true
    }

    fn attach_listeners(&mut self) {
        if self.listeners_attached {
            return;
        }
        debug!("attaching card listeners");
        self.listeners_attached = true;
    }

    pub fn dispatch(&mut self, action: CardAction, now: DateTime<Utc>) -> Option<HostEvent> {
        if !self.listeners_attached {
            debug!("ignoring {action:?}, listeners not attached");
            return None;
        }

        match action {
            CardAction::PreviousRound => self.navigate(|round, snap| round.step(-1, snap), now),
            CardAction::NextRound => self.navigate(|round, snap| round.step(1, snap), now),
            CardAction::ReturnToLive => self.navigate(RoundState::return_to_live, now),
            CardAction::Reveal(id, side) => {
                if self.is_spoiler(id) {
                    self.revealed.insert((id, side));
                }
                None
            }
            CardAction::Select(id) => {
                if !self.is_spoiler(id) {
                    return None;
                }
                let entity_id = self.config.as_ref()?.entity.clone();
                Some(HostEvent::MoreInfo { entity_id })
            }
        }
    }

    fn navigate(
        &mut self,
        transition: impl FnOnce(RoundState, &Snapshot) -> RoundState,
        now: DateTime<Utc>,
    ) -> Option<HostEvent> {
        let snapshot = self.snapshot.as_ref()?;
        let next = transition(self.round, snapshot);
        if next != self.round {
            debug!("round {:?} -> {:?}", self.round, next);
        }
        self.round = next;
        self.paint(now);
        None
    }

    /// Rebuild the view model for the current round. Reveals do not survive it.
    fn paint(&mut self, now: DateTime<Utc>) {
        self.revealed.clear();
        let (Some(snapshot), Some(round)) = (self.snapshot.as_ref(), self.round.round()) else {
            return;
        };
        let fixtures = snapshot.fixtures(round);
        let tracked = self.tracked_team_id();
        self.groups = match self.zone {
            Zone::Local => view::render(fixtures, tracked, now, &Local),
            Zone::Fixed(offset) => view::render(fixtures, tracked, now, &offset),
        };
    }

    fn is_spoiler(&self, id: FixtureId) -> bool {
        view::find(&self.groups, id).is_some_and(|f| f.is_tracked_team_match)
    }

    pub fn is_revealed(&self, id: FixtureId, side: Side) -> bool {
        self.revealed.contains(&(id, side))
    }

    pub fn groups(&self) -> &[DisplayGroup] {
        &self.groups
    }

    pub fn round(&self) -> Option<u32> {
        self.round.round()
    }

    pub fn round_state(&self) -> RoundState {
        self.round
    }

    pub fn max_round(&self) -> Option<u32> {
        self.snapshot.as_ref()?.max_round
    }

    /// The round `ReturnToLive` would jump to; `None` while the sensor reports none.
    pub fn live_round(&self) -> Option<u32> {
        let snapshot = self.snapshot.as_ref()?;
        snapshot.current_round.map(|_| snapshot.live_round())
    }

    pub fn tracked_team_id(&self) -> TeamId {
        self.config
            .as_ref()
            .map_or(host::DEFAULT_TEAM_ID, CardConfig::tracked_team_id)
    }
}

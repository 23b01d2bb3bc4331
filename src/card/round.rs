use fixture_api::Snapshot;

/// Which round the card shows, and whether that choice follows the sensor or
/// the user.
///
/// `Tracking` follows `current_round` on every snapshot. `Overridden` holds a round
/// the user navigated to and survives snapshots until the live round catches up
/// with it or the user returns to the live round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundState {
    #[default]
    Uninitialized,
    Tracking { round: u32 },
    Overridden { round: u32 },
}

impl RoundState {
    pub fn round(&self) -> Option<u32> {
        match self {
            RoundState::Uninitialized => None,
            RoundState::Tracking { round } | RoundState::Overridden { round } => Some(*round),
        }
    }

    pub fn is_overridden(&self) -> bool {
        matches!(self, RoundState::Overridden { .. })
    }

    /// Fold a freshly pushed snapshot into the state.
    pub fn reconcile(self, snapshot: &Snapshot) -> Self {
        let live = snapshot.live_round();
        match self {
            RoundState::Uninitialized | RoundState::Tracking { .. } => {
                RoundState::Tracking { round: live }
            }
            RoundState::Overridden { round } => {
                let round = clamp_round(i64::from(round), snapshot.max_round);
                if round == live {
                    RoundState::Tracking { round: live }
                } else {
                    RoundState::Overridden { round }
                }
            }
        }
    }

    /// Manual navigation by `delta` rounds, clamped to `1..=max_round`.
    pub fn step(self, delta: i32, snapshot: &Snapshot) -> Self {
        let from = self.round().unwrap_or_else(|| snapshot.live_round());
        RoundState::Overridden {
            round: clamp_round(i64::from(from) + i64::from(delta), snapshot.max_round),
        }
    }

    /// Drop any override and follow the sensor again. No-op while the sensor does
    /// not report a current round.
    pub fn return_to_live(self, snapshot: &Snapshot) -> Self {
        match snapshot.current_round {
            Some(_) => RoundState::Tracking { round: snapshot.live_round() },
            None => self,
        }
    }
}

fn clamp_round(round: i64, max_round: Option<u32>) -> u32 {
    let upper = max_round.map_or(i64::from(u32::MAX), |max| i64::from(max.max(1)));
    // Bounded to 1..=u32::MAX above, so the conversion cannot fail.
    u32::try_from(round.clamp(1, upper)).unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(current: Option<u32>, max: Option<u32>) -> Snapshot {
        Snapshot { current_round: current, max_round: max, ..Default::default() }
    }

    #[test]
    fn first_snapshot_without_current_round_tracks_round_one() {
        let state = RoundState::Uninitialized.reconcile(&snapshot(None, None));
        assert_eq!(state, RoundState::Tracking { round: 1 });

        let state = RoundState::Uninitialized.reconcile(&snapshot(None, Some(38)));
        assert_eq!(state, RoundState::Tracking { round: 1 });
    }

    #[test]
    fn tracking_follows_live_round() {
        let state = RoundState::Tracking { round: 3 }.reconcile(&snapshot(Some(5), Some(38)));
        assert_eq!(state, RoundState::Tracking { round: 5 });
    }

    #[test]
    fn reconcile_is_idempotent() {
        for snap in [snapshot(Some(7), Some(38)), snapshot(Some(20), Some(20)), snapshot(None, Some(5))] {
            for start in [
                RoundState::Uninitialized,
                RoundState::Tracking { round: 2 },
                RoundState::Overridden { round: 9 },
                RoundState::Overridden { round: 7 },
                RoundState::Overridden { round: 30 },
            ] {
                let once = start.reconcile(&snap);
                assert_eq!(once.reconcile(&snap), once, "start={start:?} snap={snap:?}");
            }
        }
    }

    #[test]
    fn override_clamped_onto_live_round_tracks_it() {
        let state = RoundState::Overridden { round: 30 }.reconcile(&snapshot(Some(20), Some(20)));
        assert_eq!(state, RoundState::Tracking { round: 20 });
    }

    #[test]
    fn override_survives_until_live_round_catches_up() {
        let state = RoundState::Uninitialized.reconcile(&snapshot(Some(3), Some(38)));
        assert_eq!(state, RoundState::Tracking { round: 3 });

        let state = state.step(1, &snapshot(Some(3), Some(38)));
        assert_eq!(state, RoundState::Overridden { round: 4 });

        let state = state.reconcile(&snapshot(Some(3), Some(38)));
        assert_eq!(state, RoundState::Overridden { round: 4 });

        let state = state.reconcile(&snapshot(Some(4), Some(38)));
        assert_eq!(state, RoundState::Tracking { round: 4 });
    }

    #[test]
    fn step_clamps_to_first_round() {
        let snap = snapshot(Some(1), Some(38));
        let mut state = RoundState::Tracking { round: 1 };
        for _ in 0..5 {
            state = state.step(-1, &snap);
            assert_eq!(state.round(), Some(1));
        }
        assert!(state.is_overridden());
    }

    #[test]
    fn step_clamps_to_max_round_when_known() {
        let snap = snapshot(Some(37), Some(38));
        let state = RoundState::Tracking { round: 37 }.step(1, &snap).step(1, &snap).step(1, &snap);
        assert_eq!(state, RoundState::Overridden { round: 38 });
    }

    #[test]
    fn step_is_unbounded_without_max_round() {
        let snap = snapshot(Some(1), None);
        let mut state = RoundState::Tracking { round: 1 };
        for _ in 0..50 {
            state = state.step(1, &snap);
        }
        assert_eq!(state, RoundState::Overridden { round: 51 });
    }

    #[test]
    fn steps_stay_within_bounds_for_mixed_sequences() {
        let snap = snapshot(Some(4), Some(6));
        let deltas = [1, 1, 1, 1, -1, -1, -1, -1, -1, -1, -1, 1, 1, 1, 1, 1, 1, 1];
        let mut state = RoundState::Uninitialized.reconcile(&snap);
        for delta in deltas {
            state = state.step(delta, &snap);
            let round = state.round().unwrap();
            assert!((1..=6).contains(&round), "round {round} out of bounds");
        }
    }

    #[test]
    fn return_to_live_discards_override() {
        let snap = snapshot(Some(10), Some(38));
        let state = RoundState::Overridden { round: 2 }.return_to_live(&snap);
        assert_eq!(state, RoundState::Tracking { round: 10 });

        let state = RoundState::Tracking { round: 10 }.return_to_live(&snap);
        assert_eq!(state, RoundState::Tracking { round: 10 });
    }

    #[test]
    fn return_to_live_needs_a_live_round() {
        let state = RoundState::Overridden { round: 2 }.return_to_live(&snapshot(None, Some(38)));
        assert_eq!(state, RoundState::Overridden { round: 2 });
    }

    #[test]
    fn override_is_clamped_when_max_round_shrinks() {
        let state = RoundState::Overridden { round: 30 }.reconcile(&snapshot(Some(2), Some(20)));
        assert_eq!(state, RoundState::Overridden { round: 20 });
    }
}

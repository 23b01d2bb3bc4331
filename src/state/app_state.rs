use crate::card::FixtureCard;
use crate::card::editor::CardEditor;
use crate::card::host::config_element;
use crate::card::view::{self, FixtureId};
use fixture_api::States;

// ---------------------------------------------------------------------------
// Fixture cursor
// ---------------------------------------------------------------------------

/// Keyboard cursor over the painted fixtures. Stores a position in display order,
/// not a `FixtureId`, so it survives repaints.
#[derive(Debug, Default)]
pub struct CursorState {
    pub position: usize,
}

impl CursorState {
    pub fn selected(&self, card: &FixtureCard) -> Option<FixtureId> {
        view::display_order(card.groups()).get(self.position).copied()
    }

    pub fn down(&mut self, card: &FixtureCard) {
        let max = view::display_order(card.groups()).len().saturating_sub(1);
        if self.position < max {
            self.position += 1;
        }
    }

    pub fn up(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Keep the cursor on a fixture after the list changed size.
    pub fn clamp(&mut self, card: &FixtureCard) {
        let len = view::display_order(card.groups()).len();
        self.position = self.position.min(len.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    Help,
    Editor,
    /// Entity details requested by selecting a tracked fixture.
    MoreInfo,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub card: FixtureCard,
    pub editor: CardEditor,
    pub cursor: CursorState,
    pub overlay: Overlay,
    /// Entity whose details the more-info overlay shows.
    pub more_info: Option<String>,
    /// Last states pushed by the source, kept for the editor and re-pushes after
    /// config changes.
    pub states: Option<States>,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub last_loaded_at: Option<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self { editor: config_element(), ..Self::default() }
    }
}

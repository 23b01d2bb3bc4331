use crate::card::host::CARD_SIZE;
use tui::layout::{Constraint, Layout, Rect, Size};

pub const STATUS_HEIGHT: u16 = 1;
const LOGS_PERCENT: u16 = 30;

/// Pre-computed layout areas for the main draw loop.
pub struct LayoutAreas {
    pub header: Rect,
    pub main: Rect,
    pub logs: Rect,
    pub status: Rect,
}

impl LayoutAreas {
    pub fn new(size: Size) -> Self {
        let rect = Rect::new(0, 0, size.width, size.height);
        Self::from_rect(rect, false, false)
    }

    pub fn update(&mut self, area: Rect, full_screen: bool, show_logs: bool) {
        *self = Self::from_rect(area, full_screen, show_logs);
    }

    fn from_rect(area: Rect, full_screen: bool, show_logs: bool) -> Self {
        if full_screen {
            let [header, main] =
                Layout::vertical([Constraint::Length(CARD_SIZE), Constraint::Fill(1)]).areas(area);
            return LayoutAreas {
                header,
                main,
                logs: Rect::ZERO,
                status: Rect::ZERO,
            };
        }

        let [header, body, status] = Layout::vertical([
            Constraint::Length(CARD_SIZE),
            Constraint::Fill(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .areas(area);

        let (main, logs) = Self::split_logs(body, show_logs);
        LayoutAreas {
            header,
            main,
            logs,
            status,
        }
    }

    fn split_logs(area: Rect, show_logs: bool) -> (Rect, Rect) {
        if !show_logs {
            return (area, Rect::ZERO);
        }
        let [main, logs] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Percentage(LOGS_PERCENT),
        ])
        .areas(area);
        (main, logs)
    }
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
pub fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);
    center
}

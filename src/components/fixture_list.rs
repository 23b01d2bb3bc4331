use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

use crate::card::view::{AnnotatedFixture, DisplayGroup, FixtureId, Side};

/// Shown in place of a tracked team's score until that side is revealed.
pub const SPOILER_MASK: &str = "▒▒▒";
/// Stands in for a team crest; the hollow mark when the sensor has no logo.
pub const LOGO_MARK: &str = "●";
pub const LOGO_PLACEHOLDER: &str = "○";

const MARKER_WIDTH: u16 = 2;
const LOGO_WIDTH: u16 = 2;
const SCORE_WIDTH: u16 = 4;
const TIME_WIDTH: u16 = 7;

/// Draws the painted date groups: one header line per group, then a home and an
/// away line per fixture. All decisions come from the view model.
pub struct FixtureList<'a, R>
where
    R: Fn(FixtureId, Side) -> bool,
{
    pub groups: &'a [DisplayGroup],
    pub is_revealed: R,
    pub selected: Option<FixtureId>,
}

impl<R> FixtureList<'_, R>
where
    R: Fn(FixtureId, Side) -> bool,
{
    fn lines(&self, width: u16) -> Vec<(Line<'static>, Option<FixtureId>)> {
        let team_width = width
            .saturating_sub(MARKER_WIDTH + LOGO_WIDTH + SCORE_WIDTH + TIME_WIDTH)
            .max(1) as usize;

        let mut lines = Vec::new();
        for (idx, group) in self.groups.iter().enumerate() {
            if idx > 0 {
                lines.push((Line::from(""), None));
            }
            lines.push((
                Line::from(Span::styled(
                    group.date_label.clone(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                None,
            ));
            for fixture in &group.fixtures {
                for side in [Side::Home, Side::Away] {
                    lines.push((self.fixture_line(fixture, side, team_width), Some(fixture.id)));
                }
            }
        }
        lines
    }

    fn fixture_line(&self, fixture: &AnnotatedFixture, side: Side, team_width: usize) -> Line<'static> {
        let is_selected = self.selected == Some(fixture.id);
        let marker = match (is_selected, side) {
            (true, Side::Home) => "› ",
            _ => "  ",
        };

        let mut team_style = Style::default();
        if fixture.is_tracked(side) {
            team_style = team_style.add_modifier(Modifier::BOLD);
        }
        if is_selected {
            team_style = team_style.fg(Color::Yellow);
        }

        let score = if fixture.is_tracked_team_match && !(self.is_revealed)(fixture.id, side) {
            Span::styled(
                format!("{SPOILER_MASK:>width$}", width = SCORE_WIDTH as usize - 1),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            let style = if fixture.emphasis(side) {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Span::styled(
                format!("{:>width$}", fixture.score_label(side), width = SCORE_WIDTH as usize - 1),
                style,
            )
        };

        let logo = match fixture.logo(side) {
            Some(_) => Span::raw(format!("{LOGO_MARK} ")),
            None => Span::styled(format!("{LOGO_PLACEHOLDER} "), Style::default().fg(Color::DarkGray)),
        };

        let time = match side {
            Side::Home => fixture.time_or_result.clone(),
            Side::Away => String::new(),
        };

        Line::from(vec![
            Span::raw(marker),
            logo,
            Span::styled(pad(fixture.team(side), team_width), team_style),
            Span::raw(" "),
            score,
            Span::styled(
                format!("  {time}"),
                Style::default().fg(Color::Gray),
            ),
        ])
    }
}

impl<R> Widget for FixtureList<'_, R>
where
    R: Fn(FixtureId, Side) -> bool,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.groups.is_empty() {
            Paragraph::new("No fixtures in this round")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .render(area, buf);
            return;
        }

        let lines = self.lines(area.width);
        let offset = scroll_offset(&lines, self.selected, area.height as usize);
        for (row, (line, _)) in lines.iter().skip(offset).take(area.height as usize).enumerate() {
            buf.set_line(area.x, area.y + row as u16, line, area.width);
        }
    }
}

/// First visible line such that both lines of the selected fixture fit.
fn scroll_offset(
    lines: &[(Line<'static>, Option<FixtureId>)],
    selected: Option<FixtureId>,
    height: usize,
) -> usize {
    let Some(selected) = selected else {
        return 0;
    };
    let Some(last) = lines.iter().rposition(|(_, id)| *id == Some(selected)) else {
        return 0;
    };
    (last + 1).saturating_sub(height)
}

fn pad(name: &str, width: usize) -> String {
    let clipped: String = name.chars().take(width).collect();
    format!("{clipped:<width$}")
}

use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::Widget;

/// `←  Round 4  →`, centered. An arrow is dimmed when stepping that way would be
/// clamped; a hint to the live round appears while the user has navigated away.
pub struct RoundHeader {
    pub round: Option<u32>,
    pub live_round: Option<u32>,
    pub max_round: Option<u32>,
    pub overridden: bool,
}

impl RoundHeader {
    fn title(&self) -> String {
        match self.round {
            Some(round) => format!("Round {round}"),
            None => "Round –".to_string(),
        }
    }

    fn line(&self) -> Line<'static> {
        let active = Style::default().fg(Color::White);
        let dimmed = Style::default().fg(Color::DarkGray);

        let at_first = self.round.is_none_or(|r| r <= 1);
        let at_last = match (self.round, self.max_round) {
            (Some(round), Some(max)) => round >= max,
            (None, _) => true,
            _ => false,
        };

        let mut spans = vec![
            Span::styled("←  ", if at_first { dimmed } else { active }),
            Span::styled(self.title(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled("  →", if at_last { dimmed } else { active }),
        ];
        if self.overridden
            && let Some(live) = self.live_round
        {
            spans.push(Span::styled(
                format!("   live: {live} (r)"),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for RoundHeader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let line = self.line();
        let width = line.width() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        buf.set_line(x, area.y, &line, area.width);
    }
}

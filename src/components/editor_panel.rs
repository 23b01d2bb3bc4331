use tui::buffer::Buffer;
use tui::layout::{Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Paragraph, Widget};

use crate::card::editor::{CardEditor, EditorField};

const FIELD_HEIGHT: u16 = 2;

/// Three labelled inputs (entity, team id, league) plus the entity dropdown.
pub struct EditorPanel<'a> {
    pub editor: &'a CardEditor,
}

impl EditorPanel<'_> {
    fn field(&self, label: &'static str, value: String, field: EditorField) -> Paragraph<'static> {
        let focused = self.editor.focus == field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "▏" } else { "" };
        Paragraph::new(vec![
            Line::from(Span::styled(label, label_style)),
            Line::from(vec![
                Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(cursor),
            ]),
        ])
    }

    fn entity_value(&self) -> String {
        if self.editor.focus == EditorField::Entity && !self.editor.search.is_empty() {
            return self.editor.search.clone();
        }
        match self.editor.entity_label() {
            "" => "Select an option".to_string(),
            label => label.to_string(),
        }
    }

    fn dropdown(&self, area: Rect, buf: &mut Buffer) {
        let options = self.editor.options();
        if options.is_empty() {
            Paragraph::new("No matching sensors")
                .style(Style::default().fg(Color::DarkGray))
                .render(area, buf);
            return;
        }

        let visible = area.height as usize / 2;
        let start = (self.editor.highlighted + 1).saturating_sub(visible.max(1));
        let mut lines = Vec::new();
        for (idx, option) in options.iter().enumerate().skip(start).take(visible) {
            let style = if idx == self.editor.highlighted {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(option.friendly_name.clone(), style)));
            lines.push(Line::from(Span::styled(
                format!("  {}", option.entity_id),
                Style::default().fg(Color::DarkGray),
            )));
        }
        Paragraph::new(lines).render(area, buf);
    }
}

impl Widget for EditorPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [entity, team, league, legend, list] = Layout::vertical([
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(FIELD_HEIGHT),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.field("Entity*", self.entity_value(), EditorField::Entity)
            .render(entity, buf);
        self.field("Team Id", self.editor.team_input.clone(), EditorField::TeamId)
            .render(team, buf);
        self.field("League", self.editor.league_input.clone(), EditorField::League)
            .render(league, buf);
        Paragraph::new("Tab=field  type=filter/edit  ↑/↓=move  Enter=apply  Esc=close")
            .style(Style::default().fg(Color::DarkGray))
            .render(legend, buf);

        if self.editor.focus == EditorField::Entity && self.editor.dropdown_open {
            self.dropdown(list, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::host::CardConfig;
    use fixture_api::{EntityState, States};

    fn text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf.cell((x, y)).map_or(" ", |c| c.symbol()));
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn shows_config_and_open_dropdown() {
        let mut editor = CardEditor::new();
        let mut config = CardConfig::for_entity("sensor.laliga");
        config.team_id = Some("529".into());
        editor.set_config(config);
        editor.set_states(&States::new([EntityState {
            entity_id: "sensor.laliga".into(),
            friendly_name: Some("La Liga Fixtures".into()),
            ..Default::default()
        }]));
        editor.toggle_dropdown();

        let area = Rect::new(0, 0, 70, 14);
        let mut buf = Buffer::empty(area);
        EditorPanel { editor: &editor }.render(area, &mut buf);

        let out = text(&buf);
        assert!(out.contains("Entity*"));
        assert!(out.contains("La Liga Fixtures"));
        assert!(out.contains("529"));
        assert!(out.contains("  sensor.laliga"));
    }

    #[test]
    fn empty_entity_prompts_for_selection() {
        let editor = CardEditor::new();
        let area = Rect::new(0, 0, 70, 10);
        let mut buf = Buffer::empty(area);
        EditorPanel { editor: &editor }.render(area, &mut buf);
        assert!(text(&buf).contains("Select an option"));
    }
}

use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::card::host::DESCRIPTOR;
use crate::card::view::{FixtureId, Side};
use crate::components::editor_panel::EditorPanel;
use crate::components::fixture_list::FixtureList;
use crate::components::round_header::RoundHeader;
use crate::state::app_state::Overlay;
use crate::state::source::{ERROR_CHAR, LoadingState};
use crate::ui::layout::{LayoutAreas, centered};

const KEY_LEGEND: &str = "←/→=round  r=live  j/k=move  h/a=reveal  Enter=info  e=edit  ?=help  q=quit";

static HELP_TEXT: &[(&str, &str)] = &[
    ("← / p", "previous round"),
    ("→ / n", "next round"),
    ("r", "return to the live round"),
    ("j / k", "move between fixtures"),
    ("h / a", "reveal home / away score"),
    ("Enter", "entity details (tracked team)"),
    ("e", "edit card config"),
    ("\"", "toggle logs"),
    ("f", "toggle full screen"),
    ("Esc", "close overlay"),
    ("q", "quit"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        draw_header(f, layout.header, app);
        draw_fixtures(f, layout.main, app);
        if !app.settings.full_screen {
            if app.state.show_logs {
                draw_logs(f, layout.logs);
            }
            draw_status(f, layout.status, app);
        }

        match app.state.overlay {
            Overlay::None => {}
            Overlay::Help => draw_help(f, f.area()),
            Overlay::Editor => draw_editor(f, f.area(), app),
            Overlay::MoreInfo => draw_more_info(f, f.area(), app),
        }

        draw_loading_spinner(f, f.area(), loading);
    });
    if let Err(e) = result {
        log::error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn card_title(app: &App) -> String {
    let entity = app.state.card.config().map(|c| c.entity.as_str()).unwrap_or_default();
    let label = app
        .state
        .states
        .as_ref()
        .and_then(|states| states.get(entity))
        .map(|e| e.label())
        .filter(|label| !label.is_empty())
        .unwrap_or(DESCRIPTOR.name);
    format!(" {label} ")
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(card_title(app));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let card = &app.state.card;
    f.render_widget(
        RoundHeader {
            round: card.round(),
            live_round: card.live_round(),
            max_round: card.max_round(),
            overridden: card.round_state().is_overridden(),
        },
        inner,
    );
}

fn draw_fixtures(f: &mut Frame, area: Rect, app: &App) {
    let card = &app.state.card;
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if card.round().is_none() {
        let msg = match (card.config(), app.state.last_error.as_deref()) {
            (Some(config), _) if config.entity.is_empty() => "No entity configured. Press e to pick one.".to_string(),
            (_, Some(err)) => format!("Loading states failed:\n{err}"),
            _ => "Waiting for fixture data...".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    f.render_widget(
        FixtureList {
            groups: card.groups(),
            is_revealed: |id: FixtureId, side: Side| card.is_revealed(id, side),
            selected: app.state.cursor.selected(card),
        },
        inner,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let status = if let Some(err) = app.state.last_error.as_deref() {
        Span::styled(format!(" {err}"), Style::default().fg(Color::Red))
    } else if let Some(at) = app.state.last_loaded_at.as_deref() {
        Span::styled(format!(" updated {at}"), Style::default().fg(Color::Gray))
    } else {
        Span::raw("")
    };
    f.render_widget(Paragraph::new(Line::from(status)), area);
    f.render_widget(
        Paragraph::new(KEY_LEGEND)
            .alignment(Alignment::Right)
            .style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan));
    f.render_widget(logs, area);
}

fn overlay_frame(f: &mut Frame, area: Rect, title: &str) -> Rect {
    f.render_widget(Clear, area);
    let block = default_border(Color::Yellow).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

fn draw_help(f: &mut Frame, area: Rect) {
    let inner = overlay_frame(f, centered(area, 60, 60), " Help ");
    let lines: Vec<Line> = HELP_TEXT
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{key:>8}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_editor(f: &mut Frame, area: Rect, app: &App) {
    let inner = overlay_frame(f, centered(area, 70, 80), " Card config ");
    f.render_widget(EditorPanel { editor: &app.state.editor }, inner);
}

fn draw_more_info(f: &mut Frame, area: Rect, app: &App) {
    let inner = overlay_frame(f, centered(area, 60, 50), " Entity ");

    let entity = app
        .state
        .more_info
        .as_deref()
        .and_then(|id| app.state.states.as_ref()?.get(id));
    let Some(entity) = entity else {
        f.render_widget(
            Paragraph::new("Entity is no longer available")
                .style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    };

    let label = Style::default().fg(Color::Gray);
    let optional = |value: Option<u32>| value.map_or("-".to_string(), |v| v.to_string());
    let lines = vec![
        Line::from(Span::styled(entity.label().to_string(), Style::default().fg(Color::White))),
        Line::from(Span::styled(entity.entity_id.clone(), Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(vec![Span::styled("State          ", label), Span::raw(entity.state.clone())]),
        Line::from(vec![
            Span::styled("Current round  ", label),
            Span::raw(optional(entity.snapshot.current_round)),
        ]),
        Line::from(vec![
            Span::styled("Max round      ", label),
            Span::raw(optional(entity.snapshot.max_round)),
        ]),
        Line::from(vec![
            Span::styled("Last updated   ", label),
            Span::raw(entity.last_updated.clone().unwrap_or_else(|| "-".to_string())),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    f.render_widget(spinner, Rect::new(area.width.saturating_sub(3), 1, 1, 1));
}

use super::{severity_style, status_style};
use crate::app::App;
use crate::common::format::format_date_time;
use crate::form::{DetailState, Field};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let Some(detail) = app.detail.as_ref() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Incident {}", detail.id));

    let Some(incident) = &detail.incident else {
        let (text, style) = match &detail.error {
            Some(err) => (format!("Error: {err}"), Style::default().fg(Color::Red)),
            None => ("Loading...".to_string(), Style::default().fg(Color::Yellow)),
        };
        frame.render_widget(Paragraph::new(text).style(style).block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Field::ALL.len() as u16 + 3),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);

    let rows: Vec<Row> = Field::ALL
        .iter()
        .map(|field| {
            let value = value_cell(detail, *field);
            Row::new(vec![
                Cell::from(Span::styled(
                    field.label(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                value,
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(0)])
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    let selected = Field::ALL.iter().position(|f| *f == detail.selected);
    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, chunks[0], &mut state);

    let timestamps = vec![
        Line::from(vec![
            Span::styled("Created: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format_date_time(&incident.created_at)),
        ]),
        Line::from(vec![
            Span::styled("Updated: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format_date_time(&incident.updated_at)),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(timestamps).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );

    let mut status_lines = Vec::new();
    if detail.saving {
        status_lines.push(Line::styled("Saving...", Style::default().fg(Color::Yellow)));
    }
    if detail.deleting {
        status_lines.push(Line::styled("Deleting...", Style::default().fg(Color::Yellow)));
    }
    if let Some(err) = &detail.field_error {
        status_lines.push(Line::styled(err.clone(), Style::default().fg(Color::Red)));
    }
    if let Some(err) = &detail.error {
        status_lines.push(Line::styled(
            format!("Error: {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    frame.render_widget(
        Paragraph::new(status_lines).wrap(Wrap { trim: true }),
        chunks[2],
    );
}

fn value_cell(detail: &DetailState, field: Field) -> Cell<'static> {
    if let Some(edit) = detail.editing.as_ref().filter(|e| e.field == field) {
        let text = if field.is_choice() {
            format!("< {} >", edit.buffer)
        } else {
            format!("{}_", edit.buffer)
        };
        return Cell::from(Span::styled(text, Style::default().fg(Color::Yellow)));
    }

    let Some(incident) = &detail.incident else {
        return Cell::from("");
    };
    match field {
        Field::Severity => Cell::from(Span::styled(
            format!("{} ({})", incident.severity.as_str(), incident.severity.label()),
            severity_style(incident.severity),
        )),
        Field::Status => Cell::from(Span::styled(
            incident.status.label(),
            status_style(incident.status),
        )),
        Field::Owner => Cell::from(incident.owner_label().to_string()),
        Field::Summary => Cell::from(incident.summary.clone().unwrap_or_else(|| "-".into())),
        _ => Cell::from(detail.current_value(field)),
    }
}

use super::{severity_style, status_style};
use crate::app::App;
use crate::common::format::{format_date, truncate};
use crate::query::{Sort, SortField, SortOrder};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

const COLUMNS: [(&str, Option<SortField>); 7] = [
    ("ID", Some(SortField::Id)),
    ("Title", Some(SortField::Title)),
    ("Severity", Some(SortField::Severity)),
    ("Status", Some(SortField::Status)),
    ("Service", None),
    ("Owner", None),
    ("Created", Some(SortField::CreatedAt)),
];

/// Header label with the sort key hint and, for the active column, its
/// direction.
fn column_label(name: &str, field: Option<SortField>, sort: Sort) -> String {
    let Some(field) = field else {
        return name.to_string();
    };
    let key = SortField::ALL
        .iter()
        .position(|f| *f == field)
        .map_or(0, |i| i + 1);
    let arrow = match (sort.field == field, sort.order) {
        (true, SortOrder::Asc) => " ▲",
        (true, SortOrder::Desc) => " ▼",
        (false, _) => "",
    };
    format!("{key}:{name}{arrow}")
}

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let error = app.list.error().map(str::to_string);
    let mut constraints = Vec::new();
    if app.search_mode {
        constraints.push(Constraint::Length(3));
    }
    if error.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut slots = chunks.iter().copied();
    if app.search_mode {
        if let Some(slot) = slots.next() {
            render_search(app, frame, slot);
        }
    }
    if let Some(err) = error {
        if let Some(slot) = slots.next() {
            render_error(&err, frame, slot);
        }
    }
    let Some(table_area) = slots.next() else {
        return;
    };

    let title = if app.list.is_loading() {
        "Incidents (loading…)"
    } else {
        "Incidents"
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.list.rows().is_empty() {
        let text = if app.list.is_loading() {
            "Loading incidents..."
        } else {
            "No incidents match the current filters."
        };
        frame.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::Yellow))
                .block(block),
            table_area,
        );
        return;
    }

    let sort = app.list.sort();
    let header = Row::new(
        COLUMNS
            .iter()
            .map(|(name, field)| Cell::from(column_label(name, *field, sort))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .list
        .rows()
        .iter()
        .map(|incident| {
            Row::new(vec![
                Cell::from(incident.id.clone()),
                Cell::from(truncate(&incident.title, 48)),
                Cell::from(Span::styled(
                    incident.severity.as_str(),
                    severity_style(incident.severity),
                )),
                Cell::from(Span::styled(
                    incident.status.label(),
                    status_style(incident.status),
                )),
                Cell::from(incident.service.clone()),
                Cell::from(incident.owner_label().to_string()),
                Cell::from(format_date(&incident.created_at)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Percentage(35),
            Constraint::Length(11),
            Constraint::Length(12),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Length(18),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
    .highlight_symbol(">> ");

    frame.render_stateful_widget(table, table_area, &mut app.table_state);
}

fn render_search(app: &App, frame: &mut Frame, area: Rect) {
    let search = Paragraph::new(format!("{}_", app.search_input)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search")
            .style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(search, area);
}

fn render_error(err: &str, frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new(format!("Error: {err} (r to retry)"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

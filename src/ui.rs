use crate::app::{App, CurrentView};
use crate::pages::{create, dashboard, detail, popups};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub fn render(app: &mut App, frame: &mut Frame) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(app, frame, layout[0]);

    match app.current_view {
        CurrentView::Dashboard => dashboard::render(app, frame, layout[1]),
        CurrentView::Create => create::render(app, frame, layout[1]),
        CurrentView::Detail => detail::render(app, frame, layout[1]),
    }

    frame.render_widget(
        Paragraph::new(help_text(app)).style(Style::default().fg(Color::DarkGray)),
        layout[2],
    );

    if app
        .detail
        .as_ref()
        .is_some_and(|d| d.confirm_delete && app.current_view == CurrentView::Detail)
    {
        popups::render_delete_confirm(app, frame);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let counts = app.list.counts();
    let counts_text = if app.list.counts_loading() {
        "Loading…".to_string()
    } else {
        counts.total_count.to_string()
    };

    let mut summary = vec![
        Span::styled("Incidents: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(counts_text),
        Span::raw("  "),
        Span::styled("Open: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(counts.open_count.to_string()),
        Span::raw("  "),
        Span::styled("Active SEV1: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            counts.active_sev1_count.to_string(),
            if counts.active_sev1_count > 0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            },
        ),
        Span::raw("  "),
        Span::raw(format!(
            "Page {}/{}",
            app.list.page_number(),
            app.list.total_pages().max(app.list.page_number() as u64)
        )),
    ];
    if let Some(notice) = &app.notice {
        summary.push(Span::raw("  "));
        summary.push(Span::styled(notice.clone(), Style::default().fg(Color::Green)));
    }

    let filters = app.list.filters();
    let sort = app.list.sort();
    let filter_line = Line::from(format!(
        "Status: {} | Severity: {} | Service: {} | Search: {} | Sort: {} {} | Page size: {}",
        filters.status.map_or("All", |s| s.label()),
        filters.severity.map_or("All", |s| s.as_str()),
        filters.service.as_deref().unwrap_or("All"),
        filters.search.as_deref().unwrap_or("-"),
        sort.field.as_str(),
        sort.order.as_str(),
        app.list.page_size(),
    ));

    frame.render_widget(
        Paragraph::new(vec![Line::from(summary), filter_line])
            .block(Block::default().borders(Borders::ALL).title("Incident Tracker")),
        area,
    );
}

fn help_text(app: &App) -> &'static str {
    match app.current_view {
        CurrentView::Dashboard if app.search_mode => "Type to search | Enter: apply | Esc: discard",
        CurrentView::Dashboard => {
            "q: quit | j/k: move | Enter: open | n/p: page | /: search | s/v/f: status/severity/service | z: page size | 1-5: sort | r: refresh | c: new"
        }
        CurrentView::Create => {
            "Tab/Shift-Tab: field | ←/→: choose | Enter: create | Esc: cancel"
        }
        CurrentView::Detail => match &app.detail {
            Some(d) if d.editing.is_some() => "Enter: save | ←/→: choose | Esc: cancel",
            _ => "j/k: field | Enter: edit | d: delete | Esc/q: back",
        },
    }
}

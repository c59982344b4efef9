use crate::app::App;
use crate::common::layout::centered_rect;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn render_delete_confirm(app: &App, frame: &mut Frame) {
    let Some(detail) = &app.detail else {
        return;
    };
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let title = detail
        .incident
        .as_ref()
        .map_or(detail.id.as_str(), |i| i.title.as_str());

    let text = vec![
        Line::from(format!("Delete incident {}?", detail.id)),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("This cannot be undone. y: delete | n/Esc: cancel"),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Confirm Delete")
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}

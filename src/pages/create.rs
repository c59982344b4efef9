use crate::app::App;
use crate::form::Field;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub fn render(app: &mut App, frame: &mut Frame, area: Rect) {
    let form = &app.create_form;
    let title = if form.submitting {
        "New Incident (saving…)"
    } else {
        "New Incident"
    };
    let outer = Block::default().borders(Borders::ALL).title(title);
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = Field::ALL.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in Field::ALL.iter().copied().enumerate() {
        let focused = form.focus == field;
        let value = form.draft.value(field);
        let shown = match (field.is_choice(), value.is_empty()) {
            (true, true) => "< choose >".to_string(),
            (true, false) => format!("< {value} >"),
            (false, _) if focused => format!("{value}_"),
            (false, _) => value.to_string(),
        };

        let mut label = field.label().to_string();
        if let Some(err) = form.errors.get(field) {
            label = format!("{label}: {err}");
        }
        let style = match (form.errors.get(field).is_some(), focused) {
            (true, _) => Style::default().fg(Color::Red),
            (false, true) => Style::default().fg(Color::Yellow),
            (false, false) => Style::default(),
        };

        frame.render_widget(
            Paragraph::new(shown).block(Block::default().borders(Borders::ALL).title(label).style(style)),
            rows[i],
        );
    }

    if let Some(err) = &form.error {
        frame.render_widget(
            Paragraph::new(format!("Error: {err}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true }),
            rows[Field::ALL.len()],
        );
    }
}

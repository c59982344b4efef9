pub mod create;
pub mod dashboard;
pub mod detail;
pub mod popups;

use crate::api::types::{Severity, Status};
use ratatui::style::{Color, Style};

pub(crate) fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Sev1 => Style::default().fg(Color::Red),
        Severity::Sev2 => Style::default().fg(Color::LightRed),
        Severity::Sev3 => Style::default().fg(Color::Yellow),
        Severity::Sev4 => Style::default(),
    }
}

pub(crate) fn status_style(status: Status) -> Style {
    match status {
        Status::Open => Style::default().fg(Color::Red),
        Status::Mitigated => Style::default().fg(Color::Yellow),
        Status::Resolved => Style::default().fg(Color::Green),
    }
}

//! Create form and inline detail editing.
//!
//! Validation runs before any request is built. Errors are keyed by field so
//! one bad field never discards the rest of the input.

use std::collections::BTreeMap;
use std::fmt;

use crate::api::types::{CreateIncidentRequest, Incident, Severity, Status, UpdateIncidentRequest};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    #[default]
    Title,
    Service,
    Severity,
    Status,
    Owner,
    Summary,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Title,
        Field::Service,
        Field::Severity,
        Field::Status,
        Field::Owner,
        Field::Summary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Service => "Service",
            Field::Severity => "Severity",
            Field::Status => "Status",
            Field::Owner => "Owner",
            Field::Summary => "Summary",
        }
    }

    /// Picked from a fixed set rather than typed.
    pub fn is_choice(self) -> bool {
        matches!(self, Field::Service | Field::Severity | Field::Status)
    }

    pub fn next(self) -> Field {
        let idx = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(idx + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let idx = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(idx + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, msg)| format!("{}: {}", field.label(), msg))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

/// Form input exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentDraft {
    pub title: String,
    pub service: String,
    pub severity: String,
    pub status: String,
    pub owner: String,
    pub summary: String,
}

impl Default for IncidentDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            service: String::new(),
            severity: Severity::Sev4.as_str().to_string(),
            status: Status::Open.as_str().to_string(),
            owner: String::new(),
            summary: String::new(),
        }
    }
}

impl IncidentDraft {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Service => &self.service,
            Field::Severity => &self.severity,
            Field::Status => &self.status,
            Field::Owner => &self.owner,
            Field::Summary => &self.summary,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Service => &mut self.service,
            Field::Severity => &mut self.severity,
            Field::Status => &mut self.status,
            Field::Owner => &mut self.owner,
            Field::Summary => &mut self.summary,
        }
    }

    /// `services` is the server-provided set; when it could not be loaded it
    /// is empty and any non-blank service is accepted.
    pub fn validate(&self, services: &[String]) -> Result<CreateIncidentRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.insert(Field::Title, "Title is required");
        }

        let service = self.service.trim();
        if let Err(msg) = check_service(service, services) {
            errors.insert(Field::Service, msg);
        }

        let severity = match parse_severity(&self.severity) {
            Ok(sev) => Some(sev),
            Err(msg) => {
                errors.insert(Field::Severity, msg);
                None
            }
        };

        let status = match self.status.trim() {
            "" => None,
            raw => match raw.parse::<Status>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.insert(Field::Status, format!("Unknown status '{raw}'"));
                    None
                }
            },
        };

        match severity {
            Some(severity) if errors.is_empty() => Ok(CreateIncidentRequest {
                title: title.to_string(),
                service: service.to_string(),
                severity,
                status,
                owner: non_blank(&self.owner),
                summary: non_blank(&self.summary),
            }),
            _ => Err(errors),
        }
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn check_service(service: &str, services: &[String]) -> Result<(), String> {
    if service.is_empty() {
        return Err("Service is required".to_string());
    }
    if !services.is_empty() && !services.iter().any(|s| s == service) {
        return Err(format!("Unknown service '{service}'"));
    }
    Ok(())
}

fn parse_severity(raw: &str) -> Result<Severity, String> {
    match raw.trim() {
        "" => Err("Severity is required".to_string()),
        raw => raw
            .parse::<Severity>()
            .map_err(|_| format!("Unknown severity '{raw}'")),
    }
}

/// Steps through `options` from `current`, wrapping. Unknown `current`
/// starts at the first (or last, going backwards) option.
pub fn cycle_value(options: &[&str], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Some(options[next].to_string())
}

fn choice_options(field: Field, services: &[String]) -> Vec<&str> {
    match field {
        Field::Service => services.iter().map(String::as_str).collect(),
        Field::Severity => Severity::ALL.iter().map(|s| s.as_str()).collect(),
        Field::Status => Status::ALL.iter().map(|s| s.as_str()).collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub draft: IncidentDraft,
    pub focus: Field,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub error: Option<String>,
}

impl CreateForm {
    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    pub fn input_char(&mut self, c: char) {
        if self.focus.is_choice() {
            return;
        }
        self.draft.value_mut(self.focus).push(c);
        self.errors.clear(self.focus);
    }

    pub fn backspace(&mut self) {
        if self.focus.is_choice() {
            return;
        }
        self.draft.value_mut(self.focus).pop();
    }

    pub fn cycle_choice(&mut self, services: &[String], forward: bool) {
        if !self.focus.is_choice() {
            return;
        }
        let options = choice_options(self.focus, services);
        if let Some(value) = cycle_value(&options, self.draft.value(self.focus), forward) {
            *self.draft.value_mut(self.focus) = value;
            self.errors.clear(self.focus);
        }
    }

    /// Validates and, if clean, marks the form as submitting.
    pub fn submit(&mut self, services: &[String]) -> Option<CreateIncidentRequest> {
        if self.submitting {
            return None;
        }
        match self.draft.validate(services) {
            Ok(request) => {
                self.errors = FieldErrors::default();
                self.error = None;
                self.submitting = true;
                Some(request)
            }
            Err(errors) => {
                self.errors = errors;
                None
            }
        }
    }

    /// Returns the created incident; on failure keeps the input for retry.
    pub fn apply_result(&mut self, result: Result<Incident, ApiError>) -> Option<Incident> {
        self.submitting = false;
        match result {
            Ok(incident) => Some(incident),
            Err(err) => {
                self.error = Some(api_error_message(&err, "Failed to create incident"));
                None
            }
        }
    }
}

/// Uses the server's `{error}` text when there is one.
pub fn api_error_message(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
        ApiError::NotFound(id) => format!("Incident {id} no longer exists"),
        other => format!("{fallback}: {other}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEdit {
    pub field: Field,
    pub buffer: String,
}

/// Detail view: one incident, one field editable at a time.
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    pub id: String,
    pub incident: Option<Incident>,
    pub loading: bool,
    pub saving: bool,
    pub selected: Field,
    pub editing: Option<FieldEdit>,
    pub field_error: Option<String>,
    pub error: Option<String>,
    pub confirm_delete: bool,
    pub deleting: bool,
}

impl DetailState {
    pub fn loading(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            loading: true,
            ..Default::default()
        }
    }

    pub fn apply_loaded(&mut self, result: Result<Incident, ApiError>) {
        self.loading = false;
        match result {
            Ok(incident) => {
                self.incident = Some(incident);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(api_error_message(&err, "Failed to load incident data"));
            }
        }
    }

    pub fn select_next(&mut self) {
        if self.editing.is_none() {
            self.selected = self.selected.next();
        }
    }

    pub fn select_prev(&mut self) {
        if self.editing.is_none() {
            self.selected = self.selected.prev();
        }
    }

    pub fn current_value(&self, field: Field) -> String {
        let Some(incident) = &self.incident else {
            return String::new();
        };
        match field {
            Field::Title => incident.title.clone(),
            Field::Service => incident.service.clone(),
            Field::Severity => incident.severity.as_str().to_string(),
            Field::Status => incident.status.as_str().to_string(),
            Field::Owner => incident.owner.clone().unwrap_or_default(),
            Field::Summary => incident.summary.clone().unwrap_or_default(),
        }
    }

    pub fn begin_edit(&mut self) {
        if self.incident.is_none() || self.saving {
            return;
        }
        self.field_error = None;
        self.editing = Some(FieldEdit {
            field: self.selected,
            buffer: self.current_value(self.selected),
        });
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.field_error = None;
    }

    pub fn edit_input(&mut self, c: char) {
        if let Some(edit) = self.editing.as_mut().filter(|e| !e.field.is_choice()) {
            edit.buffer.push(c);
        }
    }

    pub fn edit_backspace(&mut self) {
        if let Some(edit) = self.editing.as_mut().filter(|e| !e.field.is_choice()) {
            edit.buffer.pop();
        }
    }

    pub fn edit_cycle(&mut self, services: &[String], forward: bool) {
        if let Some(edit) = self.editing.as_mut().filter(|e| e.field.is_choice()) {
            let options = choice_options(edit.field, services);
            if let Some(value) = cycle_value(&options, &edit.buffer, forward) {
                edit.buffer = value;
            }
        }
    }

    /// Builds the single-field PATCH for the open edit.
    ///
    /// `None` when the value did not change (the edit just closes).
    /// On a validation error the edit stays open with `field_error` set.
    pub fn commit_edit(&mut self, services: &[String]) -> Option<UpdateIncidentRequest> {
        let edit = self.editing.as_ref()?;
        if edit.buffer == self.current_value(edit.field) {
            self.editing = None;
            return None;
        }

        match build_patch(edit, services) {
            Ok(patch) => {
                self.editing = None;
                self.field_error = None;
                self.saving = true;
                Some(patch)
            }
            Err(msg) => {
                self.field_error = Some(msg);
                None
            }
        }
    }

    pub fn apply_update(&mut self, result: Result<Incident, ApiError>) {
        self.saving = false;
        match result {
            Ok(incident) => {
                self.incident = Some(incident);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(api_error_message(&err, "Failed to update incident"));
            }
        }
    }

    pub fn request_delete(&mut self) {
        if self.incident.is_some() && !self.deleting {
            self.confirm_delete = true;
        }
    }

    /// Returns the id to delete once the user confirms.
    pub fn confirm_delete(&mut self) -> Option<String> {
        if !self.confirm_delete {
            return None;
        }
        self.confirm_delete = false;
        self.deleting = true;
        Some(self.id.clone())
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    /// True when the incident is gone and the view should close.
    pub fn apply_delete(&mut self, result: Result<(), ApiError>) -> bool {
        self.deleting = false;
        match result {
            Ok(()) => true,
            Err(err) => {
                self.error = Some(api_error_message(&err, "Failed to delete incident"));
                false
            }
        }
    }
}

fn build_patch(edit: &FieldEdit, services: &[String]) -> Result<UpdateIncidentRequest, String> {
    let mut patch = UpdateIncidentRequest::default();
    let value = edit.buffer.trim();
    match edit.field {
        Field::Title => {
            if value.is_empty() {
                return Err("Title is required".to_string());
            }
            patch.title = Some(value.to_string());
        }
        Field::Service => {
            check_service(value, services)?;
            patch.service = Some(value.to_string());
        }
        Field::Severity => patch.severity = Some(parse_severity(value)?),
        Field::Status => {
            patch.status = Some(
                value
                    .parse::<Status>()
                    .map_err(|_| format!("Unknown status '{value}'"))?,
            );
        }
        Field::Owner => patch.owner = Some(value.to_string()),
        Field::Summary => patch.summary = Some(value.to_string()),
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn services() -> Vec<String> {
        vec!["payments".into(), "search".into(), "auth".into()]
    }

    fn draft() -> IncidentDraft {
        IncidentDraft {
            title: "  Checkout errors ".into(),
            service: "payments".into(),
            ..Default::default()
        }
    }

    fn incident() -> Incident {
        let at = Utc.with_ymd_and_hms(2026, 4, 12, 9, 30, 0).unwrap();
        Incident {
            id: "INC-7".into(),
            title: "Checkout errors".into(),
            service: "payments".into(),
            severity: Severity::Sev2,
            status: Status::Open,
            owner: Some("dana".into()),
            summary: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn valid_draft_becomes_request() {
        let request = draft().validate(&services()).unwrap();
        assert_eq!(
            request,
            CreateIncidentRequest {
                title: "Checkout errors".into(),
                service: "payments".into(),
                severity: Severity::Sev4,
                status: Some(Status::Open),
                owner: None,
                summary: None,
            }
        );
    }

    #[test]
    fn unknown_severity_is_rejected_before_submission() {
        let bad = IncidentDraft {
            severity: "SEV9".into(),
            ..draft()
        };
        let errors = bad.validate(&services()).unwrap_err();
        assert_eq!(errors.get(Field::Severity), Some("Unknown severity 'SEV9'"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn missing_fields_are_reported_per_field() {
        let empty = IncidentDraft {
            severity: String::new(),
            ..IncidentDraft::default()
        };
        let errors = empty.validate(&services()).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(errors.get(Field::Service), Some("Service is required"));
        assert_eq!(errors.get(Field::Severity), Some("Severity is required"));
        assert_eq!(errors.get(Field::Owner), None);
    }

    #[test]
    fn service_must_be_offered_when_list_is_known() {
        let unknown = IncidentDraft {
            service: "billing".into(),
            ..draft()
        };
        assert!(unknown.validate(&services()).is_err());
        assert!(unknown.validate(&[]).is_ok());
    }

    #[test]
    fn create_form_keeps_input_after_failure() {
        let mut form = CreateForm::default();
        for c in "DB down".chars() {
            form.input_char(c);
        }
        form.focus_next();
        form.cycle_choice(&services(), true);
        assert_eq!(form.draft.service, "payments");

        let request = form.submit(&services()).expect("valid");
        assert_eq!(request.title, "DB down");
        assert!(form.submitting);
        assert!(form.submit(&services()).is_none(), "no double submit");

        let created = form.apply_result(Err(ApiError::Status {
            status: 400,
            message: "title already exists".into(),
        }));
        assert!(created.is_none());
        assert_eq!(form.error.as_deref(), Some("title already exists"));
        assert_eq!(form.draft.title, "DB down");
        assert!(!form.submitting);
    }

    #[test]
    fn typing_into_choice_fields_is_ignored() {
        let mut form = CreateForm {
            focus: Field::Severity,
            ..Default::default()
        };
        form.input_char('x');
        assert_eq!(form.draft.severity, "SEV4");
        form.cycle_choice(&[], true);
        assert_eq!(form.draft.severity, "SEV1");
        form.cycle_choice(&[], false);
        assert_eq!(form.draft.severity, "SEV4");
    }

    #[test]
    fn cycle_value_wraps_both_ways() {
        let opts = ["a", "b", "c"];
        assert_eq!(cycle_value(&opts, "c", true).as_deref(), Some("a"));
        assert_eq!(cycle_value(&opts, "a", false).as_deref(), Some("c"));
        assert_eq!(cycle_value(&opts, "zzz", true).as_deref(), Some("a"));
        assert_eq!(cycle_value(&[], "a", true), None);
    }

    #[test]
    fn inline_edit_sends_only_the_changed_field() {
        let mut detail = DetailState::loading("INC-7");
        detail.apply_loaded(Ok(incident()));

        detail.selected = Field::Status;
        detail.begin_edit();
        detail.edit_cycle(&services(), true);
        let patch = detail.commit_edit(&services()).unwrap();
        assert_eq!(
            patch,
            UpdateIncidentRequest {
                status: Some(Status::Mitigated),
                ..Default::default()
            }
        );
        assert!(detail.saving);
    }

    #[test]
    fn unchanged_edit_sends_nothing() {
        let mut detail = DetailState::loading("INC-7");
        detail.apply_loaded(Ok(incident()));
        detail.selected = Field::Owner;
        detail.begin_edit();
        assert_eq!(detail.commit_edit(&services()), None);
        assert!(detail.editing.is_none());
        assert!(!detail.saving);
    }

    #[test]
    fn blank_title_edit_stays_open_with_error() {
        let mut detail = DetailState::loading("INC-7");
        detail.apply_loaded(Ok(incident()));
        detail.begin_edit();
        while !detail.editing.as_ref().unwrap().buffer.is_empty() {
            detail.edit_backspace();
        }
        assert_eq!(detail.commit_edit(&services()), None);
        assert_eq!(detail.field_error.as_deref(), Some("Title is required"));
        assert!(detail.editing.is_some());
    }

    #[test]
    fn failed_update_keeps_previous_copy() {
        let mut detail = DetailState::loading("INC-7");
        detail.apply_loaded(Ok(incident()));
        detail.saving = true;
        detail.apply_update(Err(ApiError::NotFound("INC-7".into())));
        assert_eq!(detail.incident, Some(incident()));
        assert_eq!(detail.error.as_deref(), Some("Incident INC-7 no longer exists"));
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut detail = DetailState::loading("INC-7");
        assert_eq!(detail.confirm_delete(), None);
        detail.apply_loaded(Ok(incident()));
        detail.request_delete();
        assert!(detail.confirm_delete);
        assert_eq!(detail.confirm_delete().as_deref(), Some("INC-7"));
        assert!(!detail.apply_delete(Err(ApiError::Status {
            status: 500,
            message: String::new()
        })));
        assert!(detail.error.as_deref().unwrap().starts_with("Failed to delete incident"));
    }
}

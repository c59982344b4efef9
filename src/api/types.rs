use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Incident severity. `Sev1` is the most severe and compares greatest.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Sev1,
    Sev2,
    Sev3,
    Sev4,
}

impl Severity {
    pub const ALL: [Severity; 4] = [Severity::Sev1, Severity::Sev2, Severity::Sev3, Severity::Sev4];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Sev1 => "SEV1",
            Severity::Sev2 => "SEV2",
            Severity::Sev3 => "SEV3",
            Severity::Sev4 => "SEV4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Sev1 => "Critical",
            Severity::Sev2 => "High",
            Severity::Sev3 => "Medium",
            Severity::Sev4 => "Low",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Severity::Sev1 => 4,
            Severity::Sev2 => 3,
            Severity::Sev3 => 2,
            Severity::Sev4 => 1,
        }
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str() == s)
            .ok_or_else(|| QueryError::UnknownSeverity(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Mitigated,
    Resolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::Mitigated, Status::Resolved];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "OPEN",
            Status::Mitigated => "MITIGATED",
            Status::Resolved => "RESOLVED",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Mitigated => "Mitigated",
            Status::Resolved => "Resolved",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| QueryError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub title: String,
    pub service: String,
    pub severity: Severity,
    pub status: Status,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Incident {
    /// Owner for display; `None` and blank both mean unassigned.
    pub fn owner_label(&self) -> &str {
        match self.owner.as_deref().map(str::trim) {
            Some(owner) if !owner.is_empty() => owner,
            _ => "Unassigned",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub total_pages: Option<u64>,
}

/// One page of `GET /incidents`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IncidentPage {
    pub data: Vec<Incident>,
    pub meta: PageMeta,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCounts {
    pub open_count: u64,
    pub active_sev1_count: u64,
    pub total_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct FilterOptions {
    pub services: Vec<String>,
    #[serde(default)]
    pub severities: Vec<Severity>,
    #[serde(default)]
    pub statuses: Vec<Status>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CreateIncidentRequest {
    pub title: String,
    pub service: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Partial update; only `Some` fields are sent.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct UpdateIncidentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl UpdateIncidentRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Body of a non-2xx response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn severity_order_puts_sev1_first() {
        assert!(Severity::Sev1 > Severity::Sev2);
        assert!(Severity::Sev2 > Severity::Sev3);
        assert!(Severity::Sev3 > Severity::Sev4);

        let mut sevs = vec![Severity::Sev3, Severity::Sev1, Severity::Sev4, Severity::Sev2];
        sevs.sort_by(|a, b| b.cmp(a));
        assert_eq!(sevs, Severity::ALL.to_vec());
    }

    #[test]
    fn parses_only_known_literals() {
        assert_eq!("SEV2".parse::<Severity>(), Ok(Severity::Sev2));
        assert_eq!(
            "SEV9".parse::<Severity>(),
            Err(QueryError::UnknownSeverity("SEV9".into()))
        );
        assert!("sev1".parse::<Severity>().is_err());
        assert_eq!("MITIGATED".parse::<Status>(), Ok(Status::Mitigated));
        assert!("CLOSED".parse::<Status>().is_err());
    }

    #[test]
    fn decodes_incident_from_api_json() {
        let incident: Incident = serde_json::from_value(json!({
            "id": "INC-1042",
            "title": "Checkout latency",
            "service": "payments",
            "severity": "SEV1",
            "status": "OPEN",
            "owner": null,
            "createdAt": "2026-04-12T09:30:00.000Z",
            "updatedAt": "2026-04-12T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(incident.severity, Severity::Sev1);
        assert_eq!(incident.status, Status::Open);
        assert_eq!(incident.owner, None);
        assert_eq!(incident.summary, None);
        assert_eq!(incident.owner_label(), "Unassigned");
    }

    #[test]
    fn rejects_unknown_severity_in_payload() {
        let result = serde_json::from_value::<Incident>(json!({
            "id": "INC-1",
            "title": "x",
            "service": "api",
            "severity": "SEV9",
            "status": "OPEN",
            "createdAt": "2026-04-12T09:30:00Z",
            "updatedAt": "2026-04-12T09:30:00Z"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn page_meta_fields_are_optional() {
        let page: IncidentPage =
            serde_json::from_value(json!({ "data": [], "meta": { "limit": 10 } })).unwrap();
        assert_eq!(page.meta.next_cursor, None);
        assert_eq!(page.meta.total_count, None);
        assert_eq!(page.meta.total_pages, None);
    }

    #[test]
    fn update_request_serializes_only_present_fields() {
        let patch = UpdateIncidentRequest {
            status: Some(Status::Resolved),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "status": "RESOLVED" }));
        assert!(UpdateIncidentRequest::default().is_empty());
        assert!(!patch.is_empty());
    }

    #[test]
    fn create_request_omits_absent_optionals() {
        let req = CreateIncidentRequest {
            title: "Disk full".into(),
            service: "storage".into(),
            severity: Severity::Sev3,
            status: None,
            owner: None,
            summary: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "title": "Disk full", "service": "storage", "severity": "SEV3" })
        );
    }
}

//! In-process stand-in for the incidents API, bound to an ephemeral port.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use incident_tui::api::IncidentsClient;
use incident_tui::api::types::{Incident, Severity, Status};
use incident_tui::config::ApiConfig;
use serde_json::{Value, json};

pub const SERVICES: [&str; 3] = ["payments", "search", "auth"];

#[derive(Clone, Default)]
pub struct Stub {
    pub incidents: Arc<Mutex<Vec<Incident>>>,
    pub patches: Arc<Mutex<Vec<Value>>>,
    next_id: Arc<Mutex<u32>>,
}

impl Stub {
    pub fn seeded(count: usize) -> Self {
        let stub = Stub::default();
        let base = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).unwrap();
        let mut incidents = stub.incidents.lock().unwrap();
        for i in 0..count {
            let at = base + chrono::Duration::minutes(i as i64 * 37);
            incidents.push(Incident {
                id: format!("INC-{:04}", i + 1),
                title: format!("Incident number {}", i + 1),
                service: SERVICES[i % SERVICES.len()].to_string(),
                severity: Severity::ALL[i % Severity::ALL.len()],
                status: Status::ALL[i % Status::ALL.len()],
                owner: (i % 2 == 0).then(|| "oncall".to_string()),
                summary: None,
                created_at: at,
                updated_at: at,
            });
        }
        *stub.next_id.lock().unwrap() = count as u32 + 1;
        drop(incidents);
        stub
    }

    pub fn patches(&self) -> Vec<Value> {
        self.patches.lock().unwrap().clone()
    }
}

/// Serves `stub` and returns a client pointed at it.
pub async fn serve(stub: Stub) -> (IncidentsClient, SocketAddr) {
    let router = Router::new()
        .route("/api/incidents", get(list).post(create))
        .route("/api/incidents/counts", get(counts))
        .route("/api/incidents/filters", get(filters))
        .route(
            "/api/incidents/:id",
            get(get_one).patch(update).delete(remove),
        )
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = IncidentsClient::new(ApiConfig {
        base_url: format!("http://{addr}/api"),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    (client, addr)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn matches_filters(incident: &Incident, params: &HashMap<String, String>) -> bool {
    if let Some(status) = params.get("status") {
        if incident.status.as_str() != status {
            return false;
        }
    }
    if let Some(severity) = params.get("severity") {
        if incident.severity.as_str() != severity {
            return false;
        }
    }
    if let Some(service) = params.get("service") {
        if &incident.service != service {
            return false;
        }
    }
    if let Some(search) = params.get("search") {
        let needle = search.to_lowercase();
        if !incident.title.to_lowercase().contains(&needle) && !incident.id.to_lowercase().contains(&needle) {
            return false;
        }
    }
    true
}

async fn list(State(stub): State<Stub>, Query(params): Query<HashMap<String, String>>) -> Response {
    let Some(limit) = params.get("limit").and_then(|l| l.parse::<usize>().ok()).filter(|l| *l > 0) else {
        return error(StatusCode::BAD_REQUEST, "limit must be a positive integer");
    };
    let offset = match params.get("cursor") {
        None => 0,
        Some(c) => match c.strip_prefix("after-").and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => n,
            None => return error(StatusCode::BAD_REQUEST, "invalid cursor"),
        },
    };

    let mut rows: Vec<Incident> = stub
        .incidents
        .lock()
        .unwrap()
        .iter()
        .filter(|i| matches_filters(i, &params))
        .cloned()
        .collect();

    let field = params.get("sort").map(String::as_str).unwrap_or("createdAt");
    match field {
        "id" => rows.sort_by(|a, b| a.id.cmp(&b.id)),
        "title" => rows.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id))),
        "severity" => rows.sort_by(|a, b| a.severity.cmp(&b.severity).then(a.id.cmp(&b.id))),
        "status" => rows.sort_by(|a, b| a.status.as_str().cmp(b.status.as_str()).then(a.id.cmp(&b.id))),
        "createdAt" => rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))),
        other => return error(StatusCode::BAD_REQUEST, &format!("unknown sort field {other}")),
    }
    match params.get("order").map(String::as_str).unwrap_or("desc") {
        "asc" => {}
        "desc" => rows.reverse(),
        other => return error(StatusCode::BAD_REQUEST, &format!("unknown order {other}")),
    }

    let total = rows.len();
    let page: Vec<Incident> = rows.into_iter().skip(offset).take(limit).collect();
    let end = offset + page.len();
    let next_cursor = (end < total).then(|| format!("after-{end}"));

    Json(json!({
        "data": page,
        "meta": {
            "limit": limit,
            "nextCursor": next_cursor,
            "totalCount": total,
            "totalPages": total.div_ceil(limit).max(1),
        }
    }))
    .into_response()
}

async fn counts(State(stub): State<Stub>, Query(params): Query<HashMap<String, String>>) -> Response {
    let incidents = stub.incidents.lock().unwrap();
    let filtered: Vec<&Incident> = incidents.iter().filter(|i| matches_filters(i, &params)).collect();
    Json(json!({
        "openCount": filtered.iter().filter(|i| i.status == Status::Open).count(),
        "activeSev1Count": filtered
            .iter()
            .filter(|i| i.severity == Severity::Sev1 && i.status != Status::Resolved)
            .count(),
        "totalCount": filtered.len(),
    }))
    .into_response()
}

async fn filters() -> Response {
    Json(json!({
        "services": SERVICES,
        "severities": ["SEV1", "SEV2", "SEV3", "SEV4"],
        "statuses": ["OPEN", "MITIGATED", "RESOLVED"],
    }))
    .into_response()
}

async fn get_one(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    match stub.incidents.lock().unwrap().iter().find(|i| i.id == id) {
        Some(incident) => Json(incident.clone()).into_response(),
        None => error(StatusCode::NOT_FOUND, "incident not found"),
    }
}

async fn create(State(stub): State<Stub>, Json(body): Json<Value>) -> Response {
    let title = body["title"].as_str().unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return error(StatusCode::BAD_REQUEST, "title is required");
    }
    let Ok(severity) = serde_json::from_value::<Severity>(body["severity"].clone()) else {
        return error(StatusCode::BAD_REQUEST, "invalid severity");
    };
    let status = serde_json::from_value::<Status>(body["status"].clone()).unwrap_or(Status::Open);

    let mut next_id = stub.next_id.lock().unwrap();
    let now = Utc::now();
    let incident = Incident {
        id: format!("INC-{:04}", *next_id),
        title,
        service: body["service"].as_str().unwrap_or_default().to_string(),
        severity,
        status,
        owner: body["owner"].as_str().map(String::from),
        summary: body["summary"].as_str().map(String::from),
        created_at: now,
        updated_at: now,
    };
    *next_id += 1;
    stub.incidents.lock().unwrap().push(incident.clone());
    (StatusCode::CREATED, Json(incident)).into_response()
}

async fn update(State(stub): State<Stub>, Path(id): Path<String>, Json(body): Json<Value>) -> Response {
    stub.patches.lock().unwrap().push(body.clone());
    let mut incidents = stub.incidents.lock().unwrap();
    let Some(incident) = incidents.iter_mut().find(|i| i.id == id) else {
        return error(StatusCode::NOT_FOUND, "incident not found");
    };
    if let Some(title) = body["title"].as_str() {
        incident.title = title.to_string();
    }
    if let Some(service) = body["service"].as_str() {
        incident.service = service.to_string();
    }
    if let Ok(severity) = serde_json::from_value::<Severity>(body["severity"].clone()) {
        incident.severity = severity;
    }
    if let Ok(status) = serde_json::from_value::<Status>(body["status"].clone()) {
        incident.status = status;
    }
    if let Some(owner) = body.get("owner") {
        incident.owner = owner.as_str().filter(|o| !o.is_empty()).map(String::from);
    }
    if let Some(summary) = body["summary"].as_str() {
        incident.summary = Some(summary.to_string());
    }
    incident.updated_at = Utc::now();
    Json(incident.clone()).into_response()
}

async fn remove(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    let mut incidents = stub.incidents.lock().unwrap();
    let before = incidents.len();
    incidents.retain(|i| i.id != id);
    if incidents.len() == before {
        return error(StatusCode::NOT_FOUND, "incident not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

mod support;

use std::time::Duration;

use incident_tui::api::{IncidentsApi, IncidentsClient};
use incident_tui::config::ApiConfig;
use incident_tui::api::types::{CreateIncidentRequest, Severity, Status, UpdateIncidentRequest};
use incident_tui::error::ApiError;
use incident_tui::form::{DetailState, Field};
use pretty_assertions::assert_eq;
use serde_json::json;
use support::{SERVICES, Stub, serve};

#[tokio::test]
async fn missing_incident_maps_to_not_found() {
    let (client, _) = serve(Stub::seeded(3)).await;

    let err = client.get_incident("INC-9999").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref id) if id == "INC-9999"));

    let patch = UpdateIncidentRequest {
        title: Some("x".into()),
        ..Default::default()
    };
    let err = client.update_incident("INC-9999", &patch).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));

    let err = client.delete_incident("INC-9999").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[tokio::test]
async fn ids_are_sent_as_a_single_path_segment() {
    let (client, _) = serve(Stub::seeded(1)).await;
    let err = client.get_incident("a/b?c").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(ref id) if id == "a/b?c"));
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let (client, _) = serve(Stub::seeded(0)).await;
    let req = CreateIncidentRequest {
        title: "   ".into(),
        service: "payments".into(),
        severity: Severity::Sev2,
        status: None,
        owner: None,
        summary: None,
    };

    match client.create_incident(&req).await.unwrap_err() {
        ApiError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "title is required");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let stub = Stub::seeded(2);
    let (client, _) = serve(stub.clone()).await;
    let req = CreateIncidentRequest {
        title: "Search timeouts".into(),
        service: "search".into(),
        severity: Severity::Sev1,
        status: Some(Status::Mitigated),
        owner: Some("sam".into()),
        summary: None,
    };

    let created = client.create_incident(&req).await.unwrap();
    assert_eq!(created.id, "INC-0003");
    assert_eq!(created.status, Status::Mitigated);

    let fetched = client.get_incident(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(stub.incidents.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn inline_edit_patches_only_the_edited_field() {
    let stub = Stub::seeded(4);
    let (client, _) = serve(stub.clone()).await;
    let services: Vec<String> = SERVICES.iter().map(|s| s.to_string()).collect();

    let mut detail = DetailState::loading("INC-0002");
    detail.apply_loaded(client.get_incident("INC-0002").await);
    detail.selected = Field::Owner;
    detail.begin_edit();
    for c in "alice".chars() {
        detail.edit_input(c);
    }

    let patch = detail.commit_edit(&services).expect("owner changed");
    let updated = client.update_incident(&detail.id, &patch).await;
    detail.apply_update(updated);

    assert_eq!(stub.patches(), vec![json!({ "owner": "alice" })]);
    let incident = detail.incident.as_ref().unwrap();
    assert_eq!(incident.owner.as_deref(), Some("alice"));
    assert_eq!(incident.title, "Incident number 2");
    assert!(!detail.saving);
}

#[tokio::test]
async fn delete_removes_the_incident() {
    let stub = Stub::seeded(2);
    let (client, _) = serve(stub.clone()).await;

    client.delete_incident("INC-0001").await.unwrap();
    assert!(matches!(
        client.get_incident("INC-0001").await,
        Err(ApiError::NotFound(_))
    ));
    assert_eq!(stub.incidents.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn filter_options_list_services() {
    let (client, _) = serve(Stub::seeded(0)).await;
    let options = client.filter_options().await.unwrap();
    assert_eq!(options.services, SERVICES.to_vec());
    assert_eq!(options.severities, Severity::ALL.to_vec());
    assert_eq!(options.statuses, Status::ALL.to_vec());
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = IncidentsClient::new(ApiConfig {
        base_url: format!("http://{addr}/api"),
        timeout: Duration::from_secs(2),
    })
    .unwrap();
    let err = client.filter_options().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

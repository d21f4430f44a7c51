#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use mockito::Matcher;
use operator_client::OperatorClient;
use serde_json::json;
use shared_types::{EventContext, EventRequest, LifecycleEvent, UnitStatus};

#[tokio::test]
async fn test_health_check() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/health")
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    assert!(client.health_check().await.unwrap());
}

#[tokio::test]
async fn test_send_event_posts_flattened_request() {
    let mut server = mockito::Server::new_async().await;

    let m = server
        .mock("POST", "/events")
        .match_body(Matcher::PartialJson(json!({
            "event": "config-changed",
            "config": {"mode": "server"},
            "is_leader": true
        })))
        .with_status(200)
        .with_body(
            json!({
                "event_id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427",
                "event": "config-changed",
                "status": {"name": "active", "message": ""},
                "published": [1, 2]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let report = client
        .send_event(&EventRequest {
            event: LifecycleEvent::ConfigChanged,
            context: EventContext::leader(json!({"mode": "server"})),
        })
        .await
        .unwrap();

    m.assert_async().await;
    assert_eq!(report.status, UnitStatus::Active(String::new()));
    assert_eq!(report.published, vec![1, 2]);
    assert!(report.retracted.is_empty());
}

#[tokio::test]
async fn test_send_event_surfaces_store_failure() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("POST", "/events")
        .with_status(503)
        .with_body(r#"{"error":"Store Unavailable","details":"connection reset"}"#)
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let result = client
        .send_event(&EventRequest {
            event: LifecycleEvent::Install,
            context: EventContext::leader(json!({})),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_status_not_yet_reported() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/status")
        .with_status(404)
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    assert!(client.status().await.unwrap().is_none());
}

#[tokio::test]
async fn test_status_blocked() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/status")
        .with_status(200)
        .with_body(
            json!({
                "status": {"name": "blocked", "message": "Model mode cluster is not supported. Possible values server, gateway"},
                "since": "2024-05-01T12:00:00Z"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let record = client.status().await.unwrap().unwrap();
    assert!(matches!(record.status, UnitStatus::Blocked(_)));
}

#[tokio::test]
async fn test_list_relations() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/relations")
        .with_status(200)
        .with_body(
            json!({"relations": [
                {"id": 1, "remote_app": "argo-controller", "published": true, "updated_at": "2024-05-01T12:00:00Z"},
                {"id": 2, "remote_app": "legacy", "published": false, "updated_at": "2024-05-01T12:00:00Z"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let relations = client.list_relations().await.unwrap();

    assert_eq!(relations.len(), 2);
    assert_eq!(relations[1].remote_app, "legacy");
    assert!(!relations[1].published);
}

#[tokio::test]
async fn test_relation_data_validated() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/relations/1/data")
        .with_status(200)
        .with_body(
            json!({
                "access-key": "minio",
                "secret-key": "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123",
                "port": 9000,
                "secure": false,
                "service": "minio",
                "namespace": "kubeflow"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let data = client.relation_data(1).await.unwrap().unwrap();

    assert_eq!(data.port, 9000);
    assert_eq!(data.namespace.as_deref(), Some("kubeflow"));
}

#[tokio::test]
async fn test_relation_data_rejects_partial_record() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/relations/1/data")
        .with_status(200)
        .with_body(json!({"access-key": "minio", "port": 9000}).to_string())
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let err = client.relation_data(1).await.unwrap_err();

    assert!(err.to_string().contains("Relation 1 carries an invalid record"));
}

#[tokio::test]
async fn test_relation_data_not_published() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/relations/9/data")
        .with_status(404)
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    assert!(client.relation_data(9).await.unwrap().is_none());
}

#[tokio::test]
async fn test_alert_rules() {
    let mut server = mockito::Server::new_async().await;

    let _m = server
        .mock("GET", "/metrics/alert-rules")
        .with_status(200)
        .with_body(r#"{"groups":[{"name":"minio","rules":[]}]}"#)
        .create_async()
        .await;

    let client = OperatorClient::new(server.url()).unwrap();
    let rules = client.alert_rules().await.unwrap();
    assert_eq!(rules["groups"][0]["name"], "minio");
}

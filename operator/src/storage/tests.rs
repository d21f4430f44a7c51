use super::backend::ObjectStoreBackend;
use super::config::StorageConfig;
use super::state::{RelationRecord, StoredState};
use super::traits::ModelStore;
use shared_types::{Databag, RelationRef, StatusRecord, UnitStatus};
use tempfile::TempDir;

async fn create_test_backend() -> (ObjectStoreBackend, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = StorageConfig::Local {
        path: temp_dir.path().to_path_buf(),
    };
    let backend = ObjectStoreBackend::from_config(config).unwrap();
    (backend, temp_dir)
}

fn relation(id: u32, remote_app: &str) -> RelationRecord {
    RelationRecord::from_ref(&RelationRef {
        id,
        remote_app: remote_app.to_string(),
        remote_data: Databag::new(),
    })
}

#[tokio::test]
async fn test_state_round_trip() {
    let (backend, _dir) = create_test_backend().await;

    assert!(backend.load_state().await.unwrap().is_none());

    let state = StoredState::with_secret("ABC123");
    backend.save_state(&state).await.unwrap();

    let loaded = backend.load_state().await.unwrap().unwrap();
    assert_eq!(loaded, state);
}

#[tokio::test]
async fn test_put_and_get_relation() {
    let (backend, _dir) = create_test_backend().await;

    let mut record = relation(4, "argo-controller");
    record
        .local_data
        .insert("data".to_string(), "{}".to_string());
    backend.put_relation(&record).await.unwrap();

    let loaded = backend.get_relation(4).await.unwrap().unwrap();
    assert_eq!(loaded, record);
    assert!(backend.get_relation(5).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_relations_sorted() {
    let (backend, _dir) = create_test_backend().await;

    for (id, app) in [(12, "kfp-api"), (3, "argo-controller"), (7, "mlflow")] {
        backend.put_relation(&relation(id, app)).await.unwrap();
    }

    let ids: Vec<u32> = backend
        .list_relations()
        .await
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![3, 7, 12]);
}

#[tokio::test]
async fn test_list_relations_empty() {
    let (backend, _dir) = create_test_backend().await;
    assert!(backend.list_relations().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_relation() {
    let (backend, _dir) = create_test_backend().await;

    backend.put_relation(&relation(1, "argo")).await.unwrap();
    assert!(backend.remove_relation(1).await.unwrap());
    assert!(!backend.remove_relation(1).await.unwrap());
    assert!(backend.get_relation(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_remove_missing_relation_in_memory() {
    let backend = ObjectStoreBackend::from_config(StorageConfig::memory()).unwrap();
    assert!(!backend.remove_relation(9).await.unwrap());
}

#[tokio::test]
async fn test_status_round_trip() {
    let (backend, _dir) = create_test_backend().await;

    let record = StatusRecord::now(UnitStatus::Blocked("bad config".to_string()));
    backend.put_status(&record).await.unwrap();

    let loaded = backend.get_status().await.unwrap().unwrap();
    assert_eq!(loaded.status, record.status);
}

#[tokio::test]
async fn test_corrupt_document_reported() {
    let (backend, dir) = create_test_backend().await;

    std::fs::create_dir_all(dir.path().join("state")).unwrap();
    std::fs::write(dir.path().join("state/stored.json"), b"not json").unwrap();

    let err = backend.load_state().await.unwrap_err();
    assert!(err.to_string().contains("corrupt"));
}

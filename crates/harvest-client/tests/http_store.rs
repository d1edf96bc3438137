//! HTTP crop store tests against a local stand-in crop service.
//!
//! - Request paths and payload shape
//! - Normalization of fetched documents
//! - Status and `success` handling
//! - Fetch retry over real HTTP

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use harvest_client::{
    ClientConfig, ClientError, CropStore, FarmLedger, HttpCropStore, LedgerAction, RetrySettings,
    Retrying,
};
use harvest_core::validation::FieldPath;
use harvest_core::{CropDraft, CropForm, DraftChange, ExpenseField, LineItemField, LineItemKind};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

// ============================================================================
// Stand-in Service
// ============================================================================

#[derive(Clone, Default)]
struct Service {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
    fetches: Arc<AtomicUsize>,
    failing_fetches: usize,
}

async fn get_crops(State(service): State<Service>) -> (StatusCode, Json<Value>) {
    let n = service.fetches.fetch_add(1, Ordering::SeqCst);
    if n < service.failing_fetches {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"message": "warming up"})),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "crops": [
                {
                    "_id": "665f1c2e9b1d",
                    "crop": {"name": "Padi", "qty": 100},
                    "sold_at": 5000,
                    "expense": {
                        "seeds": 50000, "electricity": 10000, "machinery": 0,
                        "labor": 75000, "water_usage": 5000, "storage": 0,
                        "transport": 20000,
                        "fertilizers": [{"name": "Urea", "cost": 50000}],
                        "pesticides": []
                    }
                },
                {"_id": "bad", "crop": null, "sold_at": "n/a"}
            ]
        })),
    )
}

async fn create_crop(State(service): State<Service>, Json(body): Json<Value>) -> Json<Value> {
    service.bodies.lock().await.push(("create".into(), body));
    Json(json!({"success": true, "message": "Crop created"}))
}

async fn update_crop(
    State(service): State<Service>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    match id.as_str() {
        "missing" => (StatusCode::NOT_FOUND, Json(json!({"message": "Crop not found"}))),
        "locked" => (StatusCode::OK, Json(json!({"success": false}))),
        _ => {
            service.bodies.lock().await.push((format!("update {id}"), body));
            (StatusCode::OK, Json(json!({"success": true})))
        }
    }
}

async fn delete_crop(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match id.as_str() {
        "boom" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "database down"})),
        ),
        _ => (StatusCode::OK, Json(json!({"success": true}))),
    }
}

async fn spawn(service: Service) -> String {
    let app = Router::new()
        .route("/api/v1/crop/getcrops", get(get_crops))
        .route("/api/v1/crop/createcrop", post(create_crop))
        .route("/api/v1/crop/updatecrop/{id}", put(update_crop))
        .route("/api/v1/crop/deletecrop/{id}", delete(delete_crop))
        .with_state(service);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{addr}/api")
}

fn config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.request_timeout_secs = 5;
    config.retry = RetrySettings {
        max_retries: 3,
        initial_backoff_ms: 1,
        max_backoff_secs: 1,
    };
    config
}

fn draft() -> CropDraft {
    let set = |draft: CropDraft, field, value: &str| {
        draft.apply(DraftChange::Set {
            field,
            value: value.to_string(),
        })
    };

    let mut draft = set(CropDraft::default(), FieldPath::CropName, " Jagung ");
    draft = set(draft, FieldPath::CropQty, "50");
    draft = set(draft, FieldPath::SoldAt, "3000");
    for field in ExpenseField::ALL {
        draft = set(draft, FieldPath::Expense(field), "0");
    }
    draft
        .apply(DraftChange::SetLineItem {
            kind: LineItemKind::Fertilizer,
            index: 0,
            field: LineItemField::Name,
            value: "Urea".into(),
        })
        .apply(DraftChange::SetLineItem {
            kind: LineItemKind::Fertilizer,
            index: 0,
            field: LineItemField::Cost,
            value: "50000".into(),
        })
        .apply(DraftChange::AddLineItem {
            kind: LineItemKind::Fertilizer,
        })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn fetch_normalizes_documents() {
    let base = spawn(Service::default()).await;
    let store = HttpCropStore::new(&config(&base)).unwrap();

    let records = store.fetch_crops().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].crop.name, "Padi");
    assert_eq!(records[0].total_expense().amount(), 210_000);
    assert_eq!(records[0].profit().amount(), 290_000);

    // malformed document is zero-filled, not rejected
    assert_eq!(records[1].id.as_deref(), Some("bad"));
    assert!(records[1].sold_at.is_zero());
    assert!(records[1].total_expense().is_zero());
}

#[tokio::test]
async fn create_sends_prepared_payload() {
    let service = Service::default();
    let base = spawn(service.clone()).await;
    let store = HttpCropStore::new(&config(&base)).unwrap();

    store.create_crop(&draft().prepare()).await.unwrap();

    let bodies = service.bodies.lock().await;
    let (kind, body) = &bodies[0];
    assert_eq!(kind, "create");
    assert_eq!(body["crop"], json!({"name": "Jagung", "qty": 50}));
    assert_eq!(body["sold_at"], json!(3000));
    assert_eq!(body["expense"]["water_usage"], json!(0));
    // blank second row dropped
    assert_eq!(body["expense"]["fertilizers"], json!([{"name": "Urea", "cost": 50000}]));
    assert_eq!(body["expense"]["pesticides"], json!([]));
    assert!(body.get("_id").is_none());
}

#[tokio::test]
async fn update_and_delete_status_handling() {
    let service = Service::default();
    let base = spawn(service.clone()).await;
    let store = HttpCropStore::new(&config(&base)).unwrap();
    let payload = draft().prepare();

    store.update_crop("abc", &payload).await.unwrap();
    assert_eq!(service.bodies.lock().await[0].0, "update abc");

    assert_eq!(
        store.update_crop("missing", &payload).await,
        Err(ClientError::NotFound("Crop not found".into()))
    );
    assert_eq!(
        store.update_crop("locked", &payload).await,
        Err(ClientError::Rejected(None))
    );

    store.delete_crop("abc").await.unwrap();
    let err = store.delete_crop("boom").await.unwrap_err();
    assert_eq!(
        err,
        ClientError::Server {
            status: 500,
            message: Some("database down".into())
        }
    );
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unreachable_service_is_a_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = HttpCropStore::new(&config(&format!("http://{addr}/api"))).unwrap();
    let err = store.fetch_crops().await.unwrap_err();
    assert!(matches!(err, ClientError::Connection(_)), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn fetch_retries_through_unavailable_service() {
    let service = Service {
        failing_fetches: 2,
        ..Default::default()
    };
    let base = spawn(service.clone()).await;
    let config = config(&base);
    let store = Retrying::new(HttpCropStore::new(&config).unwrap(), config.retry.clone());

    let records = store.fetch_crops().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(service.fetches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn ledger_submit_over_http() {
    let base = spawn(Service::default()).await;
    let ledger = FarmLedger::new(HttpCropStore::new(&config(&base)).unwrap());

    let mut form = CropForm::from_draft(draft());
    assert_eq!(ledger.submit(&mut form, None).await.unwrap(), LedgerAction::Create);

    // the list comes from the refresh that follows the create
    assert_eq!(ledger.records().await.len(), 2);
    assert!(ledger.fetched_at().await.is_some());
}

//! HTTP client tests against an in-process stub of the inventory backend
//!
//! The stub speaks the backend's dialect: trailing-slash routes, token auth,
//! decimal fields as strings, paged envelopes on some list endpoints and
//! bare arrays on others.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use uuid::Uuid;

use shared::{format_lot_number, AllocationRow, ProgramDraft, ProgramStatus, RateSource, StockLot};
use textile_inventory_client::api::{HttpApi, ProgramApi};
use textile_inventory_client::config::ApiConfig;
use textile_inventory_client::ClientError;

/// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn lot(sequence: u32, balance: &str) -> StockLot {
    let now = Utc::now();
    StockLot {
        id: Uuid::new_v4(),
        lot_number: format_lot_number(2024, sequence),
        party_id: Uuid::new_v4(),
        party_name: "Shree Fabrics".to_string(),
        quality_id: Uuid::new_v4(),
        quality_name: "Rayon 14kg".to_string(),
        total_meters: dec("500.00"),
        current_balance: dec(balance),
        inward_date: now.date_naive(),
        fiscal_year: 2024,
        is_gstin_registered: false,
        lr_number: Some("LR-778".to_string()),
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

fn filled_draft(lot_id: Uuid) -> ProgramDraft {
    ProgramDraft {
        party_id: Some(Uuid::new_v4()),
        design_number: "D-2201".to_string(),
        challan_no: None,
        input_meters: dec("80.00"),
        output_meters: Some(dec("72.00")),
        rate_per_meter: Some(dec("60.00")),
        tax_amount: dec("4.00"),
        status: ProgramStatus::Pending,
        notes: String::new(),
        allocations: vec![AllocationRow::new(lot_id, dec("80.00"))],
    }
}

/// Shared stub state: canned fixtures in, recorded requests out
#[derive(Clone, Default)]
struct StubState {
    lots: Vec<StockLot>,
    rate_party: Option<Uuid>,
    expected_token: Option<String>,
    created: Arc<Mutex<Vec<Value>>>,
    updated: Arc<Mutex<Vec<(Uuid, Value)>>>,
    photos: Arc<Mutex<Vec<(Uuid, String, String, usize)>>>,
}

async fn list_parties(State(state): State<StubState>, headers: HeaderMap) -> Response {
    if let Some(token) = &state.expected_token {
        let expected = format!("Token {}", token);
        let provided = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "detail": "Invalid token." })),
            )
                .into_response();
        }
    }
    Json(json!({ "count": 0, "next": null, "previous": null, "results": [] })).into_response()
}

async fn list_lots(State(state): State<StubState>) -> Json<Value> {
    Json(json!({
        "count": state.lots.len(),
        "next": null,
        "previous": null,
        "results": state.lots,
    }))
}

async fn available_lots(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<StockLot>> {
    let min_balance = params
        .get("min_balance")
        .and_then(|raw| Decimal::from_str(raw).ok())
        .unwrap_or(Decimal::ONE);
    Json(
        state
            .lots
            .iter()
            .filter(|lot| lot.current_balance >= min_balance)
            .cloned()
            .collect(),
    )
}

async fn party_quality_rate(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let known = state.rate_party.map(|id| id.to_string());
    if params.get("party_id") == known.as_ref() {
        Json(json!({ "rate": "60.00", "source": "party_specific" })).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No specific rate found" })),
        )
            .into_response()
    }
}

async fn create_program(
    State(state): State<StubState>,
    Json(payload): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.created.lock().unwrap().push(payload);
    (
        StatusCode::CREATED,
        Json(json!({ "id": Uuid::new_v4(), "program_number": "PRG-2024-0007" })),
    )
}

async fn update_program(
    Path(id): Path<Uuid>,
    State(state): State<StubState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    state.updated.lock().unwrap().push((id, payload));
    Json(json!({ "id": id, "program_number": "PRG-2024-0042" }))
}

async fn upload_photo(
    Path(id): Path<Uuid>,
    State(state): State<StubState>,
    mut multipart: Multipart,
) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        state
            .photos
            .lock()
            .unwrap()
            .push((id, name, filename, bytes.len()));
    }
    Json(json!({ "status": "photo uploaded" }))
}

fn stub_router(state: StubState) -> Router {
    Router::new()
        .route("/parties/", get(list_parties))
        .route("/inward-lots/", get(list_lots))
        .route("/inward-lots/available_lots/", get(available_lots))
        .route("/rates/party-quality/", get(party_quality_rate))
        .route("/programs/", post(create_program))
        .route("/programs/:id/", put(update_program))
        .route("/programs/:id/upload-photo/", post(upload_photo))
        .with_state(state)
}

async fn spawn_stub(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// ============================================================================
// List Endpoints
// ============================================================================

#[tokio::test]
async fn test_lot_list_decodes_page_envelope() {
    let state = StubState {
        lots: vec![lot(1, "80.00"), lot(2, "0.00")],
        ..StubState::default()
    };
    let base = spawn_stub(stub_router(state.clone())).await;
    let api = HttpApi::with_base_url(base);

    let lots = api.list_all_lots().await.unwrap();
    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].lot_number, "LOT-2024-001");
    assert_eq!(lots[0].current_balance, dec("80.00"));
    assert_eq!(lots[0].party_id, state.lots[0].party_id);
    assert_eq!(lots[0].lr_number.as_deref(), Some("LR-778"));
}

#[tokio::test]
async fn test_available_lots_decode_bare_array_and_pass_min_balance() {
    let state = StubState {
        lots: vec![lot(1, "80.00"), lot(2, "0.00")],
        ..StubState::default()
    };
    let base = spawn_stub(stub_router(state)).await;
    let api = HttpApi::with_base_url(base);

    let lots = api.list_available_lots(Decimal::ONE).await.unwrap();
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].lot_number, "LOT-2024-001");
}

#[tokio::test]
async fn test_token_is_sent_and_rejection_surfaces_detail() {
    let state = StubState {
        expected_token: Some("sekret".to_string()),
        ..StubState::default()
    };
    let base = spawn_stub(stub_router(state)).await;

    let authed = HttpApi::new(&ApiConfig {
        base_url: base.clone(),
        auth_token: Some("sekret".to_string()),
        timeout_seconds: 5,
    })
    .unwrap();
    assert!(authed.list_parties().await.unwrap().is_empty());

    let anonymous = HttpApi::with_base_url(base);
    let err = anonymous.list_parties().await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid token.");
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

// ============================================================================
// Rate Endpoint
// ============================================================================

#[tokio::test]
async fn test_rate_endpoint_resolves_known_pair() {
    let party = Uuid::new_v4();
    let state = StubState {
        rate_party: Some(party),
        ..StubState::default()
    };
    let base = spawn_stub(stub_router(state)).await;
    let api = HttpApi::with_base_url(base);

    let rate = api
        .get_effective_rate(party, Uuid::new_v4())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rate.rate, dec("60.00"));
    assert_eq!(rate.source, RateSource::PartySpecific);
}

#[tokio::test]
async fn test_rate_endpoint_maps_not_found_to_none() {
    let base = spawn_stub(stub_router(StubState::default())).await;
    let api = HttpApi::with_base_url(base);

    let rate = api
        .get_effective_rate(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();
    assert!(rate.is_none());
}

// ============================================================================
// Program Save
// ============================================================================

#[tokio::test]
async fn test_create_sends_wire_shape_without_status() {
    let state = StubState::default();
    let base = spawn_stub(stub_router(state.clone())).await;
    let api = HttpApi::with_base_url(base);

    let lot_id = Uuid::new_v4();
    let saved = api.create_program(&filled_draft(lot_id)).await.unwrap();
    assert_eq!(saved.program_number, "PRG-2024-0007");

    let created = state.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    let payload = &created[0];
    assert_eq!(payload["design_number"], json!("D-2201"));
    assert_eq!(payload["input_meters"], json!("80.00"));
    assert_eq!(payload["output_meters"], json!("72.00"));
    assert_eq!(payload["rate_per_meter"], json!("60.00"));
    assert_eq!(payload["tax_amount"], json!("4.00"));
    assert_eq!(
        payload["lot_allocations"],
        json!([{ "lot_id": lot_id, "allocated_meters": "80.00" }])
    );
    // Creation leaves the status to the backend
    assert!(payload.get("status").is_none());
    assert!(payload.get("challan_no").is_none());
}

#[tokio::test]
async fn test_update_sends_status_and_zeroes_absent_numbers() {
    let state = StubState::default();
    let base = spawn_stub(stub_router(state.clone())).await;
    let api = HttpApi::with_base_url(base);

    let program_id = Uuid::new_v4();
    let mut draft = filled_draft(Uuid::new_v4());
    draft.status = ProgramStatus::Completed;
    draft.output_meters = None;
    draft.rate_per_meter = None;

    api.update_program(program_id, &draft).await.unwrap();

    let updated = state.updated.lock().unwrap();
    assert_eq!(updated.len(), 1);
    assert_eq!(updated[0].0, program_id);
    let payload = &updated[0].1;
    assert_eq!(payload["status"], json!("Completed"));
    assert_eq!(payload["output_meters"], json!("0"));
    assert_eq!(payload["rate_per_meter"], json!("0"));
}

#[tokio::test]
async fn test_unchosen_rows_are_dropped_from_payload() {
    let state = StubState::default();
    let base = spawn_stub(stub_router(state.clone())).await;
    let api = HttpApi::with_base_url(base);

    let lot_id = Uuid::new_v4();
    let mut draft = filled_draft(lot_id);
    draft.allocations.push(AllocationRow::default());

    api.create_program(&draft).await.unwrap();

    let created = state.created.lock().unwrap();
    let rows = created[0]["lot_allocations"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["lot_id"], json!(lot_id));
}

#[tokio::test]
async fn test_rejection_body_surfaces_allocation_errors_first() {
    let app = Router::new().route(
        "/programs/",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "detail": "Bad request.",
                    "design_number": ["This field may not be blank."],
                    "lot_allocations": [
                        "Insufficient balance in lot LOT-2024-001",
                        "Lot LOT-2024-003 belongs to another party",
                    ],
                })),
            )
        }),
    );
    let base = spawn_stub(app).await;
    let api = HttpApi::with_base_url(base);

    let err = api
        .create_program(&filled_draft(Uuid::new_v4()))
        .await
        .unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(
                message,
                "Lot allocations error: Insufficient balance in lot LOT-2024-001, \
                 Lot LOT-2024-003 belongs to another party"
            );
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

// ============================================================================
// Design Photo Upload
// ============================================================================

#[tokio::test]
async fn test_photo_uploads_as_multipart_photo_field() {
    let state = StubState::default();
    let base = spawn_stub(stub_router(state.clone())).await;
    let api = HttpApi::with_base_url(base);

    let program_id = Uuid::new_v4();
    api.upload_design_photo(program_id, "design.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0])
        .await
        .unwrap();

    let photos = state.photos.lock().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0].0, program_id);
    assert_eq!(photos[0].1, "photo");
    assert_eq!(photos[0].2, "design.jpg");
    assert_eq!(photos[0].3, 4);
}

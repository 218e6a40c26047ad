mod test_utils;

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
};
use barbershop_client::{BookingApi, HttpBookingApi, http::SHOP_HEADER};
use barbershop_core::{
    context::SessionContext,
    errors::BookingError,
    models::appointment::{
        AppointmentQuery, AppointmentStatus, AvailabilityQuery, UpdateAppointmentRequest,
    },
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use uuid::Uuid;

use test_utils::*;

/// What the fake backend saw on its last request.
#[derive(Debug, Clone, Default)]
struct Seen {
    shop: Option<String>,
    authorization: Option<String>,
    query: HashMap<String, String>,
    body: Option<Value>,
}

type Recorder = Arc<Mutex<Seen>>;

fn record(recorder: &Recorder, headers: &HeaderMap, query: HashMap<String, String>, body: Option<Value>) {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    *recorder.lock().unwrap() = Seen {
        shop: header(SHOP_HEADER),
        authorization: header("authorization"),
        query,
        body,
    };
}

async fn list_appointments(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    record(&recorder, &headers, query, None);
    Json(page(vec![appointment("a", "B1", at(2025, 3, 10, 9, 0))]))
}

async fn availability(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let offset_form = query.get("barberId").map(String::as_str) == Some("B2");
    record(&recorder, &headers, query, None);
    if offset_form {
        return Json(json!(["2025-03-10T09:00:00Z", "2025-03-10T10:30:00.000+02:00"]));
    }
    Json(json!(["2025-03-10T09:00:00", "2025-03-10T09:30:00"]))
}

async fn update_appointment(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> axum::response::Response {
    record(&recorder, &headers, HashMap::new(), Some(body));
    if id == "taken" {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Slot is no longer available" })),
        )
            .into_response();
    }
    Json(with_status(
        appointment(&id, "B1", at(2025, 3, 10, 9, 0)),
        AppointmentStatus::Confirmed,
    ))
    .into_response()
}

async fn cancel_appointment(
    State(recorder): State<Recorder>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    record(&recorder, &headers, HashMap::new(), None);
    if id == "missing" {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn barbers(State(recorder): State<Recorder>, headers: HeaderMap) -> impl IntoResponse {
    record(&recorder, &headers, HashMap::new(), None);
    Json(vec![barber("B1", true)])
}

async fn business_hours() -> impl IntoResponse {
    Json(json!([
        { "dayOfWeek": "MONDAY", "isOpen": true, "openTime": "09:00", "closeTime": "18:00:00" },
        { "dayOfWeek": "SUNDAY", "isOpen": false, "openTime": null, "closeTime": null }
    ]))
}

async fn services() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Database unavailable" })),
    )
}

/// Starts a fake backend and returns its `/api` base URL.
async fn spawn_backend(recorder: Recorder) -> String {
    let app = Router::new()
        .route("/api/appointments", get(list_appointments))
        .route("/api/appointments/availability", get(availability))
        .route(
            "/api/appointments/:id",
            axum::routing::put(update_appointment).delete(cancel_appointment),
        )
        .route("/api/barbers", get(barbers))
        .route("/api/services", get(services))
        .route("/api/business-hours", get(business_hours))
        .with_state(recorder);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/api", addr)
}

fn client(base_url: &str, shop_id: &str, token: Option<&str>) -> HttpBookingApi {
    let session = SessionContext {
        shop_id: shop_id.to_string(),
        user_id: None,
        access_token: token.map(str::to_string),
    };
    HttpBookingApi::new(base_url, session, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_sends_shop_header_and_filters() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(recorder.clone()).await;
    let shop_id = Uuid::new_v4().to_string();
    let api = client(&base_url, &shop_id, Some("owner-token"));

    let mut query = AppointmentQuery::between(date(2025, 2, 24), date(2025, 4, 6));
    query.barber_id = Some("B1".to_string());
    query.status = Some(AppointmentStatus::NoShow);

    let page = api.list_appointments(&query).await.unwrap();
    assert_eq!(page.content.len(), 1);
    assert_eq!(page.content[0].id, "a");

    let seen = recorder.lock().unwrap().clone();
    assert_eq!(seen.shop.as_deref(), Some(shop_id.as_str()));
    assert_eq!(seen.authorization.as_deref(), Some("Bearer owner-token"));
    assert_eq!(seen.query.get("startDate").map(String::as_str), Some("2025-02-24"));
    assert_eq!(seen.query.get("endDate").map(String::as_str), Some("2025-04-06"));
    assert_eq!(seen.query.get("barberId").map(String::as_str), Some("B1"));
    assert_eq!(seen.query.get("status").map(String::as_str), Some("NO_SHOW"));
}

#[tokio::test]
async fn test_public_session_sends_no_token() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(recorder.clone()).await;
    let api = client(&base_url, "shop-1", None);

    let barbers = api.barbers().await.unwrap();
    assert_eq!(barbers.len(), 1);

    let seen = recorder.lock().unwrap().clone();
    assert_eq!(seen.shop.as_deref(), Some("shop-1"));
    assert_eq!(seen.authorization, None);
}

#[tokio::test]
async fn test_availability_parses_instants() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(recorder.clone()).await;
    let api = client(&base_url, "shop-1", None);

    let slots = api
        .availability(&AvailabilityQuery {
            barber_id: "B1".to_string(),
            date: date(2025, 3, 10),
            service_duration: 30,
        })
        .await
        .unwrap();

    assert_eq!(slots, vec![at(2025, 3, 10, 9, 0), at(2025, 3, 10, 9, 30)]);

    let seen = recorder.lock().unwrap().clone();
    assert_eq!(seen.query.get("barberId").map(String::as_str), Some("B1"));
    assert_eq!(seen.query.get("date").map(String::as_str), Some("2025-03-10"));
    assert_eq!(seen.query.get("serviceDuration").map(String::as_str), Some("30"));
}

#[tokio::test]
async fn test_availability_accepts_offset_instants() {
    let base_url = spawn_backend(Recorder::default()).await;
    let api = client(&base_url, "shop-1", None);

    let slots = api
        .availability(&AvailabilityQuery {
            barber_id: "B2".to_string(),
            date: date(2025, 3, 10),
            service_duration: 60,
        })
        .await
        .unwrap();

    // Wall-clock time at the given offset is kept.
    assert_eq!(slots, vec![at(2025, 3, 10, 9, 0), at(2025, 3, 10, 10, 30)]);
}

#[tokio::test]
async fn test_status_update_body() {
    let recorder = Recorder::default();
    let base_url = spawn_backend(recorder.clone()).await;
    let api = client(&base_url, "shop-1", Some("t"));

    let updated = api
        .update_appointment("a", &UpdateAppointmentRequest::status(AppointmentStatus::Confirmed))
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::Confirmed);
    let seen = recorder.lock().unwrap().clone();
    assert_eq!(seen.body, Some(json!({ "status": "CONFIRMED" })));
}

#[tokio::test]
async fn test_conflict_carries_backend_message() {
    let base_url = spawn_backend(Recorder::default()).await;
    let api = client(&base_url, "shop-1", Some("t"));

    let error = api
        .update_appointment(
            "taken",
            &UpdateAppointmentRequest::reschedule(at(2025, 3, 11, 10, 0)),
        )
        .await
        .unwrap_err();

    match &error {
        BookingError::Api { status, message } => {
            assert_eq!(*status, 409);
            assert_eq!(message.as_deref(), Some("Slot is no longer available"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(error.user_message("fallback"), "Slot is no longer available");
}

#[tokio::test]
async fn test_error_field_is_used_as_message() {
    let base_url = spawn_backend(Recorder::default()).await;
    let api = client(&base_url, "shop-1", None);

    let error = api.services().await.unwrap_err();
    assert_eq!(error.user_message("fallback"), "Database unavailable");
}

#[tokio::test]
async fn test_cancel_and_missing_appointment() {
    let base_url = spawn_backend(Recorder::default()).await;
    let api = client(&base_url, "shop-1", Some("t"));

    tokio_test::assert_ok!(api.cancel_appointment("a").await);

    let error = tokio_test::assert_err!(api.cancel_appointment("missing").await);
    assert!(matches!(error, BookingError::NotFound(_)));
}

#[tokio::test]
async fn test_business_hours_time_formats() {
    let base_url = spawn_backend(Recorder::default()).await;
    let api = client(&base_url, "shop-1", None);

    let hours = api.business_hours().await.unwrap();

    assert_eq!(hours.len(), 2);
    assert_eq!(hours[0].open_time, Some(hm(9, 0)));
    assert_eq!(hours[0].close_time, Some(hm(18, 0)));
    assert!(!hours[1].is_open);
    assert_eq!(hours[1].open_time, None);
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let api = client("http://127.0.0.1:9/api", "shop-1", None);

    let error = api.barbers().await.unwrap_err();
    assert!(matches!(error, BookingError::Transport(_)));
    assert_eq!(error.user_message("fallback"), "fallback");
}

#[test]
fn test_invalid_base_url() {
    let session = SessionContext::public("shop-1");
    let result = HttpBookingApi::new("not a url", session, Duration::from_secs(1));
    assert!(matches!(result, Err(BookingError::Validation(_))));
}

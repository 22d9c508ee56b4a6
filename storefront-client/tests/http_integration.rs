// storefront-client/tests/http_integration.rs
// HttpClient against an in-process axum server

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use http::{HeaderMap, StatusCode};
use parking_lot::Mutex;
use serde_json::{Value, json};
use shared::cart::{CartItemInput, ModifierOption};
use shared::order::OrderStatus;
use shared::reservation::ReservationRequest;
use std::sync::Arc;
use storefront_client::{ClientConfig, ClientError, HttpClient};
use storefront_core::{Cart, build_submission};

const TOKEN: &str = "test-token";

#[derive(Clone, Default)]
struct Captured {
    bodies: Arc<Mutex<Vec<Value>>>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        == Some("Bearer test-token")
}

async fn history(headers: HeaderMap, Path(table_id): Path<String>) -> (StatusCode, Json<Value>) {
    if !authorized(&headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "no token"})));
    }
    match table_id.as_str() {
        "T1" => (
            StatusCode::OK,
            Json(json!({
                "data": [
                    {
                        "dining_id": 101,
                        "created_at": "2024-06-01T19:00:00Z",
                        "status": "processing",
                        "total_amount": "24.50",
                        "items": [{"item_name": "Curry", "quantity": 2, "price": "12.25", "spice_level": "Hot"}]
                    },
                    {"id": "102", "status": "VOID", "totalAmount": 9, "voidReason": "Duplicate"}
                ]
            })),
        ),
        "patio/4 b" => (StatusCode::OK, Json(json!([{"id": 7, "status": "ready"}]))),
        "broken" => (StatusCode::OK, Json(json!({"unexpected": true}))),
        "down" => (StatusCode::BAD_GATEWAY, Json(json!({"error": "upstream"}))),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "unknown table"}))),
    }
}

async fn place_order(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.bodies.lock().push(body);
    Json(json!({
        "message": "Order placed",
        "order": {"id": 555, "status": "pending", "totalAmount": 26.0}
    }))
}

async fn reserve(State(captured): State<Captured>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["party_size"] == 0 {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "party size"})));
    }
    captured.bodies.lock().push(body);
    (StatusCode::CREATED, Json(json!({"reservation_id": 9, "message": "See you soon"})))
}

async fn spawn_server() -> (String, Captured) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/dining/orders/{table_id}", get(history))
        .route("/api/dining/orders", post(place_order))
        .route("/api/reservations", post(reserve))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), captured)
}

fn client(base_url: &str) -> HttpClient {
    HttpClient::new(&ClientConfig::new(base_url).with_token(TOKEN).with_timeout(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_order_history_normalizes_wire_shapes() {
    let (base_url, _) = spawn_server().await;
    let orders = client(&base_url).fetch_order_history("T1").await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, "101");
    assert_eq!(orders[0].status, OrderStatus::Preparing);
    assert_eq!(orders[0].total_amount, 24.5);
    assert_eq!(orders[0].created_at, "2024-06-01T19:00:00Z");
    assert_eq!(orders[0].items[0].name, "Curry");
    assert_eq!(orders[0].items[0].spice_level, "Hot");

    assert_eq!(orders[1].id, "102");
    assert!(orders[1].is_void());
    assert_eq!(orders[1].void_reason.as_deref(), Some("Duplicate"));
}

#[tokio::test]
async fn test_table_id_is_sent_as_one_path_segment() {
    let (base_url, _) = spawn_server().await;
    let orders = client(&base_url).fetch_order_history("patio/4 b").await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id, "7");
}

#[tokio::test]
async fn test_error_statuses_are_mapped() {
    let (base_url, _) = spawn_server().await;

    let anonymous = HttpClient::new(&ClientConfig::new(&base_url)).unwrap();
    assert!(matches!(
        anonymous.fetch_order_history("T1").await,
        Err(ClientError::Unauthorized)
    ));

    let client = client(&base_url);
    assert!(matches!(
        client.fetch_order_history("nope").await,
        Err(ClientError::NotFound(_))
    ));
    assert!(matches!(
        client.fetch_order_history("broken").await,
        Err(ClientError::InvalidResponse(_))
    ));

    let down = client.fetch_order_history("down").await.unwrap_err();
    assert!(matches!(down, ClientError::Internal(_)));
    assert!(down.is_transient());
}

#[tokio::test]
async fn test_place_order_posts_camel_case_submission() {
    let (base_url, captured) = spawn_server().await;

    let mut cart = Cart::for_table("T1");
    cart.add_item(
        CartItemInput::new(3, "Curry", 12.0)
            .with_quantity(2)
            .with_modifier("Spice Level", [ModifierOption::free("Hot")])
            .with_modifier("Extras", [ModifierOption::new("Cheese", 1.0)]),
    );
    let submission = build_submission(&cart, "T1", "42", None, "No onions");

    let response = client(&base_url).place_order(&submission).await.unwrap();
    assert_eq!(response.message.as_deref(), Some("Order placed"));
    assert_eq!(response.order.map(|o| o.id), Some("555".to_string()));

    let bodies = captured.bodies.lock();
    let body = &bodies[0];
    assert_eq!(body["tableId"], "T1");
    assert_eq!(body["restaurantId"], "42");
    assert_eq!(body["specialRequest"], "No onions");
    assert_eq!(body["orderedItems"][0]["spiceLevel"], "Hot");
    assert_eq!(body["orderedItems"][0]["unitPrice"], 12.0);
    assert_eq!(body["orderedItems"][0]["modifiers"][0]["modifierName"], "Cheese");
}

#[tokio::test]
async fn test_reserve_table() {
    let (base_url, captured) = spawn_server().await;
    let client = client(&base_url);

    let request = ReservationRequest::new("42", "Ana", "ana@example.com", "600 000 000", 4)
        .at("2024-06-01", "19:30");
    let confirmation = client.reserve_table(&request).await.unwrap();
    assert_eq!(confirmation.id.as_deref(), Some("9"));
    assert_eq!(captured.bodies.lock()[0]["name"], "Ana");

    let mut rejected = request.clone();
    rejected.party_size = 0;
    assert!(matches!(
        client.reserve_table(&rejected).await,
        Err(ClientError::Validation(_))
    ));
}

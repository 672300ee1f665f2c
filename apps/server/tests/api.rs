//! Black-box tests for the REST API.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot` against
//! an in-memory SQLite store, so every test gets an isolated database.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use shopbook_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    shopbook_server::router(db)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(value) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "text/csv")
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

fn widget_item() -> Value {
    json!({
        "name": "Widget",
        "category": "Hardware",
        "currentStock": 10,
        "minStock": 2,
        "unitCostCents": 500,
        "stockDate": "2024-03-01"
    })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = test_app().await;
    let (status, body) = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn full_sale_lifecycle_over_http() {
    let app = test_app().await;

    // Create the inventory item: stock 10 @ 5.00 → value 50.00.
    let (status, item) = send(&app, Method::POST, "/api/inventory", Some(widget_item())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["totalValueCents"], 5000);
    let item_id = item["id"].as_str().unwrap().to_string();

    // Sell 3 @ 7.00 against the item.
    let (status, outcome) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "date": "2024-03-15",
            "item": "Widget",
            "quantity": 3,
            "priceCents": 700,
            "inventoryItemId": item_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["inventoryUpdated"], true);
    assert_eq!(outcome["newStock"], 7);
    let sale_id = outcome["id"].as_str().unwrap().to_string();

    // The sale landed with the derived total.
    let (status, sales) = send(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sales.as_array().unwrap().len(), 1);
    assert_eq!(sales[0]["totalCents"], 2100);

    // The item's stock and value dropped.
    let (_, items) = send(&app, Method::GET, "/api/inventory", None).await;
    assert_eq!(items[0]["currentStock"], 7);
    assert_eq!(items[0]["totalValueCents"], 3500);

    // Dashboard for March 2024 with a 500.00 bank balance.
    send(
        &app,
        Method::POST,
        "/api/settings/bankBalance",
        Some(json!({ "value": "500.00" })),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({
            "date": "2024-03-20",
            "category": "Supplies",
            "storeVendor": "Acme Supply",
            "description": "Boxes",
            "amountCents": 400
        })),
    )
    .await;

    let (status, dashboard) = send(&app, Method::GET, "/api/dashboard/2024/3", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["salesCents"], 2100);
    assert_eq!(dashboard["expensesCents"], 400);
    assert_eq!(dashboard["netProfitCents"], 1700);
    assert_eq!(dashboard["bankBalanceCents"], 50000);

    // Delete the sale: stock is restored exactly.
    let (status, deletion) = send(
        &app,
        Method::DELETE,
        &format!("/api/sales/{sale_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deletion["inventoryRestored"], true);
    assert_eq!(deletion["restoredQuantity"], 3);

    let (_, items) = send(&app, Method::GET, "/api/inventory", None).await;
    assert_eq!(items[0]["currentStock"], 10);
    assert_eq!(items[0]["totalValueCents"], 5000);
}

#[tokio::test]
async fn insufficient_stock_is_conflict() {
    let app = test_app().await;

    let (_, item) = send(&app, Method::POST, "/api/inventory", Some(widget_item())).await;
    let item_id = item["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "date": "2024-03-15",
            "item": "Widget",
            "quantity": 11,
            "priceCents": 700,
            "inventoryItemId": item_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Widget"));
    assert!(message.contains("available 10"));
    assert!(message.contains("requested 11"));

    // Nothing was persisted.
    let (_, sales) = send(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(sales.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::DELETE, "/api/sales/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = send(&app, Method::DELETE, "/api/expenses/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/inventory/nope",
        Some(widget_item()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/sales",
        Some(json!({
            "date": "2024-03-15",
            "item": "Widget",
            "quantity": 0,
            "priceCents": 700
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&app, Method::GET, "/api/dashboard/2024/13", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stock_adjustment_endpoint() {
    let app = test_app().await;

    let (_, item) = send(&app, Method::POST, "/api/inventory", Some(widget_item())).await;
    let item_id = item["id"].as_str().unwrap();

    let (status, adjustment) = send(
        &app,
        Method::PUT,
        &format!("/api/inventory/{item_id}/stock"),
        Some(json!({ "quantity": 10, "operation": "subtract" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(adjustment["newStock"], 0);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/inventory/{item_id}/stock"),
        Some(json!({ "quantity": 1 })), // operation defaults to subtract
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
}

#[tokio::test]
async fn settings_roundtrip() {
    let app = test_app().await;

    let (status, body) = send(&app, Method::GET, "/api/settings/bankBalance", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], Value::Null);

    send(
        &app,
        Method::POST,
        "/api/settings/bankBalance",
        Some(json!({ "value": "123.45" })),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/api/settings/bankBalance", None).await;
    assert_eq!(body["value"], "123.45");
}

#[tokio::test]
async fn csv_import_over_http() {
    let app = test_app().await;

    let csv_text = "date,item,quantity,price,total\n2024-03-15,Widget,3,7.00,\n".to_string();
    let (status, body) = send_raw(&app, Method::POST, "/api/import/sales", csv_text).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 1);

    let (_, sales) = send(&app, Method::GET, "/api/sales", None).await;
    assert_eq!(sales[0]["totalCents"], 2100);

    let (status, body) = send_raw(
        &app,
        Method::POST,
        "/api/import/nonsense",
        String::new(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn csv_export_over_http() {
    let app = test_app().await;

    send(
        &app,
        Method::POST,
        "/api/expenses",
        Some(json!({
            "date": "2024-03-20",
            "category": "Supplies",
            "storeVendor": "Acme Supply",
            "description": "Boxes",
            "amountCents": 4000
        })),
    )
    .await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/export/expenses")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.starts_with("date,category,storeVendor,description,amount"));
    assert!(text.contains("40.00"));
}

#[tokio::test]
async fn backup_restore_over_http() {
    let app = test_app().await;

    send(&app, Method::POST, "/api/inventory", Some(widget_item())).await;
    send(
        &app,
        Method::POST,
        "/api/settings/bankBalance",
        Some(json!({ "value": "500.00" })),
    )
    .await;

    let (status, backup) = send(&app, Method::GET, "/api/export/backup", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backup["bankBalanceCents"], 50000);
    assert_eq!(backup["inventory"].as_array().unwrap().len(), 1);

    // Restore into a fresh app.
    let fresh = test_app().await;
    let (status, _) = send(&fresh, Method::POST, "/api/import/backup", Some(backup)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, items) = send(&fresh, Method::GET, "/api/inventory", None).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["name"], "Widget");
}

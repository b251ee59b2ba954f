//! End-to-end checkout tests: browser-like client -> storefront -> fake order API.

use axum::http::StatusCode;
use std::time::Duration;

use clean_girl_integration_tests::{FakeBackend, browser, spawn_storefront, unreachable_api};
use serde_json::{Value, json};

const VALID_FORM: [(&str, &str); 4] = [
    ("customer_name", "Jane Doe"),
    ("email", "jane@example.com"),
    ("address", "12 Orchard Lane, Springfield"),
    ("phone", "555-123-4567"),
];

fn inventory(price_cents: i64, discount_cents: Option<i64>) -> Value {
    json!([{ "name": "Clean Girl", "price_cents": price_cents, "discount_cents": discount_cents }])
}

async fn get_text(client: &reqwest::Client, url: String) -> String {
    let resp = client.get(url).send().await.expect("GET failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

async fn post_text(client: &reqwest::Client, url: String) -> String {
    let resp = client.post(url).send().await.expect("POST failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

async fn submit(client: &reqwest::Client, base: &str, form: &[(&str, &str)]) -> String {
    let resp = client
        .post(format!("{base}/order"))
        .form(form)
        .send()
        .await
        .expect("order POST failed");
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.expect("Failed to read response")
}

#[tokio::test]
async fn test_landing_shows_discounted_price() {
    let backend = FakeBackend::new(Some(inventory(2000, Some(1500))), StatusCode::OK, json!({}));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();

    let body = get_text(&client, format!("{base}/")).await;
    assert!(body.contains(r#"<span id="current-price" class="price-current">$15.00</span>"#));
    assert!(body.contains(r#"<span id="original-price" class="price-original">$20.00</span>"#));
    assert_eq!(backend.wait_for_health_checks(1).await, 1);
}

#[tokio::test]
async fn test_landing_hides_original_without_genuine_discount() {
    let backend = FakeBackend::new(Some(inventory(2000, Some(2000))), StatusCode::OK, json!({}));
    let base = spawn_storefront(backend.serve().await).await;

    let body = get_text(&browser(), format!("{base}/")).await;
    assert!(body.contains("$20.00"));
    assert!(!body.contains(r#"id="original-price""#));
}

#[tokio::test]
async fn test_landing_falls_back_to_default_price() {
    let backend = FakeBackend::default();
    let base = spawn_storefront(backend.serve().await).await;

    let body = get_text(&browser(), format!("{base}/")).await;
    assert!(body.contains("$19.90"));
    assert!(!body.contains(r#"class="notification""#));
}

#[tokio::test]
async fn test_quantity_controls_reprice_and_floor_at_one() {
    let backend = FakeBackend::new(Some(inventory(2000, Some(1500))), StatusCode::OK, json!({}));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    get_text(&client, format!("{base}/")).await;

    let body = post_text(&client, format!("{base}/quantity/decrease")).await;
    assert!(body.contains(r#"<span id="quantity">1</span>"#));

    post_text(&client, format!("{base}/quantity/increase")).await;
    let body = post_text(&client, format!("{base}/quantity/increase")).await;
    assert!(body.contains(r#"<span id="quantity">3</span>"#));
    assert!(body.contains(r#"<dd id="subtotal">$45.00</dd>"#));
    assert!(body.contains(r#"<dd id="total">$45.00</dd>"#));
}

#[tokio::test]
async fn test_proceed_to_checkout_reveals_form() {
    let backend = FakeBackend::default();
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();

    let body = get_text(&client, format!("{base}/")).await;
    assert!(!body.contains(r#"id="order-form""#));

    let body = post_text(&client, format!("{base}/checkout")).await;
    assert!(body.contains(r#"id="order-form""#));
    assert!(body.contains("data-scroll-into-view"));
}

#[tokio::test]
async fn test_short_name_rejected_without_order_request() {
    let backend = FakeBackend::default();
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    post_text(&client, format!("{base}/checkout")).await;

    let mut form = VALID_FORM;
    form[0] = ("customer_name", "J");
    let body = submit(&client, &base, &form).await;

    assert!(body.contains("Please enter a valid full name"));
    assert!(body.contains(r#"data-dismiss-after="5000""#));
    assert!(backend.orders().is_empty());
}

#[tokio::test]
async fn test_successful_order_confirms_and_resets() {
    let backend = FakeBackend::new(None, StatusCode::OK, json!({ "order_id": "ABC123" }));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    get_text(&client, format!("{base}/")).await;
    post_text(&client, format!("{base}/quantity/increase")).await;
    post_text(&client, format!("{base}/checkout")).await;

    let body = submit(&client, &base, &VALID_FORM).await;

    assert!(body.contains(r#"<strong id="order-id">ABC123</strong>"#));
    assert!(body.contains(r#"<span id="quantity">1</span>"#));
    assert!(!body.contains(r#"id="order-form""#));

    let orders = backend.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["quantity"], 2);
    assert_eq!(orders[0]["customer_name"], "Jane Doe");

    // Reset state survives into the next request
    let body = post_text(&client, format!("{base}/confirmation/dismiss")).await;
    assert!(!body.contains("ABC123"));
    assert!(body.contains(r#"<span id="quantity">1</span>"#));
}

#[tokio::test]
async fn test_rejected_order_shows_server_message_and_keeps_form() {
    let backend = FakeBackend::new(None, StatusCode::BAD_REQUEST, json!({ "error": "Out of stock" }));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    post_text(&client, format!("{base}/checkout")).await;

    let body = submit(&client, &base, &VALID_FORM).await;

    assert!(body.contains(r#"<p class="notification-message">Out of stock</p>"#));
    assert!(body.contains(r#"id="place-order-btn""#));
    assert!(!body.contains(r#"class="btn-primary" disabled"#));
    assert!(body.contains(r#"value="Jane Doe""#));
    assert_eq!(backend.orders().len(), 1);

    // The form is usable again: a retry goes through to the API
    submit(&client, &base, &VALID_FORM).await;
    assert_eq!(backend.orders().len(), 2);
}

#[tokio::test]
async fn test_reload_starts_a_new_page_session() {
    let backend = FakeBackend::new(Some(inventory(2000, Some(1500))), StatusCode::OK, json!({}));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    get_text(&client, format!("{base}/")).await;
    post_text(&client, format!("{base}/quantity/increase")).await;
    let body = post_text(&client, format!("{base}/checkout")).await;
    assert!(body.contains(r#"<span id="quantity">2</span>"#));
    assert!(body.contains(r#"id="order-form""#));

    backend.set_inventory(None);
    let body = get_text(&client, format!("{base}/")).await;

    assert!(body.contains(r#"<span id="quantity">1</span>"#));
    assert!(!body.contains(r#"id="order-form""#));
    assert!(body.contains(r#"<span id="current-price" class="price-current">$19.90</span>"#));
    assert!(!body.contains(r#"id="original-price""#));
}

#[tokio::test]
async fn test_landing_renders_when_backend_stops_answering() {
    let backend = FakeBackend::new(Some(inventory(2000, Some(1500))), StatusCode::OK, json!({}));
    backend.hang();
    let base = spawn_storefront(backend.serve().await).await;

    let resp = browser()
        .get(format!("{base}/"))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("landing page must render without the order API");
    assert_eq!(resp.status(), StatusCode::OK);

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("$19.90"));
    assert!(!body.contains(r#"class="notification""#));
}

#[tokio::test]
async fn test_concurrent_submits_place_one_order() {
    let backend = FakeBackend::new(None, StatusCode::OK, json!({ "order_id": "ABC123" }));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    get_text(&client, format!("{base}/")).await;
    post_text(&client, format!("{base}/checkout")).await;

    let (first, second) = tokio::join!(
        submit(&client, &base, &VALID_FORM),
        submit(&client, &base, &VALID_FORM),
    );

    assert_eq!(backend.orders().len(), 1);
    let confirmations = [&first, &second]
        .iter()
        .filter(|body| body.contains(r#"id="order-id""#))
        .count();
    assert_eq!(confirmations, 1);
}

#[tokio::test]
async fn test_concurrent_quantity_changes_all_apply() {
    let backend = FakeBackend::default();
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    get_text(&client, format!("{base}/")).await;

    let url = format!("{base}/quantity/increase");
    tokio::join!(
        post_text(&client, url.clone()),
        post_text(&client, url.clone()),
        post_text(&client, url.clone()),
    );

    let body = post_text(&client, format!("{base}/quantity/decrease")).await;
    assert!(body.contains(r#"<span id="quantity">3</span>"#));
}

#[tokio::test]
async fn test_unreachable_api_shows_retry_message() {
    let base = spawn_storefront(unreachable_api().await).await;
    let client = browser();
    get_text(&client, format!("{base}/")).await;
    post_text(&client, format!("{base}/checkout")).await;

    let body = submit(&client, &base, &VALID_FORM).await;

    assert!(body.contains(
        r#"<p class="notification-message">Failed to place order. Please try again.</p>"#
    ));
    assert!(body.contains(r#"id="place-order-btn""#));
    assert!(!body.contains(r#"class="btn-primary" disabled"#));
    assert!(!body.contains(r#"loading-overlay is-visible"#));
}

#[tokio::test]
async fn test_rejection_without_message_shows_fallback() {
    let backend = FakeBackend::new(None, StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let base = spawn_storefront(backend.serve().await).await;
    let client = browser();
    post_text(&client, format!("{base}/checkout")).await;

    let body = submit(&client, &base, &VALID_FORM).await;

    assert!(body.contains(r#"<p class="notification-message">Failed to place order</p>"#));
    assert!(!body.contains(r#"class="btn-primary" disabled"#));
    assert_eq!(backend.orders().len(), 1);
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let backend = FakeBackend::default();
    let base = spawn_storefront(backend.serve().await).await;

    assert_eq!(get_text(&browser(), format!("{base}/health")).await, "ok");
    assert_eq!(backend.health_checks(), 0);

    let resp = browser()
        .get(format!("{base}/nope"))
        .send()
        .await
        .expect("GET failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

//! End-to-end rate limiting behavior.
//!
//! Window arithmetic is covered by unit tests in the api crate; these
//! verify the HTTP contract: status, message, and Retry-After header.

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use integration_tests::{fixtures, setup::TestContext};

fn single_image() -> MultipartForm {
    MultipartForm::new().add_part(
        "images",
        Part::bytes(fixtures::jpeg_bytes())
            .file_name("leaf.jpg")
            .mime_type("image/jpeg"),
    )
}

/// The first five requests in a minute are admitted; the sixth gets a
/// 429 with a numeric Retry-After header.
#[tokio::test]
async fn test_sixth_request_in_minute_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for i in 0..5 {
        let response = server
            .post("/api/identify")
            .add_header("X-Forwarded-For", "192.0.2.1")
            .multipart(single_image())
            .await;
        response.assert_status(StatusCode::OK);
        assert!(
            response.headers().get("Retry-After").is_none(),
            "request {} should be admitted without Retry-After",
            i + 1
        );
    }

    let response = server
        .post("/api/identify")
        .add_header("X-Forwarded-For", "192.0.2.1")
        .multipart(single_image())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let retry_after = response
        .headers()
        .get("Retry-After")
        .expect("Retry-After header")
        .to_str()
        .unwrap()
        .parse::<u64>()
        .expect("numeric Retry-After");
    assert!(retry_after > 0 && retry_after <= 60);

    let body: serde_json::Value = response.json();
    assert_eq!(
        body["error"],
        "Rate limit exceeded. Please wait a moment before trying again."
    );

    // The sixth request never reached the provider.
    assert_eq!(ctx.identifier.received_batches().len(), 5);
}

/// The 31st request from one client within a day is rejected with a
/// numeric Retry-After, regardless of how the minute windows fell.
#[tokio::test]
async fn test_thirty_first_request_in_day_rejected() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..30 {
        server
            .post("/api/identify")
            .add_header("X-Forwarded-For", "192.0.2.40")
            .multipart(single_image())
            .await;
    }

    let response = server
        .post("/api/identify")
        .add_header("X-Forwarded-For", "192.0.2.40")
        .multipart(single_image())
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    response
        .headers()
        .get("Retry-After")
        .expect("Retry-After header")
        .to_str()
        .unwrap()
        .parse::<u64>()
        .expect("numeric Retry-After");
}

/// Limits are partitioned by client identity.
#[tokio::test]
async fn test_limits_are_per_client() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..6 {
        server
            .post("/api/identify")
            .add_header("X-Forwarded-For", "192.0.2.10")
            .multipart(single_image())
            .await;
    }

    // A different client is unaffected.
    let response = server
        .post("/api/identify")
        .add_header("X-Forwarded-For", "192.0.2.11")
        .multipart(single_image())
        .await;
    response.assert_status(StatusCode::OK);
}

/// The first entry of a forwarded chain identifies the client.
#[tokio::test]
async fn test_forwarded_chain_uses_first_hop() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..6 {
        server
            .post("/api/identify")
            .add_header("X-Forwarded-For", "192.0.2.20, 10.0.0.1")
            .multipart(single_image())
            .await;
    }

    // Same first hop, different proxy chain: still the same budget.
    let response = server
        .post("/api/identify")
        .add_header("X-Forwarded-For", "192.0.2.20, 10.9.9.9")
        .multipart(single_image())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Requests without any client header share the fallback identity.
#[tokio::test]
async fn test_missing_headers_fall_back_to_shared_identity() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..6 {
        server.post("/api/identify").multipart(single_image()).await;
    }

    let response = server.post("/api/identify").multipart(single_image()).await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

/// Rejected requests are rejected before validation runs: even a
/// malformed upload answers 429 once the budget is gone.
#[tokio::test]
async fn test_rate_limit_checked_before_validation() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for _ in 0..5 {
        server
            .post("/api/identify")
            .add_header("X-Forwarded-For", "192.0.2.30")
            .multipart(single_image())
            .await;
    }

    let response = server
        .post("/api/identify")
        .add_header("X-Forwarded-For", "192.0.2.30")
        .multipart(MultipartForm::new())
        .await;
    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
}

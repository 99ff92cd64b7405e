//! Integration tests for rate limiting middleware.
//!
//! These tests verify the HTTP-level behavior of rate limiting,
//! including 429 responses and proper integration with the middleware stack.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{
    create_test_server, get_request, health_request, json_body, request_payment_with_header,
};

/// Nothing listens here; these tests never reach the gateway.
const UNUSED_GATEWAY: &str = "http://127.0.0.1:1/v1/payments/";

#[tokio::test]
async fn test_rate_limiting_returns_429_when_exceeded() {
    // Create server with only 3 requests allowed per minute
    let (server, member) = create_test_server(UNUSED_GATEWAY.to_string(), 3).await;
    let app = server.router();

    for i in 1..=3 {
        let response = app
            .clone()
            .oneshot(get_request("/api/payments/pk_unknown", Some(&member)))
            .await
            .unwrap();
        assert_ne!(
            response.status(),
            StatusCode::TOO_MANY_REQUESTS,
            "Request {} should not be rate limited (quota not yet exceeded)",
            i
        );
    }

    // 4th request should be rate limited
    let response = app
        .clone()
        .oneshot(get_request("/api/payments/pk_unknown", Some(&member)))
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::TOO_MANY_REQUESTS,
        "Request should be rate limited after exceeding quota"
    );

    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("application/json"));

    let json = json_body(response).await;
    assert!(
        json["error"]
            .as_str()
            .unwrap()
            .contains("Rate limit exceeded")
    );
    assert_eq!(json["retry_after_seconds"], 60);
}

#[tokio::test]
async fn test_rate_limiting_health_endpoint_bypassed() {
    let (server, _) = create_test_server(UNUSED_GATEWAY.to_string(), 1).await;
    let app = server.router();

    // Health endpoint bypasses rate limiting entirely
    for _ in 0..10 {
        let response = app.clone().oneshot(health_request()).await.unwrap();

        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Health endpoint should not be rate limited"
        );
    }
}

#[tokio::test]
async fn test_rate_limiting_per_member_isolation() {
    let (server, member) = create_test_server(UNUSED_GATEWAY.to_string(), 1).await;
    let app = server.router();

    // Use up the anonymous bucket with a callback
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/fail?code=X&message=Y&orderId=order-404",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/fail?code=X&message=Y&orderId=order-404",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

    // The member still has its own quota
    let response = app
        .clone()
        .oneshot(get_request("/api/payments/pk_unknown", Some(&member)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rate_limit_applies_across_member_id_spellings() {
    let (server, member) = create_test_server(UNUSED_GATEWAY.to_string(), 1).await;
    let app = server.router();

    let hyphenated = member.id.to_string();
    let spellings = [
        hyphenated.clone(),
        hyphenated.to_uppercase(),
        hyphenated.replace('-', ""),
        format!("{{{}}}", hyphenated),
        format!("urn:uuid:{}", hyphenated),
    ];

    let mut statuses = Vec::new();
    for (i, spelling) in spellings.iter().enumerate() {
        let body = json!({
            "payment_type": "CARD",
            "amount": 1000,
            "order_id": format!("order-{}", i),
            "order_name": "Coffee beans 1kg"
        });
        let response = app
            .clone()
            .oneshot(request_payment_with_header(spelling, body))
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(statuses[0], StatusCode::CREATED);
    for status in &statuses[1..] {
        assert_eq!(*status, StatusCode::TOO_MANY_REQUESTS, "{:?}", statuses);
    }
}

#[tokio::test]
async fn test_callback_member_header_uses_anonymous_bucket() {
    let (server, member) = create_test_server(UNUSED_GATEWAY.to_string(), 1).await;
    let app = server.router();

    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/fail?code=X&message=Y&orderId=order-404",
            Some(&member),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // A different header value on a public route does not get a fresh bucket
    let response = app
        .clone()
        .oneshot(get_request(
            "/api/payments/fail?code=X&message=Y&orderId=order-404",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

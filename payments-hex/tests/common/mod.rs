//! Shared setup for the HTTP-level tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, Response},
};
use http_body_util::BodyExt;
use payments_hex::{
    GatewayConfig, HttpPaymentGateway, PaymentService, RedirectUrls, inbound::HttpServer,
};
use payments_repo::SqliteRepo;
use payments_types::{CreateMemberRequest, Member, MemberRepository};

pub const DEFAULT_SUCCESS: &str = "https://shop.example.com/payments/success";
pub const DEFAULT_FAIL: &str = "https://shop.example.com/payments/fail";

pub type TestServer = HttpServer<SqliteRepo, HttpPaymentGateway>;

/// Builds a server over in-memory SQLite with one registered member.
///
/// `gateway_url` is the prefix payment keys are appended to.
pub async fn create_test_server(
    gateway_url: String,
    requests_per_minute: u32,
) -> (TestServer, Member) {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let member = repo
        .create_member(CreateMemberRequest {
            email: "alice@example.com".to_string(),
            name: "Alice".to_string(),
        })
        .await
        .unwrap();

    let gateway = HttpPaymentGateway::new(GatewayConfig {
        base_url: gateway_url,
        secret_key: "test_sk".to_string(),
        timeout: None,
    })
    .unwrap();

    let service = PaymentService::new(
        repo,
        gateway,
        RedirectUrls {
            success_url: DEFAULT_SUCCESS.to_string(),
            fail_url: DEFAULT_FAIL.to_string(),
        },
    );

    (
        HttpServer::with_rate_limit(service, requests_per_minute),
        member,
    )
}

pub fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap()
}

pub fn request_payment_request(member: Option<&Member>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/payments")
        .header("Content-Type", "application/json");
    if let Some(member) = member {
        builder = builder.header("X-Member-Id", member.id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Same as `request_payment_request`, with the identity header sent verbatim.
pub fn request_payment_with_header(member_header: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/payments")
        .header("Content-Type", "application/json")
        .header("X-Member-Id", member_header)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str, member: Option<&Member>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(member) = member {
        builder = builder.header("X-Member-Id", member.id.to_string());
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

//! Caller identity middleware.
//!
//! Members are authenticated upstream; the proxy forwards the member id in
//! the `X-Member-Id` header. The parsed `MemberId` is stored in the request
//! extensions for handlers to extract.

use axum::{
    Json,
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use payments_types::MemberId;

pub const MEMBER_ID_HEADER: &str = "X-Member-Id";

/// Paths reachable without a member identity: health, the gateway's
/// redirect callbacks and the API docs.
fn is_public(path: &str) -> bool {
    matches!(
        path,
        "/health" | "/api/payments/success" | "/api/payments/fail"
    ) || path.starts_with("/swagger-ui")
        || path.starts_with("/api-docs")
}

fn extract_member_id(header: Option<&str>) -> Option<MemberId> {
    header?.trim().parse().ok()
}

/// Rejects requests without a valid `X-Member-Id` header with 401.
pub async fn member_auth_middleware(mut request: Request<Body>, next: Next) -> Response {
    if is_public(request.uri().path()) {
        return next.run(request).await;
    }

    let header = request
        .headers()
        .get(MEMBER_ID_HEADER)
        .and_then(|v| v.to_str().ok());

    match extract_member_id(header) {
        Some(member_id) => {
            request.extensions_mut().insert(member_id);
            next.run(request).await
        }
        None => unauthorized_response("Missing or invalid X-Member-Id header"),
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": 401
        })),
    )
        .into_response()
}

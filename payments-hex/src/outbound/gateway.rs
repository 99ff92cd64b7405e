//! HTTP client for the payment gateway's acceptance endpoint.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Serialize;

use payments_types::{GatewayError, PaymentGateway};

/// Connection settings for the gateway.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Prefix the payment key is appended to, including the trailing slash
    pub base_url: String,
    pub secret_key: String,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("secret_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptPaymentBody<'a> {
    order_id: &'a str,
    amount: i64,
}

/// `PaymentGateway` over HTTPS with Basic authentication.
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpPaymentGateway {
    pub fn new(config: GatewayConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url,
            secret_key: config.secret_key,
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn accept_payment(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.base_url, payment_key);

        // Basic credentials are the secret key with an empty password.
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, Some(""))
            .header(ACCEPT, "application/json")
            .json(&AcceptPaymentBody { order_id, amount })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), "gateway rejected acceptance");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn gateway(base_url: String) -> HttpPaymentGateway {
        HttpPaymentGateway::new(GatewayConfig {
            base_url,
            secret_key: "test_sk".to_string(),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_accept_sends_basic_auth_and_json_body() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/payments/pk_123")
                    // base64("test_sk:")
                    .header("Authorization", "Basic dGVzdF9zazo=")
                    .header("Content-Type", "application/json")
                    .header("Accept", "application/json")
                    .json_body(json!({ "orderId": "order-1", "amount": 5000 }));
                then.status(200)
                    .header("Content-Type", "application/json")
                    .body(r#"{"paymentKey":"pk_123","status":"DONE"}"#);
            })
            .await;

        let body = gateway(server.url("/v1/payments/"))
            .accept_payment("pk_123", "order-1", 5000)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body, r#"{"paymentKey":"pk_123","status":"DONE"}"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected_with_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/payments/pk_123");
                then.status(400)
                    .body(r#"{"code":"ALREADY_PROCESSED_PAYMENT"}"#);
            })
            .await;

        let result = gateway(server.url("/v1/payments/"))
            .accept_payment("pk_123", "order-1", 5000)
            .await;

        match result {
            Err(GatewayError::Rejected { status, body }) => {
                assert_eq!(status, 400);
                assert_eq!(body, r#"{"code":"ALREADY_PROCESSED_PAYMENT"}"#);
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_transport_error() {
        let result = gateway("http://127.0.0.1:1/".to_string())
            .accept_payment("pk_123", "order-1", 5000)
            .await;

        assert!(matches!(result, Err(GatewayError::Transport(_))));
    }

    #[test]
    fn test_config_debug_hides_secret() {
        let config = GatewayConfig {
            base_url: "https://gateway.example.com/".to_string(),
            secret_key: "test_sk_live".to_string(),
            timeout: None,
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("test_sk_live"));
        assert!(debug.contains("<redacted>"));
    }
}

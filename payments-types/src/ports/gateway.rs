//! Payment gateway port.
//!
//! This trait defines the interface to the third-party gateway that accepts
//! (settles) a payment. Implementations can be HTTP clients, mock gateways, etc.

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("Gateway unreachable: {0}")]
    Transport(String),

    /// The gateway answered with a non-2xx status.
    #[error("Gateway rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Port trait for payment gateways.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Asks the gateway to accept the payment identified by `payment_key`.
    ///
    /// Returns the gateway's response body verbatim.
    async fn accept_payment(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<String, GatewayError>;
}

//! Outbound adapters.
//!
//! Clients for third-party services that the application layer calls through ports.

mod gateway;

pub use gateway::{GatewayConfig, HttpPaymentGateway};

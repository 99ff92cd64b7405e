//! # Payments Hex
//!
//! Application service layer and adapters for the payments service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `outbound/` - Payment gateway client (reqwest)
//!
//! The service is generic over `R: CheckoutRepository` and `G: PaymentGateway`,
//! allowing different storage and gateway implementations to be injected.

pub mod inbound;
pub mod openapi;
pub mod outbound;
pub mod service;


pub use outbound::{GatewayConfig, HttpPaymentGateway};
pub use service::{PaymentService, RedirectUrls};

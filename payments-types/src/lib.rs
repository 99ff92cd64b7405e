//! # Payments Types
//!
//! Domain types and port traits for the payment request/confirmation service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Member, Order, Payment)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CardCompany, CardInfo, Member, MemberId, Order, OrderDetails, OrderKind, Payment, PaymentId,
    PaymentStatus, PaymentType,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{
    CheckoutRepository, GatewayError, MemberRepository, PaymentGateway, PaymentRepository,
};

//! Domain models for the payment service.

pub mod member;
pub mod order;
pub mod payment;

pub use member::{Member, MemberId};
pub use order::{CardCompany, CardInfo, Order, OrderDetails, OrderKind};
pub use payment::{Payment, PaymentId, PaymentStatus, PaymentType};

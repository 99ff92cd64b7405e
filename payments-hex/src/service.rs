//! Payment Application Service
//!
//! Orchestrates domain operations through the repository and gateway ports.
//! Contains NO infrastructure logic - pure business orchestration.

use payments_types::{
    AppError, CheckoutRepository, Member, MemberId, Payment, PaymentGateway, PaymentRequest,
    PaymentResponse,
};

/// Redirect targets used when a payment request does not name its own.
#[derive(Debug, Clone)]
pub struct RedirectUrls {
    pub success_url: String,
    pub fail_url: String,
}

/// Application service for payment operations.
///
/// Generic over the storage adapter `R` and the gateway adapter `G`; both are
/// injected at compile time, so tests swap in in-memory doubles.
pub struct PaymentService<R: CheckoutRepository, G: PaymentGateway> {
    repo: R,
    gateway: G,
    redirects: RedirectUrls,
}

impl<R: CheckoutRepository, G: PaymentGateway> PaymentService<R, G> {
    /// Creates a new payment service.
    pub fn new(repo: R, gateway: G, redirects: RedirectUrls) -> Self {
        Self {
            repo,
            gateway,
            redirects,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Returns a reference to the gateway adapter.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    async fn get_member(&self, id: MemberId) -> Result<Member, AppError> {
        self.repo
            .get_member(id)
            .await?
            .ok_or(AppError::MemberNotFound(id))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Request
    // ─────────────────────────────────────────────────────────────────────────────

    /// Records a pending payment for the member and returns what the
    /// checkout page needs to hand the customer over to the gateway.
    #[tracing::instrument(skip(self, req), fields(member_id = %member_id, order_id = %req.order_id))]
    pub async fn request_payment(
        &self,
        member_id: MemberId,
        req: PaymentRequest,
    ) -> Result<PaymentResponse, AppError> {
        let member = self.get_member(member_id).await?;

        let payment = Payment::new(
            member.id,
            req.payment_type,
            req.amount,
            req.order_id,
            req.order_name,
            req.success_url,
            req.fail_url,
        )?;
        let payment = self.repo.save(&payment).await?;

        let success_url = payment
            .success_url
            .clone()
            .unwrap_or_else(|| self.redirects.success_url.clone());
        let fail_url = payment
            .fail_url
            .clone()
            .unwrap_or_else(|| self.redirects.fail_url.clone());

        tracing::info!(payment_id = %payment.id, amount = payment.amount, "payment requested");

        Ok(PaymentResponse::from_payment(
            &payment,
            &member,
            success_url,
            fail_url,
        ))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Confirmation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Checks a gateway callback against the stored payment.
    pub async fn verify_payment(&self, order_id: &str, amount: i64) -> Result<Payment, AppError> {
        let payment = self
            .repo
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(order_id.to_string()))?;

        if let Err(e) = payment.verify_amount(amount) {
            tracing::warn!(order_id, stored = payment.amount, amount, "amount mismatch");
            return Err(e.into());
        }

        Ok(payment)
    }

    /// Verifies the callback, asks the gateway to accept the payment and
    /// records the result. Returns the gateway's response body verbatim.
    ///
    /// Nothing is sent to the gateway unless verification passes. A payment
    /// that is already confirmed is sent again.
    #[tracing::instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<String, AppError> {
        let mut payment = self.verify_payment(order_id, amount).await?;

        let body = self
            .gateway
            .accept_payment(payment_key, order_id, amount)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "gateway did not accept payment"))?;

        payment.confirm(payment_key);
        if let Err(e) = self.repo.save(&payment).await {
            tracing::error!(payment_id = %payment.id, error = %e, "accepted payment was not recorded");
            return Err(e.into());
        }

        tracing::info!(payment_id = %payment.id, "payment confirmed");
        Ok(body)
    }

    /// Records the failure reported by the gateway's fail redirect.
    #[tracing::instrument(skip(self, message))]
    pub async fn fail_payment(
        &self,
        order_id: &str,
        code: &str,
        message: &str,
    ) -> Result<Payment, AppError> {
        let mut payment = self
            .repo
            .find_by_order_id(order_id)
            .await?
            .ok_or_else(|| AppError::OrderNotFound(order_id.to_string()))?;

        if payment.success {
            return Ok(payment);
        }

        payment.fail(format!("{}: {}", code, message));
        let payment = self.repo.save(&payment).await?;

        tracing::info!(payment_id = %payment.id, "payment failed");
        Ok(payment)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Lookup
    // ─────────────────────────────────────────────────────────────────────────────

    /// Finds one of the member's payments by its gateway key.
    pub async fn find_payment(
        &self,
        member_id: MemberId,
        payment_key: &str,
    ) -> Result<Payment, AppError> {
        let member = self.get_member(member_id).await?;

        self.repo
            .find_by_payment_key_and_owner_email(payment_key, &member.email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment {}", payment_key)))
    }
}

//! Checkout pipeline.
//!
//! # Architecture
//!
//! Checkout runs as a fixed sequence of stages:
//!
//! ```text
//! validate -> snapshot -> remote submit (best effort) -> messaging handoff -> remove ordered lines
//! ```
//!
//! The session lock is held only while validating/snapshotting and while
//! resetting; the remote call runs unlocked. Remote recording is skipped
//! entirely when the catalog is the fallback menu, and any failure of it is
//! logged and reported as [`RemoteSubmission::Failed`]. The messaging handoff
//! is built on every path, so every accepted checkout ends with exactly one
//! deep link.
//!
//! Because the cart stays unlocked during the remote call, the reset only
//! takes the snapshotted quantities off the cart. Anything added meanwhile is
//! kept for the next order.
//!
//! Only one checkout may be in flight per coordinator; a second call while
//! one is running gets [`CheckoutError::InProgress`].

pub mod handoff;
pub mod order;
pub mod sink;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::shop::ShopSession;

pub use handoff::{MessagingHandoff, WhatsAppHandoff};
pub use order::{CheckoutForm, Order, OrderLine, OrderPayload};
pub use sink::{OrderClient, OrderSink, OrderSinkError};

/// Checkout refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Troli anda kosong.")]
    EmptyCart,

    #[error("Sila isi nama anda.")]
    MissingName,

    /// Delivery zones need a free-text address.
    #[error("Sila isi alamat penghantaran.")]
    MissingAddress,

    /// Another checkout is still running.
    #[error("Pesanan sedang dihantar, sila tunggu.")]
    InProgress,
}

/// What happened to the remote copy of the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RemoteSubmission {
    /// The order endpoint accepted the order.
    Recorded,
    /// Running on the fallback menu; no request was made.
    Skipped,
    /// The request was made and did not succeed.
    Failed { reason: String },
}

impl RemoteSubmission {
    #[must_use]
    pub const fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded)
    }
}

/// Terminal state of a completed checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    /// Recorded remotely and handed off to messaging.
    Sent,
    /// Handed off to messaging only.
    SentViaFallbackOnly,
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReport {
    pub order: Order,
    pub remote: RemoteSubmission,
    pub handoff: MessagingHandoff,
}

impl CheckoutReport {
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        if self.remote.is_recorded() {
            CheckoutState::Sent
        } else {
            CheckoutState::SentViaFallbackOnly
        }
    }
}

/// Runs checkouts against a session.
pub struct CheckoutCoordinator<S> {
    sink: S,
    handoff: WhatsAppHandoff,
    submitting: AtomicBool,
}

/// Clears the `submitting` flag when the checkout ends, however it ends.
struct SubmittingGuard<'a>(&'a AtomicBool);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<S: OrderSink> CheckoutCoordinator<S> {
    #[must_use]
    pub const fn new(sink: S, handoff: WhatsAppHandoff) -> Self {
        Self {
            sink,
            handoff,
            submitting: AtomicBool::new(false),
        }
    }

    /// Whether a checkout is currently running.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    #[must_use]
    pub const fn handoff(&self) -> &WhatsAppHandoff {
        &self.handoff
    }

    /// Place the order currently in the session's cart.
    ///
    /// On success the ordered quantities have left the cart and the report
    /// carries the messaging handoff. The inventory ledger is left as it is.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError`] if the cart is empty, a required field is
    /// blank, or another checkout is running. Nothing is changed in that case.
    #[instrument(skip_all, fields(zone = %form.zone, payment = ?form.payment))]
    pub async fn checkout(
        &self,
        session: &Mutex<ShopSession>,
        form: CheckoutForm,
    ) -> Result<CheckoutReport, CheckoutError> {
        if self
            .submitting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Checkout rejected: another checkout is in flight");
            return Err(CheckoutError::InProgress);
        }
        let _guard = SubmittingGuard(&self.submitting);

        let (order, degraded) = {
            let session = session.lock().await;
            validate(&session, &form)?;
            (Order::snapshot(session.cart(), &form), session.is_degraded())
        };

        let remote = if degraded {
            tracing::info!("Fallback menu in use, skipping remote order recording");
            RemoteSubmission::Skipped
        } else {
            match self.sink.submit(&order).await {
                Ok(()) => RemoteSubmission::Recorded,
                Err(e) => {
                    tracing::warn!(error = %e, "Remote order recording failed, continuing with messaging handoff");
                    RemoteSubmission::Failed {
                        reason: e.to_string(),
                    }
                }
            }
        };

        let handoff = self.handoff.build(&order);

        session
            .lock()
            .await
            .remove_ordered(order.lines.iter().map(|line| (&line.item_id, line.quantity)));

        let report = CheckoutReport {
            order,
            remote,
            handoff,
        };
        tracing::info!(
            state = ?report.state(),
            total = %report.order.grand_total,
            lines = report.order.lines.len(),
            "Checkout complete"
        );
        Ok(report)
    }
}

fn validate(session: &ShopSession, form: &CheckoutForm) -> Result<(), CheckoutError> {
    if session.cart().is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    if form.customer_name.trim().is_empty() {
        return Err(CheckoutError::MissingName);
    }
    if !form.zone.is_self_pickup() && form.address.trim().is_empty() {
        return Err(CheckoutError::MissingAddress);
    }
    Ok(())
}

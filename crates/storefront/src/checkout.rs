//! Checkout coordination.
//!
//! A checkout submits the whole cart as one batch. It either succeeds as a
//! whole (cart cleared, sales recorded, every active view refreshed from the
//! service) or fails as a whole (cart untouched, message shown, retry
//! possible). While a checkout is in flight its button is disabled, so a second
//! press does nothing.
//!
//! An accepted order whose local bookkeeping cannot be written is reported as
//! [`CheckoutOutcome::Unsettled`]. If the cart itself could not be cleared the
//! button stays disabled, so the same lines are not submitted twice.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument};

use crate::api::{CheckoutGateway, CheckoutReceipt};
use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, StorageError};
use crate::stores::{CartStore, SalesLedger};

/// Message shown after a successful checkout.
pub const CHECKOUT_SUCCESS_MESSAGE: &str = "Checkout successful!";

const IDLE_LABEL: &str = "Checkout";
const PROCESSING_LABEL: &str = "Processing...";

/// State of the checkout trigger, shared by the cart overlay and the
/// coordinator.
#[derive(Debug)]
pub struct CheckoutButton {
    disabled: AtomicBool,
    processing: AtomicBool,
}

impl CheckoutButton {
    /// Create the button.
    #[must_use]
    pub const fn new(disabled: bool) -> Self {
        Self {
            disabled: AtomicBool::new(disabled),
            processing: AtomicBool::new(false),
        }
    }

    /// Whether pressing the button starts a checkout.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.disabled.load(Ordering::Acquire)
    }

    /// Whether a checkout is in flight.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Button text.
    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.is_processing() {
            PROCESSING_LABEL
        } else {
            IDLE_LABEL
        }
    }

    /// Match the enabled state to cart emptiness. Ignored while a checkout is
    /// in flight; the in-flight cleanup sets the final state.
    pub fn sync(&self, cart_empty: bool) {
        if !self.is_processing() {
            self.disabled.store(cart_empty, Ordering::Release);
        }
    }

    /// Disable the button and mark it processing. Returns `false` if it was
    /// already disabled.
    fn press(&self) -> bool {
        if self
            .disabled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }
        self.processing.store(true, Ordering::Release);
        true
    }

    fn release(&self, cart_empty: bool) {
        self.processing.store(false, Ordering::Release);
        self.disabled.store(cart_empty, Ordering::Release);
    }
}

/// Restores the button when a checkout ends, whichever way it ends.
struct InFlight<'a, S: KeyValueStore + ?Sized> {
    button: &'a CheckoutButton,
    cart: &'a CartStore<S>,
    locked: bool,
}

impl<S: KeyValueStore + ?Sized> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        self.button.release(self.locked || self.cart.is_empty());
    }
}

/// Result of pressing checkout.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    /// Nothing to submit.
    EmptyCart,
    /// The button was disabled; nothing happened.
    Busy,
    /// The service refused or could not be reached. The cart is unchanged.
    Failed { message: String },
    /// The order went through.
    Completed { receipt: CheckoutReceipt },
    /// The order went through but local state could not be fully updated.
    Unsettled {
        receipt: CheckoutReceipt,
        message: String,
    },
}

impl CheckoutOutcome {
    /// Text to show the shopper, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::EmptyCart | Self::Busy => None,
            Self::Failed { message } | Self::Unsettled { message, .. } => Some(message),
            Self::Completed { .. } => Some(CHECKOUT_SUCCESS_MESSAGE),
        }
    }
}

/// Views that must reflect a completed checkout.
pub trait RefreshAfterCheckout {
    /// Re-render from fresh remote state.
    fn refresh_after_checkout(&mut self) -> impl Future<Output = ()>;
}

/// Runs checkouts against the remote service.
pub struct CheckoutCoordinator<S: ?Sized, G> {
    cart: CartStore<S>,
    sales: SalesLedger<S>,
    gateway: G,
    button: Arc<CheckoutButton>,
}

impl<S, G> CheckoutCoordinator<S, G>
where
    S: KeyValueStore + ?Sized,
    G: CheckoutGateway,
{
    /// Create a coordinator.
    pub const fn new(
        cart: CartStore<S>,
        sales: SalesLedger<S>,
        gateway: G,
        button: Arc<CheckoutButton>,
    ) -> Self {
        Self {
            cart,
            sales,
            gateway,
            button,
        }
    }

    /// The trigger this coordinator disables while in flight.
    pub fn button(&self) -> &CheckoutButton {
        &self.button
    }

    /// Submit the cart.
    ///
    /// On success the cart is cleared, the sales ledger advanced and `views`
    /// refreshed. On failure nothing local changes.
    #[instrument(skip_all)]
    pub async fn checkout<V: RefreshAfterCheckout>(&self, views: &mut V) -> CheckoutOutcome {
        let items = self.cart.read();
        if items.is_empty() {
            return CheckoutOutcome::EmptyCart;
        }

        if !self.button.press() {
            tracing::debug!("Checkout already in flight, ignoring press");
            return CheckoutOutcome::Busy;
        }
        let mut in_flight = InFlight {
            button: &self.button,
            cart: &self.cart,
            locked: false,
        };

        add_breadcrumb("checkout", "Submitted checkout", None);

        let receipt = match self.gateway.submit_checkout(&items).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::error!(error = %e, "Checkout failed, cart kept for retry");
                return CheckoutOutcome::Failed {
                    message: e.user_message().to_owned(),
                };
            }
        };

        let cleared = self.cart.clear();
        let recorded = self.sales.record_checkout(&items);
        info!(lines = items.len(), "Checkout completed");

        views.refresh_after_checkout().await;

        match (cleared, recorded) {
            (Ok(()), Ok(())) => CheckoutOutcome::Completed { receipt },
            (Err(e), _) => {
                in_flight.locked = true;
                unsettled(receipt, "the cart could not be cleared", &e)
            }
            (Ok(()), Err(e)) => unsettled(receipt, "the sale could not be recorded", &e),
        }
    }
}

fn unsettled(receipt: CheckoutReceipt, what: &str, error: &StorageError) -> CheckoutOutcome {
    add_breadcrumb("checkout", "Order placed with unsaved local state", None);
    CheckoutOutcome::Unsettled {
        receipt,
        message: format!("Order placed, but {what} ({error}). Do not check out again."),
    }
}

//! Checkout payloads and completion.

use crate::cart::{CartStore, LineItem};
use crate::checkout::{CheckoutPolicy, CheckoutTotals, Customer};
use crate::error::CommerceError;
use crate::ids::{OrderNumber, ORDER_PREFIX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use telly_storage::KeyValueStore;

/// The two payment integrations the storefront offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    #[default]
    Stripe,
    PayPal,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "stripe",
            PaymentProvider::PayPal => "paypal",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "Stripe",
            PaymentProvider::PayPal => "PayPal",
        }
    }

    /// Parse a provider name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "stripe" => Some(PaymentProvider::Stripe),
            "paypal" => Some(PaymentProvider::PayPal),
            _ => None,
        }
    }
}

/// Payment status reported back by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "pending" => Some(PaymentStatus::Pending),
            "paid" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            "refunded" => Some(PaymentStatus::Refunded),
            _ => None,
        }
    }
}

/// Everything the payment endpoint needs to create a charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub order_number: OrderNumber,
    pub provider: PaymentProvider,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub totals: CheckoutTotals,
}

impl CheckoutRequest {
    /// Snapshot the cart into a payload.
    ///
    /// Fails on an empty cart or an incomplete customer. The cart itself is
    /// left untouched; it is only cleared by [`complete_checkout`].
    pub fn prepare<S: KeyValueStore>(
        cart: &CartStore<S>,
        customer: Customer,
        provider: PaymentProvider,
        policy: &CheckoutPolicy,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        customer.validate()?;
        let totals = policy.totals(cart.total())?;

        Ok(Self {
            order_number: OrderNumber::generate(ORDER_PREFIX),
            provider,
            customer,
            items: cart.items().to_vec(),
            totals,
        })
    }

    /// Amount to charge in the plain decimal form providers take (`"161.97"`).
    pub fn charge_amount(&self) -> String {
        self.totals.total.display_amount()
    }

    /// Line shown on the customer's statement.
    pub fn description(&self, business_name: &str) -> String {
        format!("{} - Order #{}", business_name, self.order_number)
    }
}

/// What the payment endpoint reported after the customer approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub order_number: OrderNumber,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckoutOutcome {
    pub fn paid(order_number: OrderNumber) -> Self {
        Self {
            order_number,
            payment_status: PaymentStatus::Paid,
            message: None,
        }
    }

    pub fn failed(order_number: OrderNumber, message: impl Into<String>) -> Self {
        Self {
            order_number,
            payment_status: PaymentStatus::Failed,
            message: Some(message.into()),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

/// Finish a checkout: clear the cart once payment is confirmed.
///
/// Returns whether the cart was cleared. Any other outcome leaves the cart
/// as it was so the customer can retry.
pub fn complete_checkout<S: KeyValueStore>(
    cart: &mut CartStore<S>,
    outcome: &CheckoutOutcome,
) -> Result<bool, CommerceError> {
    if !outcome.is_confirmed() {
        tracing::warn!(
            order = %outcome.order_number,
            status = outcome.payment_status.as_str(),
            message = outcome.message.as_deref().unwrap_or(""),
            "payment not confirmed, keeping cart"
        );
        return Ok(false);
    }

    cart.clear()?;
    tracing::info!(order = %outcome.order_number, "checkout complete");
    Ok(true)
}

/// Fulfillment state of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Paid and waiting to be made.
    #[default]
    Received,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Received => "Received",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Orders can be cancelled until they leave the workshop.
    pub fn can_cancel(&self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::Processing)
    }
}

/// A paid order, kept after the cart has been cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_number: OrderNumber,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub provider: PaymentProvider,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub totals: CheckoutTotals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipped_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Record the order a confirmed payment settles.
    ///
    /// The outcome must be `Paid` and carry the request's order number.
    pub fn from_checkout(
        request: CheckoutRequest,
        outcome: &CheckoutOutcome,
    ) -> Result<Self, CommerceError> {
        if outcome.order_number != request.order_number {
            return Err(CommerceError::OrderMismatch {
                expected: request.order_number.to_string(),
                got: outcome.order_number.to_string(),
            });
        }
        if !outcome.is_confirmed() {
            return Err(CommerceError::PaymentNotConfirmed {
                order: request.order_number.to_string(),
                status: outcome.payment_status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            order_number: request.order_number,
            status: OrderStatus::Received,
            payment_status: outcome.payment_status,
            provider: request.provider,
            customer: request.customer,
            items: request.items,
            totals: request.totals,
            notes: None,
            created_at: now,
            updated_at: now,
            shipped_at: None,
            delivered_at: None,
        })
    }

    /// Get total item count.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Move to `status`, stamping the ship and delivery times.
    ///
    /// Terminal orders stay where they are, and cancelling is only allowed
    /// before shipping.
    pub fn set_status(&mut self, status: OrderStatus) -> Result<(), CommerceError> {
        let allowed = !self.status.is_terminal()
            && (status != OrderStatus::Cancelled || self.status.can_cancel());
        if !allowed {
            return Err(CommerceError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: status.as_str().to_string(),
            });
        }

        let now = Utc::now();
        match status {
            OrderStatus::Shipped => self.shipped_at = Some(now),
            OrderStatus::Delivered => self.delivered_at = Some(now),
            _ => {}
        }
        self.status = status;
        self.updated_at = now;
        tracing::info!(
            order = %self.order_number,
            status = status.as_str(),
            "order status changed"
        );
        Ok(())
    }
}

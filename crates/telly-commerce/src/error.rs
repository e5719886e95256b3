//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Line item input rejected before it reached the cart.
    #[error("Invalid item: {0}")]
    InvalidItem(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// A custom-fit measurement is missing or not positive.
    #[error("Please provide a valid {0} measurement")]
    InvalidMeasurement(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// An order was recorded from a payment that did not succeed.
    #[error("Payment for order {order} is {status}")]
    PaymentNotConfirmed { order: String, status: String },

    /// Payment outcome reported for a different order.
    #[error("Order mismatch: expected {expected}, got {got}")]
    OrderMismatch { expected: String, got: String },

    /// Order status change not allowed from the current state.
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Pricing or cart settings are unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Review submission rejected.
    #[error("Invalid review: {0}")]
    InvalidReview(String),

    /// Persisted slot could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] telly_storage::StorageError),
}

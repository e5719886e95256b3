//! Checkout: customer details, pricing rules, the payment hand-off, and
//! the placed order with its receipt.

mod customer;
mod order;
mod policy;
mod receipt;

pub use customer::{Address, Customer};
pub(crate) use customer::is_plausible_email;
pub use order::{
    complete_checkout, CheckoutOutcome, CheckoutRequest, Order, OrderStatus, PaymentProvider,
    PaymentStatus,
};
pub use policy::{
    CheckoutPolicy, CheckoutTotals, DEFAULT_FLAT_SHIPPING_CENTS,
    DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS, DEFAULT_TAX_RATE_PERCENT,
};
pub use receipt::{Receipt, ReceiptHeader};

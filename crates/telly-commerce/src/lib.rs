//! Storefront domain types and logic for Bikinis By Telly.
//!
//! - **Cart**: persisted line items with merge-on-add and change observers
//! - **Checkout**: customer details, shipping and tax, payment hand-off
//! - **Custom orders**: made-to-measure requests
//! - **Reviews**: rating submissions
//!
//! # Example
//!
//! ```rust,ignore
//! use telly_commerce::prelude::*;
//! use telly_storage::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".telly")?);
//! let mut cart = CartStore::open(cache, CartConfig::default());
//!
//! cart.subscribe(|event| {
//!     if let Some(message) = event.notification() {
//!         println!("{message}");
//!     }
//! });
//!
//! cart.add(
//!     LineItemInput::new("bk-01", "Ocean Bikini", Money::new(4999, Currency::USD))
//!         .with_size("S"),
//! )?;
//!
//! let totals = CheckoutPolicy::default().totals(cart.total())?;
//! println!("Total: {}", totals.total.display());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod checkout;
pub mod custom_order;
pub mod review;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{
        CartChange, CartConfig, CartEvent, CartStore, LineItem, LineItemInput, LineKey,
        Measurements, SubscriptionId,
    };

    // Checkout
    pub use crate::checkout::{
        complete_checkout, Address, CheckoutOutcome, CheckoutPolicy, CheckoutRequest,
        CheckoutTotals, Customer, Order, OrderStatus, PaymentProvider, PaymentStatus,
        ReceiptHeader,
    };

    pub use crate::custom_order::{CustomOrder, CustomOrderRequest, CustomOrderStatus};
    pub use crate::review::{average_rating, Review, ReviewSubmission};
}

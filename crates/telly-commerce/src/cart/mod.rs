//! Shopping cart module.
//!
//! Contains the line item types, the persisted cart store, and the change
//! events its subscribers receive.

mod event;
mod item;
mod store;

pub use event::{CartChange, CartEvent, SubscriptionId};
pub use item::{LineItem, LineItemInput, LineKey, Measurements, CUSTOM_SIZE, DEFAULT_SIZE};
pub use store::{CartConfig, CartStore, DEFAULT_SLOT_KEY, MAX_QUANTITY_PER_ITEM};

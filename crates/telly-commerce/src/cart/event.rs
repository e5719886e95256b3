//! Change notifications for cart observers.

use crate::cart::LineKey;
use crate::money::Money;

/// What a mutation did to the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartChange {
    /// An addition appended a line, or merged into an existing one.
    Added {
        key: LineKey,
        name: String,
        quantity: i64,
        merged: bool,
    },
    /// One or more lines were removed.
    Removed { keys: Vec<LineKey> },
    /// A line's quantity was set to a new positive value.
    QuantityChanged { key: LineKey, quantity: i64 },
    /// Everything was removed.
    Cleared,
    /// State was re-read from the persisted slot.
    Reloaded,
}

/// Delivered to every subscriber after a state-changing operation.
///
/// Carries the aggregates a header badge or order summary needs, computed
/// after the change was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEvent {
    pub change: CartChange,
    pub count: i64,
    pub total: Money,
}

impl CartEvent {
    /// Short user-facing confirmation for this change, if it warrants one.
    pub fn notification(&self) -> Option<String> {
        match &self.change {
            CartChange::Added { name, .. } => Some(format!("{} added to cart!", name)),
            CartChange::Removed { .. } => Some("Item removed from cart".to_string()),
            _ => None,
        }
    }
}

/// Handle returned by [`CartStore::subscribe`](crate::cart::CartStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&CartEvent)>;

/// Registered observers, notified in subscription order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    callbacks: Vec<(SubscriptionId, Callback)>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let len_before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        self.callbacks.len() < len_before
    }

    pub(crate) fn notify(&self, event: &CartEvent) {
        for (_, callback) in &self.callbacks {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.callbacks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(change: CartChange) -> CartEvent {
        CartEvent {
            change,
            count: 1,
            total: Money::new(4999, Currency::USD),
        }
    }

    #[test]
    fn test_added_notification() {
        let e = event(CartChange::Added {
            key: LineKey::new("bk-01", "M"),
            name: "Ocean Bikini".to_string(),
            quantity: 1,
            merged: false,
        });
        assert_eq!(e.notification().as_deref(), Some("Ocean Bikini added to cart!"));
        assert_eq!(event(CartChange::Cleared).notification(), None);
    }

    #[test]
    fn test_observers_in_order_and_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = Observers::default();

        let first = {
            let seen = Rc::clone(&seen);
            observers.subscribe(Box::new(move |_| seen.borrow_mut().push("first")))
        };
        {
            let seen = Rc::clone(&seen);
            observers.subscribe(Box::new(move |_| seen.borrow_mut().push("second")));
        }

        observers.notify(&event(CartChange::Cleared));
        assert_eq!(*seen.borrow(), vec!["first", "second"]);

        assert!(observers.unsubscribe(first));
        assert!(!observers.unsubscribe(first));
        assert_eq!(observers.len(), 1);

        observers.notify(&event(CartChange::Cleared));
        assert_eq!(*seen.borrow(), vec!["first", "second", "second"]);
    }
}

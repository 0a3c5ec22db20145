//! Cart change notifications.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// A change to the cart, delivered to subscribers after it was persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CartEvent {
    /// Units were added. Shown to the shopper as "Added to cart".
    Added {
        id: ProductId,
        name: String,
        quantity: u32,
    },
    Removed { id: ProductId },
    #[serde(rename_all = "camelCase")]
    QuantityUpdated { id: ProductId, quantity: u32 },
    Cleared,
    /// Persisted lines were loaded into the store.
    Loaded { lines: usize },
}

impl CartEvent {
    /// Short message suitable for a toast.
    pub fn message(&self) -> String {
        match self {
            CartEvent::Added { name, .. } => format!("Added to cart: {name}"),
            CartEvent::Removed { id } => format!("Removed {id} from cart"),
            CartEvent::QuantityUpdated { id, quantity } => {
                format!("Updated {id} to {quantity}")
            }
            CartEvent::Cleared => "Cart cleared".to_string(),
            CartEvent::Loaded { lines } => format!("Loaded {lines} cart line(s)"),
        }
    }
}

/// Handle returned by `CartStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Listener = Box<dyn Fn(&CartEvent) + Send + Sync>;

/// Registered listeners, called in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() < before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn emit(&self, event: &CartEvent) {
        for (_, listener) in &self.entries {
            listener(event);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_event_serialization() {
        let event = CartEvent::QuantityUpdated {
            id: ProductId::new("p1"),
            quantity: 4,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"quantityUpdated","id":"p1","quantity":4}"#);
    }

    #[test]
    fn test_added_message() {
        let event = CartEvent::Added {
            id: ProductId::new("p1"),
            name: "Minimalist Ceramic Vase".into(),
            quantity: 1,
        };
        assert_eq!(event.message(), "Added to cart: Minimalist Ceramic Vase");
    }

    #[test]
    fn test_listeners_add_remove() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut listeners = Listeners::default();

        let sink = Arc::clone(&seen);
        let first = listeners.add(Box::new(move |e| sink.lock().unwrap().push(e.clone())));
        let second = listeners.add(Box::new(|_| {}));
        assert_ne!(first, second);
        assert_eq!(listeners.len(), 2);

        listeners.emit(&CartEvent::Cleared);
        assert!(listeners.remove(first));
        assert!(!listeners.remove(first));
        listeners.emit(&CartEvent::Cleared);

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(listeners.len(), 1);
        assert_eq!(format!("{:?}", listeners), "Listeners { count: 1 }");
    }
}

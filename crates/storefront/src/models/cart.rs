//! Cart aggregate: line items plus at most one selected offer.
//!
//! [`Cart`] is the pure part of the aggregate. Every mutation is a plain
//! method with no side effects; [`crate::services::cart::CartService`] wraps
//! it with persistence and remote sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pizzeria_core::{ItemId, Price};

use super::offer::Offer;

/// One line of the cart.
///
/// `quantity` is always at least 1: a line whose quantity would drop to zero
/// is removed instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ItemId,
    pub name: String,
    /// Unit price.
    pub price: Price,
    pub quantity: u32,
    pub is_offer: bool,
}

impl CartItem {
    /// Price of the whole line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Cart contents.
///
/// Items keep insertion order and ids are unique within the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
    selected_offer: Option<Offer>,
}

impl Cart {
    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The selected offer, if any.
    #[must_use]
    pub const fn selected_offer(&self) -> Option<&Offer> {
        self.selected_offer.as_ref()
    }

    /// Whether the cart has neither items nor an offer.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.selected_offer.is_none()
    }

    /// Total number of units across all lines, saturating at `u32::MAX`.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count: u32, item| count.saturating_add(item.quantity))
    }

    /// Sum of all line totals, excluding the offer.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Line totals plus the selected offer's price when it is positive.
    ///
    /// Derived on every call, so it always reflects the current contents.
    #[must_use]
    pub fn total(&self) -> Price {
        let offer = self
            .selected_offer
            .as_ref()
            .map_or(Price::ZERO, Offer::price_contribution);
        self.subtotal() + offer
    }

    /// Add one unit of an item, appending a new line if the id is new.
    pub fn add_item(&mut self, id: ItemId, name: impl Into<String>, price: Price) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.quantity = item.quantity.saturating_add(1);
            return;
        }
        self.items.push(CartItem {
            id,
            name: name.into(),
            price,
            quantity: 1,
            is_offer: false,
        });
    }

    /// Remove one unit of an item, dropping the line at quantity 1.
    ///
    /// Returns `false` if no line has this id.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let Some(pos) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        match self.items.get_mut(pos) {
            Some(item) if item.quantity > 1 => item.quantity -= 1,
            _ => {
                self.items.remove(pos);
            }
        }
        true
    }

    /// Replace the selected offer. `None` clears it.
    pub fn set_offer(&mut self, offer: Option<Offer>) {
        self.selected_offer = offer;
    }

    /// Empty the items and clear the offer together.
    pub fn clear(&mut self) {
        self.items.clear();
        self.selected_offer = None;
    }

    /// The persistable part of the cart.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            selected_offer: self.selected_offer.clone(),
        }
    }
}

impl From<CartSnapshot> for Cart {
    /// Rebuild a cart from a snapshot, merging duplicate ids and dropping
    /// zero-quantity lines so the cart invariants hold for any input.
    fn from(snapshot: CartSnapshot) -> Self {
        let mut items: Vec<CartItem> = Vec::with_capacity(snapshot.items.len());
        for item in snapshot.items.into_iter().filter(|item| item.quantity > 0) {
            if let Some(existing) = items.iter_mut().find(|existing| existing.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                items.push(item);
            }
        }
        Self {
            items,
            selected_offer: snapshot.selected_offer,
        }
    }
}

/// Serialized cart contents, as persisted under
/// [`crate::store::keys::CART_STATE`] and sent to the cart sync backend.
///
/// Sync status is deliberately not part of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub selected_offer: Option<Offer>,
}

/// Outcome tracking for the remote cart sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// A sync is in flight.
    pub pending: bool,
    /// When the last successful sync finished.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Message of the last failed sync, cleared when a new sync starts.
    pub error: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pizzeria_core::OfferId;
    use rust_decimal::Decimal;

    use super::*;

    fn offer(id: &str, price_cents: i64) -> Offer {
        Offer {
            id: OfferId::new(id),
            title: id.to_string(),
            product_name: String::new(),
            description: String::new(),
            discounted_price: Price::from_cents(price_cents),
            available: true,
            image_url: String::new(),
            minimum_order_value: None,
        }
    }

    #[test]
    fn test_add_same_id_increments_quantity() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("margherita"), "Margherita", Price::from_cents(700));
        cart.add_item(ItemId::new("margherita"), "Margherita", Price::from_cents(700));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
        assert!(!cart.items()[0].is_offer);
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("b"), "B", Price::from_cents(100));
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(100));
        cart.add_item(ItemId::new("b"), "B", Price::from_cents(100));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_remove_decrements_then_removes() {
        let mut cart = Cart::default();
        let id = ItemId::new("diavola");
        cart.add_item(id.clone(), "Diavola", Price::from_cents(850));
        cart.add_item(id.clone(), "Diavola", Price::from_cents(850));

        assert!(cart.remove_item(&id));
        assert_eq!(cart.items()[0].quantity, 1);

        assert!(cart.remove_item(&id));
        assert!(cart.items().is_empty());
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(100));
        let before = cart.clone();

        assert!(!cart.remove_item(&ItemId::new("zzz")));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_total_without_offer() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(1000));
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(1000));
        cart.add_item(ItemId::new("b"), "B", Price::from_cents(500));

        assert_eq!(cart.total().amount(), Decimal::new(2500, 2));
        assert_eq!(cart.total().to_string(), "€ 25.00");
    }

    #[test]
    fn test_total_with_offer() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(1000));
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(1000));
        cart.add_item(ItemId::new("b"), "B", Price::from_cents(500));
        cart.set_offer(Some(offer("OFF101", 899)));

        assert_eq!(cart.total().amount(), Decimal::new(3399, 2));
        assert_eq!(cart.subtotal().amount(), Decimal::new(2500, 2));
    }

    #[test]
    fn test_zero_price_offer_adds_nothing() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(1200));
        cart.set_offer(Some(offer("OFF104", 0)));
        assert_eq!(cart.total(), Price::from_cents(1200));
    }

    #[test]
    fn test_set_offer_replaces() {
        let mut cart = Cart::default();
        cart.set_offer(Some(offer("A", 100)));
        cart.set_offer(Some(offer("B", 200)));
        assert_eq!(cart.selected_offer().unwrap().id.as_str(), "B");
        assert_eq!(cart.total(), Price::from_cents(200));

        cart.set_offer(None);
        assert!(cart.selected_offer().is_none());
    }

    #[test]
    fn test_clear_empties_items_and_offer() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(100));
        cart.set_offer(Some(offer("A", 100)));

        cart.clear();
        assert!(cart.items().is_empty());
        assert!(cart.selected_offer().is_none());
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_item_count() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(100));
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(100));
        cart.add_item(ItemId::new("b"), "B", Price::from_cents(100));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_huge_cart_saturates() {
        let line = |id: &str, cents| CartItem {
            id: ItemId::new(id),
            name: id.to_string(),
            price: Price::from_cents(cents),
            quantity: u32::MAX,
            is_offer: false,
        };
        let mut cart = Cart::from(CartSnapshot {
            items: vec![line("a", 100), line("b", 100)],
            selected_offer: None,
        });
        assert_eq!(cart.item_count(), u32::MAX);

        let max = Price::new(Decimal::MAX).unwrap();
        cart.add_item(ItemId::new("c"), "C", max);
        cart.add_item(ItemId::new("c"), "C", max);
        cart.set_offer(Some(offer("OFF101", 899)));
        assert_eq!(cart.total(), max);
        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_from_snapshot_normalizes() {
        let line = |id: &str, quantity| CartItem {
            id: ItemId::new(id),
            name: id.to_string(),
            price: Price::from_cents(100),
            quantity,
            is_offer: false,
        };
        let cart = Cart::from(CartSnapshot {
            items: vec![line("a", 1), line("b", 0), line("a", 2)],
            selected_offer: None,
        });

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_snapshot_round_trips() {
        let mut cart = Cart::default();
        cart.add_item(ItemId::new("a"), "A", Price::from_cents(100));
        cart.set_offer(Some(offer("OFF101", 899)));

        let json = serde_json::to_string(&cart.snapshot()).unwrap();
        let restored: CartSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(Cart::from(restored), cart);
    }
}

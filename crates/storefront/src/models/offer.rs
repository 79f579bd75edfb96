//! Promotional offer type.

use serde::{Deserialize, Serialize};

use pizzeria_core::{OfferId, Price};

/// A promotional bundle from the offer catalog.
///
/// At most one offer can be selected in a cart at a time. Offers are
/// read-only at runtime; see [`crate::catalog`] for the fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: OfferId,
    pub title: String,
    pub product_name: String,
    pub description: String,
    /// Bundle price. Zero for offers that only grant a perk (e.g. free delivery).
    pub discounted_price: Price,
    /// Unavailable offers are listed but cannot be selected.
    pub available: bool,
    pub image_url: String,
    /// Subtotal the rest of the cart must reach for the offer to apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_order_value: Option<Price>,
}

impl Offer {
    /// Amount this offer adds to a cart total.
    ///
    /// Only offers with a positive price contribute.
    #[must_use]
    pub fn price_contribution(&self) -> Price {
        if self.discounted_price.is_zero() {
            Price::ZERO
        } else {
            self.discounted_price
        }
    }

    /// Whether a cart subtotal reaches this offer's minimum order value.
    ///
    /// Informational only: the cart never refuses an offer on this basis.
    #[must_use]
    pub fn meets_minimum(&self, subtotal: Price) -> bool {
        self.minimum_order_value
            .is_none_or(|minimum| subtotal >= minimum)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offer(price_cents: i64, minimum_cents: Option<i64>) -> Offer {
        Offer {
            id: OfferId::new("OFF1"),
            title: "Test".into(),
            product_name: "Pizza".into(),
            description: String::new(),
            discounted_price: Price::from_cents(price_cents),
            available: true,
            image_url: String::new(),
            minimum_order_value: minimum_cents.map(Price::from_cents),
        }
    }

    #[test]
    fn test_price_contribution() {
        assert_eq!(offer(899, None).price_contribution(), Price::from_cents(899));
        assert_eq!(offer(0, None).price_contribution(), Price::ZERO);
    }

    #[test]
    fn test_meets_minimum() {
        assert!(offer(0, None).meets_minimum(Price::ZERO));
        let free_delivery = offer(0, Some(1500));
        assert!(!free_delivery.meets_minimum(Price::from_cents(1499)));
        assert!(free_delivery.meets_minimum(Price::from_cents(1500)));
    }

    #[test]
    fn test_minimum_omitted_from_json_when_absent() {
        let json = serde_json::to_value(offer(899, None)).unwrap();
        assert!(json.get("minimumOrderValue").is_none());
        assert_eq!(json["discountedPrice"], "8.99");
    }
}

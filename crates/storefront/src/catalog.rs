//! Static offer catalog and the offer picker used by the offers screen.

use pizzeria_core::{OfferId, Price};

use crate::models::Offer;

fn offer(
    id: &str,
    title: &str,
    product_name: &str,
    description: &str,
    cents: i64,
    image_url: &str,
) -> Offer {
    Offer {
        id: OfferId::new(id),
        title: title.to_string(),
        product_name: product_name.to_string(),
        description: description.to_string(),
        discounted_price: Price::from_cents(cents),
        available: true,
        image_url: image_url.to_string(),
        minimum_order_value: None,
    }
}

/// The offers currently on the menu.
#[must_use]
pub fn offers() -> Vec<Offer> {
    vec![
        offer(
            "OFF101",
            "Pizza della Settimana",
            "Margherita Speciale + Bibita",
            "Una classica Margherita con mozzarella di bufala e una bibita in lattina a scelta.",
            899,
            "https://placehold.co/400x200/4CAF50/white?text=OFFERTA+MARGHERITA",
        ),
        offer(
            "OFF102",
            "Menu Coppia",
            "2 Pizze a Scelta + 1 Birra Media",
            "Perfetto per una serata in due. Scegli due pizze qualsiasi dal menu e avrai una birra media in omaggio.",
            2450,
            "https://placehold.co/400x200/F44336/white?text=OFFERTA+COPPIA",
        ),
        offer(
            "OFF103",
            "Festa Pizza XL",
            "Pizza Gigante + Patatine Fritte",
            "Una pizza formato famiglia (XL) con quattro gusti a scelta, più una porzione abbondante di patatine fritte.",
            2999,
            "https://placehold.co/400x200/FFC107/black?text=OFFERTA+XL",
        ),
        Offer {
            available: false,
            minimum_order_value: Some(Price::from_cents(1500)),
            ..offer(
                "OFF104",
                "Dolce e Caffè",
                "Qualsiasi Pizza + Dessert + Caffè",
                "Consegna gratuita e un mini dessert incluso con l'acquisto di una pizza e un caffè.",
                0,
                "https://placehold.co/400x200/03A9F4/white?text=CONSEGNA+GRATIS",
            )
        },
    ]
}

/// Look up a catalog offer by id.
#[must_use]
pub fn find(id: &OfferId) -> Option<Offer> {
    offers().into_iter().find(|offer| &offer.id == id)
}

/// Selection state of the offers screen.
///
/// Tapping an offer selects it; tapping the selected offer again clears the
/// selection. The cart itself only ever replaces its offer, so the picked
/// offer reaches the cart through [`OfferPicker::redeem`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferPicker {
    selected: Option<OfferId>,
}

impl OfferPicker {
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Toggle `offer`. Returns `false` and changes nothing if the offer is
    /// unavailable.
    pub fn toggle(&mut self, offer: &Offer) -> bool {
        if !offer.available {
            return false;
        }
        if self.selected.as_ref() == Some(&offer.id) {
            self.selected = None;
        } else {
            self.selected = Some(offer.id.clone());
        }
        true
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&OfferId> {
        self.selected.as_ref()
    }

    /// The selected offer out of `offers`, ready for
    /// [`CartService::set_offer`](crate::services::cart::CartService::set_offer).
    #[must_use]
    pub fn redeem(&self, offers: &[Offer]) -> Option<Offer> {
        let id = self.selected.as_ref()?;
        offers.iter().find(|offer| &offer.id == id).cloned()
    }
}

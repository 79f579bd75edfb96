//! Cart and offer commands.

use pizzeria_core::{ItemId, OfferId, Price};
use pizzeria_storefront::catalog;
use pizzeria_storefront::models::Cart;
use pizzeria_storefront::state::AppState;

use super::CommandError;

#[allow(clippy::print_stdout)]
fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Cart is empty");
        return;
    }
    for item in cart.items() {
        println!(
            "{:>3} x {:<24} {:>10}  [{}]",
            item.quantity,
            item.name,
            item.line_total(),
            item.id
        );
    }
    if let Some(offer) = cart.selected_offer() {
        println!(
            "offer {:<24} {:>10}  [{}]",
            offer.title,
            offer.price_contribution(),
            offer.id
        );
        if let Some(minimum) = offer.minimum_order_value
            && !offer.meets_minimum(cart.subtotal())
        {
            println!("      (needs a subtotal of at least {minimum})");
        }
    }
    println!("total {:>35}", cart.total());
}

/// List the catalog, marking the offer in the cart.
#[allow(clippy::print_stdout)]
pub fn offers(state: &AppState) {
    let cart = state.cart().cart();
    let selected = cart.selected_offer().map(|offer| &offer.id);

    for offer in catalog::offers() {
        let marker = if selected == Some(&offer.id) { '*' } else { ' ' };
        let availability = if offer.available { "" } else { " (unavailable)" };
        println!(
            "{marker} {} {:<24} {:>10}{availability}",
            offer.id,
            offer.title,
            offer.discounted_price
        );
        println!("         {}", offer.product_name);
    }
}

pub fn show(state: &AppState) {
    print_cart(&state.cart().cart());
}

pub fn add(state: &AppState, id: String, name: String, price: Price) {
    print_cart(&state.cart().add_item(ItemId::from(id), name, price));
}

pub fn remove(state: &AppState, id: String) {
    print_cart(&state.cart().remove_item(&ItemId::from(id)));
}

/// Put a catalog offer in the cart, replacing any other.
pub fn select_offer(state: &AppState, id: String) -> Result<(), CommandError> {
    let offer = catalog::find(&OfferId::from(id.as_str())).ok_or(CommandError::UnknownOffer(id))?;
    if !offer.available {
        return Err(CommandError::OfferUnavailable(offer.id.into_inner()));
    }
    print_cart(&state.cart().set_offer(Some(offer)));
    Ok(())
}

pub fn clear_offer(state: &AppState) {
    print_cart(&state.cart().set_offer(None));
}

pub fn clear(state: &AppState) {
    print_cart(&state.cart().clear());
}

#[allow(clippy::print_stdout)]
pub async fn sync(state: &AppState) -> Result<(), CommandError> {
    let status = state.cart().sync().await;
    if let Some(error) = status.error {
        return Err(CommandError::SyncFailed(error));
    }
    if let Some(at) = status.last_synced_at {
        println!("Cart synced at {}", at.to_rfc3339());
    }
    Ok(())
}

//! Cart -> order submission

use crate::cart::Cart;
use shared::cart::CartLineItem;
use shared::order::{OrderModifier, OrderSubmission, OrderedItem};

/// Modifier group carried as `spice_level` instead of a priced modifier
///
/// Matched exactly, including case.
pub const SPICE_LEVEL_MODIFIER: &str = "Spice Level";

/// Build the place-order payload from the current cart
///
/// Pure: the cart is not modified. Clearing it is up to the caller once
/// the backend accepted the submission.
pub fn build_submission(
    cart: &Cart,
    table_id: impl Into<String>,
    restaurant_id: impl Into<String>,
    parent_restaurant_id: Option<String>,
    special_request: impl Into<String>,
) -> OrderSubmission {
    OrderSubmission {
        table_id: table_id.into(),
        restaurant_id: restaurant_id.into(),
        parent_restaurant_id,
        special_request: special_request.into(),
        ordered_items: cart.items().iter().map(ordered_item).collect(),
    }
}

fn ordered_item(item: &CartLineItem) -> OrderedItem {
    let mut spice_level = String::new();
    let mut modifiers = Vec::new();

    for group in &item.selected_modifiers {
        if group.modifier_name == SPICE_LEVEL_MODIFIER {
            if let Some(first) = group.options.first() {
                spice_level = first.option_name.clone();
            }
            continue;
        }
        modifiers.extend(
            group
                .options
                .iter()
                .map(|o| OrderModifier::new(o.option_name.clone(), o.option_price)),
        );
    }

    OrderedItem {
        name: item.name.clone(),
        quantity: item.quantity,
        unit_price: item.unit_price(),
        image: item.image.clone(),
        modifiers,
        spice_level,
    }
}

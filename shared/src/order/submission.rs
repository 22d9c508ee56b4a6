//! Order submission payload and the place-order response

use super::types::{Order, OrderModifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One cart line as the kitchen receives it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub image: String,
    /// Flattened non-spice modifiers, one entry per selected option
    pub modifiers: Vec<OrderModifier>,
    /// First option of the "Spice Level" group, or empty
    pub spice_level: String,
}

/// Payload for the place-order endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    pub table_id: String,
    pub restaurant_id: String,
    pub parent_restaurant_id: Option<String>,
    pub special_request: String,
    pub ordered_items: Vec<OrderedItem>,
}

impl OrderSubmission {
    pub fn is_empty(&self) -> bool {
        self.ordered_items.is_empty()
    }
}

/// Place-order response
///
/// The body shape varies by deployment; only the echoed order (if any) and
/// a message are picked out. A body that cannot be read as an order is not
/// an error, the HTTP status already said the submission was accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceOrderResponse {
    pub order: Option<Order>,
    pub message: Option<String>,
}

impl PlaceOrderResponse {
    pub fn from_value(body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        let order = ["order", "data"]
            .iter()
            .filter_map(|key| body.get(*key))
            .chain(std::iter::once(&body))
            .find_map(|candidate| match candidate {
                Value::Object(_) => serde_json::from_value::<Order>(candidate.clone()).ok(),
                _ => None,
            });

        Self { order, message }
    }
}

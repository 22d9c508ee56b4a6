//! Reconciled order view
//!
//! The backend is loose about field names (`dining_id` vs `id`, snake vs
//! camel case) and number encodings. Everything is normalized here so the
//! reconciler only ever sees the canonical [`Order`].

use crate::util::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ============================================================================
// Order Status
// ============================================================================

/// Order (and order item) status
///
/// `Cancelled` and `Void` are terminal. Transition legality is the
/// backend's business; the client only displays what it is told.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    /// Also sent as "processing"
    Preparing,
    Ready,
    Delivered,
    Completed,
    Cancelled,
    Void,
}

impl OrderStatus {
    /// Parse a wire status, case-insensitively
    ///
    /// Unknown values fall back to `Pending` so a new backend status never
    /// hides an order.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "processing" | "preparing" => Self::Preparing,
            "ready" => Self::Ready,
            "delivered" => Self::Delivered,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            "void" | "voided" => Self::Void,
            other => {
                tracing::warn!(status = %other, "Unknown order status, treating as pending");
                Self::Pending
            }
        }
    }

    /// Cancelled or void
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Void)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::parse).unwrap_or_default())
    }
}

// ============================================================================
// Order Types
// ============================================================================

/// Modifier line on a submitted or historical order item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderModifier {
    #[serde(default, alias = "modifier_name", alias = "name", deserialize_with = "lenient::string")]
    pub modifier_name: String,
    #[serde(
        default,
        alias = "modifier_price",
        alias = "price",
        deserialize_with = "lenient::f64_or_zero"
    )]
    pub modifier_price: f64,
}

impl OrderModifier {
    pub fn new(modifier_name: impl Into<String>, modifier_price: f64) -> Self {
        Self {
            modifier_name: modifier_name.into(),
            modifier_price,
        }
    }
}

/// Item within a historical order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[serde(default, alias = "item_name", alias = "itemName", deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::i32_or_zero")]
    pub quantity: i32,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub modifiers: Vec<OrderModifier>,
    #[serde(default, alias = "spice_level", deserialize_with = "lenient::string")]
    pub spice_level: String,
}

/// Order as shown in the table's history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "dining_id", alias = "order_id", deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, alias = "created_at", deserialize_with = "lenient::string")]
    pub created_at: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(
        default,
        alias = "total_amount",
        deserialize_with = "lenient::f64_or_zero"
    )]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub items: Vec<OrderItem>,
    #[serde(
        default,
        alias = "void_reason",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::non_blank"
    )]
    pub void_reason: Option<String>,
}

impl Order {
    /// Voided by status or by carrying a void reason
    pub fn is_void(&self) -> bool {
        self.status == OrderStatus::Void || self.void_reason.is_some()
    }

    /// Whether this order's total is still owed by the table
    pub fn counts_toward_total(&self) -> bool {
        !self.is_void() && self.status != OrderStatus::Cancelled
    }

    /// `created_at` as a timestamp, if it is RFC 3339 or epoch milliseconds
    pub fn placed_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| raw.parse::<i64>().ok().and_then(DateTime::<Utc>::from_timestamp_millis))
    }
}

// ============================================================================
// History Responses
// ============================================================================

/// Normalize an order-history response body into canonical orders.
///
/// Accepts a bare array, or an object wrapping the array under `orders` or
/// `data` (one level of nesting, e.g. `{"data": {"orders": [...]}}`).
/// Any other shape is an error so the caller keeps its previous list.
/// Entries that cannot be read as an order are dropped with a warning.
pub fn parse_order_history(body: Value) -> Result<Vec<Order>, serde_json::Error> {
    match body {
        Value::Array(entries) => Ok(orders_from_entries(entries)),
        Value::Object(mut map) => {
            let inner = map
                .remove("orders")
                .or_else(|| map.remove("data"))
                .ok_or_else(|| shape_error("object without `orders` or `data`"))?;
            match inner {
                Value::Array(entries) => Ok(orders_from_entries(entries)),
                Value::Object(mut nested) => match nested.remove("orders") {
                    Some(Value::Array(entries)) => Ok(orders_from_entries(entries)),
                    _ => Err(shape_error("nested object without an `orders` array")),
                },
                _ => Err(shape_error("`orders`/`data` is not an array")),
            }
        }
        other => Err(shape_error(&format!("unexpected order history body: {other}"))),
    }
}

fn orders_from_entries(entries: Vec<Value>) -> Vec<Order> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Order>(entry) {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(index, error = %e, "Dropping unreadable order history entry");
                None
            }
        })
        .collect()
}

fn shape_error(msg: &str) -> serde_json::Error {
    <serde_json::Error as serde::de::Error>::custom(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_parsing() {
        assert_eq!(OrderStatus::parse("Processing"), OrderStatus::Preparing);
        assert_eq!(OrderStatus::parse("PREPARING"), OrderStatus::Preparing);
        assert_eq!(OrderStatus::parse("canceled"), OrderStatus::Cancelled);
        assert_eq!(OrderStatus::parse(" void "), OrderStatus::Void);
        assert_eq!(OrderStatus::parse("teleported"), OrderStatus::Pending);
        assert!(OrderStatus::Void.is_terminal());
        assert!(!OrderStatus::Ready.is_terminal());
    }

    #[test]
    fn test_order_normalizes_snake_case_wire_shape() {
        let order: Order = serde_json::from_value(json!({
            "dining_id": 981,
            "created_at": "2024-05-01T12:00:00Z",
            "status": "processing",
            "total_amount": "27.50",
            "items": [{
                "item_name": "Pad Thai",
                "quantity": "2",
                "status": null,
                "price": 12.75,
                "image": null,
                "modifiers": [{"modifier_name": "Egg", "modifier_price": "1"}],
                "spice_level": "Medium"
            }],
            "void_reason": ""
        }))
        .unwrap();

        assert_eq!(order.id, "981");
        assert_eq!(
            order.placed_at().map(|t| t.timestamp()),
            Some(1714564800)
        );
        assert_eq!(order.status, OrderStatus::Preparing);
        assert_eq!(order.total_amount, 27.5);
        assert_eq!(order.void_reason, None);
        assert_eq!(order.items[0].name, "Pad Thai");
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].status, OrderStatus::Pending);
        assert_eq!(order.items[0].modifiers[0], OrderModifier::new("Egg", 1.0));
        assert_eq!(order.items[0].spice_level, "Medium");
    }

    #[test]
    fn test_order_normalizes_camel_case_wire_shape() {
        let order: Order = serde_json::from_value(json!({
            "id": "A-7",
            "createdAt": 1714560000000i64,
            "status": "void",
            "totalAmount": 15,
            "voidReason": "Guest left"
        }))
        .unwrap();

        assert_eq!(order.id, "A-7");
        assert_eq!(order.created_at, "1714560000000");
        assert_eq!(
            order.placed_at().map(|t| t.to_rfc3339()),
            Some("2024-05-01T10:40:00+00:00".to_string())
        );
        assert!(order.is_void());
        assert!(!order.counts_toward_total());
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_void_reason_alone_marks_void() {
        let order: Order = serde_json::from_value(json!({
            "id": 1, "status": "delivered", "void_reason": "Duplicate"
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.is_void());
    }

    #[test]
    fn test_parse_order_history_shapes() {
        let bare = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(parse_order_history(bare).unwrap().len(), 2);

        let wrapped = json!({"orders": [{"id": 1}]});
        assert_eq!(parse_order_history(wrapped).unwrap().len(), 1);

        let nested = json!({"success": true, "data": {"orders": [{"id": 1}, {"id": 3}]}});
        assert_eq!(parse_order_history(nested).unwrap().len(), 2);

        let empty = json!({"data": []});
        assert!(parse_order_history(empty).unwrap().is_empty());

        assert!(parse_order_history(json!(null)).is_err());
        assert!(parse_order_history(json!({"message": "oops"})).is_err());
        assert!(parse_order_history(json!({"data": "oops"})).is_err());
    }

    #[test]
    fn test_unreadable_entries_do_not_sink_the_history() {
        let body = json!([
            {"id": 1, "status": "ready"},
            {"id": 2, "items": [{"name": "Soup", "modifiers": [{"option_name": "Extra"}]}]},
            {"id": 3, "items": "broken"},
            {"status": "pending"},
            "garbage"
        ]);
        let orders = parse_order_history(body).unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].status, OrderStatus::Ready);
        assert_eq!(orders[1].id, "2");
        assert_eq!(orders[1].items[0].modifiers[0], OrderModifier::new("", 0.0));

        let wrapped = json!({"data": [{"id": 5}, 42]});
        assert_eq!(parse_order_history(wrapped).unwrap().len(), 1);
    }
}

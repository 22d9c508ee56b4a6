//! Live dining feed messages
//!
//! The socket pushes loosely shaped JSON frames:
//! `{type: "dining", new_orders?: [...], updated_order?: [...], message?}`
//! or, after a payment, a bare `"Payment Status updated"` string. Frames are
//! normalized into a [`FeedSignal`] here; nothing downstream looks at raw
//! JSON.

use crate::order::OrderStatus;
use crate::util::lenient;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Only frames of this type are processed
pub const DINING_MESSAGE_TYPE: &str = "dining";

/// Sentinel sent once a table's bill has been settled
pub const PAYMENT_STATUS_UPDATED: &str = "Payment Status updated";

/// Raw dining frame as received from the socket
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiningMessage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub new_orders: Option<Value>,
    #[serde(default)]
    pub updated_order: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl DiningMessage {
    pub fn is_dining(&self) -> bool {
        self.kind.as_deref() == Some(DINING_MESSAGE_TYPE)
    }

    fn is_payment_sentinel(&self) -> bool {
        self.message.as_ref().and_then(Value::as_str) == Some(PAYMENT_STATUS_UPDATED)
    }
}

/// Status delta carried by an `updated_order` batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusDelta {
    #[serde(alias = "id", deserialize_with = "lenient::string")]
    pub dining_id: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, alias = "voidReason", deserialize_with = "lenient::non_blank")]
    pub void_reason: Option<String>,
}

/// Normalized meaning of one socket frame
#[derive(Debug, Clone, PartialEq)]
pub enum FeedSignal {
    /// New orders exist for the table
    NewOrders,
    /// Status deltas for existing orders (never empty)
    OrderUpdates(Vec<OrderStatusDelta>),
    /// `updated_order` was empty or malformed; says nothing about the list
    EmptyUpdate,
    /// The bill has been paid
    PaymentStatusUpdated,
    /// Not a dining frame, or nothing actionable in it
    Ignored,
}

impl FeedSignal {
    /// Classify a text frame
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed == PAYMENT_STATUS_UPDATED {
            return Self::PaymentStatusUpdated;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => Self::from_value(value),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping non-JSON feed frame");
                Self::Ignored
            }
        }
    }

    /// Classify an already parsed frame
    pub fn from_value(value: Value) -> Self {
        if value.as_str() == Some(PAYMENT_STATUS_UPDATED) {
            return Self::PaymentStatusUpdated;
        }
        if !value.is_object() {
            return Self::Ignored;
        }

        let message = match serde_json::from_value::<DiningMessage>(value) {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping unreadable feed frame");
                return Self::Ignored;
            }
        };

        if !message.is_dining() {
            return Self::Ignored;
        }
        if message.is_payment_sentinel() {
            return Self::PaymentStatusUpdated;
        }

        if message.new_orders.as_ref().is_some_and(|v| !v.is_null()) {
            return Self::NewOrders;
        }

        match message.updated_order {
            Some(Value::Array(entries)) => {
                let deltas: Vec<OrderStatusDelta> = entries
                    .into_iter()
                    .filter_map(|entry| serde_json::from_value(entry).ok())
                    .collect();
                if deltas.is_empty() {
                    Self::EmptyUpdate
                } else {
                    Self::OrderUpdates(deltas)
                }
            }
            Some(Value::Null) | None => Self::Ignored,
            Some(_) => Self::EmptyUpdate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_orders_frame() {
        let signal = FeedSignal::from_text(r#"{"type":"dining","new_orders":[{"id":1}]}"#);
        assert_eq!(signal, FeedSignal::NewOrders);
    }

    #[test]
    fn test_updated_order_frame() {
        let signal = FeedSignal::from_value(json!({
            "type": "dining",
            "updated_order": [
                {"dining_id": 7, "status": "void", "void_reason": "Wrong table"},
                {"dining_id": "8", "status": "ready"}
            ]
        }));
        match signal {
            FeedSignal::OrderUpdates(deltas) => {
                assert_eq!(deltas.len(), 2);
                assert_eq!(deltas[0].dining_id, "7");
                assert_eq!(deltas[0].status, OrderStatus::Void);
                assert_eq!(deltas[0].void_reason.as_deref(), Some("Wrong table"));
                assert_eq!(deltas[1].status, OrderStatus::Ready);
            }
            other => panic!("unexpected signal {other:?}"),
        }
    }

    #[test]
    fn test_empty_or_malformed_updates() {
        let empty = FeedSignal::from_value(json!({"type": "dining", "updated_order": []}));
        assert_eq!(empty, FeedSignal::EmptyUpdate);

        let not_array = FeedSignal::from_value(json!({"type": "dining", "updated_order": "x"}));
        assert_eq!(not_array, FeedSignal::EmptyUpdate);

        let garbage_entries =
            FeedSignal::from_value(json!({"type": "dining", "updated_order": [1, "two"]}));
        assert_eq!(garbage_entries, FeedSignal::EmptyUpdate);
    }

    #[test]
    fn test_payment_sentinel_forms() {
        assert_eq!(
            FeedSignal::from_text("Payment Status updated"),
            FeedSignal::PaymentStatusUpdated
        );
        assert_eq!(
            FeedSignal::from_text(r#""Payment Status updated""#),
            FeedSignal::PaymentStatusUpdated
        );
        assert_eq!(
            FeedSignal::from_value(json!({"type": "dining", "message": PAYMENT_STATUS_UPDATED})),
            FeedSignal::PaymentStatusUpdated
        );
        // case-sensitive
        assert_eq!(
            FeedSignal::from_text("payment status updated"),
            FeedSignal::Ignored
        );
    }

    #[test]
    fn test_non_dining_frames_ignored() {
        assert_eq!(
            FeedSignal::from_value(json!({"type": "takeout", "new_orders": [1]})),
            FeedSignal::Ignored
        );
        assert_eq!(FeedSignal::from_value(json!({"new_orders": [1]})), FeedSignal::Ignored);
        assert_eq!(
            FeedSignal::from_value(json!({"type": "takeout", "message": PAYMENT_STATUS_UPDATED})),
            FeedSignal::Ignored
        );
        assert_eq!(
            FeedSignal::from_text(r#"{"message":"Payment Status updated"}"#),
            FeedSignal::Ignored
        );
        assert_eq!(FeedSignal::from_value(json!([1, 2])), FeedSignal::Ignored);
        assert_eq!(FeedSignal::from_text("not json"), FeedSignal::Ignored);
        assert_eq!(FeedSignal::from_value(json!({"type": "dining"})), FeedSignal::Ignored);
    }
}

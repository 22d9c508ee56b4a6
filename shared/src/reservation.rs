//! Table reservation request

use crate::util::lenient;
use serde::{Deserialize, Serialize};

/// Body of the table-reservation endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationRequest {
    pub restaurant_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub party_size: u32,
    /// Calendar date as entered (e.g. "2024-06-01"); passed through untouched
    pub date: String,
    /// Time slot as entered (e.g. "19:30")
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_request: Option<String>,
}

impl ReservationRequest {
    pub fn new(
        restaurant_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        party_size: u32,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            party_size,
            date: String::new(),
            time: String::new(),
            special_request: None,
        }
    }

    pub fn at(mut self, date: impl Into<String>, time: impl Into<String>) -> Self {
        self.date = date.into();
        self.time = time.into();
        self
    }

    pub fn with_special_request(mut self, request: impl Into<String>) -> Self {
        self.special_request = Some(request.into());
        self
    }
}

/// Reservation endpoint response
///
/// Both fields are optional; a 2xx with an unreadable body still counts
/// as accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReservationConfirmation {
    #[serde(
        default,
        alias = "reservation_id",
        alias = "reservationId",
        deserialize_with = "lenient::non_blank"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_blank")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_shape() {
        let body = serde_json::to_value(
            ReservationRequest::new("42", "Ana", "ana@example.com", "600", 2).at("2024-06-01", "19:30"),
        )
        .unwrap();
        assert_eq!(body["party_size"], 2);
        assert_eq!(body["time"], "19:30");
        assert!(body.get("special_request").is_none());
    }

    #[test]
    fn test_confirmation_is_lenient() {
        let c: ReservationConfirmation =
            serde_json::from_value(json!({"reservationId": 77, "message": "Booked"})).unwrap();
        assert_eq!(c.id.as_deref(), Some("77"));
        assert_eq!(c.message.as_deref(), Some("Booked"));

        let empty: ReservationConfirmation = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, ReservationConfirmation::default());
    }
}

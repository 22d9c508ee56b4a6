//! Reservation input validation
//!
//! Checked before anything is sent so the guest sees the problem inline.
//! The backend validates again; these limits only catch obvious mistakes.

use crate::error::{ClientError, ClientResult};
use shared::reservation::ReservationRequest;

// ── Text length limits ──────────────────────────────────────────────

/// Guest names
pub const MAX_NAME_LEN: usize = 200;

/// Phone numbers, dates, time slots
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Special requests
pub const MAX_NOTE_LEN: usize = 500;

/// Accepted party sizes
pub const PARTY_SIZE_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

// ── Helpers ─────────────────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ClientResult<()> {
    if value.trim().is_empty() {
        return Err(ClientError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(ClientError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> ClientResult<()> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(ClientError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Loose email check: something on both sides of a single `@`
pub fn validate_email(value: &str) -> ClientResult<()> {
    validate_required_text(value, "email", MAX_EMAIL_LEN)?;
    match value.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ClientError::Validation(format!("email is not valid: {value}"))),
    }
}

pub fn validate_reservation(request: &ReservationRequest) -> ClientResult<()> {
    validate_required_text(&request.restaurant_id, "restaurant_id", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&request.name, "name", MAX_NAME_LEN)?;
    validate_email(&request.email)?;
    validate_required_text(&request.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&request.date, "date", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&request.time, "time", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&request.special_request, "special_request", MAX_NOTE_LEN)?;

    if !PARTY_SIZE_RANGE.contains(&request.party_size) {
        return Err(ClientError::Validation(format!(
            "party_size must be between {} and {}, got {}",
            PARTY_SIZE_RANGE.start(),
            PARTY_SIZE_RANGE.end(),
            request.party_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReservationRequest {
        ReservationRequest::new("42", "Ana", "ana@example.com", "+34 600 000 000", 4)
            .at("2024-06-01", "19:30")
    }

    fn message(result: ClientResult<()>) -> String {
        match result {
            Err(ClientError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_reservation() {
        assert!(validate_reservation(&request()).is_ok());
        assert!(validate_reservation(&request().with_special_request("Window seat")).is_ok());
    }

    #[test]
    fn test_required_fields() {
        let mut blank_name = request();
        blank_name.name = "  ".to_string();
        assert!(message(validate_reservation(&blank_name)).contains("name"));

        let no_slot = ReservationRequest::new("42", "Ana", "ana@example.com", "600", 2);
        assert!(message(validate_reservation(&no_slot)).contains("date"));
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("a@b").is_ok());
        assert!(validate_email("ana.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_party_size_bounds() {
        for (size, ok) in [(0, false), (1, true), (50, true), (51, false)] {
            let mut r = request();
            r.party_size = size;
            assert_eq!(validate_reservation(&r).is_ok(), ok, "party size {size}");
        }
    }

    #[test]
    fn test_length_limits() {
        let long = request().with_special_request("x".repeat(MAX_NOTE_LEN + 1));
        assert!(message(validate_reservation(&long)).contains("too long"));
    }
}

//! Field-level validation rules shared by the request payloads.

use crate::error::AppError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));
static PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9+()\- ]*$").expect("phone pattern"));

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_EMAIL_LEN: usize = 254;
pub const MAX_PHONE_LEN: usize = 40;
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Implemented by every request payload; runs before anything reaches the store.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub fn non_blank(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} must not be blank", field)));
    }
    max_len(field, value, max)
}

pub fn max_len(field: &str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!("{} must be at most {} characters", field, max)));
    }
    Ok(())
}

pub fn email(field: &str, value: &str) -> Result<(), AppError> {
    max_len(field, value, MAX_EMAIL_LEN)?;
    if !EMAIL.is_match(value.trim()) {
        return Err(AppError::Validation(format!("{} must be a valid email", field)));
    }
    Ok(())
}

pub fn phone(field: &str, value: &str) -> Result<(), AppError> {
    max_len(field, value, MAX_PHONE_LEN)?;
    if !PHONE.is_match(value) {
        return Err(AppError::Validation(format!(
            "{} may only contain digits, spaces and + - ( )",
            field
        )));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date.
pub fn date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{} must be a date in YYYY-MM-DD format", field)))
}

pub fn date_order(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation("fecha_fin must not be before fecha_inicio".into()));
    }
    Ok(())
}

pub fn positive_id(field: &str, id: i64) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::Validation(format!("{} must be a positive integer", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_long_strings_are_rejected() {
        assert!(non_blank("empresa", "Acme", MAX_NAME_LEN).is_ok());
        assert!(non_blank("empresa", "   ", MAX_NAME_LEN).is_err());
        assert!(non_blank("empresa", &"x".repeat(MAX_NAME_LEN + 1), MAX_NAME_LEN).is_err());
        // counted in characters, not bytes
        assert!(max_len("empresa", &"ñ".repeat(MAX_NAME_LEN), MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn email_format() {
        assert!(email("email", "a@x.com").is_ok());
        for bad in ["", "ana", "a@x", "a @x.com", "@x.com"] {
            assert!(email("email", bad).is_err(), "{}", bad);
        }
    }

    #[test]
    fn phone_format() {
        assert!(phone("telefono", "+34 (91) 555-1234").is_ok());
        assert!(phone("telefono", "").is_ok());
        assert!(phone("telefono", "555-CALL").is_err());
    }

    #[test]
    fn dates_and_order() {
        let start = date("fecha_inicio", "2024-03-01").unwrap();
        let end = date("fecha_fin", "2024-02-01").unwrap();
        assert!(date_order(start, end).is_err());
        assert!(date_order(start, start).is_ok());
        assert!(date("fecha_inicio", "01/03/2024").is_err());
    }
}

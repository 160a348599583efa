//! Conversion between the public `MM-YYYY` billing-month text and the
//! canonical stored calendar date.
//!
//! Subscriptions are billed monthly, so the public contract only exposes month
//! granularity. Storage keeps a full date column (the first day of the month)
//! so rows can be ordered and range-compared directly. A full `YYYY-MM-DD`
//! date is accepted as a fallback and stored unchanged.

use chrono::{Datelike, NaiveDate};

use crate::errors::{DateFormatError, Error, Result, ValidationError};

const BILLING_MONTH_LEN: usize = 7;
const FULL_DATE_FORMAT: &str = "%Y-%m-%d";

/// Converts external date text into its stored form.
///
/// Empty text means "no date" and yields `Ok(None)`.
pub fn to_storage_form(text: &str) -> std::result::Result<Option<NaiveDate>, DateFormatError> {
    if text.is_empty() {
        return Ok(None);
    }

    if let Some((month, year)) = split_billing_month(text) {
        if !(1..=12).contains(&month) {
            return Err(DateFormatError::InvalidMonth(text[..2].to_string()));
        }
        return NaiveDate::from_ymd_opt(year, month, 1)
            .map(Some)
            .ok_or_else(|| DateFormatError::InvalidDate(text.to_string()));
    }

    if looks_like_full_date(text) {
        return NaiveDate::parse_from_str(text, FULL_DATE_FORMAT)
            .map(Some)
            .map_err(|_| DateFormatError::InvalidDate(text.to_string()));
    }

    Err(DateFormatError::UnrecognizedFormat(text.to_string()))
}

/// Renders a stored date as `MM-YYYY`, dropping the day. `None` renders as "".
pub fn to_display_form(date: Option<NaiveDate>) -> String {
    date.map(format_billing_month).unwrap_or_default()
}

pub fn format_billing_month(date: NaiveDate) -> String {
    format!("{:02}-{:04}", date.month(), date.year())
}

/// Normalizes a date for the named field, attributing failures to that field.
pub fn normalize_field(field: &'static str, text: &str) -> Result<Option<NaiveDate>> {
    to_storage_form(text)
        .map_err(|source| Error::Validation(ValidationError::InvalidFormat { field, source }))
}

/// Like [`normalize_field`] for fields that must carry a date.
pub fn normalize_required_field(field: &'static str, text: &str) -> Result<NaiveDate> {
    normalize_field(field, text)?
        .ok_or_else(|| Error::Validation(ValidationError::MissingField(field.to_string())))
}

/// `MM-YYYY` with ASCII digits only.
fn split_billing_month(text: &str) -> Option<(u32, i32)> {
    let bytes = text.as_bytes();
    if bytes.len() != BILLING_MONTH_LEN || bytes[2] != b'-' {
        return None;
    }
    let (month, year) = (&text[..2], &text[3..]);
    if !all_digits(month) || !all_digits(year) {
        return None;
    }
    Some((month.parse().ok()?, year.parse().ok()?))
}

fn looks_like_full_date(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-'
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

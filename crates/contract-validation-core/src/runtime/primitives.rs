// crates/contract-validation-core/src/runtime/primitives.rs
// ============================================================================
// Module: Primitive Coercion
// Description: Coercion of JSON values into declared primitive types.
// Purpose: Accept native values and their textual forms for scalar fields.
// Dependencies: bigdecimal, serde_json, time, uuid
// ============================================================================

//! ## Overview
//! Primitive coercion mirrors form-data scalar inference: numeric fields
//! accept integer strings, boolean fields accept `"true"`/`"false"`, and
//! string fields accept numbers and booleans rendered as text. Values already
//! of the correct native kind pass through unchanged. Date and uuid fields
//! must match their textual formats and are kept as supplied.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;
use serde_json::Value;
use time::Date;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::core::FieldErrorKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Expected-format description for ISO 8601 dates.
const DATE_FORMAT: &str = "ISO 8601 date (YYYY-MM-DD)";
/// Expected-format description for ISO 8601 date-times.
const DATE_TIME_FORMAT: &str = "ISO 8601 date-time";
/// Expected-format description for uuids.
const UUID_FORMAT: &str = "uuid";
/// Length of a hyphenated uuid.
const HYPHENATED_UUID_LEN: usize = 36;

// ============================================================================
// SECTION: Primitive Type
// ============================================================================

/// Primitive types understood by the contract vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// UTF-8 string.
    String,
    /// Boolean.
    Boolean,
    /// 32-bit signed integer.
    Integer,
    /// 64-bit signed integer.
    Long,
    /// Arbitrary decimal number (`decimal`, `number`, `double`, `float`).
    Decimal,
    /// ISO 8601 calendar date.
    DateIso8601,
    /// ISO 8601 date-time with offset.
    DateTimeIso8601,
    /// Hyphenated uuid.
    Uuid,
    /// Absence of a meaningful value.
    Unit,
    /// Any JSON object.
    Object,
    /// Any JSON value.
    Json,
}

impl Primitive {
    /// Parses a primitive type name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "long" => Some(Self::Long),
            "decimal" | "number" | "double" | "float" => Some(Self::Decimal),
            "date-iso8601" => Some(Self::DateIso8601),
            "date-time-iso8601" => Some(Self::DateTimeIso8601),
            "uuid" => Some(Self::Uuid),
            "unit" => Some(Self::Unit),
            "object" => Some(Self::Object),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Returns the canonical primitive name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Decimal => "decimal",
            Self::DateIso8601 => "date-iso8601",
            Self::DateTimeIso8601 => "date-time-iso8601",
            Self::Uuid => "uuid",
            Self::Unit => "unit",
            Self::Object => "object",
            Self::Json => "json",
        }
    }

    /// Coerces a JSON value into this primitive.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrorKind`] naming the expected type or format.
    pub fn coerce(self, value: &Value) -> Result<Value, FieldErrorKind> {
        match self {
            Self::String => coerce_string(value),
            Self::Boolean => coerce_boolean(value),
            Self::Integer => coerce_integer(value, i64::from(i32::MIN), i64::from(i32::MAX))
                .ok_or_else(|| FieldErrorKind::invalid_type("an integer")),
            Self::Long => coerce_integer(value, i64::MIN, i64::MAX)
                .ok_or_else(|| FieldErrorKind::invalid_type("a long")),
            Self::Decimal => coerce_decimal(value),
            Self::DateIso8601 => coerce_text(value, DATE_FORMAT, |text| parse_iso_date(text).is_some()),
            Self::DateTimeIso8601 => coerce_text(value, DATE_TIME_FORMAT, is_iso_date_time),
            Self::Uuid => coerce_text(value, UUID_FORMAT, is_hyphenated_uuid),
            Self::Unit | Self::Json => Ok(value.clone()),
            Self::Object => match value {
                Value::Object(_) => Ok(value.clone()),
                _ => Err(FieldErrorKind::invalid_type("an object")),
            },
        }
    }
}

// ============================================================================
// SECTION: Coercion Helpers
// ============================================================================

/// Coerces strings, numbers, and booleans into a JSON string.
fn coerce_string(value: &Value) -> Result<Value, FieldErrorKind> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(number) => Ok(Value::String(number.to_string())),
        Value::Bool(flag) => Ok(Value::String(flag.to_string())),
        _ => Err(FieldErrorKind::invalid_type("a string")),
    }
}

/// Coerces booleans and their textual forms.
fn coerce_boolean(value: &Value) -> Result<Value, FieldErrorKind> {
    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::String(text) if text == "true" => Ok(Value::Bool(true)),
        Value::String(text) if text == "false" => Ok(Value::Bool(false)),
        _ => Err(FieldErrorKind::invalid_type("a boolean")),
    }
}

/// Coerces integral numbers and integer strings within an inclusive range.
fn coerce_integer(value: &Value, min: i64, max: i64) -> Option<Value> {
    let parsed = match value {
        Value::Number(number) => number.as_i64()?,
        Value::String(text) if is_integer_text(text) => text.parse::<i64>().ok()?,
        _ => return None,
    };
    (min ..= max).contains(&parsed).then(|| Value::Number(parsed.into()))
}

/// Coerces numbers and decimal strings into a JSON number.
fn coerce_decimal(value: &Value) -> Result<Value, FieldErrorKind> {
    let invalid = || FieldErrorKind::invalid_type("a decimal");
    match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            let decimal = BigDecimal::from_str(trimmed).map_err(|_| invalid())?;
            Number::from_str(trimmed)
                .or_else(|_| Number::from_str(&decimal.to_string()))
                .map(Value::Number)
                .map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}

/// Accepts strings satisfying a format predicate and keeps them unchanged.
fn coerce_text(
    value: &Value,
    expected: &str,
    accepts: impl Fn(&str) -> bool,
) -> Result<Value, FieldErrorKind> {
    match value {
        Value::String(text) if accepts(text) => Ok(value.clone()),
        _ => Err(FieldErrorKind::invalid_format(expected)),
    }
}

/// Returns true for `-?[0-9]+`.
pub(crate) fn is_integer_text(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit())
}

/// Parses an ISO 8601 date-only value (YYYY-MM-DD).
fn parse_iso_date(value: &str) -> Option<Date> {
    let mut parts = value.split('-');
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if parts.next().is_some() || year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    let month: u8 = month.parse().ok()?;
    let day: u8 = day.parse().ok()?;
    let month = time::Month::try_from(month).ok()?;
    Date::from_calendar_date(year, month, day).ok()
}

/// Returns true for RFC 3339 date-times or plain ISO 8601 dates.
fn is_iso_date_time(value: &str) -> bool {
    OffsetDateTime::parse(value, &Rfc3339).is_ok() || parse_iso_date(value).is_some()
}

/// Returns true for hyphenated uuids.
fn is_hyphenated_uuid(value: &str) -> bool {
    value.len() == HYPHENATED_UUID_LEN && Uuid::try_parse(value).is_ok()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions are permitted.")]

    use serde_json::json;

    use super::Primitive;
    use crate::core::FieldErrorKind;

    #[test]
    fn integer_strings_coerce_for_numeric_fields() {
        assert_eq!(Primitive::Integer.coerce(&json!("42")).unwrap(), json!(42));
        assert_eq!(Primitive::Long.coerce(&json!("-9000000000")).unwrap(), json!(-9_000_000_000_i64));
        assert_eq!(Primitive::Decimal.coerce(&json!("1.5")).unwrap(), json!(1.5));
        assert!(Primitive::Integer.coerce(&json!("9000000000")).is_err());
        assert!(Primitive::Integer.coerce(&json!(1.5)).is_err());
    }

    #[test]
    fn decimal_strings_keep_their_exact_digits() {
        let precise = Primitive::Decimal.coerce(&json!("3.141592653589793238462643383279")).unwrap();
        assert_eq!(precise.to_string(), "3.141592653589793238462643383279");
        let huge = Primitive::Decimal.coerce(&json!("1e400")).unwrap();
        assert!(huge.is_number());
        assert_eq!(huge.to_string(), "1e400");
        assert_eq!(Primitive::Decimal.coerce(&json!(" 2.50 ")).unwrap().to_string(), "2.50");
        assert!(Primitive::Decimal.coerce(&json!("1.2.3")).is_err());
    }

    #[test]
    fn boolean_strings_coerce() {
        assert_eq!(Primitive::Boolean.coerce(&json!("true")).unwrap(), json!(true));
        assert_eq!(Primitive::Boolean.coerce(&json!(false)).unwrap(), json!(false));
        assert!(Primitive::Boolean.coerce(&json!("yes")).is_err());
    }

    #[test]
    fn scalars_coerce_to_strings() {
        assert_eq!(Primitive::String.coerce(&json!(42)).unwrap(), json!("42"));
        assert_eq!(Primitive::String.coerce(&json!(true)).unwrap(), json!("true"));
        assert!(Primitive::String.coerce(&json!({})).is_err());
    }

    #[test]
    fn formats_are_checked() {
        assert!(Primitive::DateIso8601.coerce(&json!("2024-02-29")).is_ok());
        assert_eq!(
            Primitive::DateIso8601.coerce(&json!("2023-02-29")).unwrap_err(),
            FieldErrorKind::invalid_format("ISO 8601 date (YYYY-MM-DD)")
        );
        assert!(Primitive::DateTimeIso8601.coerce(&json!("2024-01-01T10:00:00Z")).is_ok());
        assert!(Primitive::DateTimeIso8601.coerce(&json!("yesterday")).is_err());
        assert!(Primitive::Uuid.coerce(&json!("5ecf6502-e532-4738-aad5-7ac9701251dd")).is_ok());
        assert!(Primitive::Uuid.coerce(&json!("5ecf6502e5324738aad57ac9701251dd")).is_err());
    }

    #[test]
    fn aliases_map_to_decimal() {
        assert_eq!(Primitive::parse("double"), Some(Primitive::Decimal));
        assert_eq!(Primitive::parse("number"), Some(Primitive::Decimal));
        assert_eq!(Primitive::parse("user"), None);
    }
}

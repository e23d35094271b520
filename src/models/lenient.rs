//! Forgiving numeric deserialization.
//!
//! Payroll inputs are typed in by hand and stored by several backends, so a
//! numeric field may arrive as a number, a numeric string, `null`, or
//! garbage. These helpers turn anything that is not a usable number into
//! zero instead of rejecting the whole record. Missing fields are handled
//! separately by `#[serde(default)]` on the containing struct.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Deserializes a [`Decimal`], treating any unusable value as zero.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

/// Deserializes a shift count, treating any unusable value as zero.
///
/// Negative numbers become zero and fractional numbers are truncated.
pub fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

/// Parses a decimal from free-form text, returning zero when it is not a number.
pub fn parse_decimal(text: &str) -> Decimal {
    let text = text.trim();
    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(text))
        .unwrap_or(Decimal::ZERO)
}

/// Parses a shift count from free-form text, returning zero when it is not a number.
pub fn parse_count(text: &str) -> u32 {
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(value) => clamp_count(value),
        Err(_) => text.parse::<f64>().map(count_from_f64).unwrap_or(0),
    }
}

/// Deserializes a record id, treating a missing or unusable value as the nil UUID.
pub fn uuid_or_nil<'de, D>(deserializer: D) -> Result<Uuid, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_or_none(deserializer)?
        .as_deref()
        .map(parse_uuid)
        .unwrap_or_default())
}

/// Deserializes a calendar date, treating any unusable value as 1970-01-01.
pub fn date_or_epoch<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_or_none(deserializer)?
        .as_deref()
        .map(parse_date)
        .unwrap_or_default())
}

/// Deserializes an RFC 3339 timestamp, treating any unusable value as the Unix epoch.
pub fn timestamp_or_epoch<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_or_none(deserializer)?
        .as_deref()
        .map(parse_timestamp)
        .unwrap_or_default())
}

/// Parses a UUID, returning the nil UUID when the text is not one.
pub fn parse_uuid(text: &str) -> Uuid {
    Uuid::parse_str(text.trim()).unwrap_or_default()
}

/// Parses a `YYYY-MM-DD` date, also accepting a full timestamp.
///
/// Returns 1970-01-01 when the text is neither.
pub fn parse_date(text: &str) -> NaiveDate {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .unwrap_or_default()
}

/// Parses an RFC 3339 timestamp, returning the Unix epoch when the text is not one.
pub fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

fn clamp_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

fn count_from_f64(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        // `as` saturates at u32::MAX
        value.trunc() as u32
    } else {
        0
    }
}

struct DecimalVisitor;

impl<'de> Visitor<'de> for DecimalVisitor {
    type Value = Decimal;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a number or numeric string")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Decimal, E> {
        Ok(Decimal::from(value))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Decimal, E> {
        // shortest round-trip text keeps 0.07 as 0.07 rather than its binary expansion
        Ok(value
            .to_string()
            .parse::<Decimal>()
            .ok()
            .or_else(|| Decimal::from_f64(value))
            .unwrap_or(Decimal::ZERO))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Decimal, E> {
        Ok(parse_decimal(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Decimal, E> {
        Ok(Decimal::ZERO)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Decimal, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Decimal, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Decimal::ZERO)
    }
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = u32;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a shift count")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<u32, E> {
        Ok(0)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<u32, E> {
        Ok(clamp_count(value))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<u32, E> {
        Ok(u32::try_from(value).unwrap_or(u32::MAX))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<u32, E> {
        Ok(count_from_f64(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<u32, E> {
        Ok(parse_count(value))
    }

    fn visit_none<E: de::Error>(self) -> Result<u32, E> {
        Ok(0)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<u32, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_unit<E: de::Error>(self) -> Result<u32, E> {
        Ok(0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<u32, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(0)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<u32, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(0)
    }
}

//! Wire-format helpers shared by the trip and itinerary models.
//!
//! Calendar dates go out as midnight-UTC timestamps and come in either as
//! `YYYY-MM-DD` or as a full timestamp. Numeric inputs are read the way a
//! browser form submits them: numbers, numeric strings or nothing at all.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serializer};
use serde_json::Value;

const WIRE_DATE_FORMAT: &str = "%Y-%m-%dT00:00:00.000Z";

pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, String> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|ts| ts.date())
        .ok_or_else(|| format!("Cast to date failed for value \"{raw}\""))
}

/// `parseFloat`-style reading: the longest prefix that spells a decimal
/// number wins. No such prefix, or one that overflows, reads as 0.
pub fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim_start();
    let bytes = trimmed.as_bytes();
    let digits_from = |mut idx: usize| {
        while bytes.get(idx).is_some_and(u8::is_ascii_digit) {
            idx += 1;
        }
        idx
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - end - 1;
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let signed = matches!(bytes.get(end + 1), Some(b'+' | b'-'));
        let digits_start = end + 1 + usize::from(signed);
        let exp_end = digits_from(digits_start);
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

pub fn number_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(raw) => parse_number(raw),
        _ => 0.0,
    }
}

pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(number_from_value).unwrap_or(0.0))
}

/// Missing, `null` and `""` are all "no date"; epoch milliseconds are
/// accepted as well.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(Value::String(raw)) => parse_calendar_date(&raw).map(Some).map_err(de::Error::custom),
        Some(Value::Number(number)) => number
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|ts| Some(ts.date_naive()))
            .ok_or_else(|| {
                de::Error::custom(format!("Cast to date failed for value \"{number}\""))
            }),
        Some(other) => Err(de::Error::custom(format!(
            "Cast to date failed for value \"{other}\""
        ))),
    }
}

pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_calendar_date, WIRE_DATE_FORMAT};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format(WIRE_DATE_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_calendar_date(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{de, Deserialize, Deserializer, Serializer};

        use super::super::{parse_calendar_date, WIRE_DATE_FORMAT};

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => serializer.collect_str(&date.format(WIRE_DATE_FORMAT)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse_calendar_date(&raw).map(Some).map_err(de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

pub(crate) fn normalize_optional(input: Option<String>) -> Option<String> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

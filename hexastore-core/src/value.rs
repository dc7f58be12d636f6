//! TypedValue - the object side of a triple
//!
//! A triple's object carries three pieces of state:
//! - `raw`: the canonical textual form of the scalar
//! - `tag`: the datatype governing comparison semantics
//! - `is_id`: whether `raw` names another subject (the triple is an edge)
//!
//! ## Type inference
//!
//! [`TypedValue::from_raw`] infers the tag by trying parsers in a fixed
//! order: Null, Boolean, Integer, Float, Date, with String as the fallback.
//! Inference is deterministic, so a given raw text always lands on the same
//! tag and the index keys (which carry raw text only) stay unambiguous.
//!
//! ## Comparison
//!
//! [`TypedValue::compare`] returns `Option<Ordering>`:
//!
//! 1. **Numeric class**: Integer and Float compare mathematically; an
//!    integer operand widens to f64 when the other side is a float.
//! 2. **Strings** compare lexicographically, **dates** chronologically,
//!    **booleans** as false < true.
//! 3. Everything else is incomparable and returns `None`.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Datatype tag for a triple object
///
/// Wire codes are frozen for on-disk compatibility; see [`Datatype::wire_code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    /// Absent value (the literal text `null`)
    Null,
    /// `true` / `false`
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// 64-bit floating point
    Float,
    /// Any other text
    String,
    /// Calendar date or RFC 3339 date-time
    Date,
}

impl Datatype {
    /// Stable two-byte wire code used by the binary triple encoding.
    ///
    /// These values are frozen; changing them breaks every existing store.
    pub const fn wire_code(self) -> u16 {
        match self {
            Datatype::Null => 0,
            Datatype::Boolean => 1,
            Datatype::Integer => 2,
            Datatype::Float => 3,
            Datatype::String => 4,
            Datatype::Date => 5,
        }
    }

    /// Decode a wire code back to a tag
    pub fn from_wire_code(code: u16) -> Result<Datatype> {
        match code {
            0 => Ok(Datatype::Null),
            1 => Ok(Datatype::Boolean),
            2 => Ok(Datatype::Integer),
            3 => Ok(Datatype::Float),
            4 => Ok(Datatype::String),
            5 => Ok(Datatype::Date),
            other => Err(Error::corrupt(format!("unknown datatype code {}", other))),
        }
    }

    /// Short name of this tag
    pub fn name(self) -> &'static str {
        match self {
            Datatype::Null => "null",
            Datatype::Boolean => "boolean",
            Datatype::Integer => "integer",
            Datatype::Float => "float",
            Datatype::String => "string",
            Datatype::Date => "date",
        }
    }

    /// Whether this tag belongs to the numeric class
    pub fn is_numeric(self) -> bool {
        matches!(self, Datatype::Integer | Datatype::Float)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A typed triple object
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedValue {
    /// Canonical textual form of the scalar
    pub raw: String,
    /// Datatype tag governing comparison semantics
    pub tag: Datatype,
    /// Marks `raw` as the name of another subject
    pub is_id: bool,
}

impl TypedValue {
    /// Infer a tag from raw text and build a data value
    ///
    /// Parsers run in order: Null, Boolean, Integer, Float, Date. Anything
    /// that survives all of them is a String. The literal texts `null`,
    /// `true`, and `false` are matched exactly (lowercase).
    pub fn from_raw(text: impl Into<String>) -> Self {
        let raw = text.into();
        let tag = infer_tag(&raw);
        Self {
            raw,
            tag,
            is_id: false,
        }
    }

    /// Build an id value pointing at another subject
    pub fn id(subject: impl Into<String>) -> Self {
        Self {
            raw: subject.into(),
            tag: Datatype::String,
            is_id: true,
        }
    }

    /// Build a value from explicit components (used by the codec)
    pub fn typed(raw: impl Into<String>, tag: Datatype, is_id: bool) -> Self {
        Self {
            raw: raw.into(),
            tag,
            is_id,
        }
    }

    /// Integer view of this value, when the tag is Integer
    pub fn as_i64(&self) -> Option<i64> {
        match self.tag {
            Datatype::Integer => self.raw.parse().ok(),
            _ => None,
        }
    }

    /// Float view of this value; integers widen
    pub fn as_f64(&self) -> Option<f64> {
        match self.tag {
            Datatype::Integer | Datatype::Float => self.raw.parse().ok(),
            _ => None,
        }
    }

    /// Boolean view of this value, when the tag is Boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self.tag {
            Datatype::Boolean => self.raw.parse().ok(),
            _ => None,
        }
    }

    /// Chronological instant of this value in microseconds, when the tag is Date
    pub fn as_instant(&self) -> Option<i64> {
        match self.tag {
            Datatype::Date => parse_instant(&self.raw),
            _ => None,
        }
    }

    /// Compare two values within their comparison class
    ///
    /// Returns `None` when the operands belong to different classes (and so
    /// have no ordering), or when a raw text does not survive its own tag's
    /// parser.
    pub fn compare(&self, other: &TypedValue) -> Option<Ordering> {
        match (self.tag, other.tag) {
            (a, b) if a.is_numeric() && b.is_numeric() => {
                if a == Datatype::Integer && b == Datatype::Integer {
                    Some(self.as_i64()?.cmp(&other.as_i64()?))
                } else {
                    self.as_f64()?.partial_cmp(&other.as_f64()?)
                }
            }
            (Datatype::String, Datatype::String) => Some(self.raw.as_str().cmp(&other.raw)),
            (Datatype::Boolean, Datatype::Boolean) => Some(self.as_bool()?.cmp(&other.as_bool()?)),
            (Datatype::Date, Datatype::Date) => Some(self.as_instant()?.cmp(&other.as_instant()?)),
            (Datatype::Null, Datatype::Null) => Some(Ordering::Equal),
            _ => None,
        }
    }

    /// Substring test, defined only on strings
    pub fn contains(&self, needle: &str) -> bool {
        self.tag == Datatype::String && self.raw.contains(needle)
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_id {
            write!(f, "<{}>", self.raw)
        } else {
            write!(f, "{}:{}", self.tag, self.raw)
        }
    }
}

/// Tag inference: the fixed parser ladder behind `from_raw`
fn infer_tag(raw: &str) -> Datatype {
    if raw == "null" {
        return Datatype::Null;
    }
    if raw == "true" || raw == "false" {
        return Datatype::Boolean;
    }
    if raw.parse::<i64>().is_ok() {
        return Datatype::Integer;
    }
    if let Ok(f) = raw.parse::<f64>() {
        // Only finite floats; "inf" and "NaN" stay strings.
        if f.is_finite() {
            return Datatype::Float;
        }
    }
    if parse_instant(raw).is_some() {
        return Datatype::Date;
    }
    Datatype::String
}

/// Parse raw text as an RFC 3339 date-time or plain ISO date.
///
/// Plain dates are anchored at UTC midnight so a date and the date-time at
/// its start compare equal.
fn parse_instant(raw: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_micros());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.and_hms_opt(0, 0, 0)?.and_utc().timestamp_micros());
    }
    None
}

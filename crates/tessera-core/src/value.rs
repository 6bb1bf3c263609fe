//! Typed property values: strict coercion, comparison, and the flat and
//! statement serialized forms.
//!
//! Flat form: `{"value": <native JSON value>}`.
//! Statement form: `{"value": <lexical string>, "datatype": <tag>}`, where the
//! tag is chosen by [`ScalarKind::datatype`].

use std::{
  cmp::Ordering,
  fmt,
  hash::{Hash, Hasher},
  str::FromStr,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Value, json};

use crate::{
  error::{Error, Result},
  kind::{Datatype, ScalarKind},
  literal::{GeoLocation, Truth},
  raw::RawValue,
  uri::is_absolute_uri,
};

// ─── PropertyValue ───────────────────────────────────────────────────────────

/// A coerced property value: one of the ten concrete kinds, or an ordered
/// sequence of one kind for multi-valued properties.
///
/// Floating-point payloads are always finite, so equality is total and the
/// type implements `Eq` and `Hash`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
  Boolean(bool),
  String(String),
  Integer(i64),
  Long(i64),
  Double(f64),
  Float(f32),
  /// Millisecond precision; finer input is truncated.
  DateTime(DateTime<Utc>),
  GeoLocation(GeoLocation),
  Truth(Truth),
  Uri(String),
  Multi(MultiValue),
}

impl PropertyValue {
  /// Coerce `raw` to a single value of `kind`.
  ///
  /// Coercion is strict: an integer kind only accepts input that reduces to a
  /// whole number, a datetime only accepts an instant, epoch milliseconds or
  /// an RFC 3339 string, and so on. Lists and nulls are always rejected.
  pub fn coerce(kind: ScalarKind, raw: RawValue) -> Result<Self> {
    let coerced = match kind {
      ScalarKind::Boolean => coerce_boolean(&raw).map(Self::Boolean),
      ScalarKind::String => coerce_string(&raw).map(Self::String),
      ScalarKind::Integer => coerce_integer(&raw).map(Self::Integer),
      ScalarKind::Long => coerce_integer(&raw).map(Self::Long),
      ScalarKind::Double => coerce_double(&raw).map(Self::Double),
      ScalarKind::Float => coerce_float(&raw).map(Self::Float),
      ScalarKind::DateTime => coerce_datetime(&raw).map(Self::DateTime),
      ScalarKind::GeoLocation => coerce_geo(&raw).map(Self::GeoLocation),
      ScalarKind::Truth => coerce_truth(&raw).map(Self::Truth),
      ScalarKind::Uri => coerce_uri(&raw).map(Self::Uri),
    };
    coerced.ok_or_else(|| Error::coercion(kind, raw))
  }

  /// Coerce `raw` using the kind inferred from its shape
  /// ([`RawValue::infer_kind`]).
  pub fn infer(raw: RawValue) -> Result<Self> {
    let kind = raw.infer_kind();
    match raw {
      RawValue::List(_) => MultiValue::coerce(kind, raw).map(Self::Multi),
      raw => Self::coerce(kind, raw),
    }
  }

  /// Parse a lexical form, as found in the statement form.
  pub fn from_lexical(kind: ScalarKind, lexical: &str) -> Result<Self> {
    Self::coerce(kind, RawValue::Text(lexical.to_string()))
  }

  /// The scalar kind; for a multi-value, the kind of its entries.
  pub fn kind(&self) -> ScalarKind {
    match self {
      Self::Boolean(_) => ScalarKind::Boolean,
      Self::String(_) => ScalarKind::String,
      Self::Integer(_) => ScalarKind::Integer,
      Self::Long(_) => ScalarKind::Long,
      Self::Double(_) => ScalarKind::Double,
      Self::Float(_) => ScalarKind::Float,
      Self::DateTime(_) => ScalarKind::DateTime,
      Self::GeoLocation(_) => ScalarKind::GeoLocation,
      Self::Truth(_) => ScalarKind::Truth,
      Self::Uri(_) => ScalarKind::Uri,
      Self::Multi(m) => m.kind,
    }
  }

  pub fn is_multi(&self) -> bool { matches!(self, Self::Multi(_)) }

  /// The scalar entries: the value itself, or each entry of a multi-value.
  pub fn entries(&self) -> std::slice::Iter<'_, PropertyValue> {
    match self {
      Self::Multi(m) => m.entries.iter(),
      scalar => std::slice::from_ref(scalar).iter(),
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::String(s) | Self::Uri(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Boolean(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Integer(i) | Self::Long(i) => Some(*i),
      _ => None,
    }
  }

  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Self::Double(d) => Some(*d),
      Self::Float(f) => Some(f64::from(*f)),
      _ => None,
    }
  }

  pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
    match self {
      Self::DateTime(t) => Some(*t),
      _ => None,
    }
  }

  /// Compare against a raw value of the matching native shape.
  ///
  /// Returns `None` ("not comparable") whenever the raw value is of another
  /// kind; no cross-kind conversion is attempted.
  pub fn compare_raw(&self, raw: &RawValue) -> Option<Ordering> {
    use PropertyValue as V;
    use RawValue as R;

    match (self, raw) {
      (V::Boolean(a), R::Bool(b)) => a.partial_cmp(b),
      (V::String(a) | V::Uri(a), R::Text(b)) => a.as_str().partial_cmp(b),
      (V::Integer(a) | V::Long(a), R::Int(b)) => a.partial_cmp(b),
      (V::Double(a), R::Float(b)) => a.partial_cmp(b),
      (V::Double(a), R::Int(b)) => a.partial_cmp(&(*b as f64)),
      (V::Float(a), R::Float(b)) => a.partial_cmp(&(*b as f32)),
      (V::Float(a), R::Int(b)) => a.partial_cmp(&(*b as f32)),
      (V::DateTime(a), R::Instant(b)) => a.partial_cmp(b),
      (V::GeoLocation(a), R::Geo(b)) => (a == b).then_some(Ordering::Equal),
      (V::Truth(a), R::Truth(b)) => (a == b).then_some(Ordering::Equal),
      (V::Multi(m), R::List(items)) => {
        for (entry, item) in m.entries.iter().zip(items) {
          match entry.compare_raw(item)? {
            Ordering::Equal => continue,
            unequal => return Some(unequal),
          }
        }
        Some(m.entries.len().cmp(&items.len()))
      }
      _ => None,
    }
  }

  // ── Flat form ──────────────────────────────────────────────────────────

  /// `{"value": <native>}`.
  pub fn to_flat(&self) -> Value { json!({ "value": self.flat_native() }) }

  fn flat_native(&self) -> Value {
    match self {
      Self::Boolean(b) => json!(b),
      Self::String(s) | Self::Uri(s) => json!(s),
      Self::Integer(i) | Self::Long(i) => json!(i),
      Self::Double(d) => json!(d),
      // Go through the shortest decimal form so 0.1f32 stays 0.1.
      Self::Float(f) => json!(f.to_string().parse::<f64>().unwrap_or_default()),
      Self::DateTime(t) => json!(t.timestamp_millis()),
      Self::GeoLocation(g) => json!({
        "latitude": g.latitude(),
        "longitude": g.longitude(),
      }),
      Self::Truth(t) => json!(t.to_string()),
      Self::Multi(m) => {
        Value::Array(m.entries.iter().map(Self::flat_native).collect())
      }
    }
  }

  /// Inverse of [`PropertyValue::to_flat`].
  pub fn from_flat(kind: ScalarKind, multi: bool, flat: &Value) -> Result<Self> {
    let value = flat
      .get("value")
      .ok_or_else(|| Error::MalformedSerialization(flat.to_string()))?;
    let raw = RawValue::from_json(value)?;
    if multi {
      MultiValue::coerce(kind, raw).map(Self::Multi)
    } else {
      Self::coerce(kind, raw)
    }
  }

  // ── Statement form ─────────────────────────────────────────────────────

  /// `{"value": <lexical>, "datatype": <tag>}`; a multi-value carries an
  /// array of lexical forms.
  pub fn to_statement(&self) -> Value {
    let value = match self {
      Self::Multi(m) => {
        Value::Array(m.entries.iter().map(|e| json!(e.lexical())).collect())
      }
      scalar => json!(scalar.lexical()),
    };
    json!({
      "value": value,
      "datatype": self.kind().datatype().to_string(),
    })
  }

  /// Inverse of [`PropertyValue::to_statement`]. The datatype tag must be the
  /// one `kind` serializes to.
  pub fn from_statement(
    kind: ScalarKind,
    multi: bool,
    statement: &Value,
  ) -> Result<Self> {
    let malformed = || Error::MalformedSerialization(statement.to_string());

    let tag = statement
      .get("datatype")
      .and_then(Value::as_str)
      .ok_or_else(malformed)?;
    let datatype = Datatype::from_str(tag)
      .map_err(|_| Error::UnknownDatatype(tag.to_string()))?;
    if datatype != kind.datatype() {
      return Err(Error::datatype_mismatch(kind, datatype));
    }

    let lexical = |v: &Value| -> Result<Self> {
      Self::from_lexical(kind, v.as_str().ok_or_else(malformed)?)
    };
    match (statement.get("value").ok_or_else(malformed)?, multi) {
      (Value::Array(items), true) => Ok(Self::Multi(MultiValue {
        kind,
        entries: items.iter().map(lexical).collect::<Result<_>>()?,
      })),
      (single, true) => Ok(Self::Multi(MultiValue {
        kind,
        entries: vec![lexical(single)?],
      })),
      (single, false) => lexical(single),
    }
  }

  /// The lexical form of a scalar; entries of a multi-value are joined with
  /// `", "` inside brackets.
  pub fn lexical(&self) -> String { self.to_string() }
}

impl fmt::Display for PropertyValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Boolean(b) => write!(f, "{b}"),
      Self::String(s) | Self::Uri(s) => f.write_str(s),
      Self::Integer(i) | Self::Long(i) => write!(f, "{i}"),
      Self::Double(d) => write!(f, "{d}"),
      Self::Float(x) => write!(f, "{x}"),
      Self::DateTime(t) => {
        f.write_str(&t.to_rfc3339_opts(SecondsFormat::Millis, true))
      }
      Self::GeoLocation(g) => write!(f, "{g}"),
      Self::Truth(t) => write!(f, "{t}"),
      Self::Multi(m) => {
        f.write_str("[")?;
        for (i, entry) in m.entries.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{entry}")?;
        }
        f.write_str("]")
      }
    }
  }
}

impl Eq for PropertyValue {}

impl Hash for PropertyValue {
  fn hash<H: Hasher>(&self, state: &mut H) {
    std::mem::discriminant(self).hash(state);
    match self {
      Self::Boolean(b) => b.hash(state),
      Self::String(s) | Self::Uri(s) => s.hash(state),
      Self::Integer(i) | Self::Long(i) => i.hash(state),
      Self::Double(d) => d.to_bits().hash(state),
      Self::Float(f) => f.to_bits().hash(state),
      Self::DateTime(t) => t.hash(state),
      Self::GeoLocation(g) => g.hash(state),
      Self::Truth(t) => t.hash(state),
      Self::Multi(m) => m.hash(state),
    }
  }
}

/// Ordering is only defined between values of the same kind.
impl PartialOrd for PropertyValue {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    use PropertyValue as V;

    match (self, other) {
      (V::Boolean(a), V::Boolean(b)) => a.partial_cmp(b),
      (V::String(a), V::String(b)) | (V::Uri(a), V::Uri(b)) => {
        a.partial_cmp(b)
      }
      (V::Integer(a), V::Integer(b)) | (V::Long(a), V::Long(b)) => {
        a.partial_cmp(b)
      }
      (V::Double(a), V::Double(b)) => a.partial_cmp(b),
      (V::Float(a), V::Float(b)) => a.partial_cmp(b),
      (V::DateTime(a), V::DateTime(b)) => a.partial_cmp(b),
      (V::GeoLocation(a), V::GeoLocation(b)) => {
        (a == b).then_some(Ordering::Equal)
      }
      (V::Truth(a), V::Truth(b)) => (a == b).then_some(Ordering::Equal),
      (V::Multi(a), V::Multi(b)) if a.kind == b.kind => {
        a.entries.partial_cmp(&b.entries)
      }
      _ => None,
    }
  }
}

impl PartialEq<RawValue> for PropertyValue {
  fn eq(&self, other: &RawValue) -> bool {
    self.compare_raw(other) == Some(Ordering::Equal)
  }
}

impl PartialEq<str> for PropertyValue {
  fn eq(&self, other: &str) -> bool { self.as_str() == Some(other) }
}

impl PartialEq<&str> for PropertyValue {
  fn eq(&self, other: &&str) -> bool { self.as_str() == Some(*other) }
}

impl PartialEq<bool> for PropertyValue {
  fn eq(&self, other: &bool) -> bool { self.as_bool() == Some(*other) }
}

impl PartialEq<i64> for PropertyValue {
  fn eq(&self, other: &i64) -> bool { self.as_i64() == Some(*other) }
}

impl PartialEq<f64> for PropertyValue {
  fn eq(&self, other: &f64) -> bool {
    self.compare_raw(&RawValue::Float(*other)) == Some(Ordering::Equal)
  }
}

// ─── MultiValue ──────────────────────────────────────────────────────────────

/// Ordered entries of a single kind, held by multi-valued properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MultiValue {
  kind:    ScalarKind,
  entries: Vec<PropertyValue>,
}

impl MultiValue {
  /// Coerce a list (or a single value, read as a one-entry list) entry by
  /// entry. Null entries are rejected.
  pub fn coerce(kind: ScalarKind, raw: RawValue) -> Result<Self> {
    let items = match raw {
      RawValue::List(items) => items,
      RawValue::Null => return Err(Error::coercion(kind, RawValue::Null)),
      single => vec![single],
    };
    let entries = items
      .into_iter()
      .map(|item| PropertyValue::coerce(kind, item))
      .collect::<Result<_>>()?;
    Ok(Self { kind, entries })
  }

  pub fn kind(&self) -> ScalarKind { self.kind }

  pub fn entries(&self) -> &[PropertyValue] { &self.entries }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

// ─── Per-kind coercion ───────────────────────────────────────────────────────

fn coerce_boolean(raw: &RawValue) -> Option<bool> {
  match raw {
    RawValue::Bool(b) => Some(*b),
    RawValue::Text(s) => match s.trim() {
      "true" | "1" => Some(true),
      "false" | "0" => Some(false),
      _ => None,
    },
    _ => None,
  }
}

fn coerce_string(raw: &RawValue) -> Option<String> {
  match raw {
    RawValue::Text(s) => Some(s.clone()),
    RawValue::Bool(b) => Some(b.to_string()),
    RawValue::Int(i) => Some(i.to_string()),
    RawValue::Float(f) => Some(f.to_string()),
    _ => None,
  }
}

fn coerce_integer(raw: &RawValue) -> Option<i64> {
  // 2^63 as f64; anything at or above it does not fit in an i64.
  const LIMIT: f64 = 9_223_372_036_854_775_808.0;
  match raw {
    RawValue::Int(i) => Some(*i),
    RawValue::Float(f) if f.fract() == 0.0 && (-LIMIT..LIMIT).contains(f) => {
      Some(*f as i64)
    }
    RawValue::Text(s) => s.trim().parse().ok(),
    _ => None,
  }
}

fn coerce_double(raw: &RawValue) -> Option<f64> {
  let value = match raw {
    RawValue::Float(f) => *f,
    RawValue::Int(i) => *i as f64,
    RawValue::Text(s) => s.trim().parse().ok()?,
    _ => return None,
  };
  value.is_finite().then_some(value + 0.0)
}

fn coerce_float(raw: &RawValue) -> Option<f32> {
  let value = coerce_double(raw)? as f32;
  value.is_finite().then_some(value + 0.0)
}

fn coerce_datetime(raw: &RawValue) -> Option<DateTime<Utc>> {
  let instant = match raw {
    RawValue::Instant(t) => *t,
    RawValue::Int(millis) => Utc.timestamp_millis_opt(*millis).single()?,
    RawValue::Text(s) => parse_iso_datetime(s.trim())?,
    _ => return None,
  };
  Utc.timestamp_millis_opt(instant.timestamp_millis()).single()
}

/// ISO 8601 with an offset, or without one (read as UTC), or a bare date
/// (midnight UTC).
fn parse_iso_datetime(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(t) = DateTime::parse_from_rfc3339(s) {
    return Some(t.with_timezone(&Utc));
  }
  if let Ok(t) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(t.and_utc());
  }
  let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
  Some(date.and_hms_opt(0, 0, 0)?.and_utc())
}

fn coerce_geo(raw: &RawValue) -> Option<GeoLocation> {
  match raw {
    RawValue::Geo(g) => Some(*g),
    RawValue::Text(s) => s.parse().ok(),
    _ => None,
  }
}

fn coerce_truth(raw: &RawValue) -> Option<Truth> {
  match raw {
    RawValue::Truth(t) => Some(*t),
    RawValue::Bool(b) => Some(Truth::from(*b)),
    RawValue::Text(s) => s.trim().parse().ok(),
    _ => None,
  }
}

fn coerce_uri(raw: &RawValue) -> Option<String> {
  match raw {
    RawValue::Text(s) if is_absolute_uri(s) => Some(s.clone()),
    _ => None,
  }
}

//! Untyped input values, before coercion to a scalar kind.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;

use crate::{
  error::{Error, Result},
  kind::ScalarKind,
  literal::{GeoLocation, Truth},
  uri::is_absolute_uri,
};

/// A loosely typed value as handed in by callers or decoded from JSON.
///
/// [`RawValue::Null`] stands for "absent": writing it to an attribute clears
/// the attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
  #[default]
  Null,
  Bool(bool),
  Int(i64),
  Float(f64),
  Text(String),
  Instant(DateTime<Utc>),
  Geo(GeoLocation),
  Truth(Truth),
  List(Vec<RawValue>),
}

impl RawValue {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  /// Infer the scalar kind of a bare value.
  ///
  /// The order of the checks matters: URIs are recognised before plain text,
  /// and booleans before numbers. Lists take the kind of their first non-null
  /// entry.
  pub fn infer_kind(&self) -> ScalarKind {
    match self {
      Self::Text(s) if is_absolute_uri(s) => ScalarKind::Uri,
      Self::Bool(_) => ScalarKind::Boolean,
      Self::Float(_) => ScalarKind::Double,
      Self::Int(_) => ScalarKind::Integer,
      Self::Instant(_) => ScalarKind::DateTime,
      Self::Geo(_) => ScalarKind::GeoLocation,
      Self::Truth(_) => ScalarKind::Truth,
      Self::List(items) => items
        .iter()
        .find(|item| !item.is_null())
        .map_or(ScalarKind::String, Self::infer_kind),
      Self::Text(_) | Self::Null => ScalarKind::String,
    }
  }

  /// Decode a JSON value.
  ///
  /// Objects are only accepted in the `{"latitude": .., "longitude": ..}`
  /// shape used by the flat form of geo-locations.
  pub fn from_json(value: &Value) -> Result<Self> {
    Ok(match value {
      Value::Null => Self::Null,
      Value::Bool(b) => Self::Bool(*b),
      Value::Number(n) => match n.as_i64() {
        Some(i) => Self::Int(i),
        None => Self::Float(
          n.as_f64()
            .ok_or_else(|| Error::UnsupportedJson(n.to_string()))?,
        ),
      },
      Value::String(s) => Self::Text(s.clone()),
      Value::Array(items) => {
        Self::List(items.iter().map(Self::from_json).collect::<Result<_>>()?)
      }
      Value::Object(map) => {
        let coordinate = |key: &str| map.get(key).and_then(Value::as_f64);
        match (coordinate("latitude"), coordinate("longitude")) {
          (Some(lat), Some(lon)) if map.len() == 2 => {
            Self::Geo(GeoLocation::new(lat, lon)?)
          }
          _ => return Err(Error::UnsupportedJson(value.to_string())),
        }
      }
    })
  }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl From<bool> for RawValue {
  fn from(value: bool) -> Self { Self::Bool(value) }
}

impl From<i32> for RawValue {
  fn from(value: i32) -> Self { Self::Int(value.into()) }
}

impl From<i64> for RawValue {
  fn from(value: i64) -> Self { Self::Int(value) }
}

impl From<u32> for RawValue {
  fn from(value: u32) -> Self { Self::Int(value.into()) }
}

impl From<f32> for RawValue {
  fn from(value: f32) -> Self { Self::Float(value.into()) }
}

impl From<f64> for RawValue {
  fn from(value: f64) -> Self { Self::Float(value) }
}

impl From<&str> for RawValue {
  fn from(value: &str) -> Self { Self::Text(value.to_string()) }
}

impl From<String> for RawValue {
  fn from(value: String) -> Self { Self::Text(value) }
}

impl From<DateTime<Utc>> for RawValue {
  fn from(value: DateTime<Utc>) -> Self { Self::Instant(value) }
}

impl From<DateTime<FixedOffset>> for RawValue {
  fn from(value: DateTime<FixedOffset>) -> Self {
    Self::Instant(value.with_timezone(&Utc))
  }
}

impl From<GeoLocation> for RawValue {
  fn from(value: GeoLocation) -> Self { Self::Geo(value) }
}

impl From<Truth> for RawValue {
  fn from(value: Truth) -> Self { Self::Truth(value) }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
  fn from(value: Option<T>) -> Self { value.map_or(Self::Null, Into::into) }
}

impl<T: Into<RawValue>> From<Vec<T>> for RawValue {
  fn from(value: Vec<T>) -> Self {
    Self::List(value.into_iter().map(Into::into).collect())
  }
}

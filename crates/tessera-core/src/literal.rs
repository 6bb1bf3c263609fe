//! Structured literal types that have no direct Rust primitive.

use std::{
  fmt,
  hash::{Hash, Hasher},
  str::FromStr,
};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Error, Result};

// ─── Geo-location ────────────────────────────────────────────────────────────

/// A WGS84 coordinate pair.
///
/// Coordinates are finite and in range by construction, which makes the type
/// safe to use as `Eq`/`Hash`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoLocation {
  latitude:  f64,
  longitude: f64,
}

impl GeoLocation {
  pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
    if !(-90.0..=90.0).contains(&latitude) {
      return Err(Error::InvalidGeoLocation(format!(
        "latitude {latitude} out of range"
      )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
      return Err(Error::InvalidGeoLocation(format!(
        "longitude {longitude} out of range"
      )));
    }
    // Fold -0.0 into 0.0 so equal coordinates hash equally.
    Ok(Self {
      latitude:  latitude + 0.0,
      longitude: longitude + 0.0,
    })
  }

  pub fn latitude(&self) -> f64 { self.latitude }

  pub fn longitude(&self) -> f64 { self.longitude }
}

impl Eq for GeoLocation {}

impl Hash for GeoLocation {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.latitude.to_bits().hash(state);
    self.longitude.to_bits().hash(state);
  }
}

impl fmt::Display for GeoLocation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "geo:{},{}", self.latitude, self.longitude)
  }
}

/// Accepts `geo:<lat>,<lon>` and the bare `<lat>,<lon>` form.
impl FromStr for GeoLocation {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let body = s.trim();
    let body = body.strip_prefix("geo:").unwrap_or(body);
    let (lat, lon) = body
      .split_once(',')
      .ok_or_else(|| Error::InvalidGeoLocation(s.to_string()))?;
    let parse = |part: &str| {
      part
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::InvalidGeoLocation(s.to_string()))
    };
    Self::new(parse(lat)?, parse(lon)?)
  }
}

// ─── Truth ───────────────────────────────────────────────────────────────────

/// Four-valued truth: the two classical values plus "unknown" and "mu"
/// (the question does not apply).
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Truth {
  Yes,
  No,
  Unknown,
  Mu,
}

impl From<bool> for Truth {
  fn from(value: bool) -> Self { if value { Self::Yes } else { Self::No } }
}

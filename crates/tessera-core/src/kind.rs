//! Scalar kinds and the datatype tags used by the statement form.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::vocab::xsd;

/// The concrete kind of a single property value.
///
/// Multi-valued properties hold an ordered sequence of one of these kinds; see
/// [`crate::MultiValue`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ScalarKind {
  Boolean,
  String,
  Integer,
  Long,
  Double,
  Float,
  DateTime,
  GeoLocation,
  Truth,
  /// A reference to another resource. The identity property is of this kind.
  Uri,
}

impl ScalarKind {
  pub const ALL: [ScalarKind; 10] = [
    Self::Boolean,
    Self::String,
    Self::Integer,
    Self::Long,
    Self::Double,
    Self::Float,
    Self::DateTime,
    Self::GeoLocation,
    Self::Truth,
    Self::Uri,
  ];

  /// The datatype tag emitted by the statement serializer for this kind.
  pub fn datatype(self) -> Datatype {
    match self {
      Self::DateTime => Datatype::DateTime,
      Self::Boolean => Datatype::Boolean,
      Self::Integer | Self::Long => Datatype::Integer,
      Self::Double | Self::Float => Datatype::Float,
      Self::Uri => Datatype::Reference,
      Self::String | Self::GeoLocation | Self::Truth => Datatype::String,
    }
  }
}

/// Datatype tag attached to a literal in the statement form.
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Datatype {
  DateTime,
  Boolean,
  Integer,
  Float,
  String,
  /// Not a literal: the value names another resource.
  Reference,
}

impl Datatype {
  /// XSD IRI for literal tags; `None` for [`Datatype::Reference`].
  pub fn xsd_iri(self) -> Option<&'static str> {
    match self {
      Self::DateTime => Some(xsd::DATE_TIME),
      Self::Boolean => Some(xsd::BOOLEAN),
      Self::Integer => Some(xsd::INTEGER),
      Self::Float => Some(xsd::FLOAT),
      Self::String => Some(xsd::STRING),
      Self::Reference => None,
    }
  }

  /// Map an XSD datatype IRI back to a tag. Unrecognised datatypes read as
  /// plain strings.
  pub fn from_xsd_iri(iri: &str) -> Self {
    match iri {
      xsd::DATE_TIME | xsd::DATE_TIME_STAMP => Self::DateTime,
      xsd::BOOLEAN => Self::Boolean,
      xsd::INTEGER | xsd::INT | xsd::LONG | xsd::SHORT => Self::Integer,
      xsd::FLOAT | xsd::DOUBLE => Self::Float,
      _ => Self::String,
    }
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn datatype_tags_follow_kind_families() {
    assert_eq!(ScalarKind::DateTime.datatype(), Datatype::DateTime);
    assert_eq!(ScalarKind::Long.datatype(), Datatype::Integer);
    assert_eq!(ScalarKind::Float.datatype(), Datatype::Float);
    assert_eq!(ScalarKind::Truth.datatype(), Datatype::String);
    assert_eq!(ScalarKind::Uri.datatype(), Datatype::Reference);
  }

  #[test]
  fn tags_render_in_camel_case() {
    assert_eq!(Datatype::DateTime.to_string(), "dateTime");
    assert_eq!(Datatype::from_str("reference").unwrap(), Datatype::Reference);
    assert_eq!(ScalarKind::GeoLocation.to_string(), "geo_location");
  }

  #[test]
  fn unknown_xsd_iri_reads_as_string() {
    assert_eq!(
      Datatype::from_xsd_iri("http://www.w3.org/2001/XMLSchema#decimal"),
      Datatype::String
    );
  }
}

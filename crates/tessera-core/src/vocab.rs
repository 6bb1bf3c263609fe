//! Reserved IRIs shared by every crate in the workspace.

/// The identity property. Every graph object carries exactly one.
pub const IDENTITY_PROPERTY: &str = "http://tessera.dev/ontology/core#URIProp";

/// Attribute name (and flat-form key) under which the identity is exposed.
pub const IDENTITY_ATTRIBUTE: &str = "URI";

/// Flat-form key holding the declared class of an object.
pub const TYPE_KEY: &str = "type";

/// Root of the entity class tree.
pub const GRAPH_OBJECT: &str = "http://tessera.dev/ontology/core#GraphObject";

/// Boolean annotation marking a property as multi-valued.
pub const HAS_MULTIPLE_VALUES: &str =
  "http://tessera.dev/ontology/core#hasMultipleValues";

/// Datatype IRI for geo-location literals.
pub const GEO_LOCATION: &str = "http://tessera.dev/ontology/core#geoLocation";

/// Datatype IRI for four-valued truth literals.
pub const TRUTH: &str = "http://tessera.dev/ontology/core#truth";

pub mod rdf {
  pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
  pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
  pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
  pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
}

pub mod rdfs {
  pub const CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
  pub const SUB_CLASS_OF: &str =
    "http://www.w3.org/2000/01/rdf-schema#subClassOf";
  pub const DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
  pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
  pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}

pub mod owl {
  pub const ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
  pub const IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";
  pub const VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
  pub const CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
  pub const DATATYPE_PROPERTY: &str =
    "http://www.w3.org/2002/07/owl#DatatypeProperty";
  pub const OBJECT_PROPERTY: &str =
    "http://www.w3.org/2002/07/owl#ObjectProperty";
  pub const UNION_OF: &str = "http://www.w3.org/2002/07/owl#unionOf";
  pub const INTERSECTION_OF: &str =
    "http://www.w3.org/2002/07/owl#intersectionOf";
  pub const EQUIVALENT_CLASS: &str =
    "http://www.w3.org/2002/07/owl#equivalentClass";
}

pub mod xsd {
  pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
  pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
  pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
  pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";
  pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";
  pub const NON_NEGATIVE_INTEGER: &str =
    "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
  pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";
  pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
  pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";
  pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
  pub const DATE_TIME_STAMP: &str =
    "http://www.w3.org/2001/XMLSchema#dateTimeStamp";
}

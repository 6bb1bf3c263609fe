//! `NamedNodeRef` constants for the vocabulary the loader and extractor match
//! against.

use oxigraph::model::NamedNodeRef;
use tessera_core::vocab::{self, owl, rdf, rdfs};

pub const RDF_TYPE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdf::TYPE);
pub const RDF_FIRST: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdf::FIRST);
pub const RDF_REST: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdf::REST);
pub const RDF_NIL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdf::NIL);

pub const RDFS_CLASS: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdfs::CLASS);
pub const RDFS_SUB_CLASS_OF: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(rdfs::SUB_CLASS_OF);
pub const RDFS_DOMAIN: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(rdfs::DOMAIN);
pub const RDFS_RANGE: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdfs::RANGE);
pub const RDFS_LABEL: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(rdfs::LABEL);

pub const OWL_ONTOLOGY: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::ONTOLOGY);
pub const OWL_IMPORTS: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::IMPORTS);
pub const OWL_VERSION_INFO: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::VERSION_INFO);
pub const OWL_CLASS: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(owl::CLASS);
pub const OWL_DATATYPE_PROPERTY: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::DATATYPE_PROPERTY);
pub const OWL_OBJECT_PROPERTY: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::OBJECT_PROPERTY);
pub const OWL_UNION_OF: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::UNION_OF);
pub const OWL_INTERSECTION_OF: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::INTERSECTION_OF);
pub const OWL_EQUIVALENT_CLASS: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(owl::EQUIVALENT_CLASS);

pub const HAS_MULTIPLE_VALUES: NamedNodeRef<'_> =
  NamedNodeRef::new_unchecked(vocab::HAS_MULTIPLE_VALUES);

//! Start-up pipeline: load schemas, extract facts, assemble the registry.

use serde::{Deserialize, Serialize};
use tessera_ontology::{DomainRange, SchemaSource};

use crate::{declaration::SchemaModule, error::Result, registry::Registry};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildOptions {
  /// Register declarations synthesised from the loaded schema before the
  /// native modules, so native declarations override them.
  #[serde(default = "default_derive")]
  pub derive_from_schema: bool,
  /// Module id the synthesised declarations are registered under.
  #[serde(default = "default_schema_module")]
  pub schema_module_id:   String,
}

fn default_derive() -> bool { true }

fn default_schema_module() -> String { "schema".to_string() }

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      derive_from_schema: default_derive(),
      schema_module_id:   default_schema_module(),
    }
  }
}

/// Build a registry from schema files and native declaration modules.
///
/// Unparseable documents and malformed modules are logged and skipped. An
/// import cycle among `sources` is the only error.
pub fn build_registry(
  sources: &[SchemaSource],
  modules: impl IntoIterator<Item = SchemaModule>,
  options: &BuildOptions,
) -> Result<Registry> {
  let set = tessera_ontology::load(sources)?;
  let schema = DomainRange::extract(&set.graph);

  let derived = options
    .derive_from_schema
    .then(|| SchemaModule::from_schema(&options.schema_module_id, &set, &schema));

  let mut builder = Registry::builder().with_schema(set, schema);
  if let Some(module) = derived {
    builder.register(module);
  }
  for module in modules {
    builder.register(module);
  }
  Ok(builder.build())
}

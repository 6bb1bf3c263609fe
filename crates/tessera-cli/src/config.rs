//! `tessera.toml`: which schemas to load and how to build the registry.
//!
//! ```toml
//! derive_from_schema = true
//! modules = ["modules/native.json"]
//!
//! [[schemas]]
//! module = "app"
//! path   = "schemas/app.owl"
//! ```
//!
//! Every key can be overridden with a `TESSERA_`-prefixed environment
//! variable, e.g. `TESSERA_DERIVE_FROM_SCHEMA=false`.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;
use tessera_ontology::SchemaSource;
use tessera_registry::{BuildOptions, SchemaModule};

#[derive(Debug, Clone, Deserialize)]
pub struct TesseraConfig {
  #[serde(default = "default_derive")]
  pub derive_from_schema: bool,
  #[serde(default)]
  pub schemas:            Vec<SchemaSource>,
  /// JSON manifests, one serialized `SchemaModule` each.
  #[serde(default)]
  pub modules:            Vec<PathBuf>,
}

fn default_derive() -> bool { true }

impl TesseraConfig {
  /// Layer the (optional) TOML file under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("TESSERA"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise TesseraConfig")
  }

  pub fn build_options(&self) -> BuildOptions {
    BuildOptions {
      derive_from_schema: self.derive_from_schema,
      ..BuildOptions::default()
    }
  }

  /// Read every module manifest. A manifest that cannot be read or parsed is
  /// logged and skipped.
  pub fn native_modules(&self) -> Vec<SchemaModule> {
    self
      .modules
      .iter()
      .filter_map(|path| match read_manifest(path) {
        Ok(module) => Some(module),
        Err(e) => {
          tracing::warn!(
            module = %path.display(),
            error = %format!("{e:#}"),
            "skipping module manifest"
          );
          None
        }
      })
      .collect()
  }
}

fn read_manifest(path: &Path) -> anyhow::Result<SchemaModule> {
  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading module manifest {}", path.display()))?;
  serde_json::from_str(&raw)
    .with_context(|| format!("parsing module manifest {}", path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn reads_schemas_and_modules() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("native.json");
    std::fs::write(
      &manifest,
      r#"{ "id": "native", "declarations": [
           { "marker": "ontology", "iri": "http://example.org/native" } ] }"#,
    )
    .unwrap();

    let path = dir.path().join("tessera.toml");
    std::fs::write(
      &path,
      format!(
        "modules = [{manifest:?}]\n\n[[schemas]]\nmodule = \"app\"\npath = \
         \"schemas/app.owl\"\n"
      ),
    )
    .unwrap();

    let cfg = TesseraConfig::load(&path).unwrap();
    assert!(cfg.derive_from_schema);
    assert_eq!(cfg.schemas, [SchemaSource::new("app", "schemas/app.owl")]);

    let modules = cfg.native_modules();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].id, "native");
  }

  #[test]
  fn broken_manifests_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    std::fs::write(&good, r#"{ "id": "good", "declarations": [] }"#).unwrap();
    let garbled = dir.path().join("garbled.json");
    std::fs::write(&garbled, "{ not json").unwrap();
    let absent = dir.path().join("absent.json");

    let cfg = TesseraConfig {
      derive_from_schema: true,
      schemas:            Vec::new(),
      modules:            vec![garbled, good, absent],
    };
    let modules = cfg.native_modules();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].id, "good");
  }

  #[test]
  fn missing_file_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = TesseraConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert!(cfg.schemas.is_empty());
    assert!(cfg.build_options().derive_from_schema);
  }
}

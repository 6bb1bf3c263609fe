//! `tessera`: build a registry from configured schemas and inspect it.
//!
//! # Usage
//!
//! ```text
//! tessera --config tessera.toml classes
//! tessera properties http://example.org/app#Person
//! tessera to-ntriples person.json
//! tessera encode-graph --base http://x --namespace ns --graph g2 --account a1 --global
//! tessera decode-graph http://x/ns/GLOBAL/a1/g2
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tessera_namegraph::NameGraph;
use tessera_registry::{GraphObject, Registry, build_registry};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::TesseraConfig;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "tessera", version, about = "Schema-driven graph object registry")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "tessera.toml", value_name = "FILE")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// List loaded ontologies in load order.
  Ontologies,
  /// List registered classes with their allowed properties.
  Classes,
  /// Schema-declared properties of a class, including inherited ones.
  Properties { class: String },
  /// Convert a flat JSON object to N-Triples.
  ToNtriples { file: PathBuf },
  /// Encode a name graph URI.
  EncodeGraph {
    #[arg(long)]
    base:      String,
    #[arg(long)]
    namespace: String,
    #[arg(long)]
    graph:     String,
    #[arg(long)]
    account:   Option<String>,
    #[arg(long)]
    global:    bool,
  },
  /// Decode a name graph URI.
  DecodeGraph {
    uri:  String,
    /// Known base URI, when it carries a path of its own.
    #[arg(long)]
    base: Option<String>,
  },
}

// ─── Entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Command::EncodeGraph {
      base,
      namespace,
      graph,
      account,
      global,
    } => {
      let name = NameGraph::from_parts(base, namespace, graph, account, global)
        .context("invalid name graph")?;
      println!("{name}");
    }
    Command::DecodeGraph { uri, base } => {
      let name = match base {
        Some(base) => NameGraph::decode_with_base(&base, &uri),
        None => NameGraph::decode(&uri),
      }
      .with_context(|| format!("failed to decode {uri}"))?;
      let decoded = serde_json::json!({
        "base_uri": name.base_uri(),
        "namespace": name.namespace(),
        "graph_id": name.graph_id(),
        "account_id": name.account_id(),
        "global": name.is_global(),
      });
      println!("{}", serde_json::to_string_pretty(&decoded)?);
    }
    Command::Ontologies => {
      let registry = load_registry(&cli.config)?;
      for o in registry.ontologies() {
        println!(
          "{}  module={} version={} sha256={}",
          o.iri,
          o.module_id,
          o.version_info.as_deref().unwrap_or("-"),
          o.content_hash
        );
      }
    }
    Command::Classes => {
      let registry = load_registry(&cli.config)?;
      for class in registry.classes() {
        println!("{}  ({})", class.uri, class.module_id);
        for p in class.allowed_properties() {
          let multi = if p.multiple_values { " [multi]" } else { "" };
          println!("  {:<20} {} {}{multi}", p.short_name, p.kind, p.uri);
        }
      }
    }
    Command::Properties { class } => {
      let registry = load_registry(&cli.config)?;
      for p in registry.get_domain_property_list(&class) {
        println!("{}  {:?}", p.uri, p.kind);
      }
    }
    Command::ToNtriples { file } => {
      let registry = Arc::new(load_registry(&cli.config)?);
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let object = GraphObject::from_flat_str(registry, &raw)
        .with_context(|| format!("decoding {}", file.display()))?;
      print!("{}", object.to_ntriples()?);
    }
  }

  Ok(())
}

fn load_registry(path: &std::path::Path) -> anyhow::Result<Registry> {
  let cfg = TesseraConfig::load(path)?;
  let modules = cfg.native_modules();
  tracing::info!(
    schemas = cfg.schemas.len(),
    modules = modules.len(),
    "building registry"
  );
  build_registry(&cfg.schemas, modules, &cfg.build_options())
    .context("failed to build registry")
}

//! Import dependency ordering.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{
  document::SchemaDocument,
  error::{Error, Result},
};

/// Edges from each document to the documents it imports, restricted to the
/// documents in one batch plus those already loaded.
///
/// Imports of IRIs outside both sets are external: they add no edge and are
/// never fetched.
#[derive(Debug)]
pub struct ImportGraph {
  iris:       Vec<String>,
  /// `depends_on[i]` holds indices of batch documents `i` imports.
  depends_on: Vec<BTreeSet<usize>>,
}

impl ImportGraph {
  /// Build the graph for `documents`. `loaded` is the set of ontology IRIs
  /// already satisfied by earlier batches.
  pub fn new(documents: &[SchemaDocument], loaded: &BTreeSet<String>) -> Self {
    let index: BTreeMap<&str, usize> = documents
      .iter()
      .enumerate()
      .map(|(i, d)| (d.ontology_iri.as_str(), i))
      .collect();

    let depends_on = documents
      .iter()
      .map(|doc| {
        doc
          .imports
          .iter()
          .filter(|iri| {
            if **iri == doc.ontology_iri {
              tracing::debug!(ontology = %iri, "ignoring self-import");
              return false;
            }
            true
          })
          .filter_map(|iri| match index.get(iri.as_str()) {
            Some(&i) => Some(i),
            None => {
              if !loaded.contains(iri) {
                tracing::debug!(
                  ontology = %doc.ontology_iri,
                  import = %iri,
                  "import not in load set, treating as external"
                );
              }
              None
            }
          })
          .collect()
      })
      .collect();

    Self {
      iris: documents.iter().map(|d| d.ontology_iri.clone()).collect(),
      depends_on,
    }
  }

  /// Indices into the original document slice such that every document comes
  /// after all of the batch documents it imports. Ties keep input order.
  pub fn topological_order(&self) -> Result<Vec<usize>> {
    let n = self.iris.len();
    let mut remaining: Vec<usize> =
      self.depends_on.iter().map(BTreeSet::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, deps) in self.depends_on.iter().enumerate() {
      for &d in deps {
        dependents[d].push(i);
      }
    }

    let mut ready: VecDeque<usize> =
      (0..n).filter(|&i| remaining[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while let Some(i) = ready.pop_front() {
      order.push(i);
      for &j in &dependents[i] {
        remaining[j] -= 1;
        if remaining[j] == 0 {
          ready.push_back(j);
        }
      }
    }

    if order.len() < n {
      let placed: BTreeSet<usize> = order.into_iter().collect();
      let mut ontologies: Vec<String> = (0..n)
        .filter(|i| !placed.contains(i))
        .map(|i| self.iris[i].clone())
        .collect();
      ontologies.sort();
      return Err(Error::ImportCycle { ontologies });
    }

    Ok(order)
  }
}

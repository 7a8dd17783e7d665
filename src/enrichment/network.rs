//! Reference networks of feature sets.
//!
//! A network is a relation of `(source, target)` pairs where the source names a
//! reference set and the target is one of its features. Identifiers are
//! interned to dense indices and membership is stored as a CSR matrix with one
//! row per source and one column per feature.

use std::collections::HashMap;

use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::enrichment::utils::{getset, set_sizes};

#[derive(Debug, Clone)]
pub struct Network {
    sources: Vec<String>,
    source_index: HashMap<String, usize>,
    features: Vec<String>,
    feature_index: HashMap<String, usize>,
    membership: CsrMatrix<u32>,
}

impl Network {
    /// Build a network from `(source, target)` pairs.
    ///
    /// Sources and features keep the order of their first appearance. Repeated
    /// pairs are collapsed into a single edge.
    pub fn from_pairs<I, S, F>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
        S: AsRef<str>,
        F: AsRef<str>,
    {
        let mut sources = Vec::new();
        let mut source_index: HashMap<String, usize> = HashMap::new();
        let mut features = Vec::new();
        let mut feature_index: HashMap<String, usize> = HashMap::new();
        let mut edges = Vec::new();

        for (source, target) in pairs {
            let s = intern(source.as_ref(), &mut sources, &mut source_index);
            let f = intern(target.as_ref(), &mut features, &mut feature_index);
            edges.push((s, f));
        }

        let mut coo = CooMatrix::new(sources.len(), features.len());
        for (s, f) in edges {
            coo.push(s, f, 1u32);
        }
        // duplicate entries are summed, leaving one sorted column per feature
        let membership = CsrMatrix::from(&coo);

        log::debug!(
            "network - {} sources, {} features, {} edges",
            sources.len(),
            features.len(),
            membership.nnz()
        );

        Network {
            sources,
            source_index,
            features,
            feature_index,
            membership,
        }
    }

    pub fn n_sources(&self) -> usize {
        self.sources.len()
    }

    /// Number of distinct targets observed across the whole network.
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Number of distinct `(source, target)` edges.
    pub fn n_edges(&self) -> usize {
        self.membership.nnz()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn source_index(&self, name: &str) -> Option<usize> {
        self.source_index.get(name).copied()
    }

    pub fn feature_index(&self, name: &str) -> Option<usize> {
        self.feature_index.get(name).copied()
    }

    /// Sorted feature indices belonging to source `source_idx`.
    ///
    /// # Panics
    /// Panics if `source_idx >= self.n_sources()`.
    pub fn targets(&self, source_idx: usize) -> &[usize] {
        getset(
            self.membership.col_indices(),
            self.membership.row_offsets(),
            source_idx,
        )
    }

    /// Feature names of a source, or `None` if the source is unknown.
    pub fn target_names(&self, source: &str) -> Option<Vec<&str>> {
        let idx = self.source_index(source)?;
        Some(
            self.targets(idx)
                .iter()
                .map(|&f| self.features[f].as_str())
                .collect(),
        )
    }

    /// Number of distinct targets per source, in source order.
    pub fn source_sizes(&self) -> Vec<usize> {
        set_sizes(self.membership.row_offsets())
    }

    /// Iterate over the distinct edges as `(source, target)` names.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        (0..self.n_sources()).flat_map(move |s| self.source_edges(s))
    }

    fn source_edges(&self, source_idx: usize) -> impl Iterator<Item = (&str, &str)> + '_ {
        let source = self.sources[source_idx].as_str();
        self.targets(source_idx)
            .iter()
            .map(move |&f| (source, self.features[f].as_str()))
    }

    /// Keep only sources with at least `tmin` distinct targets.
    ///
    /// The feature universe is rebuilt from the surviving edges, so targets
    /// only reachable through removed sources disappear as well. Pruning every
    /// source away yields an empty network.
    pub fn prune(&self, tmin: usize) -> Network {
        let sizes = self.source_sizes();
        let kept = (0..self.n_sources())
            .filter(|&s| sizes[s] >= tmin)
            .flat_map(|s| self.source_edges(s));
        let pruned = Network::from_pairs(kept);

        if pruned.is_empty() {
            log::warn!(
                "prune - no sources with at least tmin={} targets, network is empty",
                tmin
            );
        } else {
            log::debug!(
                "prune - kept {} of {} sources with tmin={}",
                pruned.n_sources(),
                self.n_sources(),
                tmin
            );
        }
        pruned
    }
}

fn intern(name: &str, names: &mut Vec<String>, index: &mut HashMap<String, usize>) -> usize {
    if let Some(&idx) = index.get(name) {
        return idx;
    }
    let idx = names.len();
    names.push(name.to_owned());
    index.insert(name.to_owned(), idx);
    idx
}

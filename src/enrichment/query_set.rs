//! Over-representation of a query feature set across the sources of a network.
//!
//! Every source is summarised as a 2x2 contingency table against the query,
//! scored with a continuity-corrected log odds ratio and a one-sided Fisher
//! exact test, and the p-values of all sources are corrected together with
//! Benjamini-Hochberg.

use anyhow::Result;
use ndarray::Array2;
use rayon::prelude::*;

use crate::enrichment::network::Network;
use crate::error::ValidationError;
use crate::testing::Alternative;
use crate::testing::correction::correct_pvalues;
use crate::testing::inference::{ContingencyTable, fisher_exact_test, log_odds_ratio};

/// Size of the feature universe the contingency tables are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    /// Every table sums to this many features.
    Fixed(u64),
    /// The universe is every feature of the network plus the query features
    /// the network does not know about.
    Derived,
}

impl Background {
    /// Build a background from an optional size.
    ///
    /// `None` and `Some(0.0)` select [`Background::Derived`]; any other size is
    /// fixed, with fractional sizes truncated (`0.5` is a fixed background of 0).
    ///
    /// # Errors
    /// [`ValidationError::InvalidBackground`] for negative, NaN or infinite
    /// sizes.
    pub fn new(n_bg: Option<f64>) -> Result<Self> {
        match n_bg {
            None => Ok(Background::Derived),
            Some(value) if !value.is_finite() || value < 0.0 => {
                Err(ValidationError::InvalidBackground { value }.into())
            }
            Some(value) if value == 0.0 => Ok(Background::Derived),
            Some(value) => Ok(Background::Fixed(value.trunc() as u64)),
        }
    }
}

/// Parameters for [`query_set`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySetConfig {
    /// Universe size; `None` derives it from the network.
    pub background: Option<f64>,
    /// Haldane-Anscombe correction added to every cell of the table.
    pub ha_corr: f64,
    /// Minimum number of targets a source needs to be tested.
    pub tmin: usize,
}

impl Default for QuerySetConfig {
    fn default() -> Self {
        QuerySetConfig {
            background: Some(20_000.0),
            ha_corr: 0.5,
            tmin: 5,
        }
    }
}

impl QuerySetConfig {
    pub fn with_background(mut self, background: Option<f64>) -> Self {
        self.background = background;
        self
    }

    pub fn with_ha_corr(mut self, ha_corr: f64) -> Self {
        self.ha_corr = ha_corr;
        self
    }

    pub fn with_tmin(mut self, tmin: usize) -> Self {
        self.tmin = tmin;
        self
    }
}

/// Enrichment of the query in one source.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentResult {
    pub source: String,
    /// Natural log of the continuity-corrected odds ratio.
    pub statistic: f64,
    /// One-sided Fisher exact test p-value.
    pub p_value: f64,
    /// Benjamini-Hochberg adjusted p-value across all tested sources.
    pub adjusted_p_value: f64,
    /// The table both scores were computed from.
    pub table: ContingencyTable,
}

impl EnrichmentResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.adjusted_p_value < alpha
    }
}

/// Query membership over the network's feature indices.
struct QueryMask {
    in_query: Vec<bool>,
    n_known: usize,
    n_unknown: usize,
}

impl QueryMask {
    fn new<Q, I>(query: Q, network: &Network) -> Self
    where
        Q: IntoIterator<Item = I>,
        I: AsRef<str>,
    {
        let mut in_query = vec![false; network.n_features()];
        let mut n_known = 0;
        let mut unknown = std::collections::HashSet::new();

        for feature in query {
            let feature = feature.as_ref();
            match network.feature_index(feature) {
                Some(idx) if !in_query[idx] => {
                    in_query[idx] = true;
                    n_known += 1;
                }
                Some(_) => {}
                None => {
                    unknown.insert(feature.to_owned());
                }
            }
        }

        QueryMask {
            in_query,
            n_known,
            n_unknown: unknown.len(),
        }
    }

    fn len(&self) -> usize {
        self.n_known + self.n_unknown
    }
}

/// Test the overlap of `query` with every source of an already pruned network.
///
/// For each source the table counts `a` query features in the source, `b`
/// source features outside the query, `c` query features outside the source
/// and `d` the remaining features of the background. The statistic is
/// `ln((a+k)(d+k) / ((b+k)(c+k)))` with `k = ha_corr` and the p-value tests
/// for over-representation. Results are sorted by adjusted p-value, then raw
/// p-value; ties keep the network's source order.
///
/// An empty network gives an empty result.
///
/// # Errors
/// - [`ValidationError::InvalidContinuityCorrection`] if `ha_corr` is negative
///   or not finite.
/// - [`ValidationError::BackgroundTooSmall`] if a fixed background cannot hold
///   the features observed for some source. No results are returned in that
///   case.
///
/// # Example
/// ```
/// use single_enrichment::enrichment::{Background, Network, enrichment_test};
///
/// let net = Network::from_pairs([("T1", "G1"), ("T1", "G2"), ("T2", "G3")]);
/// let results = enrichment_test(["G1", "G2"], &net, Background::Fixed(100), 0.5).unwrap();
/// assert_eq!(results[0].source, "T1");
/// assert_eq!(results[0].table.a, 2);
/// ```
pub fn enrichment_test<Q, I>(
    query: Q,
    network: &Network,
    background: Background,
    ha_corr: f64,
) -> Result<Vec<EnrichmentResult>>
where
    Q: IntoIterator<Item = I>,
    I: AsRef<str>,
{
    if !ha_corr.is_finite() || ha_corr < 0.0 {
        return Err(ValidationError::InvalidContinuityCorrection { value: ha_corr }.into());
    }

    let mask = QueryMask::new(query, network);
    if network.is_empty() {
        log::debug!("enrichment_test - empty network, nothing to test");
        return Ok(Vec::new());
    }

    log::debug!(
        "enrichment_test - query of {} features ({} outside the network) against {} sources",
        mask.len(),
        mask.n_unknown,
        network.n_sources()
    );

    let scored = (0..network.n_sources())
        .into_par_iter()
        .map(|s| {
            let table = contingency_table(network, s, &mask, background)?;
            let statistic = log_odds_ratio(&table, ha_corr);
            let p_value = fisher_exact_test(&table, Alternative::Greater).p_value;
            Ok((s, table, statistic, p_value))
        })
        .collect::<Result<Vec<_>, ValidationError>>()?;

    let p_values: Vec<f64> = scored.iter().map(|&(_, _, _, p)| p).collect();
    let p_matrix = Array2::from_shape_vec((1, p_values.len()), p_values)?;
    let adjusted = correct_pvalues(p_matrix.view())?;

    let mut results: Vec<EnrichmentResult> = scored
        .into_iter()
        .zip(adjusted.row(0))
        .map(|((s, table, statistic, p_value), &adjusted_p_value)| EnrichmentResult {
            source: network.sources()[s].clone(),
            statistic,
            p_value,
            adjusted_p_value,
            table,
        })
        .collect();

    results.sort_by(|x, y| {
        x.adjusted_p_value
            .total_cmp(&y.adjusted_p_value)
            .then(x.p_value.total_cmp(&y.p_value))
    });

    Ok(results)
}

fn contingency_table(
    network: &Network,
    source_idx: usize,
    mask: &QueryMask,
    background: Background,
) -> Result<ContingencyTable, ValidationError> {
    let targets = network.targets(source_idx);
    let a = targets.iter().filter(|&&f| mask.in_query[f]).count();
    let b = targets.len() - a;
    let c = mask.len() - a;

    let d = match background {
        Background::Fixed(total) => {
            let observed = (a + b + c) as u64;
            if total < observed {
                return Err(ValidationError::BackgroundTooSmall {
                    source_name: network.sources()[source_idx].clone(),
                    background: total,
                    observed,
                });
            }
            total - observed
        }
        // network features in neither the source nor the query
        Background::Derived => (network.n_features() - targets.len() - (mask.n_known - a)) as u64,
    };

    Ok(ContingencyTable::new(a as u64, b as u64, c as u64, d))
}

/// Prune `network` to sources with at least `config.tmin` targets and test
/// the overlap of `query` with each of them.
///
/// # Errors
/// Fails on an invalid background size or continuity correction; see
/// [`Background::new`] and [`enrichment_test`].
pub fn query_set<Q, I>(
    query: Q,
    network: &Network,
    config: &QuerySetConfig,
) -> Result<Vec<EnrichmentResult>>
where
    Q: IntoIterator<Item = I>,
    I: AsRef<str>,
{
    let background = Background::new(config.background)?;
    if background == Background::Derived {
        log::info!(
            "query_set - not using a fixed background, a feature specific background will be used instead"
        );
    }

    let pruned = network.prune(config.tmin);
    enrichment_test(query, &pruned, background, config.ha_corr)
}

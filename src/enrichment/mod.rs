//! Feature set over-representation analysis.
//!
//! A query feature set is tested against every source of a reference
//! [`Network`] with a 2x2 contingency table per source, a continuity-corrected
//! log odds ratio and a one-sided Fisher exact test. Raw p-values are corrected
//! with [`crate::testing::correction::correct_pvalues`].
//!
//! ## Quick Example
//!
//! ```rust
//! use single_enrichment::enrichment::{Network, QuerySetConfig, query_set};
//!
//! let net = Network::from_pairs([
//!     ("TF1", "A"), ("TF1", "B"), ("TF1", "C"),
//!     ("TF2", "C"), ("TF2", "D"), ("TF2", "E"),
//! ]);
//! let config = QuerySetConfig::default().with_tmin(3);
//! let results = query_set(["A", "B"], &net, &config).unwrap();
//! assert_eq!(results[0].source, "TF1");
//! ```

pub mod network;
mod query_set;
pub(crate) mod utils;

pub use network::Network;
pub use query_set::{Background, EnrichmentResult, QuerySetConfig, enrichment_test, query_set};

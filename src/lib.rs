//! # single-enrichment
//!
//! Multiple testing correction and feature set over-representation scoring, part of the
//! single-rust ecosystem.
//!
//! The crate provides the two numerical primitives of an enrichment workflow: Benjamini-Hochberg
//! correction of p-value matrices, applied to every row in parallel, and over-representation
//! scoring of a query feature set against a network of reference sets.
//!
//! ## Core Features
//!
//! - **Multiple Testing Correction**: row-wise Benjamini-Hochberg FDR on `ndarray` matrices
//! - **Exact Tests**: Fisher's exact test and continuity-corrected odds ratios on 2x2 tables
//! - **Over-Representation Analysis**: query sets scored against every source of a network
//!
//! ## Quick Start
//!
//! ```rust
//! use ndarray::array;
//! use single_enrichment::testing::correction::correct_pvalues;
//!
//! let ps = array![[0.01f64, 0.02, 0.03, 0.50], [0.2, 0.4, 0.6, 0.8]];
//! let adjusted = correct_pvalues(ps.view()).unwrap();
//! assert_eq!(adjusted.dim(), (2, 4));
//! ```
//!
//! ## Module Organization
//!
//! - **[`testing`]**: Multiple testing correction and exact tests on contingency tables
//! - **[`enrichment`]**: Reference networks and over-representation analysis
//! - **[`error`]**: Validation errors shared by all entry points

pub mod enrichment;
pub mod error;
pub mod testing;

pub use error::ValidationError;

//! BBFS ("Bolak-Balik Full Set") combination engine.
//!
//! A seed of digits is summarized into a [`DigitMultiset`], from which the
//! generators build every fixed-length combination: distinct-digit ones
//! (single) and ones that reuse a digit up to the number of times it was
//! supplied (twin). Everything here is a pure function of its arguments;
//! degenerate input gives an empty result rather than an error.

pub mod calculator;
pub mod classify;
pub mod config;
pub mod digits;
pub mod dimension;
pub mod export;
pub mod filter;
pub mod permutation;
pub mod pricing;

pub use calculator::{compute_bbfs, compute_poltar, BbfsResults, DimensionResults, Memo};
pub use classify::{classify, Class};
pub use digits::{analyze, signature, DigitMultiset};
pub use dimension::Dimension;
pub use permutation::{generate_single, generate_twin, TWIN_MAX_DIMENSION};

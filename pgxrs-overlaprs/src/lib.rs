//! Gene region lookup for pgxrs.
//!
//! The variant extractor asks one question of this crate for every record it
//! streams: which panel genes, if any, contain this (chromosome, position)?
//! The answer comes from a per-chromosome [`Bits`] index built once from the
//! [`GenePanel`](pgxrs_core::models::GenePanel) and shared read-only.

/// Binary Interval Search implementation.
///
/// See [`Bits`] for details.
pub mod bits;

/// Panel-wide gene region index.
///
/// See [`GeneRegionIndex`] for details.
pub mod gene_index;

/// Core traits for overlap operations.
///
/// See [`Overlapper`] for the main trait.
pub mod traits;

// re-exports
pub use self::bits::Bits;
pub use self::gene_index::GeneRegionIndex;
pub use self::traits::{Interval, Overlapper};

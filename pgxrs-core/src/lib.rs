//! # pgxrs-core
//!
//! Data model shared by every stage of the pgxrs analysis pipeline: the gene
//! panel, genomic regions, extracted variants and the per-stage outputs
//! (allele calls, phenotype calls, interactions, recommendations,
//! explanations) that are finally merged into one [`models::Report`].
//!
//! Every value here is produced once by the stage that owns it and is never
//! mutated by a later stage.

pub mod errors;
pub mod models;
pub mod utils;

pub use errors::PanelError;

//! # pgxrs
//!
//! Pharmacogenomic drug-gene risk reports from VCF files. Each module is a
//! member crate of the workspace, enabled by the cargo feature of the same name.
//!
//! The `pipeline` feature (on by default) pulls in everything needed to go
//! from a VCF file to a validated [`Report`](core::models::Report).

#[cfg(feature = "core")]
#[doc(inline)]
pub use pgxrs_core as core;

#[cfg(feature = "overlaprs")]
#[doc(inline)]
pub use pgxrs_overlaprs as overlaprs;

#[cfg(feature = "vcf")]
#[doc(inline)]
pub use pgxrs_vcf as vcf;

#[cfg(feature = "catalog")]
#[doc(inline)]
pub use pgxrs_catalog as catalog;

#[cfg(feature = "narrative")]
#[doc(inline)]
pub use pgxrs_narrative as narrative;

#[cfg(feature = "pipeline")]
#[doc(inline)]
pub use pgxrs_pipeline as pipeline;

#[cfg(feature = "pipeline")]
pub mod prelude {
    pub use pgxrs_catalog::Catalog;
    pub use pgxrs_core::models::Report;
    pub use pgxrs_pipeline::{AnalysisError, AnalysisRequest, Analyzer, ErrorClass, PipelineConfig};
    pub use pgxrs_vcf::{FsUploadStore, MemoryUploadStore, UploadHandle, UploadStore};
}

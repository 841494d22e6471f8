//! # Panel-gene variant extraction
//!
//! Reads VCF text (plain or gzip) and keeps the alternate alleles that fall
//! inside a gene of the analysed panel. Malformed lines never abort a run:
//! they are logged, quarantined and skipped.
//!
//! ```no_run
//! use pgxrs_core::models::{GenePanel, GeneSpec};
//! use pgxrs_overlaprs::GeneRegionIndex;
//! use pgxrs_vcf::{ExtractionConfig, FsUploadStore, UploadHandle, UploadStore, VariantExtractor};
//!
//! # fn run(panel: GenePanel) -> Result<(), Box<dyn std::error::Error>> {
//! let index = GeneRegionIndex::from_panel(&panel);
//! let store = FsUploadStore::new("uploads");
//! let stream = store.open(&UploadHandle::from("patient.vcf.gz"))?;
//! let extraction = VariantExtractor::new(&index, ExtractionConfig::default()).extract(stream)?;
//! println!("{} variants on target", extraction.variants.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod models;
pub mod store;
pub mod vcf;

pub use error::{ExtractError, MalformedRecord, StoreError};
pub use extract::VariantExtractor;
pub use models::{Extraction, ExtractionConfig, ExtractionStats, ExtractionStatus, QuarantinedRecord};
pub use store::{FsUploadStore, MemoryUploadStore, UploadHandle, UploadStore, VariantStream};

//! # Pharmacogenomic analysis pipeline
//!
//! Wires the stages together: variant extraction, allele matching, phenotype
//! resolution, risk classification, recommendations, narratives, report
//! assembly and the validation gate.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use pgxrs_pipeline::{AnalysisRequest, Analyzer};
//! use pgxrs_vcf::{FsUploadStore, UploadHandle};
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(FsUploadStore::new("uploads"));
//! let analyzer = Analyzer::from_paths(None, None, store)?;
//! let request = AnalysisRequest::new().with_drugs(["CODEINE", "WARFARIN"]);
//! let report = analyzer.analyze(&UploadHandle::from("patient.vcf.gz"), &request)?;
//! println!("{}", report.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod assemble;
pub mod classifier;
pub mod config;
pub mod error;
pub mod gate;
pub mod matcher;
pub mod recommend;
pub mod resolver;

pub use analyzer::{AnalysisRequest, Analyzer, UNKNOWN_SUBJECT};
pub use assemble::{ReportParts, assemble};
pub use classifier::{classify, select_drugs};
pub use config::PipelineConfig;
pub use error::{AnalysisError, AnalysisResult, ConfigError, ContractViolation, ErrorClass};
pub use gate::ValidationGate;
pub use matcher::{AlleleMatch, Candidate, call_alleles, match_gene};
pub use recommend::{NO_GUIDELINE, build_recommendations, generic_recommendation};
pub use resolver::resolve_phenotypes;

//! # Pharmacogenomic reference catalogs
//!
//! A [`Catalog`] bundles everything the analysis stages look up: the gene
//! panel, allele signatures, the diplotype to phenotype table, the drug to
//! gene table, the risk matrix and the recommendation templates.
//!
//! Catalogs are plain data files (`toml` or `yaml`). Updating clinical
//! guidance means shipping a new catalog version, not changing code.
//!
//! ```
//! use pgxrs_catalog::Catalog;
//! use pgxrs_core::models::PhenotypeLabel;
//!
//! let catalog = Catalog::embedded().unwrap();
//! let tpmt = catalog.panel().get("TPMT").unwrap();
//! let row = catalog.phenotype(tpmt, "*3A", "*3A").unwrap();
//! assert_eq!(row.label, PhenotypeLabel::Poor);
//! ```

pub mod catalog;
pub mod config;
pub mod error;

pub use catalog::{
    AlleleDefinition, Catalog, DIRECTIVE_KEYWORDS, DOSING_KEYWORDS, Drug, PhenotypeRow, RiskRow,
    Template, has_directive, has_dosing_guidance,
};
pub use config::{CatalogConfig, CatalogInputFileType, SignatureElement};
pub use error::{CatalogError, CatalogResult};

/// Source of the catalog compiled into the crate.
pub const DEFAULT_CATALOG: &str = include_str!("../catalog/default.toml");

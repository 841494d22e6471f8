//! Output of the extraction stage.

use serde::Deserialize;

use pgxrs_core::models::Variant;

use crate::error::MalformedRecord;

/// Extraction settings, the `[extraction]` table of a pipeline config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Drop records whose FILTER is anything but `PASS`
    pub require_pass: bool,
    /// Drop records with QUAL below this value. Records without QUAL are kept.
    pub min_quality: Option<f64>,
    /// Upper bound on quarantined records kept for inspection; the count is always exact
    pub max_quarantined: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        ExtractionConfig {
            require_pass: false,
            min_quality: None,
            max_quarantined: 100,
        }
    }
}

/// Whether any panel gene produced a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    Matched,
    /// The whole stream was read and nothing hit a panel gene. Not an error.
    NoTargetVariants,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    /// Data lines seen, malformed ones included
    pub records: usize,
    pub malformed: usize,
    /// Parsed records outside every panel gene
    pub off_target: usize,
    /// Records dropped by `require_pass` / `min_quality`
    pub filtered: usize,
    /// On-target records where the sample carries no alternate allele
    pub no_evidence: usize,
    /// Variants emitted
    pub retained: usize,
}

/// A line that could not be parsed, kept with its 1-based line number.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarantinedRecord {
    pub line: usize,
    pub reason: MalformedRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// First sample column of the `#CHROM` header
    pub sample_id: Option<String>,
    pub variants: Vec<Variant>,
    pub status: ExtractionStatus,
    pub stats: ExtractionStats,
    pub quarantine: Vec<QuarantinedRecord>,
}

use std::fmt::{self, Display};

use crate::models::GeneTarget;

/// FILTER column of a variant record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterStatus {
    Pass,
    /// `.`, no filters were applied
    Missing,
    /// Any other value, e.g. `LowQual;q10`
    Failed(String),
}

impl FilterStatus {
    pub fn parse(field: &str) -> Self {
        match field.trim() {
            "PASS" => FilterStatus::Pass,
            "." | "" => FilterStatus::Missing,
            other => FilterStatus::Failed(other.to_string()),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, FilterStatus::Pass)
    }
}

/// Copy number of the alternate allele in the sample, read from `GT`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zygosity {
    Heterozygous,
    Homozygous,
    /// No sample column, or no `GT` key in FORMAT. A haploid call counts as homozygous.
    Unknown,
}

///
/// One alternate allele observed inside a panel gene.
///
/// Positions are 1-based, exactly as they appear in the variant file.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Variant {
    pub chromosome: String,
    pub position: u32,
    pub reference_allele: String,
    pub alternate_allele: String,
    pub gene: GeneTarget,
    /// dbSNP identifier, lower-cased (`rs3892097`)
    pub external_id: Option<String>,
    pub quality: Option<f64>,
    pub filter_status: FilterStatus,
    pub zygosity: Zygosity,
}

impl Variant {
    /// `true` when this variant is the given position/alternate on its gene.
    pub fn is_at(&self, position: u32, alternate_allele: &str) -> bool {
        self.position == position && self.alternate_allele.eq_ignore_ascii_case(alternate_allele)
    }

    pub fn has_external_id(&self, id: &str) -> bool {
        self.external_id
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(id))
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} {}>{} ({})",
            self.chromosome, self.position, self.reference_allele, self.alternate_allele, self.gene
        )
    }
}

use serde::Serialize;

use crate::models::GeneTarget;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

///
/// The diplotype called for one gene: two named alleles and how sure the
/// matcher is about them.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlleleCall {
    pub gene: GeneTarget,
    pub allele1: String,
    pub allele2: String,
    /// `allele1/allele2`, e.g. `*1/*4`
    pub notation: String,
    pub confidence: Confidence,
}

impl AlleleCall {
    pub fn new(gene: GeneTarget, allele1: &str, allele2: &str, confidence: Confidence) -> Self {
        AlleleCall {
            gene,
            notation: diplotype_notation(allele1, allele2),
            allele1: allele1.to_string(),
            allele2: allele2.to_string(),
            confidence,
        }
    }

    /// Reference/reference call, used whenever a gene has no variant evidence.
    pub fn wild_type(gene: GeneTarget, reference_allele: &str) -> Self {
        AlleleCall::new(gene, reference_allele, reference_allele, Confidence::High)
    }
}

pub fn diplotype_notation(allele1: &str, allele2: &str) -> String {
    format!("{allele1}/{allele2}")
}

/// Split `*1/*4` into its two alleles. Anything without exactly one `/` is `None`.
pub fn split_diplotype(notation: &str) -> Option<(&str, &str)> {
    let (a, b) = notation.split_once('/')?;
    let (a, b) = (a.trim(), b.trim());
    if a.is_empty() || b.is_empty() || b.contains('/') {
        return None;
    }
    Some((a, b))
}

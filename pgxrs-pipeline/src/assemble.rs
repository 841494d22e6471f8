use chrono::{DateTime, Utc};
use fxhash::FxHashMap;

use pgxrs_core::models::{Explanation, GeneTarget, Interaction, PhenotypeCall, Recommendation, Report};

use crate::error::ContractViolation;

/// Stage outputs of one analysis, ready to be merged.
#[derive(Debug, Clone)]
pub struct ReportParts {
    pub subject_id: String,
    pub analysis_date: DateTime<Utc>,
    pub genes: Vec<PhenotypeCall>,
    pub interactions: Vec<Interaction>,
    pub recommendations: Vec<Recommendation>,
    pub explanations: Vec<Explanation>,
}

type Key = (GeneTarget, String);

/// Index entries by (gene, drug); a key seen twice is a contract violation.
fn index_by_key<T>(
    entries: Vec<T>,
    kind: &'static str,
    key: impl Fn(&T) -> Key,
) -> Result<FxHashMap<Key, T>, ContractViolation> {
    let mut indexed = FxHashMap::default();
    for entry in entries {
        let k = key(&entry);
        if indexed.contains_key(&k) {
            return Err(ContractViolation::Unpaired {
                kind,
                gene: k.0.to_string(),
                drug: k.1,
            });
        }
        indexed.insert(k, entry);
    }
    Ok(indexed)
}

///
/// Merge stage outputs into a [`Report`].
///
/// Recommendations and explanations are paired 1:1 with interactions by
/// (gene, drug) and re-ordered to interaction order. A missing, duplicated or
/// left-over entry rejects the whole report.
///
pub fn assemble(parts: ReportParts) -> Result<Report, ContractViolation> {
    let mut recommendations = index_by_key(parts.recommendations, "recommendation", |r| {
        (r.gene.clone(), r.drug.clone())
    })?;
    let mut explanations = index_by_key(parts.explanations, "explanation", |e| {
        (e.gene.clone(), e.drug.clone())
    })?;

    let mut paired_recommendations = Vec::with_capacity(parts.interactions.len());
    let mut paired_explanations = Vec::with_capacity(parts.interactions.len());
    for interaction in parts.interactions.iter() {
        let key = (interaction.gene.clone(), interaction.drug.clone());
        let recommendation =
            recommendations
                .remove(&key)
                .ok_or_else(|| ContractViolation::MissingRecommendation {
                    gene: interaction.gene.to_string(),
                    drug: interaction.drug.clone(),
                })?;
        let explanation =
            explanations
                .remove(&key)
                .ok_or_else(|| ContractViolation::MissingExplanation {
                    gene: interaction.gene.to_string(),
                    drug: interaction.drug.clone(),
                })?;
        paired_recommendations.push(recommendation);
        paired_explanations.push(explanation);
    }

    if let Some(((gene, drug), _)) = recommendations.into_iter().next() {
        return Err(ContractViolation::Unpaired {
            kind: "recommendation",
            gene: gene.to_string(),
            drug,
        });
    }
    if let Some(((gene, drug), _)) = explanations.into_iter().next() {
        return Err(ContractViolation::Unpaired {
            kind: "explanation",
            gene: gene.to_string(),
            drug,
        });
    }

    Ok(Report {
        subject_id: parts.subject_id,
        analysis_timestamp: parts.analysis_date,
        genes: parts.genes,
        interactions: parts.interactions,
        recommendations: paired_recommendations,
        explanations: paired_explanations,
    })
}

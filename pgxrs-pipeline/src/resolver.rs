use tracing::info;

use pgxrs_catalog::Catalog;
use pgxrs_core::models::{AlleleCall, PhenotypeCall, PhenotypeLabel};

/// Phenotype of every call, by exact (unordered) diplotype lookup.
/// A diplotype missing from the catalog is `Unknown Metabolizer` with no score.
pub fn resolve_phenotypes(catalog: &Catalog, calls: &[AlleleCall]) -> Vec<PhenotypeCall> {
    calls
        .iter()
        .map(|call| match catalog.phenotype(&call.gene, &call.allele1, &call.allele2) {
            Some(row) => PhenotypeCall {
                gene: call.gene.clone(),
                diplotype_notation: call.notation.clone(),
                phenotype_label: row.label,
                activity_score: row.activity_score,
            },
            None => {
                info!(
                    gene = call.gene.symbol(),
                    diplotype = call.notation.as_str(),
                    "diplotype not in phenotype table"
                );
                PhenotypeCall {
                    gene: call.gene.clone(),
                    diplotype_notation: call.notation.clone(),
                    phenotype_label: PhenotypeLabel::Unknown,
                    activity_score: None,
                }
            }
        })
        .collect()
}

use tracing::{debug, warn};

use pgxrs_catalog::{Catalog, Drug};
use pgxrs_core::models::{EvidenceTier, Interaction, PhenotypeCall, PhenotypeLabel, RiskTier};

///
/// Drugs in scope for a request.
///
/// An empty request means the whole catalog, in catalog order. Otherwise the
/// requested order is kept, names are matched case-insensitively, duplicates
/// collapse and drugs unknown to the catalog are dropped with a warning.
///
pub fn select_drugs<'c>(catalog: &'c Catalog, requested: &[String]) -> Vec<&'c Drug> {
    let requested: Vec<&str> = requested
        .iter()
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .collect();
    if requested.is_empty() {
        return catalog.drugs().iter().collect();
    }

    let mut selected: Vec<&Drug> = Vec::with_capacity(requested.len());
    for name in requested {
        match catalog.drug(name) {
            Some(drug) if selected.iter().any(|d| d.name == drug.name) => {}
            Some(drug) => selected.push(drug),
            None => warn!(drug = name, "requested drug is not in the catalog, skipping"),
        }
    }
    selected
}

/// Exactly one interaction per (drug, gene) pair in scope.
/// A pair without a risk row is `no_known_interaction` with evidence `none`.
pub fn classify(catalog: &Catalog, phenotypes: &[PhenotypeCall], drugs: &[&Drug]) -> Vec<Interaction> {
    let mut interactions = Vec::new();
    for drug in drugs {
        for gene in drug.genes.iter() {
            let label = phenotypes
                .iter()
                .find(|p| &p.gene == gene)
                .map_or(PhenotypeLabel::Unknown, |p| p.phenotype_label);

            let (risk_tier, evidence_tier) = match catalog.risk(&drug.name, gene, label) {
                Some(row) => (row.risk_tier, row.evidence_tier),
                None => {
                    debug!(
                        drug = drug.name.as_str(),
                        gene = gene.symbol(),
                        phenotype = label.as_str(),
                        "no risk row, no known interaction"
                    );
                    (RiskTier::None, EvidenceTier::None)
                }
            };

            interactions.push(Interaction {
                gene: gene.clone(),
                drug: drug.name.clone(),
                risk_tier,
                phenotype_label: label,
                evidence_tier,
            });
        }
    }
    interactions
}

use tracing::warn;

use pgxrs_catalog::Catalog;
use pgxrs_core::models::{Interaction, Recommendation, RiskTier, Strength};

/// Guideline reference of a substituted recommendation.
pub const NO_GUIDELINE: &str = "none";

/// One recommendation per interaction, in interaction order.
pub fn build_recommendations(catalog: &Catalog, interactions: &[Interaction]) -> Vec<Recommendation> {
    interactions
        .iter()
        .map(|interaction| {
            match catalog.template(
                &interaction.drug,
                &interaction.gene,
                interaction.risk_tier,
                interaction.phenotype_label,
            ) {
                Some(template) => Recommendation {
                    gene: interaction.gene.clone(),
                    drug: interaction.drug.clone(),
                    risk_tier: interaction.risk_tier,
                    text: template.text.clone(),
                    strength: template.strength,
                    guideline_reference: template.guideline_reference.clone(),
                    alternatives: template.alternatives.clone(),
                },
                None => {
                    warn!(
                        drug = interaction.drug.as_str(),
                        gene = interaction.gene.symbol(),
                        tier = interaction.risk_tier.as_str(),
                        "no recommendation template, substituting generic guidance"
                    );
                    generic_recommendation(interaction)
                }
            }
        })
        .collect()
}

/// Insufficient-data statement that still honors the wording rules of its tier.
pub fn generic_recommendation(interaction: &Interaction) -> Recommendation {
    let drug = interaction.drug.to_ascii_lowercase();
    let gene = &interaction.gene;
    let (text, strength) = match interaction.risk_tier {
        RiskTier::High => (
            format!(
                "Insufficient guideline data for {drug} with this {gene} phenotype. \
                 Because the predicted risk is high, avoid {drug} or switch to an alternative until the result has been reviewed by a specialist."
            ),
            Strength::Moderate,
        ),
        RiskTier::Moderate => (
            format!(
                "Insufficient guideline data for a specific {drug} dose with this {gene} phenotype. \
                 Consider a dose adjustment and monitor the response closely."
            ),
            Strength::Moderate,
        ),
        RiskTier::Low | RiskTier::None => (
            format!(
                "Insufficient guideline data for {drug} with this {gene} phenotype. \
                 Prescribe according to standard clinical practice."
            ),
            Strength::Optional,
        ),
    };

    Recommendation {
        gene: interaction.gene.clone(),
        drug: interaction.drug.clone(),
        risk_tier: interaction.risk_tier,
        text,
        strength,
        guideline_reference: NO_GUIDELINE.to_string(),
        alternatives: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pgxrs_catalog::{has_directive, has_dosing_guidance};
    use pgxrs_core::models::{EvidenceTier, PhenotypeLabel};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalog() -> Catalog {
        Catalog::embedded().unwrap()
    }

    fn interaction(catalog: &Catalog, drug: &str, gene: &str, tier: RiskTier, label: PhenotypeLabel) -> Interaction {
        Interaction {
            gene: catalog.panel().get(gene).unwrap().clone(),
            drug: drug.to_string(),
            risk_tier: tier,
            phenotype_label: label,
            evidence_tier: EvidenceTier::A,
        }
    }

    #[rstest]
    fn test_phenotype_specific_template_is_preferred(catalog: Catalog) {
        let poor = interaction(&catalog, "CODEINE", "CYP2D6", RiskTier::High, PhenotypeLabel::Poor);
        let ultra = interaction(&catalog, "CODEINE", "CYP2D6", RiskTier::High, PhenotypeLabel::Ultrarapid);
        let recs = build_recommendations(&catalog, &[poor, ultra]);
        assert!(recs[0].text.contains("lack of effect"));
        assert!(recs[1].text.contains("toxicity"));
        assert_eq!(recs[0].strength, Strength::Strong);
    }

    #[rstest]
    fn test_high_risk_is_directive(catalog: Catalog) {
        for drug in catalog.drugs() {
            for gene in drug.genes.iter() {
                let high = interaction(&catalog, &drug.name, gene.symbol(), RiskTier::High, PhenotypeLabel::Poor);
                let rec = build_recommendations(&catalog, &[high]).remove(0);
                assert!(has_directive(&rec.text), "{}: {}", drug.name, rec.text);
                assert!(matches!(rec.strength, Strength::Strong | Strength::Moderate));
            }
        }
    }

    #[rstest]
    fn test_moderate_risk_has_dosing_language(catalog: Catalog) {
        let moderate = interaction(&catalog, "FLUOROURACIL", "DPYD", RiskTier::Moderate, PhenotypeLabel::Intermediate);
        let rec = build_recommendations(&catalog, &[moderate]).remove(0);
        assert!(has_dosing_guidance(&rec.text));
        assert!(rec.guideline_reference.contains("DPYD"));
    }

    #[rstest]
    #[case(RiskTier::High)]
    #[case(RiskTier::Moderate)]
    #[case(RiskTier::Low)]
    #[case(RiskTier::None)]
    fn test_generic_substitute_follows_tier_rules(catalog: Catalog, #[case] tier: RiskTier) {
        let missing = interaction(&catalog, "CODEINE", "CYP2D6", tier, PhenotypeLabel::Unknown);
        let rec = generic_recommendation(&missing);
        assert!(!rec.text.is_empty());
        assert_eq!(rec.guideline_reference, NO_GUIDELINE);
        assert!(rec.alternatives.is_empty());
        match tier {
            RiskTier::High => {
                assert!(has_directive(&rec.text));
                assert_eq!(rec.strength, Strength::Moderate);
            }
            RiskTier::Moderate => assert!(has_dosing_guidance(&rec.text)),
            RiskTier::Low | RiskTier::None => assert_eq!(rec.strength, Strength::Optional),
        }
    }
}

//! Deterministic narratives used whenever generated text is not available.

use pgxrs_core::models::RiskTier;

use crate::prompt::NarrativeContext;

/// Fallback narrative, chosen by risk tier alone and filled in with the
/// gene, drug and phenotype of the interaction.
pub fn fallback_text(context: &NarrativeContext, max_chars: usize) -> String {
    let gene = &context.gene;
    let drug = &context.drug;
    let phenotype = context.phenotype_label;
    let text = match context.risk_tier {
        RiskTier::High => format!(
            "Your {gene} result ({phenotype}) means {drug} may not work as intended or may cause serious side effects. \
             Guidelines advise avoiding it or switching to an alternative, so talk to your prescriber before taking it."
        ),
        RiskTier::Moderate => format!(
            "Your {gene} result ({phenotype}) can change how your body handles {drug}. \
             A dose adjustment may be needed, and your prescriber can use this result to choose the right dose."
        ),
        RiskTier::Low => format!(
            "Your {gene} result ({phenotype}) is not expected to change how {drug} works for you. \
             It can usually be prescribed at the standard dose."
        ),
        RiskTier::None => format!(
            "No interaction between your {gene} result ({phenotype}) and {drug} is described in current guidelines. \
             Standard prescribing applies."
        ),
    };
    truncate_chars(text, max_chars)
}

/// Cut `text` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].trim_end().to_string(),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pgxrs_core::models::{GenePanel, GeneSpec, PhenotypeLabel};
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn context() -> NarrativeContext {
        let panel = GenePanel::new(vec![GeneSpec {
            symbol: "TPMT".to_string(),
            chromosome: "chr6".to_string(),
            start: 18128311,
            end: 18155169,
            reference_allele: "*1".to_string(),
        }])
        .unwrap();
        NarrativeContext {
            gene: panel.get("TPMT").unwrap().clone(),
            drug: "AZATHIOPRINE".to_string(),
            phenotype_label: PhenotypeLabel::Poor,
            risk_tier: RiskTier::High,
            recommendation: "Avoid azathioprine.".to_string(),
        }
    }

    #[rstest]
    #[case(RiskTier::High, "avoiding")]
    #[case(RiskTier::Moderate, "dose adjustment")]
    #[case(RiskTier::Low, "standard dose")]
    #[case(RiskTier::None, "Standard prescribing")]
    fn test_fallback_is_selected_by_tier(context: NarrativeContext, #[case] tier: RiskTier, #[case] expected: &str) {
        let context = NarrativeContext { risk_tier: tier, ..context };
        let text = fallback_text(&context, 1200);
        assert!(text.contains(expected), "{text}");
        assert!(text.contains("TPMT"));
        assert!(text.contains("AZATHIOPRINE"));
    }

    #[rstest]
    fn test_fallback_ignores_recommendation_text(context: NarrativeContext) {
        let other = NarrativeContext {
            recommendation: "Something else entirely.".to_string(),
            ..context.clone()
        };
        assert_eq!(fallback_text(&context, 1200), fallback_text(&other, 1200));
    }

    #[rstest]
    #[case("abcdef", 3, "abc")]
    #[case("abc", 3, "abc")]
    #[case("ab", 3, "ab")]
    #[case("ééé", 2, "éé")]
    fn test_truncate_chars(#[case] text: &str, #[case] max: usize, #[case] expected: &str) {
        assert_eq!(truncate_chars(text.to_string(), max), expected);
    }
}

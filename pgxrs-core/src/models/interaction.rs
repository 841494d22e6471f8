use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::models::{GeneTarget, PhenotypeLabel};

/// Severity of a drug-gene interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum RiskTier {
    #[serde(rename = "high_risk", alias = "high")]
    High,
    #[serde(rename = "moderate_risk", alias = "moderate")]
    Moderate,
    #[serde(rename = "low_risk", alias = "low")]
    Low,
    #[serde(rename = "no_known_interaction", alias = "none")]
    None,
}

impl RiskTier {
    pub const ALL: [RiskTier; 4] = [RiskTier::High, RiskTier::Moderate, RiskTier::Low, RiskTier::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::High => "high_risk",
            RiskTier::Moderate => "moderate_risk",
            RiskTier::Low => "low_risk",
            RiskTier::None => "no_known_interaction",
        }
    }
}

impl Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPIC level of evidence backing a risk tier. `None` is the floor used for lookup misses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum EvidenceTier {
    A,
    B,
    C,
    D,
    #[serde(rename = "none")]
    None,
}

impl EvidenceTier {
    pub const ALL: [EvidenceTier; 5] = [
        EvidenceTier::A,
        EvidenceTier::B,
        EvidenceTier::C,
        EvidenceTier::D,
        EvidenceTier::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceTier::A => "A",
            EvidenceTier::B => "B",
            EvidenceTier::C => "C",
            EvidenceTier::D => "D",
            EvidenceTier::None => "none",
        }
    }
}

///
/// Outcome of evaluating one (drug, gene) pair against the patient's phenotype.
/// Serialized as one entry of the report's `drug_interactions` array.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Interaction {
    #[serde(rename = "gene_name")]
    pub gene: GeneTarget,
    #[serde(rename = "drug_name")]
    pub drug: String,
    #[serde(rename = "risk_level")]
    pub risk_tier: RiskTier,
    #[serde(rename = "phenotype")]
    pub phenotype_label: PhenotypeLabel,
    #[serde(rename = "evidence_level")]
    pub evidence_tier: EvidenceTier,
}

impl Interaction {
    /// The (gene, drug) key the assembler pairs recommendations and explanations on.
    pub fn key(&self) -> (&GeneTarget, &str) {
        (&self.gene, self.drug.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[derive(Deserialize)]
    struct Row {
        tier: RiskTier,
    }

    #[rstest]
    #[case("high", RiskTier::High)]
    #[case("high_risk", RiskTier::High)]
    #[case("moderate", RiskTier::Moderate)]
    #[case("none", RiskTier::None)]
    #[case("no_known_interaction", RiskTier::None)]
    fn test_risk_tier_accepts_short_and_wire_names(#[case] raw: &str, #[case] expected: RiskTier) {
        let row: Row = serde_json::from_str(&format!("{{\"tier\": \"{raw}\"}}")).unwrap();
        assert_eq!(row.tier, expected);
    }

    #[rstest]
    fn test_risk_tier_serializes_to_wire_name() {
        for tier in RiskTier::ALL {
            assert_eq!(serde_json::to_string(&tier).unwrap(), format!("\"{}\"", tier.as_str()));
        }
    }

    #[rstest]
    fn test_evidence_tier_wire_names() {
        for tier in EvidenceTier::ALL {
            assert_eq!(serde_json::to_string(&tier).unwrap(), format!("\"{}\"", tier.as_str()));
        }
    }
}

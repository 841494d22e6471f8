use serde::{Deserialize, Serialize};

use crate::models::{GeneTarget, RiskTier};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum Strength {
    #[serde(rename = "Strong", alias = "strong")]
    Strong,
    #[serde(rename = "Moderate", alias = "moderate")]
    Moderate,
    #[serde(rename = "Optional", alias = "optional")]
    Optional,
}

impl Strength {
    pub const ALL: [Strength; 3] = [Strength::Strong, Strength::Moderate, Strength::Optional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strength::Strong => "Strong",
            Strength::Moderate => "Moderate",
            Strength::Optional => "Optional",
        }
    }
}

///
/// Clinical guidance for one interaction. Serialized as one entry of the
/// report's `recommendations` array; `risk_tier` and `guideline_reference`
/// stay internal.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Recommendation {
    #[serde(rename = "gene_name")]
    pub gene: GeneTarget,
    #[serde(rename = "drug_name")]
    pub drug: String,
    #[serde(skip)]
    pub risk_tier: RiskTier,
    #[serde(rename = "recommendation")]
    pub text: String,
    pub strength: Strength,
    #[serde(skip)]
    pub guideline_reference: String,
    pub alternatives: Vec<String>,
}

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::GeneTarget;

/// Functional classification of a diplotype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub enum PhenotypeLabel {
    #[serde(rename = "Poor Metabolizer")]
    Poor,
    #[serde(rename = "Intermediate Metabolizer")]
    Intermediate,
    #[serde(rename = "Normal Metabolizer")]
    Normal,
    #[serde(rename = "Rapid Metabolizer")]
    Rapid,
    #[serde(rename = "Ultrarapid Metabolizer")]
    Ultrarapid,
    #[serde(rename = "Unknown Metabolizer")]
    Unknown,
}

impl PhenotypeLabel {
    pub const ALL: [PhenotypeLabel; 6] = [
        PhenotypeLabel::Poor,
        PhenotypeLabel::Intermediate,
        PhenotypeLabel::Normal,
        PhenotypeLabel::Rapid,
        PhenotypeLabel::Ultrarapid,
        PhenotypeLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PhenotypeLabel::Poor => "Poor Metabolizer",
            PhenotypeLabel::Intermediate => "Intermediate Metabolizer",
            PhenotypeLabel::Normal => "Normal Metabolizer",
            PhenotypeLabel::Rapid => "Rapid Metabolizer",
            PhenotypeLabel::Ultrarapid => "Ultrarapid Metabolizer",
            PhenotypeLabel::Unknown => "Unknown Metabolizer",
        }
    }
}

impl Display for PhenotypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhenotypeLabel {
    type Err = String;

    /// Accepts the full label (`Poor Metabolizer`) or its short form (`poor`, `PM`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let short = lowered.strip_suffix(" metabolizer").unwrap_or(&lowered);
        match short {
            "poor" | "pm" => Ok(PhenotypeLabel::Poor),
            "intermediate" | "im" => Ok(PhenotypeLabel::Intermediate),
            "normal" | "nm" => Ok(PhenotypeLabel::Normal),
            "rapid" | "rm" => Ok(PhenotypeLabel::Rapid),
            "ultrarapid" | "um" => Ok(PhenotypeLabel::Ultrarapid),
            "unknown" => Ok(PhenotypeLabel::Unknown),
            _ => Err(format!("Invalid phenotype label: {s}")),
        }
    }
}

///
/// Phenotype resolved for one gene. Serialized as one entry of the report's `genes` array.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct PhenotypeCall {
    #[serde(rename = "name")]
    pub gene: GeneTarget,
    #[serde(rename = "diplotype")]
    pub diplotype_notation: String,
    #[serde(rename = "phenotype")]
    pub phenotype_label: PhenotypeLabel,
    pub activity_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Poor Metabolizer", PhenotypeLabel::Poor)]
    #[case("intermediate", PhenotypeLabel::Intermediate)]
    #[case("NM", PhenotypeLabel::Normal)]
    #[case("Ultrarapid Metabolizer", PhenotypeLabel::Ultrarapid)]
    fn test_parse_label(#[case] input: &str, #[case] expected: PhenotypeLabel) {
        assert_eq!(input.parse::<PhenotypeLabel>(), Ok(expected));
    }

    #[rstest]
    fn test_parse_rejects_invented_labels() {
        assert!("Super Metabolizer".parse::<PhenotypeLabel>().is_err());
    }

    #[rstest]
    fn test_labels_round_trip_through_display() {
        for label in PhenotypeLabel::ALL {
            assert_eq!(label.to_string().parse::<PhenotypeLabel>(), Ok(label));
        }
    }

    #[rstest]
    fn test_serialized_label_is_full_text() {
        let json = serde_json::to_string(&PhenotypeLabel::Unknown).unwrap();
        assert_eq!(json, "\"Unknown Metabolizer\"");
    }
}

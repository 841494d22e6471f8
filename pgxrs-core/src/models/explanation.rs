use serde::Serialize;

use crate::models::GeneTarget;

/// Where the text of an explanation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExplanationSource {
    Generated,
    Fallback,
}

/// How the generation request for an explanation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NarrativeOutcome {
    Completed,
    TimedOut,
    Failed,
    Cancelled,
}

impl NarrativeOutcome {
    pub fn source(&self) -> ExplanationSource {
        match self {
            NarrativeOutcome::Completed => ExplanationSource::Generated,
            _ => ExplanationSource::Fallback,
        }
    }
}

///
/// Plain-language narrative for one interaction. Serialized as one entry of the
/// report's `explanations` array; the source and outcome stay internal.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Explanation {
    #[serde(rename = "gene_name")]
    pub gene: GeneTarget,
    #[serde(rename = "drug_name")]
    pub drug: String,
    #[serde(rename = "explanation")]
    pub text: String,
    #[serde(skip)]
    pub source: ExplanationSource,
    #[serde(skip)]
    pub outcome: NarrativeOutcome,
}

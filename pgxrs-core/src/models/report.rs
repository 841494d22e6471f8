use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Explanation, Interaction, PhenotypeCall, Recommendation};

///
/// The complete result of one analysis.
///
/// Serializing a `Report` yields exactly the output contract:
///
/// ```text
/// { subject_id, analysis_date, genes[], drug_interactions[], recommendations[], explanations[] }
/// ```
///
/// A `Report` is only ever handed to a caller after the validation gate
/// accepted it.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Report {
    pub subject_id: String,
    #[serde(rename = "analysis_date")]
    pub analysis_timestamp: DateTime<Utc>,
    pub genes: Vec<PhenotypeCall>,
    #[serde(rename = "drug_interactions")]
    pub interactions: Vec<Interaction>,
    pub recommendations: Vec<Recommendation>,
    pub explanations: Vec<Explanation>,
}

impl Report {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

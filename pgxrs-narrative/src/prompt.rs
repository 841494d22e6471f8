use pgxrs_core::models::{GeneTarget, PhenotypeLabel, RiskTier};

/// Everything a narrative may be based on. Nothing else about the patient
/// ever reaches the text generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeContext {
    pub gene: GeneTarget,
    pub drug: String,
    pub phenotype_label: PhenotypeLabel,
    pub risk_tier: RiskTier,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = "You explain pharmacogenomic test results to patients. \
Write plain language without jargon, in a calm tone, in one short paragraph. \
Do not contradict or extend the clinical recommendation you are given and do not give new medical advice.";

impl Prompt {
    pub fn for_context(context: &NarrativeContext, max_chars: usize) -> Self {
        let user = format!(
            "Gene: {gene}\nDrug: {drug}\nPhenotype: {phenotype}\nRisk level: {risk}\n\
             Clinical recommendation: {recommendation}\n\n\
             Explain in at most {max_chars} characters what this result means for taking {drug}.",
            gene = context.gene,
            drug = context.drug,
            phenotype = context.phenotype_label,
            risk = context.risk_tier,
            recommendation = context.recommendation,
        );
        Prompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }
}

//! The validation gate: the last check before a report leaves the pipeline.
//!
//! The gate serializes the report and checks the JSON value, so it sees
//! exactly what a caller would receive. Every problem is collected; any
//! problem rejects the whole report.

use chrono::DateTime;
use fxhash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value};
use tracing::error;

use pgxrs_catalog::{has_directive, has_dosing_guidance};
use pgxrs_core::models::{EvidenceTier, GenePanel, PhenotypeLabel, Report, RiskTier, Strength};

use crate::error::ContractViolation;

pub const TOP_LEVEL_FIELDS: [&str; 6] = [
    "subject_id",
    "analysis_date",
    "genes",
    "drug_interactions",
    "recommendations",
    "explanations",
];

#[derive(Debug, Clone)]
pub struct ValidationGate {
    genes: Vec<String>,
}

impl ValidationGate {
    pub fn new(panel: &GenePanel) -> Self {
        ValidationGate {
            genes: panel.targets().map(|g| g.symbol().to_string()).collect(),
        }
    }

    pub fn check(&self, report: &Report) -> Result<(), ContractViolation> {
        let value = serde_json::to_value(report)
            .map_err(|e| ContractViolation::Rejected(vec![format!("report does not serialize: {e}")]))?;
        let problems = self.check_value(&value);
        if problems.is_empty() {
            Ok(())
        } else {
            error!(problems = problems.len(), "validation gate rejected report: {}", problems.join("; "));
            Err(ContractViolation::Rejected(problems))
        }
    }

    /// Every way `value` breaks the output contract; empty when it holds.
    pub fn check_value(&self, value: &Value) -> Vec<String> {
        let mut problems = Vec::new();
        let Some(root) = value.as_object() else {
            problems.push("report is not a JSON object".to_string());
            return problems;
        };

        for field in TOP_LEVEL_FIELDS {
            if !root.contains_key(field) {
                problems.push(format!("missing field `{field}`"));
            }
        }

        match root.get("subject_id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => {}
            _ => problems.push("`subject_id` must be a non-empty string".to_string()),
        }
        match root.get("analysis_date").and_then(Value::as_str) {
            Some(date) if DateTime::parse_from_rfc3339(date).is_ok() => {}
            _ => problems.push("`analysis_date` must be an ISO-8601 timestamp".to_string()),
        }

        let genes = array(root, "genes", &mut problems);
        let interactions = array(root, "drug_interactions", &mut problems);
        let recommendations = array(root, "recommendations", &mut problems);
        let explanations = array(root, "explanations", &mut problems);

        self.check_genes(genes, &mut problems);
        let tiers = self.check_interactions(interactions, &mut problems);
        check_recommendations(recommendations, &tiers, &mut problems);
        check_explanations(explanations, &tiers, &mut problems);

        problems
    }

    fn check_genes(&self, genes: &[Value], problems: &mut Vec<String>) {
        let mut seen: FxHashMap<String, usize> = FxHashMap::default();
        for (i, gene) in genes.iter().enumerate() {
            let context = format!("genes[{i}]");
            let Some(entry) = object(gene, &context, problems) else {
                continue;
            };
            if let Some(name) = string(entry, "name", &context, problems) {
                *seen.entry(name.to_string()).or_default() += 1;
            }
            non_empty_string(entry, "diplotype", &context, problems);
            enumerated(entry, "phenotype", &context, &PhenotypeLabel::ALL.map(|l| l.as_str()), problems);
            match entry.get("activity_score") {
                Some(Value::Null) | Some(Value::Number(_)) => {}
                Some(_) => problems.push(format!("{context}.activity_score must be a number or null")),
                None => problems.push(format!("{context} is missing `activity_score`")),
            }
        }

        for gene in self.genes.iter() {
            match seen.remove(gene) {
                Some(1) => {}
                Some(n) => problems.push(format!("gene {gene} appears {n} times in `genes`")),
                None => problems.push(format!("gene {gene} is missing from `genes`")),
            }
        }
        for extra in seen.keys() {
            problems.push(format!("gene {extra} in `genes` is not part of the panel"));
        }
    }

    /// Returns the risk level of every (gene, drug) key.
    fn check_interactions(&self, interactions: &[Value], problems: &mut Vec<String>) -> FxHashMap<(String, String), String> {
        let mut tiers = FxHashMap::default();
        for (i, interaction) in interactions.iter().enumerate() {
            let context = format!("drug_interactions[{i}]");
            let Some(entry) = object(interaction, &context, problems) else {
                continue;
            };
            let gene = string(entry, "gene_name", &context, problems);
            if let Some(gene) = gene {
                if !self.genes.iter().any(|g| g == gene) {
                    problems.push(format!("{context}.gene_name {gene} is not part of the panel"));
                }
            }
            let drug = non_empty_string(entry, "drug_name", &context, problems);
            let risk = enumerated(entry, "risk_level", &context, &RiskTier::ALL.map(|t| t.as_str()), problems);
            enumerated(entry, "phenotype", &context, &PhenotypeLabel::ALL.map(|l| l.as_str()), problems);
            enumerated(entry, "evidence_level", &context, &EvidenceTier::ALL.map(|t| t.as_str()), problems);

            if let (Some(gene), Some(drug)) = (gene, drug) {
                let key = (gene.to_string(), drug.to_string());
                if tiers.insert(key, risk.unwrap_or_default().to_string()).is_some() {
                    problems.push(format!("{context}: {drug}/{gene} is listed twice"));
                }
            }
        }
        tiers
    }
}

fn check_recommendations(
    recommendations: &[Value],
    tiers: &FxHashMap<(String, String), String>,
    problems: &mut Vec<String>,
) {
    let mut paired: FxHashSet<(String, String)> = FxHashSet::default();
    for (i, recommendation) in recommendations.iter().enumerate() {
        let context = format!("recommendations[{i}]");
        let Some(entry) = object(recommendation, &context, problems) else {
            continue;
        };
        let gene = string(entry, "gene_name", &context, problems);
        let drug = string(entry, "drug_name", &context, problems);
        let text = non_empty_string(entry, "recommendation", &context, problems);
        enumerated(entry, "strength", &context, &Strength::ALL.map(|s| s.as_str()), problems);
        match entry.get("alternatives") {
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
            _ => problems.push(format!("{context}.alternatives must be an array of strings")),
        }

        let (Some(gene), Some(drug)) = (gene, drug) else {
            continue;
        };
        let key = (gene.to_string(), drug.to_string());
        let Some(tier) = tiers.get(&key) else {
            problems.push(format!("{context}: {drug}/{gene} has no interaction"));
            continue;
        };
        if !paired.insert(key) {
            problems.push(format!("{context}: {drug}/{gene} has more than one recommendation"));
        }
        if let Some(text) = text {
            if tier == RiskTier::High.as_str() && !has_directive(text) {
                problems.push(format!("{context}: high risk recommendation has no actionable directive"));
            }
            if tier == RiskTier::Moderate.as_str() && !has_dosing_guidance(text) {
                problems.push(format!("{context}: moderate risk recommendation has no dosing guidance"));
            }
        }
    }
    report_unpaired(tiers, &paired, "recommendation", problems);
}

fn check_explanations(
    explanations: &[Value],
    tiers: &FxHashMap<(String, String), String>,
    problems: &mut Vec<String>,
) {
    let mut paired: FxHashSet<(String, String)> = FxHashSet::default();
    for (i, explanation) in explanations.iter().enumerate() {
        let context = format!("explanations[{i}]");
        let Some(entry) = object(explanation, &context, problems) else {
            continue;
        };
        let gene = string(entry, "gene_name", &context, problems);
        let drug = string(entry, "drug_name", &context, problems);
        non_empty_string(entry, "explanation", &context, problems);

        let (Some(gene), Some(drug)) = (gene, drug) else {
            continue;
        };
        let key = (gene.to_string(), drug.to_string());
        if !tiers.contains_key(&key) {
            problems.push(format!("{context}: {drug}/{gene} has no interaction"));
        } else if !paired.insert(key) {
            problems.push(format!("{context}: {drug}/{gene} has more than one explanation"));
        }
    }
    report_unpaired(tiers, &paired, "explanation", problems);
}

fn report_unpaired(
    tiers: &FxHashMap<(String, String), String>,
    paired: &FxHashSet<(String, String)>,
    kind: &str,
    problems: &mut Vec<String>,
) {
    let mut missing: Vec<&(String, String)> = tiers.keys().filter(|k| !paired.contains(*k)).collect();
    missing.sort();
    for (gene, drug) in missing {
        problems.push(format!("interaction {drug}/{gene} has no {kind}"));
    }
}

fn array<'v>(root: &'v Map<String, Value>, field: &str, problems: &mut Vec<String>) -> &'v [Value] {
    match root.get(field) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            problems.push(format!("`{field}` must be an array"));
            &[]
        }
        None => &[],
    }
}

fn object<'v>(value: &'v Value, context: &str, problems: &mut Vec<String>) -> Option<&'v Map<String, Value>> {
    let object = value.as_object();
    if object.is_none() {
        problems.push(format!("{context} must be an object"));
    }
    object
}

fn string<'v>(entry: &'v Map<String, Value>, field: &str, context: &str, problems: &mut Vec<String>) -> Option<&'v str> {
    let value = entry.get(field).and_then(Value::as_str);
    if value.is_none() {
        problems.push(format!("{context}.{field} must be a string"));
    }
    value
}

fn non_empty_string<'v>(
    entry: &'v Map<String, Value>,
    field: &str,
    context: &str,
    problems: &mut Vec<String>,
) -> Option<&'v str> {
    match string(entry, field, context, problems) {
        Some(s) if s.trim().is_empty() => {
            problems.push(format!("{context}.{field} must not be empty"));
            None
        }
        other => other,
    }
}

fn enumerated<'v>(
    entry: &'v Map<String, Value>,
    field: &str,
    context: &str,
    legal: &[&str],
    problems: &mut Vec<String>,
) -> Option<&'v str> {
    match string(entry, field, context, problems) {
        Some(s) if !legal.contains(&s) => {
            problems.push(format!("{context}.{field} {s:?} is not one of {legal:?}"));
            None
        }
        other => other,
    }
}

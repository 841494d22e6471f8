use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ArgMatches;
use schemars::schema::RootSchema;
use schemars::schema_for;

use pgxrs_core::models::Report;

pub fn report_schema() -> RootSchema {
    schema_for!(Report)
}

pub fn run_schema(matches: &ArgMatches) -> Result<()> {
    let schema = serde_json::to_string_pretty(&report_schema())?;
    match matches.get_one::<String>("output") {
        Some(output) => {
            fs::write(output, format!("{schema}\n"))
                .with_context(|| format!("Failed to write {output}"))?;
        }
        None => {
            writeln!(io::stdout().lock(), "{schema}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_schema_names_the_wire_fields() {
        let schema = serde_json::to_value(report_schema()).unwrap();
        let mut properties: Vec<&str> = schema["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        properties.sort();
        assert_eq!(
            properties,
            vec!["analysis_date", "drug_interactions", "explanations", "genes", "recommendations", "subject_id"]
        );
    }

    #[rstest]
    fn test_internal_fields_are_not_in_the_schema() {
        let schema = serde_json::to_value(report_schema()).unwrap();
        let mut properties: Vec<&str> = schema["definitions"]["Recommendation"]["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        properties.sort();
        assert_eq!(
            properties,
            vec!["alternatives", "drug_name", "gene_name", "recommendation", "strength"]
        );
    }
}

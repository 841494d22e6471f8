use std::fmt::Write as FmtWrite;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use serde_json::json;

use pgxrs_catalog::Catalog;
use pgxrs_pipeline::AnalysisError;

pub fn run_catalog(matches: &ArgMatches) -> Result<()> {
    let catalog = match matches.get_one::<String>("catalog") {
        Some(path) => Catalog::from_path(Path::new(path))
            .map_err(AnalysisError::from)
            .with_context(|| format!("Catalog {path} is invalid"))?,
        None => Catalog::embedded()
            .map_err(AnalysisError::from)
            .context("Embedded catalog is invalid")?,
    };

    let summary = if matches.get_flag("json") {
        serde_json::to_string_pretty(&summary_json(&catalog))?
    } else {
        summary_text(&catalog)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{summary}")?;
    Ok(())
}

fn summary_json(catalog: &Catalog) -> serde_json::Value {
    let genes: Vec<serde_json::Value> = catalog
        .panel()
        .definitions()
        .iter()
        .map(|d| {
            json!({
                "name": d.target.symbol(),
                "region": d.region.to_string(),
                "reference_allele": d.reference_allele,
                "alleles": catalog
                    .alleles(&d.target)
                    .iter()
                    .map(|a| json!({ "name": a.name, "function": a.function }))
                    .collect::<Vec<_>>(),
            })
        })
        .collect();
    let drugs: Vec<serde_json::Value> = catalog
        .drugs()
        .iter()
        .map(|d| json!({ "name": d.name, "genes": d.genes }))
        .collect();

    json!({
        "name": catalog.name(),
        "version": catalog.version(),
        "genome_build": catalog.genome_build(),
        "genes": genes,
        "drugs": drugs,
    })
}

fn summary_text(catalog: &Catalog) -> Result<String> {
    let mut out = String::new();
    writeln!(out, "{} {}", catalog.name(), catalog.version())?;
    if let Some(build) = catalog.genome_build() {
        writeln!(out, "genome build: {build}")?;
    }

    writeln!(out, "\ngenes:")?;
    for definition in catalog.panel().definitions() {
        let alleles: Vec<&str> = catalog
            .alleles(&definition.target)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        writeln!(
            out,
            "  {}\t{}\t{} {}",
            definition.target,
            definition.region,
            definition.reference_allele,
            alleles.join(" ")
        )?;
    }

    writeln!(out, "\ndrugs:")?;
    for drug in catalog.drugs() {
        let genes: Vec<&str> = drug.genes.iter().map(|g| g.symbol()).collect();
        writeln!(out, "  {}\t{}", drug.name, genes.join(","))?;
    }

    Ok(out.trim_end().to_string())
}

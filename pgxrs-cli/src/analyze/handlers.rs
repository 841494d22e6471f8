use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ArgMatches;
use tracing::info;

use pgxrs_catalog::Catalog;
use pgxrs_narrative::HttpGeneratorConfig;
use pgxrs_pipeline::{AnalysisError, AnalysisRequest, Analyzer, PipelineConfig};
use pgxrs_vcf::{FsUploadStore, UploadHandle};

pub fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let vcf = matches
        .get_one::<String>("vcf")
        .expect("A path to a VCF file is required.");

    let catalog = match matches.get_one::<String>("catalog") {
        Some(path) => Catalog::from_path(Path::new(path)).map_err(AnalysisError::from),
        None => Catalog::embedded().map_err(AnalysisError::from),
    }
    .context("Failed to load the catalog")?;

    let mut config = match matches.get_one::<String>("config") {
        Some(path) => PipelineConfig::try_from(Path::new(path))
            .map_err(AnalysisError::from)
            .with_context(|| format!("Failed to read pipeline config {path}"))?,
        None => PipelineConfig::default(),
    };
    apply_overrides(&mut config, matches);

    let (store, handle) = upload_for(Path::new(vcf))?;
    let analyzer = Analyzer::from_config(Arc::new(catalog), config, Arc::new(store))
        .context("Failed to set up the analysis")?;

    let mut request = AnalysisRequest::new();
    if let Some(drugs) = matches.get_one::<String>("drugs") {
        request = request.with_drugs(parse_drugs(drugs));
    }
    if let Some(subject_id) = matches.get_one::<String>("subject-id") {
        request = request.with_subject_id(subject_id.as_str());
    }

    let report = analyzer
        .analyze(&handle, &request)
        .with_context(|| format!("Analysis of {vcf} failed"))?;
    let json = report.to_json_pretty()?;

    match matches.get_one::<String>("output") {
        Some(output) => {
            let mut writer = BufWriter::new(
                File::create(output).with_context(|| format!("Failed to create {output}"))?,
            );
            writeln!(writer, "{json}")?;
            writer.flush()?;
            info!(output = output.as_str(), "report written");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            writeln!(writer, "{json}")?;
            writer.flush()?;
        }
    }

    Ok(())
}

/// Command line flags win over the config file. Naming an endpoint or model
/// switches narratives on.
fn apply_overrides(config: &mut PipelineConfig, matches: &ArgMatches) {
    let endpoint = matches.get_one::<String>("llm-endpoint");
    let model = matches.get_one::<String>("llm-model");
    if endpoint.is_some() || model.is_some() {
        let http = config.narrative.http.get_or_insert_with(HttpGeneratorConfig::default);
        if let Some(endpoint) = endpoint {
            http.endpoint = endpoint.clone();
        }
        if let Some(model) = model {
            http.model = model.clone();
        }
        config.narrative.enabled = true;
    }
    if let Some(timeout_ms) = matches.get_one::<u64>("timeout-ms") {
        config.narrative.timeout_ms = *timeout_ms;
    }
}

/// The directory of the file becomes the store root, its name the handle.
fn upload_for(vcf: &Path) -> Result<(FsUploadStore, UploadHandle)> {
    let name = vcf
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Not a file path: {}", vcf.display()))?;
    let root = vcf
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Ok((FsUploadStore::new(root), UploadHandle::from(name)))
}

fn parse_drugs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

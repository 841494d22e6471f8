//! The `analyze` entry point: one variant stream in, one validated report out.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{info, warn};

use pgxrs_catalog::Catalog;
use pgxrs_core::models::Report;
use pgxrs_narrative::{CancelSignal, NarrativeContext, NarrativeGenerator, TextGenerator};
use pgxrs_overlaprs::GeneRegionIndex;
use pgxrs_vcf::{ExtractionStatus, UploadHandle, UploadStore, VariantExtractor};

use crate::assemble::{ReportParts, assemble};
use crate::classifier::{classify, select_drugs};
use crate::config::PipelineConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::gate::ValidationGate;
use crate::matcher::call_alleles;
use crate::recommend::build_recommendations;
use crate::resolver::resolve_phenotypes;

/// Subject id of a report when neither the request nor the VCF names one.
pub const UNKNOWN_SUBJECT: &str = "UNKNOWN";

/// Per-call inputs of an analysis.
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    /// Drugs to evaluate. Empty means every drug in the catalog.
    pub drugs: Vec<String>,
    /// Overrides the sample id of the VCF header
    pub subject_id: Option<String>,
    /// Overrides the current time, for reproducible reports
    pub analysis_date: Option<DateTime<Utc>>,
    pub cancel: CancelSignal,
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drugs<I, S>(mut self, drugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drugs = drugs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subject_id(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn with_analysis_date(mut self, date: DateTime<Utc>) -> Self {
        self.analysis_date = Some(date);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = cancel;
        self
    }
}

///
/// Runs the whole pipeline for one variant stream.
///
/// An `Analyzer` is built once, with its catalog, and then shared by any
/// number of analyses; it holds no per-request state.
///
pub struct Analyzer {
    catalog: Arc<Catalog>,
    index: GeneRegionIndex,
    config: PipelineConfig,
    store: Arc<dyn UploadStore>,
    narrator: NarrativeGenerator,
    gate: ValidationGate,
}

impl Analyzer {
    /// A generator that can produce text turns narratives on, whatever the
    /// config says; pass [`DisabledGenerator`](pgxrs_narrative::DisabledGenerator)
    /// to always use fallback text.
    pub fn new(
        catalog: Arc<Catalog>,
        mut config: PipelineConfig,
        store: Arc<dyn UploadStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        if generator.is_available() && !config.narrative.enabled {
            info!(generator = generator.name(), "text generator supplied, enabling narratives");
            config.narrative.enabled = true;
        }
        let index = GeneRegionIndex::from_panel(catalog.panel());
        let gate = ValidationGate::new(catalog.panel());
        let narrator = NarrativeGenerator::new(generator, config.narrative.clone());
        Analyzer {
            catalog,
            index,
            config,
            store,
            narrator,
            gate,
        }
    }

    /// Like [`Analyzer::new`], with the text generator the config asks for.
    pub fn from_config(
        catalog: Arc<Catalog>,
        config: PipelineConfig,
        store: Arc<dyn UploadStore>,
    ) -> AnalysisResult<Self> {
        let generator = config.narrative.build_generator()?;
        Ok(Self::new(catalog, config, store, generator))
    }

    /// Loads catalog and pipeline config from files. No path means the embedded
    /// catalog or the default config.
    pub fn from_paths(
        catalog: Option<&Path>,
        config: Option<&Path>,
        store: Arc<dyn UploadStore>,
    ) -> AnalysisResult<Self> {
        let catalog = match catalog {
            Some(path) => Catalog::from_path(path)?,
            None => Catalog::embedded()?,
        };
        let config = match config {
            Some(path) => PipelineConfig::try_from(path)?,
            None => PipelineConfig::default(),
        };
        Self::from_config(Arc::new(catalog), config, store)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Blocking entry point. Drives its own single-threaded runtime, so it must
    /// not be called from inside an async context; use
    /// [`Analyzer::analyze_async`] there.
    pub fn analyze(&self, handle: &UploadHandle, request: &AnalysisRequest) -> AnalysisResult<Report> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(AnalysisError::Runtime)?;
        runtime.block_on(self.analyze_async(handle, request))
    }

    pub async fn analyze_async(&self, handle: &UploadHandle, request: &AnalysisRequest) -> AnalysisResult<Report> {
        let stream = self.store.open(handle)?;
        info!(handle = handle.as_str(), "analysis started");
        self.analyze_reader(stream, request).await
    }

    /// Analyze an already opened VCF stream.
    pub async fn analyze_reader<R: BufRead>(&self, reader: R, request: &AnalysisRequest) -> AnalysisResult<Report> {
        let catalog = self.catalog.as_ref();

        let extraction = VariantExtractor::new(&self.index, self.config.extraction.clone()).extract(reader)?;
        if extraction.status == ExtractionStatus::NoTargetVariants {
            info!("no variants in panel genes, reporting wild type");
        }
        if extraction.stats.malformed > 0 {
            warn!(malformed = extraction.stats.malformed, "skipped malformed records");
        }

        let calls = call_alleles(catalog, &extraction.variants);
        let genes = resolve_phenotypes(catalog, &calls);
        let drugs = select_drugs(catalog, &request.drugs);
        let interactions = classify(catalog, &genes, &drugs);
        let recommendations = build_recommendations(catalog, &interactions);

        let contexts: Vec<NarrativeContext> = interactions
            .iter()
            .zip(recommendations.iter())
            .map(|(interaction, recommendation)| NarrativeContext {
                gene: interaction.gene.clone(),
                drug: interaction.drug.clone(),
                phenotype_label: interaction.phenotype_label,
                risk_tier: interaction.risk_tier,
                recommendation: recommendation.text.clone(),
            })
            .collect();
        let explanations = self.narrator.explain_all(&contexts, &request.cancel).await;

        let subject_id = request
            .subject_id
            .clone()
            .or(extraction.sample_id)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SUBJECT.to_string());
        let analysis_date = request
            .analysis_date
            .unwrap_or_else(|| Utc::now().trunc_subsecs(0));

        let report = self.finish(ReportParts {
            subject_id,
            analysis_date,
            genes,
            interactions,
            recommendations,
            explanations,
        })?;

        info!(
            subject = report.subject_id.as_str(),
            genes = report.genes.len(),
            interactions = report.interactions.len(),
            variants = extraction.stats.retained,
            "analysis finished"
        );
        Ok(report)
    }

    /// Assemble and gate. Nothing leaves this function that the gate did not accept.
    pub(crate) fn finish(&self, parts: ReportParts) -> AnalysisResult<Report> {
        let report = assemble(parts)?;
        self.gate.check(&report)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use pgxrs_core::models::{Explanation, NarrativeOutcome};
    use pgxrs_narrative::DisabledGenerator;
    use pgxrs_vcf::MemoryUploadStore;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    use crate::error::{ContractViolation, ErrorClass};

    const HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tPATIENT_007\n";

    #[fixture]
    fn analyzer() -> Analyzer {
        let mut store = MemoryUploadStore::new();
        store.insert("empty.vcf", HEADER);
        store.insert(
            "tpmt.vcf",
            format!("{HEADER}chr6\t18139027\trs1800460\tC\tT\t60\tPASS\t.\tGT\t1/1\nchr6\t18130687\trs1142345\tT\tC\t60\tPASS\t.\tGT\t1/1\n"),
        );
        Analyzer::new(
            Arc::new(Catalog::embedded().unwrap()),
            PipelineConfig::default(),
            Arc::new(store),
            Arc::new(DisabledGenerator),
        )
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[rstest]
    fn test_subject_id_defaults_to_vcf_sample(analyzer: Analyzer) {
        let report = analyzer
            .analyze(&UploadHandle::from("empty.vcf"), &AnalysisRequest::new())
            .unwrap();
        assert_eq!(report.subject_id, "PATIENT_007");
        assert_eq!(report.analysis_timestamp.timestamp_subsec_nanos(), 0);
    }

    #[rstest]
    fn test_request_overrides_subject_and_date(analyzer: Analyzer) {
        let request = AnalysisRequest::new()
            .with_subject_id("PATIENT_001")
            .with_analysis_date(date());
        let report = analyzer.analyze(&UploadHandle::from("empty.vcf"), &request).unwrap();
        assert_eq!(report.subject_id, "PATIENT_001");
        assert_eq!(report.analysis_timestamp, date());
    }

    #[rstest]
    fn test_reader_without_sample_is_unknown_subject(analyzer: Analyzer) {
        let vcf = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n";
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        let report = runtime
            .block_on(analyzer.analyze_reader(vcf.as_bytes(), &AnalysisRequest::new()))
            .unwrap();
        assert_eq!(report.subject_id, UNKNOWN_SUBJECT);
    }

    #[rstest]
    fn test_homozygous_tpmt_is_poor(analyzer: Analyzer) {
        let request = AnalysisRequest::new().with_drugs(["azathioprine"]);
        let report = analyzer.analyze(&UploadHandle::from("tpmt.vcf"), &request).unwrap();
        let tpmt = report.genes.iter().find(|g| g.gene.symbol() == "TPMT").unwrap();
        assert_eq!(tpmt.diplotype_notation, "*3A/*3A");
        assert_eq!(report.interactions.len(), 1);
        assert_eq!(report.interactions[0].drug, "AZATHIOPRINE");
        assert_eq!(report.interactions[0].risk_tier.as_str(), "high_risk");
    }

    #[rstest]
    fn test_unknown_handle_is_input_unavailable(analyzer: Analyzer) {
        let err = analyzer
            .analyze(&UploadHandle::from("missing.vcf"), &AnalysisRequest::new())
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::InputUnavailable);
    }

    #[rstest]
    fn test_unpaired_interaction_is_internal_error(analyzer: Analyzer) {
        let catalog = analyzer.catalog();
        let genes = resolve_phenotypes(catalog, &call_alleles(catalog, &[]));
        let drugs = select_drugs(catalog, &[]);
        let interactions = classify(catalog, &genes, &drugs);
        let mut recommendations = build_recommendations(catalog, &interactions);
        recommendations.pop();
        let explanations = interactions
            .iter()
            .map(|i| Explanation {
                gene: i.gene.clone(),
                drug: i.drug.clone(),
                text: "Standard dosing applies.".to_string(),
                source: NarrativeOutcome::Failed.source(),
                outcome: NarrativeOutcome::Failed,
            })
            .collect();

        let err = analyzer
            .finish(ReportParts {
                subject_id: "PATIENT_001".to_string(),
                analysis_date: date(),
                genes,
                interactions,
                recommendations,
                explanations,
            })
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(matches!(
            err,
            AnalysisError::Contract(ContractViolation::MissingRecommendation { .. })
        ));
    }

    #[rstest]
    fn test_gate_rejection_is_internal_error(analyzer: Analyzer) {
        let catalog = analyzer.catalog();
        let mut genes = resolve_phenotypes(catalog, &call_alleles(catalog, &[]));
        genes.pop();

        let err = analyzer
            .finish(ReportParts {
                subject_id: "PATIENT_001".to_string(),
                analysis_date: date(),
                genes,
                interactions: Vec::new(),
                recommendations: Vec::new(),
                explanations: Vec::new(),
            })
            .unwrap_err();

        assert_eq!(err.class(), ErrorClass::Internal);
        assert!(matches!(err, AnalysisError::Contract(ContractViolation::Rejected(_))));
    }
}

//! Concurrent narrative generation for all interactions of one analysis.
//!
//! Each interaction gets its own task and its own deadline. Tasks resolve to
//! either generated text or the fallback narrative, so the join always yields
//! one non-empty [`Explanation`] per interaction, in interaction order.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use pgxrs_core::models::{Explanation, NarrativeOutcome};

use crate::cancel::CancelSignal;
use crate::error::GenerationError;
use crate::fallback::fallback_text;
use crate::generator::{DisabledGenerator, TextGenerator};
use crate::http::{HttpGeneratorConfig, HttpTextGenerator};
use crate::prompt::{NarrativeContext, Prompt};

/// The `[narrative]` table of a pipeline config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// When false no request is sent and every narrative is fallback text
    pub enabled: bool,
    /// Deadline of a single generation request
    pub timeout_ms: u64,
    /// Longest narrative accepted from the service, in characters
    pub max_chars: usize,
    pub http: Option<HttpGeneratorConfig>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        NarrativeConfig {
            enabled: false,
            timeout_ms: 10_000,
            max_chars: 1200,
            http: None,
        }
    }
}

impl NarrativeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.max_chars == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_chars must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The generator this config asks for: HTTP when enabled and configured, disabled otherwise.
    pub fn build_generator(&self) -> Result<Arc<dyn TextGenerator>, GenerationError> {
        self.validate()?;
        match (&self.http, self.enabled) {
            (Some(http), true) => Ok(Arc::new(HttpTextGenerator::new(http.clone())?)),
            _ => Ok(Arc::new(DisabledGenerator)),
        }
    }
}

pub struct NarrativeGenerator {
    generator: Arc<dyn TextGenerator>,
    config: NarrativeConfig,
}

impl NarrativeGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, config: NarrativeConfig) -> Self {
        NarrativeGenerator { generator, config }
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    /// One explanation per context, in the order of `contexts`.
    pub async fn explain_all(&self, contexts: &[NarrativeContext], cancel: &CancelSignal) -> Vec<Explanation> {
        if contexts.is_empty() {
            return Vec::new();
        }

        if !self.config.enabled {
            debug!(interactions = contexts.len(), "narrative service disabled, using fallback text");
            return contexts
                .iter()
                .map(|c| self.fallback(c, NarrativeOutcome::Failed))
                .collect();
        }

        if cancel.is_cancelled() {
            return contexts
                .iter()
                .map(|c| self.fallback(c, NarrativeOutcome::Cancelled))
                .collect();
        }

        let mut tasks = JoinSet::new();
        for (i, context) in contexts.iter().cloned().enumerate() {
            let generator = Arc::clone(&self.generator);
            let mut cancel = cancel.clone();
            let timeout = self.config.timeout();
            let max_chars = self.config.max_chars;

            tasks.spawn(async move {
                let prompt = Prompt::for_context(&context, max_chars);
                let outcome = tokio::select! {
                    _ = cancel.cancelled() => Err(NarrativeOutcome::Cancelled),
                    result = tokio::time::timeout(timeout, generator.generate(&prompt)) => match result {
                        Ok(Ok(text)) => accept(&text, max_chars)
                            .map_err(|err| log_failure(&context, &err)),
                        Ok(Err(err)) => Err(log_failure(&context, &err)),
                        Err(_) => {
                            warn!(
                                gene = context.gene.symbol(),
                                drug = context.drug.as_str(),
                                timeout_ms = timeout.as_millis() as u64,
                                "narrative request timed out"
                            );
                            Err(NarrativeOutcome::TimedOut)
                        }
                    },
                };
                (i, outcome)
            });
        }

        let mut resolved: Vec<Option<Explanation>> = vec![None; contexts.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((i, Ok(text))) => {
                    resolved[i] = Some(self.explanation(&contexts[i], text, NarrativeOutcome::Completed));
                }
                Ok((i, Err(outcome))) => {
                    if outcome == NarrativeOutcome::Cancelled {
                        debug!(gene = contexts[i].gene.symbol(), drug = contexts[i].drug.as_str(), "narrative request cancelled");
                    }
                    resolved[i] = Some(self.fallback(&contexts[i], outcome));
                }
                // the slot stays empty and falls back below
                Err(err) => warn!(error = %err, "narrative task did not finish"),
            }
        }

        let explanations: Vec<Explanation> = resolved
            .into_iter()
            .zip(contexts)
            .map(|(slot, context)| slot.unwrap_or_else(|| self.fallback(context, NarrativeOutcome::Failed)))
            .collect();

        let generated = explanations
            .iter()
            .filter(|e| e.outcome == NarrativeOutcome::Completed)
            .count();
        info!(
            generator = self.generator.name(),
            generated,
            fallback = explanations.len() - generated,
            "narratives resolved"
        );

        explanations
    }

    fn fallback(&self, context: &NarrativeContext, outcome: NarrativeOutcome) -> Explanation {
        let text = fallback_text(context, self.config.max_chars);
        self.explanation(context, text, outcome)
    }

    fn explanation(&self, context: &NarrativeContext, text: String, outcome: NarrativeOutcome) -> Explanation {
        Explanation {
            gene: context.gene.clone(),
            drug: context.drug.clone(),
            text,
            source: outcome.source(),
            outcome,
        }
    }
}

/// Generated text is usable when it is non-empty and within the length bound
/// after trimming.
fn accept(text: &str, max_chars: usize) -> Result<String, GenerationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(GenerationError::Rejected("empty text".to_string()));
    }
    let chars = text.chars().count();
    if chars > max_chars {
        return Err(GenerationError::Rejected(format!(
            "{chars} characters exceeds the limit of {max_chars}"
        )));
    }
    Ok(text.to_string())
}

fn log_failure(context: &NarrativeContext, err: &GenerationError) -> NarrativeOutcome {
    warn!(
        gene = context.gene.symbol(),
        drug = context.drug.as_str(),
        error = %err,
        "narrative request failed, using fallback"
    );
    NarrativeOutcome::Failed
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;
    use pgxrs_core::models::{ExplanationSource, GenePanel, GeneSpec, PhenotypeLabel, RiskTier};
    use pretty_assertions::assert_eq;

    enum Script {
        Reply(&'static str),
        Fail,
        Slow(Duration),
        Hang,
        Panic,
    }

    /// Answers per drug name.
    struct ScriptedGenerator {
        scripts: HashMap<&'static str, Script>,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
            let drug = prompt
                .user
                .lines()
                .find_map(|l| l.strip_prefix("Drug: "))
                .unwrap_or_default();
            match self.scripts.get(drug) {
                Some(Script::Reply(text)) => Ok(text.to_string()),
                Some(Script::Slow(delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok("late answer".to_string())
                }
                Some(Script::Hang) => std::future::pending().await,
                Some(Script::Panic) => panic!("generator blew up"),
                Some(Script::Fail) | None => Err(GenerationError::EmptyResponse),
            }
        }
    }

    fn contexts(drugs: &[&str]) -> Vec<NarrativeContext> {
        let panel = GenePanel::new(vec![GeneSpec {
            symbol: "CYP2C19".to_string(),
            chromosome: "chr10".to_string(),
            start: 94757146,
            end: 94855547,
            reference_allele: "*1".to_string(),
        }])
        .unwrap();
        let gene = panel.get("CYP2C19").unwrap().clone();
        drugs
            .iter()
            .map(|drug| NarrativeContext {
                gene: gene.clone(),
                drug: drug.to_string(),
                phenotype_label: PhenotypeLabel::Poor,
                risk_tier: RiskTier::High,
                recommendation: "Avoid this drug.".to_string(),
            })
            .collect()
    }

    fn narrator(scripts: Vec<(&'static str, Script)>, max_chars: usize) -> NarrativeGenerator {
        let generator = ScriptedGenerator {
            scripts: scripts.into_iter().collect(),
        };
        let config = NarrativeConfig {
            enabled: true,
            timeout_ms: 100,
            max_chars,
            http: None,
        };
        NarrativeGenerator::new(Arc::new(generator), config)
    }

    fn outcomes(explanations: &[Explanation]) -> Vec<NarrativeOutcome> {
        explanations.iter().map(|e| e.outcome).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_interaction_resolves_independently() {
        let narrator = narrator(
            vec![
                ("A", Script::Reply("  Generated for A.  ")),
                ("B", Script::Fail),
                ("C", Script::Slow(Duration::from_secs(5))),
                ("D", Script::Reply("")),
                ("E", Script::Reply("way too long for the bound")),
            ],
            20,
        );
        let contexts = contexts(&["A", "B", "C", "D", "E"]);
        let explanations = narrator.explain_all(&contexts, &CancelSignal::default()).await;

        assert_eq!(
            outcomes(&explanations),
            vec![
                NarrativeOutcome::Completed,
                NarrativeOutcome::Failed,
                NarrativeOutcome::TimedOut,
                NarrativeOutcome::Failed,
                NarrativeOutcome::Failed,
            ]
        );
        assert_eq!(explanations[0].text, "Generated for A.");
        assert_eq!(explanations[0].source, ExplanationSource::Generated);
        let drugs: Vec<&str> = explanations.iter().map(|e| e.drug.as_str()).collect();
        assert_eq!(drugs, vec!["A", "B", "C", "D", "E"]);
        for explanation in explanations[1..].iter() {
            assert_eq!(explanation.source, ExplanationSource::Fallback);
            assert!(!explanation.text.is_empty());
            assert!(explanation.text.chars().count() <= 20);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_request_does_not_delay_the_others() {
        let narrator = narrator(
            vec![("SLOW", Script::Hang), ("FAST", Script::Reply("quick"))],
            1200,
        );
        let contexts = contexts(&["SLOW", "FAST"]);
        let started = tokio::time::Instant::now();
        let explanations = narrator.explain_all(&contexts, &CancelSignal::default()).await;

        // bounded by the single request deadline, not by the sum
        assert!(started.elapsed() < Duration::from_millis(200));
        assert_eq!(
            outcomes(&explanations),
            vec![NarrativeOutcome::TimedOut, NarrativeOutcome::Completed]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_resolves_in_flight_requests_to_fallback() {
        let mut narrator = narrator(vec![("A", Script::Hang), ("B", Script::Hang)], 1200);
        narrator.config.timeout_ms = 60_000;
        let contexts = contexts(&["A", "B"]);
        let (handle, signal) = CancelSignal::new();

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });
        let explanations = narrator.explain_all(&contexts, &signal).await;
        canceller.await.unwrap();

        assert_eq!(
            outcomes(&explanations),
            vec![NarrativeOutcome::Cancelled, NarrativeOutcome::Cancelled]
        );
        assert!(explanations.iter().all(|e| !e.text.is_empty()));
    }

    #[tokio::test]
    async fn test_already_cancelled_request_sends_nothing() {
        let narrator = narrator(vec![("A", Script::Panic)], 1200);
        let (handle, signal) = CancelSignal::new();
        handle.cancel();
        let explanations = narrator.explain_all(&contexts(&["A"]), &signal).await;
        assert_eq!(outcomes(&explanations), vec![NarrativeOutcome::Cancelled]);
    }

    #[tokio::test]
    async fn test_panicking_task_falls_back() {
        let narrator = narrator(vec![("A", Script::Panic), ("B", Script::Reply("fine"))], 1200);
        let explanations = narrator
            .explain_all(&contexts(&["A", "B"]), &CancelSignal::default())
            .await;
        assert_eq!(
            outcomes(&explanations),
            vec![NarrativeOutcome::Failed, NarrativeOutcome::Completed]
        );
        assert!(!explanations[0].text.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_service_uses_fallback_everywhere() {
        let config = NarrativeConfig::default();
        let generator = config.build_generator().unwrap();
        assert_eq!(generator.name(), "disabled");

        let narrator = NarrativeGenerator::new(generator, config);
        let explanations = narrator
            .explain_all(&contexts(&["A", "B"]), &CancelSignal::default())
            .await;
        assert!(
            explanations
                .iter()
                .all(|e| e.source == ExplanationSource::Fallback && !e.text.is_empty())
        );
    }

    #[test]
    fn test_zero_max_chars_is_rejected() {
        let config = NarrativeConfig {
            max_chars: 0,
            ..NarrativeConfig::default()
        };
        assert!(matches!(config.validate(), Err(GenerationError::InvalidConfig(_))));
        assert!(matches!(config.build_generator(), Err(GenerationError::InvalidConfig(_))));
        assert!(NarrativeConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn test_disabled_generator_fails_when_enabled() {
        let config = NarrativeConfig {
            enabled: true,
            ..NarrativeConfig::default()
        };
        assert!(!DisabledGenerator.is_available());
        let narrator = NarrativeGenerator::new(Arc::new(DisabledGenerator), config);
        let explanations = narrator
            .explain_all(&contexts(&["A"]), &CancelSignal::default())
            .await;
        assert_eq!(outcomes(&explanations), vec![NarrativeOutcome::Failed]);
    }
}

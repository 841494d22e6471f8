use std::ffi::OsStr;
use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use pgxrs_narrative::NarrativeConfig;
use pgxrs_vcf::ExtractionConfig;

use crate::error::ConfigError;

/// Pipeline settings. Every field has a default, so an empty file is valid.
///
/// ```toml
/// [extraction]
/// require_pass = true
/// min_quality = 20.0
///
/// [narrative]
/// enabled = true
/// timeout_ms = 5000
///
/// [narrative.http]
/// endpoint = "http://localhost:8080/v1/chat/completions"
/// model = "llama-3.1-8b-instruct"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub extraction: ExtractionConfig,
    pub narrative: NarrativeConfig,
}

impl TryFrom<&Path> for PipelineConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let extension = path.extension().and_then(OsStr::to_str);
        if !matches!(extension, Some("toml") | Some("yaml") | Some("yml")) {
            return Err(ConfigError::InvalidFileType);
        }
        let contents = read_to_string(path)?;
        let config: PipelineConfig = match extension {
            Some("toml") => toml::from_str(&contents)?,
            _ => serde_yaml::from_str(&contents)?,
        };
        config.narrative.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::path::PathBuf;

    #[rstest]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.extraction.require_pass, false);
        assert_eq!(config.extraction.min_quality, None);
        assert_eq!(config.extraction.max_quarantined, 100);
        assert_eq!(config.narrative.enabled, false);
        assert_eq!(config.narrative.timeout_ms, 10_000);
        assert_eq!(config.narrative.max_chars, 1200);
    }

    #[rstest]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(
            &path,
            "[extraction]\nrequire_pass = true\n\n[narrative]\nenabled = true\n\n[narrative.http]\nmodel = \"small\"\n",
        )
        .unwrap();

        let config = PipelineConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.extraction.require_pass, true);
        assert_eq!(config.extraction.max_quarantined, 100);
        assert_eq!(config.narrative.enabled, true);
        assert_eq!(config.narrative.timeout_ms, 10_000);
        let http = config.narrative.http.unwrap();
        assert_eq!(http.model, "small");
        assert_eq!(http.api_key_env, "PGXRS_LLM_API_KEY");
    }

    #[rstest]
    fn test_yaml_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yml");
        std::fs::write(&path, "narrative:\n  timeout_ms: 250\n").unwrap();
        let config = PipelineConfig::try_from(path.as_path()).unwrap();
        assert_eq!(config.narrative.timeout_ms, 250);
    }

    #[rstest]
    fn test_zero_max_chars_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        std::fs::write(&path, "[narrative]\nmax_chars = 0\n").unwrap();
        let result = PipelineConfig::try_from(path.as_path());
        assert!(matches!(result, Err(ConfigError::Narrative(_))));
    }

    #[rstest]
    fn test_invalid_extension() {
        let result = PipelineConfig::try_from(PathBuf::from("pipeline.ini").as_path());
        assert!(matches!(result, Err(ConfigError::InvalidFileType)));
    }
}

use thiserror::Error;

use pgxrs_catalog::CatalogError;
use pgxrs_narrative::GenerationError;
use pgxrs_vcf::{ExtractError, StoreError};

/// A report that must not be released. Always a defect, never bad input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractViolation {
    #[error("interaction {drug}/{gene} has no recommendation")]
    MissingRecommendation { gene: String, drug: String },

    #[error("interaction {drug}/{gene} has no explanation")]
    MissingExplanation { gene: String, drug: String },

    #[error("{kind} for {drug}/{gene} does not pair with exactly one interaction")]
    Unpaired {
        kind: &'static str,
        gene: String,
        drug: String,
    },

    #[error("report rejected by the validation gate: {}", .0.join("; "))]
    Rejected(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Missing or invalid file extension in pipeline config file. It must be `toml`, `yaml` or `yml`"
    )]
    InvalidFileType,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Narrative(#[from] GenerationError),
}

/// Coarse class of an [`AnalysisError`], for callers that map failures to
/// exit codes or status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The variant stream could not be opened or read
    InputUnavailable,
    /// Catalog, pipeline config or text generation client could not be set up
    Configuration,
    /// The pipeline produced something it must not release
    Internal,
}

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Upload unavailable: {0}")]
    Upload(#[from] StoreError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Invalid pipeline config: {0}")]
    Config(#[from] ConfigError),
    #[error("Text generation client could not be created: {0}")]
    Generator(#[from] GenerationError),
    #[error("Internal error: {0}")]
    Contract(#[from] ContractViolation),
    #[error("Internal error: failed to start the analysis runtime: {0}")]
    Runtime(std::io::Error),
}

impl AnalysisError {
    pub fn class(&self) -> ErrorClass {
        match self {
            AnalysisError::Upload(_) | AnalysisError::Extract(_) => ErrorClass::InputUnavailable,
            AnalysisError::Catalog(_) | AnalysisError::Config(_) | AnalysisError::Generator(_) => {
                ErrorClass::Configuration
            }
            AnalysisError::Contract(_) | AnalysisError::Runtime(_) => ErrorClass::Internal,
        }
    }
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

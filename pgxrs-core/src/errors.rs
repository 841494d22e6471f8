use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PanelError {
    #[error("Gene panel is empty")]
    EmptyPanel,

    #[error("Gene {0} is listed more than once in the panel")]
    DuplicateGene(String),

    #[error("Invalid region for gene {gene}: {reason}")]
    InvalidRegion { gene: String, reason: String },
}

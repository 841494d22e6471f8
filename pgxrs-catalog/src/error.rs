use thiserror::Error;

use pgxrs_core::PanelError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(
        "Missing or invalid file extension in catalog file. It must be `toml`, `yaml` or `yml`"
    )]
    InvalidFileType,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid gene panel: {0}")]
    Panel(#[from] PanelError),
    #[error("Inconsistent catalog: {0}")]
    Inconsistent(String),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

use thiserror::Error;

/// Why a data line was quarantined instead of parsed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedRecord {
    #[error("expected at least 8 tab-separated fields, found {0}")]
    FieldCount(usize),

    #[error("missing chromosome")]
    MissingChromosome,

    #[error("invalid position: {0:?}")]
    InvalidPosition(String),

    #[error("invalid reference allele: {0:?}")]
    InvalidReference(String),

    #[error("invalid alternate allele: {0:?}")]
    InvalidAlternate(String),

    #[error("invalid quality: {0:?}")]
    InvalidQuality(String),

    #[error("line is not valid UTF-8")]
    InvalidEncoding,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("No upload found for handle: {0}")]
    NotFound(String),

    #[error("Invalid upload handle: {0}")]
    InvalidHandle(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed reading variant stream: {0}")]
    Io(#[from] std::io::Error),
}

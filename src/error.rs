use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is malformed: {0}")]
    Malformed(String),

    #[error("invalid catalog record {record}: {reason}")]
    InvalidRecord { record: String, reason: String },

    #[error("record store error: {0}")]
    Store(#[from] mongodb::error::Error),
}

#[derive(Debug, Error)]
pub enum TripError {
    #[error("trip not found")]
    NotFound,

    #[error("invalid trip: {0}")]
    Validation(String),

    #[error("destination {0} does not exist")]
    UnknownDestination(String),

    #[error("catalog lookup failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("record store error: {0}")]
    Store(#[from] mongodb::error::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

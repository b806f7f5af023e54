use rcpsp_core::RcpspError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("problem parse error: {0}")]
    Parse(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] RcpspError),
}

pub type DataResult<T> = Result<T, DataError>;

use rcpsp_core::{RcpspError, Time};
use rcpsp_data::DataError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("activity {activity:?} has a step at unknown location {location:?}")]
    UnknownLocation {
        activity: String,
        location: String,
    },

    #[error("component name {0:?} is already taken")]
    DuplicateComponent(String),

    #[error("no progress at {time}: still busy after {cycles} zero-time cycles")]
    ZeroTimeLoop {
        time:   Time,
        cycles: usize,
    },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error(transparent)]
    Core(#[from] RcpspError),
}

pub type SimResult<T> = Result<T, SimError>;

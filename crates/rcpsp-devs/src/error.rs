use thiserror::Error;

use crate::Port;

/// Inbound messages a component cannot act on.  These are never fatal: the
/// component logs the error and drops the message with its state untouched.
#[derive(Debug, Error)]
pub enum DevsError {
    #[error("{component}: unexpected {payload} payload on port {port}")]
    Malformed {
        component: String,
        port:      Port,
        payload:   &'static str,
    },

    #[error("{component}: {port} message arrived in phase {phase}")]
    OutOfPhase {
        component: String,
        port:      Port,
        phase:     &'static str,
    },
}

pub type DevsResult<T> = Result<T, DevsError>;

impl DevsError {
    /// Log at `warn` and discard.
    pub(crate) fn drop_message(self) {
        tracing::warn!(error = %self, "inbound message dropped");
    }
}

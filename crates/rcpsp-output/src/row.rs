//! Plain data row types written by output backends.

/// One executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRow {
    pub activity: String,
    pub step:     String,
    pub location: String,
    /// Date the step started waiting for resources, if recorded.
    pub wait:     Option<u64>,
    pub start:    u64,
    pub finish:   u64,
}

impl StepRow {
    /// Time spent queued before the step started.
    pub fn waited(&self) -> u64 {
        self.wait.map_or(0, |w| self.start.saturating_sub(w))
    }
}

/// One completed activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub activity: String,
    /// Start of the first step.
    pub start:    u64,
    /// Date the last step finished.
    pub finish:   u64,
    pub steps:    u32,
}

/// Reasons a submission did not produce placed results.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// The drawing surface has not been initialised yet.
    #[error("drawing surface is not ready")]
    InputUnavailable,

    /// Nothing has been drawn and empty submissions are disabled.
    #[error("canvas is empty")]
    EmptyCanvas,

    /// Another submission is still waiting for its response.
    #[error("a submission is already in flight")]
    Busy,

    /// The snapshot could not be turned into an image payload.
    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    /// The request never produced a response.
    #[error("recognition request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("recognition service returned status {status}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("malformed recognition response: {0}")]
    MalformedResponse(String),

    /// The worker thread went away without reporting an outcome.
    #[error("recognition worker exited without a response")]
    WorkerLost,
}

impl SubmitError {
    /// Failures that happened after the request left the session.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::Status { .. } | Self::MalformedResponse(_) | Self::WorkerLost
        )
    }
}

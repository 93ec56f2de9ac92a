/// What the session is doing, as seen from the host. `reset` is a single
/// synchronous call and always lands in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Drawing,
    Submitting,
}

/// Submission lifecycle driven by the orchestrator. Drawing is tracked by the
/// surface and may overlap an outstanding submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionLifecycle {
    #[default]
    Idle,
    Submitting,
}

pub fn can_transition(from: SubmissionLifecycle, to: SubmissionLifecycle) -> bool {
    matches!(
        (from, to),
        (SubmissionLifecycle::Idle, SubmissionLifecycle::Submitting)
            | (SubmissionLifecycle::Submitting, SubmissionLifecycle::Idle)
    )
}

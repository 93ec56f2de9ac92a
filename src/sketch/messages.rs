use crate::sketch::error::SubmitError;
use crate::sketch::model::Point;
use crate::sketch::protocol::RecognitionResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerToSession {
    Completed {
        generation: u64,
        outcome: Result<Vec<RecognitionResult>, SubmitError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Assignments are already in the variable store; the results still need
    /// placing.
    Applied {
        results: Vec<RecognitionResult>,
        content_center: Option<Point>,
    },
    Failed(SubmitError),
}

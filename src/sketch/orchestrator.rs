use crate::sketch::error::SubmitError;
use crate::sketch::messages::{SubmissionOutcome, WorkerToSession};
use crate::sketch::model::Point;
use crate::sketch::protocol::RecognitionRequest;
use crate::sketch::service::RecognitionService;
use crate::sketch::snapshot::Snapshot;
use crate::sketch::state::{can_transition, SubmissionLifecycle};
use crate::sketch::variables::VariableStore;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

struct InFlight {
    generation: u64,
    content_center: Option<Point>,
    started: Instant,
    worker: JoinHandle<()>,
}

/// Owns the variable store and the single outstanding recognition request.
///
/// The service call runs on a worker thread; its outcome comes back over a
/// channel that the event loop drains through [`RecognitionOrchestrator::poll`].
/// Outcomes from a submission that was superseded by a reset are dropped.
pub struct RecognitionOrchestrator {
    service: Arc<dyn RecognitionService>,
    variables: VariableStore,
    lifecycle: SubmissionLifecycle,
    next_generation: u64,
    in_flight: Option<InFlight>,
    worker_tx: Sender<WorkerToSession>,
    worker_rx: Receiver<WorkerToSession>,
}

impl RecognitionOrchestrator {
    pub fn new(service: Arc<dyn RecognitionService>) -> Self {
        let (worker_tx, worker_rx) = channel();
        Self {
            service,
            variables: VariableStore::default(),
            lifecycle: SubmissionLifecycle::Idle,
            next_generation: 1,
            in_flight: None,
            worker_tx,
            worker_rx,
        }
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn is_submitting(&self) -> bool {
        self.lifecycle == SubmissionLifecycle::Submitting
    }

    /// Hands `snapshot` and a copy of the current bindings to a worker thread.
    /// Returns the generation tag of the new submission.
    pub fn submit(
        &mut self,
        snapshot: Snapshot,
        content_center: Option<Point>,
    ) -> Result<u64, SubmitError> {
        if !can_transition(self.lifecycle, SubmissionLifecycle::Submitting) {
            return Err(SubmitError::Busy);
        }

        let generation = self.next_generation;
        let variables = self.variables.clone();
        let service = Arc::clone(&self.service);
        let tx = self.worker_tx.clone();

        let worker = std::thread::Builder::new()
            .name(format!("recognition-{generation}"))
            .spawn(move || {
                let outcome = RecognitionRequest::from_snapshot(&snapshot, &variables)
                    .and_then(|request| service.recognize(&request));
                let _ = tx.send(WorkerToSession::Completed {
                    generation,
                    outcome,
                });
            })
            .map_err(|err| SubmitError::Transport(format!("spawn recognition worker: {err}")))?;

        self.next_generation += 1;
        self.in_flight = Some(InFlight {
            generation,
            content_center,
            started: Instant::now(),
            worker,
        });
        self.lifecycle = SubmissionLifecycle::Submitting;
        tracing::info!(generation, vars = self.variables.len(), "submission started");
        Ok(generation)
    }

    /// Drains finished work without blocking.
    pub fn poll(&mut self) -> Option<SubmissionOutcome> {
        loop {
            match self.worker_rx.try_recv() {
                Ok(message) => {
                    if let Some(outcome) = self.handle_message(message) {
                        return Some(outcome);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        self.detect_lost_worker()
    }

    /// Blocks for up to `timeout` waiting on the current submission. Meant
    /// for headless drivers; the UI loop uses [`Self::poll`].
    pub fn wait(&mut self, timeout: Duration) -> Option<SubmissionOutcome> {
        let deadline = Instant::now() + timeout;
        while self.in_flight.is_some() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            match self.worker_rx.recv_timeout(remaining) {
                Ok(message) => {
                    if let Some(outcome) = self.handle_message(message) {
                        return Some(outcome);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return self.detect_lost_worker(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        None
    }

    /// Forgets all bindings and abandons the outstanding submission. Runs to
    /// completion in one call, so no intermediate lifecycle is observable.
    pub fn reset(&mut self) {
        self.variables.reset();
        if let Some(abandoned) = self.in_flight.take() {
            tracing::info!(
                generation = abandoned.generation,
                "in-flight submission abandoned by reset"
            );
        }
        while self.worker_rx.try_recv().is_ok() {}
        self.lifecycle = SubmissionLifecycle::Idle;
    }

    fn handle_message(&mut self, message: WorkerToSession) -> Option<SubmissionOutcome> {
        let WorkerToSession::Completed {
            generation,
            outcome,
        } = message;

        let current = self.in_flight.as_ref().map(|f| f.generation);
        if current != Some(generation) {
            tracing::debug!(generation, ?current, "dropping stale recognition outcome");
            return None;
        }
        let in_flight = self.in_flight.take()?;
        self.lifecycle = SubmissionLifecycle::Idle;
        let elapsed_ms = in_flight.started.elapsed().as_millis() as u64;

        match outcome {
            Ok(results) => {
                for result in results.iter().filter(|r| r.is_assignment) {
                    self.variables.set(&result.expression, &result.value);
                }
                tracing::info!(
                    generation,
                    elapsed_ms,
                    results = results.len(),
                    vars = self.variables.len(),
                    "submission applied"
                );
                Some(SubmissionOutcome::Applied {
                    results,
                    content_center: in_flight.content_center,
                })
            }
            Err(err) => {
                tracing::warn!(generation, elapsed_ms, error = %err, "submission failed");
                Some(SubmissionOutcome::Failed(err))
            }
        }
    }

    fn detect_lost_worker(&mut self) -> Option<SubmissionOutcome> {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.worker.is_finished());
        if !finished {
            return None;
        }
        // A finished worker sends before exiting, so check the channel once more.
        if let Ok(message) = self.worker_rx.try_recv() {
            return self.handle_message(message);
        }
        let lost = self.in_flight.take()?;
        self.lifecycle = SubmissionLifecycle::Idle;
        tracing::error!(generation = lost.generation, "recognition worker exited silently");
        Some(SubmissionOutcome::Failed(SubmitError::WorkerLost))
    }
}

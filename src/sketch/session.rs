use crate::settings::SolverSettings;
use crate::sketch::bounds;
use crate::sketch::error::SubmitError;
use crate::sketch::input::{apply_pointer, PointerEvent};
use crate::sketch::messages::SubmissionOutcome;
use crate::sketch::model::{Color, Point, StrokeStyle};
use crate::sketch::orchestrator::RecognitionOrchestrator;
use crate::sketch::placement::{PlacedResult, PlacementManager, ResultRenderer};
use crate::sketch::service::RecognitionService;
use crate::sketch::state::SessionState;
use crate::sketch::surface::StrokeSurface;
use crate::sketch::variables::VariableStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub stroke: StrokeStyle,
    pub placement_delay: Duration,
    pub default_anchor: Point,
    pub submit_empty_canvas: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_settings(&SolverSettings::default())
    }
}

impl SessionConfig {
    pub fn from_settings(settings: &SolverSettings) -> Self {
        Self {
            stroke: StrokeStyle {
                width: settings.stroke_width.max(1),
                color: settings.default_color,
            },
            placement_delay: Duration::from_millis(settings.placement_delay_ms),
            default_anchor: settings.default_anchor,
            submit_empty_canvas: settings.submit_empty_canvas,
        }
    }
}

/// Everything one canvas needs between two resets. Owned by the UI host and
/// driven from its event loop: pointer events, `submit`, `reset`, and a
/// `tick` per frame.
pub struct SketchSession {
    config: SessionConfig,
    surface: StrokeSurface,
    orchestrator: RecognitionOrchestrator,
    placement: PlacementManager,
    last_error: Option<SubmitError>,
}

impl SketchSession {
    pub fn new(config: SessionConfig, service: Arc<dyn RecognitionService>) -> Self {
        Self {
            surface: StrokeSurface::new(config.stroke),
            orchestrator: RecognitionOrchestrator::new(service),
            placement: PlacementManager::new(config.placement_delay, config.default_anchor),
            config,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.orchestrator.is_submitting() {
            SessionState::Submitting
        } else if self.surface.is_drawing() {
            SessionState::Drawing
        } else {
            SessionState::Idle
        }
    }

    pub fn init_surface(&mut self, width: u32, height: u32) -> bool {
        self.surface.init(width, height)
    }

    pub fn surface(&self) -> &StrokeSurface {
        &self.surface
    }

    pub fn variables(&self) -> &VariableStore {
        self.orchestrator.variables()
    }

    pub fn placed(&self) -> &[PlacedResult] {
        self.placement.placed()
    }

    pub fn pending_placements(&self) -> usize {
        self.placement.pending_len()
    }

    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    /// Earliest moment `tick` has scheduled work to do, if any.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.placement.next_due()
    }

    pub fn has_pending_work(&self) -> bool {
        self.orchestrator.is_submitting() || self.placement.pending_len() > 0
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) {
        let before = self.surface.is_drawing();
        apply_pointer(&mut self.surface, event);
        if before != self.surface.is_drawing() {
            tracing::debug!(?event, drawing = self.surface.is_drawing(), "stroke state changed");
        }
    }

    pub fn set_color(&mut self, color: Color) {
        self.surface.set_color(color);
    }

    /// Snapshots the surface and starts a recognition request. Rejections are
    /// also kept as [`Self::last_error`] for the status line.
    pub fn submit(&mut self) -> Result<u64, SubmitError> {
        let result = self.start_submission();
        match &result {
            Ok(generation) => {
                self.last_error = None;
                tracing::debug!(generation, "sketch submitted");
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission rejected");
                self.last_error = Some(err.clone());
            }
        }
        result
    }

    fn start_submission(&mut self) -> Result<u64, SubmitError> {
        if self.orchestrator.is_submitting() {
            return Err(SubmitError::Busy);
        }
        let snapshot = self
            .surface
            .snapshot()
            .ok_or(SubmitError::InputUnavailable)?;
        let content = bounds::extract(&snapshot);
        if content.is_none() && !self.config.submit_empty_canvas {
            return Err(SubmitError::EmptyCanvas);
        }
        if let Some(content) = content {
            tracing::debug!(?content, "content bounds");
        }
        self.orchestrator
            .submit(snapshot, content.map(|b| b.center()))
    }

    /// Applies a finished submission, if any, and reveals placements whose
    /// delay has elapsed. Returns the number of newly visible results.
    pub fn tick(&mut self, now: Instant) -> usize {
        if let Some(outcome) = self.orchestrator.poll() {
            self.apply_outcome(outcome, now);
        }
        self.placement.tick(now)
    }

    /// Blocks until the outstanding submission resolves or `timeout` passes.
    /// Returns `false` on timeout.
    pub fn wait_for_submission(&mut self, timeout: Duration) -> bool {
        if !self.orchestrator.is_submitting() {
            return true;
        }
        match self.orchestrator.wait(timeout) {
            Some(outcome) => {
                self.apply_outcome(outcome, Instant::now());
                true
            }
            None => false,
        }
    }

    fn apply_outcome(&mut self, outcome: SubmissionOutcome, now: Instant) {
        match outcome {
            SubmissionOutcome::Applied {
                results,
                content_center,
            } => {
                let anchor = self.placement.resolve_anchor(content_center);
                for result in &results {
                    self.placement.place(result, anchor, now);
                }
                self.surface.clear();
                self.last_error = None;
            }
            SubmissionOutcome::Failed(err) => {
                tracing::error!(error = %err, "recognition failed; sketch kept for retry");
                self.last_error = Some(err);
            }
        }
    }

    pub fn reposition(&mut self, index: usize, position: Point) -> bool {
        self.placement.reposition(index, position)
    }

    pub fn render_results(&mut self, renderer: &mut dyn ResultRenderer) {
        self.placement.render_with(renderer);
    }

    /// Clears the surface, the variable store and every placed or pending
    /// result in one step. The selected color survives.
    pub fn reset(&mut self) {
        tracing::info!("session reset");
        self.surface.end_stroke();
        self.surface.clear();
        self.orchestrator.reset();
        self.placement.clear_all();
        self.last_error = None;
    }
}

use crate::sketch::model::Point;
use crate::sketch::protocol::RecognitionResult;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedResult {
    pub expression: String,
    pub value: String,
    /// TeX markup handed to the typesetting renderer.
    pub renderable_text: String,
    pub position: Point,
}

impl PlacedResult {
    pub fn from_result(result: &RecognitionResult, position: Point) -> Self {
        Self {
            expression: result.expression.clone(),
            value: result.value.clone(),
            renderable_text: latex_text(&result.expression, &result.value),
            position,
        }
    }

    pub fn label(&self) -> String {
        format!("{} = {}", self.expression, self.value)
    }
}

pub fn latex_text(expression: &str, value: &str) -> String {
    format!("\\(\\LARGE{{{expression} = {value}}}\\)")
}

/// Draws placed results. Returning a position reports that the user dragged
/// the entry there.
pub trait ResultRenderer {
    fn render(&mut self, index: usize, result: &PlacedResult) -> Option<Point>;
}

#[derive(Debug, Clone, PartialEq)]
struct PendingPlacement {
    due: Instant,
    result: PlacedResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementManager {
    placed: Vec<PlacedResult>,
    pending: VecDeque<PendingPlacement>,
    delay: Duration,
    default_anchor: Point,
    last_anchor: Point,
}

impl PlacementManager {
    pub fn new(delay: Duration, default_anchor: Point) -> Self {
        Self {
            placed: Vec::new(),
            pending: VecDeque::new(),
            delay,
            default_anchor,
            last_anchor: default_anchor,
        }
    }

    pub fn placed(&self) -> &[PlacedResult] {
        &self.placed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.pending.front().map(|p| p.due)
    }

    pub fn last_anchor(&self) -> Point {
        self.last_anchor
    }

    /// Picks the anchor for a new batch: the content center when there is
    /// one, otherwise wherever the last batch or drag ended up.
    pub fn resolve_anchor(&mut self, content_center: Option<Point>) -> Point {
        if let Some(center) = content_center {
            self.last_anchor = center;
        }
        self.last_anchor
    }

    /// Schedules `result` to appear at `anchor` once the placement delay has
    /// elapsed. Order of appearance follows call order.
    pub fn place(&mut self, result: &RecognitionResult, anchor: Point, now: Instant) {
        self.pending.push_back(PendingPlacement {
            due: now + self.delay,
            result: PlacedResult::from_result(result, anchor),
        });
        if self.delay.is_zero() {
            self.tick(now);
        }
    }

    /// Moves every placement whose delay has elapsed into the visible list.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut promoted = 0;
        while self.pending.front().is_some_and(|p| p.due <= now) {
            if let Some(pending) = self.pending.pop_front() {
                tracing::debug!(label = %pending.result.label(), "result placed");
                self.placed.push(pending.result);
                promoted += 1;
            }
        }
        promoted
    }

    pub fn reposition(&mut self, index: usize, position: Point) -> bool {
        let Some(entry) = self.placed.get_mut(index) else {
            return false;
        };
        entry.position = position;
        self.last_anchor = position;
        true
    }

    /// Drops visible and pending results alike.
    pub fn clear_all(&mut self) {
        self.placed.clear();
        self.pending.clear();
        self.last_anchor = self.default_anchor;
    }

    pub fn render_with(&mut self, renderer: &mut dyn ResultRenderer) {
        for index in 0..self.placed.len() {
            if let Some(position) = renderer.render(index, &self.placed[index]) {
                self.reposition(index, position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(1000);

    fn manager() -> PlacementManager {
        PlacementManager::new(DELAY, Point::new(10.0, 200.0))
    }

    #[test]
    fn placement_waits_for_delay() {
        let mut manager = manager();
        let now = Instant::now();
        manager.place(&RecognitionResult::new("2 + 2", "4", false), Point::new(50.0, 60.0), now);

        assert_eq!(manager.tick(now + Duration::from_millis(999)), 0);
        assert!(manager.placed().is_empty());
        assert_eq!(manager.next_due(), Some(now + DELAY));

        assert_eq!(manager.tick(now + DELAY), 1);
        let placed = &manager.placed()[0];
        assert_eq!(placed.position, Point::new(50.0, 60.0));
        assert_eq!(placed.renderable_text, "\\(\\LARGE{2 + 2 = 4}\\)");
        assert_eq!(placed.label(), "2 + 2 = 4");
    }

    #[test]
    fn zero_delay_places_immediately_in_order() {
        let mut manager = PlacementManager::new(Duration::ZERO, Point::default());
        let now = Instant::now();
        manager.place(&RecognitionResult::new("a", "1", true), Point::default(), now);
        manager.place(&RecognitionResult::new("b", "2", true), Point::default(), now);

        let labels: Vec<_> = manager.placed().iter().map(PlacedResult::label).collect();
        assert_eq!(labels, vec!["a = 1", "b = 2"]);
    }

    #[test]
    fn reposition_moves_only_the_target_entry() {
        let mut manager = PlacementManager::new(Duration::ZERO, Point::default());
        let now = Instant::now();
        for expr in ["a", "b", "c"] {
            manager.place(&RecognitionResult::new(expr, "0", false), Point::new(1.0, 1.0), now);
        }

        assert!(manager.reposition(1, Point::new(30.0, 40.0)));

        let positions: Vec<_> = manager.placed().iter().map(|p| p.position).collect();
        assert_eq!(
            positions,
            vec![Point::new(1.0, 1.0), Point::new(30.0, 40.0), Point::new(1.0, 1.0)]
        );
        assert!(!manager.reposition(3, Point::new(0.0, 0.0)));
    }

    #[test]
    fn anchor_falls_back_to_last_known_position() {
        let mut manager = manager();
        assert_eq!(manager.resolve_anchor(None), Point::new(10.0, 200.0));
        assert_eq!(
            manager.resolve_anchor(Some(Point::new(70.0, 80.0))),
            Point::new(70.0, 80.0)
        );
        assert_eq!(manager.resolve_anchor(None), Point::new(70.0, 80.0));
    }

    #[test]
    fn clear_all_cancels_pending_and_restores_default_anchor() {
        let mut manager = manager();
        let now = Instant::now();
        manager.resolve_anchor(Some(Point::new(5.0, 5.0)));
        manager.place(&RecognitionResult::new("x", "1", true), Point::new(5.0, 5.0), now);
        manager.tick(now + DELAY);
        manager.place(&RecognitionResult::new("y", "2", true), Point::new(5.0, 5.0), now + DELAY);

        manager.clear_all();
        manager.tick(now + DELAY * 3);

        assert_eq!(manager, self::manager());
    }

    struct DragFirst;

    impl ResultRenderer for DragFirst {
        fn render(&mut self, index: usize, _result: &PlacedResult) -> Option<Point> {
            (index == 0).then_some(Point::new(99.0, 98.0))
        }
    }

    #[test]
    fn renderer_drag_feedback_updates_position_and_anchor() {
        let mut manager = PlacementManager::new(Duration::ZERO, Point::default());
        let now = Instant::now();
        manager.place(&RecognitionResult::new("a", "1", false), Point::new(1.0, 2.0), now);
        manager.place(&RecognitionResult::new("b", "2", false), Point::new(1.0, 2.0), now);

        manager.render_with(&mut DragFirst);

        assert_eq!(manager.placed()[0].position, Point::new(99.0, 98.0));
        assert_eq!(manager.placed()[1].position, Point::new(1.0, 2.0));
        assert_eq!(manager.last_anchor(), Point::new(99.0, 98.0));
    }
}

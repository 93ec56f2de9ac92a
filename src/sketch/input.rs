use crate::sketch::model::Point;
use crate::sketch::surface::StrokeSurface;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
    Leave,
}

/// Maps raw pointer events onto stroke operations. Leaving the surface ends
/// the stroke just like releasing the button.
pub fn apply_pointer(surface: &mut StrokeSurface, event: PointerEvent) {
    match event {
        PointerEvent::Down(point) => surface.begin_stroke(point),
        PointerEvent::Move(point) => surface.extend_stroke(point),
        PointerEvent::Up | PointerEvent::Leave => surface.end_stroke(),
    }
}

//! Drag-to-scroll controller
//!
//! Lets a pointer drag a horizontally scrollable region. One controller is
//! created per region; the controller never owns the region, it is handed a
//! `ScrollRegion` on every pointer event.
//!
//! The "dragged" flag outlives the gesture on purpose: the click that a
//! terminal or browser delivers right after pointer-up must still see it.
//! It is reset on the next pointer-down.

use crate::region::{ScrollBehavior, ScrollRegion};
use tracing::trace;

/// Movement beyond which a press counts as a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 1.0;

/// Pointer affordance for the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Grab,
    Grabbing,
}

/// Origin of the gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub start_x: f32,
    pub start_scroll: f32,
}

#[derive(Debug, Clone)]
pub struct DragScroll {
    session: Option<DragSession>,
    dragged: bool,
    threshold: f32,
}

impl Default for DragScroll {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

impl DragScroll {
    pub fn new(threshold: f32) -> Self {
        Self {
            session: None,
            dragged: false,
            threshold: threshold.max(0.0),
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    /// True while the pointer is down on the region.
    pub fn is_pressed(&self) -> bool {
        self.session.is_some()
    }

    /// True once the current or just-finished gesture moved past the
    /// threshold. Click handlers must do nothing while this holds.
    pub fn is_dragging(&self) -> bool {
        self.dragged
    }

    pub fn cursor(&self) -> Cursor {
        if self.dragged && self.is_pressed() {
            Cursor::Grabbing
        } else {
            Cursor::Grab
        }
    }

    pub fn pointer_down(&mut self, x: f32, region: &dyn ScrollRegion) {
        self.dragged = false;
        self.session = Some(DragSession {
            start_x: x,
            start_scroll: region.scroll_offset(),
        });
    }

    /// Follow the pointer. Returns false when no press is in progress.
    pub fn pointer_move(&mut self, x: f32, region: &mut dyn ScrollRegion) -> bool {
        let Some(session) = self.session else {
            return false;
        };
        let delta = x - session.start_x;
        // Content follows the pointer, so the offset moves the other way.
        region.scroll_to(session.start_scroll - delta, ScrollBehavior::Instant);
        if !self.dragged && delta.abs() > self.threshold {
            trace!(delta, "drag threshold crossed");
            self.dragged = true;
        }
        true
    }

    /// End the gesture. Returns whether it was a drag.
    pub fn pointer_up(&mut self) -> bool {
        self.session = None;
        self.dragged
    }

    pub fn pointer_leave(&mut self) {
        self.session = None;
    }
}

/// A region paired with its drag controller.
#[derive(Debug, Clone)]
pub struct Draggable<R> {
    pub region: R,
    pub drag: DragScroll,
}

impl<R: ScrollRegion> Draggable<R> {
    pub fn new(region: R, threshold: f32) -> Self {
        Self {
            region,
            drag: DragScroll::new(threshold),
        }
    }

    pub fn pointer_down(&mut self, x: f32) {
        self.drag.pointer_down(x, &self.region);
    }

    pub fn pointer_move(&mut self, x: f32) -> bool {
        self.drag.pointer_move(x, &mut self.region)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.drag.pointer_up()
    }

    pub fn pointer_leave(&mut self) {
        self.drag.pointer_leave();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }
}

impl<R: ScrollRegion> ScrollRegion for Draggable<R> {
    fn scroll_offset(&self) -> f32 {
        self.region.scroll_offset()
    }

    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) {
        self.region.scroll_to(offset, behavior);
    }

    fn is_held(&self) -> bool {
        self.drag.is_pressed() || self.region.is_held()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Strip {
        offset: f32,
    }

    impl ScrollRegion for Strip {
        fn scroll_offset(&self) -> f32 {
            self.offset
        }

        fn scroll_to(&mut self, offset: f32, _behavior: ScrollBehavior) {
            self.offset = offset.max(0.0);
        }
    }

    #[test]
    fn test_drag_moves_content_opposite_to_pointer() {
        let mut strip = Strip { offset: 200.0 };
        let mut drag = DragScroll::default();

        drag.pointer_down(100.0, &strip);
        assert!(drag.pointer_move(160.0, &mut strip));
        assert_eq!(strip.offset, 140.0);

        assert!(drag.pointer_move(40.0, &mut strip));
        assert_eq!(strip.offset, 260.0);
    }

    #[test]
    fn test_small_drag_suppresses_click() {
        let mut strip = Strip::default();
        let mut drag = DragScroll::default();

        drag.pointer_down(50.0, &strip);
        drag.pointer_move(52.0, &mut strip);
        drag.pointer_up();

        // The click for the same gesture arrives after pointer-up.
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_press_without_move_is_a_click() {
        let strip = Strip::default();
        let mut drag = DragScroll::default();

        drag.pointer_down(50.0, &strip);
        assert!(!drag.pointer_up());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_next_press_resets_drag_flag() {
        let mut strip = Strip::default();
        let mut drag = DragScroll::default();

        drag.pointer_down(0.0, &strip);
        drag.pointer_move(30.0, &mut strip);
        drag.pointer_up();
        assert!(drag.is_dragging());

        drag.pointer_down(10.0, &strip);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut strip = Strip { offset: 80.0 };
        let mut drag = DragScroll::default();

        assert!(!drag.pointer_move(500.0, &mut strip));
        assert_eq!(strip.offset, 80.0);
    }

    #[test]
    fn test_leave_ends_session() {
        let mut strip = Strip::default();
        let mut drag = DragScroll::default();

        drag.pointer_down(0.0, &strip);
        drag.pointer_move(20.0, &mut strip);
        assert_eq!(drag.cursor(), Cursor::Grabbing);

        drag.pointer_leave();
        assert!(!drag.is_pressed());
        assert_eq!(drag.cursor(), Cursor::Grab);
        assert!(!drag.pointer_move(90.0, &mut strip));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let mut strip = Strip::default();
        let mut drag = DragScroll::new(5.0);

        drag.pointer_down(0.0, &strip);
        drag.pointer_move(4.0, &mut strip);
        assert!(!drag.is_dragging());
        drag.pointer_move(6.0, &mut strip);
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_draggable_reports_held_while_pressed() {
        let mut strip = Draggable::new(Strip::default(), DEFAULT_DRAG_THRESHOLD);
        assert!(!strip.is_held());

        strip.pointer_down(10.0);
        assert!(strip.is_held());

        strip.pointer_up();
        assert!(!strip.is_held());
    }
}

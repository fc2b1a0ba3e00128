//! Scrollable regions
//!
//! `ScrollRegion` is the contract the synchronizer and the drag controller
//! consume: read the offset, command a scroll, and report whether the user is
//! holding the region. `ScrollArea` is the in-process implementation used by
//! the front-end. It clamps offsets, animates smooth scrolls with an eased
//! tween advanced by `tick`, and queues a scroll event whenever its offset
//! changes so that listeners see the same echoes a browser would deliver.

use std::time::{Duration, Instant};

/// How a commanded scroll reaches its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Horizontal scroll container as seen by the sync and drag logic.
pub trait ScrollRegion {
    /// Current horizontal offset in pixels.
    fn scroll_offset(&self) -> f32;

    /// Command a scroll to `offset`.
    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior);

    /// True while a pointer press is in progress on the region.
    fn is_held(&self) -> bool {
        false
    }
}

/// Distance between consecutive item anchors: item width plus gap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pitch {
    item: f32,
    gap: f32,
}

impl Pitch {
    pub fn new(item: f32, gap: f32) -> Self {
        Self { item, gap }
    }

    pub fn item(&self) -> f32 {
        self.item
    }

    pub fn gap(&self) -> f32 {
        self.gap
    }

    pub fn value(&self) -> f32 {
        self.item + self.gap
    }

    /// Nearest anchor index for `offset`. May be negative or past the end;
    /// range checks belong to the caller.
    pub fn index_at(&self, offset: f32) -> i64 {
        let pitch = self.value();
        if pitch <= 0.0 {
            return 0;
        }
        (offset / pitch).round() as i64
    }

    pub fn offset_of(&self, index: usize) -> f32 {
        index as f32 * self.value()
    }

    /// Item covering content coordinate `x`, ignoring the gaps between items.
    pub fn item_at(&self, x: f32, count: usize) -> Option<usize> {
        let pitch = self.value();
        if x < 0.0 || pitch <= 0.0 {
            return None;
        }
        let index = (x / pitch).floor() as usize;
        let within = x - index as f32 * pitch;
        (index < count && within < self.item).then_some(index)
    }

    /// Total content length of `count` items laid out at this pitch.
    pub fn extent(&self, count: usize) -> f32 {
        match count {
            0 => 0.0,
            n => n as f32 * self.item + (n - 1) as f32 * self.gap,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    started: Option<Instant>,
    duration: Duration,
}

impl Tween {
    fn sample(&mut self, now: Instant) -> (f32, bool) {
        let started = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);
        if elapsed >= self.duration || self.duration.is_zero() {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = smoothstep(t.clamp(0.0, 1.0));
        (self.from + (self.to - self.from) * eased, false)
    }
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// A clamped, optionally animated horizontal scroll container.
#[derive(Debug, Clone)]
pub struct ScrollArea {
    offset: f32,
    content: f32,
    viewport: f32,
    leading: f32,
    trailing: f32,
    tween: Option<Tween>,
    smooth_duration: Duration,
    pending_event: bool,
}

impl ScrollArea {
    pub fn new(content: f32, smooth_duration: Duration) -> Self {
        Self {
            offset: 0.0,
            content,
            viewport: 0.0,
            leading: 0.0,
            trailing: 0.0,
            tween: None,
            smooth_duration,
            pending_event: false,
        }
    }

    /// Blank space before the first and after the last item.
    pub fn with_padding(mut self, leading: f32, trailing: f32) -> Self {
        self.leading = leading;
        self.trailing = trailing;
        self
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport(&self) -> f32 {
        self.viewport
    }

    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn max_offset(&self) -> f32 {
        (self.leading + self.content + self.trailing - self.viewport).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Resize the visible window. Padding is recomputed by the owner when
    /// centring depends on the viewport.
    pub fn set_viewport(&mut self, viewport: f32) {
        self.viewport = viewport.max(0.0);
        self.reclamp();
    }

    pub fn set_content(&mut self, content: f32) {
        self.content = content.max(0.0);
        self.reclamp();
    }

    pub fn set_padding(&mut self, leading: f32, trailing: f32) {
        self.leading = leading.max(0.0);
        self.trailing = trailing.max(0.0);
        self.reclamp();
    }

    /// Convert a viewport x coordinate into a content coordinate.
    pub fn content_x(&self, viewport_x: f32) -> f32 {
        viewport_x + self.offset - self.leading
    }

    /// Relative user scroll, e.g. from a wheel.
    pub fn scroll_by(&mut self, delta: f32) {
        let target = self.offset + delta;
        self.scroll_to(target, ScrollBehavior::Instant);
    }

    /// Animate to the anchor nearest to the current offset.
    pub fn snap(&mut self, pitch: Pitch, count: usize) {
        let last = count.saturating_sub(1) as i64;
        let index = pitch.index_at(self.offset).clamp(0, last) as usize;
        self.scroll_to(pitch.offset_of(index), ScrollBehavior::Smooth);
    }

    /// Advance a running animation. Returns true on the tick that finishes it.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return false;
        };
        let (position, done) = tween.sample(now);
        if done {
            self.tween = None;
        }
        self.set_offset(position);
        done
    }

    /// The scroll event queued since the last call, carrying the offset at
    /// delivery time. Several offset changes between two calls coalesce into
    /// one event.
    pub fn take_scroll_event(&mut self) -> Option<f32> {
        std::mem::take(&mut self.pending_event).then_some(self.offset)
    }

    fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max_offset())
    }

    fn set_offset(&mut self, offset: f32) {
        let clamped = self.clamp(offset);
        if (clamped - self.offset).abs() > f32::EPSILON {
            self.offset = clamped;
            self.pending_event = true;
        }
    }

    fn reclamp(&mut self) {
        let offset = self.offset;
        self.set_offset(offset);
        let max = self.max_offset();
        if let Some(tween) = self.tween.as_mut() {
            tween.to = tween.to.clamp(0.0, max);
        }
    }
}

impl ScrollRegion for ScrollArea {
    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) {
        let target = self.clamp(offset);
        match behavior {
            ScrollBehavior::Instant => {
                self.tween = None;
                self.set_offset(target);
            }
            ScrollBehavior::Smooth => {
                self.tween = Some(Tween {
                    from: self.offset,
                    to: target,
                    started: None,
                    duration: self.smooth_duration,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> ScrollArea {
        // Six 300px cards with 20px gaps in a 320px window.
        let pitch = Pitch::new(300.0, 20.0);
        let mut area = ScrollArea::new(pitch.extent(6), Duration::from_millis(400));
        area.set_viewport(320.0);
        area
    }

    #[test]
    fn test_pitch_rounding() {
        let pitch = Pitch::new(300.0, 20.0);
        assert_eq!(pitch.value(), 320.0);
        assert_eq!(pitch.index_at(960.0), 3);
        assert_eq!(pitch.index_at(1110.0), 3);
        assert_eq!(pitch.index_at(1130.0), 4);
        assert_eq!(pitch.index_at(-200.0), -1);
        assert_eq!(pitch.offset_of(3), 960.0);
    }

    #[test]
    fn test_item_hit_testing_skips_gaps() {
        let pitch = Pitch::new(300.0, 20.0);
        assert_eq!(pitch.item_at(10.0, 6), Some(0));
        assert_eq!(pitch.item_at(310.0, 6), None);
        assert_eq!(pitch.item_at(330.0, 6), Some(1));
        assert_eq!(pitch.item_at(6.0 * 320.0, 6), None);
        assert_eq!(pitch.item_at(-1.0, 6), None);
    }

    #[test]
    fn test_instant_scroll_is_clamped_and_queues_event() {
        let mut area = area();
        area.scroll_to(10_000.0, ScrollBehavior::Instant);

        assert_eq!(area.offset(), area.max_offset());
        assert_eq!(area.take_scroll_event(), Some(area.max_offset()));
        assert_eq!(area.take_scroll_event(), None);
    }

    #[test]
    fn test_smooth_scroll_animates_over_duration() {
        let mut area = area();
        let t0 = Instant::now();
        area.scroll_to(640.0, ScrollBehavior::Smooth);

        assert!(!area.tick(t0));
        assert_eq!(area.offset(), 0.0);

        assert!(!area.tick(t0 + Duration::from_millis(200)));
        let mid = area.offset();
        assert!(mid > 0.0 && mid < 640.0, "midway offset was {mid}");
        assert_eq!(area.take_scroll_event(), Some(mid));

        assert!(area.tick(t0 + Duration::from_millis(400)));
        assert_eq!(area.offset(), 640.0);
        assert!(!area.is_animating());
    }

    #[test]
    fn test_unchanged_offset_queues_nothing() {
        let mut area = area();
        area.scroll_to(0.0, ScrollBehavior::Instant);
        assert_eq!(area.take_scroll_event(), None);
    }

    #[test]
    fn test_snap_picks_nearest_card() {
        let mut area = area();
        let pitch = Pitch::new(300.0, 20.0);
        let t0 = Instant::now();
        area.scroll_to(500.0, ScrollBehavior::Instant);
        area.snap(pitch, 6);
        area.tick(t0);
        area.tick(t0 + Duration::from_secs(1));

        assert_eq!(area.offset(), 640.0);
    }

    #[test]
    fn test_padding_extends_scroll_range() {
        let pitch = Pitch::new(300.0, 20.0);
        let mut area = ScrollArea::new(pitch.extent(6), Duration::ZERO).with_padding(100.0, 100.0);
        area.set_viewport(500.0);

        // 100 + 1900 + 100 - 500
        assert_eq!(area.max_offset(), 1600.0);
        assert_eq!(area.content_x(150.0), 50.0);
    }
}

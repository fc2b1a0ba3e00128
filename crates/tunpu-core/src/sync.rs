//! Dual-list index synchronizer
//!
//! Keeps one active index consistent between the hero carousel and the agent
//! strip. Each list reports its scroll position (or an index derived from
//! it); the synchronizer updates the shared index and scrolls the other list
//! to match while holding a `ScrollLock`, so the echo of that programmatic
//! scroll does not come back as a second change.
//!
//! Every mutating call follows the same order: set the index, take the lock,
//! issue the scroll. The lock's expiry is fixed at acquisition.

use crate::lock::{ListId, LockTag, ScrollLock};
use crate::region::{Pitch, ScrollBehavior, ScrollRegion};
use std::time::{Duration, Instant};
use tracing::debug;

/// Offsets closer than this to the destination are left alone.
pub const DEFAULT_SETTLE_TOLERANCE: f32 = 10.0;

/// A programmatic scroll that was issued.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub list: ListId,
    pub offset: f32,
}

/// What a synchronizer call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The notifying list is locked; this was an echo.
    Suppressed(LockTag),
    /// The computed index is outside `[0, item_count)`.
    OutOfRange(i64),
    /// The index is already active.
    Unchanged,
    /// The active index moved. `follow` is the scroll issued to the other
    /// list, if any.
    Moved {
        index: usize,
        follow: Option<ScrollCommand>,
    },
}

#[derive(Debug, Clone)]
pub struct ListSync {
    active: usize,
    item_count: usize,
    hero_pitch: Pitch,
    agent_pitch: Pitch,
    lock: ScrollLock,
    settle_tolerance: f32,
}

impl ListSync {
    pub fn new(
        item_count: usize,
        hero_pitch: Pitch,
        agent_pitch: Pitch,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            active: 0,
            item_count,
            hero_pitch,
            agent_pitch,
            lock: ScrollLock::new(lock_timeout),
            settle_tolerance: DEFAULT_SETTLE_TOLERANCE,
        }
    }

    pub fn with_settle_tolerance(mut self, tolerance: f32) -> Self {
        self.settle_tolerance = tolerance.max(0.0);
        self
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn pitch(&self, list: ListId) -> Pitch {
        match list {
            ListId::Hero => self.hero_pitch,
            ListId::Agents => self.agent_pitch,
        }
    }

    pub fn lock(&self) -> &ScrollLock {
        &self.lock
    }

    pub fn lock_mut(&mut self) -> &mut ScrollLock {
        &mut self.lock
    }

    /// Scroll offset at which `list` shows the active item.
    pub fn target_offset(&self, list: ListId) -> f32 {
        self.pitch(list).offset_of(self.active)
    }

    /// The hero carousel scrolled; drive the agent strip.
    pub fn on_hero_scroll(
        &mut self,
        offset: f32,
        agents: &mut dyn ScrollRegion,
        now: Instant,
    ) -> SyncOutcome {
        self.on_scroll(ListId::Hero, offset, agents, now)
    }

    /// The agent strip scrolled; drive the hero carousel.
    pub fn on_agents_scroll(
        &mut self,
        offset: f32,
        hero: &mut dyn ScrollRegion,
        now: Instant,
    ) -> SyncOutcome {
        self.on_scroll(ListId::Agents, offset, hero, now)
    }

    /// A scroll event from `source`; `target` is the other list.
    pub fn on_scroll(
        &mut self,
        source: ListId,
        offset: f32,
        target: &mut dyn ScrollRegion,
        now: Instant,
    ) -> SyncOutcome {
        if let Some(tag) = self.suppressing(source, now) {
            return SyncOutcome::Suppressed(tag);
        }
        let index = self.pitch(source).index_at(offset);
        self.apply(source, index, target, now)
    }

    /// Same contract as `on_scroll`, for a source that reports an index
    /// instead of an offset.
    pub fn on_index_change(
        &mut self,
        source: ListId,
        index: i64,
        target: &mut dyn ScrollRegion,
        now: Instant,
    ) -> SyncOutcome {
        if let Some(tag) = self.suppressing(source, now) {
            return SyncOutcome::Suppressed(tag);
        }
        self.apply(source, index, target, now)
    }

    /// Set the index from an explicit selection without scrolling anything.
    pub fn select(&mut self, index: usize, now: Instant) -> SyncOutcome {
        self.select_inner(index, None, now)
    }

    /// Set the index from an explicit selection and move `list` to it while
    /// holding a lock tagged `tag`, so the list's echo is not read as a second
    /// user-driven change.
    pub fn select_and_scroll(
        &mut self,
        index: usize,
        tag: LockTag,
        list: ListId,
        region: &mut dyn ScrollRegion,
        now: Instant,
    ) -> SyncOutcome {
        self.select_inner(index, Some((tag, list, region)), now)
    }

    fn select_inner(
        &mut self,
        index: usize,
        scroll: Option<(LockTag, ListId, &mut dyn ScrollRegion)>,
        now: Instant,
    ) -> SyncOutcome {
        if index >= self.item_count {
            return SyncOutcome::OutOfRange(index as i64);
        }
        let changed = index != self.active;
        self.active = index;

        let follow = match scroll {
            Some((tag, list, region)) if !region.is_held() => {
                let offset = self.pitch(list).offset_of(index);
                self.lock.acquire(tag, now);
                region.scroll_to(offset, ScrollBehavior::Smooth);
                debug!(index, %tag, %list, offset, "selection scrolled");
                Some(ScrollCommand { list, offset })
            }
            _ => None,
        };

        if changed || follow.is_some() {
            SyncOutcome::Moved { index, follow }
        } else {
            SyncOutcome::Unchanged
        }
    }

    /// Bring `list` to the active index. Reuses the current lock when it
    /// already covers `list`, otherwise takes `Scrolling(list)`.
    pub fn align(
        &mut self,
        list: ListId,
        region: &mut dyn ScrollRegion,
        now: Instant,
    ) -> Option<ScrollCommand> {
        let offset = self.target_offset(list);
        if region.is_held() || self.within_tolerance(region, offset) {
            return None;
        }
        if !self.lock.suppresses(list, now) {
            self.lock.acquire(LockTag::Scrolling(list), now);
        }
        region.scroll_to(offset, ScrollBehavior::Smooth);
        debug!(%list, offset, "aligned to active index");
        Some(ScrollCommand { list, offset })
    }

    fn suppressing(&self, source: ListId, now: Instant) -> Option<LockTag> {
        self.lock.current(now).filter(|tag| tag.suppresses(source))
    }

    fn within_tolerance(&self, region: &dyn ScrollRegion, offset: f32) -> bool {
        (region.scroll_offset() - offset).abs() <= self.settle_tolerance
    }

    fn apply(
        &mut self,
        source: ListId,
        index: i64,
        target: &mut dyn ScrollRegion,
        now: Instant,
    ) -> SyncOutcome {
        if index < 0 || index >= self.item_count as i64 {
            return SyncOutcome::OutOfRange(index);
        }
        let index = index as usize;
        if index == self.active {
            return SyncOutcome::Unchanged;
        }
        self.active = index;

        let other = source.other();
        let offset = self.pitch(other).offset_of(index);
        if target.is_held() {
            debug!(index, %other, "follower is being dragged, not scrolling it");
            return SyncOutcome::Moved { index, follow: None };
        }
        if self.within_tolerance(target, offset) {
            return SyncOutcome::Moved { index, follow: None };
        }

        self.lock.acquire(LockTag::Scrolling(other), now);
        target.scroll_to(offset, ScrollBehavior::Smooth);
        debug!(index, %source, %other, offset, "synchronized");
        SyncOutcome::Moved {
            index,
            follow: Some(ScrollCommand { list: other, offset }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lock::DEFAULT_LOCK_TIMEOUT;

    #[derive(Default)]
    struct Recorder {
        offset: f32,
        held: bool,
        commands: Vec<(f32, ScrollBehavior)>,
    }

    impl ScrollRegion for Recorder {
        fn scroll_offset(&self) -> f32 {
            self.offset
        }

        fn scroll_to(&mut self, offset: f32, behavior: ScrollBehavior) {
            self.commands.push((offset, behavior));
            self.offset = offset;
        }

        fn is_held(&self) -> bool {
            self.held
        }
    }

    fn sync() -> ListSync {
        ListSync::new(6, Pitch::new(300.0, 20.0), Pitch::new(96.0, 0.0), DEFAULT_LOCK_TIMEOUT)
    }

    #[test]
    fn test_hero_scroll_drives_agents() {
        let mut sync = sync();
        let mut agents = Recorder::default();
        let now = Instant::now();

        let outcome = sync.on_hero_scroll(960.0, &mut agents, now);

        assert_eq!(
            outcome,
            SyncOutcome::Moved {
                index: 3,
                follow: Some(ScrollCommand {
                    list: ListId::Agents,
                    offset: 288.0
                }),
            }
        );
        assert_eq!(agents.commands, vec![(288.0, ScrollBehavior::Smooth)]);
        assert!(sync.lock().is_held(LockTag::Scrolling(ListId::Agents), now));
    }

    #[test]
    fn test_echo_is_suppressed() {
        let mut sync = sync();
        let mut agents = Recorder::default();
        let mut hero = Recorder::default();
        let now = Instant::now();

        sync.on_hero_scroll(960.0, &mut agents, now);
        let echo = sync.on_agents_scroll(100.0, &mut hero, now + Duration::from_millis(50));

        assert_eq!(echo, SyncOutcome::Suppressed(LockTag::Scrolling(ListId::Agents)));
        assert_eq!(sync.active_index(), 3);
        assert!(hero.commands.is_empty());
    }

    #[test]
    fn test_hero_keeps_reporting_while_agents_locked() {
        let mut sync = sync();
        let mut agents = Recorder::default();
        let now = Instant::now();

        sync.on_hero_scroll(960.0, &mut agents, now);
        let next = sync.on_hero_scroll(1280.0, &mut agents, now + Duration::from_millis(100));

        assert!(matches!(next, SyncOutcome::Moved { index: 4, .. }));
        assert_eq!(agents.offset, 384.0);
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut sync = sync();
        let mut hero = Recorder::default();
        let now = Instant::now();

        assert_eq!(
            sync.on_agents_scroll(-96.0, &mut hero, now),
            SyncOutcome::OutOfRange(-1)
        );
        assert_eq!(
            sync.on_agents_scroll(96.0 * 6.0, &mut hero, now),
            SyncOutcome::OutOfRange(6)
        );
        assert_eq!(
            sync.on_index_change(ListId::Hero, 42, &mut hero, now),
            SyncOutcome::OutOfRange(42)
        );
        assert_eq!(sync.active_index(), 0);
        assert!(hero.commands.is_empty());
        assert_eq!(sync.lock().current(now), None);
    }

    #[test]
    fn test_same_index_is_unchanged() {
        let mut sync = sync();
        let mut agents = Recorder::default();

        assert_eq!(
            sync.on_hero_scroll(100.0, &mut agents, Instant::now()),
            SyncOutcome::Unchanged
        );
    }

    #[test]
    fn test_held_follower_is_not_scrolled() {
        let mut sync = sync();
        let mut agents = Recorder {
            held: true,
            ..Recorder::default()
        };
        let now = Instant::now();

        let outcome = sync.on_hero_scroll(640.0, &mut agents, now);

        assert_eq!(outcome, SyncOutcome::Moved { index: 2, follow: None });
        assert!(agents.commands.is_empty());
        assert_eq!(sync.lock().current(now), None);
    }

    #[test]
    fn test_follower_already_in_place_is_left_alone() {
        let mut sync = sync();
        let mut agents = Recorder {
            offset: 195.0,
            ..Recorder::default()
        };
        let now = Instant::now();

        let outcome = sync.on_hero_scroll(640.0, &mut agents, now);

        assert_eq!(outcome, SyncOutcome::Moved { index: 2, follow: None });
        assert!(agents.commands.is_empty());
    }

    #[test]
    fn test_index_change_respects_lock() {
        let mut sync = sync();
        let mut agents = Recorder::default();
        let mut hero = Recorder::default();
        let now = Instant::now();

        sync.on_agents_scroll(192.0, &mut hero, now);
        assert!(sync.lock().is_held(LockTag::Scrolling(ListId::Hero), now));

        let echo = sync.on_index_change(ListId::Hero, 1, &mut agents, now);
        assert_eq!(echo, SyncOutcome::Suppressed(LockTag::Scrolling(ListId::Hero)));
        assert_eq!(sync.active_index(), 2);

        let later = now + DEFAULT_LOCK_TIMEOUT + Duration::from_millis(1);
        let user = sync.on_index_change(ListId::Hero, 1, &mut agents, later);
        assert!(matches!(user, SyncOutcome::Moved { index: 1, .. }));
    }

    #[test]
    fn test_select_scrolls_under_click_lock() {
        let mut sync = sync();
        let mut agents = Recorder::default();
        let now = Instant::now();

        let outcome = sync.select_and_scroll(4, LockTag::Click, ListId::Agents, &mut agents, now);

        assert_eq!(
            outcome,
            SyncOutcome::Moved {
                index: 4,
                follow: Some(ScrollCommand {
                    list: ListId::Agents,
                    offset: 384.0
                }),
            }
        );
        assert!(sync.lock().is_held(LockTag::Click, now));

        let mut hero = Recorder::default();
        let echo = sync.on_agents_scroll(96.0, &mut hero, now);
        assert_eq!(echo, SyncOutcome::Suppressed(LockTag::Click));
        assert_eq!(sync.active_index(), 4);
    }

    #[test]
    fn test_select_without_scroll_takes_no_lock() {
        let mut sync = sync();
        let now = Instant::now();

        assert!(matches!(
            sync.select(2, now),
            SyncOutcome::Moved { index: 2, follow: None }
        ));
        assert_eq!(sync.lock().current(now), None);
        assert_eq!(sync.select(9, now), SyncOutcome::OutOfRange(9));
        assert_eq!(sync.active_index(), 2);
    }

    #[test]
    fn test_align_reuses_covering_lock() {
        let mut sync = sync();
        let mut agents = Recorder::default();
        let mut hero = Recorder::default();
        let now = Instant::now();

        sync.select_and_scroll(5, LockTag::Click, ListId::Agents, &mut agents, now);
        let command = sync.align(ListId::Hero, &mut hero, now);

        assert_eq!(
            command,
            Some(ScrollCommand {
                list: ListId::Hero,
                offset: 1600.0
            })
        );
        assert!(sync.lock().is_held(LockTag::Click, now));
        assert_eq!(sync.align(ListId::Hero, &mut hero, now), None);
    }

    #[test]
    fn test_align_takes_lock_when_uncovered() {
        let mut sync = sync();
        let mut hero = Recorder::default();
        let now = Instant::now();
        sync.select(1, now);

        sync.align(ListId::Hero, &mut hero, now);

        assert!(sync.lock().is_held(LockTag::Scrolling(ListId::Hero), now));
    }
}

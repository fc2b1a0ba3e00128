//! Transient scroll lock
//!
//! Records which list is currently being driven by a programmatic scroll so
//! that the scroll events it echoes back are not mistaken for user intent.
//! Expiry is a timestamp rather than a scheduled timer: acquiring a new lock
//! simply replaces the old one, so a stale expiry can never fire.

use std::fmt;
use std::time::{Duration, Instant};
use strum::Display;

/// Default lock lifetime, matching the smooth-scroll animation.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(600);

/// The two synchronized lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ListId {
    /// Wide card carousel (list A)
    #[strum(serialize = "hero")]
    Hero,
    /// Narrow thumbnail strip (list B)
    #[strum(serialize = "agent")]
    Agents,
}

impl ListId {
    pub fn other(self) -> Self {
        match self {
            Self::Hero => Self::Agents,
            Self::Agents => Self::Hero,
        }
    }
}

/// Why a lock is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockTag {
    /// The given list is being scrolled programmatically.
    Scrolling(ListId),
    /// An explicit selection is moving both lists.
    Click,
}

impl LockTag {
    /// Whether notifications from `list` must be ignored under this tag.
    pub fn suppresses(self, list: ListId) -> bool {
        match self {
            Self::Scrolling(driven) => driven == list,
            Self::Click => true,
        }
    }
}

impl fmt::Display for LockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scrolling(list) => write!(f, "scrolling-{list}"),
            Self::Click => f.write_str("click"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct HeldLock {
    tag: LockTag,
    expires_at: Instant,
}

/// At most one tag at a time, last writer wins.
#[derive(Debug, Clone)]
pub struct ScrollLock {
    held: Option<HeldLock>,
    timeout: Duration,
}

impl Default for ScrollLock {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TIMEOUT)
    }
}

impl ScrollLock {
    pub fn new(timeout: Duration) -> Self {
        Self {
            held: None,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Take the lock for `tag`, replacing whatever was held and restarting
    /// the expiry from `now`.
    pub fn acquire(&mut self, tag: LockTag, now: Instant) {
        self.held = Some(HeldLock {
            tag,
            expires_at: now + self.timeout,
        });
    }

    /// The tag in force at `now`, if it has not expired.
    pub fn current(&self, now: Instant) -> Option<LockTag> {
        self.held
            .filter(|held| now < held.expires_at)
            .map(|held| held.tag)
    }

    pub fn is_held(&self, tag: LockTag, now: Instant) -> bool {
        self.current(now) == Some(tag)
    }

    pub fn suppresses(&self, list: ListId, now: Instant) -> bool {
        self.current(now).is_some_and(|tag| tag.suppresses(list))
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.held.map(|held| held.expires_at)
    }

    /// Early release when the animation that owns `tag` reports it settled.
    /// A lock that was superseded by a different tag is left alone.
    pub fn release(&mut self, tag: LockTag) -> bool {
        match self.held {
            Some(held) if held.tag == tag => {
                self.held = None;
                true
            }
            _ => false,
        }
    }

    /// Drop an expired lock. Returns the tag that was cleared.
    pub fn expire(&mut self, now: Instant) -> Option<LockTag> {
        match self.held {
            Some(held) if now >= held.expires_at => {
                self.held = None;
                Some(held.tag)
            }
            _ => None,
        }
    }
}

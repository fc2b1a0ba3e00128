//! Application coordinator
//!
//! `Companion` owns every piece of front-end state: the catalog, the view,
//! the list synchronizer and its lock, the three draggable regions, the chat
//! session and the input line. Front-ends translate terminal or window input
//! into calls on it and render from its accessors; nothing else mutates the
//! regions.
//!
//! Scroll events are not delivered synchronously. Regions queue them when
//! their offset changes and `tick` drains them into the synchronizer, the
//! same way a browser dispatches `scroll` after the frame that moved the
//! content. That is what makes the lock necessary.

use crate::catalog::{Agent, Catalog, HeroCard};
use crate::chat::{ChatSession, PendingRequest};
use crate::drag::{Cursor, Draggable};
use crate::lock::{ListId, LockTag};
use crate::region::{Pitch, ScrollArea, ScrollBehavior, ScrollRegion};
use crate::settings::Settings;
use crate::sync::{ListSync, SyncOutcome};
use std::time::Instant;
use strum::Display;
use tracing::{debug, info};

pub const DEFAULT_PLACEHOLDER: &str = "通天河漂流怎么走～";
pub const BUSY_PLACEHOLDER: &str = "思考中...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum View {
    #[strum(serialize = "home")]
    Home,
    #[strum(serialize = "agent-chat")]
    AgentChat,
}

/// The three horizontally draggable strips on the home view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Region {
    #[strum(serialize = "hero")]
    Hero,
    #[strum(serialize = "agents")]
    Agents,
    #[strum(serialize = "chips")]
    Chips,
}

pub struct Companion {
    catalog: Catalog,
    view: View,
    sync: ListSync,
    hero: Draggable<ScrollArea>,
    agents: Draggable<ScrollArea>,
    chips: Draggable<ScrollArea>,
    chip_pitch: Pitch,
    chat: ChatSession,
    input: String,
    services_open: bool,
    inside_scenic: bool,
    release_on_settle: bool,
}

impl Companion {
    pub fn new(catalog: Catalog, settings: &Settings) -> Self {
        let layout = &settings.layout;
        let count = catalog.agents().len();
        let hero_pitch = layout.hero_pitch();
        let agent_pitch = layout.agent_pitch();
        let chip_pitch = layout.chip_pitch();
        let smooth = settings.sync.smooth_scroll();
        let threshold = settings.drag.threshold_px;

        let sync = ListSync::new(count, hero_pitch, agent_pitch, settings.sync.lock_timeout())
            .with_settle_tolerance(settings.sync.settle_tolerance_px);
        let area = |content: f32| Draggable::new(ScrollArea::new(content, smooth), threshold);
        let inside_scenic = false;

        Self {
            view: View::Home,
            sync,
            hero: area(hero_pitch.extent(count)),
            agents: area(agent_pitch.extent(count)),
            chips: area(chip_pitch.extent(catalog.chips(inside_scenic).len())),
            chip_pitch,
            catalog,
            chat: ChatSession::new(),
            input: String::new(),
            services_open: false,
            inside_scenic,
            release_on_settle: settings.sync.release_on_settle,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn sync(&self) -> &ListSync {
        &self.sync
    }

    pub fn active_index(&self) -> usize {
        self.sync.active_index()
    }

    pub fn active_agent(&self) -> Option<&'static Agent> {
        self.catalog.agent(self.active_index())
    }

    pub fn active_hero(&self) -> Option<&'static HeroCard> {
        self.active_agent()
            .and_then(|agent| self.catalog.hero_for(agent.id))
    }

    pub fn region(&self, region: Region) -> &Draggable<ScrollArea> {
        match region {
            Region::Hero => &self.hero,
            Region::Agents => &self.agents,
            Region::Chips => &self.chips,
        }
    }

    fn region_mut(&mut self, region: Region) -> &mut Draggable<ScrollArea> {
        match region {
            Region::Hero => &mut self.hero,
            Region::Agents => &mut self.agents,
            Region::Chips => &mut self.chips,
        }
    }

    pub fn pitch(&self, region: Region) -> Pitch {
        match region {
            Region::Hero => self.sync.pitch(ListId::Hero),
            Region::Agents => self.sync.pitch(ListId::Agents),
            Region::Chips => self.chip_pitch,
        }
    }

    pub fn item_count(&self, region: Region) -> usize {
        match region {
            Region::Hero | Region::Agents => self.sync.item_count(),
            Region::Chips => self.catalog.chips(self.inside_scenic).len(),
        }
    }

    pub fn cursor(&self, region: Region) -> Cursor {
        self.region(region).drag.cursor()
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub fn is_busy(&self) -> bool {
        self.chat.is_busy()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    pub fn services_open(&self) -> bool {
        self.services_open
    }

    pub fn inside_scenic(&self) -> bool {
        self.inside_scenic
    }

    pub fn placeholder(&self) -> String {
        if self.chat.is_busy() {
            return BUSY_PLACEHOLDER.to_string();
        }
        match (self.view, self.active_hero()) {
            (View::AgentChat, Some(card)) => format!("向{}提问...", card.name),
            _ => DEFAULT_PLACEHOLDER.to_string(),
        }
    }

    /// Keep scroll bounds current. The hero and agent strips are padded so
    /// that the item at offset `i * pitch` sits in the middle of the window.
    pub fn set_viewport(&mut self, region: Region, width: f32) {
        let item = self.pitch(region).item();
        let area = &mut self.region_mut(region).region;
        area.set_viewport(width);
        if region != Region::Chips {
            let pad = ((width - item) / 2.0).max(0.0);
            area.set_padding(pad, pad);
        }
    }

    /// A press on `region`. The user has taken hold of the list, so a lock
    /// left over from an earlier programmatic scroll must not swallow the
    /// movement that follows.
    pub fn pointer_down(&mut self, region: Region, x: f32, now: Instant) {
        self.release_lock_for(region, now);
        self.region_mut(region).pointer_down(x);
    }

    pub fn pointer_move(&mut self, region: Region, x: f32) -> bool {
        self.region_mut(region).pointer_move(x)
    }

    /// Returns whether the gesture was a drag. The hero settles on the
    /// nearest card after a drag.
    pub fn pointer_up(&mut self, region: Region) -> bool {
        let dragged = self.region_mut(region).pointer_up();
        if dragged && region == Region::Hero {
            self.snap_hero();
        }
        dragged
    }

    pub fn pointer_leave(&mut self, region: Region) {
        let was_pressed = self.region(region).drag.is_pressed();
        self.region_mut(region).pointer_leave();
        if was_pressed && region == Region::Hero {
            self.snap_hero();
        }
    }

    fn snap_hero(&mut self) {
        let pitch = self.pitch(Region::Hero);
        let count = self.item_count(Region::Hero);
        self.hero.region.snap(pitch, count);
    }

    /// Wheel input. The hero moves a whole card per notch; the strips
    /// scroll freely.
    pub fn wheel(&mut self, region: Region, delta: f32, now: Instant) {
        match region {
            Region::Hero if delta > 0.0 => self.step_hero(1, now),
            Region::Hero if delta < 0.0 => self.step_hero(-1, now),
            Region::Hero => {}
            _ => {
                self.release_lock_for(region, now);
                self.region_mut(region).region.scroll_by(delta);
            }
        }
    }

    /// Stop suppressing scroll events from `region` before the user moves
    /// it. A click lock whose other list is still animating narrows to that
    /// list, so only its echo keeps being ignored.
    fn release_lock_for(&mut self, region: Region, now: Instant) {
        let (list, other_moving) = match region {
            Region::Hero => (ListId::Hero, self.agents.region.is_animating()),
            Region::Agents => (ListId::Agents, self.hero.region.is_animating()),
            Region::Chips => return,
        };
        let lock = self.sync.lock_mut();
        match lock.current(now) {
            Some(LockTag::Click) if other_moving => {
                lock.acquire(LockTag::Scrolling(list.other()), now);
                debug!(%region, "click lock narrowed for user input");
            }
            Some(tag) if tag.suppresses(list) => {
                lock.release(tag);
                debug!(%tag, %region, "lock released for user input");
            }
            _ => {}
        }
    }

    /// Index of the item under viewport coordinate `x`, unless the press
    /// that produced the click was a drag.
    fn hit(&self, region: Region, x: f32) -> Option<usize> {
        let target = self.region(region);
        if target.is_dragging() {
            debug!(%region, "click swallowed by drag");
            return None;
        }
        let content_x = target.region.content_x(x);
        self.pitch(region).item_at(content_x, self.item_count(region))
    }

    /// A click at viewport coordinate `x`. Ignored when the press that
    /// produced it was a drag. Returns a request when the click submits a
    /// prompt.
    pub fn click(&mut self, region: Region, x: f32, now: Instant) -> Option<PendingRequest> {
        let index = self.hit(region, x)?;

        match region {
            Region::Agents => {
                self.click_agent(index, now);
                None
            }
            Region::Hero => {
                if index == self.active_index() {
                    if let Some(agent) = self.active_agent() {
                        self.enter_agent(agent.id, now);
                    }
                }
                None
            }
            Region::Chips => self.click_chip(index),
        }
    }

    /// A click on the avatar of an agent strip item opens that agent's chat,
    /// whichever agent is active.
    pub fn click_avatar(&mut self, x: f32, now: Instant) -> bool {
        let Some(agent) = self
            .hit(Region::Agents, x)
            .and_then(|index| self.catalog.agent(index))
        else {
            return false;
        };
        self.enter_agent(agent.id, now)
    }

    /// Select an agent from the strip: both lists move to it under a click
    /// lock and the input is prefilled with the agent's opening question.
    pub fn click_agent(&mut self, index: usize, now: Instant) -> bool {
        if !self.jump_to(index, now) {
            return false;
        }
        if let Some(prompt) = self.catalog.agent(index).and_then(|agent| agent.default_prompt) {
            self.input = prompt.to_string();
        }
        true
    }

    /// Move both lists to `index` as one explicit selection.
    pub fn jump_to(&mut self, index: usize, now: Instant) -> bool {
        let outcome = self.sync.select_and_scroll(
            index,
            LockTag::Click,
            ListId::Agents,
            &mut self.agents,
            now,
        );
        if let SyncOutcome::OutOfRange(_) = outcome {
            return false;
        }
        self.sync.align(ListId::Hero, &mut self.hero, now);
        info!(index, "agent selected");
        true
    }

    /// Step the hero by whole cards as a user scroll. The synchronizer picks
    /// up the resulting scroll events like any other user movement, so a
    /// lock that would swallow them is dropped first.
    pub fn step_hero(&mut self, step: i64, now: Instant) {
        let last = self.item_count(Region::Hero).saturating_sub(1) as i64;
        let target = (self.active_index() as i64 + step).clamp(0, last) as usize;
        self.release_lock_for(Region::Hero, now);
        let offset = self.pitch(Region::Hero).offset_of(target);
        self.hero.scroll_to(offset, ScrollBehavior::Smooth);
    }

    /// The chip row: the last chip opens the service directory, the others
    /// ask about their label.
    pub fn click_chip(&mut self, index: usize) -> Option<PendingRequest> {
        let chips = self.catalog.chips(self.inside_scenic);
        let chip = chips.get(index)?;
        if index + 1 == chips.len() {
            self.services_open = true;
            return None;
        }
        self.submit(&format!("我想{}", chip.label))
    }

    /// One of the active hero card's two action buttons.
    pub fn hero_action(&mut self, slot: usize) -> Option<PendingRequest> {
        let action = self.active_hero()?.actions.get(slot)?;
        self.submit(action.prompt)
    }

    pub fn enter_agent(&mut self, id: &str, now: Instant) -> bool {
        let Some(index) = self.catalog.agent_index(id) else {
            return false;
        };
        self.sync.select(index, now);
        self.view = View::AgentChat;
        info!(agent = id, "entered agent chat");
        true
    }

    /// Return to the home view with both lists on the active agent.
    pub fn back_to_home(&mut self, now: Instant) {
        self.view = View::Home;
        self.chat.dismiss_overlay();
        self.sync.lock_mut().acquire(LockTag::Click, now);
        self.sync.align(ListId::Hero, &mut self.hero, now);
        self.sync.align(ListId::Agents, &mut self.agents, now);
        info!("back to home");
    }

    pub fn toggle_scenic(&mut self) {
        self.inside_scenic = !self.inside_scenic;
        let content = self.chip_pitch.extent(self.item_count(Region::Chips));
        let chips = &mut self.chips.region;
        chips.set_content(content);
        chips.scroll_to(0.0, ScrollBehavior::Instant);
        info!(inside = self.inside_scenic, "scenic mode toggled");
    }

    pub fn toggle_services(&mut self) {
        self.services_open = !self.services_open;
    }

    pub fn close_services(&mut self) {
        self.services_open = false;
    }

    pub fn dismiss_overlay(&mut self) {
        self.chat.dismiss_overlay();
    }

    /// Advance animations and feed the scroll events they produced to the
    /// synchronizer. Returns true while anything is still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let hero_settled = self.hero.region.tick(now);
        let agents_settled = self.agents.region.tick(now);
        self.chips.region.tick(now);

        if let Some(tag) = self.sync.lock_mut().expire(now) {
            debug!(%tag, "scroll lock expired");
        }

        if let Some(offset) = self.hero.region.take_scroll_event() {
            let index = self.pitch(Region::Hero).index_at(offset);
            let outcome = self
                .sync
                .on_index_change(ListId::Hero, index, &mut self.agents, now);
            debug!(offset, ?outcome, "hero scrolled");
        }
        if let Some(offset) = self.agents.region.take_scroll_event() {
            let outcome = self
                .sync
                .on_scroll(ListId::Agents, offset, &mut self.hero, now);
            debug!(offset, ?outcome, "agents scrolled");
        }
        self.chips.region.take_scroll_event();

        if self.release_on_settle {
            self.release_settled(ListId::Hero, hero_settled, now);
            self.release_settled(ListId::Agents, agents_settled, now);
        }

        self.hero.region.is_animating()
            || self.agents.region.is_animating()
            || self.chips.region.is_animating()
    }

    fn release_settled(&mut self, list: ListId, settled: bool, now: Instant) {
        if !settled {
            return;
        }
        let other_moving = match list {
            ListId::Hero => self.agents.region.is_animating(),
            ListId::Agents => self.hero.region.is_animating(),
        };
        let lock = self.sync.lock_mut();
        match lock.current(now) {
            Some(tag @ LockTag::Scrolling(driven)) if driven == list => {
                lock.release(tag);
                debug!(%tag, "released on settle");
            }
            Some(LockTag::Click) if !other_moving => {
                lock.release(LockTag::Click);
                debug!("click lock released on settle");
            }
            _ => {}
        }
    }

    /// Submit a prompt. The response overlay is shown for submissions from
    /// the home view. Refused while a request is in flight.
    pub fn submit(&mut self, text: &str) -> Option<PendingRequest> {
        let request = self.chat.begin(text, self.view == View::Home)?;
        self.input.clear();
        info!(view = %self.view, "prompt submitted");
        Some(request)
    }

    pub fn complete(&mut self, reply: impl Into<String>) {
        self.chat.finish(reply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn companion() -> Companion {
        let mut companion = Companion::new(Catalog::builtin(), &Settings::default());
        companion.set_viewport(Region::Hero, 390.0);
        companion.set_viewport(Region::Agents, 390.0);
        companion.set_viewport(Region::Chips, 390.0);
        companion
    }

    fn settle(companion: &mut Companion, start: Instant) -> Instant {
        let mut now = start;
        for _ in 0..100 {
            now += Duration::from_millis(16);
            companion.tick(now);
        }
        now
    }

    #[test]
    fn test_centring_padding_reaches_every_item() {
        let companion = companion();
        assert_eq!(companion.region(Region::Hero).region.max_offset(), 1600.0);
        assert_eq!(companion.region(Region::Agents).region.max_offset(), 480.0);
    }

    #[test]
    fn test_placeholders() {
        let mut companion = companion();
        assert_eq!(companion.placeholder(), DEFAULT_PLACEHOLDER);

        companion.enter_agent("photo", Instant::now());
        assert_eq!(companion.view(), View::AgentChat);
        assert_eq!(companion.placeholder(), "向雅雅提问...");

        companion.submit("你好");
        assert_eq!(companion.placeholder(), BUSY_PLACEHOLDER);
    }

    #[test]
    fn test_chip_prompt_and_directory() {
        let mut companion = companion();

        let request = companion.click_chip(0).expect("prompt");
        assert_eq!(request.prompt, "我想购门票");
        companion.complete("好的");

        assert!(companion.click_chip(3).is_none());
        assert!(companion.services_open());
        assert!(companion.click_chip(9).is_none());
    }

    #[test]
    fn test_hero_action_uses_active_card() {
        let mut companion = companion();
        let request = companion.hero_action(1).expect("prompt");
        assert_eq!(request.prompt, "帮我规划一条避开拥堵的游览路线。");
        assert!(companion.chat().overlay_visible());
        assert!(companion.hero_action(0).is_none(), "busy");
    }

    #[test]
    fn test_click_agent_prefills_and_moves_both_lists() {
        let mut companion = companion();
        let t0 = Instant::now();

        assert!(companion.click_agent(2, t0));
        assert_eq!(companion.active_index(), 2);
        assert_eq!(companion.input(), "今天有哪些表演可以看？");
        assert_eq!(companion.sync().lock().current(t0), Some(LockTag::Click));

        settle(&mut companion, t0);
        assert_eq!(companion.region(Region::Agents).region.offset(), 192.0);
        assert_eq!(companion.region(Region::Hero).region.offset(), 640.0);
        assert_eq!(companion.active_index(), 2);
    }

    #[test]
    fn test_step_hero_drives_agents() {
        let mut companion = companion();
        let t0 = Instant::now();

        companion.step_hero(1, t0);
        settle(&mut companion, t0);

        assert_eq!(companion.active_index(), 1);
        assert_eq!(companion.region(Region::Hero).region.offset(), 320.0);
        assert_eq!(companion.region(Region::Agents).region.offset(), 96.0);

        companion.step_hero(-5, t0 + Duration::from_secs(5));
        settle(&mut companion, t0 + Duration::from_secs(5));
        assert_eq!(companion.active_index(), 0);
    }

    #[test]
    fn test_drag_during_click_lock_drives_agents() {
        let mut companion = companion();
        let t0 = Instant::now();

        companion.click_agent(2, t0);
        let t1 = t0 + Duration::from_millis(100);
        companion.tick(t1);

        companion.pointer_down(Region::Hero, 1000.0, t1);
        assert_eq!(
            companion.sync().lock().current(t1),
            Some(LockTag::Scrolling(ListId::Agents))
        );
        companion.pointer_move(Region::Hero, -280.0);
        companion.pointer_up(Region::Hero);
        settle(&mut companion, t1);

        assert_eq!(companion.region(Region::Hero).region.offset(), 1280.0);
        assert_eq!(companion.active_index(), 4);
        assert_eq!(companion.region(Region::Agents).region.offset(), 384.0);
    }

    #[test]
    fn test_wheel_on_agents_during_click_lock_drives_hero() {
        let mut companion = companion();
        let t0 = Instant::now();

        companion.click_agent(2, t0);
        let t1 = settle(&mut companion, t0);

        companion.jump_to(3, t1);
        let t2 = t1 + Duration::from_millis(50);
        companion.wheel(Region::Agents, 192.0, t2);
        assert_eq!(
            companion.sync().lock().current(t2),
            Some(LockTag::Scrolling(ListId::Hero))
        );

        settle(&mut companion, t2);
        assert_eq!(companion.region(Region::Agents).region.offset(), 384.0);
        assert_eq!(companion.active_index(), 4);
        assert_eq!(companion.region(Region::Hero).region.offset(), 1280.0);
    }

    #[test]
    fn test_avatar_enters_any_agent_chat() {
        let mut companion = companion();
        let t0 = Instant::now();

        // Strip padding is 147px; agent 4 spans 531..627 in the viewport.
        assert!(companion.click_avatar(147.0 + 4.0 * 96.0 + 10.0, t0));
        assert_eq!(companion.view(), View::AgentChat);
        assert_eq!(companion.active_index(), 4);
        assert_eq!(companion.placeholder(), "向雅雅提问...");
    }

    #[test]
    fn test_avatar_click_after_drag_is_ignored() {
        let mut companion = companion();
        let t0 = Instant::now();

        companion.pointer_down(Region::Agents, 200.0, t0);
        companion.pointer_move(Region::Agents, 205.0);
        companion.pointer_up(Region::Agents);

        assert!(!companion.click_avatar(200.0, t0));
        assert_eq!(companion.view(), View::Home);
    }

    #[test]
    fn test_scenic_toggle_switches_chips() {
        let mut companion = companion();
        assert!(!companion.inside_scenic());
        companion.toggle_scenic();
        assert!(companion.inside_scenic());
        let request = companion.click_chip(0).expect("prompt");
        assert_eq!(request.prompt, "我想找厕所");
    }

    #[test]
    fn test_back_to_home_realigns() {
        let mut companion = companion();
        let t0 = Instant::now();

        companion.enter_agent("local", t0);
        assert_eq!(companion.active_index(), 5);
        companion.back_to_home(t0);
        assert_eq!(companion.view(), View::Home);

        settle(&mut companion, t0);
        assert_eq!(companion.active_index(), 5);
        assert_eq!(companion.region(Region::Hero).region.offset(), 1600.0);
        assert_eq!(companion.region(Region::Agents).region.offset(), 480.0);
    }

    #[test]
    fn test_release_on_settle_frees_lock_early() {
        let mut settings = Settings::default();
        settings.sync.release_on_settle = true;
        let mut companion = Companion::new(Catalog::builtin(), &settings);
        companion.set_viewport(Region::Hero, 390.0);
        companion.set_viewport(Region::Agents, 390.0);
        let t0 = Instant::now();

        companion.click_agent(4, t0);
        companion.tick(t0);
        companion.tick(t0 + Duration::from_millis(500));

        assert_eq!(companion.sync().lock().current(t0 + Duration::from_millis(500)), None);
        assert_eq!(companion.active_index(), 4);
    }
}

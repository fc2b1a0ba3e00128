use super::{
    agents::{render_agents, render_map_card, AVATAR_ROW, MAP_CARD_WIDTH},
    chat::{overlay_height, render_messages, render_overlay},
    column_to_px, contains,
    footer::{render_chips, render_help, render_input, render_nav},
    header::{render_agent_header, render_header},
    hero::{render_dots, render_hero, ACTION_ROW_FROM_BOTTOM},
    services_modal::render_services_modal,
    StripGeometry,
};
use crate::events::{AppEvent, EventHandler, Pointer};
use anyhow::Result;
use ratatui::{
    prelude::{Constraint, CrosstermBackend, Direction, Frame, Layout, Rect, Terminal},
    widgets::Block,
};
use std::io::Stdout;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use tunpu_core::{
    catalog::Catalog,
    chat::PendingRequest,
    generation::{generate_or_fallback, TextGenerator},
    theme::{Element, Theme},
    Companion, Region, Settings, View,
};

const REGIONS: [Region; 3] = [Region::Hero, Region::Agents, Region::Chips];

#[derive(Debug, Clone, Copy)]
struct HomeLayout {
    header: Rect,
    hero: Rect,
    dots: Rect,
    map_card: Rect,
    agents: Rect,
    chips: Rect,
    input: Rect,
    help: Rect,
    nav: Rect,
}

/// Areas drawn in the last frame that take clicks of their own.
#[derive(Debug, Clone, Copy, Default)]
struct Hotspots {
    overlay: Option<Rect>,
    services: Option<Rect>,
}

impl HomeLayout {
    fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(1),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(area);
        // The map card is pinned to the left of the agent strip.
        let strip = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(MAP_CARD_WIDTH), Constraint::Min(0)])
            .split(chunks[3]);
        Self {
            header: chunks[0],
            hero: chunks[1],
            dots: chunks[2],
            map_card: strip[0],
            agents: strip[1],
            chips: chunks[4],
            input: chunks[5],
            help: chunks[6],
            nav: chunks[7],
        }
    }

    fn region(&self, region: Region) -> Rect {
        match region {
            Region::Hero => self.hero,
            Region::Agents => self.agents,
            Region::Chips => self.chips,
        }
    }

    /// The answer overlay covers the lower part of the carousel and the
    /// agent strip.
    fn overlay(&self, height: u16) -> Rect {
        let top = self.hero.y;
        let bottom = self.agents.bottom();
        let height = height.min(bottom - top);
        Rect::new(
            self.hero.x + 1,
            bottom - height,
            self.hero.width.saturating_sub(2),
            height,
        )
    }
}

pub struct App {
    should_quit: bool,
    theme: Theme,
    settings: Settings,
    companion: Companion,
    events: EventHandler,
    generator: Arc<dyn TextGenerator>,
    replies_tx: UnboundedSender<String>,
    replies_rx: UnboundedReceiver<String>,
    layout: HomeLayout,
    hotspots: Hotspots,
    pressed: Option<Region>,
}

impl App {
    pub fn new(settings: Settings, generator: Arc<dyn TextGenerator>) -> Self {
        let theme = Theme::new(settings.theme);
        let companion = Companion::new(Catalog::builtin(), &settings);
        let (replies_tx, replies_rx) = unbounded_channel();
        Self {
            should_quit: false,
            theme,
            settings,
            companion,
            events: EventHandler::default(),
            generator,
            replies_tx,
            replies_rx,
            layout: HomeLayout::new(Rect::default()),
            hotspots: Hotspots::default(),
            pressed: None,
        }
    }

    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        while !self.should_quit {
            self.drain_replies();
            self.companion.tick(Instant::now());
            self.update_layout(terminal.size()?);
            self.draw(terminal)?;

            let event = self.events.next_event()?;
            self.handle_event(event, Instant::now());
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    fn px_per_cell(&self) -> f32 {
        self.settings.layout.px_per_cell
    }

    fn geometry(&self, region: Region) -> StripGeometry {
        StripGeometry {
            area: self.layout.region(region),
            pitch: self.companion.pitch(region),
            count: self.companion.item_count(region),
            px_per_cell: self.px_per_cell(),
        }
    }

    fn update_layout(&mut self, area: Rect) {
        self.layout = HomeLayout::new(area);
        for region in REGIONS {
            let width = self.geometry(region).viewport_px();
            self.companion.set_viewport(region, width);
        }
    }

    fn drain_replies(&mut self) {
        while let Ok(reply) = self.replies_rx.try_recv() {
            self.companion.complete(reply);
        }
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut hotspots = Hotspots::default();
        terminal.draw(|frame| {
            hotspots = self.render(frame);
        })?;
        self.hotspots = hotspots;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) -> Hotspots {
        let area = frame.size();
        frame.render_widget(Block::new().style(self.theme.style(Element::Text)), area);

        let overlay = match self.companion.view() {
            View::Home => self.render_home(frame),
            View::AgentChat => {
                self.render_agent_chat(frame, area);
                None
            }
        };

        let services = self.companion.services_open().then(|| {
            render_services_modal(frame, area, self.companion.catalog().services(), &self.theme)
        });
        Hotspots { overlay, services }
    }

    fn render_home(&self, frame: &mut Frame) -> Option<Rect> {
        let layout = &self.layout;
        let companion = &self.companion;
        let catalog = companion.catalog();
        let active = companion.active_index();

        render_header(frame, layout.header, &self.theme, companion.inside_scenic());
        render_hero(
            frame,
            &self.geometry(Region::Hero),
            &companion.region(Region::Hero).region,
            catalog.hero_cards(),
            active,
            &self.theme,
        );
        render_dots(frame, layout.dots, catalog.hero_cards().len(), active, &self.theme);
        render_map_card(frame, layout.map_card, &self.theme);
        render_agents(
            frame,
            &self.geometry(Region::Agents),
            &companion.region(Region::Agents).region,
            catalog.agents(),
            active,
            &self.theme,
        );
        render_chips(
            frame,
            &self.geometry(Region::Chips),
            &companion.region(Region::Chips).region,
            catalog.chips(companion.inside_scenic()),
            &self.theme,
        );
        render_input(
            frame,
            layout.input,
            &self.theme,
            companion.input(),
            &companion.placeholder(),
            companion.is_busy(),
        );
        render_help(frame, layout.help, &self.theme, false);
        render_nav(frame, layout.nav, &self.theme);

        if !companion.chat().overlay_visible() {
            return None;
        }
        let max = layout.agents.bottom() - layout.hero.y;
        let height = overlay_height(companion.chat(), layout.hero.width, max);
        let rect = layout.overlay(height);
        render_overlay(frame, rect, &self.theme, companion.chat());
        Some(rect)
    }

    fn render_agent_chat(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);
        let companion = &self.companion;

        if let Some(card) = companion.active_hero() {
            render_agent_header(frame, chunks[0], &self.theme, card.name, card.tagline);
        }
        render_messages(frame, chunks[1], &self.theme, companion.chat());
        render_input(
            frame,
            chunks[2],
            &self.theme,
            companion.input(),
            &companion.placeholder(),
            companion.is_busy(),
        );
        render_help(frame, chunks[3], &self.theme, true);
    }

    fn handle_event(&mut self, event: AppEvent, now: Instant) {
        let home = self.companion.view() == View::Home;
        match event {
            AppEvent::Quit => self.should_quit = true,
            AppEvent::ToggleTheme => {
                self.theme.toggle();
                self.settings.theme = self.theme.variant();
                if let Err(e) = Settings::save_theme(self.settings.theme) {
                    warn!(error = %e, "failed to save theme");
                }
            }
            AppEvent::ToggleScenic => self.companion.toggle_scenic(),
            AppEvent::ToggleServices => self.companion.toggle_services(),
            AppEvent::Submit => self.submit(now),
            AppEvent::Escape => self.escape(now),
            AppEvent::Backspace => self.companion.pop_input(),
            AppEvent::Input(c) => self.input_char(c, now),
            AppEvent::StepHero(step) if home => self.companion.step_hero(step, now),
            AppEvent::HeroAction(slot) => {
                let request = self.companion.hero_action(slot);
                self.dispatch(request);
            }
            AppEvent::Pointer { phase, column, row } if home => {
                self.pointer(phase, column, row, now)
            }
            AppEvent::Pointer {
                phase: Pointer::Up,
                column,
                row,
            } if self.companion.services_open() => self.services_click(column, row),
            AppEvent::Wheel {
                column,
                row,
                direction,
            } if home => self.wheel(column, row, direction, now),
            _ => {}
        }
    }

    fn input_char(&mut self, c: char, now: Instant) {
        let jump = self.companion.view() == View::Home
            && self.companion.input().is_empty()
            && !self.companion.services_open();
        if jump {
            if let Some(index) = c.to_digit(10).and_then(|d| (d as usize).checked_sub(1)) {
                if index < self.companion.item_count(Region::Agents) {
                    self.companion.jump_to(index, now);
                    return;
                }
            }
        }
        self.companion.push_input(c);
    }

    /// Enter sends the input; on an empty home input it opens the active
    /// agent's chat instead.
    fn submit(&mut self, now: Instant) {
        if self.companion.services_open() {
            return;
        }
        let text = self.companion.input().trim().to_string();
        if text.is_empty() {
            if self.companion.view() == View::Home {
                if let Some(agent) = self.companion.active_agent() {
                    self.companion.enter_agent(agent.id, now);
                }
            }
            return;
        }
        let request = self.companion.submit(&text);
        self.dispatch(request);
    }

    fn escape(&mut self, now: Instant) {
        if self.companion.services_open() {
            self.companion.close_services();
        } else if self.companion.chat().overlay_visible() {
            self.companion.dismiss_overlay();
        } else if self.companion.view() == View::AgentChat {
            self.companion.back_to_home(now);
        }
    }

    fn region_at(&self, column: u16, row: u16) -> Option<Region> {
        REGIONS
            .into_iter()
            .find(|region| contains(self.layout.region(*region), column, row))
    }

    fn in_overlay(&self, column: u16, row: u16) -> bool {
        self.hotspots
            .overlay
            .is_some_and(|rect| contains(rect, column, row))
    }

    /// Clicks outside the service directory close it.
    fn services_click(&mut self, column: u16, row: u16) {
        let inside = self
            .hotspots
            .services
            .is_some_and(|rect| contains(rect, column, row));
        if !inside {
            self.companion.close_services();
        }
    }

    fn pointer(&mut self, phase: Pointer, column: u16, row: u16, now: Instant) {
        if self.companion.services_open() {
            if phase == Pointer::Up {
                self.services_click(column, row);
            }
            return;
        }
        let ppc = self.px_per_cell();
        match phase {
            Pointer::Down => {
                if self.in_overlay(column, row) {
                    return;
                }
                if let Some(region) = self.region_at(column, row) {
                    let x = column_to_px(self.layout.region(region), column, ppc);
                    self.companion.pointer_down(region, x, now);
                    self.pressed = Some(region);
                }
            }
            Pointer::Move => {
                let Some(region) = self.pressed else {
                    return;
                };
                let area = self.layout.region(region);
                if contains(area, column, row) {
                    self.companion.pointer_move(region, column_to_px(area, column, ppc));
                } else {
                    self.companion.pointer_leave(region);
                    self.pressed = None;
                }
            }
            Pointer::Up => {
                if self.in_overlay(column, row) {
                    self.companion.dismiss_overlay();
                    self.pressed = None;
                    return;
                }
                let Some(region) = self.pressed.take() else {
                    return;
                };
                self.companion.pointer_up(region);
                let area = self.layout.region(region);
                if !contains(area, column, row) {
                    return;
                }
                let x = column_to_px(area, column, ppc);
                let action_row = area.bottom().saturating_sub(1 + ACTION_ROW_FROM_BOTTOM);
                let request = match region {
                    Region::Hero if row == action_row => self.hero_action_at(x),
                    Region::Agents if row == area.y + AVATAR_ROW => {
                        self.companion.click_avatar(x, now);
                        None
                    }
                    _ => self.companion.click(region, x, now),
                };
                self.dispatch(request);
            }
        }
    }

    /// Clicks on the active card's button row pick the left or right action.
    fn hero_action_at(&mut self, x: f32) -> Option<PendingRequest> {
        let hero = self.companion.region(Region::Hero);
        if hero.is_dragging() {
            return None;
        }
        let pitch = self.companion.pitch(Region::Hero);
        let active = self.companion.active_index();
        let content_x = hero.region.content_x(x);
        if pitch.item_at(content_x, self.companion.item_count(Region::Hero)) != Some(active) {
            return None;
        }
        let slot = usize::from(content_x - pitch.offset_of(active) >= pitch.item() / 2.0);
        self.companion.hero_action(slot)
    }

    fn wheel(&mut self, column: u16, row: u16, direction: i8, now: Instant) {
        if self.in_overlay(column, row) {
            return;
        }
        if let Some(region) = self.region_at(column, row) {
            let delta = f32::from(direction) * self.companion.pitch(region).value();
            self.companion.wheel(region, delta, now);
        }
    }

    fn dispatch(&self, request: Option<PendingRequest>) {
        let Some(request) = request else {
            return;
        };
        let generator = Arc::clone(&self.generator);
        let replies = self.replies_tx.clone();
        let fallback = self.settings.generation.fallback_message.clone();
        debug!(prompt = %request.prompt, "dispatching generation");

        tokio::spawn(async move {
            let reply = generate_or_fallback(
                generator.as_ref(),
                &request.prompt,
                &request.history,
                &fallback,
            )
            .await;
            if replies.send(reply).is_err() {
                debug!("reply dropped, app is shutting down");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_layout_pins_map_card_left_of_strip() {
        let layout = HomeLayout::new(Rect::new(0, 0, 60, 30));
        assert_eq!(layout.map_card, Rect::new(0, layout.agents.y, MAP_CARD_WIDTH, 4));
        assert_eq!(layout.agents.x, MAP_CARD_WIDTH);
        assert_eq!(layout.agents.width, 60 - MAP_CARD_WIDTH);
        assert_eq!(layout.nav.bottom(), 30);
        assert_eq!(layout.help.bottom(), layout.nav.y);
    }

    #[test]
    fn test_overlay_spans_hero_and_strip() {
        let layout = HomeLayout::new(Rect::new(0, 0, 60, 30));
        let overlay = layout.overlay(6);
        assert_eq!(overlay.bottom(), layout.agents.bottom());
        assert_eq!(overlay.height, 6);
        assert_eq!(overlay.x, 1);
    }
}

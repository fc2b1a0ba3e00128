use super::{truncate, StripGeometry};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tunpu_core::catalog::Agent;
use tunpu_core::region::ScrollArea;
use tunpu_core::theme::{Element, Theme};

/// Row of a strip item, counted from its top border, that holds the
/// avatar. Clicking it opens the agent's chat.
pub const AVATAR_ROW: u16 = 1;

/// Columns taken by the pinned guide-map card left of the strip.
pub const MAP_CARD_WIDTH: u16 = 12;

pub fn render_agents(
    frame: &mut Frame,
    geometry: &StripGeometry,
    scroll: &ScrollArea,
    agents: &[Agent],
    active: usize,
    theme: &Theme,
) {
    for (index, rect) in geometry.visible(scroll) {
        let Some(agent) = agents.get(index) else {
            continue;
        };
        let selected = index == active;
        let style = if selected {
            theme.style(Element::Selected)
        } else {
            theme.style(Element::Text)
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(theme.border_style(selected))
            .style(style);
        let width = block.inner(rect).width as usize;
        let lines = vec![
            Line::from(vec![
                Span::styled("◉ ", theme.style(Element::Accent)),
                Span::raw(truncate(agent.name, width.saturating_sub(2))),
            ]),
            Line::styled(truncate(agent.description, width), theme.style(Element::Muted)),
        ];
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            rect,
        );
    }
}

/// The "smart tour" map card. It stays put while the strip scrolls.
pub fn render_map_card(frame: &mut Frame, area: Rect, theme: &Theme) {
    if area.width == 0 {
        return;
    }
    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(theme.style(Element::Accent))
        .style(theme.style(Element::Text));
    let width = block.inner(area).width as usize;
    let lines = vec![
        Line::styled(truncate("智能导览", width), theme.style(Element::Title)),
        Line::styled(truncate("全景游 →", width), theme.style(Element::Muted)),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

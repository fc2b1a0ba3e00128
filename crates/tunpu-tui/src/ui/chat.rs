use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Clear, Paragraph},
};
use tunpu_core::chat::{ChatMessage, ChatSession};
use tunpu_core::companion::BUSY_PLACEHOLDER;
use tunpu_core::generation::Role;
use tunpu_core::theme::{Element, Theme};
use unicode_width::UnicodeWidthStr;

/// Message history, newest at the bottom.
pub fn render_messages(frame: &mut Frame, area: Rect, theme: &Theme, session: &ChatSession) {
    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(theme.style(Element::Border))
        .style(theme.style(Element::Text));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = (inner.width as usize).saturating_sub(2).max(8);
    let mut lines: Vec<Line> = Vec::new();
    for message in session.messages() {
        lines.extend(message_lines(message, width, theme));
        lines.push(Line::default());
    }
    if session.is_busy() {
        lines.push(Line::styled(BUSY_PLACEHOLDER, theme.style(Element::Placeholder)));
    }

    let skip = lines.len().saturating_sub(inner.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn message_lines(message: &ChatMessage, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let (style, alignment) = match message.role {
        Role::User => (theme.style(Element::UserBubble), Alignment::Right),
        Role::Model => (theme.style(Element::ModelBubble), Alignment::Left),
    };
    let stamp = message.timestamp.format("%H:%M").to_string();
    let mut lines: Vec<Line<'static>> = textwrap::wrap(&message.text, width)
        .into_iter()
        .map(|row| Line::from(Span::styled(format!(" {} ", row), style)).alignment(alignment))
        .collect();
    lines.push(Line::styled(stamp, theme.style(Element::Muted)).alignment(alignment));
    lines
}

/// The floating answer card on the home view.
pub fn render_overlay(frame: &mut Frame, area: Rect, theme: &Theme, session: &ChatSession) {
    let block = Block::new()
        .borders(Borders::ALL)
        .title(Title::from(" 云小途 · Esc 关闭 ").alignment(Alignment::Left))
        .border_style(theme.style(Element::Accent))
        .style(theme.style(Element::ModelBubble));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let width = (inner.width as usize).max(8);
    let lines: Vec<Line> = match session.last_response() {
        Some(text) if !session.is_busy() => textwrap::wrap(text, width)
            .into_iter()
            .map(|row| Line::from(row.into_owned()))
            .collect(),
        _ => vec![Line::styled(BUSY_PLACEHOLDER, theme.style(Element::Placeholder))],
    };
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Height the overlay needs for the current response, capped at `max`.
pub fn overlay_height(session: &ChatSession, width: u16, max: u16) -> u16 {
    let inner_width = (width.saturating_sub(2) as usize).max(8);
    let rows = session
        .last_response()
        .map(|text| {
            textwrap::wrap(text, inner_width)
                .iter()
                .map(|row| row.width().div_ceil(inner_width).max(1))
                .sum::<usize>()
        })
        .unwrap_or(1);
    (rows as u16 + 2).clamp(3, max.max(3))
}

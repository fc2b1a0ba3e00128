use super::{truncate, StripGeometry};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use tunpu_core::catalog::HeroCard;
use tunpu_core::region::ScrollArea;
use tunpu_core::theme::{Element, Theme};

/// Rows from the bottom of a card that hold its two action buttons.
pub const ACTION_ROW_FROM_BOTTOM: u16 = 2;

pub fn render_hero(
    frame: &mut Frame,
    geometry: &StripGeometry,
    scroll: &ScrollArea,
    cards: &[HeroCard],
    active: usize,
    theme: &Theme,
) {
    for (index, rect) in geometry.visible(scroll) {
        if let Some(card) = cards.get(index) {
            render_card(frame, rect, card, index == active, theme);
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &HeroCard, active: bool, theme: &Theme) {
    let style = theme.card_style(card.style);
    let border = if active {
        BorderType::Thick
    } else {
        BorderType::Rounded
    };
    let block = Block::new()
        .borders(Borders::ALL)
        .border_type(border)
        .style(style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let width = inner.width as usize;
    let bold = style.add_modifier(Modifier::BOLD);
    let info_color = theme.info_color(card.info.color);
    let mut lines = vec![
        Line::from(Span::styled(truncate(card.name, width), bold)),
        Line::from(truncate(card.tagline, width)),
        Line::default(),
    ];
    for tag in &card.tags {
        let bar = "▮".repeat((tag.score as usize / 20).max(1));
        let row = format!("{} {} {}", tag.label, bar, tag.score);
        lines.push(Line::from(truncate(&row, width)));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::raw(format!("{} ", card.info.emoji)),
        Span::styled(
            card.info.title,
            Style::default().fg(info_color).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {}", card.info.subtitle)),
    ]));

    let body_height = inner.height.saturating_sub(ACTION_ROW_FROM_BOTTOM);
    let body = Rect::new(inner.x, inner.y, inner.width, body_height);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);

    if active && inner.height > ACTION_ROW_FROM_BOTTOM {
        let actions = Line::from(vec![
            Span::styled(format!("[{}]", card.actions[0].label), bold),
            Span::raw("  "),
            Span::styled(format!("[{}]", card.actions[1].label), bold),
        ]);
        let row = Rect::new(inner.x, inner.bottom() - ACTION_ROW_FROM_BOTTOM, inner.width, 1);
        frame.render_widget(Paragraph::new(actions).alignment(Alignment::Center), row);
    }
}

/// Pagination dots under the carousel.
pub fn render_dots(frame: &mut Frame, area: Rect, count: usize, active: usize, theme: &Theme) {
    let spans: Vec<Span> = (0..count)
        .map(|index| {
            if index == active {
                Span::styled("━━ ", theme.style(Element::Accent))
            } else {
                Span::styled("• ", theme.style(Element::Muted))
            }
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

use super::centered;
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Clear, Paragraph, Wrap},
};
use tunpu_core::catalog::ServiceCategory;
use tunpu_core::theme::{Element, Theme};

pub fn render_services_modal(
    frame: &mut Frame,
    area: Rect,
    categories: &[ServiceCategory],
    theme: &Theme,
) -> Rect {
    let height = categories
        .iter()
        .map(|category| category.items.len() as u16 + 2)
        .sum::<u16>()
        + 2;
    let modal = centered(area, 44, height);

    let block = Block::new()
        .borders(Borders::ALL)
        .title(Title::from(" 全部服务 ").alignment(Alignment::Center))
        .title(
            Title::from(" Esc 关闭 ")
                .alignment(Alignment::Right)
                .position(ratatui::widgets::block::Position::Bottom),
        )
        .border_style(theme.style(Element::Accent))
        .style(theme.style(Element::Text));

    let mut lines = Vec::new();
    for category in categories {
        lines.push(Line::styled(category.title, theme.style(Element::Title)));
        for item in category.items {
            lines.push(Line::from(vec![
                Span::styled("  · ", theme.style(Element::Muted)),
                Span::raw(item.name),
            ]));
        }
        lines.push(Line::default());
    }

    frame.render_widget(Clear, modal);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(block),
        modal,
    );
    modal
}

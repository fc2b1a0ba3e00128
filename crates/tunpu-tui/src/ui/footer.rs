use super::{truncate, StripGeometry};
use ratatui::{
    prelude::{Alignment, Frame, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tunpu_core::catalog::Chip;
use tunpu_core::region::ScrollArea;
use tunpu_core::theme::{Element, Theme};
use unicode_width::UnicodeWidthStr;

pub fn render_chips(
    frame: &mut Frame,
    geometry: &StripGeometry,
    scroll: &ScrollArea,
    chips: &[Chip],
    theme: &Theme,
) {
    for (index, rect) in geometry.visible(scroll) {
        let Some(chip) = chips.get(index) else {
            continue;
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(theme.style(Element::Border))
            .style(theme.style(Element::Text));
        let width = block.inner(rect).width as usize;
        frame.render_widget(
            Paragraph::new(truncate(chip.label, width))
                .alignment(Alignment::Center)
                .block(block),
            rect,
        );
    }
}

/// The chat input bar. Places the terminal cursor after the text.
pub fn render_input(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    input: &str,
    placeholder: &str,
    busy: bool,
) {
    let block = Block::new()
        .borders(Borders::ALL)
        .border_style(theme.border_style(!busy))
        .style(theme.style(Element::Text));
    let inner = block.inner(area);

    let line = if input.is_empty() || busy {
        Line::from(vec![
            Span::styled("💬 ", theme.style(Element::Accent)),
            Span::styled(placeholder.to_string(), theme.style(Element::Placeholder)),
        ])
    } else {
        Line::from(vec![
            Span::styled("💬 ", theme.style(Element::Accent)),
            Span::styled(input.to_string(), theme.style(Element::Text)),
        ])
    };
    frame.render_widget(Paragraph::new(line).block(block), area);

    if !busy && inner.width > 0 {
        let offset = (3 + input.width()) as u16;
        frame.set_cursor(inner.x + offset.min(inner.width - 1), inner.y);
    }
}

pub fn render_help(frame: &mut Frame, area: Rect, theme: &Theme, chat_view: bool) {
    let keys: &[(&str, &str)] = if chat_view {
        &[("Enter", "发送"), ("Esc", "返回"), ("^T", "主题"), ("^C", "退出")]
    } else {
        &[
            ("←/→", "切换"),
            ("1-6", "跳转"),
            ("F1/F2", "快捷"),
            ("^S", "服务"),
            ("^E", "景区"),
            ("^T", "主题"),
            ("^C", "退出"),
        ]
    };
    let mut spans = Vec::new();
    for (i, (key, label)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" | "));
        }
        spans.push(Span::styled(*key, theme.style(Element::Accent)));
        spans.push(Span::styled(format!(" {}", label), theme.style(Element::Muted)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .style(theme.style(Element::Text)),
        area,
    );
}

/// Bottom navigation. Only the home tab exists in this app.
pub fn render_nav(frame: &mut Frame, area: Rect, theme: &Theme) {
    let tabs = [("首页", true), ("订购", false), ("我的", false)];
    let mut spans = Vec::new();
    for (i, (label, current)) in tabs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("      "));
        }
        let element = if current { Element::Selected } else { Element::Muted };
        spans.push(Span::styled(label, theme.style(element)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .style(theme.style(Element::Text)),
        area,
    );
}

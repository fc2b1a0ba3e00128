use ratatui::{
    prelude::{Alignment, Constraint, Direction, Frame, Layout, Rect},
    text::{Line, Span},
    widgets::{block::Title, Block, Borders, Paragraph},
};
use tunpu_core::catalog::{SCENIC_NAME, WEATHER};
use tunpu_core::theme::{Element, Theme};

pub fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, inside_scenic: bool) {
    let title = Title::from(format!(" {} ", SCENIC_NAME)).alignment(Alignment::Left);
    let block = Block::new()
        .borders(Borders::ALL)
        .title(title)
        .border_style(theme.style(Element::Border))
        .style(theme.style(Element::Text));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)])
        .split(inner);

    let weather = Line::from(vec![
        Span::styled(WEATHER.temp, theme.style(Element::Title)),
        Span::styled(
            format!("  {} {} {}", WEATHER.day, WEATHER.date, WEATHER.condition),
            theme.style(Element::Muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(weather), chunks[0]);

    let badge = if inside_scenic {
        Span::styled("● 景区内", theme.style(Element::Accent))
    } else {
        Span::styled("○ 景区外", theme.style(Element::Warning))
    };
    frame.render_widget(
        Paragraph::new(Line::from(badge)).alignment(Alignment::Right),
        chunks[1],
    );
}

/// Top bar of the agent chat view.
pub fn render_agent_header(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    name: &str,
    tagline: &str,
) {
    let block = Block::new()
        .borders(Borders::ALL)
        .title(Title::from(" ← Esc ").alignment(Alignment::Left))
        .border_style(theme.style(Element::Border))
        .style(theme.style(Element::Text));

    let line = Line::from(vec![
        Span::styled(name.to_string(), theme.style(Element::Title)),
        Span::styled(format!("  {}", tagline), theme.style(Element::Muted)),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

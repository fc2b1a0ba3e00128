//! Colour themes for the companion
//!
//! Two variants: a dark "dusk" palette and a light "daylight" palette. Both
//! carry the teal brand accent plus the card and badge colours the catalog
//! refers to, so widgets ask the theme instead of hard-coding RGB values.

use crate::catalog::{CardStyle, InfoColor};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeVariant {
    #[default]
    Dusk,
    Daylight,
}

#[derive(Debug, Clone)]
pub struct ColorPalette {
    pub background: Color,
    pub surface: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub selection: Color,
    pub warning: Color,
    pub error: Color,
    pub card_efficient: Color,
    pub card_friendly: Color,
    pub card_enthusiastic: Color,
    pub green: Color,
    pub yellow: Color,
    pub red: Color,
    pub purple: Color,
    pub blue: Color,
}

/// What a span of the screen is, for styling purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Text,
    Title,
    Border,
    /// The active hero card or agent.
    Selected,
    Accent,
    Muted,
    UserBubble,
    ModelBubble,
    /// Input placeholder and the "thinking" indicator.
    Placeholder,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Theme {
    variant: ThemeVariant,
    colors: ColorPalette,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeVariant::default())
    }
}

impl Theme {
    pub fn new(variant: ThemeVariant) -> Self {
        let colors = match variant {
            ThemeVariant::Dusk => ColorPalette {
                background: Color::Rgb(17, 24, 39),     // gray-900
                surface: Color::Rgb(31, 41, 55),        // gray-800
                foreground: Color::Rgb(243, 244, 246),  // gray-100
                muted: Color::Rgb(156, 163, 175),       // gray-400
                accent: Color::Rgb(45, 212, 191),       // teal-400
                border: Color::Rgb(75, 85, 99),         // gray-600
                selection: Color::Rgb(19, 78, 74),      // teal-900
                warning: Color::Rgb(251, 191, 36),      // amber-400
                error: Color::Rgb(248, 113, 113),       // red-400
                card_efficient: Color::Rgb(13, 148, 136),
                card_friendly: Color::Rgb(234, 88, 12),
                card_enthusiastic: Color::Rgb(79, 70, 229),
                green: Color::Rgb(74, 222, 128),
                yellow: Color::Rgb(250, 204, 21),
                red: Color::Rgb(248, 113, 113),
                purple: Color::Rgb(192, 132, 252),
                blue: Color::Rgb(96, 165, 250),
            },
            ThemeVariant::Daylight => ColorPalette {
                background: Color::Rgb(249, 250, 251), // gray-50
                surface: Color::Rgb(255, 255, 255),
                foreground: Color::Rgb(17, 24, 39),    // gray-900
                muted: Color::Rgb(107, 114, 128),      // gray-500
                accent: Color::Rgb(13, 148, 136),      // teal-600
                border: Color::Rgb(209, 213, 219),     // gray-300
                selection: Color::Rgb(204, 251, 241),  // teal-100
                warning: Color::Rgb(217, 119, 6),      // amber-600
                error: Color::Rgb(220, 38, 38),        // red-600
                card_efficient: Color::Rgb(20, 184, 166),
                card_friendly: Color::Rgb(249, 115, 22),
                card_enthusiastic: Color::Rgb(99, 102, 241),
                green: Color::Rgb(22, 163, 74),
                yellow: Color::Rgb(202, 138, 4),
                red: Color::Rgb(220, 38, 38),
                purple: Color::Rgb(147, 51, 234),
                blue: Color::Rgb(37, 99, 235),
            },
        };

        Self { variant, colors }
    }

    pub fn variant(&self) -> ThemeVariant {
        self.variant
    }

    pub fn colors(&self) -> &ColorPalette {
        &self.colors
    }

    pub fn toggle(&mut self) {
        let next = match self.variant {
            ThemeVariant::Dusk => ThemeVariant::Daylight,
            ThemeVariant::Daylight => ThemeVariant::Dusk,
        };
        *self = Self::new(next);
    }

    pub fn set_variant(&mut self, variant: ThemeVariant) {
        if self.variant != variant {
            *self = Self::new(variant);
        }
    }

    pub fn style(&self, element: Element) -> Style {
        let c = &self.colors;
        let base = Style::default().bg(c.background);
        match element {
            Element::Text => base.fg(c.foreground),
            Element::Title => base.fg(c.accent).add_modifier(Modifier::BOLD),
            Element::Border => base.fg(c.border),
            Element::Selected => Style::default()
                .fg(c.accent)
                .bg(c.selection)
                .add_modifier(Modifier::BOLD),
            Element::Accent => base.fg(c.accent),
            Element::Muted => base.fg(c.muted),
            Element::UserBubble => Style::default().fg(Color::White).bg(c.card_efficient),
            Element::ModelBubble => Style::default().fg(c.foreground).bg(c.surface),
            Element::Placeholder => base.fg(c.muted).add_modifier(Modifier::ITALIC),
            Element::Warning => base.fg(c.warning),
            Element::Error => base.fg(c.error).add_modifier(Modifier::BOLD),
        }
    }

    /// Background of a hero card.
    pub fn card_color(&self, style: CardStyle) -> Color {
        match style {
            CardStyle::Efficient => self.colors.card_efficient,
            CardStyle::Friendly => self.colors.card_friendly,
            CardStyle::Enthusiastic => self.colors.card_enthusiastic,
        }
    }

    pub fn card_style(&self, style: CardStyle) -> Style {
        Style::default().fg(Color::White).bg(self.card_color(style))
    }

    pub fn info_color(&self, color: InfoColor) -> Color {
        match color {
            InfoColor::Green => self.colors.green,
            InfoColor::Yellow => self.colors.yellow,
            InfoColor::Red => self.colors.red,
            InfoColor::Purple => self.colors.purple,
            InfoColor::Blue => self.colors.blue,
        }
    }

    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            self.style(Element::Accent)
        } else {
            self.style(Element::Border)
        }
    }
}

pub mod agents;
pub mod app;
pub mod chat;
pub mod footer;
pub mod header;
pub mod hero;
pub mod services_modal;

use ratatui::prelude::Rect;
use tunpu_core::region::{Pitch, ScrollArea};
use unicode_width::UnicodeWidthStr;

/// Maps a horizontally scrolled strip of fixed-pitch items onto terminal
/// cells. Pixels become cells at `px_per_cell`.
#[derive(Debug, Clone, Copy)]
pub struct StripGeometry {
    pub area: Rect,
    pub pitch: Pitch,
    pub count: usize,
    pub px_per_cell: f32,
}

impl StripGeometry {
    /// On-screen rectangles of the items at least partly inside `area`.
    pub fn visible(&self, scroll: &ScrollArea) -> Vec<(usize, Rect)> {
        let left_edge = self.area.x as f32;
        let right_edge = self.area.right();
        (0..self.count)
            .filter_map(|index| {
                let start_px = scroll.leading() + self.pitch.offset_of(index) - scroll.offset();
                let end_px = start_px + self.pitch.item();
                let x0 = (left_edge + start_px / self.px_per_cell).round().max(left_edge) as u16;
                let x1 = ((left_edge + end_px / self.px_per_cell).round() as i64)
                    .clamp(0, right_edge as i64) as u16;
                (x1 > x0).then(|| (index, Rect::new(x0, self.area.y, x1 - x0, self.area.height)))
            })
            .collect()
    }

    /// Viewport width in pixels.
    pub fn viewport_px(&self) -> f32 {
        self.area.width as f32 * self.px_per_cell
    }
}

/// Horizontal pixel position of `column` relative to `area`. May be negative
/// while a drag wanders off the left edge.
pub fn column_to_px(area: Rect, column: u16, px_per_cell: f32) -> f32 {
    (column as f32 - area.x as f32) * px_per_cell
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.right() && row >= area.y && row < area.bottom()
}

/// Cut `text` to `width` terminal columns, ending with `…` when shortened.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// A centred rectangle of at most `width` x `height` inside `area`.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_visible_items_follow_scroll_offset() {
        let pitch = Pitch::new(96.0, 0.0);
        let geometry = StripGeometry {
            area: Rect::new(2, 5, 40, 4),
            pitch,
            count: 6,
            px_per_cell: 8.0,
        };
        let mut scroll = ScrollArea::new(pitch.extent(6), Duration::ZERO);
        scroll.set_viewport(geometry.viewport_px());

        let at_start = geometry.visible(&scroll);
        assert_eq!(at_start[0], (0, Rect::new(2, 5, 12, 4)));
        assert_eq!(at_start.len(), 4);

        scroll.scroll_by(96.0);
        assert_eq!(geometry.visible(&scroll)[0], (1, Rect::new(2, 5, 12, 4)));
    }

    #[test]
    fn test_truncate_counts_wide_characters() {
        assert_eq!(truncate("云峰屯堡", 8), "云峰屯堡");
        assert_eq!(truncate("云峰屯堡", 6), "云峰…");
        assert_eq!(truncate("abc", 2), "a…");
    }

    #[test]
    fn test_column_to_px() {
        let area = Rect::new(10, 0, 20, 1);
        assert_eq!(column_to_px(area, 15, 8.0), 40.0);
        assert_eq!(column_to_px(area, 8, 8.0), -16.0);
    }
}

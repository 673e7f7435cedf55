use std::io;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::terminal_runtime::TerminalSession;
use crate::tile::Tile;
use crate::ui::hud::render_hud;

/// Destination for one settled frame.
pub trait RenderSink {
    /// Draws `tiles` in order, later tiles over earlier ones, and shows
    /// `caption` as the status line.
    fn render(&mut self, tiles: &[Tile], tile_size: u16, caption: &str) -> io::Result<()>;
}

/// Terminal footprint of one tile: `tile_size` columns wide and half as
/// many rows tall, since terminal cells are roughly twice as tall as wide.
#[must_use]
pub fn tile_footprint(tile_size: u16) -> (u16, u16) {
    let width = tile_size.max(1);
    let height = (width / 2).max(1);
    (width, height)
}

/// Paints tiles as solid background blocks inside `area`, clipping any
/// tile that falls outside it.
pub fn render_tiles(buffer: &mut Buffer, area: Rect, tiles: &[Tile], tile_size: u16) {
    let (width, height) = tile_footprint(tile_size);

    for tile in tiles {
        let Some(rect) = tile_rect(area, tile, width, height) else {
            continue;
        };
        buffer.set_style(rect, Style::new().bg(tile.color));
    }
}

fn tile_rect(area: Rect, tile: &Tile, width: u16, height: u16) -> Option<Rect> {
    let col = u16::try_from(tile.coord.col).ok()?;
    let row = u16::try_from(tile.coord.row).ok()?;

    let x = area.x.checked_add(col.checked_mul(width)?)?;
    let y = area.y.checked_add(row.checked_mul(height)?)?;
    if x >= area.right() || y >= area.bottom() {
        return None;
    }

    Some(Rect {
        x,
        y,
        width: width.min(area.right() - x),
        height: height.min(area.bottom() - y),
    })
}

/// Renders into the live terminal and mirrors the caption as window title.
pub struct TerminalSink {
    session: TerminalSession,
}

impl TerminalSink {
    #[must_use]
    pub fn new(session: TerminalSession) -> Self {
        Self { session }
    }
}

impl RenderSink for TerminalSink {
    fn render(&mut self, tiles: &[Tile], tile_size: u16, caption: &str) -> io::Result<()> {
        self.session.terminal_mut().draw(|frame| {
            let area = frame.area();
            let play_area = render_hud(frame, area, caption);
            render_tiles(frame.buffer_mut(), play_area, tiles, tile_size);
        })?;

        self.session.set_title(caption)
    }
}

#[cfg(test)]
mod tests {
    use ratatui::buffer::Buffer;
    use ratatui::layout::{Position, Rect};

    use super::{render_tiles, tile_footprint};
    use crate::tile::{Color, Coordinate, Tile};

    #[test]
    fn footprint_keeps_at_least_one_cell() {
        assert_eq!(tile_footprint(0), (1, 1));
        assert_eq!(tile_footprint(1), (1, 1));
        assert_eq!(tile_footprint(4), (4, 2));
    }

    #[test]
    fn later_tiles_paint_over_earlier_ones() {
        let area = Rect::new(0, 0, 8, 4);
        let mut buffer = Buffer::empty(area);
        let tiles = [
            Tile::new(Coordinate::new(1, 1), Color::White),
            Tile::new(Coordinate::new(1, 1), Color::Green),
            Tile::new(Coordinate::new(0, 0), Color::Red),
        ];

        render_tiles(&mut buffer, area, &tiles, 2);

        assert_eq!(buffer[Position::new(2, 1)].bg, Color::Green);
        assert_eq!(buffer[Position::new(3, 1)].bg, Color::Green);
        assert_eq!(buffer[Position::new(0, 0)].bg, Color::Red);
        assert_eq!(buffer[Position::new(4, 1)].bg, Color::Reset);
    }

    #[test]
    fn tiles_outside_area_are_clipped() {
        let area = Rect::new(0, 1, 4, 2);
        let mut buffer = Buffer::empty(Rect::new(0, 0, 4, 3));
        let tiles = [
            Tile::new(Coordinate::new(5, 0), Color::Red),
            Tile::new(Coordinate::new(0, -1), Color::Red),
            Tile::new(Coordinate::new(1, 1), Color::Blue),
        ];

        render_tiles(&mut buffer, area, &tiles, 2);

        assert_eq!(buffer[Position::new(2, 2)].bg, Color::Blue);
        assert!(buffer.content().iter().all(|cell| cell.bg != Color::Red));
    }
}

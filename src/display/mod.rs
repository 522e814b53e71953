//! Rendering layer. All terminal I/O lives here.
//!
//! [`TerminalRenderer`] implements the simulation's [`Renderer`] by painting
//! into a character grid that covers the whole viewport, then flushing the
//! grid to the terminal once per frame. Textures become glyphs, text is
//! printed as-is, and overlays dim whatever is already in the grid.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use crossterm::{
    cursor,
    style::{self, Print},
    terminal, QueueableCommand,
};

use crate::entities::{Color, Rect, Vec2};
use crate::platform::{FontHandle, Renderer, SpriteDraw, Viewport};

/// Anything fainter than this is not drawn at all.
const MIN_VISIBLE_ALPHA: u8 = 40;
/// Overlays at least this opaque blank the cells beneath.
const OPAQUE_ALPHA: u8 = 230;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        color: Color::BLACK,
    };
}

/// Maps viewport units onto a `cols` x `rows` character grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMapping {
    pub viewport: Viewport,
    pub cols: u16,
    pub rows: u16,
}

impl CellMapping {
    pub fn new(viewport: Viewport, cols: u16, rows: u16) -> Self {
        Self {
            viewport,
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    /// Viewport units covered by one cell, `(x, y)`.
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.viewport.width / self.cols as f32,
            self.viewport.height / self.rows as f32,
        )
    }

    /// The cell under a viewport point, or `None` if it falls outside.
    pub fn to_cell(&self, point: Vec2) -> Option<(u16, u16)> {
        let size = self.cell_size();
        let col = (point.x / size.x).floor();
        let row = (point.y / size.y).floor();
        let inside = col >= 0.0 && row >= 0.0 && col < self.cols as f32 && row < self.rows as f32;
        inside.then_some((col as u16, row as u16))
    }

    /// Centre of a cell in viewport units.
    pub fn to_viewport(&self, col: u16, row: u16) -> Vec2 {
        let size = self.cell_size();
        Vec2::new((col as f32 + 0.5) * size.x, (row as f32 + 0.5) * size.y)
    }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    mapping: CellMapping,
    glyphs: HashMap<u32, (char, Color)>,
    cells: Vec<Cell>,
    translation: Vec2,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, mapping: CellMapping, glyphs: HashMap<u32, (char, Color)>) -> Self {
        let cells = vec![Cell::BLANK; mapping.cols as usize * mapping.rows as usize];
        Self {
            out,
            mapping,
            glyphs,
            cells,
            translation: Vec2::ZERO,
        }
    }

    pub fn mapping(&self) -> CellMapping {
        self.mapping
    }

    /// Follow a terminal resize. Takes effect from the next frame.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let mapping = CellMapping::new(self.mapping.viewport, cols, rows);
        if mapping != self.mapping {
            self.mapping = mapping;
            self.cells = vec![Cell::BLANK; mapping.cols as usize * mapping.rows as usize];
        }
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.mapping.cols || row >= self.mapping.rows {
            return None;
        }
        self.cells.get(row as usize * self.mapping.cols as usize + col as usize)
    }

    /// One grid row as plain text.
    pub fn row_text(&self, row: u16) -> String {
        (0..self.mapping.cols)
            .filter_map(|col| self.cell(col, row).map(|c| c.ch))
            .collect()
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    fn put(&mut self, col: u16, row: u16, ch: char, color: Color) {
        if col >= self.mapping.cols || row >= self.mapping.rows {
            return;
        }
        let index = row as usize * self.mapping.cols as usize + col as usize;
        self.cells[index] = Cell { ch, color };
    }

    /// Cells covered by a viewport rectangle, clipped to the grid.
    fn cell_span(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let size = self.mapping.cell_size();
        let left = (rect.x as f32 / size.x).floor().max(0.0);
        let top = (rect.y as f32 / size.y).floor().max(0.0);
        let right = ((rect.right() as f32 / size.x).ceil()).min(self.mapping.cols as f32);
        let bottom = ((rect.bottom() as f32 / size.y).ceil()).min(self.mapping.rows as f32);
        if right <= left || bottom <= top {
            return None;
        }
        Some((left as u16, top as u16, right as u16, bottom as u16))
    }
}

/// Multiply a glyph colour by a premultiplied tint.
fn modulate(base: Color, tint: Color) -> Color {
    let mul = |a: u8, b: u8| ((a as u16 * b as u16) / 255) as u8;
    Color::rgba(mul(base.r, tint.r), mul(base.g, tint.g), mul(base.b, tint.b), tint.a)
}

fn to_terminal(color: Color) -> style::Color {
    style::Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn begin_frame(&mut self) {
        self.cells.fill(Cell::BLANK);
        self.translation = Vec2::ZERO;
    }

    fn set_translation(&mut self, offset: Vec2) {
        self.translation = offset;
    }

    fn draw_sprite(&mut self, draw: &SpriteDraw) {
        if draw.tint.a < MIN_VISIBLE_ALPHA {
            return;
        }
        let Some(&(glyph, base)) = self.glyphs.get(&draw.texture.id) else { return };
        let position = draw.position + self.translation;

        // Rotation is ignored; a glyph block has no orientation.
        let top_left = position - draw.origin * draw.scale;
        let rect = Rect::new(
            top_left.x as i32,
            top_left.y as i32,
            ((draw.source.width as f32 * draw.scale) as i32).max(1),
            ((draw.source.height as f32 * draw.scale) as i32).max(1),
        );
        let color = modulate(base, draw.tint);

        let Some((left, top, right, bottom)) = self.cell_span(rect) else { return };
        for row in top..bottom {
            for col in left..right {
                self.put(col, row, glyph, color);
            }
        }
    }

    fn draw_text(&mut self, _font: FontHandle, text: &str, position: Vec2, color: Color, _scale: f32) {
        if color.a < MIN_VISIBLE_ALPHA {
            return;
        }
        let Some((col, row)) = self.mapping.to_cell(position + self.translation) else { return };
        for (i, ch) in text.chars().enumerate() {
            self.put(col.saturating_add(i as u16), row, ch, color);
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((left, top, right, bottom)) = self.cell_span(rect) else { return };
        let keep = 1.0 - color.a as f32 / 255.0;
        for row in top..bottom {
            for col in left..right {
                let index = row as usize * self.mapping.cols as usize + col as usize;
                let cell = &mut self.cells[index];
                if color.a >= OPAQUE_ALPHA {
                    *cell = Cell::BLANK;
                } else {
                    cell.color = cell.color.scaled(keep);
                }
            }
        }
    }

    fn end_frame(&mut self) -> Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        for row in 0..self.mapping.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let mut current: Option<Color> = None;
            for col in 0..self.mapping.cols {
                let cell = self.cells[row as usize * self.mapping.cols as usize + col as usize];
                if cell.ch == ' ' {
                    self.out.queue(Print(' '))?;
                    continue;
                }
                if current != Some(cell.color) {
                    self.out.queue(style::SetForegroundColor(to_terminal(cell.color)))?;
                    current = Some(cell.color);
                }
                self.out.queue(Print(cell.ch))?;
            }
        }

        // Park cursor in a harmless spot and flush
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(0, self.mapping.rows.saturating_sub(1)))?;
        self.out.flush()?;
        Ok(())
    }
}

//! The shared pixel grid.  One atomic cell per pixel, holding either a
//! packed color or the UNSET sentinel.  The renderer stores cells with
//! relaxed ordering and the display consumer loads them the same way;
//! the region queue's mutex is what orders a region's writes before
//! the consumer's reads, and the atomics keep the consumer's
//! whole-buffer repaint fallback well-defined even while the renderer
//! is mid-region.  The grid never resizes; a new size is a new
//! session.

use escape::Color;
use std::sync::atomic::{AtomicU32, Ordering};

/// The value of a cell no renderer has written yet.  Palettes produce
/// 0x00RRGGBB values, so the sentinel can never collide with a real
/// color.
pub const UNSET: u32 = u32::MAX;

/// A fixed-size width × height grid of atomic color cells.
#[derive(Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    cells: Vec<AtomicU32>,
}

impl PixelBuffer {
    /// Allocate a grid with every cell UNSET.
    pub fn new(width: u32, height: u32) -> PixelBuffer {
        let len = width as usize * height as usize;
        let mut cells = Vec::with_capacity(len);
        for _ in 0..len {
            cells.push(AtomicU32::new(UNSET));
        }
        PixelBuffer {
            width,
            height,
            cells,
        }
    }

    /// Pixel columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel rows.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Store a color.  The coordinate must be in bounds; the renderer
    /// only ever writes pixels of regions it derived from this grid.
    pub fn set(&self, x: u32, y: u32, color: Color) {
        self.cells[self.index(x, y)].store(color, Ordering::Relaxed);
    }

    /// Load a cell, UNSET included.  In-bounds coordinates only, as
    /// with `set`; `color` is the checked reader.
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.cells[self.index(x, y)].load(Ordering::Relaxed)
    }

    /// The committed color of a pixel, or None for an UNSET cell or an
    /// out-of-range coordinate.
    pub fn color(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.get(x, y) {
            UNSET => None,
            color => Some(color),
        }
    }

    /// Reset every cell to UNSET.
    pub fn clear(&self) {
        for cell in &self.cells {
            cell.store(UNSET, Ordering::Relaxed);
        }
    }
}

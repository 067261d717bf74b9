#![forbid(unsafe_code)]

//! A minimal grid of terminal cells.
//!
//! [`CellBuffer`] is the canvas [`CellSurface`](crate::CellSurface) paints
//! into. Hosts copy it into their own terminal buffer; tests read it back
//! with [`CellBuffer::row_text`].

use coachmark_core::Rect;

bitflags::bitflags! {
    /// Per-cell rendering attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        /// Covered by the dim layer.
        const DIM     = 0b0001;
        const BOLD    = 0b0010;
        /// Part of a pointer stroke or head.
        const POINTER = 0b0100;
        /// Part of a label.
        const LABEL   = 0b1000;
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub flags: CellFlags,
}

impl Cell {
    /// Trailing half of a wide character.
    pub const CONTINUATION: char = '\0';

    pub const BLANK: Cell = Cell {
        ch: ' ',
        flags: CellFlags::empty(),
    };

    #[inline]
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.ch == Self::CONTINUATION
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The whole buffer in the float coordinates layout works in.
    #[must_use]
    pub fn area(&self) -> Rect {
        Rect::from_size(f32::from(self.width), f32::from(self.height))
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u16::try_from(x).ok()?;
        let y = u16::try_from(y).ok()?;
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Cell at `(x, y)`; `None` outside the buffer.
    #[must_use]
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write `ch` with `flags`. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, ch: char, flags: CellFlags) {
        if let Some(cell) = self.get_mut(x, y) {
            *cell = Cell { ch, flags };
        }
    }

    /// Reset every cell to blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Characters of row `y`, continuation cells skipped.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        self.cells[start..start + usize::from(self.width)]
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.ch)
            .collect()
    }

    /// Every row, top to bottom.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        (0..self.height).map(|y| self.row_text(y)).collect()
    }

    /// Number of cells carrying all of `flags`.
    #[must_use]
    pub fn count(&self, flags: CellFlags) -> usize {
        self.cells.iter().filter(|c| c.flags.contains(flags)).count()
    }
}

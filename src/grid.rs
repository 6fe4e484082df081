// src/grid.rs
//
// Bit-packed double buffer. Cells are stored as column words: the word at
// (x, wy) holds the 32 vertically stacked cells (x, wy*32 .. wy*32+31),
// bit b = row wy*32+b. Word rows are laid out row-major, `w` words each.

use log::debug;

use crate::error::{LifeError, Result};

/// Cells per packed word.
pub const LANES: usize = 32;

/// Round `n` up to the next multiple of [`LANES`].
#[inline]
pub fn round_up_32(n: usize) -> usize {
    n.div_ceil(LANES) * LANES
}

pub struct Grid {
    w: usize,
    h: usize,
    max_side: usize,

    cur: Vec<u32>,
    next: Vec<u32>,

    generation: u64,
}

impl Grid {
    /// Allocate an all-dead grid. `max_side` is the capacity limit for each
    /// rounded dimension.
    pub fn new(width: usize, height: usize, max_side: usize) -> Result<Self> {
        let mut grid = Self {
            w: 0,
            h: 0,
            max_side,
            cur: Vec::new(),
            next: Vec::new(),
            generation: 0,
        };
        grid.allocate(width, height)?;
        Ok(grid)
    }

    fn checked_dims(&self, width: usize, height: usize) -> Result<(usize, usize)> {
        let w = round_up_32(width);
        let h = round_up_32(height);
        if w == 0 || h == 0 || w > self.max_side || h > self.max_side {
            return Err(LifeError::Size {
                width: w,
                height: h,
                max: self.max_side,
            });
        }
        Ok((w, h))
    }

    /// (Re)allocate both buffers at the rounded size. On failure the previous
    /// grid is left untouched.
    pub fn allocate(&mut self, width: usize, height: usize) -> Result<()> {
        let (w, h) = self.checked_dims(width, height)?;
        let words = w * (h / LANES);
        self.cur = vec![0; words];
        self.next = vec![0; words];
        self.w = w;
        self.h = h;
        self.generation = 0;
        debug!("allocated {w} x {h} grid ({words} words per buffer)");
        Ok(())
    }

    /// Load a row-major boolean grid of exact (unrounded) dimensions as the
    /// new current generation.
    pub fn pack(&mut self, cells: &[bool], width: usize, height: usize) -> Result<()> {
        let expected = width * height;
        if cells.len() != expected {
            return Err(LifeError::InvalidCells {
                expected,
                actual: cells.len(),
            });
        }

        let (w, h) = self.checked_dims(width, height)?;
        if (w, h) != (self.w, self.h) {
            self.allocate(width, height)?;
        } else {
            self.clear();
        }

        for (y, row) in cells.chunks_exact(width.max(1)).enumerate() {
            let base = (y / LANES) * self.w;
            let bit = 1u32 << (y % LANES);
            for (x, &alive) in row.iter().enumerate() {
                if alive {
                    self.cur[base + x] |= bit;
                }
            }
        }
        Ok(())
    }

    /// Kill every cell and reset the generation counter.
    pub fn clear(&mut self) {
        self.cur.fill(0);
        self.next.fill(0);
        self.generation = 0;
    }

    #[inline]
    fn locate(&self, x: i64, y: i64) -> Option<(usize, u32)> {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some(((y / LANES) * self.w + x, 1u32 << (y % LANES)))
    }

    /// Out-of-range coordinates read as dead.
    pub fn read_cell(&self, x: i64, y: i64) -> bool {
        self.locate(x, y)
            .is_some_and(|(i, bit)| self.cur[i] & bit != 0)
    }

    /// Out-of-range coordinates are ignored.
    pub fn write_cell(&mut self, x: i64, y: i64, alive: bool) {
        if let Some((i, bit)) = self.locate(x, y) {
            if alive {
                self.cur[i] |= bit;
            } else {
                self.cur[i] &= !bit;
            }
        }
    }

    /// Exchange the current/next roles and count the completed generation.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.cur, &mut self.next);
        self.generation += 1;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Padded dimensions in cells.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn max_side(&self) -> usize {
        self.max_side
    }

    /// Number of word rows (`height / 32`).
    pub fn word_rows(&self) -> usize {
        self.h / LANES
    }

    /// Packed words of the current generation.
    pub fn words(&self) -> &[u32] {
        &self.cur
    }

    /// Current generation (read) and next generation (write) at once.
    pub(crate) fn split_buffers(&mut self) -> (&[u32], &mut [u32]) {
        (&self.cur, &mut self.next)
    }

    pub fn population(&self) -> u64 {
        self.cur.iter().map(|w| w.count_ones() as u64).sum()
    }
}

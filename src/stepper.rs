// src/stepper.rs
//
// Dispatch of the word kernel over the whole grid, followed by the role swap.

use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;
use crate::grid::Grid;
use crate::kernel;

pub struct Stepper {
    pool: ThreadPool,
}

impl Stepper {
    /// Build the worker pool. `threads == 0` lets rayon pick one per core.
    /// A pool that cannot be built is a startup failure.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("life-step-{i}"))
            .build()?;
        info!("update pool ready with {} threads", pool.current_num_threads());
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Advance one generation. Every task owns one disjoint output word row
    /// and only reads the current buffer; the swap happens after all rows are
    /// written.
    pub fn step_once(&self, grid: &mut Grid) {
        let (cols, _) = grid.dimensions();
        let rows = grid.word_rows();
        let (cur, next) = grid.split_buffers();

        self.pool.install(|| {
            next.par_chunks_mut(cols)
                .enumerate()
                .for_each(|(wy, out)| kernel::step_word_row(cur, cols, rows, wy, out));
        });

        grid.swap();
    }

    pub fn run_steps(&self, grid: &mut Grid, n: usize) {
        for _ in 0..n {
            self.step_once(grid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[(i64, i64)]) -> Grid {
        let mut grid = Grid::new(64, 64, 1024).unwrap();
        for &(x, y) in cells {
            grid.write_cell(x, y, true);
        }
        grid
    }

    fn alive_cells(grid: &Grid) -> Vec<(i64, i64)> {
        let (w, h) = grid.dimensions();
        let mut out = Vec::new();
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                if grid.read_cell(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn blinker_has_period_two() {
        // straddles the word-row seam at y = 31/32
        let start = [(10, 31), (10, 32), (10, 33)];
        let stepper = Stepper::new(2).unwrap();
        let mut grid = grid_with(&start);

        stepper.step_once(&mut grid);
        assert_eq!(alive_cells(&grid), vec![(9, 32), (10, 32), (11, 32)]);

        stepper.step_once(&mut grid);
        assert_eq!(alive_cells(&grid), start.to_vec());
        assert_eq!(grid.generation(), 2);
    }

    #[test]
    fn lone_cell_dies() {
        let stepper = Stepper::new(1).unwrap();
        let mut grid = grid_with(&[(5, 5)]);
        stepper.step_once(&mut grid);
        assert_eq!(grid.population(), 0);
    }

    #[test]
    fn block_is_stable() {
        let block = [(30, 31), (31, 31), (30, 32), (31, 32)];
        let stepper = Stepper::new(0).unwrap();
        let mut grid = grid_with(&block);
        stepper.run_steps(&mut grid, 50);
        assert_eq!(alive_cells(&grid), block.to_vec());
        assert_eq!(grid.generation(), 50);
    }

    #[test]
    fn glider_moves_one_cell_diagonally_every_four_steps() {
        let glider = [(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)];
        let stepper = Stepper::new(4).unwrap();
        let mut grid = grid_with(&glider);
        stepper.run_steps(&mut grid, 4 * 20);

        let moved: Vec<(i64, i64)> = {
            let mut v: Vec<_> = glider.iter().map(|&(x, y)| (x + 20, y + 20)).collect();
            v.sort_by_key(|&(x, y)| (y, x));
            v
        };
        assert_eq!(alive_cells(&grid), moved);
    }

    #[test]
    fn edges_do_not_wrap() {
        // a blinker on the left edge loses the cell that would wrap around
        let stepper = Stepper::new(2).unwrap();
        let mut grid = grid_with(&[(0, 10), (0, 11), (0, 12)]);
        stepper.step_once(&mut grid);
        assert_eq!(alive_cells(&grid), vec![(0, 11), (1, 11)]);
        assert!(!grid.read_cell(63, 11));
    }

    #[test]
    fn zero_steps_leave_generation_alone() {
        let stepper = Stepper::new(1).unwrap();
        let mut grid = grid_with(&[(1, 1)]);
        stepper.run_steps(&mut grid, 0);
        assert_eq!(grid.generation(), 0);
        assert!(grid.read_cell(1, 1));
    }
}

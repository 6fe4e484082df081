// src/sampler.rs
//
// Grid -> RGBA pixels. Each pixel centre is mapped through the view into
// grid space; the cells-per-pixel derivative picks the regime:
//   * sub-cell: many pixels per cell, sample one cell and anti-alias the
//     cell border against the pixel footprint;
//   * super-cell: a pixel covers many cells, OR-reduce every covered cell
//     with whole-word masks (any alive => alive).

use rayon::prelude::*;

use crate::grid::{Grid, LANES};
use crate::view::View;

/// Below this many cells per pixel (on both axes) cells are drawn with borders.
pub const SUB_CELL_THRESHOLD: f32 = 0.2;

pub type Rgba = [u8; 4];

/// Colours and border settings. The border blends toward the dead colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    pub dead: Rgba,
    pub alive: Rgba,
    /// Inset of the cell interior, as a fraction of the cell size.
    pub border_width: f32,
    pub border_enabled: bool,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: [0, 0, 0, 255],
        dead: [26, 26, 26, 255],
        alive: [255, 255, 255, 255],
        border_width: 0.1,
        border_enabled: true,
    };

    pub const LIGHT: Palette = Palette {
        background: [230, 230, 230, 255],
        dead: [255, 255, 255, 255],
        alive: [0, 0, 0, 255],
        border_width: 0.1,
        border_enabled: true,
    };
}

impl Default for Palette {
    fn default() -> Self {
        Palette::DARK
    }
}

/// A row-padded RGBA8 surface (rows may be wider than `4 * width`).
pub struct PixelTarget<'a> {
    pub pixels: &'a mut [u8],
    pub width: usize,
    pub height: usize,
    pub bytes_per_row: usize,
}

fn mix(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let (x, y) = (a[i] as f32, b[i] as f32);
        out[i] = (x + (y - x) * t).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// True if any cell in the inclusive rectangle `[x0, x1] x [y0, y1]` is alive.
/// Scans whole column words; each word row contributes one lane mask.
pub fn any_alive(words: &[u32], cols: usize, x0: usize, x1: usize, y0: usize, y1: usize) -> bool {
    let mut y = y0;
    while y <= y1 {
        let lo = y % LANES;
        let hi = (lo + (y1 - y)).min(LANES - 1);
        let mask = (u32::MAX >> (LANES - 1 - hi)) & (u32::MAX << lo);

        let base = (y / LANES) * cols;
        if words[base + x0..=base + x1].iter().any(|&w| w & mask != 0) {
            return true;
        }
        y += hi - lo + 1;
    }
    false
}

/// Per-frame constants shared by every pixel.
struct Mapping {
    cells: (f32, f32),
    scale: (f32, f32),
    offset: (f32, f32),
    delta: (f32, f32),
    inv_size: (f32, f32),
}

impl Mapping {
    fn new(grid: &Grid, view: &View, width: usize, height: usize) -> Self {
        let (cw, ch) = grid.dimensions();
        let (cw, ch) = (cw as f32, ch as f32);
        let (sx, sy) = view.uv_scale();
        let (w, h) = (width.max(1) as f32, height.max(1) as f32);
        Self {
            cells: (cw, ch),
            scale: (sx, sy),
            offset: (view.offset_x, view.offset_y),
            delta: ((sx * cw / w).abs(), (sy * ch / h).abs()),
            inv_size: (1.0 / w, 1.0 / h),
        }
    }

    fn sub_cell(&self) -> bool {
        self.delta.0 < SUB_CELL_THRESHOLD && self.delta.1 < SUB_CELL_THRESHOLD
    }
}

fn shade(grid: &Grid, m: &Mapping, palette: &Palette, px: usize, py: usize) -> Rgba {
    let u = (px as f32 + 0.5) * m.inv_size.0 * m.scale.0 + m.offset.0;
    let v = (py as f32 + 0.5) * m.inv_size.1 * m.scale.1 + m.offset.1;
    if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
        return palette.background;
    }

    let (cw, ch) = m.cells;
    let (fx, fy) = (u * cw, v * ch);
    let (dx, dy) = m.delta;
    let max_x = cw as i64 - 1;
    let max_y = ch as i64 - 1;

    if m.sub_cell() {
        let cx = (fx.floor() as i64).clamp(0, max_x);
        let cy = (fy.floor() as i64).clamp(0, max_y);
        let color = if grid.read_cell(cx, cy) {
            palette.alive
        } else {
            palette.dead
        };
        if !palette.border_enabled {
            return color;
        }

        let frag_min = (fx - 0.5 * dx, fy - 0.5 * dy);
        let frag_max = (fx + 0.5 * dx, fy + 0.5 * dy);
        let bw = palette.border_width;
        let cell_min = (fx.floor() + bw, fy.floor() + bw);
        let cell_max = (fx.floor() + 1.0 - bw, fy.floor() + 1.0 - bw);

        let inside = frag_min.0 >= cell_min.0
            && frag_min.1 >= cell_min.1
            && frag_max.0 <= cell_max.0
            && frag_max.1 <= cell_max.1;
        if inside {
            return color;
        }

        let ox = (frag_max.0.min(cell_max.0) - frag_min.0.max(cell_min.0)).max(0.0);
        let oy = (frag_max.1.min(cell_max.1) - frag_min.1.max(cell_min.1)).max(0.0);
        let area = (frag_max.0 - frag_min.0) * (frag_max.1 - frag_min.1);
        let overlap = if area > 0.0 { ox * oy / area } else { 0.0 };
        return mix(palette.dead, color, overlap);
    }

    // Cells whose interior intersects the pixel footprint.
    let x0 = ((fx - 0.5 * dx).floor() as i64).clamp(0, max_x);
    let y0 = ((fy - 0.5 * dy).floor() as i64).clamp(0, max_y);
    let x1 = (((fx + 0.5 * dx).ceil() as i64) - 1).clamp(x0, max_x);
    let y1 = (((fy + 0.5 * dy).ceil() as i64) - 1).clamp(y0, max_y);

    let (cols, _) = grid.dimensions();
    if any_alive(
        grid.words(),
        cols,
        x0 as usize,
        x1 as usize,
        y0 as usize,
        y1 as usize,
    ) {
        palette.alive
    } else {
        palette.dead
    }
}

/// Draw the current generation into `target`. Read-only on the grid.
pub fn render(grid: &Grid, view: &View, palette: &Palette, target: &mut PixelTarget<'_>) {
    let width = target.width;
    let height = target.height;
    let bpr = target.bytes_per_row;
    if width == 0 || height == 0 || bpr < width * 4 {
        return;
    }
    let mapping = Mapping::new(grid, view, width, height);

    target
        .pixels
        .par_chunks_mut(bpr)
        .take(height)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, out) in row[..width * 4].chunks_exact_mut(4).enumerate() {
                out.copy_from_slice(&shade(grid, &mapping, palette, px, py));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(width: usize, height: usize) -> Vec<u8> {
        vec![0u8; width * height * 4]
    }

    fn pixel(buf: &[u8], width: usize, x: usize, y: usize) -> Rgba {
        let o = (y * width + x) * 4;
        [buf[o], buf[o + 1], buf[o + 2], buf[o + 3]]
    }

    fn draw(grid: &Grid, view: &View, palette: &Palette, w: usize, h: usize) -> Vec<u8> {
        let mut buf = frame(w, h);
        let mut target = PixelTarget {
            pixels: &mut buf,
            width: w,
            height: h,
            bytes_per_row: w * 4,
        };
        render(grid, view, palette, &mut target);
        buf
    }

    #[test]
    fn any_alive_crosses_word_rows() {
        let cols = 3;
        let mut words = vec![0u32; cols * 3];
        words[cols + 1] = 1 << 5; // cell (1, 37)
        assert!(any_alive(&words, cols, 0, 2, 0, 95));
        assert!(any_alive(&words, cols, 1, 1, 30, 40));
        assert!(any_alive(&words, cols, 1, 1, 37, 37));
        assert!(!any_alive(&words, cols, 1, 1, 38, 95));
        assert!(!any_alive(&words, cols, 1, 1, 0, 36));
        assert!(!any_alive(&words, cols, 0, 0, 0, 95));
        assert!(!any_alive(&words, cols, 2, 2, 37, 37));
    }

    #[test]
    fn super_cell_pixel_is_alive_if_any_covered_cell_is() {
        let mut grid = Grid::new(128, 128, 1024).unwrap();
        grid.write_cell(37, 70, true);
        let view = View::default();
        let palette = Palette::DARK;

        // 8 x 8 cells per pixel
        let buf = draw(&grid, &view, &palette, 16, 16);
        for y in 0..16 {
            for x in 0..16 {
                let want = if (x, y) == (4, 8) { palette.alive } else { palette.dead };
                assert_eq!(pixel(&buf, 16, x, y), want, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn super_cell_footprint_spanning_a_word_seam() {
        let mut grid = Grid::new(128, 128, 1024).unwrap();
        grid.write_cell(30, 33, true);
        let palette = Palette::DARK;
        // 12.8 cells per pixel; pixel row 2 covers cell rows 25..=38
        let buf = draw(&grid, &View::default(), &palette, 10, 10);
        assert_eq!(pixel(&buf, 10, 2, 2), palette.alive);
        assert_eq!(pixel(&buf, 10, 2, 1), palette.dead);
        assert_eq!(pixel(&buf, 10, 3, 2), palette.dead);
    }

    #[test]
    fn one_to_one_does_not_bleed() {
        let mut grid = Grid::new(32, 32, 1024).unwrap();
        grid.write_cell(5, 6, true);
        let palette = Palette::DARK;
        let buf = draw(&grid, &View::default(), &palette, 32, 32);
        assert_eq!(pixel(&buf, 32, 5, 6), palette.alive);
        assert_eq!(pixel(&buf, 32, 6, 6), palette.dead);
        assert_eq!(pixel(&buf, 32, 5, 7), palette.dead);
        assert_eq!(pixel(&buf, 32, 4, 5), palette.dead);
    }

    fn zoomed_view() -> View {
        // 320 px show 9.6 cells: 0.03 cells per pixel
        View {
            scale: 0.3,
            ..View::default()
        }
    }

    #[test]
    fn sub_cell_interior_and_border() {
        let mut grid = Grid::new(32, 32, 1024).unwrap();
        grid.write_cell(1, 1, true);
        let palette = Palette::DARK;
        let buf = draw(&grid, &zoomed_view(), &palette, 320, 320);

        // centre of cell (1, 1)
        assert_eq!(pixel(&buf, 320, 49, 49), palette.alive);
        // inside the border band
        assert_eq!(pixel(&buf, 320, 34, 49), palette.dead);
        // footprint straddles the interior edge: blended
        let blended = pixel(&buf, 320, 36, 49);
        assert!(blended[0] > palette.dead[0] && blended[0] < palette.alive[0]);
        // dead cell stays dead regardless
        assert_eq!(pixel(&buf, 320, 10, 10), palette.dead);
    }

    #[test]
    fn border_can_be_disabled() {
        let mut grid = Grid::new(32, 32, 1024).unwrap();
        grid.write_cell(1, 1, true);
        let palette = Palette {
            border_enabled: false,
            ..Palette::DARK
        };
        let buf = draw(&grid, &zoomed_view(), &palette, 320, 320);
        assert_eq!(pixel(&buf, 320, 34, 49), palette.alive);
        assert_eq!(pixel(&buf, 320, 36, 49), palette.alive);
    }

    #[test]
    fn outside_the_grid_is_background() {
        let mut grid = Grid::new(32, 32, 1024).unwrap();
        grid.write_cell(0, 0, true);
        let palette = Palette::LIGHT;
        let view = View {
            offset_x: -0.5,
            ..View::default()
        };
        let buf = draw(&grid, &view, &palette, 32, 32);
        assert_eq!(pixel(&buf, 32, 0, 0), palette.background);
        assert_eq!(pixel(&buf, 32, 15, 20), palette.background);
        assert_eq!(pixel(&buf, 32, 16, 0), palette.alive);
    }

    #[test]
    fn render_never_mutates_the_grid() {
        let mut grid = Grid::new(64, 64, 1024).unwrap();
        grid.write_cell(3, 40, true);
        let before = grid.words().to_vec();
        let _ = draw(&grid, &View::default(), &Palette::DARK, 7, 5);
        let _ = draw(&grid, &zoomed_view(), &Palette::DARK, 100, 100);
        assert_eq!(grid.words(), &before[..]);
        assert_eq!(grid.generation(), 0);
    }

    #[test]
    fn padded_rows_are_left_alone() {
        let grid = Grid::new(32, 32, 1024).unwrap();
        let mut buf = vec![7u8; 64 * 4];
        let mut target = PixelTarget {
            pixels: &mut buf,
            width: 4,
            height: 4,
            bytes_per_row: 64,
        };
        render(&grid, &View::default(), &Palette::DARK, &mut target);
        assert_eq!(&buf[0..4], &Palette::DARK.dead);
        assert_eq!(buf[16], 7);
    }
}

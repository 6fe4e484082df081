// src/view.rs
//
// Pan/zoom transform between window pixels and grid space.
//
// A pixel at normalised window position m in [0,1]^2 looks at grid uv
//   uv = offset + m * scale * (scale_x, scale_y)
// and uv in [0,1]^2 covers the whole (padded) grid. `scale_x/scale_y`
// correct the aspect ratio, `scale` is the zoom.

use crate::tuning::ViewTuning;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    pub scale: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl Default for View {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl View {
    /// Effective uv span of the window on each axis.
    #[inline]
    pub fn uv_scale(&self) -> (f32, f32) {
        (self.scale * self.scale_x, self.scale * self.scale_y)
    }

    /// Reset zoom and fit the whole grid into the window, centred, with
    /// square cells.
    pub fn center(&mut self, window: (u32, u32), cells: (usize, usize)) {
        *self = View::default();

        let window_aspect = window.0.max(1) as f32 / window.1.max(1) as f32;
        let (cw, ch) = (cells.0.max(1) as f32, cells.1.max(1) as f32);
        let cells_aspect = cw / ch;

        if cells_aspect > window_aspect {
            self.scale_y = self.scale_x * cw / (window_aspect * ch);
            self.offset_y = 0.5 - 0.5 * self.scale_y;
        } else if cells_aspect < window_aspect {
            self.scale_x = window_aspect * self.scale_y * ch / cw;
            self.offset_x = 0.5 - 0.5 * self.scale_x;
        }
    }

    fn normalised(pointer: (f32, f32), window: (u32, u32)) -> (f32, f32) {
        (
            pointer.0 / window.0.max(1) as f32,
            pointer.1 / window.1.max(1) as f32,
        )
    }

    /// Grid uv under a window pixel position.
    pub fn pointer_to_uv(&self, pointer: (f32, f32), window: (u32, u32)) -> (f32, f32) {
        let (mx, my) = Self::normalised(pointer, window);
        let (sx, sy) = self.uv_scale();
        (self.offset_x + mx * sx, self.offset_y + my * sy)
    }

    /// Cell under a window pixel position. May lie outside the grid.
    pub fn pointer_to_cell(
        &self,
        pointer: (f32, f32),
        window: (u32, u32),
        cells: (usize, usize),
    ) -> (i64, i64) {
        let (u, v) = self.pointer_to_uv(pointer, window);
        (
            (u * cells.0 as f32).floor() as i64,
            (v * cells.1 as f32).floor() as i64,
        )
    }

    /// Zoom in or out by one notch, keeping the grid point under the pointer
    /// fixed on screen.
    pub fn zoom_at(&mut self, pointer: (f32, f32), window: (u32, u32), zoom_in: bool, t: &ViewTuning) {
        let (mx, my) = Self::normalised(pointer, window);
        let (cx, cy) = self.pointer_to_uv(pointer, window);

        self.scale = if zoom_in {
            (self.scale / t.zoom_factor).max(t.min_scale)
        } else {
            (self.scale * t.zoom_factor).min(t.max_scale)
        };

        let (sx, sy) = self.uv_scale();
        self.offset_x = cx - mx * sx;
        self.offset_y = cy - my * sy;
    }

    /// Drag the grid by a pixel delta (content follows the pointer).
    pub fn pan_pixels(&mut self, delta: (f32, f32), window: (u32, u32)) {
        let (dx, dy) = Self::normalised(delta, window);
        let (sx, sy) = self.uv_scale();
        self.offset_x -= sx * dx;
        self.offset_y -= sy * dy;
    }

    /// Move the viewport by a fixed fraction of its size; `dir` components are
    /// -1, 0 or 1 (positive = right/down).
    pub fn pan_step(&mut self, dir: (i32, i32), t: &ViewTuning) {
        let (sx, sy) = self.uv_scale();
        self.offset_x += sx * t.pan_step * dir.0 as f32;
        self.offset_y += sy * t.pan_step * dir.1 as f32;
    }
}

/// Cells on the line between two cells (inclusive), Bresenham order.
pub fn line_cells(from: (i64, i64), to: (i64, i64)) -> Vec<(i64, i64)> {
    let (mut x, mut y) = from;
    let (xend, yend) = to;

    let dx = (xend - x).abs();
    let dy = -(yend - y).abs();
    let sign_x = if x < xend { 1 } else { -1 };
    let sign_y = if y < yend { 1 } else { -1 };
    let mut error = dx + dy;

    let mut out = Vec::with_capacity((dx - dy + 1) as usize);
    loop {
        out.push((x, y));
        if x == xend && y == yend {
            break;
        }
        let e2 = 2 * error;
        if e2 >= dy {
            error += dy;
            x += sign_x;
        }
        if e2 <= dx {
            error += dx;
            y += sign_y;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_wide_grid_in_square_window() {
        let mut view = View::default();
        view.center((400, 400), (800, 400));
        assert_relative_eq!(view.scale_x, 1.0);
        assert_relative_eq!(view.scale_y, 2.0);
        assert_relative_eq!(view.offset_y, -0.5);
        // top-left pixel sits half a grid above the grid
        let (u, v) = view.pointer_to_uv((0.0, 0.0), (400, 400));
        assert_relative_eq!(u, 0.0);
        assert_relative_eq!(v, -0.5);
    }

    #[test]
    fn center_tall_window() {
        let mut view = View::default();
        view.center((1280, 720), (256, 256));
        assert_relative_eq!(view.scale_y, 1.0);
        assert_relative_eq!(view.scale_x, 1280.0 / 720.0, epsilon = 1e-6);
        let (u, _) = view.pointer_to_uv((640.0, 360.0), (1280, 720));
        assert_relative_eq!(u, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn zoom_keeps_pointer_anchor() {
        let t = ViewTuning::default();
        let mut view = View::default();
        let window = (800, 600);
        let pointer = (200.0, 450.0);
        let before = view.pointer_to_uv(pointer, window);
        for _ in 0..5 {
            view.zoom_at(pointer, window, true, &t);
        }
        let after = view.pointer_to_uv(pointer, window);
        assert_relative_eq!(before.0, after.0, epsilon = 1e-5);
        assert_relative_eq!(before.1, after.1, epsilon = 1e-5);
        assert!(view.scale < 1.0);
    }

    #[test]
    fn zoom_is_clamped() {
        let t = ViewTuning::default();
        let mut view = View::default();
        for _ in 0..500 {
            view.zoom_at((0.0, 0.0), (10, 10), true, &t);
        }
        assert_relative_eq!(view.scale, t.min_scale);
        for _ in 0..500 {
            view.zoom_at((0.0, 0.0), (10, 10), false, &t);
        }
        assert_relative_eq!(view.scale, t.max_scale);
    }

    #[test]
    fn pointer_to_cell_floors_negative_positions() {
        let view = View {
            offset_x: -0.25,
            ..View::default()
        };
        assert_eq!(view.pointer_to_cell((0.0, 0.0), (100, 100), (64, 64)), (-16, 0));
        assert_eq!(view.pointer_to_cell((99.0, 50.0), (100, 100), (64, 64)), (47, 32));
    }

    #[test]
    fn pan_follows_pointer() {
        let mut view = View::default();
        let window = (100, 100);
        let before = view.pointer_to_uv((10.0, 10.0), window);
        view.pan_pixels((20.0, -5.0), window);
        let after = view.pointer_to_uv((30.0, 5.0), window);
        assert_relative_eq!(before.0, after.0, epsilon = 1e-6);
        assert_relative_eq!(before.1, after.1, epsilon = 1e-6);
    }

    #[test]
    fn bresenham_lines() {
        assert_eq!(line_cells((2, 2), (2, 2)), vec![(2, 2)]);
        assert_eq!(line_cells((0, 0), (3, 0)), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(line_cells((0, 0), (-2, -2)), vec![(0, 0), (-1, -1), (-2, -2)]);
        let steep = line_cells((0, 0), (1, 4));
        assert_eq!(steep.len(), 5);
        assert_eq!(steep.first(), Some(&(0, 0)));
        assert_eq!(steep.last(), Some(&(1, 4)));
    }
}

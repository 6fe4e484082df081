// src/session.rs
//
// Interaction state owned by the host loop and passed by reference into
// render/edit calls: view, colours, run flag and step pacing.

use crate::grid::Grid;
use crate::sampler::Palette;
use crate::tuning::{ControlPanel, PacingTuning};
use crate::view::{line_cells, View};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// What a pointer drag does to the cells it crosses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditMode {
    Paint,
    Erase,
    Pan,
}

pub struct Session {
    pub view: View,
    pub palette: Palette,
    pub running: bool,
    pub pattern_name: String,
    pub edit: Option<EditMode>,

    /// Steps run on each stepping frame.
    pub updates_per_frame: usize,
    /// Frames between stepping frames.
    pub frames_per_update: usize,
    frame_accum: usize,

    panel: ControlPanel,
}

impl Session {
    pub fn new(panel: ControlPanel) -> Self {
        Self {
            view: View::default(),
            palette: panel.dark,
            running: false,
            pattern_name: String::from("unnamed pattern"),
            edit: None,
            updates_per_frame: 1,
            frames_per_update: 1,
            frame_accum: 0,
            panel,
        }
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn set_theme(&mut self, theme: Theme) {
        let border = self.palette.border_enabled;
        self.palette = match theme {
            Theme::Dark => self.panel.dark,
            Theme::Light => self.panel.light,
        };
        self.palette.border_enabled = border;
    }

    pub fn toggle_border(&mut self) {
        self.palette.border_enabled = !self.palette.border_enabled;
    }

    /// Double the simulation rate: fewer frames per step first, then more
    /// steps per frame.
    pub fn faster(&mut self) {
        let PacingTuning { max_steps_per_frame, .. } = self.panel.pacing;
        if self.frames_per_update > 1 {
            self.frames_per_update /= 2;
        } else {
            self.updates_per_frame = (self.updates_per_frame * 2).min(max_steps_per_frame);
        }
    }

    pub fn slower(&mut self) {
        let PacingTuning { max_frames_per_step, .. } = self.panel.pacing;
        if self.updates_per_frame > 1 {
            self.updates_per_frame /= 2;
        } else {
            self.frames_per_update = (self.frames_per_update * 2).min(max_frames_per_step);
        }
    }

    /// Generations advanced per rendered frame (fractional when slower than
    /// one step per frame).
    pub fn steps_per_frame(&self) -> f64 {
        if self.updates_per_frame > 1 {
            self.updates_per_frame as f64
        } else {
            1.0 / self.frames_per_update as f64
        }
    }

    /// Called once per frame; how many steps to run now.
    pub fn steps_due(&mut self) -> usize {
        if !self.running {
            return 0;
        }
        self.frame_accum += 1;
        if self.frame_accum >= self.frames_per_update {
            self.frame_accum = 0;
            self.updates_per_frame
        } else {
            0
        }
    }

    pub fn recenter(&mut self, window: (u32, u32), grid: &Grid) {
        self.view.center(window, grid.dimensions());
    }

    /// Apply the current edit mode along the pointer path `from -> to`
    /// (window pixels). Cells outside the grid are skipped.
    pub fn stroke(&mut self, grid: &mut Grid, from: (f32, f32), to: (f32, f32), window: (u32, u32)) {
        let alive = match self.edit {
            Some(EditMode::Paint) => true,
            Some(EditMode::Erase) => false,
            Some(EditMode::Pan) => {
                self.view.pan_pixels((to.0 - from.0, to.1 - from.1), window);
                return;
            }
            None => return,
        };
        let dims = grid.dimensions();
        let a = self.view.pointer_to_cell(from, window, dims);
        let b = self.view.pointer_to_cell(to, window, dims);
        for (x, y) in line_cells(a, b) {
            grid.write_cell(x, y, alive);
        }
    }

    /// Single click edit at a window position.
    pub fn poke(&self, grid: &mut Grid, at: (f32, f32), window: (u32, u32)) {
        let alive = match self.edit {
            Some(EditMode::Paint) => true,
            Some(EditMode::Erase) => false,
            _ => return,
        };
        let (x, y) = self.view.pointer_to_cell(at, window, grid.dimensions());
        grid.write_cell(x, y, alive);
    }
}

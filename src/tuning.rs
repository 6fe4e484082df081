// src/tuning.rs
//
// This file is the CONTROL PANEL.
// Every default the simulator, renderer and host loop start from lives here;
// command-line flags override a few of them (see main.rs).

use crate::sampler::Palette;

/// Pan/zoom knobs.
#[derive(Clone, Copy, Debug)]
pub struct ViewTuning {
    /// Multiplier applied per zoom notch.
    pub zoom_factor: f32,
    /// Closest zoom. Much smaller values show rendering glitches.
    pub min_scale: f32,
    /// Farthest zoom.
    pub max_scale: f32,
    /// Arrow-key pan, as a fraction of the visible span.
    pub pan_step: f32,
}

impl Default for ViewTuning {
    fn default() -> Self {
        Self {
            zoom_factor: 1.1,
            min_scale: 0.0001,
            max_scale: 10.0,
            pan_step: 0.05,
        }
    }
}

/// Simulation-vs-render pacing.
#[derive(Clone, Copy, Debug)]
pub struct PacingTuning {
    /// Hard cap on steps run in one frame (wheel doubling stops here).
    pub max_steps_per_frame: usize,
    /// Hard cap on frames between two steps.
    pub max_frames_per_step: usize,
}

#[derive(Clone, Debug)]
pub struct ControlPanel {
    // grid
    pub initial_width: usize,
    pub initial_height: usize,
    /// Largest rounded grid side accepted by `Grid::allocate`.
    pub max_side: usize,

    // window
    pub window_width: u32,
    pub window_height: u32,
    pub vsync: bool,

    // look
    pub dark: Palette,
    pub light: Palette,

    pub view: ViewTuning,
    pub pacing: PacingTuning,

    // random soup (R key / --random)
    pub soup_density: f32,
    pub rng_seed: u64,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            initial_width: 256,
            initial_height: 256,
            max_side: 16384,

            window_width: 1280,
            window_height: 720,
            vsync: true,

            dark: Palette::DARK,
            light: Palette::LIGHT,

            view: ViewTuning::default(),
            pacing: PacingTuning {
                max_steps_per_frame: 1 << 12,
                max_frames_per_step: 1 << 8,
            },

            soup_density: 0.3,
            rng_seed: 0xC0FFEE_1234_5678,
        }
    }
}

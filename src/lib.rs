// src/lib.rs
//
// Bit-packed Game of Life: a double-buffered grid of 32-cell column words,
// a bit-parallel update kernel dispatched over a rayon pool, and a
// density-adaptive sampler that turns the grid into pixels.

pub mod error;
pub mod grid;
pub mod kernel;
pub mod pattern;
pub mod sampler;
pub mod session;
pub mod stepper;
pub mod tuning;
pub mod view;

pub use error::{LifeError, PatternError, Result};
pub use grid::Grid;
pub use pattern::Pattern;
pub use sampler::{render, Palette, PixelTarget};
pub use session::{EditMode, Session, Theme};
pub use stepper::Stepper;
pub use view::View;

// src/error.rs
//
// Error types for the simulation core and pattern ingestion.

use thiserror::Error;

/// Simulation error type
#[derive(Error, Debug)]
pub enum LifeError {
    /// Requested (rounded) dimensions exceed the capacity limit.
    #[error("grid size {width} x {height} exceeds the maximum {max} x {max}")]
    Size { width: usize, height: usize, max: usize },

    #[error("cell buffer holds {actual} cells but the pattern needs {expected}")]
    InvalidCells { expected: usize, actual: usize },

    /// The update/render worker pool could not be built.
    #[error("dispatch setup failed: {0}")]
    Dispatch(String),

    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),
}

impl From<rayon::ThreadPoolBuildError> for LifeError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        LifeError::Dispatch(e.to_string())
    }
}

/// Pattern decoding errors
#[derive(Error, Debug)]
pub enum PatternError {
    #[error("couldn't read pattern: {0}")]
    Io(#[from] std::io::Error),

    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid Life 1.06 file: {0}")]
    Life106(String),

    #[error("invalid RLE file: {0}")]
    Rle(String),

    /// Checked against the grid capacity before any cell storage exists.
    #[error("pattern is {width} x {height}, larger than the maximum {max} x {max}")]
    TooLarge { width: usize, height: usize, max: usize },

    #[error("pattern is empty")]
    Empty,
}

pub type Result<T> = std::result::Result<T, LifeError>;

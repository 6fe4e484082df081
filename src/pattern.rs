// src/pattern.rs
//
// Pattern ingestion: Life 1.06 coordinate lists, run-length encoded (RLE)
// files and raster images, all decoded to a row-major boolean grid with
// y growing downward.

use std::io::Cursor;
use std::path::Path;

use image::ImageReader;
use log::info;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{PatternError, Result};
use crate::grid::{round_up_32, Grid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` cells.
    pub cells: Vec<bool>,
}

type Decoded = std::result::Result<Pattern, PatternError>;

impl Pattern {
    pub fn empty(name: &str, width: usize, height: usize) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Uniform random soup.
    pub fn random(width: usize, height: usize, density: f32, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let density = density.clamp(0.0, 1.0);
        Self {
            name: format!("random soup {density:.2}"),
            width,
            height,
            cells: (0..width * height).map(|_| rng.random::<f32>() < density).collect(),
        }
    }

    /// Read and decode a pattern file, naming it after the file stem.
    /// Patterns whose rounded sides exceed `max_side` are rejected before
    /// any cell storage is allocated.
    pub fn load(path: &Path, max_side: usize) -> Decoded {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("unnamed pattern"));
        let pattern = Self::decode(&name, &bytes, max_side)?;
        info!(
            "loaded {} ({} x {}, {} alive)",
            pattern.name,
            pattern.width,
            pattern.height,
            pattern.population()
        );
        Ok(pattern)
    }

    /// Decode by sniffing the content: Life 1.06 header, then an RLE header,
    /// otherwise a raster image.
    pub fn decode(name: &str, bytes: &[u8], max_side: usize) -> Decoded {
        if let Ok(text) = std::str::from_utf8(bytes) {
            if text.trim_start().starts_with("#Life 1.06") {
                return parse_life106(name, text, max_side);
            }
            if rle_header(text).is_some() {
                return parse_rle(name, text, max_side);
            }
        }
        decode_image(name, bytes, max_side)
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x]
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Make this pattern the grid's current generation.
    pub fn apply(&self, grid: &mut Grid) -> Result<()> {
        grid.pack(&self.cells, self.width, self.height)
    }
}

/// Reject empty extents and sides that round past `max_side`.
fn check_extent(
    width: usize,
    height: usize,
    max_side: usize,
) -> std::result::Result<(), PatternError> {
    if width == 0 || height == 0 {
        return Err(PatternError::Empty);
    }
    let fits = |side: usize| side <= max_side && round_up_32(side) <= max_side;
    if !fits(width) || !fits(height) {
        return Err(PatternError::TooLarge {
            width,
            height,
            max: max_side,
        });
    }
    Ok(())
}

/// Inclusive span `lo..=hi` as a side length, saturating on overflow.
fn span(lo: i64, hi: i64) -> usize {
    let len = hi as i128 - lo as i128 + 1;
    usize::try_from(len).unwrap_or(usize::MAX)
}

fn parse_life106(name: &str, text: &str, max_side: usize) -> Decoded {
    let mut points = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace().map(str::parse::<i64>);
        match (it.next(), it.next(), it.next()) {
            (Some(Ok(x)), Some(Ok(y)), None) => points.push((x, y)),
            _ => {
                return Err(PatternError::Life106(format!(
                    "line {}: expected \"x y\", got {line:?}",
                    lineno + 1
                )))
            }
        }
    }

    let (min_x, max_x) = bounds(points.iter().map(|p| p.0)).ok_or(PatternError::Empty)?;
    let (min_y, max_y) = bounds(points.iter().map(|p| p.1)).ok_or(PatternError::Empty)?;
    let width = span(min_x, max_x);
    let height = span(min_y, max_y);
    check_extent(width, height, max_side)?;

    let mut pattern = Pattern::empty(name, width, height);
    for (x, y) in points {
        let (x, y) = (span(min_x, x) - 1, span(min_y, y) - 1);
        pattern.cells[y * width + x] = true;
    }
    Ok(pattern)
}

fn bounds(values: impl Iterator<Item = i64>) -> Option<(i64, i64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// `x = W, y = H[, rule = ...]` on the first line that is not a comment.
/// Returns the dimensions and the byte offset of the body.
fn rle_header(text: &str) -> Option<(usize, usize, usize)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        offset += line.len();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut width = None;
        let mut height = None;
        for field in trimmed.split(',') {
            let (key, value) = field.split_once('=')?;
            match key.trim() {
                "x" => width = value.trim().parse().ok(),
                "y" => height = value.trim().parse().ok(),
                _ => {}
            }
        }
        return Some((width?, height?, offset));
    }
    None
}

fn parse_rle(name: &str, text: &str, max_side: usize) -> Decoded {
    let (width, height, body) =
        rle_header(text).ok_or_else(|| PatternError::Rle("missing header".into()))?;
    check_extent(width, height, max_side)?;

    let mut pattern = Pattern::empty(name, width, height);
    let (mut x, mut y) = (0usize, 0usize);
    let mut count: Option<usize> = None;

    for ch in text[body..].chars() {
        match ch {
            '0'..='9' => {
                let d = ch as usize - '0' as usize;
                count = Some(count.unwrap_or(0).saturating_mul(10).saturating_add(d));
            }
            'b' | '.' => {
                x = x.saturating_add(count.take().unwrap_or(1));
            }
            'o' => {
                let run = count.take().unwrap_or(1);
                if y < height {
                    for xx in x..x.saturating_add(run).min(width) {
                        pattern.cells[y * width + xx] = true;
                    }
                }
                x = x.saturating_add(run);
            }
            '$' => {
                y = y.saturating_add(count.take().unwrap_or(1));
                x = 0;
            }
            '!' => return Ok(pattern),
            c if c.is_whitespace() => {}
            c => return Err(PatternError::Rle(format!("unexpected {c:?}"))),
        }
    }
    // a missing terminator is tolerated
    Ok(pattern)
}

/// Dark pixels (luma <= 127) are alive. The header is read for the size
/// check before the pixels are decoded.
fn decode_image(name: &str, bytes: &[u8], max_side: usize) -> Decoded {
    let reader = || ImageReader::new(Cursor::new(bytes)).with_guessed_format();
    let (w, h) = reader()?.into_dimensions()?;
    check_extent(w as usize, h as usize, max_side)?;

    let img = reader()?.decode()?.to_luma8();
    let (width, height) = (img.width() as usize, img.height() as usize);
    Ok(Pattern {
        name: name.to_string(),
        width,
        height,
        cells: img.pixels().map(|p| p.0[0] <= 127).collect(),
    })
}

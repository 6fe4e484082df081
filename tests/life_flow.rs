// tests/life_flow.rs
//
// End-to-end: decode a pattern, install it, step it on the pool and render
// the result through the public API only.

use bitlife::{
    render, EditMode, Grid, Palette, Pattern, PatternError, PixelTarget, Session, Stepper, View,
};
use bitlife::tuning::ControlPanel;

const GLIDER_RLE: &str = "#N Glider\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

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
fn glider_travels_and_renders_one_to_one() {
    let pattern = Pattern::decode("glider", GLIDER_RLE.as_bytes(), 1024).unwrap();
    let mut grid = Grid::new(64, 64, 1024).unwrap();
    pattern.apply(&mut grid).unwrap();
    assert_eq!(grid.dimensions(), (32, 32));

    let stepper = Stepper::new(2).unwrap();
    stepper.run_steps(&mut grid, 4);
    assert_eq!(grid.generation(), 4);
    assert_eq!(
        alive_cells(&grid),
        vec![(2, 1), (3, 2), (1, 3), (2, 3), (3, 3)]
    );

    let mut pixels = vec![0u8; 32 * 32 * 4];
    let mut target = PixelTarget {
        pixels: &mut pixels,
        width: 32,
        height: 32,
        bytes_per_row: 32 * 4,
    };
    let palette = Palette::DARK;
    render(&grid, &View::default(), &palette, &mut target);

    let at = |x: usize, y: usize| {
        let o = (y * 32 + x) * 4;
        [pixels[o], pixels[o + 1], pixels[o + 2], pixels[o + 3]]
    };
    assert_eq!(at(2, 1), palette.alive);
    assert_eq!(at(3, 3), palette.alive);
    assert_eq!(at(0, 0), palette.dead);
    assert_eq!(at(2, 2), palette.dead);
}

#[test]
fn painted_block_survives_stepping() {
    let mut grid = Grid::new(32, 32, 1024).unwrap();
    let mut session = Session::new(ControlPanel::default());
    let window = (32, 32);
    session.recenter(window, &grid);

    session.edit = Some(EditMode::Paint);
    session.stroke(&mut grid, (10.5, 10.5), (11.5, 10.5), window);
    session.stroke(&mut grid, (10.5, 11.5), (11.5, 11.5), window);
    session.edit = None;
    assert_eq!(grid.population(), 4);

    let stepper = Stepper::new(1).unwrap();
    stepper.run_steps(&mut grid, 10);
    assert_eq!(alive_cells(&grid), vec![(10, 10), (11, 10), (10, 11), (11, 11)]);
}

#[test]
fn oversized_pattern_leaves_grid_untouched() {
    let mut grid = Grid::new(32, 32, 64).unwrap();
    grid.write_cell(5, 5, true);

    let big = Pattern::empty("big", 100, 10);
    assert!(big.apply(&mut grid).is_err());
    assert_eq!(grid.dimensions(), (32, 32));
    assert!(grid.read_cell(5, 5));
}

#[test]
fn rejected_files_leave_the_grid_untouched() {
    let mut grid = Grid::new(32, 32, 64).unwrap();
    grid.write_cell(5, 5, true);
    grid.write_cell(6, 5, true);

    let inputs: [&[u8]; 3] = [
        b"x = 4294967296, y = 4294967296\no!",
        b"x = 100, y = 10\no!",
        b"#Life 1.06\n-9223372036854775808 0\n9223372036854775807 0\n",
    ];
    for bytes in inputs {
        let err = Pattern::decode("big", bytes, grid.max_side()).unwrap_err();
        assert!(matches!(err, PatternError::TooLarge { .. }), "{err}");
    }

    let img = image::GrayImage::from_pixel(65, 3, image::Luma([0u8]));
    let mut png = std::io::Cursor::new(Vec::new());
    img.write_to(&mut png, image::ImageFormat::Png).unwrap();
    let err = Pattern::decode("wide", png.get_ref(), grid.max_side()).unwrap_err();
    assert!(matches!(err, PatternError::TooLarge { width: 65, .. }));

    assert_eq!(grid.dimensions(), (32, 32));
    assert_eq!(alive_cells(&grid), vec![(5, 5), (6, 5)]);
}

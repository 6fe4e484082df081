// src/kernel.rs
//
// Bit-parallel Life update. One call of `next_word` produces all 32 lanes of
// an output column word from the 3x3 block of column words around it.
// Horizontal neighbours live in adjacent words at the same lane; vertical
// neighbours are the adjacent lanes of the same word, carried across the
// word-row boundary.

/// Column words surrounding an output word. `n*` is the word row above
/// (smaller y), `s*` the word row below. Missing neighbours are zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Neighborhood {
    pub nw: u32,
    pub n: u32,
    pub ne: u32,
    pub w: u32,
    pub c: u32,
    pub e: u32,
    pub sw: u32,
    pub s: u32,
    pub se: u32,
}

impl Neighborhood {
    /// Gather with clamped addressing: words outside `cols x rows` are dead.
    #[inline]
    pub fn gather(cur: &[u32], cols: usize, rows: usize, x: usize, wy: usize) -> Self {
        let at = |dx: isize, dy: isize| -> u32 {
            let xx = x as isize + dx;
            let yy = wy as isize + dy;
            if xx < 0 || yy < 0 || xx >= cols as isize || yy >= rows as isize {
                0
            } else {
                cur[yy as usize * cols + xx as usize]
            }
        };
        Self {
            nw: at(-1, -1),
            n: at(0, -1),
            ne: at(1, -1),
            w: at(-1, 0),
            c: at(0, 0),
            e: at(1, 0),
            sw: at(-1, 1),
            s: at(0, 1),
            se: at(1, 1),
        }
    }
}

#[inline(always)]
fn full_add(a: u32, b: u32, c: u32) -> (u32, u32) {
    let sum = a ^ b ^ c;
    let carry = (a & b) | (b & c) | (a & c);
    (sum, carry)
}

#[inline(always)]
fn half_add(a: u32, b: u32) -> (u32, u32) {
    (a ^ b, a & b)
}

/// Next generation of the centre word.
///
/// Lane counts are kept as bit planes: `c`, `b`, `a` are bits 0, 1, 2 of the
/// number of live Moore neighbours (mod 8; a count of 8 reads as 0, which is
/// dead under B3/S23 either way).
#[inline(always)]
pub fn next_word(nb: &Neighborhood) -> u32 {
    // Horizontal sums per word row. The middle row needs both the full sum
    // (it is the row above/below for the neighbouring lanes) and the sum of
    // the two side columns only (the centre cell is not its own neighbour).
    let (up_lo, up_hi) = full_add(nb.nw, nb.n, nb.ne);
    let (mid_lo, mid_hi) = full_add(nb.w, nb.c, nb.e);
    let (dn_lo, dn_hi) = full_add(nb.sw, nb.s, nb.se);
    let (side_lo, side_hi) = half_add(nb.w, nb.e);

    // Lane b of `above_*` holds the sum for row b-1; lane 0 borrows lane 31
    // of the word row above. `below_*` is the mirror image.
    let above_lo = (mid_lo << 1) | (up_lo >> 31);
    let above_hi = (mid_hi << 1) | (up_hi >> 31);
    let below_lo = (mid_lo >> 1) | (dn_lo << 31);
    let below_hi = (mid_hi >> 1) | (dn_hi << 31);

    // ones + 2*twos
    let (c, carry) = full_add(above_lo, side_lo, below_lo);
    let (twos, fours) = full_add(above_hi, side_hi, below_hi);
    let (b, fours_carry) = half_add(twos, carry);
    let a = fours ^ fours_carry;

    // count == 3, or count == 2 and alive
    !a & b & (c | nb.c)
}

/// Compute one output word row `wy` of a `cols x rows` word grid.
pub fn step_word_row(cur: &[u32], cols: usize, rows: usize, wy: usize, out: &mut [u32]) {
    debug_assert_eq!(out.len(), cols);
    for (x, word) in out.iter_mut().enumerate() {
        *word = next_word(&Neighborhood::gather(cur, cols, rows, x, wy));
    }
}

/// Scalar B3/S23 rule, one cell at a time.
#[inline]
pub fn next_cell_state(alive: bool, neighbors: u32) -> bool {
    matches!((alive, neighbors), (true, 2) | (_, 3))
}

//! Conway's Game of Life
//!
//! The grid is a fixed `W` x `H` bitmap (no heap) with hard edges: cells
//! beyond the border count as dead, there is no wraparound. Each generation
//! is computed from the current grid into a second buffer, then the two are
//! swapped, so a caller never sees a half-updated grid.
//!
//! Rules, applied to every cell at once:
//! 1. A dead cell with exactly three live neighbors becomes alive.
//! 2. A live cell with two or three live neighbors stays alive.
//! 3. Every other cell is dead in the next generation.
//!
//! Each row is packed into one `u128`, bit `x` holding column `x`, which
//! caps the width at [`MAX_WIDTH`]. A 128x64 grid is 1 KiB.

use core::fmt;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Widest grid a row word can hold
pub const MAX_WIDTH: usize = u128::BITS as usize;

/// Neighbor count at which counting stops
///
/// The rules only distinguish 2, 3 and "anything else", so every count of
/// 4 or more leads to the same outcome. Any change to the rules must
/// re-check this bound.
const NEIGHBOR_SATURATION: u8 = 4;

/// Relative neighbor coordinates along one axis
const OFFSETS: [isize; 3] = [-1, 0, 1];

/// Errors that can occur when building a grid from runtime data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridError {
    /// Row count or a row length does not match the grid dimensions
    DimensionMismatch {
        /// Grid dimensions as (width, height)
        expected: (usize, usize),
        /// Offending dimensions as (row length, row count)
        actual: (usize, usize),
    },
}

/// Fixed-size grid of alive/dead cells, one bit per cell
#[derive(Clone, PartialEq, Eq)]
pub struct Grid<const W: usize, const H: usize> {
    rows: [u128; H],
}

impl<const W: usize, const H: usize> Grid<W, H> {
    /// Grid width in cells
    pub const WIDTH: usize = W;

    /// Grid height in cells
    pub const HEIGHT: usize = H;

    const VALID: () = assert!(
        W > 0 && W <= MAX_WIDTH && H > 0,
        "grid width must be 1..=128 and height positive"
    );

    /// All-dead grid
    pub fn empty() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;
        Self { rows: [0; H] }
    }

    /// Build a grid from rows of 0/1 values (non-zero means alive)
    ///
    /// Fails unless there are exactly `H` rows of exactly `W` values.
    pub fn from_rows(rows: &[&[u8]]) -> Result<Self, GridError> {
        if rows.len() != H {
            let width = rows.first().map_or(0, |row| row.len());
            return Err(GridError::DimensionMismatch {
                expected: (W, H),
                actual: (width, rows.len()),
            });
        }

        let mut grid = Self::empty();
        for (y, row) in rows.iter().enumerate() {
            if row.len() != W {
                return Err(GridError::DimensionMismatch {
                    expected: (W, H),
                    actual: (row.len(), rows.len()),
                });
            }
            for (x, &value) in row.iter().enumerate() {
                grid.set(x, y, value != 0);
            }
        }

        Ok(grid)
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        W
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        H
    }

    /// Cell state, dead outside the grid
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= W {
            return false;
        }
        self.rows.get(y).is_some_and(|row| row & (1u128 << x) != 0)
    }

    /// Set a cell; writes outside the grid are ignored
    pub fn set(&mut self, x: usize, y: usize, alive: bool) {
        if x >= W {
            return;
        }
        if let Some(row) = self.rows.get_mut(y) {
            if alive {
                *row |= 1u128 << x;
            } else {
                *row &= !(1u128 << x);
            }
        }
    }

    /// Packed rows, top to bottom; bit `x` of a row is column `x`
    ///
    /// Bits at and above `W` are always clear.
    pub fn rows(&self) -> &[u128; H] {
        &self.rows
    }

    /// Number of live cells
    pub fn population(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }
}

impl<const W: usize, const H: usize> Default for Grid<W, H> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const W: usize, const H: usize> From<[[u8; W]; H]> for Grid<W, H> {
    fn from(values: [[u8; W]; H]) -> Self {
        let mut grid = Self::empty();
        for (y, row) in values.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                grid.set(x, y, value != 0);
            }
        }
        grid
    }
}

/// Rendered as one line of `0`/`1` per row
impl<const W: usize, const H: usize> fmt::Debug for Grid<W, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..H {
            f.write_str("\n")?;
            for x in 0..W {
                f.write_str(if self.get(x, y) { "1" } else { "0" })?;
            }
        }
        Ok(())
    }
}

/// Game of Life engine
#[derive(Debug, Clone)]
pub struct Life<const W: usize, const H: usize> {
    current: Grid<W, H>,
    next: Grid<W, H>,
    generation: u32,
}

impl<const W: usize, const H: usize> Life<W, H> {
    /// Start from an explicit grid
    pub fn new(grid: Grid<W, H>) -> Self {
        Self {
            current: grid,
            next: Grid::empty(),
            generation: 0,
        }
    }

    /// Start from a random grid
    ///
    /// Every cell is an independent fair coin flip, drawn row by row. The
    /// generator is seeded from `seed` only, so equal seeds give equal grids.
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));
        let mut life = Self::new(Grid::empty());

        for row in life.current.rows.iter_mut() {
            for x in 0..W {
                if rng.next_u32() & 1 == 1 {
                    *row |= 1u128 << x;
                }
            }
        }

        life
    }

    /// Current generation
    pub fn grid(&self) -> &Grid<W, H> {
        &self.current
    }

    /// Number of generations advanced since construction (wrapping)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Advance by one generation
    pub fn advance(&mut self) {
        for y in 0..H {
            let mut row = 0u128;
            for x in 0..W {
                let neighbors = self.living_neighbors(x, y, NEIGHBOR_SATURATION);
                let alive = self.current.get(x, y);

                if neighbors == 3 || (alive && neighbors == 2) {
                    row |= 1u128 << x;
                }
            }
            self.next.rows[y] = row;
        }

        core::mem::swap(&mut self.current, &mut self.next);
        self.generation = self.generation.wrapping_add(1);
    }

    /// Count live neighbors of `(x, y)`, stopping once `limit` is reached
    fn living_neighbors(&self, x: usize, y: usize, limit: u8) -> u8 {
        let mut count = 0;

        for dy in OFFSETS {
            for dx in OFFSETS {
                if dx == 0 && dy == 0 {
                    continue;
                }

                // Off the low edge; the high edge reads as dead in `get`
                let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
                else {
                    continue;
                };

                if self.current.get(nx, ny) {
                    count += 1;
                    if count >= limit {
                        return count;
                    }
                }
            }
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_keeps_grid() {
        let initial = Grid::from([[0, 1, 0], [0, 0, 1], [1, 1, 1]]);
        let life = Life::new(initial.clone());
        assert_eq!(life.grid(), &initial);
        assert_eq!(life.generation(), 0);
    }

    #[test]
    fn test_glider() {
        let mut life = Life::new(Grid::from([
            [0, 1, 0, 0],
            [0, 0, 1, 0],
            [1, 1, 1, 0],
            [0, 0, 0, 0],
        ]));

        life.advance();

        let expected = Grid::from([
            [0, 0, 0, 0],
            [1, 0, 1, 0],
            [0, 1, 1, 0],
            [0, 1, 0, 0],
        ]);
        assert_eq!(life.grid(), &expected);
        assert_eq!(life.generation(), 1);
    }

    #[test]
    fn test_block_is_stable() {
        let block = Grid::from([[1, 1, 0, 0], [1, 1, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let mut life = Life::new(block.clone());

        for _ in 0..10 {
            life.advance();
            assert_eq!(life.grid(), &block);
        }
    }

    #[test]
    fn test_blinker_oscillates() {
        let vertical = Grid::from([
            [0, 0, 0, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let horizontal = Grid::from([
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
            [0, 1, 1, 1, 0],
            [0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0],
        ]);

        let mut life = Life::new(vertical.clone());
        for i in 0..10 {
            life.advance();
            let expected = if i % 2 == 0 { &horizontal } else { &vertical };
            assert_eq!(life.grid(), expected, "generation {}", i + 1);
        }
    }

    #[test]
    fn test_tub_settles() {
        let mut life = Life::new(Grid::from([[1, 0, 1], [0, 1, 0], [1, 0, 1]]));
        let tub = Grid::from([[0, 1, 0], [1, 0, 1], [0, 1, 0]]);

        for _ in 0..11 {
            life.advance();
            assert_eq!(life.grid(), &tub);
        }
    }

    #[test]
    fn test_edges_do_not_wrap() {
        let mut life = Life::new(Grid::from([[1, 0, 0], [1, 0, 0], [1, 0, 0]]));
        life.advance();

        // With wraparound (2, 1) would also be born
        let expected = Grid::from([[0, 0, 0], [1, 1, 0], [0, 0, 0]]);
        assert_eq!(life.grid(), &expected);
    }

    #[test]
    fn test_crowded_cells_die() {
        let mut life = Life::new(Grid::from([[1u8; 3]; 3]));
        life.advance();

        let expected = Grid::from([[1, 0, 1], [0, 0, 0], [1, 0, 1]]);
        assert_eq!(life.grid(), &expected);
    }

    #[test]
    fn test_neighbor_count_saturates() {
        let life = Life::new(Grid::from([[1u8; 3]; 3]));

        assert_eq!(life.living_neighbors(1, 1, NEIGHBOR_SATURATION), 4);
        assert_eq!(life.living_neighbors(1, 1, u8::MAX), 8);
        assert_eq!(life.living_neighbors(0, 0, NEIGHBOR_SATURATION), 3);
        assert_eq!(life.living_neighbors(1, 0, u8::MAX), 5);
    }

    #[test]
    fn test_seed_determinism() {
        let mut a = Life::<32, 16>::from_seed(0xDEAD_BEEF);
        let mut b = Life::<32, 16>::from_seed(0xDEAD_BEEF);
        assert_eq!(a.grid(), b.grid());

        for _ in 0..20 {
            a.advance();
            b.advance();
            assert_eq!(a.grid(), b.grid());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Life::<128, 64>::from_seed(1);
        let b = Life::<128, 64>::from_seed(2);
        assert_ne!(a.grid(), b.grid());
    }

    #[test]
    fn test_seeded_grid_is_roughly_half_alive() {
        let life = Life::<128, 64>::from_seed(0x1106);
        let population = life.grid().population();
        let cells = 128 * 64;
        assert!(population > cells * 2 / 5, "population {}", population);
        assert!(population < cells * 3 / 5, "population {}", population);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::<3, 2>::from_rows(&[&[1, 0, 1], &[0, 1, 0]]).unwrap();
        assert!(grid.get(0, 0));
        assert!(grid.get(1, 1));
        assert!(!grid.get(1, 0));
        assert_eq!(grid.population(), 3);
    }

    #[test]
    fn test_from_rows_rejects_mismatch() {
        let short_row = Grid::<3, 2>::from_rows(&[&[1, 0, 1], &[0, 1]]);
        assert_eq!(
            short_row.unwrap_err(),
            GridError::DimensionMismatch {
                expected: (3, 2),
                actual: (2, 2)
            }
        );

        let extra_row = Grid::<3, 2>::from_rows(&[&[1, 0, 1], &[0, 1, 0], &[0, 0, 0]]);
        assert_eq!(
            extra_row.unwrap_err(),
            GridError::DimensionMismatch {
                expected: (3, 2),
                actual: (3, 3)
            }
        );
    }

    #[test]
    fn test_out_of_range_cells() {
        let mut grid = Grid::<4, 4>::empty();
        grid.set(4, 0, true);
        grid.set(0, 4, true);
        assert_eq!(grid.population(), 0);
        assert!(!grid.get(10, 10));
    }

    #[test]
    fn test_grid_is_bit_packed() {
        assert_eq!(core::mem::size_of::<Grid<128, 64>>(), 1024);
        assert!(core::mem::size_of::<Life<128, 64>>() <= 2 * 1024 + 16);
    }

    #[test]
    fn test_full_width_rows() {
        let mut grid = Grid::<128, 3>::empty();
        grid.set(127, 0, true);
        grid.set(127, 1, true);
        grid.set(127, 2, true);
        assert!(grid.get(127, 1));
        assert!(!grid.get(128, 1));
        assert_eq!(grid.rows()[0], 1u128 << 127);

        // Vertical blinker against the right edge loses its outer column
        let mut life = Life::new(grid);
        life.advance();
        let next = life.grid();
        assert!(next.get(127, 1));
        assert!(next.get(126, 1));
        assert_eq!(next.population(), 2);
    }

    #[test]
    fn test_narrow_grid_keeps_high_bits_clear() {
        let mut life = Life::<4, 4>::from_seed(7);
        for _ in 0..5 {
            assert!(life.grid().rows().iter().all(|row| row >> 4 == 0));
            life.advance();
        }
    }
}

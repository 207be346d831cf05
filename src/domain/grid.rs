//! Grid store (C1): a typed view over two contiguous arrays — the grain
//! field in row-major order and the per-tile stability map in
//! tile-row-major order.
//!
//! The store knows nothing about toppling. It exposes `init`-time
//! validation, bounds-respecting cell access, and release.
//!
//! Cells are `Cell<u32>` rather than plain `u32` behind a `&mut` API:
//! the four-color parallel scheduler (C4) needs several tiles mutated
//! concurrently from different threads, and Rust has no safe way to
//! hand out four disjoint `&mut` sub-rectangles of one `Vec` at once
//! when the rectangles aren't whole rows. `Cell` gives every tile
//! shared-reference write access; `SandpileGrid` then asserts `Sync`
//! itself, with the actual race-freedom guaranteed by the caller
//! (the four-color decomposition in `scheduler`) rather than by the
//! type system — the same trade real lock-free tiled solvers make.

use std::cell::Cell;

use super::error::{SandpileError, SandpileResult};

/// Owns the grain field and its geometry.
pub struct SandpileGrid {
    dim: usize,
    tile_w: usize,
    tile_h: usize,
    tiles_x: usize,
    tiles_y: usize,
    field: Box<[Cell<u32>]>,
    stability: Box<[Cell<u32>]>,
}

// SAFETY: concurrent writers only ever touch disjoint tiles (plus their
// one-cell neighbor halo) within a color class, and color classes are
// separated by a barrier (see `scheduler`'s four-color decomposition).
// No two threads ever hold a reference to the same cell at the same
// time, which is the actual invariant `Sync` is asserting here.
unsafe impl Sync for SandpileGrid {}

impl SandpileGrid {
    /// Allocate a grid and stability map, zero the field, and mark
    /// every tile unstable.
    ///
    /// Preconditions (spec.md §6): `D > 2`, `Tw` and `Th` divide `D`,
    /// `D/Tw >= 2`, `D/Th >= 2`.
    pub fn new(dim: usize, tile_w: usize, tile_h: usize) -> SandpileResult<Self> {
        if dim <= 2 {
            return Err(SandpileError::Config(format!("D must be > 2, got {dim}")));
        }
        if tile_w == 0 || tile_h == 0 || dim % tile_w != 0 || dim % tile_h != 0 {
            return Err(SandpileError::Config(format!(
                "Tw={tile_w} and Th={tile_h} must both evenly divide D={dim}"
            )));
        }
        let tiles_x = dim / tile_w;
        let tiles_y = dim / tile_h;
        if tiles_x < 2 || tiles_y < 2 {
            return Err(SandpileError::Config(format!(
                "D/Tw (={tiles_x}) and D/Th (={tiles_y}) must both be >= 2"
            )));
        }

        let field_len = dim
            .checked_mul(dim)
            .ok_or_else(|| SandpileError::Allocation("D*D overflows usize".to_string()))?;
        let stability_len = tiles_x.checked_mul(tiles_y).ok_or_else(|| {
            SandpileError::Allocation("tile grid size overflows usize".to_string())
        })?;

        let field = (0..field_len).map(|_| Cell::new(0)).collect();
        let stability = (0..stability_len).map(|_| Cell::new(1)).collect();

        Ok(Self {
            dim,
            tile_w,
            tile_h,
            tiles_x,
            tiles_y,
            field,
            stability,
        })
    }

    /// Release all storage. `SandpileGrid` owns plain boxed slices, so
    /// this is equivalent to dropping it — kept as an explicit method
    /// because the external contract names `release()`.
    pub fn release(self) {
        drop(self);
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    pub const fn tile_dims(&self) -> (usize, usize) {
        (self.tile_w, self.tile_h)
    }

    pub const fn tile_counts(&self) -> (usize, usize) {
        (self.tiles_x, self.tiles_y)
    }

    /// The interior rectangle `[1, D-2] x [1, D-2]`, as `(y0, x0, h, w)`.
    pub const fn interior(&self) -> (usize, usize, usize, usize) {
        (1, 1, self.dim - 2, self.dim - 2)
    }

    #[inline]
    const fn index(&self, y: usize, x: usize) -> usize {
        y * self.dim + x
    }

    #[inline]
    const fn tile_index(&self, i: usize, j: usize) -> usize {
        i * self.tiles_x + j
    }

    /// Cell at (y, x). Caller is responsible for `0 <= y, x < D`.
    #[inline]
    pub fn cell(&self, y: usize, x: usize) -> u32 {
        self.field[self.index(y, x)].get()
    }

    #[inline]
    pub fn set_cell(&self, y: usize, x: usize, value: u32) {
        self.field[self.index(y, x)].set(value);
    }

    /// Add `q` grains to (y, x). Halo cells silently absorb — they are
    /// never read by the toppling kernel's write set, only ever
    /// written into, so there is nothing further to do.
    #[inline]
    pub fn add_grains(&self, y: usize, x: usize, q: u32) {
        let idx = self.index(y, x);
        let cell = &self.field[idx];
        cell.set(cell.get() + q);
    }

    #[inline]
    pub fn is_halo(&self, y: usize, x: usize) -> bool {
        y == 0 || x == 0 || y == self.dim - 1 || x == self.dim - 1
    }

    #[inline]
    pub fn stability_flag(&self, i: usize, j: usize) -> u32 {
        self.stability[self.tile_index(i, j)].get()
    }

    #[inline]
    pub fn set_stability_flag(&self, i: usize, j: usize, value: u32) {
        self.stability[self.tile_index(i, j)].set(value);
    }

    /// Mark every tile unstable (the `init`-time state, and available
    /// to a host that wants to force a full re-scan after an external
    /// mutation such as `draw_preset`).
    pub fn mark_all_unstable(&self) {
        for flag in self.stability.iter() {
            flag.set(1);
        }
    }

    /// Sum of all interior cell values. Used by hosts / tests to check
    /// the conservation invariant (P1); halo cells are excluded since
    /// they are the sink, not part of the simulated quantity.
    pub fn total_interior_grains(&self) -> u64 {
        let mut total = 0u64;
        for y in 1..self.dim - 1 {
            for x in 1..self.dim - 1 {
                total += u64::from(self.cell(y, x));
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_dim_too_small() {
        assert!(SandpileGrid::new(2, 1, 1).is_err());
    }

    #[test]
    fn rejects_non_dividing_tile_size() {
        assert!(SandpileGrid::new(10, 3, 2).is_err());
    }

    #[test]
    fn rejects_fewer_than_two_tiles_per_axis() {
        // D/Tw = 1 violates D/Tw >= 2.
        assert!(SandpileGrid::new(8, 8, 4).is_err());
    }

    #[test]
    fn accepts_valid_geometry_and_zeroes_field() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        assert_eq!(grid.dim(), 16);
        assert_eq!(grid.tile_counts(), (4, 4));
        assert_eq!(grid.total_interior_grains(), 0);
    }

    #[test]
    fn all_tiles_start_unstable() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        let (tiles_x, tiles_y) = grid.tile_counts();
        for i in 0..tiles_y {
            for j in 0..tiles_x {
                assert_ne!(grid.stability_flag(i, j), 0);
            }
        }
    }

    #[test]
    fn add_grains_accumulates_into_halo_silently() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        grid.add_grains(0, 5, 3);
        assert_eq!(grid.cell(0, 5), 3);
        assert!(grid.is_halo(0, 5));
    }
}

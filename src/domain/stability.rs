//! Stability map & propagation (C3): the neighbor-activation rule that
//! decides, per tile, whether a sweep is needed at all and if so how
//! much of the tile to visit.
//!
//! Tile geometry also lives here: `tile_region` computes the exact
//! sub-rectangle a tile owns, shrunk by one cell on any side that
//! touches the halo border — mirroring the reference kernel's
//! `x + (x == 0)`, `TILE_W - ((x + TILE_W == DIM) + (x == 0))` index
//! arithmetic.

use super::grid::SandpileGrid;
use super::kernel::Region;

/// What a tile needs this sweep, per the neighbor-activation rule
/// (spec.md §4.3):
///
/// - `Full`  — own flag non-zero, or the tile is on the outer ring of
///             tiles (always visited, to account for halo interactions).
/// - `Border`— own flag zero, but at least one cardinal neighbor tile's
///             flag was non-zero at the end of the previous iteration.
/// - `Skip`  — own flag zero and all four neighbors zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileAction {
    Skip,
    Border,
    Full,
}

/// `true` if tile (i, j) touches the halo border, i.e. it sits on the
/// outer ring of the tile grid.
pub const fn is_edge_tile(i: usize, j: usize, tiles_y: usize, tiles_x: usize) -> bool {
    i == 0 || j == 0 || i + 1 == tiles_y || j + 1 == tiles_x
}

/// Decide what tile (i, j) needs this sweep. `own_flag` and
/// `neighbor_flags` must both be read from the state left at the end
/// of the previous iteration — never a flag another tile already
/// overwrote earlier in the *current* iteration's color-class walk
/// would violate the propagation invariant only if it were read out of
/// order; the scheduler's barrier between color classes is what makes
/// reading "as of now" equivalent to "as of end of previous iteration"
/// for any tile not yet visited this iteration.
///
/// Non-edge tiles always have all four neighbors in bounds: edge tiles
/// take the `Full` branch unconditionally (case (c)), so the `Border`
/// branch below is only ever reached for genuinely interior tiles.
pub fn decide_tile_action(
    i: usize,
    j: usize,
    tiles_y: usize,
    tiles_x: usize,
    own_flag: u32,
    neighbor_flags: [u32; 4],
) -> TileAction {
    if own_flag != 0 || is_edge_tile(i, j, tiles_y, tiles_x) {
        TileAction::Full
    } else if neighbor_flags.iter().any(|&f| f != 0) {
        TileAction::Border
    } else {
        TileAction::Skip
    }
}

/// Read the four cardinal neighbor tiles' stability flags. Only valid
/// to call for a non-edge tile (see `decide_tile_action`'s doc) —
/// edge tiles never need it, since they always take the `Full` branch.
pub fn neighbor_flags(grid: &SandpileGrid, i: usize, j: usize) -> [u32; 4] {
    [
        grid.stability_flag(i - 1, j),
        grid.stability_flag(i + 1, j),
        grid.stability_flag(i, j - 1),
        grid.stability_flag(i, j + 1),
    ]
}

/// The exact sub-rectangle tile (i, j) owns, shrunk by one cell on any
/// side touching the halo border.
pub fn tile_region(grid: &SandpileGrid, i: usize, j: usize) -> Region {
    let (tile_w, tile_h) = grid.tile_dims();
    let (tiles_x, tiles_y) = grid.tile_counts();
    let dim = grid.dim();

    let y0_raw = i * tile_h;
    let x0_raw = j * tile_w;
    let y0 = if i == 0 { 1 } else { y0_raw };
    let x0 = if j == 0 { 1 } else { x0_raw };

    let y1 = if i + 1 == tiles_y { dim - 1 } else { y0_raw + tile_h };
    let x1 = if j + 1 == tiles_x { dim - 1 } else { x0_raw + tile_w };

    Region::new(y0, x0, y1 - y0, x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn own_flag_nonzero_always_full_regardless_of_neighbors() {
        let action = decide_tile_action(2, 2, 6, 6, 1, [0, 0, 0, 0]);
        assert_eq!(action, TileAction::Full);
    }

    #[test]
    fn edge_tile_always_full() {
        let action = decide_tile_action(0, 2, 6, 6, 0, [0, 0, 0, 0]);
        assert_eq!(action, TileAction::Full);
        let action = decide_tile_action(5, 2, 6, 6, 0, [0, 0, 0, 0]);
        assert_eq!(action, TileAction::Full);
    }

    #[test]
    fn interior_tile_with_unstable_neighbor_gets_border() {
        let action = decide_tile_action(2, 2, 6, 6, 0, [1, 0, 0, 0]);
        assert_eq!(action, TileAction::Border);
    }

    #[test]
    fn interior_tile_fully_stable_is_skipped() {
        let action = decide_tile_action(2, 2, 6, 6, 0, [0, 0, 0, 0]);
        assert_eq!(action, TileAction::Skip);
    }

    #[test]
    fn tile_region_shrinks_on_every_halo_facing_side() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        // Corner tile (0, 0): shrinks on both top and left.
        let r = tile_region(&grid, 0, 0);
        assert_eq!(r, Region::new(1, 1, 3, 3));

        // Opposite corner tile (3, 3) of a 4x4 tile grid: shrinks
        // bottom and right.
        let r = tile_region(&grid, 3, 3);
        assert_eq!(r, Region::new(12, 12, 3, 3));

        // Interior tile: no shrink.
        let r = tile_region(&grid, 1, 1);
        assert_eq!(r, Region::new(4, 4, 4, 4));
    }

    #[test]
    fn tile_regions_tile_the_interior_without_gaps_or_overlap() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        let (tiles_x, tiles_y) = grid.tile_counts();
        let mut covered = vec![false; 16 * 16];
        for i in 0..tiles_y {
            for j in 0..tiles_x {
                let r = tile_region(&grid, i, j);
                for y in r.y0..r.y0 + r.h {
                    for x in r.x0..r.x0 + r.w {
                        let idx = y * 16 + x;
                        assert!(!covered[idx], "cell ({y},{x}) covered by more than one tile");
                        covered[idx] = true;
                    }
                }
            }
        }
        let interior_cells: usize = (1..15)
            .flat_map(|y| (1..15).map(move |x| (y, x)))
            .filter(|&(y, x)| covered[y * 16 + x])
            .count();
        assert_eq!(interior_cells, 14 * 14);
    }
}

//! Initial-configuration presets (spec.md §6's Presets table).
//!
//! Presets are an out-of-scope collaborator per the purpose & scope
//! section — the core only needs to accept a name and populate the
//! grid. Kept here, in the teacher's `patterns` slot, because it is
//! the natural home for "things that write an initial pattern into a
//! grid".

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::grid::SandpileGrid;

/// Named initial configuration. `max_grains` is the value the
/// visualization palette should scale its gradient by for this preset
/// — the core itself never reads it, only a host doing `snapshot`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    AllFours,
    DimGrid,
    RandomSparse,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Preset> {
        match name {
            "all_fours" => Some(Preset::AllFours),
            "dim_grid" => Some(Preset::DimGrid),
            "random_sparse" => Some(Preset::RandomSparse),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Preset::AllFours => "all_fours",
            Preset::DimGrid => "dim_grid",
            Preset::RandomSparse => "random_sparse",
        }
    }
}

pub mod presets {
    use super::*;

    /// Every interior cell set to 4. `max_grains` = 8.
    pub fn all_fours(grid: &SandpileGrid) {
        let (y0, x0, h, w) = grid.interior();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                grid.set_cell(y, x, 4);
            }
        }
        grid.mark_all_unstable();
    }

    pub const ALL_FOURS_MAX_GRAINS: u32 = 8;

    /// For i, j in {D/4, 2D/4, 3D/4, ...} with i, j <= D-2, set cell
    /// (i, j) to i*j/4. `max_grains` = D.
    pub fn dim_grid(grid: &SandpileGrid) {
        let dim = grid.dim();
        let step = dim / 4;
        if step == 0 {
            grid.mark_all_unstable();
            return;
        }
        let mut i = step;
        while i <= dim - 2 {
            let mut j = step;
            while j <= dim - 2 {
                grid.set_cell(i, j, (i * j / 4) as u32);
                j += step;
            }
            i += step;
        }
        grid.mark_all_unstable();
    }

    pub fn dim_grid_max_grains(dim: usize) -> u32 {
        dim as u32
    }

    /// Pick D/8 random interior cells; set each to a uniform integer
    /// in [1000, 5000). `max_grains` = 5000.
    ///
    /// `seed` reproduces a run byte-for-byte (scenario 5 needs a fixed
    /// seed); `None` draws from OS entropy, matching `rand`'s
    /// `from_os_rng` the way the teacher's `bit_grid` seeds its own
    /// random fill.
    pub fn random_sparse(grid: &SandpileGrid, seed: Option<u64>) {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };

        let dim = grid.dim();
        let count = dim / 8;
        let (y0, x0, h, w) = grid.interior();
        for _ in 0..count {
            let y = y0 + rng.random_range(0..h);
            let x = x0 + rng.random_range(0..w);
            let value = rng.random_range(1000..5000u32);
            grid.set_cell(y, x, value);
        }
        grid.mark_all_unstable();
    }

    pub const RANDOM_SPARSE_MAX_GRAINS: u32 = 5000;

    /// Populate `grid` from a preset name; unknown names fall back to
    /// `all_fours` (spec.md §6: "Unknown names select a default").
    /// Returns the preset actually applied and its declared
    /// `max_grains` ceiling.
    pub fn draw_preset(grid: &SandpileGrid, name: &str, seed: Option<u64>) -> (Preset, u32) {
        match Preset::from_name(name) {
            Some(Preset::AllFours) | None => {
                all_fours(grid);
                (Preset::AllFours, ALL_FOURS_MAX_GRAINS)
            }
            Some(Preset::DimGrid) => {
                dim_grid(grid);
                (Preset::DimGrid, dim_grid_max_grains(grid.dim()))
            }
            Some(Preset::RandomSparse) => {
                random_sparse(grid, seed);
                (Preset::RandomSparse, RANDOM_SPARSE_MAX_GRAINS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::presets::*;
    use super::*;

    #[test]
    fn all_fours_sets_every_interior_cell_and_nothing_else() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        all_fours(&grid);
        for y in 1..15 {
            for x in 1..15 {
                assert_eq!(grid.cell(y, x), 4);
            }
        }
        assert_eq!(grid.cell(0, 5), 0, "halo must stay untouched by a preset");
    }

    #[test]
    fn dim_grid_uses_quarter_step_positions() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        dim_grid(&grid);
        // step = 4: positions 4, 8, 12 on each axis.
        assert_eq!(grid.cell(4, 4), (4 * 4 / 4) as u32);
        assert_eq!(grid.cell(8, 8), (8 * 8 / 4) as u32);
        assert_eq!(grid.cell(12, 12), (12 * 12 / 4) as u32);
        assert_eq!(grid.cell(4, 8), (4 * 8 / 4) as u32);
        // Untouched cell stays zero.
        assert_eq!(grid.cell(5, 5), 0);
    }

    #[test]
    fn random_sparse_is_reproducible_from_a_fixed_seed() {
        let a = SandpileGrid::new(64, 8, 8).unwrap();
        let b = SandpileGrid::new(64, 8, 8).unwrap();
        random_sparse(&a, Some(42));
        random_sparse(&b, Some(42));
        for y in 0..64 {
            for x in 0..64 {
                assert_eq!(a.cell(y, x), b.cell(y, x), "mismatch at ({y},{x})");
            }
        }
    }

    #[test]
    fn random_sparse_values_land_in_declared_range() {
        let grid = SandpileGrid::new(64, 8, 8).unwrap();
        random_sparse(&grid, Some(7));
        let mut found_nonzero = false;
        for y in 1..63 {
            for x in 1..63 {
                let v = grid.cell(y, x);
                if v != 0 {
                    found_nonzero = true;
                    assert!((1000..5000).contains(&v), "value {v} out of declared range");
                }
            }
        }
        assert!(found_nonzero, "expected at least one seeded cell");
    }

    #[test]
    fn unknown_preset_name_falls_back_to_all_fours() {
        let grid = SandpileGrid::new(16, 4, 4).unwrap();
        let (preset, max_grains) = draw_preset(&grid, "bogus", None);
        assert_eq!(preset, Preset::AllFours);
        assert_eq!(max_grains, ALL_FOURS_MAX_GRAINS);
        assert_eq!(grid.cell(4, 4), 4);
    }
}

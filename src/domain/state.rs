//! The explicit simulation state object (§6 External Interfaces, §9
//! Design Notes: "an implementation should encapsulate [the grid
//! pointer, stability pointer, change counter] in an explicit state
//! object passed to every operation" rather than process-wide globals).

use super::error::SandpileResult;
use super::grid::SandpileGrid;
use super::patterns::{presets, Preset};
use super::policy::Policy;
use super::{convergence, scheduler};

/// Owns the grid and exposes the narrow `init`/`finalize`/`draw_preset`/
/// `compute`/`snapshot` contract as methods. A host (CLI, benchmark
/// harness, or the interactive viewer) talks to the core only through
/// this struct — there is exactly one of these per simulation run.
pub struct SandpileState {
    grid: SandpileGrid,
    max_grains: u32,
    active_preset: Preset,
}

impl SandpileState {
    /// `init(D, Tw, Th)`: allocate grid and stability map, mark every
    /// tile unstable. Defaults to the `all_fours` preset's
    /// `max_grains` ceiling until a preset is drawn.
    pub fn init(dim: usize, tile_w: usize, tile_h: usize) -> SandpileResult<Self> {
        let grid = SandpileGrid::new(dim, tile_w, tile_h)?;
        Ok(Self {
            grid,
            max_grains: presets::ALL_FOURS_MAX_GRAINS,
            active_preset: Preset::AllFours,
        })
    }

    /// `finalize()`: release all storage. Consumes `self` — there is
    /// nothing useful to do with a finalized state.
    pub fn finalize(self) {
        self.grid.release();
    }

    /// `draw_preset(name)`: populate the grid from a named initial
    /// configuration; unknown names fall back to `all_fours`.
    pub fn draw_preset(&mut self, name: &str, seed: Option<u64>) {
        let (preset, max_grains) = presets::draw_preset(&self.grid, name, seed);
        self.active_preset = preset;
        self.max_grains = max_grains;
    }

    /// `compute(policy, N)` -> iter: run up to `N` iterations under
    /// `policy`; return the iteration at which stabilization occurred,
    /// or 0 if still unstable after `N`.
    pub fn compute(&self, policy: Policy, max_iterations: u64) -> u64 {
        convergence::compute(&self.grid, policy, max_iterations)
    }

    /// Like `compute`, but also reports the total tile-sweep count —
    /// used by hosts instrumenting policy comparisons (spec.md §8
    /// scenario 4).
    pub fn compute_with_sweep_count(&self, policy: Policy, max_iterations: u64) -> (u64, u64) {
        convergence::compute_with_sweep_count(&self.grid, policy, max_iterations)
    }

    /// Run a single scheduler iteration without looping to
    /// convergence — exposed for hosts that want frame-by-frame
    /// stepping (the interactive viewer) rather than `compute`'s
    /// all-at-once cap.
    pub fn step(&self, policy: Policy) -> bool {
        scheduler::run_iteration(&self.grid, policy).changed != 0
    }

    /// `snapshot(out_img, palette)`'s core half: the grid is always
    /// quiescent between calls (no operation here suspends or leaves
    /// the grid mid-sweep), so a host may read `grid()` directly for
    /// its own `out_img`/`palette` pass. `max_grains` is returned
    /// alongside for the palette's gradient scale, and updated by the
    /// caller via `set_max_grains` if it observes a larger value
    /// during the snapshot walk.
    pub fn grid(&self) -> &SandpileGrid {
        &self.grid
    }

    pub const fn max_grains(&self) -> u32 {
        self.max_grains
    }

    /// `max_grains` is updated as a side effect of each snapshot to
    /// the maximum grain count observed (spec.md §6, Palette).
    pub fn set_max_grains(&mut self, value: u32) {
        if value > self.max_grains {
            self.max_grains = value;
        }
    }

    pub const fn active_preset(&self) -> Preset {
        self.active_preset
    }

    pub fn total_interior_grains(&self) -> u64 {
        self.grid.total_interior_grains()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_then_compute_reaches_convergence() {
        let mut state = SandpileState::init(16, 4, 4).unwrap();
        state.draw_preset("all_fours", None);
        let iter = state.compute(Policy::TiledStable, 1000);
        assert!(iter > 0);
    }

    #[test]
    fn unknown_preset_falls_back_and_reports_all_fours() {
        let mut state = SandpileState::init(16, 4, 4).unwrap();
        state.draw_preset("nonexistent", None);
        assert_eq!(state.active_preset(), Preset::AllFours);
        assert_eq!(state.max_grains(), presets::ALL_FOURS_MAX_GRAINS);
    }

    #[test]
    fn set_max_grains_only_grows() {
        let mut state = SandpileState::init(16, 4, 4).unwrap();
        state.set_max_grains(3);
        assert_eq!(state.max_grains(), presets::ALL_FOURS_MAX_GRAINS);
        state.set_max_grains(1000);
        assert_eq!(state.max_grains(), 1000);
    }

    #[test]
    fn init_rejects_invalid_geometry() {
        assert!(SandpileState::init(2, 1, 1).is_err());
    }
}

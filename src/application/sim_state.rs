use crate::domain::{Policy, SandpileResult, SandpileState};

/// Orchestrates one simulation run for the interactive viewer: wraps
/// the core `SandpileState` with the UI-facing bookkeeping a host
/// needs (run/pause, frame pacing, generation counter, timing) that
/// the core itself deliberately has no opinion about.
pub struct SimState {
    pub state: SandpileState,
    pub policy: Policy,
    pub dim: usize,
    pub tile_w: usize,
    pub tile_h: usize,
    pub is_running: bool,
    pub generation: u64,
    pub update_timer: f32,
    pub updates_per_second: f32,
    pub last_step_time_ms: f32,
    pub last_render_time_ms: f32,
    pub seed: Option<u64>,
}

impl SimState {
    /// Create a new run at the given geometry, seeded with `all_fours`.
    pub fn new(dim: usize, tile_w: usize, tile_h: usize) -> SandpileResult<Self> {
        let mut state = SandpileState::init(dim, tile_w, tile_h)?;
        state.draw_preset("all_fours", None);
        Ok(Self {
            state,
            policy: Policy::default(),
            dim,
            tile_w,
            tile_h,
            is_running: false,
            generation: 0,
            update_timer: 0.0,
            updates_per_second: 10.0,
            last_step_time_ms: 0.0,
            last_render_time_ms: 0.0,
            seed: None,
        })
    }

    /// Tear down and reallocate at a new geometry.
    pub fn resize(self, dim: usize, tile_w: usize, tile_h: usize) -> SandpileResult<Self> {
        self.state.finalize();
        Self::new(dim, tile_w, tile_h)
    }

    pub fn set_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Draw a named preset, resetting the generation counter.
    pub fn draw_preset(mut self, name: &str) -> Self {
        self.state.draw_preset(name, self.seed);
        self.generation = 0;
        self.is_running = false;
        self
    }

    pub fn toggle_running(mut self) -> Self {
        self.is_running = !self.is_running;
        self
    }

    /// Zero every interior cell. Grid storage is `Cell`-backed, so
    /// this needs no `&mut` borrow of the grid itself.
    pub fn clear(self) -> Self {
        let grid = self.state.grid();
        let (y0, x0, h, w) = grid.interior();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                grid.set_cell(y, x, 0);
            }
        }
        grid.mark_all_unstable();
        let mut s = self;
        s.generation = 0;
        s.is_running = false;
        s
    }

    pub fn randomize(mut self) -> Self {
        self.state.draw_preset("random_sparse", self.seed);
        self.generation = 0;
        self.is_running = false;
        self
    }

    pub fn adjust_speed(mut self, delta: f32) -> Self {
        self.updates_per_second = (self.updates_per_second + delta).clamp(1.0, 60.0);
        self
    }

    /// Paint `value` grains directly at (y, x), then re-arm every
    /// tile so the next step re-examines the whole grid. Used by the
    /// mouse-paint input handler.
    pub fn paint(&self, y: usize, x: usize, value: u32) {
        let grid = self.state.grid();
        if grid.is_halo(y, x) {
            return;
        }
        grid.set_cell(y, x, value);
        grid.mark_all_unstable();
    }

    /// Advance the simulation by exactly one scheduler iteration,
    /// timed the way the teacher's game loop times evolution.
    pub fn step(&mut self) {
        let start = std::time::Instant::now();
        self.state.step(self.policy);
        self.last_step_time_ms = start.elapsed().as_secs_f32() * 1000.0;
        self.generation += 1;
    }

    /// Update simulation by one frame, pacing steps against
    /// `updates_per_second` the way the teacher's `tick` paces
    /// generations.
    pub fn tick(mut self, delta_time: f32) -> Self {
        if !self.is_running {
            return self;
        }

        self.update_timer += delta_time;
        let update_interval = 1.0 / self.updates_per_second;

        if self.update_timer >= update_interval {
            self.step();
            self.update_timer = 0.0;
        }

        self
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    pub fn grid(&self) -> &crate::domain::SandpileGrid {
        self.state.grid()
    }

    pub fn max_grains(&self) -> u32 {
        self.state.max_grains()
    }

    pub fn set_max_grains(&mut self, value: u32) {
        self.state.set_max_grains(value);
    }
}

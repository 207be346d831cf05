//! Policy comparison benchmark: timing and sweep counts for each
//! scheduler policy across a range of grid sizes, run to convergence
//! from the `all_fours` preset.

use std::time::Instant;

use sandpile::domain::{presets, Policy, SandpileGrid};

fn run_one(dim: usize, tile: usize, policy: Policy) -> (f64, u64, u64) {
    let grid = SandpileGrid::new(dim, tile, tile).expect("benchmark geometry is always valid");
    presets::all_fours(&grid);

    let start = Instant::now();
    let (iter, sweeps) = sandpile::domain::compute_with_sweep_count(&grid, policy, 100_000);
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    assert_ne!(iter, 0, "all_fours must converge within the benchmark's iteration cap");
    (elapsed_ms, iter, sweeps)
}

fn main() {
    println!("=== Sandpile Policy Benchmark ===\n");

    let sizes = [32usize, 64, 128, 256, 512];
    let tile = 16;

    println!(
        "{:>8} {:>22} {:>10} {:>12} {:>10}",
        "Size", "Policy", "Time(ms)", "Iterations", "Sweeps"
    );
    println!("{:-<66}", "");

    for dim in sizes {
        for policy in Policy::all() {
            // SEQ has no tiling concept; skip it for sizes large
            // enough that a whole-grid sweep per iteration would
            // dominate the table.
            if policy == Policy::Seq && dim > 128 {
                continue;
            }
            let (ms, iter, sweeps) = run_one(dim, tile, policy);
            println!("{:>8} {:>22} {:>10.2} {:>12} {:>10}", format!("{dim}x{dim}"), policy.name(), ms, iter, sweeps);
        }
        println!();
    }

    println!("=== Stability Pruning Benefit (D=256) ===\n");
    let (_, _, tiled_sweeps) = run_one(256, tile, Policy::Tiled);
    let (_, _, stable_sweeps) = run_one(256, tile, Policy::TiledStable);
    println!("tiled:        {tiled_sweeps} tile sweeps");
    println!("tiled_stable: {stable_sweeps} tile sweeps");
    println!(
        "reduction:    {:.1}%",
        100.0 * (1.0 - stable_sweeps as f64 / tiled_sweeps as f64)
    );
}

use clap::Parser;
use macroquad::prelude::*;

use sandpile::application::{Camera, SimState};
use sandpile::domain::{Policy, SandpileState};
use sandpile::ui::{self, Dropdown};
use sandpile::{input, rendering};

/// Abelian sandpile tiled stability-tracking simulation engine.
#[derive(Parser, Debug)]
#[command(name = "sandpile", about = "Abelian sandpile tiled simulation engine")]
struct Cli {
    #[arg(long, default_value_t = 256)]
    dim: usize,

    #[arg(long = "tile-width", default_value_t = 16)]
    tile_width: usize,

    #[arg(long = "tile-height", default_value_t = 16)]
    tile_height: usize,

    #[arg(long, default_value = "tiled_double_stable_parallel")]
    policy: String,

    #[arg(long, default_value_t = 10_000)]
    iterations: u64,

    #[arg(long, default_value = "all_fours")]
    preset: String,

    #[arg(long)]
    seed: Option<u64>,

    /// Run to convergence (or the iteration cap) and print the
    /// result instead of opening the interactive viewer.
    #[arg(long)]
    headless: bool,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Sandpile - Tiled Stability-Tracking Simulation".to_owned(),
        window_width: 1000,
        window_height: 800,
        window_resizable: true,
        ..Default::default()
    }
}

fn resolve_policy(name: &str) -> Policy {
    Policy::from_name(name).unwrap_or_else(|| {
        eprintln!("unknown policy '{name}', falling back to {}", Policy::default().name());
        Policy::default()
    })
}

fn run_headless(cli: &Cli) {
    let policy = resolve_policy(&cli.policy);

    let mut state = match SandpileState::init(cli.dim, cli.tile_width, cli.tile_height) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("initialization failed: {err}");
            std::process::exit(1);
        }
    };
    state.draw_preset(&cli.preset, cli.seed);

    let iter = state.compute(policy, cli.iterations);
    let grains = state.total_interior_grains();
    if iter == 0 {
        println!("did not converge within {} iterations; interior grain sum = {grains}", cli.iterations);
    } else {
        println!("converged at iteration {iter}; interior grain sum = {grains}");
    }
    state.finalize();
}

async fn run_interactive(cli: Cli) {
    let mut sim = match SimState::new(cli.dim, cli.tile_width, cli.tile_height) {
        Ok(s) => s,
        Err(err) => {
            eprintln!("initialization failed: {err}");
            std::process::exit(1);
        }
    };
    sim.seed = cli.seed;
    sim = sim.draw_preset(&cli.preset);
    sim = sim.set_policy(resolve_policy(&cli.policy));

    let mut camera = Camera::new();

    let px = ui::panel_x();
    let size_items: Vec<String> = ui::GRID_SIZES.iter().map(|(_, name)| name.to_string()).collect();
    let mut size_dropdown = Dropdown::new(px, 20.0, ui::PANEL_WIDTH, "Grid Size", size_items);
    if let Some(idx) = ui::GRID_SIZES.iter().position(|&(d, _)| d == sim.dim()) {
        size_dropdown.set_selected(idx);
    }

    let policy_items: Vec<String> = ui::POLICIES.iter().map(|s| s.to_string()).collect();
    let mut policy_dropdown = Dropdown::new(px, 70.0, ui::PANEL_WIDTH, "Policy", policy_items);
    if let Some(idx) = ui::POLICIES.iter().position(|&name| name == sim.policy.name()) {
        policy_dropdown.set_selected(idx);
    }

    let preset_items: Vec<String> = ui::PRESETS.iter().map(|s| s.to_string()).collect();
    let mut preset_dropdown = Dropdown::new(px, 120.0, ui::PANEL_WIDTH, "Preset", preset_items);

    loop {
        let mouse_pos = mouse_position();

        let px = ui::panel_x();
        size_dropdown.set_position(px, 20.0);
        policy_dropdown.set_position(px, 70.0);
        preset_dropdown.set_position(px, 120.0);

        let buttons = ui::create_buttons();

        if size_dropdown.update(mouse_pos) {
            let (dim, _) = ui::GRID_SIZES[size_dropdown.selected()];
            let tile = if dim % sim.tile_w == 0 && dim / sim.tile_w >= 2 { sim.tile_w } else { 4 };
            sim = sim.resize(dim, tile, tile).expect("dropdown-offered size is always valid");
            camera.reset();
        }
        if size_dropdown.is_open() {
            policy_dropdown.close();
            preset_dropdown.close();
        }

        if policy_dropdown.update(mouse_pos) {
            let name = ui::POLICIES[policy_dropdown.selected()];
            sim = sim.set_policy(resolve_policy(name));
        }
        if policy_dropdown.is_open() {
            size_dropdown.close();
            preset_dropdown.close();
        }

        if preset_dropdown.update(mouse_pos) {
            let name = ui::PRESETS[preset_dropdown.selected()];
            sim = sim.draw_preset(name);
        }
        if preset_dropdown.is_open() {
            size_dropdown.close();
            policy_dropdown.close();
        }

        sim = input::process_button_clicks(sim, &buttons, mouse_pos);
        input::handle_zoom(&mut camera);
        input::handle_pan(&mut camera, mouse_pos);
        input::handle_mouse_paint(&sim, &camera, mouse_pos);
        sim = input::process_keyboard_input(sim, &mut camera);

        sim = sim.tick(get_frame_time());

        let render_start = std::time::Instant::now();
        clear_background(BLACK);
        let mut max_grains = sim.max_grains();
        rendering::draw_grid(sim.grid(), &camera, &mut max_grains);
        sim.set_max_grains(max_grains);

        let dropdowns: &[Dropdown] = &[size_dropdown.clone(), policy_dropdown.clone(), preset_dropdown.clone()];
        rendering::draw_controls(&sim, &camera, &buttons, dropdowns, mouse_pos);
        sim.last_render_time_ms = render_start.elapsed().as_secs_f32() * 1000.0;

        next_frame().await;
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.headless {
        run_headless(&cli);
        return;
    }

    macroquad::Window::from_config(window_conf(), run_interactive(cli));
}

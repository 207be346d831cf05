use macroquad::prelude::*;

use crate::application::{Camera, SimState};
use crate::domain::SandpileGrid;
use crate::ui::{grid_area_height, grid_area_width, panel_x, Button, Dropdown, CELL_SIZE, PANEL_WIDTH};

/// Format large numbers with K/M/B suffixes.
fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.1}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        format!("{n}")
    }
}

/// Palette contract (spec.md §6): 0 -> black, 1 -> green, 2 -> blue,
/// 3 -> red, 4 -> white, >4 -> a gradient from magenta toward black
/// scaled by `max_grains`.
pub fn palette_color(value: u32, max_grains: u32) -> Color {
    match value {
        0 => BLACK,
        1 => Color::from_rgba(0, 200, 80, 255),
        2 => Color::from_rgba(60, 120, 255, 255),
        3 => Color::from_rgba(220, 40, 40, 255),
        4 => WHITE,
        _ => {
            let ceiling = max_grains.max(5) as f32;
            let t = (1.0 - value as f32 / ceiling).clamp(0.0, 1.0);
            Color::from_rgba((220.0 * t) as u8, 0, (220.0 * t) as u8, 255)
        }
    }
}

/// Draw the grid with camera-aware viewport culling, updating
/// `max_grains` as a side effect of the walk (spec.md §6, Palette).
pub fn draw_grid(grid: &SandpileGrid, camera: &Camera, max_grains: &mut u32) {
    let dim = grid.dim();
    let cell_size = CELL_SIZE * camera.zoom;
    let area_width = grid_area_width();
    let area_height = grid_area_height();

    let (min_x, min_y, max_x, max_y) = camera.visible_bounds(area_width, area_height, CELL_SIZE);

    let start_x = min_x.max(0) as usize;
    let start_y = min_y.max(0) as usize;
    let end_x = (max_x + 1).clamp(0, dim as i32) as usize;
    let end_y = (max_y + 1).clamp(0, dim as i32) as usize;

    let grid_line_color = Color::from_rgba(40, 40, 40, 255);
    let draw_grid_lines = camera.zoom > 0.5 && cell_size >= 4.0;

    let mut observed_max = *max_grains;

    for y in start_y..end_y {
        for x in start_x..end_x {
            let value = grid.cell(y, x);
            observed_max = observed_max.max(value);

            let (screen_x, screen_y) = camera.grid_to_screen(x, y, CELL_SIZE);
            if screen_x + cell_size < 0.0
                || screen_x > area_width
                || screen_y + cell_size < 0.0
                || screen_y > area_height
            {
                continue;
            }

            draw_rectangle(screen_x, screen_y, cell_size, cell_size, palette_color(value, *max_grains));

            if draw_grid_lines {
                draw_rectangle_lines(screen_x, screen_y, cell_size, cell_size, 1.0, grid_line_color);
            }
        }
    }

    *max_grains = observed_max;
}

fn draw_panel_background() {
    draw_rectangle(panel_x(), 0.0, PANEL_WIDTH, screen_height(), Color::from_rgba(30, 30, 30, 255));
}

fn draw_text_label(text: &str, x: f32, y: f32, size: f32, color: Color) {
    draw_text(text, x, y, size, color);
}

/// Draw the control panel with buttons, dropdowns, and run info.
pub fn draw_controls(
    sim: &SimState,
    camera: &Camera,
    buttons: &[Button],
    dropdowns: &[Dropdown],
    mouse_pos: (f32, f32),
) {
    draw_panel_background();

    buttons.iter().for_each(|btn| btn.draw(mouse_pos));

    let px = panel_x();

    let controls = [
        ("Controls:", px, 240.0, 14.0, WHITE),
        ("LMB: Add grains", px, 255.0, 12.0, GRAY),
        ("RMB: Clear cell", px, 268.0, 12.0, GRAY),
        ("Space: Run/Pause", px, 281.0, 12.0, GRAY),
        ("Wheel: Zoom", px, 294.0, 12.0, GRAY),
        ("Mid-drag: Pan", px, 307.0, 12.0, GRAY),
    ];
    controls.iter().for_each(|(text, x, y, size, color)| draw_text_label(text, *x, *y, *size, *color));

    let dim = sim.dim();
    let interior_cells = (dim - 2) * (dim - 2);
    let grid_info = format!("Grid: {dim}x{dim}\nInterior cells: {}", format_number(interior_cells as u64));
    draw_text_label(&grid_info, px, 335.0, 12.0, Color::from_rgba(150, 150, 150, 255));

    let step_ms = sim.last_step_time_ms;
    let fps = get_fps();

    let perf_color = if step_ms < 5.0 {
        Color::from_rgba(0, 255, 0, 255)
    } else if step_ms < 33.0 {
        Color::from_rgba(255, 255, 0, 255)
    } else if step_ms < 100.0 {
        Color::from_rgba(255, 165, 0, 255)
    } else {
        Color::from_rgba(255, 0, 0, 255)
    };

    let render_ms = sim.last_render_time_ms;
    let render_color = if render_ms < 5.0 {
        Color::from_rgba(0, 255, 0, 255)
    } else if render_ms < 16.0 {
        Color::from_rgba(255, 255, 0, 255)
    } else {
        Color::from_rgba(255, 165, 0, 255)
    };

    draw_text_label(&format!("Step: {step_ms:.1}ms"), px, 370.0, 13.0, perf_color);
    draw_text_label(&format!("Render: {render_ms:.1}ms", ), px, 385.0, 13.0, render_color);
    draw_text_label(&format!("{} | FPS: {fps:.0}", sim.policy.name()), px, 400.0, 12.0, GRAY);

    let grains = sim.state.total_interior_grains();
    draw_text_label(&format!("Grains: {}", format_number(grains)), px, 415.0, 12.0, Color::from_rgba(100, 200, 255, 255));

    let labels = [
        ("Speed:".to_string(), px, 630.0, 16.0, WHITE),
        (format!("{:.0} steps/s", sim.updates_per_second), px, 650.0, 14.0, Color::from_rgba(180, 180, 180, 255)),
        ("Iteration:".to_string(), px, 680.0, 16.0, WHITE),
        (format!("{}", sim.generation), px, 700.0, 20.0, Color::from_rgba(0, 255, 150, 255)),
        ("Status:".to_string(), px, 735.0, 16.0, WHITE),
        (
            (if sim.is_running { "Running" } else { "Paused" }).to_string(),
            px,
            755.0,
            16.0,
            if sim.is_running { Color::from_rgba(0, 255, 0, 255) } else { Color::from_rgba(255, 165, 0, 255) },
        ),
        ("Zoom:".to_string(), px, 780.0, 14.0, WHITE),
        (format!("{:.1}x", camera.zoom), px, 795.0, 14.0, Color::from_rgba(180, 180, 180, 255)),
    ];
    labels.iter().for_each(|(text, x, y, size, color)| draw_text_label(text, *x, *y, *size, *color));

    let mut open_dropdown: Option<&Dropdown> = None;
    for dropdown in dropdowns.iter() {
        if dropdown.is_open() {
            open_dropdown = Some(dropdown);
        } else {
            dropdown.draw(mouse_pos);
        }
    }
    if let Some(dd) = open_dropdown {
        dd.draw(mouse_pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_the_fixed_low_values() {
        assert_eq!(palette_color(0, 8), BLACK);
        assert_eq!(palette_color(4, 8), WHITE);
    }

    #[test]
    fn palette_gradient_darkens_toward_max_grains() {
        let near_max = palette_color(100, 100);
        let far_from_max = palette_color(6, 100);
        assert!(near_max.r <= far_from_max.r, "color should darken as value approaches max_grains");
    }
}

mod button;
mod dropdown;

pub use button::Button;
pub use dropdown::Dropdown;

use macroquad::prelude::{screen_height, screen_width};

pub const PANEL_WIDTH: f32 = 180.0;
pub const BUTTON_HEIGHT: f32 = 40.0;
pub const CELL_SIZE: f32 = 10.0;

pub fn panel_x() -> f32 {
    screen_width() - PANEL_WIDTH
}

pub fn grid_area_width() -> f32 {
    screen_width() - PANEL_WIDTH
}

pub fn grid_area_height() -> f32 {
    screen_height()
}

/// Grid dimensions offered in the size dropdown. All are multiples of
/// 16 so the default 4x4 tile size always divides evenly with at
/// least two tiles per axis.
pub const GRID_SIZES: &[(usize, &str)] = &[
    (16, "16x16"),
    (32, "32x32"),
    (64, "64x64"),
    (128, "128x128"),
    (256, "256x256"),
    (512, "512x512"),
];

/// Policy names for the dropdown — matches `Policy::all()` order.
pub const POLICIES: &[&str] = &[
    "seq",
    "tiled",
    "tiled_parallel",
    "tiled_double",
    "tiled_double_parallel",
    "tiled_stable",
    "tiled_stable_parallel",
    "tiled_double_stable",
    "tiled_double_stable_parallel",
];

/// Preset names for the dropdown.
pub const PRESETS: &[&str] = &["all_fours", "dim_grid", "random_sparse"];

pub fn create_buttons() -> Vec<Button> {
    let px = panel_x();
    vec![
        Button::new(px, 470.0, PANEL_WIDTH, BUTTON_HEIGHT, "Run/Pause"),
        Button::new(px, 520.0, PANEL_WIDTH, BUTTON_HEIGHT, "Clear"),
        Button::new(px, 570.0, PANEL_WIDTH, BUTTON_HEIGHT, "Step"),
    ]
}

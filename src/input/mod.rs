use macroquad::prelude::*;

use crate::application::{Camera, SimState};
use crate::ui::{grid_area_width, CELL_SIZE};

/// Handle zoom with mouse wheel.
pub fn handle_zoom(camera: &mut Camera) {
    let wheel = mouse_wheel().1;
    if wheel > 0.0 {
        camera.zoom_in(1.1);
    } else if wheel < 0.0 {
        camera.zoom_out(1.1);
    }
}

/// Handle pan with middle mouse button drag.
pub fn handle_pan(camera: &mut Camera, mouse_pos: (f32, f32)) {
    static mut LAST_POS: Option<(f32, f32)> = None;

    unsafe {
        if is_mouse_button_down(MouseButton::Middle) {
            if let Some(last) = LAST_POS {
                let dx = mouse_pos.0 - last.0;
                let dy = mouse_pos.1 - last.1;
                camera.pan(dx, dy);
            }
            LAST_POS = Some(mouse_pos);
        } else {
            LAST_POS = None;
        }
    }
}

/// Left click adds 4 grains (enough to topple) at the cell under the
/// cursor; right click zeroes it. Disabled while running, matching
/// the teacher's "pause to edit" convention.
pub fn handle_mouse_paint(sim: &SimState, camera: &Camera, mouse_pos: (f32, f32)) {
    if sim.is_running || mouse_pos.0 >= grid_area_width() {
        return;
    }

    let (grid_x, grid_y) = camera.screen_to_grid(mouse_pos.0, mouse_pos.1, CELL_SIZE);
    let dim = sim.dim() as i32;
    if grid_x < 0 || grid_y < 0 || grid_x >= dim || grid_y >= dim {
        return;
    }
    let (x, y) = (grid_x as usize, grid_y as usize);

    if is_mouse_button_down(MouseButton::Left) {
        let current = sim.grid().cell(y, x);
        sim.paint(y, x, current + 4);
    } else if is_mouse_button_down(MouseButton::Right) {
        sim.paint(y, x, 0);
    }
}

/// Process keyboard input functionally, the way the teacher folds a
/// fixed action table over consuming `SimState` methods.
pub fn process_keyboard_input(sim: SimState, camera: &mut Camera) -> SimState {
    type KeyAction = (KeyCode, fn(SimState) -> SimState);

    let actions: [KeyAction; 4] = [
        (KeyCode::Space, SimState::toggle_running),
        (KeyCode::C, SimState::clear),
        (KeyCode::R, SimState::randomize),
        (KeyCode::Up, |s| s.adjust_speed(1.0)),
    ];

    let mut new_state = actions.iter().fold(sim, |s, (key, action)| {
        if is_key_pressed(*key) {
            action(s)
        } else {
            s
        }
    });

    if is_key_pressed(KeyCode::Down) {
        new_state = new_state.adjust_speed(-1.0);
    }

    if is_key_pressed(KeyCode::H) {
        camera.reset();
    }

    new_state
}

/// Process button clicks functionally.
pub fn process_button_clicks(sim: SimState, buttons: &[crate::ui::Button], mouse_pos: (f32, f32)) -> SimState {
    buttons.iter().enumerate().fold(sim, |s, (idx, btn)| {
        if !btn.is_clicked(mouse_pos) {
            return s;
        }
        match idx {
            0 => s.toggle_running(),
            1 => s.clear(),
            2 => {
                let mut s = s;
                s.step();
                s
            }
            _ => s,
        }
    })
}

// Domain layer - the simulation core
pub mod domain;

// Application layer - orchestration for the interactive viewer
pub mod application;

// Infrastructure layer - UI, rendering, input
pub mod ui;
pub mod rendering;
pub mod input;

pub use application::{Camera, SimState};
pub use domain::{Policy, SandpileError, SandpileGrid, SandpileResult, SandpileState};

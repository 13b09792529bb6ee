//! The interactive viewer: application state, control binding and egui drawing.

pub mod controls;
pub mod state;
pub mod ui;

pub use controls::{ControlEvent, ControlsBinder};
pub use state::{App, AppWrapper, LoadStatus};

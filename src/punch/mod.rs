pub mod commands;
pub mod controller;
pub mod state;

pub use controller::{PunchController, PunchSnapshot};
pub use state::{PunchPhase, PunchState};

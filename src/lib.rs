pub mod cli;
pub mod commands;
pub mod error;
pub mod executor;
pub mod model;
pub mod period;
pub mod planner;
pub mod refresh;
pub mod resample;
pub mod store;
pub mod tui;

pub use error::{Error, Result};

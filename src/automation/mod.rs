//! Page capture automation.
//!
//! This module provides:
//! - Configuration loaded from config.json
//! - Keyboard input simulation for turning pages
//! - The run state machine
//! - The capture session runner

pub mod config;
pub mod input;
pub mod runner;
pub mod state;

pub use config::{get_config, init_config};
pub use runner::run;
pub use state::RunState;

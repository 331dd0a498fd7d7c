//! Command-line front end for the savanna simulation.

pub mod app;
pub mod ui;

pub use app::{App, AppOptions};

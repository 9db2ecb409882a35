//! HR dashboard: employee table loading, filtering and the derived
//! views behind each chart, plus the egui shell that displays them.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;

// The binary in main.rs drives the terminal UI; everything else lives here
// so that integration tests and benchmarks can reach the same types.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod keyboard;
pub mod session;
pub mod share;
pub mod store;
pub mod ui;

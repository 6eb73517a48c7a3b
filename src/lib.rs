// Library target holds the typing engine, article pool and stats store so the
// binary, integration tests and criterion benchmarks share one module tree.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod generator;
pub mod logging;
pub mod session;
pub mod store;
pub mod ui;

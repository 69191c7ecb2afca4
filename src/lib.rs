pub mod app;
pub mod clipboard;
pub mod config;
pub mod events;
pub mod launch;
pub mod logging;
pub mod magnet;
pub mod service;
pub mod theme;
pub mod tui;
pub mod ui;

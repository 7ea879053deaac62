pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod input;
pub mod logs;
pub mod platform;
pub mod transforms;
pub mod ui;

// ABOUTME: Library exports for the wcl CLI modules for testing and external use
// ABOUTME: Makes command handlers and config loading available to integration tests

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod output;

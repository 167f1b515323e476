// ABOUTME: Library exports for oEmbed CLI modules for testing and external use
// ABOUTME: Makes internal modules available to the binary and integration tests

pub mod cli;
pub mod cli_output;
pub mod commands;
pub mod config;
pub mod constants;
pub mod output;

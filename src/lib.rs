//! devflow: one entry point for the clean/init/lock/build/upload/bundle workflow of a Python package.

pub mod cli;
pub mod command_handlers;
pub mod config;
pub mod platform;
pub mod process;
pub mod project;
pub mod registry;

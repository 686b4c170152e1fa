//! Configuration management for mrecorder.
//!
//! This module handles loading and saving application configuration from TOML files
//! stored in the user's config directory, and resolves the data locations derived
//! from it.

pub mod file;

pub use file::{get_config_path, get_data_dir, MrecorderConfig};

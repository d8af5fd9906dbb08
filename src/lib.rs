pub mod analyzer;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod git_ops;
pub mod hosting;
pub mod inputs;
pub mod manifest;
pub mod notes;
pub mod ui;
pub mod warning;

pub use error::{ReleaseError, Result};

//! Core domain models for the pipeline
//!
//! This module defines the fundamental data structures that represent
//! the topology, steps, artifacts, and run configuration.

pub mod artifact;
pub mod config;
pub mod context;
pub mod selector;
pub mod state;
pub mod step;

pub use artifact::*;
pub use config::{ConfigError, PipelineConfig};
pub use context::*;
pub use selector::*;
pub use state::*;
pub use step::*;

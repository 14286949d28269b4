//! Core domain models
//!
//! Steps, the registry that orders them, the per-run configuration that
//! gates them, and the outcomes a run produces.

pub mod config;
pub mod registry;
pub mod state;
pub mod step;

pub use config::{ConfigError, ConfigLocator, FailurePolicy, Gate, RunConfig};
pub use registry::StepRegistry;
pub use state::*;
pub use step::*;

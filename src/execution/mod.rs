//! Pipeline execution

pub mod engine;
pub mod executor;

pub use engine::{EventHandler, PipelineRunner, RunEvent};
pub use executor::StepExecutor;

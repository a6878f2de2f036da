//! Test harness utilities for the behavioural suites.

mod config_loader;
mod corpus;
mod reporter;
mod world;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use corpus::SampleCorpus;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};

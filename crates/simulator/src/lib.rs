// simulator/src/lib.rs
pub mod config;
pub mod runtime;

pub use config::{AnimationConfig, ChartConfig, SimConfig};
pub use runtime::{ScenarioReport, Simulator};

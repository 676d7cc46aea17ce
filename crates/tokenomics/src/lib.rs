// tokenomics/src/lib.rs

//! UAP Supply-Flow Scenario Model
//!
//! This crate computes how the fixed UAP supply partitions over a normalized
//! progress axis (0..1) into four mutually exclusive buckets:
//! - Reserved: not yet distributed
//! - Circulating: held by players
//! - Treasury: routed to the protocol pool by spend rules
//! - Burned: permanently removed
//!
//! The pipeline is a pure scenario generator (instantaneous flows per tick)
//! followed by a single-pass state integrator (cumulative, clamped buckets).
//! Allocation and breeding tables are exact decimal lookups.

pub mod allocation;
pub mod breeding;
pub mod integrator;
pub mod params;
pub mod scenario;

pub use allocation::{AllocationRow, AllocationTable};
pub use breeding::{BreedingRow, BreedingSchedule, BreedingTotals};
pub use integrator::{integrate_states, IntegratedState, SupplyStates};
pub use params::{AllocationShare, BreedingTier, FlowRates, SupplyParams};
pub use scenario::{
    generate_scenario, intensity, nearest_index, SamplePoint, ScenarioGenerator,
    DEFAULT_SAMPLE_POINTS,
};

/// Result type for tokenomics operations
pub type TokenomicsResult<T> = Result<T, TokenomicsError>;

/// Errors that can occur in tokenomics operations
#[derive(Debug, thiserror::Error)]
pub enum TokenomicsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Overflow error: {0}")]
    Overflow(String),
}

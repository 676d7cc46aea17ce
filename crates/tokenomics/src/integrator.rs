// tokenomics/src/integrator.rs

use crate::scenario::SamplePoint;
use serde::{Deserialize, Serialize};

/// Partition of the fixed supply at one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplyStates {
    /// Not yet distributed
    pub reserved: f64,
    /// Held by players
    pub circulating: f64,
    /// Held by the protocol treasury
    pub treasury: f64,
    /// Permanently removed
    pub burned: f64,
}

impl SupplyStates {
    /// Sum of all four buckets
    pub fn total(&self) -> f64 {
        self.reserved + self.circulating + self.treasury + self.burned
    }
}

/// A sample point together with the cumulative supply partition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegratedState {
    #[serde(flatten)]
    pub sample: SamplePoint,
    pub states: SupplyStates,
    /// Set once any bucket has hit a clamp bound at or before this tick.
    /// From then on the buckets need not sum to total supply.
    pub clamped: bool,
}

impl IntegratedState {
    pub fn t(&self) -> f64 {
        self.sample.t
    }
}

/// Clamp `value` into `[0, max]`, reporting whether the bound was hit.
/// NaN maps to 0.
fn clamp_bucket(value: f64, max: f64) -> (f64, bool) {
    if value.is_nan() {
        return (0.0, true);
    }
    let clamped = value.clamp(0.0, max);
    (clamped, clamped != value)
}

/// Integrate flow samples into cumulative, clamped supply buckets.
///
/// Single left-to-right pass. The first sample contributes with a zero step,
/// every later sample with `t[i] - t[i-1]`. Circulating, burned and treasury
/// accumulators are clamped to `[0, total_supply]`; reserved is whatever is
/// left, clamped the same way. Once a clamp engages the buckets are no longer
/// guaranteed to sum to `total_supply`.
pub fn integrate_states(samples: &[SamplePoint], total_supply: u64) -> Vec<IntegratedState> {
    let supply = total_supply as f64;

    let mut circ = 0.0_f64;
    let mut burned_cum = 0.0_f64;
    let mut treasury_cum = 0.0_f64;
    let mut clamped = false;
    let mut prev_t: Option<f64> = None;

    let mut out = Vec::with_capacity(samples.len());

    for sample in samples {
        let step = match prev_t {
            Some(prev) => sample.t - prev,
            None => 0.0,
        };
        prev_t = Some(sample.t);

        let (next_circ, hit_circ) = clamp_bucket(circ + sample.circulating_delta * step, supply);
        let (next_burned, hit_burned) =
            clamp_bucket(burned_cum + sample.burn_from_spend * step, supply);
        let (next_treasury, hit_treasury) =
            clamp_bucket(treasury_cum + sample.treasury_from_spend * step, supply);
        circ = next_circ;
        burned_cum = next_burned;
        treasury_cum = next_treasury;

        let (reserved, hit_reserved) =
            clamp_bucket(supply - circ - burned_cum - treasury_cum, supply);

        if !clamped && (hit_circ || hit_burned || hit_treasury || hit_reserved) {
            tracing::warn!(
                t = sample.t,
                circulating = circ,
                burned = burned_cum,
                treasury = treasury_cum,
                "Supply bucket clamped; partition no longer sums to total supply"
            );
            clamped = true;
        }

        out.push(IntegratedState {
            sample: *sample,
            states: SupplyStates {
                reserved,
                circulating: circ,
                treasury: treasury_cum,
                burned: burned_cum,
            },
            clamped,
        });
    }

    out
}

// tokenomics/src/scenario.rs

use crate::{params::SupplyParams, TokenomicsError, TokenomicsResult};
use serde::{Deserialize, Serialize};

/// Number of ticks used by the supply charts
pub const DEFAULT_SAMPLE_POINTS: usize = 60;

/// Instantaneous flows at one tick of normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Normalized progress (0.0-1.0)
    pub t: f64,
    /// Activity level, smoothstep of `t`
    pub intensity: f64,
    /// Rewards claimed by players
    pub claimed: f64,
    /// Spend on upgrades
    pub upgrade_spend: f64,
    /// Spend on breeding
    pub breeding_spend: f64,
    /// Upgrade plus breeding spend
    pub total_spend: f64,
    /// Portion of spend that is burned
    pub burn_from_spend: f64,
    /// Portion of spend routed to treasury
    pub treasury_from_spend: f64,
    /// Tax collected on DEX sells
    pub dex_sell_tax: f64,
    /// Fee collected by the marketplace hub
    pub hub_fee: f64,
    /// Net flow into circulation, may be negative
    pub circulating_delta: f64,
}

/// Smoothstep easing: 3t² - 2t³
///
/// Monotonic from 0 at `t = 0` to 1 at `t = 1`, with zero slope at both ends.
pub fn intensity(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Index of the tick nearest to a normalized hover position
pub fn nearest_index(t01: f64, points: usize) -> usize {
    if points < 2 || !t01.is_finite() {
        return 0;
    }
    let last = points - 1;
    let index = (t01.clamp(0.0, 1.0) * last as f64).round() as usize;
    index.min(last)
}

/// Rates resolved once from validated parameters
#[derive(Debug, Clone, Copy)]
struct ResolvedRates {
    population: f64,
    claim_per_capita: f64,
    upgrade_spend_per_capita: f64,
    breeding_adoption_rate: f64,
    average_breeding_cost: f64,
    breeding_exponent: f64,
    burn_fraction: f64,
    sell_through_rate: f64,
    sell_tax_rate: f64,
    marketplace_volume_rate: f64,
    hub_fee_rate: f64,
}

/// Deterministic generator of flow samples over `t ∈ [0, 1]`
#[derive(Debug, Clone)]
pub struct ScenarioGenerator {
    rates: ResolvedRates,
    points: usize,
}

impl ScenarioGenerator {
    /// Create a generator, rejecting invalid parameters or fewer than two points
    pub fn new(params: &SupplyParams, points: usize) -> TokenomicsResult<Self> {
        if points < 2 {
            return Err(TokenomicsError::InvalidParameter(format!(
                "sample point count must be at least 2, got {}",
                points
            )));
        }
        params.validate()?;

        let rates = &params.rates;
        let generator = Self {
            rates: ResolvedRates {
                population: rates.population as f64,
                claim_per_capita: rates.claim_per_capita,
                upgrade_spend_per_capita: rates.upgrade_spend_per_capita,
                breeding_adoption_rate: rates.breeding_adoption_rate,
                average_breeding_cost: params.average_breeding_cost(),
                breeding_exponent: rates.breeding_exponent,
                burn_fraction: rates.burn_fraction,
                sell_through_rate: rates.sell_through_rate,
                sell_tax_rate: rates.sell_tax_rate,
                marketplace_volume_rate: rates.marketplace_volume_rate,
                hub_fee_rate: rates.hub_fee_rate,
            },
            points,
        };
        generator.check_peak_flows()?;
        Ok(generator)
    }

    /// Reject rates whose combined flows overflow `f64`.
    ///
    /// Every flow term scales with `intensity(t) <= 1` (or a positive power
    /// of it), so finite magnitudes at `t = 1` bound every other tick.
    fn check_peak_flows(&self) -> TokenomicsResult<()> {
        let peak = self.sample_at(1.0);
        let gross = peak.claimed + peak.total_spend + peak.dex_sell_tax + peak.hub_fee;

        let flows = [
            ("claimed", peak.claimed),
            ("upgrade_spend", peak.upgrade_spend),
            ("breeding_spend", peak.breeding_spend),
            ("total_spend", peak.total_spend),
            ("burn_from_spend", peak.burn_from_spend),
            ("treasury_from_spend", peak.treasury_from_spend),
            ("dex_sell_tax", peak.dex_sell_tax),
            ("hub_fee", peak.hub_fee),
            ("circulating_delta", peak.circulating_delta),
            ("gross flow", gross),
        ];
        match flows.iter().find(|(_, value)| !value.is_finite()) {
            Some((name, value)) => Err(TokenomicsError::InvalidParameter(format!(
                "{} at full intensity is not finite ({}); rates are too large",
                name, value
            ))),
            None => Ok(()),
        }
    }

    /// Number of samples produced by [`generate`](Self::generate)
    pub fn points(&self) -> usize {
        self.points
    }

    /// Flows at an arbitrary progress value
    pub fn sample_at(&self, t: f64) -> SamplePoint {
        let r = &self.rates;
        let level = intensity(t);

        let claimed = r.population * r.claim_per_capita * level;
        let upgrade_spend = r.population * r.upgrade_spend_per_capita * level;
        let breeding_spend = r.population
            * r.breeding_adoption_rate
            * r.average_breeding_cost
            * level.powf(r.breeding_exponent);
        let total_spend = upgrade_spend + breeding_spend;

        let burn_from_spend = total_spend * r.burn_fraction;
        let treasury_from_spend = total_spend * (1.0 - r.burn_fraction);

        let dex_sell_tax = claimed * r.sell_through_rate * r.sell_tax_rate;
        let hub_fee = claimed * r.marketplace_volume_rate * r.hub_fee_rate;

        SamplePoint {
            t,
            intensity: level,
            claimed,
            upgrade_spend,
            breeding_spend,
            total_spend,
            burn_from_spend,
            treasury_from_spend,
            dex_sell_tax,
            hub_fee,
            circulating_delta: claimed - total_spend - dex_sell_tax - hub_fee,
        }
    }

    /// All samples at `t[i] = i / (N - 1)`, both endpoints included
    pub fn generate(&self) -> Vec<SamplePoint> {
        let last = (self.points - 1) as f64;
        let samples: Vec<SamplePoint> = (0..self.points)
            .map(|i| self.sample_at(i as f64 / last))
            .collect();

        tracing::debug!(
            points = self.points,
            peak_claimed = samples.last().map(|s| s.claimed).unwrap_or_default(),
            "Generated supply scenario"
        );

        samples
    }
}

/// Generate `points` flow samples for the given parameters
pub fn generate_scenario(params: &SupplyParams, points: usize) -> TokenomicsResult<Vec<SamplePoint>> {
    Ok(ScenarioGenerator::new(params, points)?.generate())
}

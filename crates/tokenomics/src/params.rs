// tokenomics/src/params.rs

use crate::{TokenomicsError, TokenomicsResult};
use serde::{Deserialize, Serialize};

/// Allowed drift when checking that allocation fractions sum to 1.0
pub const FRACTION_EPSILON: f64 = 1e-9;

/// Default token cap: 420 billion UAP
pub const DEFAULT_TOTAL_SUPPLY: u64 = 420_000_000_000;

/// One reserve category of the fixed supply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationShare {
    /// Category label
    pub label: String,
    /// Share of total supply (0.0-1.0)
    pub fraction: f64,
}

impl AllocationShare {
    pub fn new(label: impl Into<String>, fraction: f64) -> Self {
        Self {
            label: label.into(),
            fraction,
        }
    }
}

/// One row of the breeding cost schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedingTier {
    /// Breeding attempt number (1-based)
    pub attempt: u32,
    /// Cost of the attempt in UAP, split 50/50 into burn and treasury
    pub cost: u64,
}

/// Per-capita and routing rates driving the scenario generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRates {
    /// Active player population
    pub population: u64,
    /// Rewards claimed per player at full intensity
    pub claim_per_capita: f64,
    /// Upgrade spend per player at full intensity
    pub upgrade_spend_per_capita: f64,
    /// Share of players using the breeding channel (0.0-1.0)
    pub breeding_adoption_rate: f64,
    /// Average breeding cost. Defaults to the schedule mean when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_breeding_cost: Option<f64>,
    /// Exponent applied to intensity for breeding spend
    /// Default: 1.1 (adoption accelerates with activity)
    pub breeding_exponent: f64,
    /// Share of spend that is burned; the rest goes to treasury.
    /// Default: 0.5, where burn + treasury equals total spend exactly.
    /// Other fractions split within floating-point rounding.
    pub burn_fraction: f64,
    /// Share of claimed rewards sold on the DEX (0.0-1.0)
    pub sell_through_rate: f64,
    /// Tax on DEX sells (0.0-1.0)
    pub sell_tax_rate: f64,
    /// Marketplace volume relative to claimed rewards
    pub marketplace_volume_rate: f64,
    /// Hub fee on marketplace volume (0.0-1.0)
    pub hub_fee_rate: f64,
}

impl Default for FlowRates {
    fn default() -> Self {
        Self {
            population: 10_000,
            claim_per_capita: 1_500_000.0,
            upgrade_spend_per_capita: 400_000.0,
            breeding_adoption_rate: 0.35,
            average_breeding_cost: None,
            breeding_exponent: 1.1,
            burn_fraction: 0.5,
            sell_through_rate: 0.30,
            sell_tax_rate: 0.05,    // 5%
            marketplace_volume_rate: 0.20,
            hub_fee_rate: 0.025,    // 2.5%
        }
    }
}

/// Complete, immutable parameter set for the supply model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplyParams {
    /// Fixed token cap
    pub total_supply: u64,
    /// Ordered reserve categories, fractions sum to 1.0
    pub allocation: Vec<AllocationShare>,
    /// Ordered breeding costs, strictly increasing
    pub breeding_schedule: Vec<BreedingTier>,
    /// Scenario rate constants
    pub rates: FlowRates,
}

impl Default for SupplyParams {
    fn default() -> Self {
        Self {
            total_supply: DEFAULT_TOTAL_SUPPLY,
            allocation: default_allocation(),
            breeding_schedule: default_breeding_schedule(),
            rates: FlowRates::default(),
        }
    }
}

/// Allocation of the 420B supply across reserve categories
pub fn default_allocation() -> Vec<AllocationShare> {
    vec![
        AllocationShare::new("Play-to-Earn Rewards", 0.50),
        AllocationShare::new("Ecosystem & Treasury", 0.25),
        AllocationShare::new("Liquidity", 0.15),
        AllocationShare::new("Team", 0.05),
        AllocationShare::new("Marketing & Partnerships", 0.05),
    ]
}

/// Breeding cost doubles with every attempt
pub fn default_breeding_schedule() -> Vec<BreedingTier> {
    [25_000, 50_000, 100_000, 200_000, 400_000, 800_000, 1_600_000]
        .iter()
        .enumerate()
        .map(|(i, &cost)| BreedingTier {
            attempt: i as u32 + 1,
            cost,
        })
        .collect()
}

impl SupplyParams {
    /// Validate the full parameter set. Nothing is clamped or corrected here.
    pub fn validate(&self) -> TokenomicsResult<()> {
        if self.total_supply == 0 {
            return Err(TokenomicsError::InvalidParameter(
                "total_supply must be greater than zero".into(),
            ));
        }

        self.validate_allocation()?;
        self.validate_breeding_schedule()?;
        self.validate_rates()?;

        Ok(())
    }

    fn validate_allocation(&self) -> TokenomicsResult<()> {
        if self.allocation.is_empty() {
            return Err(TokenomicsError::InvalidParameter(
                "allocation must list at least one category".into(),
            ));
        }

        for share in &self.allocation {
            if share.label.trim().is_empty() {
                return Err(TokenomicsError::InvalidParameter(
                    "allocation label must not be empty".into(),
                ));
            }
            if !share.fraction.is_finite() || !(0.0..=1.0).contains(&share.fraction) {
                return Err(TokenomicsError::InvalidParameter(format!(
                    "allocation fraction for '{}' must be within [0, 1], got {}",
                    share.label, share.fraction
                )));
            }
        }

        let sum: f64 = self.allocation.iter().map(|share| share.fraction).sum();
        if (sum - 1.0).abs() > FRACTION_EPSILON {
            return Err(TokenomicsError::InvalidParameter(format!(
                "allocation fractions must sum to 1.0, got {}",
                sum
            )));
        }

        Ok(())
    }

    fn validate_breeding_schedule(&self) -> TokenomicsResult<()> {
        for pair in self.breeding_schedule.windows(2) {
            if pair[1].cost <= pair[0].cost {
                return Err(TokenomicsError::InvalidParameter(format!(
                    "breeding cost must strictly increase: attempt {} costs {}, attempt {} costs {}",
                    pair[0].attempt, pair[0].cost, pair[1].attempt, pair[1].cost
                )));
            }
        }

        Ok(())
    }

    fn validate_rates(&self) -> TokenomicsResult<()> {
        let rates = &self.rates;

        non_negative("claim_per_capita", rates.claim_per_capita)?;
        non_negative("upgrade_spend_per_capita", rates.upgrade_spend_per_capita)?;
        non_negative("marketplace_volume_rate", rates.marketplace_volume_rate)?;

        unit_interval("breeding_adoption_rate", rates.breeding_adoption_rate)?;
        unit_interval("burn_fraction", rates.burn_fraction)?;
        unit_interval("sell_through_rate", rates.sell_through_rate)?;
        unit_interval("sell_tax_rate", rates.sell_tax_rate)?;
        unit_interval("hub_fee_rate", rates.hub_fee_rate)?;

        if !rates.breeding_exponent.is_finite() || rates.breeding_exponent <= 0.0 {
            return Err(TokenomicsError::InvalidParameter(format!(
                "breeding_exponent must be positive, got {}",
                rates.breeding_exponent
            )));
        }

        match rates.average_breeding_cost {
            Some(cost) => non_negative("average_breeding_cost", cost)?,
            None if self.breeding_schedule.is_empty() => {
                return Err(TokenomicsError::InvalidParameter(
                    "average_breeding_cost is required when the breeding schedule is empty".into(),
                ));
            }
            None => {}
        }

        Ok(())
    }

    /// Average breeding cost used by the scenario generator
    pub fn average_breeding_cost(&self) -> f64 {
        match self.rates.average_breeding_cost {
            Some(cost) => cost,
            None => mean_cost(&self.breeding_schedule),
        }
    }
}

fn mean_cost(schedule: &[BreedingTier]) -> f64 {
    if schedule.is_empty() {
        return 0.0;
    }
    let total: f64 = schedule.iter().map(|tier| tier.cost as f64).sum();
    total / schedule.len() as f64
}

fn non_negative(name: &str, value: f64) -> TokenomicsResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(TokenomicsError::InvalidParameter(format!(
            "{} must be a non-negative finite number, got {}",
            name, value
        )));
    }
    Ok(())
}

fn unit_interval(name: &str, value: f64) -> TokenomicsResult<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(TokenomicsError::InvalidParameter(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}

// tokenomics/src/breeding.rs

use crate::{params::SupplyParams, TokenomicsError, TokenomicsResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Share of every breeding cost that is burned; the remainder goes to treasury
pub fn breeding_burn_share() -> Decimal {
    Decimal::new(5, 1)
}

/// One breeding attempt with its burn/treasury split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingRow {
    /// Attempt number
    pub attempt: u32,
    /// Cost of this attempt
    pub cost: Decimal,
    /// Burned half
    pub burn: Decimal,
    /// Treasury half
    pub treasury: Decimal,
    /// Cost of all attempts up to and including this one
    pub cumulative_cost: Decimal,
}

/// Aggregate row over the whole schedule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreedingTotals {
    pub cost: Decimal,
    pub burn: Decimal,
    pub treasury: Decimal,
}

/// Breeding cost schedule with per-row splits and an aggregate row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingSchedule {
    rows: Vec<BreedingRow>,
    totals: BreedingTotals,
}

impl BreedingSchedule {
    /// Build the schedule from validated parameters
    pub fn from_params(params: &SupplyParams) -> TokenomicsResult<Self> {
        params.validate()?;

        let mut rows = Vec::with_capacity(params.breeding_schedule.len());
        let mut totals = BreedingTotals::default();

        let share = breeding_burn_share();

        for tier in &params.breeding_schedule {
            let cost = Decimal::from(tier.cost);
            let burn = cost * share;
            let treasury = cost * share;

            totals.cost = totals
                .cost
                .checked_add(cost)
                .ok_or_else(|| TokenomicsError::Overflow("breeding cost total".into()))?;
            totals.burn = totals
                .burn
                .checked_add(burn)
                .ok_or_else(|| TokenomicsError::Overflow("breeding burn total".into()))?;
            totals.treasury = totals
                .treasury
                .checked_add(treasury)
                .ok_or_else(|| TokenomicsError::Overflow("breeding treasury total".into()))?;

            rows.push(BreedingRow {
                attempt: tier.attempt,
                cost,
                burn,
                treasury,
                cumulative_cost: totals.cost,
            });
        }

        Ok(Self { rows, totals })
    }

    pub fn rows(&self) -> &[BreedingRow] {
        &self.rows
    }

    pub fn totals(&self) -> &BreedingTotals {
        &self.totals
    }

    /// Row for a given attempt number
    pub fn attempt(&self, attempt: u32) -> Option<&BreedingRow> {
        self.rows.iter().find(|row| row.attempt == attempt)
    }
}

// tokenomics/src/allocation.rs

use crate::{params::SupplyParams, TokenomicsError, TokenomicsResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// One category of the allocation table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRow {
    /// Category label
    pub label: String,
    /// Share of total supply
    pub fraction: Decimal,
    /// Tokens reserved for the category
    pub amount: Decimal,
}

impl AllocationRow {
    /// Share expressed as a percentage (e.g. 15 for 0.15)
    pub fn percent(&self) -> Decimal {
        self.fraction * Decimal::ONE_HUNDRED
    }
}

/// Allocation of the fixed supply, computed in exact decimal arithmetic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationTable {
    total_supply: u64,
    rows: Vec<AllocationRow>,
}

impl AllocationTable {
    /// Build the table from validated parameters
    pub fn from_params(params: &SupplyParams) -> TokenomicsResult<Self> {
        params.validate()?;

        let supply = Decimal::from(params.total_supply);
        let rows = params
            .allocation
            .iter()
            .map(|share| {
                let fraction = exact_fraction(share.fraction)?;
                let amount = supply.checked_mul(fraction).ok_or_else(|| {
                    TokenomicsError::Overflow(format!("allocation amount for '{}'", share.label))
                })?;

                Ok(AllocationRow {
                    label: share.label.clone(),
                    fraction,
                    amount,
                })
            })
            .collect::<TokenomicsResult<Vec<_>>>()?;

        Ok(Self {
            total_supply: params.total_supply,
            rows,
        })
    }

    pub fn total_supply(&self) -> u64 {
        self.total_supply
    }

    pub fn rows(&self) -> &[AllocationRow] {
        &self.rows
    }

    /// Sum of all category fractions
    pub fn fraction_sum(&self) -> Decimal {
        self.rows.iter().map(|row| row.fraction).sum()
    }

    /// Sum of all category amounts
    pub fn allocated_total(&self) -> Decimal {
        self.rows.iter().map(|row| row.amount).sum()
    }

    /// Look up a category by label
    pub fn row(&self, label: &str) -> Option<&AllocationRow> {
        self.rows.iter().find(|row| row.label == label)
    }
}

/// Convert through the shortest round-trip decimal form so 0.15 stays 0.15.
fn exact_fraction(fraction: f64) -> TokenomicsResult<Decimal> {
    Decimal::from_str(&fraction.to_string()).map_err(|e| {
        TokenomicsError::InvalidParameter(format!(
            "allocation fraction {} is not representable: {}",
            fraction, e
        ))
    })
}

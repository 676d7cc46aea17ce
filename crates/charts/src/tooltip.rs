// charts/src/tooltip.rs

use crate::geometry::{FlowSeries, StateBucket};
use crate::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use tokenomics::{nearest_index, IntegratedState};

/// One labelled value in a hover tooltip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub label: String,
    pub value: f64,
    /// Compact display form, e.g. `210.00B`
    pub display: String,
    /// Share of total supply, only set for supply buckets
    pub percent_of_supply: Option<f64>,
}

/// Tooltip content for the tick nearest to a hover position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub index: usize,
    pub t: f64,
    pub buckets: Vec<TooltipRow>,
    pub flows: Vec<TooltipRow>,
    /// Whether the partition at this tick is past a clamp
    pub clamped: bool,
}

impl Tooltip {
    /// Build the tooltip for normalized hover position `t01`
    pub fn at(states: &[IntegratedState], t01: f64, total_supply: u64) -> ChartResult<Self> {
        if states.is_empty() {
            return Err(ChartError::EmptySeries("tooltip".into()));
        }

        let index = nearest_index(t01, states.len());
        let state = &states[index];
        let supply = total_supply as f64;

        // Top of the stack first, as read on the chart
        let buckets = StateBucket::STACK_ORDER
            .iter()
            .rev()
            .map(|bucket| {
                let value = bucket.value(&state.states);
                TooltipRow {
                    label: bucket.label().to_string(),
                    value,
                    display: format_compact(value),
                    percent_of_supply: (supply > 0.0).then(|| value / supply * 100.0),
                }
            })
            .collect();

        let flows = [
            FlowSeries::Claimed,
            FlowSeries::TotalSpend,
            FlowSeries::BurnFromSpend,
            FlowSeries::TreasuryFromSpend,
            FlowSeries::DexSellTax,
            FlowSeries::HubFee,
        ]
        .iter()
        .map(|series| {
            let value = series.value(&state.sample);
            TooltipRow {
                label: series.label().to_string(),
                value,
                display: format_compact(value),
                percent_of_supply: None,
            }
        })
        .collect();

        Ok(Self {
            index,
            t: state.t(),
            buckets,
            flows,
            clamped: state.clamped,
        })
    }

    /// Progress as a whole percentage, e.g. `75%`
    pub fn progress_label(&self) -> String {
        format!("{:.0}%", self.t * 100.0)
    }
}

/// Format a token amount with a K/M/B suffix
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs >= 1e9 {
        format!("{}{:.2}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}{:.2}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}{:.1}K", sign, abs / 1e3)
    } else {
        format!("{}{:.0}", sign, abs)
    }
}

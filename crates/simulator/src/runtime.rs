// simulator/src/runtime.rs
use crate::SimConfig;
use charts::{
    format_compact, AnimationScheduler, ChartOptions, SupplyChart, SvgRenderer, Tooltip,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::time::Duration;
use tokenomics::{
    generate_scenario, integrate_states, AllocationTable, BreedingSchedule, IntegratedState,
};

/// Integrated series plus the parameters that produced it
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub generated_at: DateTime<Utc>,
    pub total_supply: u64,
    pub points: usize,
    /// Whether any tick is past a clamp
    pub clamped: bool,
    pub states: Vec<IntegratedState>,
}

pub struct Simulator {
    config: SimConfig,
    states: Vec<IntegratedState>,
    allocation: AllocationTable,
    breeding: BreedingSchedule,
}

impl Simulator {
    pub fn new(config: SimConfig) -> anyhow::Result<Self> {
        tracing::info!("Initializing supply model");

        let samples = generate_scenario(&config.supply, config.points)?;
        let states = integrate_states(&samples, config.supply.total_supply);
        tracing::info!(
            "✓ Scenario generated: points={}, total_supply={}",
            states.len(),
            config.supply.total_supply
        );

        let allocation = AllocationTable::from_params(&config.supply)?;
        tracing::info!("✓ Allocation table built: categories={}", allocation.rows().len());

        let breeding = BreedingSchedule::from_params(&config.supply)?;
        tracing::info!("✓ Breeding schedule built: attempts={}", breeding.rows().len());

        if states.iter().any(|s| s.clamped) {
            tracing::warn!("Scenario clamps at least one supply bucket; totals are approximate");
        }

        Ok(Self {
            config,
            states,
            allocation,
            breeding,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn states(&self) -> &[IntegratedState] {
        &self.states
    }

    pub fn allocation(&self) -> &AllocationTable {
        &self.allocation
    }

    pub fn breeding(&self) -> &BreedingSchedule {
        &self.breeding
    }

    pub fn report(&self) -> ScenarioReport {
        ScenarioReport {
            generated_at: Utc::now(),
            total_supply: self.config.supply.total_supply,
            points: self.states.len(),
            clamped: self.states.iter().any(|s| s.clamped),
            states: self.states.clone(),
        }
    }

    /// Plain-text table of the integrated series
    pub fn scenario_table(&self) -> String {
        let mut out = format!(
            "{:>5}  {:>10}  {:>12}  {:>12}  {:>12}  {:>12}\n",
            "t", "intensity", "reserved", "circulating", "treasury", "burned"
        );
        for state in &self.states {
            let s = &state.states;
            out.push_str(&format!(
                "{:>5.2}  {:>10.3}  {:>12}  {:>12}  {:>12}  {:>12}{}\n",
                state.t(),
                state.sample.intensity,
                format_compact(s.reserved),
                format_compact(s.circulating),
                format_compact(s.treasury),
                format_compact(s.burned),
                if state.clamped { "  *" } else { "" }
            ));
        }
        out
    }

    pub fn allocation_table(&self) -> String {
        let mut out = format!("{:<28}  {:>8}  {:>16}\n", "category", "share", "amount");
        for row in self.allocation.rows() {
            out.push_str(&format!(
                "{:<28}  {:>7}%  {:>16}\n",
                row.label,
                row.percent().normalize(),
                row.amount.normalize()
            ));
        }
        out.push_str(&format!(
            "{:<28}  {:>7}%  {:>16}\n",
            "Total",
            (self.allocation.fraction_sum() * Decimal::ONE_HUNDRED).normalize(),
            self.allocation.allocated_total().normalize()
        ));
        out
    }

    pub fn breeding_table(&self) -> String {
        let mut out = format!(
            "{:>7}  {:>12}  {:>12}  {:>12}  {:>14}\n",
            "attempt", "cost", "burn", "treasury", "cumulative"
        );
        for row in self.breeding.rows() {
            out.push_str(&format!(
                "{:>7}  {:>12}  {:>12}  {:>12}  {:>14}\n",
                row.attempt,
                row.cost.normalize(),
                row.burn.normalize(),
                row.treasury.normalize(),
                row.cumulative_cost.normalize()
            ));
        }
        let totals = self.breeding.totals();
        out.push_str(&format!(
            "{:>7}  {:>12}  {:>12}  {:>12}\n",
            "total",
            totals.cost.normalize(),
            totals.burn.normalize(),
            totals.treasury.normalize()
        ));
        out
    }

    /// Render the stacked supply chart, optionally with a hover crosshair
    pub async fn render_svg(&self, hover: Option<f64>) -> anyhow::Result<String> {
        let mut chart = SupplyChart::new(
            SvgRenderer::default(),
            &self.config.supply,
            self.config.points,
            self.chart_options(),
        )?;
        chart.mount().await?;

        if let Some(t01) = hover {
            let viewport = self.config.chart.viewport;
            let x = viewport.x_scale().apply(t01.clamp(0.0, 1.0));
            let tooltip = chart.hover(x)?;
            tracing::debug!("Hover at index {} ({})", tooltip.index, tooltip.progress_label());
        }

        let document = chart
            .renderer()
            .document()
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("renderer produced no document"))?;
        Ok(document)
    }

    /// Replay the series step by step, logging the tooltip at each step.
    /// Returns the number of steps shown.
    pub async fn play(&self, interval: Option<Duration>) -> anyhow::Result<usize> {
        let mut plan = self.config.animation_plan();
        if let Some(interval) = interval {
            plan.interval = interval;
        }

        let mut scheduler = AnimationScheduler::new();
        let mut frames = scheduler.subscribe();
        let handle = scheduler.play(plan)?;
        let total_supply = self.config.supply.total_supply;

        let mut shown = 0;
        loop {
            let frame = *frames.borrow_and_update();
            let t01 = frame.step as f64 / (self.states.len().max(2) - 1) as f64;
            let tooltip = Tooltip::at(&self.states, t01, total_supply)?;
            log_step(&tooltip);
            shown += 1;

            if frame.finished {
                break;
            }

            tokio::select! {
                changed = frames.changed() => changed?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received shutdown signal");
                    handle.cancel();
                    return Ok(shown);
                }
            }
        }

        handle.finished().await;
        tracing::info!("Playback finished after {} steps", shown);
        Ok(shown)
    }

    fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            viewport: self.config.chart.viewport,
            lines: self.config.chart.lines.clone(),
            ready_timeout: Duration::from_millis(self.config.chart.ready_timeout_ms),
        }
    }
}

fn log_step(tooltip: &Tooltip) {
    let bucket = |label: &str| {
        tooltip
            .buckets
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.display.clone())
            .unwrap_or_default()
    };

    tracing::info!(
        "step {:>3} [{:>4}] reserved={} circulating={} treasury={} burned={}",
        tooltip.index,
        tooltip.progress_label(),
        bucket("Reserved"),
        bucket("Circulating"),
        bucket("Treasury"),
        bucket("Burned")
    );
}

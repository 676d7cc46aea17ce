// simulator/src/config.rs
use charts::{AnimationPlan, FlowSeries, Viewport};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokenomics::{SupplyParams, DEFAULT_SAMPLE_POINTS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub points: usize,
    pub supply: SupplyParams,
    pub chart: ChartConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub lines: Vec<FlowSeries>,
    pub ready_timeout_ms: u64,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub interval_ms: u64,
    pub start_delay_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            points: DEFAULT_SAMPLE_POINTS,
            supply: SupplyParams::default(),
            chart: ChartConfig {
                lines: vec![FlowSeries::Claimed, FlowSeries::TotalSpend],
                ready_timeout_ms: 5_000,
                viewport: Viewport::default(),
            },
            animation: AnimationConfig {
                interval_ms: 120,
                start_delay_ms: 0,
            },
        }
    }
}

impl SimConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Load `path` if given, otherwise fall back to defaults
    pub fn load(path: Option<&str>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn animation_plan(&self) -> AnimationPlan {
        AnimationPlan {
            steps: self.points,
            interval: Duration::from_millis(self.animation.interval_ms),
            start_delay: Duration::from_millis(self.animation.start_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = SimConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: SimConfig = toml::from_str(&text).unwrap();

        assert_eq!(parsed, config);
        assert!(text.contains("total_supply = 420000000000"));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("uap-sim-config-{}.toml", std::process::id()));
        let path = path.to_str().unwrap();

        let mut config = SimConfig::default();
        config.points = 24;
        config.supply.rates.population = 2_500;
        config.to_file(path).unwrap();

        let loaded = SimConfig::load(Some(path)).unwrap();
        std::fs::remove_file(path).unwrap();

        assert_eq!(loaded.points, 24);
        assert_eq!(loaded.supply.rates.population, 2_500);
    }

    #[test]
    fn test_partial_rates_are_rejected() {
        let text = r#"
            points = 60

            [supply]
            total_supply = 1000
        "#;

        assert!(toml::from_str::<SimConfig>(text).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(SimConfig::load(Some("/nonexistent/uap-sim.toml")).is_err());
    }

    #[test]
    fn test_animation_plan_from_config() {
        let plan = SimConfig::default().animation_plan();

        assert_eq!(plan.steps, 60);
        assert_eq!(plan.interval, Duration::from_millis(120));
        assert_eq!(plan.start_delay, Duration::ZERO);
    }
}

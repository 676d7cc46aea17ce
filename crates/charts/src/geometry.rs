// charts/src/geometry.rs

//! Pure projection of integrated supply series onto pixel geometry.
//!
//! Nothing here touches a rendering surface: every function maps
//! `(series, viewport)` to points and path data, so the output can be
//! asserted on directly.

use crate::{scale::LinearScale, scale::Viewport, ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use tokenomics::{IntegratedState, SamplePoint, SupplyStates};

/// A point in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The four supply buckets, in stacking order from the baseline up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateBucket {
    Burned,
    Treasury,
    Circulating,
    Reserved,
}

impl StateBucket {
    /// Bottom-to-top order of the stacked-area chart
    pub const STACK_ORDER: [StateBucket; 4] = [
        StateBucket::Burned,
        StateBucket::Treasury,
        StateBucket::Circulating,
        StateBucket::Reserved,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StateBucket::Burned => "Burned",
            StateBucket::Treasury => "Treasury",
            StateBucket::Circulating => "Circulating",
            StateBucket::Reserved => "Reserved",
        }
    }

    pub fn value(&self, states: &SupplyStates) -> f64 {
        match self {
            StateBucket::Burned => states.burned,
            StateBucket::Treasury => states.treasury,
            StateBucket::Circulating => states.circulating,
            StateBucket::Reserved => states.reserved,
        }
    }
}

/// Instantaneous flow quantities that can be drawn as lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowSeries {
    Claimed,
    UpgradeSpend,
    BreedingSpend,
    TotalSpend,
    BurnFromSpend,
    TreasuryFromSpend,
    DexSellTax,
    HubFee,
    CirculatingDelta,
}

impl FlowSeries {
    pub const ALL: [FlowSeries; 9] = [
        FlowSeries::Claimed,
        FlowSeries::UpgradeSpend,
        FlowSeries::BreedingSpend,
        FlowSeries::TotalSpend,
        FlowSeries::BurnFromSpend,
        FlowSeries::TreasuryFromSpend,
        FlowSeries::DexSellTax,
        FlowSeries::HubFee,
        FlowSeries::CirculatingDelta,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FlowSeries::Claimed => "Claimed",
            FlowSeries::UpgradeSpend => "Upgrade spend",
            FlowSeries::BreedingSpend => "Breeding spend",
            FlowSeries::TotalSpend => "Total spend",
            FlowSeries::BurnFromSpend => "Burn from spend",
            FlowSeries::TreasuryFromSpend => "Treasury from spend",
            FlowSeries::DexSellTax => "DEX sell tax",
            FlowSeries::HubFee => "Hub fee",
            FlowSeries::CirculatingDelta => "Net circulation",
        }
    }

    pub fn value(&self, sample: &SamplePoint) -> f64 {
        match self {
            FlowSeries::Claimed => sample.claimed,
            FlowSeries::UpgradeSpend => sample.upgrade_spend,
            FlowSeries::BreedingSpend => sample.breeding_spend,
            FlowSeries::TotalSpend => sample.total_spend,
            FlowSeries::BurnFromSpend => sample.burn_from_spend,
            FlowSeries::TreasuryFromSpend => sample.treasury_from_spend,
            FlowSeries::DexSellTax => sample.dex_sell_tax,
            FlowSeries::HubFee => sample.hub_fee,
            FlowSeries::CirculatingDelta => sample.circulating_delta,
        }
    }
}

/// One filled band of the stacked-area chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBand {
    pub bucket: StateBucket,
    /// Upper edge left to right, then lower edge right to left
    pub outline: Vec<Point>,
}

impl AreaBand {
    pub fn path_data(&self) -> String {
        path_data(&self.outline, true)
    }
}

/// An open polyline for a flow series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowLine {
    pub series: FlowSeries,
    pub points: Vec<Point>,
    /// Data range mapped onto the plot height
    pub domain: (f64, f64),
}

impl FlowLine {
    pub fn path_data(&self) -> String {
        path_data(&self.points, false)
    }
}

/// Project integrated states into stacked bands.
///
/// The vertical domain is `[0, max(total_supply, largest stacked total)]`, so
/// a clamped partition that overshoots supply still stays inside the plot.
pub fn stacked_areas(
    states: &[IntegratedState],
    viewport: &Viewport,
    total_supply: u64,
) -> ChartResult<Vec<AreaBand>> {
    viewport.validate()?;
    if states.is_empty() {
        return Err(ChartError::EmptySeries("integrated states".into()));
    }

    let y_max = states
        .iter()
        .map(|s| s.states.total())
        .fold(total_supply as f64, f64::max);
    let x = viewport.x_scale();
    let y = viewport.y_scale(y_max);

    let mut baseline = vec![0.0_f64; states.len()];
    let mut bands = Vec::with_capacity(StateBucket::STACK_ORDER.len());

    for bucket in StateBucket::STACK_ORDER {
        let top: Vec<f64> = states
            .iter()
            .zip(&baseline)
            .map(|(s, base)| base + bucket.value(&s.states))
            .collect();

        let mut outline = Vec::with_capacity(states.len() * 2);
        outline.extend(
            states
                .iter()
                .zip(&top)
                .map(|(s, v)| Point::new(x.apply(s.t()), y.apply(*v))),
        );
        outline.extend(
            states
                .iter()
                .zip(&baseline)
                .rev()
                .map(|(s, v)| Point::new(x.apply(s.t()), y.apply(*v))),
        );

        bands.push(AreaBand { bucket, outline });
        baseline = top;
    }

    Ok(bands)
}

/// Project one flow series into a polyline.
///
/// The domain always includes zero so negative net circulation dips below
/// the baseline.
pub fn flow_line(
    samples: &[SamplePoint],
    series: FlowSeries,
    viewport: &Viewport,
) -> ChartResult<FlowLine> {
    viewport.validate()?;
    if samples.is_empty() {
        return Err(ChartError::EmptySeries(series.label().into()));
    }

    let values: Vec<f64> = samples.iter().map(|s| series.value(s)).collect();
    let lo = values.iter().copied().fold(0.0, f64::min);
    let hi = values.iter().copied().fold(0.0, f64::max);

    let x = viewport.x_scale();
    let y = LinearScale::new(
        (lo, hi),
        (viewport.height - viewport.padding.bottom, viewport.padding.top),
    );

    let points = samples
        .iter()
        .zip(&values)
        .map(|(s, v)| Point::new(x.apply(s.t), y.apply(*v)))
        .collect();

    Ok(FlowLine {
        series,
        points,
        domain: (lo, hi),
    })
}

/// Horizontal pixel of the crosshair at a series index
pub fn crosshair_x(viewport: &Viewport, index: usize, len: usize) -> f64 {
    let t = if len < 2 {
        0.0
    } else {
        index.min(len - 1) as f64 / (len - 1) as f64
    };
    viewport.x_scale().apply(t)
}

/// Encode points as SVG path data with two-decimal precision
pub fn path_data(points: &[Point], closed: bool) -> String {
    let mut d = String::with_capacity(points.len() * 16);

    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{}{:.2},{:.2} ", cmd, p.x, p.y));
    }
    if closed && !points.is_empty() {
        d.push('Z');
    }

    d.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::Padding;
    use tokenomics::{generate_scenario, integrate_states, SupplyParams, DEFAULT_SAMPLE_POINTS};

    fn default_series() -> (SupplyParams, Vec<IntegratedState>) {
        let params = SupplyParams::default();
        let samples = generate_scenario(&params, DEFAULT_SAMPLE_POINTS).unwrap();
        let states = integrate_states(&samples, params.total_supply);
        (params, states)
    }

    fn viewport() -> Viewport {
        Viewport::new(400.0, 200.0, Padding::uniform(20.0)).unwrap()
    }

    #[test]
    fn test_one_band_per_bucket_in_stack_order() {
        let (params, states) = default_series();
        let bands = stacked_areas(&states, &viewport(), params.total_supply).unwrap();

        let order: Vec<StateBucket> = bands.iter().map(|b| b.bucket).collect();
        assert_eq!(order, StateBucket::STACK_ORDER.to_vec());
        for band in &bands {
            assert_eq!(band.outline.len(), states.len() * 2);
        }
    }

    #[test]
    fn test_bands_stay_inside_plot_area() {
        let (params, states) = default_series();
        let vp = viewport();
        let bands = stacked_areas(&states, &vp, params.total_supply).unwrap();

        for point in bands.iter().flat_map(|b| &b.outline) {
            assert!(point.x >= 20.0 - 1e-9 && point.x <= 380.0 + 1e-9);
            assert!(point.y >= 20.0 - 1e-9 && point.y <= 180.0 + 1e-9);
        }
    }

    #[test]
    fn test_top_band_reaches_full_supply() {
        let (params, states) = default_series();
        let bands = stacked_areas(&states, &viewport(), params.total_supply).unwrap();
        let reserved = bands.last().unwrap();

        // Unclamped partition sums to supply, so the top edge sits on the plot top
        for point in &reserved.outline[..states.len()] {
            assert!((point.y - 20.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_bands_share_edges() {
        let (params, states) = default_series();
        let bands = stacked_areas(&states, &viewport(), params.total_supply).unwrap();
        let n = states.len();

        for pair in bands.windows(2) {
            let lower_top = &pair[0].outline[..n];
            let mut upper_bottom: Vec<Point> = pair[1].outline[n..].to_vec();
            upper_bottom.reverse();
            assert_eq!(lower_top, upper_bottom.as_slice());
        }
    }

    #[test]
    fn test_overshooting_partition_rescales_domain() {
        let (_, mut states) = default_series();
        for state in states.iter_mut() {
            state.states = SupplyStates {
                reserved: 900.0,
                circulating: 900.0,
                treasury: 0.0,
                burned: 0.0,
            };
        }

        let bands = stacked_areas(&states, &viewport(), 1_000).unwrap();
        let top = &bands.last().unwrap().outline[..states.len()];
        assert!(top.iter().all(|p| (p.y - 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_empty_series_rejected() {
        assert!(matches!(
            stacked_areas(&[], &viewport(), 1_000),
            Err(ChartError::EmptySeries(_))
        ));
        assert!(flow_line(&[], FlowSeries::Claimed, &viewport()).is_err());
    }

    #[test]
    fn test_flow_line_domain_includes_zero() {
        let params = SupplyParams::default();
        let samples = generate_scenario(&params, DEFAULT_SAMPLE_POINTS).unwrap();
        let line = flow_line(&samples, FlowSeries::Claimed, &viewport()).unwrap();

        assert_eq!(line.domain.0, 0.0);
        assert_eq!(line.domain.1, samples.last().unwrap().claimed);
        assert_eq!(line.points.first().unwrap().y, 180.0);
        assert_eq!(line.points.last().unwrap().y, 20.0);
    }

    #[test]
    fn test_negative_flow_dips_below_baseline() {
        let mut params = SupplyParams::default();
        params.rates.upgrade_spend_per_capita = 3_000_000.0;
        let samples = generate_scenario(&params, 10).unwrap();

        let line = flow_line(&samples, FlowSeries::CirculatingDelta, &viewport()).unwrap();
        assert!(line.domain.0 < 0.0);
        assert_eq!(line.domain.1, 0.0);
        // The last point is the most negative one and lands on the bottom edge
        assert!((line.points.last().unwrap().y - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_path_data_encoding() {
        let points = [Point::new(0.0, 1.0), Point::new(2.5, 3.126)];

        assert_eq!(path_data(&points, false), "M0.00,1.00 L2.50,3.13");
        assert_eq!(path_data(&points, true), "M0.00,1.00 L2.50,3.13 Z");
        assert_eq!(path_data(&[], true), "");

        let triangle = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, -7.5)];
        assert_eq!(path_data(&triangle, true), "M0.00,0.00 L10.00,0.00 L5.00,-7.50 Z");
    }

    #[test]
    fn test_crosshair_x() {
        let vp = viewport();
        assert_eq!(crosshair_x(&vp, 0, 60), 20.0);
        assert_eq!(crosshair_x(&vp, 59, 60), 380.0);
        assert_eq!(crosshair_x(&vp, 500, 60), 380.0);
        assert_eq!(crosshair_x(&vp, 3, 1), 20.0);
    }
}

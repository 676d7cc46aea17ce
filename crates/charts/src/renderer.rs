// charts/src/renderer.rs

use crate::geometry::{crosshair_x, flow_line, stacked_areas, AreaBand, FlowLine, FlowSeries};
use crate::scale::Viewport;
use crate::tooltip::Tooltip;
use crate::{ChartError, ChartResult};
use async_trait::async_trait;
use std::time::Duration;
use tokenomics::{generate_scenario, integrate_states, IntegratedState, SamplePoint, SupplyParams};

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub viewport: Viewport,
    pub bands: Vec<AreaBand>,
    pub lines: Vec<FlowLine>,
    /// Crosshair x position and tooltip while hovering
    pub hover: Option<(f64, Tooltip)>,
}

/// Drawing surface injected into a chart at construction.
///
/// `ready` resolves once the surface can accept frames; charts await it
/// before the first draw.
#[async_trait]
pub trait ChartRenderer: Send {
    async fn ready(&mut self) -> ChartResult<()>;

    fn draw(&mut self, frame: &ChartFrame) -> ChartResult<()>;
}

/// Chart options
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub viewport: Viewport,
    /// Flow series overlaid on the stacked areas
    pub lines: Vec<FlowSeries>,
    /// How long to wait for the renderer before giving up
    pub ready_timeout: Duration,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            lines: vec![FlowSeries::Claimed, FlowSeries::TotalSpend],
            ready_timeout: Duration::from_secs(5),
        }
    }
}

/// Stacked supply chart bound to a renderer
pub struct SupplyChart<R: ChartRenderer> {
    renderer: R,
    options: ChartOptions,
    total_supply: u64,
    samples: Vec<SamplePoint>,
    states: Vec<IntegratedState>,
    mounted: bool,
}

impl<R: ChartRenderer> SupplyChart<R> {
    /// Compute the series for `params` and bind it to `renderer`
    pub fn new(
        renderer: R,
        params: &SupplyParams,
        points: usize,
        options: ChartOptions,
    ) -> ChartResult<Self> {
        options.viewport.validate()?;

        let samples = generate_scenario(params, points)?;
        let states = integrate_states(&samples, params.total_supply);

        Ok(Self {
            renderer,
            options,
            total_supply: params.total_supply,
            samples,
            states,
            mounted: false,
        })
    }

    /// Wait for the renderer and draw the initial frame
    pub async fn mount(&mut self) -> ChartResult<()> {
        let timeout = self.options.ready_timeout;
        match tokio::time::timeout(timeout, self.renderer.ready()).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ChartError::RendererUnavailable(format!(
                    "renderer not ready after {:?}",
                    timeout
                )));
            }
        }

        self.mounted = true;
        let frame = self.frame(None)?;
        self.renderer.draw(&frame)?;

        tracing::debug!(points = self.states.len(), "Supply chart mounted");
        Ok(())
    }

    /// Redraw with a crosshair at pixel `x` and return the tooltip shown
    pub fn hover(&mut self, x: f64) -> ChartResult<Tooltip> {
        if !self.mounted {
            return Err(ChartError::RendererUnavailable("chart is not mounted".into()));
        }

        let progress = self.options.viewport.x_to_progress(x);
        let frame = self.frame(Some(progress))?;
        let tooltip = frame
            .hover
            .as_ref()
            .map(|(_, tooltip)| tooltip.clone())
            .ok_or_else(|| ChartError::Render("hover frame without tooltip".into()))?;

        self.renderer.draw(&frame)?;
        Ok(tooltip)
    }

    /// Redraw without a crosshair
    pub fn leave(&mut self) -> ChartResult<()> {
        if !self.mounted {
            return Err(ChartError::RendererUnavailable("chart is not mounted".into()));
        }
        let frame = self.frame(None)?;
        self.renderer.draw(&frame)
    }

    /// Project the current series, optionally hovering at progress `t01`
    pub fn frame(&self, hover: Option<f64>) -> ChartResult<ChartFrame> {
        let viewport = self.options.viewport;
        let bands = stacked_areas(&self.states, &viewport, self.total_supply)?;
        let lines = self
            .options
            .lines
            .iter()
            .map(|series| flow_line(&self.samples, *series, &viewport))
            .collect::<ChartResult<Vec<_>>>()?;

        let hover = match hover {
            Some(t01) => {
                let tooltip = Tooltip::at(&self.states, t01, self.total_supply)?;
                let x = crosshair_x(&viewport, tooltip.index, self.states.len());
                Some((x, tooltip))
            }
            None => None,
        };

        Ok(ChartFrame {
            viewport,
            bands,
            lines,
            hover,
        })
    }

    pub fn states(&self) -> &[IntegratedState] {
        &self.states
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    /// Renderer that becomes ready when a signal arrives
    struct GatedRenderer {
        gate: Option<oneshot::Receiver<()>>,
        frames: Vec<ChartFrame>,
    }

    impl GatedRenderer {
        fn new() -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            (
                Self {
                    gate: Some(rx),
                    frames: Vec::new(),
                },
                tx,
            )
        }
    }

    #[async_trait]
    impl ChartRenderer for GatedRenderer {
        async fn ready(&mut self) -> ChartResult<()> {
            if let Some(gate) = self.gate.take() {
                gate.await
                    .map_err(|_| ChartError::RendererUnavailable("gate dropped".into()))?;
            }
            Ok(())
        }

        fn draw(&mut self, frame: &ChartFrame) -> ChartResult<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn chart(renderer: GatedRenderer) -> SupplyChart<GatedRenderer> {
        SupplyChart::new(renderer, &SupplyParams::default(), 60, ChartOptions::default()).unwrap()
    }

    #[tokio::test]
    async fn test_mount_waits_for_ready_signal() {
        let (renderer, ready) = GatedRenderer::new();
        let mut chart = chart(renderer);

        ready.send(()).unwrap();
        chart.mount().await.unwrap();

        assert!(chart.is_mounted());
        assert_eq!(chart.renderer().frames.len(), 1);
        assert!(chart.renderer().frames[0].hover.is_none());
        assert_eq!(chart.renderer().frames[0].bands.len(), 4);
        assert_eq!(chart.renderer().frames[0].lines.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_times_out_without_ready() {
        let (renderer, _ready) = GatedRenderer::new();
        let mut chart = chart(renderer);

        let err = chart.mount().await.unwrap_err();
        assert!(matches!(err, ChartError::RendererUnavailable(_)));
        assert!(!chart.is_mounted());
        assert!(chart.renderer().frames.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_gate_fails_mount() {
        let (renderer, ready) = GatedRenderer::new();
        let mut chart = chart(renderer);
        drop(ready);

        assert!(chart.mount().await.is_err());
    }

    #[tokio::test]
    async fn test_hover_draws_crosshair_frame() {
        let (renderer, ready) = GatedRenderer::new();
        let mut chart = chart(renderer);
        ready.send(()).unwrap();
        chart.mount().await.unwrap();

        // Default viewport plot spans x = 56..704
        let tooltip = chart.hover(704.0).unwrap();
        assert_eq!(tooltip.index, 59);

        let frame = chart.renderer().frames.last().unwrap();
        let (x, _) = frame.hover.as_ref().unwrap();
        assert_eq!(*x, 704.0);

        chart.leave().unwrap();
        assert!(chart.renderer().frames.last().unwrap().hover.is_none());
        assert_eq!(chart.into_renderer().frames.len(), 3);
    }

    #[test]
    fn test_hover_before_mount_is_rejected() {
        let (renderer, _ready) = GatedRenderer::new();
        let mut chart = chart(renderer);

        assert!(chart.hover(100.0).is_err());
        assert!(chart.leave().is_err());
    }

    #[test]
    fn test_invalid_params_surface_as_model_error() {
        let (renderer, _ready) = GatedRenderer::new();
        let mut params = SupplyParams::default();
        params.rates.hub_fee_rate = 2.0;

        let result = SupplyChart::new(renderer, &params, 60, ChartOptions::default());
        assert!(matches!(result, Err(ChartError::Model(_))));
    }
}

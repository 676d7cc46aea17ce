// charts/src/lib.rs

//! Supply chart projection and playback
//!
//! This crate turns the integrated UAP supply series into chart geometry:
//! - Stacked-area bands for reserved, circulating, treasury and burned supply
//! - Polylines for instantaneous flows
//! - Hover tooltips snapped to the nearest tick
//! - A renderer seam with an SVG implementation
//! - Cancellable step animations for replaying the series

pub mod animation;
pub mod geometry;
pub mod renderer;
pub mod scale;
pub mod svg;
pub mod tooltip;

pub use animation::{AnimationHandle, AnimationPlan, AnimationScheduler, Easing, Frame, Tween};
pub use geometry::{flow_line, stacked_areas, AreaBand, FlowLine, FlowSeries, Point, StateBucket};
pub use renderer::{ChartFrame, ChartOptions, ChartRenderer, SupplyChart};
pub use scale::{LinearScale, Padding, Viewport};
pub use svg::{Color, Palette, SvgRenderer};
pub use tooltip::{format_compact, Tooltip, TooltipRow};

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

/// Errors that can occur while projecting or rendering charts
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Empty series: {0}")]
    EmptySeries(String),

    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid animation: {0}")]
    InvalidAnimation(String),

    #[error("Model error: {0}")]
    Model(#[from] tokenomics::TokenomicsError),
}

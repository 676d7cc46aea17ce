// charts/src/svg.rs

use crate::geometry::{FlowSeries, StateBucket};
use crate::renderer::{ChartFrame, ChartRenderer};
use crate::tooltip::Tooltip;
use crate::{ChartError, ChartResult};
use async_trait::async_trait;
use std::fmt::Write;

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Color {
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let channel = |c: u8| -> u8 {
            let c = c as f32;
            (c + (255.0 - c) * amount).round() as u8
        };

        Self {
            red: channel(self.red),
            green: channel(self.green),
            blue: channel(self.blue),
        }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Colors used for bands and lines
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub axis: Color,
    pub text: Color,
    /// Fill opacity of the stacked bands
    pub band_opacity: f32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(12, 14, 24),
            axis: Color::from_rgb_u8(70, 76, 99),
            text: Color::from_rgb_u8(214, 218, 232),
            band_opacity: 0.85,
        }
    }
}

impl Palette {
    pub fn bucket(&self, bucket: StateBucket) -> Color {
        match bucket {
            StateBucket::Burned => Color::from_rgb_u8(239, 83, 80),
            StateBucket::Treasury => Color::from_rgb_u8(171, 71, 188),
            StateBucket::Circulating => Color::from_rgb_u8(38, 198, 218),
            StateBucket::Reserved => Color::from_rgb_u8(92, 107, 192),
        }
    }

    pub fn series(&self, series: FlowSeries) -> Color {
        match series {
            FlowSeries::Claimed => Color::from_rgb_u8(102, 187, 106),
            FlowSeries::TotalSpend | FlowSeries::UpgradeSpend | FlowSeries::BreedingSpend => {
                Color::from_rgb_u8(255, 202, 40)
            }
            FlowSeries::BurnFromSpend => self.bucket(StateBucket::Burned).lighten(0.3),
            FlowSeries::TreasuryFromSpend => self.bucket(StateBucket::Treasury).lighten(0.3),
            FlowSeries::DexSellTax | FlowSeries::HubFee => Color::from_rgb_u8(255, 138, 101),
            FlowSeries::CirculatingDelta => self.bucket(StateBucket::Circulating).lighten(0.3),
        }
    }
}

/// Renders frames into a standalone SVG document
#[derive(Debug, Default)]
pub struct SvgRenderer {
    palette: Palette,
    document: Option<String>,
    frames_drawn: usize,
}

impl SvgRenderer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            document: None,
            frames_drawn: 0,
        }
    }

    /// Last drawn document
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames_drawn
    }
}

#[async_trait]
impl ChartRenderer for SvgRenderer {
    async fn ready(&mut self) -> ChartResult<()> {
        Ok(())
    }

    fn draw(&mut self, frame: &ChartFrame) -> ChartResult<()> {
        let document = render_document(frame, &self.palette)?;
        self.document = Some(document);
        self.frames_drawn += 1;
        Ok(())
    }
}

/// Serialize a frame to SVG markup
pub fn render_document(frame: &ChartFrame, palette: &Palette) -> ChartResult<String> {
    let vp = &frame.viewport;
    let mut svg = String::new();

    write_frame(&mut svg, frame, palette)
        .map_err(|e| ChartError::Render(format!("svg write failed: {}", e)))?;

    tracing::trace!(
        width = vp.width,
        height = vp.height,
        bytes = svg.len(),
        "Rendered SVG frame"
    );
    Ok(svg)
}

fn write_frame(svg: &mut String, frame: &ChartFrame, palette: &Palette) -> std::fmt::Result {
    let vp = &frame.viewport;

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = vp.width,
        h = vp.height
    )?;
    writeln!(
        svg,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        palette.background.hex()
    )?;

    writeln!(svg, r#"  <g class="supply-bands">"#)?;
    for band in &frame.bands {
        let color = palette.bucket(band.bucket);
        writeln!(
            svg,
            r#"    <path class="band {}" d="{}" fill="{}" fill-opacity="{:.2}"/>"#,
            band.bucket.label().to_lowercase(),
            band.path_data(),
            color.hex(),
            palette.band_opacity
        )?;
    }
    writeln!(svg, "  </g>")?;

    writeln!(svg, r#"  <g class="flow-lines" fill="none" stroke-width="2">"#)?;
    for line in &frame.lines {
        writeln!(
            svg,
            r#"    <path class="line" data-series="{}" d="{}" stroke="{}"/>"#,
            line.series.label(),
            line.path_data(),
            palette.series(line.series).hex()
        )?;
    }
    writeln!(svg, "  </g>")?;

    let baseline = vp.height - vp.padding.bottom;
    writeln!(
        svg,
        r#"  <line class="axis" x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}"/>"#,
        vp.padding.left,
        baseline,
        vp.width - vp.padding.right,
        baseline,
        palette.axis.hex()
    )?;

    if let Some((x, tooltip)) = &frame.hover {
        write_hover(svg, *x, tooltip, frame, palette)?;
    }

    writeln!(svg, "</svg>")
}

fn write_hover(
    svg: &mut String,
    x: f64,
    tooltip: &Tooltip,
    frame: &ChartFrame,
    palette: &Palette,
) -> std::fmt::Result {
    let vp = &frame.viewport;

    writeln!(
        svg,
        r#"  <line class="crosshair" x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{}" stroke-dasharray="4 4"/>"#,
        vp.padding.top,
        vp.height - vp.padding.bottom,
        palette.text.hex(),
        x = x
    )?;

    // Flip the box to the left of the crosshair past the plot midpoint
    let box_x = if x > vp.width / 2.0 { x - 190.0 } else { x + 10.0 };
    writeln!(
        svg,
        r#"  <g class="tooltip" transform="translate({:.2},{:.2})" fill="{}" font-size="11">"#,
        box_x,
        vp.padding.top + 4.0,
        palette.text.hex()
    )?;
    writeln!(svg, r#"    <text y="0">Progress {}</text>"#, tooltip.progress_label())?;
    for (i, row) in tooltip.buckets.iter().chain(&tooltip.flows).enumerate() {
        writeln!(
            svg,
            r#"    <text y="{}">{}: {}</text>"#,
            (i + 1) * 14,
            xml_escape(&row.label),
            row.display
        )?;
    }
    writeln!(svg, "  </g>")
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

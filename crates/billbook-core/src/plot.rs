//! PNG rendering of chart series
//!
//! Panels are stacked top to bottom in rate, usage, amount order. Each panel
//! shows the monthly values as a blue line with point markers and, when a
//! trend exists, the fitted line in red. The image carries no text; titles
//! and axis labels travel alongside it in [`ChartData`].

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::chart::{ChartData, ChartPanel};
use crate::error::{Error, Result};

/// Default image size in pixels (width, height)
pub const DEFAULT_CHART_SIZE: (u32, u32) = (900, 1200);

/// Content type for rendered charts
pub const PNG_CONTENT_TYPE: &str = "image/png";

const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const TREND_COLOR: RGBColor = RGBColor(214, 39, 40);
const GRID_COLOR: RGBColor = RGBColor(225, 225, 225);
const GRID_LINES: usize = 4;

fn chart_error(e: impl std::fmt::Display) -> Error {
    Error::Chart(e.to_string())
}

/// Render a chart as a PNG image
///
/// An empty chart still renders: every panel is drawn as an empty frame.
pub fn render_png(chart: &ChartData, (width, height): (u32, u32)) -> Result<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "Chart size must be non-zero, got {}x{}",
            width, height
        )));
    }

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let areas = root.split_evenly((chart.panels.len().max(1), 1));
        for (panel, area) in chart.panels.iter().zip(areas.iter()) {
            draw_panel(area, panel)?;
        }
        root.present().map_err(chart_error)?;
    }

    encode_png(&pixels, width, height)
}

fn draw_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, panel: &ChartPanel) -> Result<()> {
    let months = panel.values.len().max(1) as f64;
    let (x_lo, x_hi) = (-0.5, months - 0.5);
    let (y_lo, y_hi) = value_bounds(panel);

    let mut ctx = ChartBuilder::on(area)
        .margin(20)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(chart_error)?;

    ctx.draw_series((1..GRID_LINES).map(|i| {
        let y = y_lo + (y_hi - y_lo) * i as f64 / GRID_LINES as f64;
        PathElement::new(vec![(x_lo, y), (x_hi, y)], GRID_COLOR)
    }))
    .map_err(chart_error)?;

    ctx.draw_series(std::iter::once(Rectangle::new(
        [(x_lo, y_lo), (x_hi, y_hi)],
        BLACK.stroke_width(1),
    )))
    .map_err(chart_error)?;

    let points: Vec<(f64, f64)> = panel
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();

    if let Some(trend) = &panel.trend {
        ctx.draw_series(LineSeries::new(
            trend.iter().enumerate().map(|(i, v)| (i as f64, *v)),
            TREND_COLOR.stroke_width(2),
        ))
        .map_err(chart_error)?;
    }

    ctx.draw_series(LineSeries::new(points.iter().copied(), SERIES_COLOR.stroke_width(2)))
        .map_err(chart_error)?;
    ctx.draw_series(
        points
            .iter()
            .map(|p| Circle::new(*p, 4, SERIES_COLOR.filled())),
    )
    .map_err(chart_error)?;

    Ok(())
}

/// Y range covering the values and the trend, padded by a tenth
fn value_bounds(panel: &ChartPanel) -> (f64, f64) {
    let (min, max) = panel
        .values
        .iter()
        .chain(panel.trend.iter().flatten())
        .copied()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if min > max {
        return (0.0, 1.0);
    }
    let pad = if max > min {
        (max - min) * 0.1
    } else {
        max.abs().max(1.0) * 0.1
    };
    (min - pad, max + pad)
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header().map_err(chart_error)?;
        writer.write_image_data(pixels).map_err(chart_error)?;
        writer.finish().map_err(chart_error)?;
    }
    Ok(out)
}

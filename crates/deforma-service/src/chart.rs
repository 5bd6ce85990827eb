//! Line chart rendering for the graph endpoint.
//!
//! Renders a time/value series to a PNG entirely in process with
//! charts-rs, which ships its own fonts, so the service draws charts
//! in headless environments too.

use charts_rs::{LineChart, Series, svg_to_png};

/// Chart rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The chart engine failed to produce an image.
    #[error("Chart rendering failed: {0}")]
    Render(String),
}

const WIDTH: f32 = 1000.0;
const HEIGHT: f32 = 500.0;

/// At most this many x-axis tick labels are drawn; the rest stay
/// empty so long ranges remain readable.
const MAX_X_LABELS: usize = 8;

/// Render a sensor's time/value series as a PNG line chart.
pub fn render_png(sensor: &str, points: &[(String, f64)]) -> Result<Vec<u8>, ChartError> {
    let values: Vec<f32> = points.iter().map(|(_, v)| *v as f32).collect();

    let mut chart = LineChart::new(
        vec![Series::new(sensor.to_string(), values)],
        x_labels(points),
    );
    chart.width = WIDTH;
    chart.height = HEIGHT;
    chart.title_text = format!("Sensor {sensor} deformation");
    chart.sub_title_text = "Value over time".to_string();

    let svg = chart
        .svg()
        .map_err(|e| ChartError::Render(e.to_string()))?;
    svg_to_png(&svg).map_err(|e| ChartError::Render(e.to_string()))
}

fn x_labels(points: &[(String, f64)]) -> Vec<String> {
    let step = points.len().div_ceil(MAX_X_LABELS).max(1);
    points
        .iter()
        .enumerate()
        .map(|(i, (time, _))| {
            if i % step == 0 {
                time.clone()
            } else {
                String::new()
            }
        })
        .collect()
}

//! Terminal chart backend: each chart prints as a bar table.

#![allow(clippy::print_stdout)]

use arcane_storefront::views::{ChartBackend, ChartCanvas, ChartConfig};

const BAR_WIDTH: f64 = 30.0;

/// Prints every created chart. Printed charts cannot be taken back, so
/// destroying one is a no-op.
#[derive(Debug, Default)]
pub struct TableCharts {
    printed: usize,
}

impl ChartBackend for TableCharts {
    type Chart = usize;

    fn create(&mut self, _canvas: ChartCanvas, config: &ChartConfig) -> usize {
        for line in table(config) {
            println!("{line}");
        }
        println!();
        self.printed += 1;
        self.printed
    }

    fn destroy(&mut self, chart: usize) {
        tracing::debug!(chart, "Chart replaced");
    }
}

/// Render a bar chart as lines of text.
fn table(config: &ChartConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for dataset in &config.data.datasets {
        lines.push(dataset.label.to_owned());

        let scale_max = config.options.scales.y.max.map_or_else(
            || dataset.data.iter().copied().fold(0.0, f64::max),
            f64::from,
        );
        let width = config
            .data
            .labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(0);

        for (label, value) in config.data.labels.iter().zip(&dataset.data) {
            lines.push(format!("  {label:<width$} {} {value}", bar(*value, scale_max)));
        }
    }
    lines
}

fn bar(value: f64, scale_max: f64) -> String {
    if scale_max <= 0.0 {
        return String::new();
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=BAR_WIDTH
    let filled = (value / scale_max * BAR_WIDTH).round().clamp(0.0, BAR_WIDTH) as usize;
    "█".repeat(filled)
}

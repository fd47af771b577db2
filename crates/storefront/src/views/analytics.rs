//! Stock, sales and rating charts.
//!
//! Chart drawing is delegated to a [`ChartBackend`]. Each render builds the
//! three datasets from a fresh catalog listing and the local ledgers, destroys
//! whatever charts the previous render created, then creates new ones.

use std::collections::BTreeMap;

use arcane_core::{MAX_STARS, Product, ProductId};
use serde::Serialize;

use crate::api::ProductCatalog;
use crate::storage::KeyValueStore;
use crate::stores::{ReviewStore, SalesLedger};

pub const STOCK_LABEL: &str = "Stock";
pub const UNITS_SOLD_LABEL: &str = "Units Sold";
pub const AVG_RATING_LABEL: &str = "Avg Rating (0–5)";

/// Chart slot on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartCanvas {
    Stock,
    Sales,
    Reviews,
}

impl ChartCanvas {
    pub const ALL: [Self; 3] = [Self::Stock, Self::Sales, Self::Reviews];
}

/// Bar chart description, serialized in the shape chart libraries accept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: &'static str,
    pub data: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u8>,
}

impl ChartConfig {
    fn bar(labels: Vec<String>, label: &'static str, data: Vec<f64>, max: Option<u8>) -> Self {
        Self {
            kind: "bar",
            data: ChartData {
                labels,
                datasets: vec![Dataset { label, data }],
            },
            options: ChartOptions {
                responsive: true,
                scales: Scales {
                    y: Axis {
                        begin_at_zero: true,
                        max,
                    },
                },
            },
        }
    }
}

/// Draws charts.
pub trait ChartBackend {
    /// Handle to a live chart.
    type Chart;

    fn create(&mut self, canvas: ChartCanvas, config: &ChartConfig) -> Self::Chart;

    fn destroy(&mut self, chart: Self::Chart);
}

/// Per-product series, in catalog order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsDatasets {
    /// Product names.
    pub labels: Vec<String>,
    pub stock: Vec<u32>,
    pub units_sold: Vec<u64>,
    /// Mean rating rounded to two decimals.
    pub avg_ratings: Vec<f64>,
}

/// Build the three series from a catalog listing and the local ledgers.
pub fn build_datasets(
    products: &[Product],
    sales: &BTreeMap<ProductId, u64>,
    average_rating: impl Fn(&ProductId) -> f64,
) -> AnalyticsDatasets {
    AnalyticsDatasets {
        labels: products.iter().map(|p| p.name.clone()).collect(),
        stock: products.iter().map(|p| p.stock).collect(),
        units_sold: products
            .iter()
            .map(|p| sales.get(&p.id).copied().unwrap_or(0))
            .collect(),
        avg_ratings: products
            .iter()
            .map(|p| round_to_hundredths(average_rating(&p.id)))
            .collect(),
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl AnalyticsDatasets {
    /// Chart for one slot.
    #[must_use]
    pub fn chart(&self, canvas: ChartCanvas) -> ChartConfig {
        let labels = self.labels.clone();
        match canvas {
            ChartCanvas::Stock => ChartConfig::bar(
                labels,
                STOCK_LABEL,
                self.stock.iter().copied().map(f64::from).collect(),
                None,
            ),
            ChartCanvas::Sales => {
                #[allow(clippy::cast_precision_loss)] // unit counts stay far below 2^53
                let data = self.units_sold.iter().map(|&units| units as f64).collect();
                ChartConfig::bar(labels, UNITS_SOLD_LABEL, data, None)
            }
            ChartCanvas::Reviews => ChartConfig::bar(
                labels,
                AVG_RATING_LABEL,
                self.avg_ratings.clone(),
                Some(MAX_STARS),
            ),
        }
    }
}

struct LiveCharts<T> {
    stock: Option<T>,
    sales: Option<T>,
    reviews: Option<T>,
}

impl<T> LiveCharts<T> {
    const fn slot(&mut self, canvas: ChartCanvas) -> &mut Option<T> {
        match canvas {
            ChartCanvas::Stock => &mut self.stock,
            ChartCanvas::Sales => &mut self.sales,
            ChartCanvas::Reviews => &mut self.reviews,
        }
    }
}

/// Analytics controller.
pub struct AnalyticsView<S: ?Sized, C, B: ChartBackend> {
    catalog: C,
    sales: SalesLedger<S>,
    reviews: ReviewStore<S>,
    backend: B,
    live: LiveCharts<B::Chart>,
    rendered: AnalyticsDatasets,
}

impl<S, C, B> AnalyticsView<S, C, B>
where
    S: KeyValueStore + ?Sized,
    C: ProductCatalog,
    B: ChartBackend,
{
    pub const fn new(catalog: C, sales: SalesLedger<S>, reviews: ReviewStore<S>, backend: B) -> Self {
        Self {
            catalog,
            sales,
            reviews,
            backend,
            live: LiveCharts {
                stock: None,
                sales: None,
                reviews: None,
            },
            rendered: AnalyticsDatasets {
                labels: Vec::new(),
                stock: Vec::new(),
                units_sold: Vec::new(),
                avg_ratings: Vec::new(),
            },
        }
    }

    /// Rebuild every chart from fresh data.
    pub async fn render(&mut self) -> &AnalyticsDatasets {
        let products = self.catalog.list_products().await;
        let sales = self.sales.read();
        self.rendered = build_datasets(&products, &sales, |id| self.reviews.average_rating(id));

        for canvas in ChartCanvas::ALL {
            if let Some(old) = self.live.slot(canvas).take() {
                self.backend.destroy(old);
            }
        }
        for canvas in ChartCanvas::ALL {
            let chart = self.backend.create(canvas, &self.rendered.chart(canvas));
            *self.live.slot(canvas) = Some(chart);
        }

        tracing::debug!(products = products.len(), "Charts rendered");
        &self.rendered
    }

    /// The last rendered datasets.
    pub const fn datasets(&self) -> &AnalyticsDatasets {
        &self.rendered
    }

    pub const fn backend(&self) -> &B {
        &self.backend
    }
}

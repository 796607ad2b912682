//! Item detail popup state and the price history chart data behind it.

use tracing::debug;

use crate::format::{format_item_name, format_price, icon_url};
use crate::model::{History, HistoryEntry, Item};

/// Series for the history chart. x is seconds since the epoch.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceChart {
    pub material: String,
    pub entries: Vec<HistoryEntry>,
    pub avg: Vec<(f64, f64)>,
    pub min: Vec<(f64, f64)>,
    pub max: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl PriceChart {
    /// Sorts the hourly entries ascending before building the series.
    pub fn from_history(material: &str, mut history: History) -> Self {
        history.sort_hourly();

        let mut avg = Vec::with_capacity(history.hourly.len());
        let mut min = Vec::with_capacity(history.hourly.len());
        let mut max = Vec::with_capacity(history.hourly.len());
        for entry in &history.hourly {
            let Some(time) = entry.time() else {
                continue;
            };
            let x = time.and_utc().timestamp() as f64;
            avg.push((x, entry.avg_price));
            min.push((x, entry.min_price));
            max.push((x, entry.max_price));
        }

        let x_bounds = match (avg.first(), avg.last()) {
            (Some(first), Some(last)) if last.0 > first.0 => [first.0, last.0],
            (Some(first), _) => [first.0 - 1.0, first.0 + 1.0],
            _ => [0.0, 1.0],
        };

        let low = min.iter().chain(avg.iter()).map(|p| p.1).fold(f64::INFINITY, f64::min);
        let high = max.iter().chain(avg.iter()).map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let y_bounds = if low.is_finite() && high.is_finite() && high > low {
            [low * 0.98, high * 1.02]
        } else if low.is_finite() {
            [low - 1.0, low + 1.0]
        } else {
            [0.0, 1.0]
        };

        PriceChart {
            material: material.to_string(),
            entries: history.hourly,
            avg,
            min,
            max,
            x_bounds,
            y_bounds,
        }
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.avg.is_empty()
    }
}

/// Everything the detail popup shows. The text fields are known as soon as
/// an item is selected; the chart arrives later, if at all.
#[derive(Clone, Debug)]
pub struct Detail {
    pub material: String,
    pub name: String,
    pub category: String,
    pub icon_url: String,
    pub buy_price: String,
    pub sell_price: String,
    pub buy_orders: String,
    pub sell_orders: String,
    chart: Option<PriceChart>,
}

impl Detail {
    pub fn new(item: &Item) -> Self {
        Detail {
            material: item.material.clone(),
            name: format_item_name(&item.material),
            category: item.category.clone(),
            icon_url: icon_url(&item.material),
            buy_price: format_price(item.buy_price),
            sell_price: format_price(item.sell_price),
            buy_orders: format!("{} active buy orders", item.buy_orders),
            sell_orders: format!("{} active sell orders", item.sell_orders),
            chart: None,
        }
    }

    pub fn chart(&self) -> Option<&PriceChart> {
        self.chart.as_ref()
    }

    /// Tears down the current chart before installing the new one.
    pub fn show_history(&mut self, history: History) {
        if let Some(old) = self.chart.take() {
            debug!(material = %old.material, "replacing price chart");
        }
        self.chart = Some(PriceChart::from_history(&self.material, history));
    }
}

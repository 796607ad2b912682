use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// One tradeable material as published in `prices.json`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub material: String,
    pub category: String,
    #[serde(default)]
    pub buy_price: f64,
    #[serde(default)]
    pub sell_price: f64,
    #[serde(default)]
    pub buy_orders: u64,
    #[serde(default)]
    pub sell_orders: u64,
}

/// Category and search constraints as currently chosen in the UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub selected_category: Option<String>,
    pub search_term: String,
}

/// One hourly bucket of trades for a single item.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(default)]
    pub avg_price: f64,
    #[serde(default)]
    pub min_price: f64,
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub transactions: u64,
    #[serde(default)]
    pub items: u64,
}

impl HistoryEntry {
    /// Accepts both zone-less (`2024-01-01T00:00:00`) and RFC 3339 timestamps.
    pub fn time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.timestamp)
    }
}

pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
}

/// `history/{material}.json`
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct History {
    #[serde(rename = "HOURLY", default)]
    pub hourly: Vec<HistoryEntry>,
}

impl History {
    /// Stable ascending sort by timestamp. Entries whose timestamp cannot be
    /// parsed sort first, keeping their received order.
    pub fn sort_hourly(&mut self) {
        self.hourly.sort_by_key(|entry| entry.time());
    }
}

use serde::{Deserialize, Serialize};

use super::aggregator::DepthBook;
use crate::market::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub price: f64,
    pub listing_count: usize,
    pub total_volume: f64,
    pub bar_length: u32,
}

/// Display model for one side, independent of the output format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub side: Side,
    pub title: String,
    pub color: String,
    pub total_volume: f64,
    pub rows: Vec<ReportRow>,
    /// Set when extraction faulted; rows then hold whatever was collected
    /// before the fault.
    pub failure: Option<String>,
}

impl Report {
    pub fn build(book: &DepthBook, scale: u32, failure: Option<String>) -> Self {
        let rows = book
            .groups
            .iter()
            .map(|group| ReportRow {
                price: group.price,
                listing_count: group.listing_count,
                total_volume: group.total_volume,
                bar_length: bar_length(group.total_volume, book.total_volume, scale),
            })
            .collect();

        Self {
            side: book.side,
            title: book.side.title().to_string(),
            color: book.side.color().to_string(),
            total_volume: book.total_volume,
            rows,
            failure,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `floor(group / total * scale)`, and 0 whenever the total is zero.
pub fn bar_length(group_volume: f64, total_volume: f64, scale: u32) -> u32 {
    if !(total_volume.is_finite() && total_volume > 0.0) {
        return 0;
    }

    let length = (group_volume / total_volume * f64::from(scale)).floor();
    if length.is_finite() && length > 0.0 {
        length.min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}

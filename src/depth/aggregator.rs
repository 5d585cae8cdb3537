use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::market::{NormalizedListing, RawListing, Side, SortDirection};

/// All listings sharing one exact price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceGroup {
    pub price: f64,
    pub total_volume: f64,
    pub listing_count: usize,
}

/// One side's listings grouped by price, already in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBook {
    pub side: Side,
    pub groups: Vec<PriceGroup>,
    pub total_volume: f64,
    /// Records discarded because price or amount was missing or zero.
    pub dropped: usize,
}

impl DepthBook {
    pub fn empty(side: Side) -> Self {
        Self {
            side,
            groups: Vec::new(),
            total_volume: 0.0,
            dropped: 0,
        }
    }

    pub fn listing_count(&self) -> usize {
        self.groups.iter().map(|g| g.listing_count).sum()
    }

    pub fn best_price(&self) -> Option<f64> {
        self.groups.first().map(|g| g.price)
    }
}

/// Groups listings by exact `f64` price.
///
/// Keys are the bit patterns of the parsed prices: `6.9` and `6.90` merge
/// because they parse to the same float, but nothing is rounded, so two
/// prices differing only in the last ulp stay separate groups.
pub fn aggregate<I>(side: Side, listings: I) -> DepthBook
where
    I: IntoIterator<Item = NormalizedListing>,
{
    let mut groups: HashMap<u64, PriceGroup> = HashMap::new();
    let mut dropped = 0;

    for listing in listings {
        if !is_usable(listing.price) || !is_usable(listing.amount) {
            dropped += 1;
            continue;
        }

        let group = groups
            .entry(listing.price.to_bits())
            .or_insert_with(|| PriceGroup {
                price: listing.price,
                total_volume: 0.0,
                listing_count: 0,
            });
        group.total_volume += listing.amount;
        group.listing_count += 1;
    }

    let mut groups: Vec<PriceGroup> = groups.into_values().collect();
    match side.sort_direction() {
        SortDirection::Ascending => groups.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortDirection::Descending => groups.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    // Summed in display order so the rows add up to the header figure exactly.
    // Folded from +0.0: an empty `Sum` of f64 is -0.0.
    let total_volume = groups.iter().fold(0.0, |acc, g| acc + g.total_volume);

    DepthBook {
        side,
        groups,
        total_volume,
        dropped,
    }
}

/// Normalizes scraped cards and aggregates the usable ones.
pub fn aggregate_raw(side: Side, listings: &[RawListing]) -> DepthBook {
    let normalized: Vec<NormalizedListing> = listings
        .iter()
        .filter_map(NormalizedListing::from_raw)
        .collect();
    let unparsable = listings.len() - normalized.len();

    let mut book = aggregate(side, normalized);
    book.dropped += unparsable;
    book
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value != 0.0
}

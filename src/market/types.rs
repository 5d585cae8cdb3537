use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalizer::normalize;

/// Which half of the P2P book a listing belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Merchants selling the asset (asks). Cheapest first.
    Offer,
    /// Merchants buying the asset (bids). Highest first.
    Demand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Offer, Side::Demand];

    /// Order-book convention: best ask (lowest) and best bid (highest) first.
    pub const fn sort_direction(self) -> SortDirection {
        match self {
            Side::Offer => SortDirection::Ascending,
            Side::Demand => SortDirection::Descending,
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Side::Offer => "green",
            Side::Demand => "red",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Side::Offer => "🟢 Offers (sell ads)",
            Side::Demand => "🔴 Demand (buy ads)",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Side::Offer => "offer",
            Side::Demand => "demand",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One ad card exactly as read off the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub merchant: String,
    pub raw_price: Option<String>,
    pub raw_amount: Option<String>,
    /// Order limit range such as "300 - 1000 BOB"; informational only.
    pub raw_limits: Option<String>,
    pub side: Side,
    pub page: u32,
}

impl RawListing {
    pub fn new(side: Side, page: u32, price: &str, amount: &str) -> Self {
        Self {
            merchant: "N/A".to_string(),
            raw_price: Some(price.to_string()),
            raw_amount: Some(amount.to_string()),
            raw_limits: None,
            side,
            page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub price: f64,
    pub amount: f64,
    pub side: Side,
}

impl NormalizedListing {
    /// Returns `None` unless both price and amount parse to finite, non-zero
    /// numbers.
    pub fn new(price: Option<f64>, amount: Option<f64>, side: Side) -> Option<Self> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        match (price, amount) {
            (Some(price), Some(amount)) if usable(price) && usable(amount) => Some(Self {
                price,
                amount,
                side,
            }),
            _ => None,
        }
    }

    pub fn from_raw(raw: &RawListing) -> Option<Self> {
        let price = raw.raw_price.as_deref().and_then(normalize);
        let amount = raw.raw_amount.as_deref().and_then(normalize);
        Self::new(price, amount, raw.side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_policy() {
        assert_eq!(Side::Offer.sort_direction(), SortDirection::Ascending);
        assert_eq!(Side::Demand.sort_direction(), SortDirection::Descending);
    }

    #[test]
    fn test_from_raw_filters_unusable_records() {
        let ok = RawListing::new(Side::Offer, 1, "6.90 BOB", "1,200.50 USDT");
        let normalized = NormalizedListing::from_raw(&ok).unwrap();
        assert_eq!(normalized.price, 6.90);
        assert_eq!(normalized.amount, 1200.50);

        let zero_amount = RawListing::new(Side::Offer, 1, "6.90", "0.00");
        assert!(NormalizedListing::from_raw(&zero_amount).is_none());

        let missing_price = RawListing {
            raw_price: None,
            ..RawListing::new(Side::Demand, 2, "", "100")
        };
        assert!(NormalizedListing::from_raw(&missing_price).is_none());

        let garbage = RawListing::new(Side::Demand, 1, "N/A", "100");
        assert!(NormalizedListing::from_raw(&garbage).is_none());
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::Demand).unwrap(), "\"demand\"");
    }
}

pub mod bitget;
pub mod cards;
pub mod policy;
pub mod webdriver;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::market::{RawListing, Side};

pub use bitget::{BitgetScraper, Pacing};
pub use cards::parse_cards;
pub use policy::best_effort;
pub use webdriver::{WebDriverClient, WebDriverSession};

/// What one side's extraction produced. A fault never discards what was
/// already collected: `failure` is set and `listings` holds the partial
/// result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub side: Side,
    pub listings: Vec<RawListing>,
    pub pages_visited: u32,
    pub failure: Option<String>,
}

impl Extraction {
    pub fn complete(side: Side, listings: Vec<RawListing>, pages_visited: u32) -> Self {
        Self {
            side,
            listings,
            pages_visited,
            failure: None,
        }
    }

    pub fn failed(
        side: Side,
        listings: Vec<RawListing>,
        pages_visited: u32,
        failure: impl ToString,
    ) -> Self {
        Self {
            side,
            listings,
            pages_visited,
            failure: Some(failure.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

/// Source of raw listings for one side of the market.
///
/// Implementations must be total: faults are reported through
/// `Extraction::failure`, never by panicking or dropping partial data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn extract(&self, side: Side) -> Extraction;
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::metrics::DashboardMetrics;
use crate::core::{DisplayConfig, HealthChecker};
use crate::depth::{aggregate_raw, Report};
use crate::extractor::{Extraction, ListingSource};
use crate::market::Side;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideReport {
    pub report: Report,
    /// Top of the book: lowest ask for offers, highest bid for demand.
    pub best_price: Option<f64>,
    pub listings_scraped: usize,
    pub listings_dropped: usize,
    pub pages_visited: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    pub generated_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub offer: SideReport,
    pub demand: SideReport,
}

impl DepthSnapshot {
    pub fn sides(&self) -> [&SideReport; 2] {
        [&self.offer, &self.demand]
    }
}

/// Runs one full extract → aggregate → report cycle per call. Nothing is
/// cached between calls.
pub struct DepthService {
    source: Arc<dyn ListingSource>,
    display: DisplayConfig,
    health: HealthChecker,
    metrics: Arc<DashboardMetrics>,
}

impl DepthService {
    pub fn new(
        source: Arc<dyn ListingSource>,
        display: DisplayConfig,
        health: HealthChecker,
        metrics: Arc<DashboardMetrics>,
    ) -> Self {
        Self {
            source,
            display,
            health,
            metrics,
        }
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub async fn snapshot(&self) -> DepthSnapshot {
        let started = Instant::now();

        // both sides scrape concurrently; they share nothing but the source
        let (offer, demand) = tokio::join!(
            self.source.extract(Side::Offer),
            self.source.extract(Side::Demand)
        );

        let offer = self.summarize(Side::Offer, offer).await;
        let demand = self.summarize(Side::Demand, demand).await;

        let elapsed = started.elapsed();
        self.metrics.record_cycle(elapsed);

        info!(
            "📊 Depth cycle done in {}ms: offer {} levels / {:.0} {}, demand {} levels / {:.0} {}",
            elapsed.as_millis(),
            offer.report.rows.len(),
            offer.report.total_volume,
            self.display.asset,
            demand.report.rows.len(),
            demand.report.total_volume,
            self.display.asset
        );

        DepthSnapshot {
            generated_at: Utc::now(),
            elapsed_ms: elapsed.as_millis() as u64,
            offer,
            demand,
        }
    }

    async fn summarize(&self, side: Side, extraction: Extraction) -> SideReport {
        if extraction.side != side {
            warn!(
                "Listing source answered {} for a {} request; labelling as {}",
                extraction.side, side, side
            );
        }

        self.health
            .record_extraction(side, extraction.failure.as_deref())
            .await;
        if extraction.is_failed() {
            self.metrics.increment_extraction_failures();
        }

        let book = aggregate_raw(side, &extraction.listings);
        self.metrics
            .add_listings(extraction.listings.len(), book.dropped);

        SideReport {
            report: Report::build(&book, self.display.bar_scale, extraction.failure),
            best_price: book.best_price(),
            listings_scraped: extraction.listings.len(),
            listings_dropped: book.dropped,
            pages_visited: extraction.pages_visited,
        }
    }
}

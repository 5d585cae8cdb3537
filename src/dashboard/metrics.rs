use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct DashboardMetrics {
    cycles: AtomicU64,
    extraction_failures: AtomicU64,
    listings_scraped: AtomicU64,
    listings_dropped: AtomicU64,
    total_cycle_ms: AtomicU64,
    start_time: Instant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cycles: u64,
    pub extraction_failures: u64,
    pub listings_scraped: u64,
    pub listings_dropped: u64,
    pub average_cycle_ms: f64,
    pub uptime_secs: u64,
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    pub fn new() -> Self {
        Self {
            cycles: AtomicU64::new(0),
            extraction_failures: AtomicU64::new(0),
            listings_scraped: AtomicU64::new(0),
            listings_dropped: AtomicU64::new(0),
            total_cycle_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_cycle(&self, elapsed: Duration) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
        self.total_cycle_ms
            .fetch_add(elapsed.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn increment_extraction_failures(&self) {
        self.extraction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_listings(&self, scraped: usize, dropped: usize) {
        self.listings_scraped
            .fetch_add(scraped as u64, Ordering::Relaxed);
        self.listings_dropped
            .fetch_add(dropped as u64, Ordering::Relaxed);
    }

    pub fn get_average_cycle_ms(&self) -> f64 {
        let total = self.total_cycle_ms.load(Ordering::Relaxed);
        let cycles = self.cycles.load(Ordering::Relaxed);

        if cycles == 0 {
            0.0
        } else {
            total as f64 / cycles as f64
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cycles: self.cycles.load(Ordering::Relaxed),
            extraction_failures: self.extraction_failures.load(Ordering::Relaxed),
            listings_scraped: self.listings_scraped.load(Ordering::Relaxed),
            listings_dropped: self.listings_dropped.load(Ordering::Relaxed),
            average_cycle_ms: self.get_average_cycle_ms(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

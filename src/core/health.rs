use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::market::Side;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentHealth,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub offer_extraction: bool,
    pub demand_extraction: bool,
    /// Set once at least one report cycle has completed.
    pub has_run: bool,
    pub last_failure: Option<String>,
}

impl ComponentHealth {
    pub fn get(&self, side: Side) -> bool {
        match side {
            Side::Offer => self.offer_extraction,
            Side::Demand => self.demand_extraction,
        }
    }

    pub fn all_healthy(&self) -> bool {
        Side::ALL.iter().all(|&side| self.get(side))
    }
}

#[derive(Clone)]
pub struct HealthChecker {
    start_time: std::time::Instant,
    status: Arc<RwLock<ComponentHealth>>,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            status: Arc::new(RwLock::new(ComponentHealth::default())),
        }
    }

    pub async fn get_status(&self) -> HealthStatus {
        let components = self.status.read().await.clone();

        let status = if !components.has_run {
            "starting"
        } else if components.all_healthy() {
            "healthy"
        } else {
            "degraded"
        };

        HealthStatus {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
        }
    }

    pub async fn record_extraction(&self, side: Side, failure: Option<&str>) {
        let mut status = self.status.write().await;
        status.has_run = true;
        let healthy = failure.is_none();
        match side {
            Side::Offer => status.offer_extraction = healthy,
            Side::Demand => status.demand_extraction = healthy,
        }
        if let Some(reason) = failure {
            status.last_failure = Some(format!("{}: {}", side.label(), reason));
        } else if status.all_healthy() {
            status.last_failure = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starting_until_first_cycle() {
        let checker = HealthChecker::new();
        assert_eq!(checker.get_status().await.status, "starting");
    }

    #[tokio::test]
    async fn test_degraded_when_one_side_fails() {
        let checker = HealthChecker::new();
        checker.record_extraction(Side::Offer, None).await;
        checker
            .record_extraction(Side::Demand, Some("timed out"))
            .await;

        let status = checker.get_status().await;
        assert_eq!(status.status, "degraded");
        assert!(status.components.get(Side::Offer));
        assert!(!status.components.get(Side::Demand));
        assert_eq!(
            status.components.last_failure.as_deref(),
            Some("demand: timed out")
        );
    }

    #[tokio::test]
    async fn test_recovers_to_healthy() {
        let checker = HealthChecker::new();
        checker.record_extraction(Side::Offer, Some("boom")).await;
        checker.record_extraction(Side::Offer, None).await;
        checker.record_extraction(Side::Demand, None).await;

        let status = checker.get_status().await;
        assert_eq!(status.status, "healthy");
        assert_eq!(status.components.last_failure, None);
    }

    #[tokio::test]
    async fn test_failure_kept_while_other_side_still_down() {
        let checker = HealthChecker::new();
        checker.record_extraction(Side::Demand, Some("timed out")).await;
        checker.record_extraction(Side::Offer, None).await;

        let status = checker.get_status().await;
        assert_eq!(status.status, "degraded");
        assert_eq!(
            status.components.last_failure.as_deref(),
            Some("demand: timed out")
        );
    }
}

pub mod config;
pub mod error;
pub mod health;
pub mod logging;

pub use config::{Config, DisplayConfig, ScraperConfig, ServerConfig};
pub use error::ScrapeError;
pub use health::{HealthChecker, HealthStatus};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

pub const DEFAULT_OFFER_URL: &str = "https://www.bitget.com/p2p-trade?paymethodIds=-1&fiatName=BOB";
pub const DEFAULT_DEMAND_URL: &str =
    "https://www.bitget.com/p2p-trade/sell?paymethodIds=-1&fiatName=BOB";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub display: DisplayConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub offer_url: String,
    pub demand_url: String,
    pub webdriver_url: String,
    pub max_pages: u32,
    pub headless: bool,
    pub user_agent: String,
    pub page_load_timeout_ms: u64,
    pub listing_wait_timeout_ms: u64,
    pub popup_timeout_ms: u64,
    pub page_activation_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Number of glyphs a group holding 100% of the volume would get.
    pub bar_scale: u32,
    pub refresh_secs: u64,
    pub fiat: String,
    pub asset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub log_level: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            offer_url: DEFAULT_OFFER_URL.to_string(),
            demand_url: DEFAULT_DEMAND_URL.to_string(),
            webdriver_url: "http://localhost:9515".to_string(),
            max_pages: 2,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            page_load_timeout_ms: 90_000,
            listing_wait_timeout_ms: 60_000,
            popup_timeout_ms: 3_000,
            page_activation_timeout_ms: 10_000,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            bar_scale: 30,
            refresh_secs: 10,
            fiat: "BOB".to_string(),
            asset: "USDT".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for missing or unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let scraper_defaults = ScraperConfig::default();
        let display_defaults = DisplayConfig::default();
        let server_defaults = ServerConfig::default();

        let string = |key: &str, default: String| lookup(key).unwrap_or(default);

        Config {
            scraper: ScraperConfig {
                offer_url: string("OFFER_URL", scraper_defaults.offer_url),
                demand_url: string("DEMAND_URL", scraper_defaults.demand_url),
                webdriver_url: string("WEBDRIVER_URL", scraper_defaults.webdriver_url),
                max_pages: parsed(&lookup, "MAX_PAGES", scraper_defaults.max_pages),
                headless: parsed(&lookup, "HEADLESS", scraper_defaults.headless),
                user_agent: string("USER_AGENT", scraper_defaults.user_agent),
                page_load_timeout_ms: parsed(
                    &lookup,
                    "PAGE_LOAD_TIMEOUT_MS",
                    scraper_defaults.page_load_timeout_ms,
                ),
                listing_wait_timeout_ms: parsed(
                    &lookup,
                    "LISTING_WAIT_TIMEOUT_MS",
                    scraper_defaults.listing_wait_timeout_ms,
                ),
                popup_timeout_ms: parsed(
                    &lookup,
                    "POPUP_TIMEOUT_MS",
                    scraper_defaults.popup_timeout_ms,
                ),
                page_activation_timeout_ms: parsed(
                    &lookup,
                    "PAGE_ACTIVATION_TIMEOUT_MS",
                    scraper_defaults.page_activation_timeout_ms,
                ),
            },
            display: DisplayConfig {
                bar_scale: parsed(&lookup, "BAR_SCALE", display_defaults.bar_scale),
                refresh_secs: parsed(&lookup, "REFRESH_SECS", display_defaults.refresh_secs),
                fiat: string("FIAT", display_defaults.fiat),
                asset: string("ASSET", display_defaults.asset),
            },
            server: ServerConfig {
                port: parsed(&lookup, "PORT", server_defaults.port),
                log_level: string("LOG_LEVEL", server_defaults.log_level),
            },
        }
    }
}

fn parsed<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

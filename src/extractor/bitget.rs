use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use super::cards::{parse_cards, CARD_SELECTOR};
use super::policy::best_effort;
use super::webdriver::{WebDriverClient, WebDriverSession, KEY_ESCAPE};
use super::{Extraction, ListingSource};
use crate::core::{ScrapeError, ScraperConfig};
use crate::market::{RawListing, Side};

const DIALOG_CLOSE_SELECTOR: &str = ".bit-dialog__close";
const COOKIE_ACCEPT_SELECTOR: &str = "[data-testid='MicroCookieAcceptButton']";
const PAGER_ITEM_SELECTOR: &str = ".bit-pager li.number";
const PAGER_ACTIVE_SELECTOR: &str = ".bit-pager li.number.active";

const POPUP_SETTLE_MS: u64 = 4_000;
const INPUT_SETTLE_MS: u64 = 500;
const PAGE_SWITCH_SETTLE_MS: u64 = 1_500;
const EXTRACT_SETTLE_MS: u64 = 1_000;

/// Slack on top of the longest driver-side deadline before the HTTP client
/// gives up on a command.
const HTTP_TIMEOUT_MARGIN_MS: u64 = 30_000;

const HIDE_WEBDRIVER_SCRIPT: &str =
    "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})";

/// Pauses the page needs between interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub popup_settle: Duration,
    pub input_settle: Duration,
    pub page_switch_settle: Duration,
    pub extract_settle: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            popup_settle: Duration::from_millis(POPUP_SETTLE_MS),
            input_settle: Duration::from_millis(INPUT_SETTLE_MS),
            page_switch_settle: Duration::from_millis(PAGE_SWITCH_SETTLE_MS),
            extract_settle: Duration::from_millis(EXTRACT_SETTLE_MS),
        }
    }
}

enum PageSwitch {
    Activated,
    /// The grid would still show the previous page.
    NotActivated,
    /// The pager has no such page; pagination ends.
    Missing,
}

/// Scrapes Bitget's P2P ad hall through a WebDriver-controlled Chromium.
pub struct BitgetScraper {
    config: ScraperConfig,
    client: WebDriverClient,
    pacing: Pacing,
}

impl BitgetScraper {
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        Self::with_pacing(config, Pacing::default())
    }

    pub fn with_pacing(config: ScraperConfig, pacing: Pacing) -> Result<Self, ScrapeError> {
        let client = WebDriverClient::new(&config.webdriver_url, http_timeout(&config))?;
        Ok(Self {
            config,
            client,
            pacing,
        })
    }

    pub fn url_for(&self, side: Side) -> &str {
        match side {
            Side::Offer => &self.config.offer_url,
            Side::Demand => &self.config.demand_url,
        }
    }

    async fn scrape_pages(
        &self,
        session: &WebDriverSession,
        side: Side,
        listings: &mut Vec<RawListing>,
        pages_visited: &mut u32,
    ) -> Result<(), ScrapeError> {
        let url = self.url_for(side);

        session
            .set_page_load_timeout(self.config.page_load_timeout_ms)
            .await?;
        best_effort(
            "hide navigator.webdriver",
            session.add_init_script(HIDE_WEBDRIVER_SCRIPT),
        )
        .await;

        debug!("Navigating to {}", url);
        session.goto(url).await?;

        self.dismiss_popups(session).await;

        session
            .wait_for_visible(CARD_SELECTOR, self.config.listing_wait_timeout_ms)
            .await?;

        for page_num in 1..=self.config.max_pages {
            if page_num > 1 {
                match self.switch_page(session, side, page_num).await? {
                    PageSwitch::Activated => {}
                    PageSwitch::NotActivated => continue,
                    PageSwitch::Missing => break,
                }
            }

            sleep(self.pacing.extract_settle).await;
            let source = session.source().await?;
            let cards = parse_cards(&source, side, page_num);
            debug!(
                "{} page {}: {} cards",
                side.label(),
                page_num,
                cards.len()
            );
            listings.extend(cards);
            *pages_visited += 1;
        }

        Ok(())
    }

    async fn dismiss_popups(&self, session: &WebDriverSession) {
        let timeout_ms = self.config.popup_timeout_ms;

        sleep(self.pacing.popup_settle).await;
        best_effort("press escape", session.press_key(KEY_ESCAPE)).await;
        sleep(self.pacing.input_settle).await;
        best_effort("click outside dialogs", session.click_at(50, 50)).await;
        sleep(self.pacing.input_settle).await;

        best_effort(
            "close dialog",
            session.click_when_visible(DIALOG_CLOSE_SELECTOR, timeout_ms),
        )
        .await;
        best_effort(
            "accept cookies",
            session.click_when_visible(COOKIE_ACCEPT_SELECTOR, timeout_ms),
        )
        .await;
    }

    /// Clicks the pager entry for `page_num` and waits for it to become the
    /// active page.
    async fn switch_page(
        &self,
        session: &WebDriverSession,
        side: Side,
        page_num: u32,
    ) -> Result<PageSwitch, ScrapeError> {
        let label = page_num.to_string();

        let Some(target) = session.find_with_text(PAGER_ITEM_SELECTOR, &label).await? else {
            debug!("{} has no page {}, stopping", side.label(), page_num);
            return Ok(PageSwitch::Missing);
        };

        session.force_click(&target).await?;

        match session
            .wait_for_text(
                PAGER_ACTIVE_SELECTOR,
                &label,
                self.config.page_activation_timeout_ms,
            )
            .await
        {
            Ok(_) => {
                sleep(self.pacing.page_switch_settle).await;
                Ok(PageSwitch::Activated)
            }
            Err(e) if e.is_absent() => {
                warn!(
                    "⚠️ {} page {} did not activate, skipping it: {}",
                    side.label(),
                    page_num,
                    e
                );
                Ok(PageSwitch::NotActivated)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ListingSource for BitgetScraper {
    async fn extract(&self, side: Side) -> Extraction {
        info!("🔍 Extracting {} listings from {}", side.label(), self.url_for(side));

        let mut listings = Vec::new();
        let mut pages_visited = 0;

        let session = match self.client.new_session(chrome_capabilities(&self.config)).await {
            Ok(session) => session,
            Err(e) => {
                error!("❌ Could not start browser for {}: {}", side.label(), e);
                return Extraction::failed(side, listings, pages_visited, e);
            }
        };

        let result = self
            .scrape_pages(&session, side, &mut listings, &mut pages_visited)
            .await;

        let session_id = session.id().to_string();
        if let Err(e) = session.close().await {
            warn!("Failed to close WebDriver session {}: {}", session_id, e);
        }

        match result {
            Ok(()) => {
                info!(
                    "✅ {} extraction done: {} listings over {} pages",
                    side.label(),
                    listings.len(),
                    pages_visited
                );
                Extraction::complete(side, listings, pages_visited)
            }
            Err(e) => {
                error!(
                    "❌ {} extraction failed after {} listings: {}",
                    side.label(),
                    listings.len(),
                    e
                );
                Extraction::failed(side, listings, pages_visited, e)
            }
        }
    }
}

/// HTTP timeout for driver commands: the longest configured deadline plus
/// `HTTP_TIMEOUT_MARGIN_MS`, so the driver's own timeout always fires first.
pub fn http_timeout(config: &ScraperConfig) -> Duration {
    let longest = [
        config.page_load_timeout_ms,
        config.listing_wait_timeout_ms,
        config.popup_timeout_ms,
        config.page_activation_timeout_ms,
    ]
    .into_iter()
    .max()
    .unwrap_or_default();

    Duration::from_millis(longest.saturating_add(HTTP_TIMEOUT_MARGIN_MS))
}

/// Chromium capabilities with the usual automation tells removed.
pub fn chrome_capabilities(config: &ScraperConfig) -> Value {
    let mut args = vec![
        "--disable-blink-features=AutomationControlled".to_string(),
        "--disable-dev-shm-usage".to_string(),
        "--no-sandbox".to_string(),
        "--window-size=1920,1080".to_string(),
        format!("--user-agent={}", config.user_agent),
    ];
    if config.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }

    json!({
        "browserName": "chrome",
        "pageLoadStrategy": "normal",
        "goog:chromeOptions": {
            "args": args,
            "excludeSwitches": ["enable-automation"],
        },
    })
}

//! Minimal W3C WebDriver client (chromedriver, geckodriver or a Selenium
//! grid) covering what the listing pages need: navigation, CSS lookups,
//! clicks, keyboard/pointer input and the rendered page source.

use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::core::ScrapeError;

/// W3C web element identifier key.
pub(crate) const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";
const POLL_INTERVAL_MS: u64 = 250;

pub const KEY_ESCAPE: &str = "\u{E00C}";

type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(pub String);

impl ElementRef {
    fn to_json(&self) -> Value {
        json!({ ELEMENT_KEY: self.0 })
    }
}

#[derive(Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
}

impl WebDriverClient {
    /// `timeout` bounds every HTTP round trip, so it must outlast the longest
    /// deadline handed to the driver itself.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn new_session(&self, capabilities: Value) -> Result<WebDriverSession> {
        let body = json!({ "capabilities": { "alwaysMatch": capabilities } });
        let value = send(
            &self.http,
            Method::POST,
            &format!("{}/session", self.base_url),
            Some(body),
        )
        .await?;

        let id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| ScrapeError::MalformedResponse("missing sessionId".to_string()))?
            .to_string();

        debug!("WebDriver session {} opened", id);

        Ok(WebDriverSession {
            http: self.http.clone(),
            session_url: format!("{}/session/{}", self.base_url, id),
            id,
        })
    }
}

pub struct WebDriverSession {
    http: Client,
    session_url: String,
    id: String,
}

impl WebDriverSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.session_url, path);
        send(&self.http, method, &url, body).await
    }

    pub async fn set_page_load_timeout(&self, timeout_ms: u64) -> Result<()> {
        self.command(
            Method::POST,
            "/timeouts",
            Some(json!({ "pageLoad": timeout_ms, "implicit": 0 })),
        )
        .await?;
        Ok(())
    }

    /// Registers a script to run before any page script. Chromium only; goes
    /// through chromedriver's CDP passthrough.
    pub async fn add_init_script(&self, source: &str) -> Result<()> {
        self.command(
            Method::POST,
            "/goog/cdp/execute",
            Some(json!({
                "cmd": "Page.addScriptToEvaluateOnNewDocument",
                "params": { "source": source },
            })),
        )
        .await?;
        Ok(())
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await?;
        Ok(())
    }

    pub async fn find_all(&self, css: &str) -> Result<Vec<ElementRef>> {
        let value = self
            .command(
                Method::POST,
                "/elements",
                Some(json!({ "using": "css selector", "value": css })),
            )
            .await?;

        value
            .as_array()
            .ok_or_else(|| ScrapeError::MalformedResponse("elements is not an array".into()))?
            .iter()
            .map(element_ref)
            .collect()
    }

    pub async fn click(&self, element: &ElementRef) -> Result<()> {
        self.command(
            Method::POST,
            &format!("/element/{}/click", element.0),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    /// Dispatches a DOM click, ignoring overlays that would intercept a real one.
    pub async fn force_click(&self, element: &ElementRef) -> Result<()> {
        self.command(
            Method::POST,
            "/execute/sync",
            Some(json!({
                "script": "arguments[0].click();",
                "args": [element.to_json()],
            })),
        )
        .await?;
        Ok(())
    }

    pub async fn text(&self, element: &ElementRef) -> Result<String> {
        let value = self
            .command(Method::GET, &format!("/element/{}/text", element.0), None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    pub async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
        let value = self
            .command(
                Method::GET,
                &format!("/element/{}/displayed", element.0),
                None,
            )
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub async fn source(&self) -> Result<String> {
        let value = self.command(Method::GET, "/source", None).await?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ScrapeError::MalformedResponse("page source is not a string".into()))
    }

    pub async fn press_key(&self, key: &str) -> Result<()> {
        let actions = json!({
            "actions": [{
                "type": "key",
                "id": "keyboard",
                "actions": [
                    { "type": "keyDown", "value": key },
                    { "type": "keyUp", "value": key },
                ],
            }]
        });
        self.command(Method::POST, "/actions", Some(actions)).await?;
        Ok(())
    }

    pub async fn click_at(&self, x: i64, y: i64) -> Result<()> {
        let actions = json!({
            "actions": [{
                "type": "pointer",
                "id": "mouse",
                "parameters": { "pointerType": "mouse" },
                "actions": [
                    { "type": "pointerMove", "duration": 0, "origin": "viewport", "x": x, "y": y },
                    { "type": "pointerDown", "button": 0 },
                    { "type": "pointerUp", "button": 0 },
                ],
            }]
        });
        self.command(Method::POST, "/actions", Some(actions)).await?;
        Ok(())
    }

    /// Polls until an element matching `css` is displayed.
    pub async fn wait_for_visible(&self, css: &str, timeout_ms: u64) -> Result<ElementRef> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            for element in self.find_all(css).await? {
                // elements can detach between lookup and the visibility check
                if self.is_displayed(&element).await.unwrap_or(false) {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    what: format!("visible '{}'", css),
                    timeout_ms,
                });
            }
            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// Polls until an element matching `css` has exactly `text` as its
    /// trimmed visible text.
    pub async fn wait_for_text(&self, css: &str, text: &str, timeout_ms: u64) -> Result<ElementRef> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if let Some(element) = self.find_with_text(css, text).await? {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::Timeout {
                    what: format!("'{}' with text '{}'", css, text),
                    timeout_ms,
                });
            }
            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    pub async fn find_with_text(&self, css: &str, text: &str) -> Result<Option<ElementRef>> {
        for element in self.find_all(css).await? {
            if self.text(&element).await.unwrap_or_default().trim() == text {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }

    /// Waits for `css` to become visible, then clicks it.
    pub async fn click_when_visible(&self, css: &str, timeout_ms: u64) -> Result<()> {
        let element = self.wait_for_visible(css, timeout_ms).await?;
        self.click(&element).await
    }

    pub async fn close(self) -> Result<()> {
        self.command(Method::DELETE, "", None).await?;
        debug!("WebDriver session {} closed", self.id);
        Ok(())
    }
}

async fn send(http: &Client, method: Method, url: &str, body: Option<Value>) -> Result<Value> {
    let mut request = http.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let body: Value = response.json().await?;

    decode_response(status, body)
}

/// Unwraps the `value` member of a WebDriver response, mapping error payloads
/// to `ScrapeError::Protocol`.
pub fn decode_response(status: u16, mut body: Value) -> Result<Value> {
    let value = body
        .get_mut("value")
        .map(Value::take)
        .ok_or_else(|| ScrapeError::MalformedResponse(format!("no value member (HTTP {})", status)))?;

    if let Some(code) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        return Err(ScrapeError::Protocol {
            status,
            code: code.to_string(),
            message,
        });
    }

    if !(200..300).contains(&status) {
        return Err(ScrapeError::Protocol {
            status,
            code: "unknown error".to_string(),
            message: value.to_string(),
        });
    }

    Ok(value)
}

fn element_ref(value: &Value) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| ScrapeError::MalformedResponse(format!("not an element: {}", value)))
}

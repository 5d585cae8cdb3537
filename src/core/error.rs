use thiserror::Error;

/// Failures raised while driving the browser. None of these escape
/// `ListingSource::extract`; they end up as the extraction's failure note.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("webdriver transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webdriver error {status} ({code}): {message}")]
    Protocol {
        status: u16,
        code: String,
        message: String,
    },

    #[error("no element matches selector '{0}'")]
    NotFound(String),

    #[error("timed out after {timeout_ms}ms waiting for {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("malformed webdriver response: {0}")]
    MalformedResponse(String),
}

impl ScrapeError {
    /// Errors a best-effort step may silently ignore.
    pub fn is_absent(&self) -> bool {
        match self {
            ScrapeError::NotFound(_) | ScrapeError::Timeout { .. } => true,
            ScrapeError::Protocol { code, .. } => {
                code == "no such element"
                    || code == "element not interactable"
                    || code == "element click intercepted"
                    || code == "stale element reference"
            }
            _ => false,
        }
    }
}

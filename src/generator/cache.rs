#[cfg(feature = "network")]
use std::time::Duration;

#[cfg(feature = "network")]
const USER_AGENT: &str = concat!("wikitype/", env!("CARGO_PKG_VERSION"), " (terminal typing tutor)");
#[cfg(feature = "network")]
const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no usable article in {0} responses")]
    NoCandidate(usize),

    #[error("network support is disabled in this build")]
    Disabled,
}

/// GET `url` as JSON text, following redirects.
#[cfg(feature = "network")]
pub fn fetch_url(url: &str) -> Result<String, FetchError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Http(e.to_string()))?;
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .map_err(|e| FetchError::Http(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }
    response.text().map_err(|e| FetchError::Http(e.to_string()))
}

#[cfg(not(feature = "network"))]
pub fn fetch_url(_url: &str) -> Result<String, FetchError> {
    Err(FetchError::Disabled)
}

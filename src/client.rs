//! # Forecast API Client
//!
//! Fetches forecast responses and wraps them in a [`Forecast`].
//!
//! ## Response handling
//! 1. **Status**: anything outside 2xx is a [`ForecastError::Transport`]
//! 2. **API errors**: a top-level `error_response` object becomes
//!    [`ForecastError::Api`] with the server's `code` and `error_msg`
//! 3. **Body**: must be a JSON array of forecast records
//!
//! The network layer sits behind the [`Transport`] trait so the response
//! pipeline can be driven from canned JSON. [`HttpTransport`] is the
//! production implementation on top of `reqwest`'s blocking client.
//!
//! No caching and no retries: every call to [`get_msw`] or
//! [`Forecast::refresh`] issues exactly one request.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::ephemeris::Ephemeris;
use crate::error::{ForecastError, Result};
use crate::events::EventLocator;
use crate::forecast::{ForecastDataBlock, ForecastDataPoint};
use crate::query::Query;

/// Attribution required by the API terms when showing its data.
pub const ATTRIBUTION: &str = "Information provided by magicseaweed.com";

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("msw-forecast/", env!("CARGO_PKG_VERSION"));

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const ERROR_RESPONSE: &str = "error_response";

/// Status, headers and decoded JSON body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

/// Issues a GET for a fully rendered request URL.
pub trait Transport {
    fn fetch(&self, url: &str) -> Result<RawResponse>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
///
/// Do not construct or drop this inside an async context; use
/// [`load_async`] to drive it from tokio.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(HttpTransport { client })
    }

    /// Client with [`DEFAULT_USER_AGENT`] and [`DEFAULT_TIMEOUT_SECS`].
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_USER_AGENT, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str) -> Result<RawResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let text = response.text()?;

        let body = match serde_json::from_str(&text) {
            Ok(body) => body,
            // error pages are often HTML; the status check reports them
            Err(_) if !is_success(status) => Value::Null,
            Err(err) => {
                return Err(ForecastError::MalformedRecord(format!(
                    "response body is not JSON: {err}"
                )))
            }
        };

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// A fetched forecast: the request it came from plus the parsed block.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    url: String,
    headers: BTreeMap<String, String>,
    block: ForecastDataBlock,
}

impl Forecast {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response headers of the most recent fetch.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Every point, in delivery order.
    pub fn all(&self) -> &ForecastDataBlock {
        &self.block
    }

    pub fn current(&self) -> Option<&ForecastDataPoint> {
        self.block.current()
    }

    pub fn next(&self) -> Option<&ForecastDataPoint> {
        self.block.next()
    }

    pub fn next_day(&self) -> Option<&ForecastDataPoint> {
        self.block.next_day()
    }

    pub fn six_hour(&self) -> ForecastDataBlock {
        self.block.six_hour()
    }

    pub fn daily(&self) -> ForecastDataBlock {
        self.block.daily()
    }

    /// Point matched to the next sunrise after `from` at the given spot.
    pub fn sunrise(
        &self,
        ephemeris: &dyn Ephemeris,
        lat: f64,
        lon: f64,
        from: DateTime<Utc>,
    ) -> Option<&ForecastDataPoint> {
        self.sunrise_with(&EventLocator::default(), ephemeris, lat, lon, from)
    }

    /// Point matched to the next sunset after `from` at the given spot.
    pub fn sunset(
        &self,
        ephemeris: &dyn Ephemeris,
        lat: f64,
        lon: f64,
        from: DateTime<Utc>,
    ) -> Option<&ForecastDataPoint> {
        self.sunset_with(&EventLocator::default(), ephemeris, lat, lon, from)
    }

    pub fn sunrise_with(
        &self,
        locator: &EventLocator,
        ephemeris: &dyn Ephemeris,
        lat: f64,
        lon: f64,
        from: DateTime<Utc>,
    ) -> Option<&ForecastDataPoint> {
        let target = ephemeris.sunrise_utc(lat, lon, from)?;
        debug!(%target, "matching sunrise");
        locator.nearest(&self.block, target)
    }

    pub fn sunset_with(
        &self,
        locator: &EventLocator,
        ephemeris: &dyn Ephemeris,
        lat: f64,
        lon: f64,
        from: DateTime<Utc>,
    ) -> Option<&ForecastDataPoint> {
        let target = ephemeris.sunset_utc(lat, lon, from)?;
        debug!(%target, "matching sunset");
        locator.nearest(&self.block, target)
    }

    /// Re-fetch the same URL and replace headers and data in place.
    ///
    /// On failure the previous data is left untouched.
    pub fn refresh<T: Transport + ?Sized>(&mut self, transport: &T) -> Result<()> {
        let fresh = get_msw(transport, &self.url)?;
        self.headers = fresh.headers;
        self.block = fresh.block;
        Ok(())
    }
}

/// Fetch `url` and parse the response into a [`Forecast`].
pub fn get_msw<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<Forecast> {
    debug!(url = %redact(url), "fetching forecast");
    let response = transport.fetch(url)?;

    if !is_success(response.status) {
        warn!(status = response.status, "forecast request failed");
        return Err(ForecastError::Transport(format!(
            "HTTP status {}",
            response.status
        )));
    }

    if let Some(error) = response.body.get(ERROR_RESPONSE) {
        let err = api_error(error);
        warn!(error = %err, "forecast API returned an error");
        return Err(err);
    }

    let block = ForecastDataBlock::from_json(response.body)?;
    info!(points = block.len(), summary = block.summary(), "forecast loaded");

    Ok(Forecast {
        url: url.to_string(),
        headers: response.headers,
        block,
    })
}

/// Build the URL for `query` and fetch it.
pub fn load_forecast<T: Transport + ?Sized>(transport: &T, query: &Query) -> Result<Forecast> {
    get_msw(transport, &query.url())
}

/// Fetch `url` on tokio's blocking pool and hand the result to `callback`.
///
/// Must be called from within a tokio runtime. The returned handle resolves
/// once the callback has run.
pub fn load_async<T, F>(transport: Arc<T>, url: String, callback: F) -> JoinHandle<()>
where
    T: Transport + Send + Sync + 'static,
    F: FnOnce(Result<Forecast>) + Send + 'static,
{
    tokio::task::spawn_blocking(move || callback(get_msw(transport.as_ref(), &url)))
}

fn api_error(error: &Value) -> ForecastError {
    let code = match error.get("code") {
        Some(Value::Number(n)) => n.as_i64().unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    };
    let message = error
        .get("error_msg")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string();
    ForecastError::Api { code, message }
}

/// Hide the API key path segment in log output.
fn redact(url: &str) -> String {
    let Some(start) = url.find("/api/").map(|i| i + "/api/".len()) else {
        return url.to_string();
    };
    match url[start..].find('/') {
        Some(len) => format!("{}***{}", &url[..start], &url[start + len..]),
        None => url.to_string(),
    }
}

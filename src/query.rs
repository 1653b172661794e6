//! # Forecast Query Construction
//!
//! Builds the request URL for the forecast endpoint:
//!
//! ```text
//! {base}/api/{api_key}/forecast?spot_id={id}[&fields={csv}][&units={code}][&start={epoch}&end={epoch}]
//! ```
//!
//! Validation happens entirely client-side, before any request is issued:
//! - every requested field is trimmed and checked against the
//!   [`FieldCatalog`]; the first unknown path fails with `InvalidField`
//! - the unit code must be exactly `us`, `uk` or `eu`
//! - a time window is only sent when *both* `start` and `end` are given;
//!   a lone bound is dropped without error
//!
//! Parameters are always emitted in the order `spot_id, fields, units, start,
//! end`, so identical inputs yield identical URLs.

use tracing::debug;

use crate::catalog::{FieldCatalog, Unit};
use crate::error::Result;

/// Public forecast API host.
pub const DEFAULT_BASE_URL: &str = "https://magicseaweed.com";

/// A validated forecast request.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    base_url: String,
    api_key: String,
    spot_id: String,
    fields: Option<Vec<String>>,
    units: Option<Unit>,
    window: Option<(i64, i64)>,
}

impl Query {
    pub fn spot_id(&self) -> &str {
        &self.spot_id
    }

    pub fn fields(&self) -> Option<&[String]> {
        self.fields.as_deref()
    }

    pub fn units(&self) -> Option<Unit> {
        self.units
    }

    /// `(start, end)` epoch seconds, when both bounds were supplied.
    pub fn window(&self) -> Option<(i64, i64)> {
        self.window
    }

    /// Render the request URL.
    pub fn url(&self) -> String {
        let mut params: Vec<(&str, String)> = vec![("spot_id", self.spot_id.clone())];
        if let Some(fields) = &self.fields {
            params.push(("fields", fields.join(",")));
        }
        if let Some(units) = self.units {
            params.push(("units", units.as_str().to_string()));
        }
        if let Some((start, end)) = self.window {
            params.push(("start", start.to_string()));
            params.push(("end", end.to_string()));
        }

        let query = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}/api/{}/forecast?{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.api_key),
            query
        )
    }
}

/// Step-by-step construction of a [`Query`].
///
/// # Example
/// ```
/// use msw_forecast::query::QueryBuilder;
///
/// let url = QueryBuilder::new("K", "123")
///     .fields(["timestamp", " wind.*"])
///     .units("us")
///     .build()
///     .unwrap()
///     .url();
/// assert_eq!(
///     url,
///     "https://magicseaweed.com/api/K/forecast?spot_id=123&fields=timestamp%2Cwind.%2A&units=us"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    catalog: FieldCatalog,
    base_url: String,
    api_key: String,
    spot_id: String,
    fields: Option<Vec<String>>,
    units: Option<String>,
    start: Option<i64>,
    end: Option<i64>,
}

impl QueryBuilder {
    /// Start a query against the public API with the standard catalog.
    pub fn new(api_key: impl Into<String>, spot_id: impl ToString) -> Self {
        QueryBuilder {
            catalog: FieldCatalog::standard(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            spot_id: spot_id.to_string(),
            fields: None,
            units: None,
            start: None,
            end: None,
        }
    }

    /// Validate against a different whitelist.
    pub fn catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Request only these field paths. An empty list requests everything.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .collect();
        self.fields = if fields.is_empty() { None } else { Some(fields) };
        self
    }

    /// Comma-separated form of [`fields`](Self::fields), e.g. `" timestamp, wind.* "`.
    pub fn fields_csv(self, csv: &str) -> Self {
        if csv.trim().is_empty() {
            return self.fields(Vec::<String>::new());
        }
        self.fields(csv.split(','))
    }

    pub fn units(mut self, code: impl Into<String>) -> Self {
        self.units = Some(code.into());
        self
    }

    pub fn start(mut self, epoch: i64) -> Self {
        self.start = Some(epoch);
        self
    }

    pub fn end(mut self, epoch: i64) -> Self {
        self.end = Some(epoch);
        self
    }

    /// Validate and freeze the query.
    pub fn build(self) -> Result<Query> {
        if let Some(fields) = &self.fields {
            self.catalog.validate_fields(fields.as_slice())?;
        }

        let units = match &self.units {
            Some(code) => Some(self.catalog.validate_unit(code)?),
            None => None,
        };

        let window = match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            (start, end) => {
                debug!(?start, ?end, "ignoring incomplete time window");
                None
            }
        };

        Ok(Query {
            base_url: self.base_url,
            api_key: self.api_key,
            spot_id: self.spot_id,
            fields: self.fields,
            units,
            window,
        })
    }
}

/// One-call form of the builder.
pub fn build_request<S: AsRef<str>>(
    api_key: &str,
    spot_id: &str,
    fields: Option<&[S]>,
    units: Option<&str>,
    start: Option<i64>,
    end: Option<i64>,
) -> Result<String> {
    let mut builder = QueryBuilder::new(api_key, spot_id);
    if let Some(fields) = fields {
        builder = builder.fields(fields);
    }
    if let Some(units) = units {
        builder = builder.units(units);
    }
    if let Some(start) = start {
        builder = builder.start(start);
    }
    if let Some(end) = end {
        builder = builder.end(end);
    }
    Ok(builder.build()?.url())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FIELD_TABLE;
    use crate::error::ForecastError;

    // randomly generated, not a real api key
    const TEST_API_KEY: &str = "Cu4do7TrIWzDXnZm3XvhX7c5Zfk0HpI2";
    const TEST_SPOT_ID: &str = "123";
    const TEST_TIMESTAMP: i64 = 1662832800;
    const BASE: &str =
        "https://magicseaweed.com/api/Cu4do7TrIWzDXnZm3XvhX7c5Zfk0HpI2/forecast?spot_id=123";

    fn builder() -> QueryBuilder {
        QueryBuilder::new(TEST_API_KEY, TEST_SPOT_ID)
    }

    #[test]
    fn test_build_request_defaults() {
        assert_eq!(builder().build().unwrap().url(), BASE);
        assert_eq!(
            QueryBuilder::new("K", 123).build().unwrap().url(),
            "https://magicseaweed.com/api/K/forecast?spot_id=123"
        );
    }

    #[test]
    fn test_build_request_valid_fields() {
        let url = builder()
            .fields(["timestamp", "wind.*", "condition.temperature"])
            .build()
            .unwrap()
            .url();
        assert_eq!(
            url,
            format!("{BASE}&fields=timestamp%2Cwind.%2A%2Ccondition.temperature")
        );
    }

    #[test]
    fn test_build_request_valid_fields_with_spaces() {
        let url = builder().fields(["timestamp", " wind.*"]).build().unwrap().url();
        assert_eq!(url, format!("{BASE}&fields=timestamp%2Cwind.%2A"));

        let url = builder().fields_csv(" timestamp, wind.* ").build().unwrap().url();
        assert_eq!(url, format!("{BASE}&fields=timestamp%2Cwind.%2A"));
    }

    #[test]
    fn test_build_request_invalid_field() {
        let err = builder()
            .fields(["timestamp", "wind.*", "invalid"])
            .build()
            .unwrap_err();
        assert_eq!(err, ForecastError::InvalidField("invalid".to_string()));
    }

    #[test]
    fn test_every_whitelisted_field_is_accepted() {
        for spec in FIELD_TABLE {
            assert!(builder().fields([spec.path]).build().is_ok(), "{}", spec.path);
        }
        let all: Vec<&str> = FIELD_TABLE.iter().map(|spec| spec.path).collect();
        assert!(builder().fields(&all).build().is_ok());
    }

    #[test]
    fn test_build_request_valid_unit() {
        let url = builder().units("us").build().unwrap().url();
        assert_eq!(url, format!("{BASE}&units=us"));

        for code in ["uk", "eu"] {
            assert!(builder().units(code).build().is_ok());
        }
    }

    #[test]
    fn test_build_request_invalid_unit() {
        for code in ["invalid", "UK", "metric", ""] {
            assert_eq!(
                builder().units(code).build().unwrap_err(),
                ForecastError::InvalidUnit(code.to_string())
            );
        }
    }

    #[test]
    fn test_build_request_valid_start_and_end() {
        let url = builder()
            .start(TEST_TIMESTAMP)
            .end(TEST_TIMESTAMP)
            .build()
            .unwrap()
            .url();
        assert_eq!(url, format!("{BASE}&start=1662832800&end=1662832800"));
    }

    #[test]
    fn test_lone_time_bound_is_dropped() {
        assert_eq!(builder().start(TEST_TIMESTAMP).build().unwrap().url(), BASE);
        assert_eq!(builder().end(TEST_TIMESTAMP).build().unwrap().url(), BASE);
    }

    #[test]
    fn test_parameter_order_is_fixed() {
        let url = builder()
            .end(20)
            .units("eu")
            .start(10)
            .fields(["wind.speed"])
            .build()
            .unwrap()
            .url();
        assert_eq!(url, format!("{BASE}&fields=wind.speed&units=eu&start=10&end=20"));
    }

    #[test]
    fn test_custom_base_url() {
        let url = builder()
            .base_url("http://magicseaweed.com/")
            .build()
            .unwrap()
            .url();
        assert_eq!(
            url,
            "http://magicseaweed.com/api/Cu4do7TrIWzDXnZm3XvhX7c5Zfk0HpI2/forecast?spot_id=123"
        );
    }

    #[test]
    fn test_api_key_is_encoded_as_one_path_segment() {
        let url = QueryBuilder::new("a/b?x", "1").build().unwrap().url();
        assert_eq!(url, "https://magicseaweed.com/api/a%2Fb%3Fx/forecast?spot_id=1");
    }

    #[test]
    fn test_build_request_function() {
        let url = build_request(
            "K",
            "123",
            Some(&["timestamp", " wind.*"][..]),
            Some("uk"),
            Some(1),
            None,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://magicseaweed.com/api/K/forecast?spot_id=123&fields=timestamp%2Cwind.%2A&units=uk"
        );
        assert!(build_request::<&str>("K", "123", None, Some("xx"), None, None).is_err());
    }
}

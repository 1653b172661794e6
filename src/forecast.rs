//! # Forecast Data Points and Blocks
//!
//! A [`ForecastDataPoint`] wraps one decoded forecast record (one 3-hour
//! slice) together with its flattened view and display attributes. A
//! [`ForecastDataBlock`] is the ordered sequence of points returned by one API
//! call, in delivery order.
//!
//! ## Cadence
//! The API publishes one record every 3 hours, so the periodic slices are
//! fixed strides rather than time arithmetic:
//! - **six-hour**: every 2nd point from the first (2 × 3h)
//! - **daily**: every 8th point from the first (8 × 3h)
//! - **next day**: the 8th point (index 7)
//!
//! Points are immutable once built. All derived data is computed eagerly at
//! construction and never fails for an object record: missing fields degrade
//! to placeholders instead of errors.

use serde_json::{Map, Value};
use tracing::debug;

use crate::attributes::{self, display_value, epoch_seconds, Attribute, AttributeSet};
use crate::catalog::{Accessor, ChartType, FieldCatalog};
use crate::error::{ForecastError, Result};
use crate::flatten::{self, FlatForecast};

/// Summary text of a block with no readable first/last point.
pub const NO_FORECASTS: &str = "No forecasts.";

/// Stride between points six hours apart.
pub const SIX_HOUR_STRIDE: usize = 2;
/// Stride between points a day apart.
pub const DAILY_STRIDE: usize = 8;
/// Index of the point one day ahead of the first.
pub const NEXT_DAY_INDEX: usize = 7;

const STAR_FILLED_URL: &str = "http://cdnimages.magicseaweed.com/star_filled.png";
const STAR_EMPTY_URL: &str = "http://cdnimages.magicseaweed.com/star_empty.png";
const CDN_ICON_URL: &str = "http://cdnimages.magicseaweed.com/30x30/";

/// Result of a direct field lookup on a point.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Value as sent by the API (a scalar, or an object for `group.*` paths)
    Present(Value),
    /// Whitelisted field that this record does not carry
    Unavailable,
}

impl FieldValue {
    pub fn is_available(&self) -> bool {
        matches!(self, FieldValue::Present(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Present(value) => Some(value),
            FieldValue::Unavailable => None,
        }
    }
}

/// One forecast record with its derived views.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDataPoint {
    raw: Map<String, Value>,
    flat: FlatForecast,
    attrs: AttributeSet,
    summary: Option<String>,
}

impl ForecastDataPoint {
    /// Build a point from a decoded record. Never fails.
    pub fn new(raw: Map<String, Value>) -> Self {
        let flat = flatten::flatten_map(&raw);
        let attrs = attributes::transform(&flat);
        let summary = friendly_summary(&raw);
        ForecastDataPoint {
            raw,
            flat,
            attrs,
            summary,
        }
    }

    /// Build a point from any JSON value; only objects are accepted.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(raw) => Ok(Self::new(raw)),
            other => Err(ForecastError::MalformedRecord(format!(
                "expected a JSON object, got {}",
                flatten::kind(&other)
            ))),
        }
    }

    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn flat(&self) -> &FlatForecast {
        &self.flat
    }

    pub fn attrs(&self) -> &AttributeSet {
        &self.attrs
    }

    /// Shorthand for `attrs().get(attr)`.
    pub fn attr(&self, attr: Attribute) -> &str {
        self.attrs.get(attr)
    }

    /// `"100% chance of waves breaking between 3ft and 4ft high."`, or `None`
    /// when the record has no swell section.
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// UTC epoch seconds this forecast is valid for.
    pub fn timestamp(&self) -> Option<i64> {
        self.flat.get("timestamp").and_then(epoch_seconds)
    }

    /// Local (spot timezone adjusted) epoch seconds.
    pub fn local_timestamp(&self) -> Option<i64> {
        self.flat.get("localTimestamp").and_then(epoch_seconds)
    }

    /// Epoch seconds at which the forecast was issued.
    pub fn issue_timestamp(&self) -> Option<i64> {
        self.flat.get("issueTimestamp").and_then(epoch_seconds)
    }

    /// Look up a raw API field by its dotted path.
    ///
    /// Fails with `InvalidField` for paths outside the whitelist; returns
    /// [`FieldValue::Unavailable`] when the path is valid but absent (or
    /// `null`) in this record.
    ///
    /// ```
    /// use msw_forecast::forecast::{FieldValue, ForecastDataPoint};
    /// use serde_json::json;
    ///
    /// let point = ForecastDataPoint::from_json(json!({"wind": {"speed": 8}})).unwrap();
    /// assert_eq!(point.get("wind.speed").unwrap(), FieldValue::Present(json!(8)));
    /// assert_eq!(point.get("wind.gusts").unwrap(), FieldValue::Unavailable);
    /// assert!(point.get("wind.colour").is_err());
    /// ```
    pub fn get(&self, path: &str) -> Result<FieldValue> {
        self.get_with(&FieldCatalog::standard(), path)
    }

    /// [`get`](Self::get) against a specific catalog.
    pub fn get_with(&self, catalog: &FieldCatalog, path: &str) -> Result<FieldValue> {
        let spec = catalog.resolve(path)?;
        let found = match spec.accessor {
            Accessor::Leaf(key) => self.flat.get(key),
            Accessor::Group(key) => self.raw.get(key).filter(|v| v.is_object()),
        };
        Ok(match found {
            None | Some(Value::Null) => FieldValue::Unavailable,
            Some(value) => FieldValue::Present(value.clone()),
        })
    }

    /// One URL per star: filled for solid stars, then empty for faded ones.
    pub fn rating_urls(&self) -> Vec<&'static str> {
        let solid = self.count("solidRating");
        let faded = self.count("fadedRating");
        std::iter::repeat(STAR_FILLED_URL)
            .take(solid)
            .chain(std::iter::repeat(STAR_EMPTY_URL).take(faded))
            .collect()
    }

    /// Decimal rating: solid stars plus a tenth per faded star.
    pub fn rating(&self) -> Option<f64> {
        let solid = self.flat.get("solidRating")?.as_f64()?;
        let faded = self.flat.get("fadedRating")?.as_f64()?;
        Some(solid + faded * 0.1)
    }

    /// Absolute URL of the weather icon for `condition.weather`.
    pub fn weather_icon_url(&self) -> Option<String> {
        match self.flat.get("condition_weather") {
            None | Some(Value::Null) => None,
            Some(icon) => Some(format!("{CDN_ICON_URL}{}.png", display_value(icon))),
        }
    }

    /// URL of the chart image of the given type, when the record carries one.
    pub fn chart_url(&self, chart: ChartType) -> Option<&str> {
        let key = chart.field_path().replace('.', flatten::SEPARATOR);
        self.flat.get(&key).and_then(Value::as_str)
    }

    fn count(&self, key: &str) -> usize {
        self.flat
            .get(key)
            .and_then(Value::as_u64)
            .map(|n| n as usize)
            .unwrap_or(0)
    }
}

fn friendly_summary(raw: &Map<String, Value>) -> Option<String> {
    let swell = raw.get("swell")?.as_object()?;
    let part = |key: &str| match swell.get(key) {
        Some(value) => display_value(value),
        None => attributes::MISSING.to_string(),
    };
    let unit = part("unit");
    Some(format!(
        "{}% chance of waves breaking between {}{} and {}{} high.",
        part("probability"),
        part("minBreakingHeight"),
        unit,
        part("maxBreakingHeight"),
        unit
    ))
}

/// Ordered forecast points from one API response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastDataBlock {
    data: Vec<ForecastDataPoint>,
    summary: String,
}

impl ForecastDataBlock {
    /// Wrap points in delivery order; they are never re-sorted.
    pub fn new(data: Vec<ForecastDataPoint>) -> Self {
        let summary = block_summary(&data);
        ForecastDataBlock { data, summary }
    }

    /// Build a block from raw records.
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        Self::new(records.into_iter().map(ForecastDataPoint::new).collect())
    }

    /// Build a block from a JSON array of record objects.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(ForecastError::MalformedRecord(
                "expected a JSON array of forecasts".to_string(),
            ));
        };
        let data = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                ForecastDataPoint::from_json(item).inspect_err(|err| {
                    debug!(index, error = %err, "rejecting forecast record");
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(data))
    }

    /// `"40 forecasts from Thu 12 AM to Mon 9 PM"` or `"No forecasts."`.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn data(&self) -> &[ForecastDataPoint] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ForecastDataPoint> {
        self.data.iter()
    }

    /// First point: the forecast in effect now.
    pub fn current(&self) -> Option<&ForecastDataPoint> {
        self.data.first()
    }

    /// Second point: the next 3-hour slice.
    pub fn next(&self) -> Option<&ForecastDataPoint> {
        self.data.get(1)
    }

    /// Point one day after the first.
    pub fn next_day(&self) -> Option<&ForecastDataPoint> {
        self.data.get(NEXT_DAY_INDEX)
    }

    /// Points six hours apart, starting with the first.
    pub fn six_hour(&self) -> ForecastDataBlock {
        self.stride(SIX_HOUR_STRIDE)
    }

    /// Points a day apart, starting with the first.
    pub fn daily(&self) -> ForecastDataBlock {
        self.stride(DAILY_STRIDE)
    }

    fn stride(&self, step: usize) -> ForecastDataBlock {
        Self::new(self.data.iter().step_by(step).cloned().collect())
    }
}

impl<'a> IntoIterator for &'a ForecastDataBlock {
    type Item = &'a ForecastDataPoint;
    type IntoIter = std::slice::Iter<'a, ForecastDataPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

fn block_summary(data: &[ForecastDataPoint]) -> String {
    match (data.first(), data.last()) {
        (Some(first), Some(last)) => format!(
            "{} forecasts from {} to {}",
            data.len(),
            first.attr(Attribute::Begins),
            last.attr(Attribute::Begins)
        ),
        _ => NO_FORECASTS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point_at(local: i64) -> ForecastDataPoint {
        ForecastDataPoint::from_json(json!({
            "timestamp": local,
            "localTimestamp": local,
            "solidRating": 1,
            "fadedRating": 2
        }))
        .unwrap()
    }

    fn block_of(n: i64) -> ForecastDataBlock {
        // 2022-09-08 00:00 UTC, a Thursday, in 3-hour steps
        ForecastDataBlock::new((0..n).map(|i| point_at(1662595200 + i * 10800)).collect())
    }

    #[test]
    fn test_empty_point_still_builds() {
        let point = ForecastDataPoint::new(Map::new());
        assert_eq!(point.summary(), None);
        assert_eq!(point.attr(Attribute::Begins), "None");
        assert!(point.flat().is_empty());
        assert_eq!(point.timestamp(), None);
    }

    #[test]
    fn test_non_object_point_is_malformed() {
        assert!(matches!(
            ForecastDataPoint::from_json(json!([1, 2])),
            Err(ForecastError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_summary_from_swell() {
        let point = ForecastDataPoint::from_json(json!({
            "swell": {"probability": 100, "minBreakingHeight": 3, "maxBreakingHeight": 4, "unit": "ft"}
        }))
        .unwrap();
        assert_eq!(
            point.summary(),
            Some("100% chance of waves breaking between 3ft and 4ft high.")
        );
    }

    #[test]
    fn test_summary_with_partial_swell() {
        let point = ForecastDataPoint::from_json(json!({"swell": {"unit": "m"}})).unwrap();
        assert_eq!(
            point.summary(),
            Some("None% chance of waves breaking between Nonem and Nonem high.")
        );
    }

    #[test]
    fn test_field_lookup() {
        let point = ForecastDataPoint::from_json(json!({
            "timestamp": 1662847200,
            "wind": {"speed": 8, "chill": null},
            "swell": {"components": {"combined": {"period": 11}, "primary": {"period": 12}}}
        }))
        .unwrap();

        assert_eq!(point.get("timestamp").unwrap(), FieldValue::Present(json!(1662847200)));
        assert_eq!(point.get("wind.speed").unwrap(), FieldValue::Present(json!(8)));
        assert_eq!(point.get("wind.chill").unwrap(), FieldValue::Unavailable);
        assert_eq!(point.get("wind.gusts").unwrap(), FieldValue::Unavailable);
        assert_eq!(
            point.get("swell.components[].period").unwrap(),
            FieldValue::Present(json!(11))
        );
        assert_eq!(
            point.get("swell.components.primary.period").unwrap(),
            FieldValue::Present(json!(12))
        );
        assert_eq!(
            point.get("wind.*").unwrap(),
            FieldValue::Present(json!({"speed": 8, "chill": null}))
        );
        assert_eq!(point.get("charts.*").unwrap(), FieldValue::Unavailable);
        assert_eq!(
            point.get("wind_speed"),
            Err(ForecastError::InvalidField("wind_speed".to_string()))
        );
    }

    #[test]
    fn test_rating_helpers() {
        let point = point_at(0);
        assert_eq!(point.rating_urls(), vec![STAR_FILLED_URL, STAR_EMPTY_URL, STAR_EMPTY_URL]);
        let rating = point.rating().unwrap();
        assert!((rating - 1.2).abs() < 1e-9);
        assert_eq!(ForecastDataPoint::new(Map::new()).rating(), None);
    }

    #[test]
    fn test_weather_icon_and_charts() {
        let point = ForecastDataPoint::from_json(json!({
            "condition": {"weather": "9"},
            "charts": {"swell": "https://charts.example/swell.gif"}
        }))
        .unwrap();
        assert_eq!(
            point.weather_icon_url().as_deref(),
            Some("http://cdnimages.magicseaweed.com/30x30/9.png")
        );
        assert_eq!(point.chart_url(ChartType::Swell), Some("https://charts.example/swell.gif"));
        assert_eq!(point.chart_url(ChartType::Sst), None);
    }

    #[test]
    fn test_empty_block() {
        let block = ForecastDataBlock::new(Vec::new());
        assert_eq!(block.summary(), NO_FORECASTS);
        assert!(block.is_empty());
        assert!(block.current().is_none());
        assert_eq!(ForecastDataBlock::default().len(), 0);
        assert_eq!(ForecastDataBlock::from_json(json!([])).unwrap().summary(), "No forecasts.");
    }

    #[test]
    fn test_block_summary() {
        let block = block_of(40);
        assert_eq!(block.summary(), "40 forecasts from Thu 12 AM to Mon 9 PM");
    }

    #[test]
    fn test_block_preserves_delivery_order() {
        let block = ForecastDataBlock::new(vec![point_at(10800), point_at(0)]);
        let stamps: Vec<_> = block.iter().map(|p| p.timestamp().unwrap()).collect();
        assert_eq!(stamps, vec![10800, 0]);
    }

    #[test]
    fn test_slices_use_fixed_strides() {
        let block = block_of(40);
        let first = block.data()[0].timestamp().unwrap();

        assert_eq!(block.current().unwrap().timestamp(), Some(first));
        assert_eq!(block.next().unwrap().timestamp(), Some(first + 10800));
        assert_eq!(block.next_day().unwrap().timestamp(), Some(first + 7 * 10800));

        let six = block.six_hour();
        assert_eq!(six.len(), 20);
        assert_eq!(six.data()[1].timestamp(), Some(first + 2 * 10800));

        let daily = block.daily();
        assert_eq!(daily.len(), 5);
        assert_eq!(daily.data()[1].timestamp(), Some(first + 8 * 10800));
        assert_eq!(daily.summary(), "5 forecasts from Thu 12 AM to Mon 12 AM");
    }

    #[test]
    fn test_block_from_json_rejects_non_arrays_and_non_objects() {
        assert!(ForecastDataBlock::from_json(json!({"a": 1})).is_err());
        assert!(ForecastDataBlock::from_json(json!([{}, 3])).is_err());
        assert_eq!(ForecastDataBlock::from_json(json!([{}, {}])).unwrap().len(), 2);
    }
}

//! Canned API payloads and a stub transport shared by the test modules.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use msw_forecast::client::{RawResponse, Transport};
use msw_forecast::{Ephemeris, Result};
use serde_json::{json, Value};

/// 2022-09-08 00:00 UTC, a Thursday
pub const START: i64 = 1662595200;
/// Three hours between records
pub const STEP: i64 = 10800;
/// Pipeline, Oahu
pub const PIPELINE: (f64, f64) = (21.66, -158.05);

// randomly generated, not a real api key
pub const TEST_API_KEY: &str = "Cu4do7TrIWzDXnZm3XvhX7c5Zfk0HpI2";

/// One nested forecast record as the API sends it.
pub fn record(timestamp: i64) -> Value {
    json!({
        "timestamp": timestamp,
        "localTimestamp": timestamp,
        "issueTimestamp": 1662573600,
        "fadedRating": 1,
        "solidRating": 2,
        "swell": {
            "absMinBreakingHeight": 2.65,
            "absMaxBreakingHeight": 4.14,
            "probability": 100,
            "unit": "ft",
            "minBreakingHeight": 3,
            "maxBreakingHeight": 4,
            "components": {
                "combined": {"height": 4, "period": 11, "direction": 252.62, "compassDirection": "ENE"},
                "primary": {"height": 3.5, "period": 11, "direction": 250.1, "compassDirection": "ENE"}
            }
        },
        "wind": {
            "speed": 8,
            "direction": 5,
            "compassDirection": "S",
            "chill": 88,
            "gusts": 14,
            "unit": "mph"
        },
        "condition": {
            "pressure": 1017,
            "temperature": 81,
            "weather": "9",
            "unitPressure": "mb",
            "unit": "f"
        },
        "charts": {
            "swell": "https://charts-s3.msw.ms/archive/wave/750/1-1662595200-1.gif",
            "period": "https://charts-s3.msw.ms/archive/wave/750/1-1662595200-2.gif",
            "wind": "https://charts-s3.msw.ms/archive/gfs/750/1-1662595200-4.gif",
            "pressure": "https://charts-s3.msw.ms/archive/gfs/750/1-1662595200-3.gif",
            "sst": null
        }
    })
}

/// Five days of 3-hourly records from [`START`].
pub fn success_response() -> Value {
    Value::Array((0..40).map(|i| record(START + i * STEP)).collect())
}

pub fn error_response() -> Value {
    json!({
        "error_response": {
            "code": 501,
            "error_msg": "Invalid parameters were supplied and did not pass our validation, please double check your request."
        }
    })
}

/// Answers every request with the same status and body, counting calls.
pub struct StubTransport {
    status: u16,
    body: Value,
    calls: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new(status: u16, body: Value) -> Self {
        StubTransport {
            status,
            body,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn ok() -> Self {
        Self::new(200, success_response())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    fn fetch(&self, url: &str) -> Result<RawResponse> {
        self.calls.lock().unwrap().push(url.to_string());
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        Ok(RawResponse {
            status: self.status,
            headers,
            body: self.body.clone(),
        })
    }
}

/// Ephemeris with fixed event instants.
pub struct FixedEphemeris {
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl Ephemeris for FixedEphemeris {
    fn sunrise_utc(&self, _lat: f64, _lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.sunrise.filter(|t| *t > from)
    }

    fn sunset_utc(&self, _lat: f64, _lon: f64, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.sunset.filter(|t| *t > from)
    }
}

pub fn at(epoch: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(epoch, 0).unwrap()
}

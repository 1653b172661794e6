//! # MSW Forecast Core Library
//!
//! Client-side data model for the Magicseaweed marine forecast API. It turns
//! the API's nested per-timestamp JSON records into flat, display-ready
//! attribute sets and answers time-series questions over a forecast: what is
//! surfing like now, in six hours, tomorrow, or at the next sunrise.
//!
//! ## Design Philosophy
//!
//! ### Validate Before the Network
//! Field paths and unit codes are checked against a compile-time whitelist
//! ([`catalog::FieldCatalog`]) while the request is built. A typo in a field
//! name fails locally with [`ForecastError::InvalidField`] instead of costing
//! a round trip.
//!
//! ### Degrade, Don't Fail
//! Once a record is a JSON object, everything derived from it is infallible.
//! Missing inputs render as the literal `None` inside the display template
//! (`"None°"`), so a sparse forecast still prints a complete attribute table.
//! Callers that need to tell real values from placeholders use
//! [`attributes::AttributeSet::value`].
//!
//! ### Fixed Cadence
//! The API delivers one record per 3 hours. Periodic views are fixed strides
//! over delivery order (six-hour: every 2nd, daily: every 8th), never
//! re-sorted or resampled.
//!
//! ## Data Flow
//! 1. **Query**: [`query::QueryBuilder`] validates and renders the URL
//! 2. **Fetch**: [`client::Transport`] issues the GET; [`client::get_msw`]
//!    checks status and API errors
//! 3. **Flatten**: [`flatten::flatten`] maps nested records to `_`-joined keys
//! 4. **Transform**: [`attributes::transform`] produces the display attributes
//! 5. **Query the series**: [`forecast::ForecastDataBlock`] slices and
//!    [`events::EventLocator`] sunrise/sunset matching
//!
//! ## Example
//! ```
//! use msw_forecast::{Attribute, ForecastDataBlock};
//! use serde_json::json;
//!
//! let block = ForecastDataBlock::from_json(json!([
//!     {"localTimestamp": 1662595200, "condition": {"pressure": 1014, "unitPressure": "mb"}},
//!     {"localTimestamp": 1662606000}
//! ]))
//! .unwrap();
//!
//! assert_eq!(block.summary(), "2 forecasts from Thu 12 AM to Thu 3 AM");
//! assert_eq!(block.current().unwrap().attr(Attribute::AirPressure), "1014mb");
//! assert_eq!(block.next().unwrap().attr(Attribute::AirPressure), "NoneNone");
//! ```

pub mod attributes;
pub mod catalog;
pub mod client;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod events;
pub mod flatten;
pub mod forecast;
pub mod query;
pub mod renderer;

pub use attributes::{Attribute, AttributeSet};
pub use catalog::{ChartType, FieldCatalog, Unit};
pub use client::{get_msw, load_async, load_forecast, Forecast, HttpTransport, Transport, ATTRIBUTION};
pub use ephemeris::{Ephemeris, SolarEphemeris};
pub use error::{ForecastError, Result};
pub use events::{EventLocator, MatchRule};
pub use forecast::{FieldValue, ForecastDataBlock, ForecastDataPoint};
pub use query::{build_request, Query, QueryBuilder};

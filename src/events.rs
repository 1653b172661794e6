//! # Astronomical Event Matching
//!
//! Picks the forecast point that goes with a sunrise or sunset instant
//! produced by an [`Ephemeris`](crate::ephemeris::Ephemeris).
//!
//! ## Compatible rule (default)
//! A single left-to-right scan over the block in stored order computes
//! `delta = target - timestamp` per point and keeps the smallest delta that
//! is at least one second. The first point that fails to improve the running
//! minimum is returned. On a chronological series this is the first point at
//! or after the target, i.e. the slice *following* the one that contains the
//! event. The scan yields nothing when the block is empty, when the very first
//! point already fails (no point precedes the target), or when every point
//! precedes the target.
//!
//! ## Closest rule
//! [`MatchRule::Closest`] returns the point with the smallest absolute delta
//! (earliest on ties) and is offered for callers that want the true nearest
//! slice.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::forecast::{ForecastDataBlock, ForecastDataPoint};

/// Selection rule used by [`EventLocator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchRule {
    /// Point following the last one at least a second before the target
    #[default]
    Compatible,
    /// Point with the smallest absolute distance to the target
    Closest,
}

/// Matches event instants against a forecast series.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventLocator {
    rule: MatchRule,
}

impl EventLocator {
    pub fn new(rule: MatchRule) -> Self {
        EventLocator { rule }
    }

    pub fn rule(&self) -> MatchRule {
        self.rule
    }

    /// Select the point matching `target`, if any.
    pub fn nearest<'a>(
        &self,
        block: &'a ForecastDataBlock,
        target: DateTime<Utc>,
    ) -> Option<&'a ForecastDataPoint> {
        match self.rule {
            MatchRule::Compatible => scan_compatible(block, target),
            MatchRule::Closest => scan_closest(block, target),
        }
    }
}

fn scan_compatible(block: &ForecastDataBlock, target: DateTime<Utc>) -> Option<&ForecastDataPoint> {
    // minimum gap for a point to count as "before" the target
    let min_lead = Duration::seconds(1);
    let mut best: Option<Duration> = None;
    for point in block {
        let Some(at) = point_time(point) else {
            debug!("skipping forecast without timestamp");
            continue;
        };
        let delta = target - at;
        let improves = delta >= min_lead && best.map_or(true, |b| delta < b);
        if improves {
            best = Some(delta);
        } else {
            // stays None when no point preceded the target
            return best.map(|_| point);
        }
    }
    None
}

fn scan_closest(block: &ForecastDataBlock, target: DateTime<Utc>) -> Option<&ForecastDataPoint> {
    block
        .iter()
        .filter_map(|point| point_time(point).map(|at| ((target - at).num_seconds().abs(), point)))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, point)| point)
}

fn point_time(point: &ForecastDataPoint) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(point.timestamp()?, 0)
}

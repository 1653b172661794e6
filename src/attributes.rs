//! # Display Attributes
//!
//! Maps a [`FlatForecast`] onto a fixed set of human-readable, unit-qualified
//! strings ("1014mb", "81° f", "Sat 6 PM", ...). The templates are part of the
//! client's output contract and are reproduced exactly.
//!
//! ## Missing inputs
//! A missing or `null` input never fails the transform. The legacy string
//! renders the literal `None` in its place (`"None°"`), and
//! [`AttributeSet::value`] reports the attribute as absent so callers can tell
//! the two apart.
//!
//! ## Time rendering
//! `begins` and `issued` render epoch seconds in **UTC** as weekday, unpadded
//! 12-hour clock and AM/PM: `1662832800` -> `"Sat 6 PM"`.

use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::flatten::FlatForecast;

/// Placeholder rendered for missing inputs.
pub const MISSING: &str = "None";

/// The fixed display attribute slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Attribute {
    AirPressure,
    AirTemp,
    Stars,
    Begins,
    Issued,
    MaxBreakingHeight,
    AbsMaxBreakingHeight,
    MinBreakingHeight,
    AbsMinBreakingHeight,
    Probability,
    SwellDirection,
    SwellPeriod,
    WindChill,
    WindDirection,
    WindGusts,
    WindSpeed,
}

impl Attribute {
    /// All slots in output order.
    pub const ALL: [Attribute; 16] = [
        Attribute::AirPressure,
        Attribute::AirTemp,
        Attribute::Stars,
        Attribute::Begins,
        Attribute::Issued,
        Attribute::MaxBreakingHeight,
        Attribute::AbsMaxBreakingHeight,
        Attribute::MinBreakingHeight,
        Attribute::AbsMinBreakingHeight,
        Attribute::Probability,
        Attribute::SwellDirection,
        Attribute::SwellPeriod,
        Attribute::WindChill,
        Attribute::WindDirection,
        Attribute::WindGusts,
        Attribute::WindSpeed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Attribute::AirPressure => "air_pressure",
            Attribute::AirTemp => "air_temp",
            Attribute::Stars => "stars",
            Attribute::Begins => "begins",
            Attribute::Issued => "issued",
            Attribute::MaxBreakingHeight => "max_breaking_height",
            Attribute::AbsMaxBreakingHeight => "abs_max_breaking_height",
            Attribute::MinBreakingHeight => "min_breaking_height",
            Attribute::AbsMinBreakingHeight => "abs_min_breaking_height",
            Attribute::Probability => "probability",
            Attribute::SwellDirection => "swell_direction",
            Attribute::SwellPeriod => "swell_period",
            Attribute::WindChill => "wind_chill",
            Attribute::WindDirection => "wind_direction",
            Attribute::WindGusts => "wind_gusts",
            Attribute::WindSpeed => "wind_speed",
        }
    }

    pub fn from_name(name: &str) -> Option<Attribute> {
        Attribute::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

/// One rendered attribute.
#[derive(Debug, Clone, PartialEq)]
struct Rendered {
    text: String,
    /// Every input was present and non-null
    complete: bool,
}

/// Formatted display attributes of one forecast record.
///
/// Holds exactly one entry per [`Attribute`], in [`Attribute::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSet {
    entries: Vec<(Attribute, Rendered)>,
}

impl AttributeSet {
    /// Legacy display string, with `None` substituted for missing inputs.
    pub fn get(&self, attr: Attribute) -> &str {
        &self.rendered(attr).text
    }

    /// Display string only when every input was present.
    pub fn value(&self, attr: Attribute) -> Option<&str> {
        let rendered = self.rendered(attr);
        rendered.complete.then_some(rendered.text.as_str())
    }

    /// Lookup by attribute name (`"air_pressure"`, `"begins"`, ...).
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        Attribute::from_name(name).map(|attr| self.get(attr))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, &str)> {
        self.entries
            .iter()
            .map(|(attr, rendered)| (*attr, rendered.text.as_str()))
    }

    fn rendered(&self, attr: Attribute) -> &Rendered {
        // entries is built from Attribute::ALL in declaration order
        &self.entries[attr as usize].1
    }
}

impl Serialize for AttributeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (attr, text) in self.iter() {
            map.serialize_entry(attr.name(), text)?;
        }
        map.end()
    }
}

/// Build the display attributes for one flattened record.
///
/// Never fails; see the module docs for how missing inputs render.
pub fn transform(flat: &FlatForecast) -> AttributeSet {
    let entries = Attribute::ALL
        .into_iter()
        .map(|attr| (attr, render_attribute(attr, flat)))
        .collect();
    AttributeSet { entries }
}

fn render_attribute(attr: Attribute, flat: &FlatForecast) -> Rendered {
    let field = |key: &str| Field::read(flat, key);
    match attr {
        Attribute::AirPressure => template(
            &[field("condition_pressure"), field("condition_unitPressure")],
            |v| format!("{}{}", v[0], v[1]),
        ),
        Attribute::AirTemp => template(
            &[field("condition_temperature"), field("condition_unit")],
            |v| format!("{}° {}", v[0], v[1]),
        ),
        Attribute::Stars => template(&[field("solidRating"), field("fadedRating")], |v| {
            format!("{} solid, {} faded", v[0], v[1])
        }),
        Attribute::Begins => template(&[Field::time(flat, "localTimestamp")], |v| v[0].to_string()),
        Attribute::Issued => template(&[Field::time(flat, "issueTimestamp")], |v| v[0].to_string()),
        Attribute::MaxBreakingHeight => breaking_height(flat, "swell_maxBreakingHeight"),
        Attribute::AbsMaxBreakingHeight => breaking_height(flat, "swell_absMaxBreakingHeight"),
        Attribute::MinBreakingHeight => breaking_height(flat, "swell_minBreakingHeight"),
        Attribute::AbsMinBreakingHeight => breaking_height(flat, "swell_absMinBreakingHeight"),
        Attribute::Probability => template(&[field("swell_probability")], |v| format!("{}%", v[0])),
        Attribute::SwellDirection => template(
            &[field("swell_components_combined_compassDirection")],
            |v| v[0].to_string(),
        ),
        Attribute::SwellPeriod => template(&[field("swell_components_combined_period")], |v| {
            format!("{} seconds", v[0])
        }),
        Attribute::WindChill => template(&[field("wind_chill")], |v| format!("{}°", v[0])),
        Attribute::WindDirection => template(
            &[field("wind_direction"), field("wind_compassDirection")],
            |v| format!("{}° {}", v[0], v[1]),
        ),
        Attribute::WindGusts => template(&[field("wind_gusts"), field("wind_unit")], |v| {
            format!("{} {}", v[0], v[1])
        }),
        Attribute::WindSpeed => template(&[field("wind_speed"), field("wind_unit")], |v| {
            format!("{} {}", v[0], v[1])
        }),
    }
}

fn breaking_height(flat: &FlatForecast, key: &str) -> Rendered {
    template(
        &[Field::read(flat, key), Field::read(flat, "swell_unit")],
        |v| format!("{} {}", v[0], v[1]),
    )
}

/// A template input already rendered to text.
struct Field {
    text: String,
    present: bool,
}

impl Field {
    fn read(flat: &FlatForecast, key: &str) -> Field {
        match flat.get(key) {
            None | Some(Value::Null) => Field::missing(),
            Some(value) => Field {
                text: display_value(value),
                present: true,
            },
        }
    }

    fn time(flat: &FlatForecast, key: &str) -> Field {
        match flat.get(key).and_then(epoch_seconds).and_then(human_time) {
            Some(text) => Field {
                text,
                present: true,
            },
            None => Field::missing(),
        }
    }

    fn missing() -> Field {
        Field {
            text: MISSING.to_string(),
            present: false,
        }
    }
}

fn template(inputs: &[Field], render: impl FnOnce(&[&str]) -> String) -> Rendered {
    let texts: Vec<&str> = inputs.iter().map(|f| f.text.as_str()).collect();
    Rendered {
        text: render(&texts),
        complete: inputs.iter().all(|f| f.present),
    }
}

/// Render a scalar for display templates:
/// integers as-is, floats in shortest form (`4.0`, `4.14`), strings raw,
/// booleans capitalised and null as `None`.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => MISSING.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read epoch seconds from an integer, a float (truncated) or a numeric string.
pub fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Render epoch seconds as `"Sat 6 PM"` in UTC.
pub fn human_time(epoch: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(epoch, 0).map(|dt| dt.format("%a %-I %p").to_string())
}

//! Popup payloads attached to rendered features.
//!
//! Content is structured (title plus label/value rows) and can be rendered as
//! HTML markup or as plain text; the egui widget paints the structured form.

use crate::data::feature::{BoundaryFeature, EarthquakeFeature};
use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

const UNKNOWN_PLACE: &str = "Unknown location";
const UNKNOWN_BOUNDARY: &str = "Unnamed boundary";
const UNKNOWN_DATE: &str = "Unknown date";
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopupContent {
    pub title: String,
    pub rows: Vec<PopupRow>,
}

impl PopupContent {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    pub fn with_row(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.rows.push(PopupRow {
            label: label.into(),
            value: value.into(),
        });
        self
    }

    /// Place, magnitude, depth and local origin time
    pub fn earthquake(quake: &EarthquakeFeature) -> Self {
        Self::earthquake_in(quake, &Local)
    }

    /// Same as [`PopupContent::earthquake`] with an explicit time zone
    pub fn earthquake_in<Tz>(quake: &EarthquakeFeature, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let date = quake
            .timestamp_ms
            .and_then(|ms| format_timestamp(ms, tz))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        Self::new(quake.place.as_deref().unwrap_or(UNKNOWN_PLACE))
            .with_row("Magnitude", format_number(quake.magnitude, ""))
            .with_row("Depth", format_number(quake.depth_km, " km"))
            .with_row("Date", date)
    }

    /// Boundary name, step class and relative velocity
    pub fn boundary(boundary: &BoundaryFeature) -> Self {
        Self::new(
            boundary
                .plate_boundary_name
                .as_deref()
                .unwrap_or(UNKNOWN_BOUNDARY),
        )
        .with_row(
            "Type",
            boundary.step_class.as_deref().unwrap_or(NOT_AVAILABLE),
        )
        .with_row(
            "Velocity",
            format_number(boundary.velocity_mm_per_year, " mm/yr"),
        )
    }

    /// `<h3>title</h3><hr><p>Label: value</p>...` with text escaped
    pub fn to_markup(&self) -> String {
        let mut markup = format!("<h3>{}</h3><hr>", escape_html(&self.title));
        for row in &self.rows {
            markup.push_str(&format!(
                "<p>{}: {}</p>",
                escape_html(&row.label),
                escape_html(&row.value)
            ));
        }
        markup
    }

    pub fn to_plain_text(&self) -> String {
        let mut text = self.title.clone();
        for row in &self.rows {
            text.push('\n');
            text.push_str(&format!("{}: {}", row.label, row.value));
        }
        text
    }
}

/// `Www Mmm dd yyyy HH:MM:SS GMT+hhmm` in `tz`; `None` if out of range
pub fn format_timestamp<Tz>(epoch_ms: i64, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|dt| dt.format("%a %b %d %Y %H:%M:%S GMT%z").to_string())
}

fn format_number(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

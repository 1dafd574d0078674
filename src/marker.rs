use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tracing::warn;

use crate::classify::choose_color;
use crate::constants::{FILL_OPACITY, RADIUS_SCALE, STROKE_OPACITY, STROKE_WEIGHT};
use crate::feed::QuakeFeature;

// Options handed straight to L.circleMarker, hence the camelCase names
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub radius: f64,
    pub color: &'static str,
    pub fill_color: &'static str,
    pub weight: u32,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl CircleStyle {
    pub fn for_magnitude(mag: f64) -> Self {
        let color = choose_color(Some(mag));
        Self {
            radius: (mag * RADIUS_SCALE).max(0.0),
            color,
            fill_color: color,
            weight: STROKE_WEIGHT,
            opacity: STROKE_OPACITY,
            fill_opacity: FILL_OPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub id: Option<String>,
    pub lat: f64,
    pub lng: f64,
    pub depth: Option<f64>,
    pub magnitude: f64,
    pub style: CircleStyle,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingGeometry,
    MissingMagnitude,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingGeometry => write!(f, "no point geometry"),
            SkipReason::MissingMagnitude => write!(f, "no magnitude"),
        }
    }
}

/// Markers built from one feed response plus the number of features dropped.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    pub markers: Vec<Marker>,
    pub skipped: usize,
}

pub fn build_marker(feature: &QuakeFeature) -> Result<Marker, SkipReason> {
    let geometry = feature
        .geometry
        .as_ref()
        .ok_or(SkipReason::MissingGeometry)?;
    let (lng, lat) = match (geometry.longitude(), geometry.latitude()) {
        (Some(lng), Some(lat)) => (lng, lat),
        _ => return Err(SkipReason::MissingGeometry),
    };
    let mag = feature.properties.mag.ok_or(SkipReason::MissingMagnitude)?;

    Ok(Marker {
        id: feature.id.clone(),
        lat,
        lng,
        depth: geometry.depth(),
        magnitude: mag,
        style: CircleStyle::for_magnitude(mag),
        popup: popup_html(feature, mag, geometry.depth()),
    })
}

pub fn build_markers(features: &[QuakeFeature]) -> MarkerSet {
    let mut set = MarkerSet::default();

    for feature in features {
        match build_marker(feature) {
            Ok(marker) => set.markers.push(marker),
            Err(reason) => {
                warn!(
                    id = feature.id.as_deref().unwrap_or("<no id>"),
                    "⚠️  Skipping earthquake feature: {}", reason
                );
                set.skipped += 1;
            }
        }
    }

    set
}

fn popup_html(feature: &QuakeFeature, mag: f64, depth: Option<f64>) -> String {
    let props = &feature.properties;
    let place = props.place.as_deref().unwrap_or("Unknown location");
    let felt = props
        .felt
        .map(|n| n.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut html = format!(
        "<h3>Where: {}</h3><hr><p>Time: {}</p><hr><p>Magnitude: {}</p><hr><p>Number of \"Felt\" Reports: {}</p>",
        escape_html(place),
        format_event_time(props.time),
        mag,
        felt
    );

    if let Some(depth) = depth {
        html.push_str(&format!("<p>Depth: {:.1} km</p>", depth));
    }
    if let Some(url) = props.url.as_deref() {
        html.push_str(&format!(
            "<p><a href=\"{}\" target=\"_blank\">Event details</a></p>",
            escape_html(url)
        ));
    }

    html
}

pub fn format_event_time(epoch_ms: Option<i64>) -> String {
    epoch_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%a %b %d %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown time".to_string())
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

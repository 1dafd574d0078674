//! USGS FDSN event feed: query construction, GeoJSON types and the single
//! GET that starts each render cycle.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::constants::{
    BBOX_MAX_LATITUDE, BBOX_MAX_LONGITUDE, BBOX_MIN_LATITUDE, BBOX_MIN_LONGITUDE,
    USGS_QUERY_ENDPOINT,
};

// Envelope of the GeoJSON document; features are decoded one at a time
#[derive(Debug, Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<serde_json::Value>,
}

/// Decoded feed response. `rejected` counts features whose fields had the
/// wrong JSON types.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<QuakeFeature>,
    pub rejected: usize,
}

impl FeatureCollection {
    pub fn received(&self) -> usize {
        self.features.len() + self.rejected
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuakeFeature {
    pub id: Option<String>,
    #[serde(default)]
    pub properties: QuakeProperties,
    pub geometry: Option<PointGeometry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuakeProperties {
    pub place: Option<String>,
    pub time: Option<i64>, // epoch milliseconds
    pub mag: Option<f64>,
    pub felt: Option<u32>,
    pub url: Option<String>,
}

// `coordinates` is [longitude, latitude, depth_km]; any entry may be null
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<Option<f64>>,
}

impl PointGeometry {
    pub fn longitude(&self) -> Option<f64> {
        self.coordinates.first().copied().flatten()
    }

    pub fn latitude(&self) -> Option<f64> {
        self.coordinates.get(1).copied().flatten()
    }

    pub fn depth(&self) -> Option<f64> {
        self.coordinates.get(2).copied().flatten()
    }
}

/// Query parameters sent to the event service. The bounding box covers the
/// contiguous United States and is not configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeQuery {
    pub endpoint: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for QuakeQuery {
    fn default() -> Self {
        Self {
            endpoint: USGS_QUERY_ENDPOINT.to_string(),
            start: default_start_date(),
            end: default_end_date(),
        }
    }
}

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap_or_default()
}

pub fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 2).unwrap_or_default()
}

impl QuakeQuery {
    pub fn url(&self) -> Result<Url> {
        if self.end < self.start {
            bail!(
                "endtime {} is earlier than starttime {}",
                self.end,
                self.start
            );
        }

        let params = [
            ("format", "geojson".to_string()),
            ("starttime", self.start.format("%Y-%m-%d").to_string()),
            ("endtime", self.end.format("%Y-%m-%d").to_string()),
            ("maxlongitude", BBOX_MAX_LONGITUDE.to_string()),
            ("minlongitude", BBOX_MIN_LONGITUDE.to_string()),
            ("maxlatitude", BBOX_MAX_LATITUDE.to_string()),
            ("minlatitude", BBOX_MIN_LATITUDE.to_string()),
        ];

        Url::parse_with_params(&self.endpoint, &params)
            .with_context(|| format!("Invalid feed endpoint: {}", self.endpoint))
    }
}

/// HTTP client bound to one query URL.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::Client,
    url: Url,
}

impl FeedClient {
    pub fn new(query: &QuakeQuery, timeout: Duration) -> Result<Self> {
        Self::with_url(query.url()?, timeout)
    }

    pub fn with_url(url: Url, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("quakemap/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Performs the GET and decodes the FeatureCollection.
    pub async fn fetch(&self) -> Result<FeatureCollection> {
        info!(url = %self.url, "🌐 Fetching earthquake feed");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("Failed to reach earthquake feed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Earthquake feed returned HTTP status {}", status);
        }

        let body = response
            .text()
            .await
            .context("Failed to read earthquake feed body")?;
        debug!(bytes = body.len(), "Feed body received");

        parse_feature_collection(&body)
    }
}

pub fn parse_feature_collection(body: &str) -> Result<FeatureCollection> {
    let raw: RawCollection =
        serde_json::from_str(body).context("Earthquake feed returned malformed GeoJSON")?;

    if raw.kind != "FeatureCollection" {
        bail!(
            "Expected a GeoJSON FeatureCollection, got type \"{}\"",
            raw.kind
        );
    }

    let mut collection = FeatureCollection::default();
    for value in raw.features {
        let id = value
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or("<no id>")
            .to_string();
        match serde_json::from_value::<QuakeFeature>(value) {
            Ok(feature) => collection.features.push(feature),
            Err(e) => {
                warn!(id = %id, "⚠️  Rejecting malformed earthquake feature: {}", e);
                collection.rejected += 1;
            }
        }
    }

    Ok(collection)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"count": 2},
        "features": [
            {
                "type": "Feature",
                "id": "ci39752287",
                "properties": {
                    "mag": 1.29,
                    "place": "10km SW of Idyllwild, CA",
                    "time": 1609459325490,
                    "felt": null,
                    "url": "https://earthquake.usgs.gov/earthquakes/eventpage/ci39752287",
                    "tsunami": 0
                },
                "geometry": {"type": "Point", "coordinates": [-116.7941667, 33.6633333, 13.12]}
            },
            {
                "type": "Feature",
                "properties": {"mag": null, "place": null, "time": null},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn default_query_matches_fixed_url() {
        let url = QuakeQuery::default().url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://earthquake.usgs.gov/fdsnws/event/1/query?format=geojson&starttime=2021-01-01&endtime=2021-01-02&maxlongitude=-69.52148437&minlongitude=-123.83789062&maxlatitude=48.74894534&minlatitude=25.16517337"
        );
    }

    #[test]
    fn reversed_dates_are_rejected() {
        let query = QuakeQuery {
            start: default_end_date(),
            end: default_start_date(),
            ..QuakeQuery::default()
        };
        assert!(query.url().is_err());
    }

    #[test]
    fn parses_usgs_features() {
        let collection = parse_feature_collection(SAMPLE).unwrap();
        assert_eq!(collection.features.len(), 2);

        let first = &collection.features[0];
        assert_eq!(first.id.as_deref(), Some("ci39752287"));
        assert_eq!(first.properties.mag, Some(1.29));
        assert_eq!(first.properties.felt, None);
        assert_eq!(first.properties.time, Some(1609459325490));

        let geometry = first.geometry.as_ref().unwrap();
        assert_eq!(geometry.longitude(), Some(-116.7941667));
        assert_eq!(geometry.latitude(), Some(33.6633333));
        assert_eq!(geometry.depth(), Some(13.12));

        let second = &collection.features[1];
        assert!(second.geometry.is_none());
        assert!(second.properties.mag.is_none());
    }

    #[test]
    fn rejects_non_collection_documents() {
        let err = parse_feature_collection(r#"{"type": "Feature", "features": []}"#).unwrap_err();
        assert!(err.to_string().contains("FeatureCollection"));
        assert!(parse_feature_collection("<html>").is_err());
    }

    #[test]
    fn wrongly_typed_features_are_rejected_individually() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"id": "good", "properties": {"mag": 6.0}, "geometry": {"coordinates": [-118.1, 34.2, 9.5]}},
                {"id": "no-depth", "properties": {"mag": 2.1}, "geometry": {"coordinates": [-117.0, 33.0, null]}},
                {"id": "text-mag", "properties": {"mag": "4.2"}, "geometry": {"coordinates": [-116.0, 32.0, 1.0]}},
                {"id": "fractional-felt", "properties": {"mag": 3.0, "felt": 1.5}, "geometry": {"coordinates": [-115.0, 31.0, 1.0]}}
            ]
        }"#;

        let collection = parse_feature_collection(body).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.rejected, 2);
        assert_eq!(collection.received(), 4);

        let no_depth = collection.features[1].geometry.as_ref().unwrap();
        assert_eq!(no_depth.latitude(), Some(33.0));
        assert_eq!(no_depth.depth(), None);
    }

    /// Client pointed at a port that was just released, so connects fail.
    pub(crate) fn unreachable_feed() -> FeedClient {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let url = Url::parse(&format!("http://{}/query", addr)).unwrap();
        FeedClient::with_url(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn unreachable_feed_is_an_error() {
        assert!(unreachable_feed().fetch().await.is_err());
    }
}

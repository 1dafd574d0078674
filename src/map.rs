use serde::Serialize;

use crate::constants::{
    MAP_CENTER_LAT, MAP_CENTER_LNG, MAP_ELEMENT_ID, MAP_ZOOM, STREET_ATTRIBUTION,
    STREET_TILES_URL, TOPO_ATTRIBUTION, TOPO_TILES_URL,
};
use crate::legend::Legend;
use crate::marker::{Marker, MarkerSet};

pub const STREET_LAYER: &str = "Street Map";
pub const TOPO_LAYER: &str = "Topographic Map";
pub const EARTHQUAKE_OVERLAY: &str = "Earthquakes";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub name: &'static str,
    pub url: &'static str,
    pub attribution: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub name: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerControl {
    pub collapsed: bool,
}

/// Everything the front end needs to construct the Leaflet map, minus the
/// markers themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub element_id: &'static str,
    pub center: [f64; 2], // [lat, lng]
    pub zoom: u8,
    pub base_layers: Vec<TileLayer>,
    pub overlays: Vec<Overlay>,
    pub layer_control: LayerControl,
    pub legend: Legend,
}

pub fn build_map_view(legend: Legend) -> MapView {
    MapView {
        element_id: MAP_ELEMENT_ID,
        center: [MAP_CENTER_LAT, MAP_CENTER_LNG],
        zoom: MAP_ZOOM,
        base_layers: vec![
            TileLayer {
                name: STREET_LAYER,
                url: STREET_TILES_URL,
                attribution: STREET_ATTRIBUTION,
                visible: true,
            },
            TileLayer {
                name: TOPO_LAYER,
                url: TOPO_TILES_URL,
                attribution: TOPO_ATTRIBUTION,
                visible: false,
            },
        ],
        overlays: vec![Overlay {
            name: EARTHQUAKE_OVERLAY,
            visible: true,
        }],
        layer_control: LayerControl { collapsed: false },
        legend,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStatus {
    Ready,
    Unavailable,
}

/// Result of one render cycle, serialized as the `/api/map` body and as the
/// payload inlined into exported pages.
#[derive(Debug, Clone, Serialize)]
pub struct MapPayload {
    pub status: MapStatus,
    pub message: Option<String>,
    pub view: MapView,
    pub markers: Vec<Marker>,
    pub fetched: usize,
    pub skipped: usize,
}

impl MapPayload {
    pub fn ready(view: MapView, fetched: usize, set: MarkerSet) -> Self {
        Self {
            status: MapStatus::Ready,
            message: None,
            view,
            markers: set.markers,
            fetched,
            skipped: set.skipped,
        }
    }

    /// Base layers and legend still render; the front end shows `message`.
    pub fn unavailable(view: MapView, reason: impl Into<String>) -> Self {
        Self {
            status: MapStatus::Unavailable,
            message: Some(format!("Map data unavailable: {}", reason.into())),
            view,
            markers: Vec::new(),
            fetched: 0,
            skipped: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LEGEND_BREAKPOINTS;
    use crate::legend::build_legend;

    fn view() -> MapView {
        build_map_view(build_legend(&LEGEND_BREAKPOINTS))
    }

    fn base_layer<'a>(view: &'a MapView, name: &str) -> &'a TileLayer {
        view.base_layers.iter().find(|layer| layer.name == name).unwrap()
    }

    #[test]
    fn initial_view_is_centered_on_the_us() {
        let view = view();
        assert_eq!(view.center, [37.09, -95.71]);
        assert_eq!(view.zoom, 5);
        assert_eq!(view.element_id, "map");
        assert!(!view.layer_control.collapsed);
    }

    #[test]
    fn street_and_earthquakes_visible_by_default() {
        let view = view();
        assert!(base_layer(&view, STREET_LAYER).visible);
        assert!(!base_layer(&view, TOPO_LAYER).visible);
        assert_eq!(view.overlays.len(), 1);
        assert_eq!(view.overlays[0].name, EARTHQUAKE_OVERLAY);
        assert!(view.overlays[0].visible);
        assert_eq!(view.base_layers.iter().filter(|l| l.visible).count(), 1);
    }

    #[test]
    fn legend_is_attached() {
        assert_eq!(view().legend.entries.len(), 5);
    }

    #[test]
    fn unavailable_payload_serializes_status_and_message() {
        let payload = MapPayload::unavailable(view(), "connection refused");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["message"], "Map data unavailable: connection refused");
        assert_eq!(json["markers"].as_array().unwrap().len(), 0);
        assert_eq!(json["view"]["center"][0], 37.09);
    }
}

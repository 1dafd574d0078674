// Server configuration
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT: &str = "quakemap.html";
pub const CONFIG_FILE_NAME: &str = "quakemap.ini";

// USGS FDSN event service
pub const USGS_QUERY_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
pub const BBOX_MAX_LONGITUDE: f64 = -69.52148437;
pub const BBOX_MIN_LONGITUDE: f64 = -123.83789062;
pub const BBOX_MAX_LATITUDE: f64 = 48.74894534;
pub const BBOX_MIN_LATITUDE: f64 = 25.16517337;

// Map view
pub const MAP_CENTER_LAT: f64 = 37.09;
pub const MAP_CENTER_LNG: f64 = -95.71;
pub const MAP_ZOOM: u8 = 5;
pub const MAP_ELEMENT_ID: &str = "map";

// Marker styling
pub const RADIUS_SCALE: f64 = 5.0;
pub const STROKE_WEIGHT: u32 = 1;
pub const STROKE_OPACITY: f64 = 0.8;
pub const FILL_OPACITY: f64 = 0.35;

// Legend
pub const LEGEND_BREAKPOINTS: [f64; 5] = [1.0, 2.5, 4.0, 5.5, 8.0];
// Swatches are sampled one unit above each breakpoint
pub const LEGEND_SWATCH_OFFSET: f64 = 1.0;
pub const LEGEND_POSITION: &str = "bottomright";
pub const LEGEND_TITLE: &str = "Magnitude";

// Tile layers
pub const STREET_TILES_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const STREET_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;
pub const TOPO_TILES_URL: &str = "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png";
pub const TOPO_ATTRIBUTION: &str = r#"Map data: &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, <a href="http://viewfinderpanoramas.org">SRTM</a> | Map style: &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (<a href="https://creativecommons.org/licenses/by-sa/3.0/">CC-BY-SA</a>)"#;

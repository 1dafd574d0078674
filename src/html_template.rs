use anyhow::{Context, Result};
use rust_embed::RustEmbed;
use std::borrow::Cow;

use crate::map::MapPayload;
use crate::pipeline::default_view;

// Leaflet front end compiled into the binary
#[derive(RustEmbed)]
#[folder = "frontend/"]
pub struct Asset;

const STYLE_PLACEHOLDER: &str = "<!-- STYLE_PLACEHOLDER -->";
const DATA_PLACEHOLDER: &str = "<!-- DATA_PLACEHOLDER -->";
const SCRIPT_PLACEHOLDER: &str = "<!-- SCRIPT_PLACEHOLDER -->";

pub fn asset_text(name: &str) -> Result<String> {
    let file = Asset::get(name).with_context(|| format!("Embedded asset missing: {}", name))?;
    let text = std::str::from_utf8(&file.data)
        .with_context(|| format!("Embedded asset is not UTF-8: {}", name))?;
    Ok(text.to_string())
}

/// Index page for the HTTP server. Styles and script load from their
/// routes and markers come from `/api/map`; the static map view is inlined
/// so base layers and legend render even when that request fails.
pub fn served_index_html() -> Result<String> {
    let template = asset_text("index.html")?;
    let view = serde_json::to_string(&default_view()).context("Failed to serialize map view")?;

    Ok(template
        .replace(
            STYLE_PLACEHOLDER,
            r#"<link rel="stylesheet" href="/style.css" />"#,
        )
        .replace(
            DATA_PLACEHOLDER,
            &format!(
                "<script>window.QUAKEMAP_VIEW = {};</script>",
                escape_script(&view)
            ),
        )
        .replace(SCRIPT_PLACEHOLDER, r#"<script src="/map.js"></script>"#))
}

/// Single-file page with stylesheet, script and payload inlined.
pub fn render_standalone_html(payload: &MapPayload) -> Result<String> {
    let template = asset_text("index.html")?;
    let style = asset_text("style.css")?;
    let script = asset_text("map.js")?;
    let data = serde_json::to_string(payload).context("Failed to serialize map payload")?;

    Ok(template
        .replace(STYLE_PLACEHOLDER, &format!("<style>\n{}</style>", style))
        .replace(
            DATA_PLACEHOLDER,
            &format!(
                "<script>window.QUAKEMAP_DATA = {};</script>",
                escape_script(&data)
            ),
        )
        .replace(
            SCRIPT_PLACEHOLDER,
            &format!("<script>\n{}</script>", escape_script(&script)),
        ))
}

// A literal "</" would terminate the inline <script> element early
fn escape_script(text: &str) -> Cow<'_, str> {
    if text.contains("</") {
        Cow::Owned(text.replace("</", "<\\/"))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerSet;

    #[test]
    fn served_page_links_assets() {
        let html = served_index_html().unwrap();
        assert!(html.contains(r#"<div id="map"></div>"#));
        assert!(html.contains(r#"href="/style.css""#));
        assert!(html.contains(r#"src="/map.js""#));
        assert!(!html.contains("PLACEHOLDER"));
        assert!(!html.contains("QUAKEMAP_DATA ="));
    }

    #[test]
    fn served_page_inlines_fallback_view() {
        let html = served_index_html().unwrap();
        let start = html.find("window.QUAKEMAP_VIEW = ").unwrap();
        let end = start + html[start..].find(";</script>").unwrap();
        let json = html[start + "window.QUAKEMAP_VIEW = ".len()..end].replace(r"<\/", "</");

        let view: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(view["zoom"], 5);
        assert_eq!(view["base_layers"][0]["name"], "Street Map");
        assert_eq!(view["legend"]["entries"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn embedded_assets_decode_as_text() {
        for name in ["index.html", "style.css", "map.js"] {
            assert!(!asset_text(name).unwrap().is_empty(), "{name} is empty");
        }
        let err = asset_text("missing.js").unwrap_err();
        assert!(err.to_string().contains("missing.js"));
    }

    #[test]
    fn standalone_page_inlines_payload() {
        let payload = MapPayload::ready(default_view(), 0, MarkerSet::default());
        let html = render_standalone_html(&payload).unwrap();

        assert!(html.contains("window.QUAKEMAP_DATA = {"));
        assert!(html.contains(r#""status":"ready""#));
        assert!(html.contains("function createMap"));
        assert!(!html.contains("PLACEHOLDER"));
        assert!(!html.contains(r#"src="/map.js""#));
    }

    #[test]
    fn standalone_page_escapes_closing_tags() {
        // Legend and popup HTML carry closing tags
        let payload = MapPayload::ready(default_view(), 0, MarkerSet::default());
        let html = render_standalone_html(&payload).unwrap();

        let start = html.find("window.QUAKEMAP_DATA").unwrap();
        let end = start + html[start..].find("</script>").unwrap();
        let inline = &html[start..end];
        assert!(inline.contains(r"<\/h4>"));
        assert!(!inline.contains("</"));
    }
}

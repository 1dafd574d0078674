use tracing::{error, info};

use crate::constants::LEGEND_BREAKPOINTS;
use crate::feed::FeedClient;
use crate::legend::build_legend;
use crate::map::{build_map_view, MapPayload, MapView};
use crate::marker::build_markers;

pub fn default_view() -> MapView {
    build_map_view(build_legend(&LEGEND_BREAKPOINTS))
}

/// One render cycle: a single fetch, then the marker transform. Fetch and
/// decode failures become an `unavailable` payload.
pub async fn load_payload(feed: &FeedClient) -> MapPayload {
    let view = default_view();

    match feed.fetch().await {
        Ok(collection) => {
            let fetched = collection.received();
            let mut set = build_markers(&collection.features);
            set.skipped += collection.rejected;
            info!(
                fetched,
                markers = set.markers.len(),
                skipped = set.skipped,
                "✅ Earthquake markers ready"
            );
            MapPayload::ready(view, fetched, set)
        }
        Err(e) => {
            error!("❌ Earthquake feed unavailable: {:#}", e);
            MapPayload::unavailable(view, format!("{:#}", e))
        }
    }
}

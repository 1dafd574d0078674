use crate::feed::FeedClient;

// Application state shared by the handlers. Holds no per-request data:
// every page view triggers its own fetch.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedClient,
}

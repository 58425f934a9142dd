//! Host-page address helpers: video id extraction from item links,
//! watch-session URL composition, and playlist-view detection.
//!
//! These work directly on string slices and never allocate on the lookup
//! path.

/// Base of the composed multi-video watch session.
const WATCH_VIDEOS_BASE: &str = "https://www.youtube.com/watch_videos?video_ids=";

/// Extract the video id from an item's title-link address: the value of the
/// `v` query parameter, up to the next `&`.
pub fn extract_video_id(href: &str) -> Option<&str> {
    let (_, query) = href.split_once('?')?;
    let query = query.split_once('#').map_or(query, |(q, _)| q);

    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| !id.is_empty())
}

/// Compose the watch-session address for the given ids, in order.
///
/// Fewer than two ids is not a session; returns `None` so the caller can
/// no-op.
pub fn watch_videos_url(ids: &[&str]) -> Option<String> {
    if ids.len() < 2 {
        return None;
    }
    Some(format!("{}{}", WATCH_VIDEOS_BASE, ids.join(",")))
}

/// Is this address a playlist view? In-app navigation anywhere else is
/// ignored by the navigation watcher.
pub fn is_playlist_url(url: &str) -> bool {
    url.contains("/playlist?")
}

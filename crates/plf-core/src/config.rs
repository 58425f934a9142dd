//! Selector and bucket configuration.
//!
//! The host page's DOM schema is data, not logic: every lookup the content
//! script performs goes through a role in [`SelectorConfig`]. Defaults target
//! the YouTube desktop playlist page; the wasm entry point accepts a JSON
//! blob overriding any subset of roles, so a markup change is a config
//! change.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::FilterKey;

/// One named duration range, in minutes. A missing bound is unbounded in
/// that direction; `min` is inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct DurationBucket {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid selector config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("selector config is missing a value for `{0}`")]
    MissingRole(&'static str),
}

/// Lookup expressions for every role the content script touches, plus the
/// duration buckets and the one persisted preference key.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorConfig {
    /// The playlist's item list container
    pub playlist_container: String,
    /// One playlist entry row
    pub video_item: String,
    /// Title link inside an item; its href carries the `v=<id>` parameter
    pub video_title: String,
    /// Channel-name element inside an item; display name in its `title` attr
    pub channel_name: String,
    /// Duration text inside an item
    pub video_duration: String,

    /// Class put on the injected filter panel
    pub filter_panel_class: String,
    /// Channel dropdown (exact match)
    pub channel_filter: String,
    /// Duration bucket dropdown
    pub duration_filter: String,
    /// Channel search text input
    pub channel_search: String,
    /// Title search text input
    pub title_search: String,
    /// Clears every filter at once
    pub reset_all_button: String,
    /// Per-field reset buttons; each carries the target input id in `data-for`
    pub reset_field_button: String,
    /// Opens the filtered subset as a new watch session
    pub play_filtered_button: String,
    /// Stats line ("N videos • H:MM:SS total")
    pub stats_text: String,
    /// Info icon shown next to the stats line
    pub stats_info_icon: String,
    /// Compact-view checkbox
    pub compact_toggle: String,
    /// Class toggled on the playlist container in compact view
    pub compact_class: String,
    /// localStorage key persisting the compact-view boolean
    pub compact_storage_key: String,

    /// Bundled asset paths, resolved by the extension packaging
    pub stylesheet_path: String,
    pub panel_template_path: String,

    /// Named duration buckets offered by the duration dropdown
    pub buckets: BTreeMap<String, DurationBucket>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        let mut buckets = BTreeMap::new();
        buckets.insert("short".to_string(), DurationBucket { min: None, max: Some(10) });
        buckets.insert("medium".to_string(), DurationBucket { min: Some(10), max: Some(30) });
        buckets.insert("long".to_string(), DurationBucket { min: Some(30), max: Some(60) });
        buckets.insert("very-long".to_string(), DurationBucket { min: Some(60), max: None });

        Self {
            playlist_container: "ytd-playlist-video-list-renderer".into(),
            video_item: "ytd-playlist-video-renderer".into(),
            video_title: "a#video-title".into(),
            channel_name: "ytd-channel-name a".into(),
            video_duration: "ytd-thumbnail-overlay-time-status-renderer span".into(),

            filter_panel_class: "plf-filter-panel".into(),
            channel_filter: "#plf-channel-filter".into(),
            duration_filter: "#plf-duration-filter".into(),
            channel_search: "#plf-channel-search".into(),
            title_search: "#plf-title-search".into(),
            reset_all_button: "#plf-reset-filters".into(),
            reset_field_button: ".plf-reset-field".into(),
            play_filtered_button: "#plf-play-filtered".into(),
            stats_text: "#plf-filter-stats".into(),
            stats_info_icon: "#plf-stats-icon".into(),
            compact_toggle: "#plf-compact-toggle".into(),
            compact_class: "plf-compact".into(),
            compact_storage_key: "yt-wl-compact-view".into(),

            stylesheet_path: "assets/styles.css".into(),
            panel_template_path: "assets/filter-panel.html".into(),

            buckets,
        }
    }
}

impl SelectorConfig {
    /// Parse a JSON override. Missing fields keep their YouTube defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SelectorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        // The two roles everything else hangs off.
        if self.playlist_container.is_empty() {
            return Err(ConfigError::MissingRole("playlistContainer"));
        }
        if self.video_item.is_empty() {
            return Err(ConfigError::MissingRole("videoItem"));
        }
        Ok(())
    }

    /// Input selector for a filter field.
    pub fn input_selector(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Channel => &self.channel_filter,
            FilterKey::ChannelSearch => &self.channel_search,
            FilterKey::TitleSearch => &self.title_search,
            FilterKey::Duration => &self.duration_filter,
        }
    }

    /// Reverse lookup from an input element id (as carried by a reset
    /// button's `data-for`) to the field it feeds.
    pub fn key_for_input_id(&self, id: &str) -> Option<FilterKey> {
        FilterKey::ALL
            .into_iter()
            .find(|key| trim_id(self.input_selector(*key)) == id)
    }

    pub fn bucket(&self, name: &str) -> Option<&DurationBucket> {
        self.buckets.get(name)
    }
}

/// `"#plf-channel-filter"` → `"plf-channel-filter"`.
fn trim_id(selector: &str) -> &str {
    selector.strip_prefix('#').unwrap_or(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_target_youtube() {
        let config = SelectorConfig::default();
        assert_eq!(config.video_item, "ytd-playlist-video-renderer");
        assert_eq!(config.compact_storage_key, "yt-wl-compact-view");
        assert_eq!(config.buckets.len(), 4);
    }

    #[test]
    fn from_json_overrides_a_subset() {
        let config = SelectorConfig::from_json(
            r#"{"videoItem": ".row", "buckets": {"tiny": {"max": 2}}}"#,
        )
        .unwrap();
        assert_eq!(config.video_item, ".row");
        // Untouched roles keep their defaults.
        assert_eq!(config.channel_filter, "#plf-channel-filter");
        assert_eq!(
            config.bucket("tiny"),
            Some(&DurationBucket { min: None, max: Some(2) })
        );
        assert_eq!(config.bucket("short"), None);
    }

    #[test]
    fn from_json_rejects_garbage_and_empty_roles() {
        assert!(SelectorConfig::from_json("{not json").is_err());
        assert!(SelectorConfig::from_json(r#"{"videoItem": ""}"#).is_err());
    }

    #[test]
    fn input_id_round_trips_to_filter_key() {
        let config = SelectorConfig::default();
        assert_eq!(
            config.key_for_input_id("plf-channel-filter"),
            Some(FilterKey::Channel)
        );
        assert_eq!(
            config.key_for_input_id("plf-title-search"),
            Some(FilterKey::TitleSearch)
        );
        assert_eq!(config.key_for_input_id("plf-unknown"), None);
    }
}

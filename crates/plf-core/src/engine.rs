//! Filter state transitions and the per-item visibility decision.
//!
//! The engine is deliberately pure: it holds the four filter values and the
//! named buckets, and answers "is this item visible" for borrowed item
//! views. A full pass over the item list is therefore idempotent and
//! order-independent — running it twice with no state change in between
//! produces identical visibility and stats.

use std::collections::BTreeMap;

use crate::config::DurationBucket;
use crate::duration::{format_minutes, in_bucket};
use crate::search::matches_query;
use crate::types::{ActiveFilters, FilterKey, FilterState, VideoFields, VideoStats};

pub struct FilterEngine {
    state: FilterState,
    buckets: BTreeMap<String, DurationBucket>,
}

impl FilterEngine {
    pub fn new(buckets: BTreeMap<String, DurationBucket>) -> Self {
        Self {
            state: FilterState::default(),
            buckets,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Store a field value. Empty string deactivates the field.
    pub fn set_field(&mut self, key: FilterKey, value: &str) {
        self.state.set(key, value.to_string());
    }

    pub fn clear_field(&mut self, key: FilterKey) {
        self.state.set(key, String::new());
    }

    pub fn reset_all(&mut self) {
        log::debug!("resetting all filter fields");
        self.state = FilterState::default();
    }

    pub fn active(&self) -> ActiveFilters {
        self.state.active()
    }

    pub fn has_active(&self) -> bool {
        !self.active().is_empty()
    }

    /// Visibility decision for one item under the current state.
    ///
    /// With no active field every item is visible; otherwise all four field
    /// predicates must hold. An unknown bucket name never excludes.
    pub fn is_visible(&self, item: &VideoFields<'_>) -> bool {
        if !self.has_active() {
            return true;
        }

        if !self.state.channel.is_empty() && item.channel != self.state.channel {
            return false;
        }

        if !matches_query(item.channel, &self.state.channel_search) {
            return false;
        }

        if !matches_query(item.title, &self.state.title_search) {
            return false;
        }

        if !self.state.duration.is_empty() {
            if let Some(bucket) = self.buckets.get(&self.state.duration) {
                if !in_bucket(item.duration_min, bucket) {
                    return false;
                }
            }
        }

        true
    }

    /// Aggregate count and total duration over the visible items.
    /// Unparseable durations count as zero minutes.
    pub fn stats<'a>(&self, visible: impl IntoIterator<Item = VideoFields<'a>>) -> VideoStats {
        let mut count = 0;
        let mut total_minutes = 0u32;
        for item in visible {
            count += 1;
            total_minutes += item.duration_min.unwrap_or(0);
        }
        VideoStats {
            count,
            total: format_minutes(total_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::duration::parse_duration;

    fn engine() -> FilterEngine {
        FilterEngine::new(SelectorConfig::default().buckets)
    }

    fn item<'a>(channel: &'a str, title: &'a str, duration: &'a str) -> VideoFields<'a> {
        VideoFields {
            channel,
            title,
            duration_min: parse_duration(duration),
        }
    }

    const ITEMS: [(&str, &str, &str); 4] = [
        ("Rust Channel", "Ownership explained", "12:30"),
        ("Rust Channel", "Borrow checker deep dive", "1:05:00"),
        ("Génériques TV", "Déjà vu compilation", "3:10"),
        ("Lofi Radio", "beats to build crates to", "live"),
    ];

    fn visible(engine: &FilterEngine) -> Vec<&'static str> {
        ITEMS
            .iter()
            .filter(|(c, t, d)| engine.is_visible(&item(c, t, d)))
            .map(|(_, t, _)| *t)
            .collect()
    }

    #[test]
    fn no_active_filters_shows_everything() {
        let engine = engine();
        assert_eq!(visible(&engine).len(), ITEMS.len());
    }

    #[test]
    fn passes_are_idempotent() {
        let mut engine = engine();
        engine.set_field(FilterKey::TitleSearch, "deja");
        let first = visible(&engine);
        let second = visible(&engine);
        assert_eq!(first, second);
        assert_eq!(first, vec!["Déjà vu compilation"]);
    }

    #[test]
    fn channel_filter_is_exact() {
        let mut engine = engine();
        engine.set_field(FilterKey::Channel, "Rust Channel");
        assert_eq!(
            visible(&engine),
            vec!["Ownership explained", "Borrow checker deep dive"]
        );

        engine.set_field(FilterKey::Channel, "Rust");
        assert!(visible(&engine).is_empty());
    }

    #[test]
    fn channel_search_is_a_substring_query() {
        let mut engine = engine();
        engine.set_field(FilterKey::ChannelSearch, "generiques");
        assert_eq!(visible(&engine), vec!["Déjà vu compilation"]);
    }

    #[test]
    fn duration_bucket_excludes_parsed_out_of_range_only() {
        let mut engine = engine();
        engine.set_field(FilterKey::Duration, "medium");
        // 12 min is in [10, 30); 65 and 3 are out; "live" is unparseable and
        // never excluded on duration grounds.
        assert_eq!(
            visible(&engine),
            vec!["Ownership explained", "beats to build crates to"]
        );
    }

    #[test]
    fn unknown_bucket_name_never_excludes() {
        let mut engine = engine();
        engine.set_field(FilterKey::Duration, "no-such-bucket");
        assert_eq!(visible(&engine).len(), ITEMS.len());
    }

    #[test]
    fn all_active_fields_must_agree() {
        let mut engine = engine();
        engine.set_field(FilterKey::Channel, "Rust Channel");
        engine.set_field(FilterKey::TitleSearch, "borrow");
        assert_eq!(visible(&engine), vec!["Borrow checker deep dive"]);

        engine.set_field(FilterKey::Duration, "short");
        assert!(visible(&engine).is_empty());
    }

    #[test]
    fn clearing_fields_restores_visibility() {
        let mut engine = engine();
        engine.set_field(FilterKey::TitleSearch, "borrow");
        engine.clear_field(FilterKey::TitleSearch);
        assert!(!engine.has_active());
        assert_eq!(visible(&engine).len(), ITEMS.len());

        engine.set_field(FilterKey::Channel, "Lofi Radio");
        engine.reset_all();
        assert_eq!(engine.state(), &FilterState::default());
    }

    #[test]
    fn stats_count_and_sum_visible_durations() {
        let engine = engine();
        let stats = engine.stats(ITEMS.iter().map(|(c, t, d)| item(c, t, d)));
        // 12 + 65 + 3 + 0 (unparseable) = 80 minutes.
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, "1:20:00");
    }

    #[test]
    fn stats_of_nothing() {
        let engine = engine();
        let stats = engine.stats(std::iter::empty());
        assert_eq!(stats.count, 0);
        assert_eq!(stats.total, "0:00");
    }
}

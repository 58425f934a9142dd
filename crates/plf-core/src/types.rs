//! Core type definitions for Playlist Filters
//!
//! These types are shared between the filter engine and the DOM layer.

// =============================================================================
// Filter Keys
// =============================================================================

/// One filter field. Used as the dispatch key for state transitions; the
/// selector-to-field mapping is fixed at construction time rather than being
/// a runtime string lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    /// Exact channel match from the channel dropdown
    Channel,
    /// Substring query over the channel name
    ChannelSearch,
    /// Substring query over the video title
    TitleSearch,
    /// Named duration bucket from the duration dropdown
    Duration,
}

impl FilterKey {
    /// All keys, in UI order.
    pub const ALL: [FilterKey; 4] = [
        FilterKey::Channel,
        FilterKey::ChannelSearch,
        FilterKey::TitleSearch,
        FilterKey::Duration,
    ];

    /// The bit this field contributes to the active-filter mask.
    pub fn mask(self) -> ActiveFilters {
        match self {
            FilterKey::Channel => ActiveFilters::CHANNEL,
            FilterKey::ChannelSearch => ActiveFilters::CHANNEL_SEARCH,
            FilterKey::TitleSearch => ActiveFilters::TITLE_SEARCH,
            FilterKey::Duration => ActiveFilters::DURATION,
        }
    }
}

bitflags::bitflags! {
    /// Which filter fields currently hold a non-empty value.
    ///
    /// Derived from [`FilterState`] after every transition; drives the
    /// per-field reset affordances and the reset-all / play-filtered buttons.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ActiveFilters: u8 {
        const CHANNEL = 1 << 0;
        const CHANNEL_SEARCH = 1 << 1;
        const TITLE_SEARCH = 1 << 2;
        const DURATION = 1 << 3;
    }
}

// =============================================================================
// Filter State
// =============================================================================

/// Current values of the four filter fields.
///
/// A field is either exactly `""` (inactive) or a non-empty value actively
/// constraining matches; there is no "unset" state besides the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Exact-match channel name
    pub channel: String,
    /// Channel substring query
    pub channel_search: String,
    /// Title substring query
    pub title_search: String,
    /// Duration bucket key
    pub duration: String,
}

impl FilterState {
    pub fn get(&self, key: FilterKey) -> &str {
        match key {
            FilterKey::Channel => &self.channel,
            FilterKey::ChannelSearch => &self.channel_search,
            FilterKey::TitleSearch => &self.title_search,
            FilterKey::Duration => &self.duration,
        }
    }

    pub fn set(&mut self, key: FilterKey, value: String) {
        let slot = match key {
            FilterKey::Channel => &mut self.channel,
            FilterKey::ChannelSearch => &mut self.channel_search,
            FilterKey::TitleSearch => &mut self.title_search,
            FilterKey::Duration => &mut self.duration,
        };
        *slot = value;
    }

    /// Mask of the fields holding a non-empty value.
    pub fn active(&self) -> ActiveFilters {
        let mut mask = ActiveFilters::empty();
        for key in FilterKey::ALL {
            if !self.get(key).is_empty() {
                mask |= key.mask();
            }
        }
        mask
    }
}

// =============================================================================
// Per-Item View
// =============================================================================

/// Borrowed view of one playlist item, re-read from the live DOM each pass.
///
/// The engine never caches these; lifetime and identity of the underlying
/// element belong to the host page.
#[derive(Debug, Clone, Copy)]
pub struct VideoFields<'a> {
    /// Channel display name ("" when the element is missing)
    pub channel: &'a str,
    /// Video title ("" when the element is missing)
    pub title: &'a str,
    /// Parsed duration in whole minutes; `None` when absent or unparseable
    pub duration_min: Option<u32>,
}

// =============================================================================
// Stats
// =============================================================================

/// Aggregate statistics over the currently visible items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoStats {
    /// Number of visible items
    pub count: usize,
    /// Total duration of visible items, formatted for display
    pub total: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_state_has_no_active_fields() {
        assert_eq!(FilterState::default().active(), ActiveFilters::empty());
    }

    #[test]
    fn active_mask_tracks_set_and_clear() {
        let mut state = FilterState::default();
        state.set(FilterKey::TitleSearch, "rust".into());
        state.set(FilterKey::Duration, "short".into());
        assert_eq!(
            state.active(),
            ActiveFilters::TITLE_SEARCH | ActiveFilters::DURATION
        );

        state.set(FilterKey::TitleSearch, String::new());
        assert_eq!(state.active(), ActiveFilters::DURATION);
    }

    #[test]
    fn get_returns_what_set_stored() {
        let mut state = FilterState::default();
        state.set(FilterKey::Channel, "Some Channel".into());
        assert_eq!(state.get(FilterKey::Channel), "Some Channel");
        assert_eq!(state.get(FilterKey::ChannelSearch), "");
    }
}

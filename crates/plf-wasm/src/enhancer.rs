//! Page enhancer: wires the filter engine to the live playlist page.
//!
//! One instance per page. It waits for the playlist container, injects the
//! filter UI, binds listeners, and keeps two long-lived mutation watches:
//! one over the container for incrementally loaded items, one over the
//! page title for in-app navigation. Each watch re-runs item processing and
//! a full filter pass, so the items' visibility never reflects stale filter
//! state.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, MutationObserver, MutationRecord};

use plf_core::{
    duration::parse_duration, page, ChannelRegistry, FilterEngine, FilterKey, SelectorConfig,
    VideoFields,
};

use crate::assets;
use crate::debounce::Debounced;
use crate::dom::{self, ListenerHandle, ObserverHandle};

/// Quiet period for the two text inputs.
const SEARCH_DEBOUNCE_MS: u32 = 300;

pub struct Enhancer {
    /// Keep-alive for the shared state; the bound closures hold their own
    /// clones.
    #[allow(dead_code)]
    inner: Rc<Inner>,
    debounced: Rc<Debounced<(FilterKey, String)>>,
    _listeners: Vec<ListenerHandle>,
    observers: Vec<ObserverHandle>,
}

struct Inner {
    config: SelectorConfig,
    engine: RefCell<FilterEngine>,
    registry: RefCell<ChannelRegistry>,
    last_url: RefCell<String>,
    /// Bumped on every playlist navigation; a reappearance waiter that lost
    /// the race against a newer navigation bails out instead of reprocessing.
    nav_epoch: Cell<u64>,
}

/// One item's fields, re-read from the live element for this pass only.
struct ItemView {
    element: Element,
    channel: String,
    title: String,
    duration_min: Option<u32>,
}

impl Enhancer {
    /// Initialize against the current page. Pending until the playlist
    /// container exists; the host page owns when (and whether) that happens.
    pub async fn boot(config: SelectorConfig) -> Result<Enhancer, JsValue> {
        let doc = dom::document().ok_or_else(|| JsValue::from_str("no document available"))?;
        dom::document_ready(&doc).await?;

        let container = dom::wait_for_element(&config.playlist_container).await?;
        assets::inject_styles(&config).await;
        assets::inject_panel(&config, &container).await;

        let buckets = config.buckets.clone();
        let inner = Rc::new(Inner {
            config,
            engine: RefCell::new(FilterEngine::new(buckets)),
            registry: RefCell::new(ChannelRegistry::new()),
            last_url: RefCell::new(dom::current_url().unwrap_or_default()),
            nav_epoch: Cell::new(0),
        });

        let debounced = {
            let inner = Rc::clone(&inner);
            Rc::new(Debounced::new(
                SEARCH_DEBOUNCE_MS,
                move |(key, value): (FilterKey, String)| {
                    inner.on_field_change(key, &value);
                },
            ))
        };

        let listeners = inner.setup_listeners(&container, &debounced)?;
        inner.init_compact_view(&container);
        inner.process_videos();
        inner.apply_filters();

        let mut observers = Vec::new();
        match inner.watch_item_loads(&container) {
            Some(handle) => observers.push(handle),
            None => log::warn!("item-load watch not installed"),
        }
        match inner.watch_navigation() {
            Some(handle) => observers.push(handle),
            None => log::warn!("navigation watch not installed"),
        }

        log::debug!("playlist filters initialized");
        Ok(Enhancer {
            inner,
            debounced,
            _listeners: listeners,
            observers,
        })
    }

    /// Tear down the mutation watches, any pending debounced delivery, and
    /// (via drop) every bound listener.
    pub fn dispose(mut self) {
        self.debounced.cancel();
        for observer in self.observers.drain(..) {
            observer.disconnect();
        }
    }
}

impl Inner {
    // ── event wiring ─────────────────────────────────────────────────────

    fn setup_listeners(
        self: &Rc<Self>,
        container: &Element,
        debounced: &Rc<Debounced<(FilterKey, String)>>,
    ) -> Result<Vec<ListenerHandle>, JsValue> {
        let mut listeners = Vec::new();

        // Selection fields apply immediately on change.
        for key in [FilterKey::Channel, FilterKey::Duration] {
            let Some(field) = dom::get_one(self.config.input_selector(key)) else {
                continue;
            };
            let inner = Rc::clone(self);
            let element = field.clone();
            listeners.push(ListenerHandle::attach(&field, "change", move |_event| {
                let value = dom::field_value(&element).unwrap_or_default();
                inner.on_field_change(key, &value);
            })?);
        }

        // Text fields settle through the debounce.
        for key in [FilterKey::ChannelSearch, FilterKey::TitleSearch] {
            let Some(field) = dom::get_one(self.config.input_selector(key)) else {
                continue;
            };
            let debounced = Rc::clone(debounced);
            let element = field.clone();
            listeners.push(ListenerHandle::attach(&field, "input", move |_event| {
                let value = dom::field_value(&element).unwrap_or_default();
                debounced.call((key, value));
            })?);
        }

        let doc = dom::document().ok_or_else(|| JsValue::from_str("no document available"))?;

        // Button clicks are delegated from the document so they keep working
        // if the host rebuilds the panel's surroundings.
        {
            let inner = Rc::clone(self);
            listeners.push(ListenerHandle::attach(&doc, "click", move |event| {
                let Some(button) = dom::closest_match(&event, &inner.config.reset_field_button)
                else {
                    return;
                };
                let Some(id) = button.get_attribute("data-for") else {
                    return;
                };
                if let Some(field) = dom::get_one(&format!("#{id}")) {
                    dom::set_field_value(&field, "");
                }
                if let Some(key) = inner.config.key_for_input_id(&id) {
                    inner.engine.borrow_mut().clear_field(key);
                }
                inner.update_reset_buttons();
                inner.apply_filters();
            })?);
        }
        {
            let inner = Rc::clone(self);
            listeners.push(ListenerHandle::attach(&doc, "click", move |event| {
                if dom::closest_match(&event, &inner.config.reset_all_button).is_some() {
                    inner.reset_all_ui();
                }
            })?);
        }
        {
            let inner = Rc::clone(self);
            listeners.push(ListenerHandle::attach(&doc, "click", move |event| {
                if dom::closest_match(&event, &inner.config.play_filtered_button).is_some() {
                    inner.play_filtered();
                }
            })?);
        }

        // Compact-view toggle.
        if let Some(toggle) = dom::get_one(&self.config.compact_toggle) {
            if let Some(input) = toggle.dyn_ref::<HtmlInputElement>() {
                let input = input.clone();
                let container = container.clone();
                let class = self.config.compact_class.clone();
                let storage_key = self.config.compact_storage_key.clone();
                listeners.push(ListenerHandle::attach(&toggle, "change", move |_event| {
                    let _ = container.class_list().toggle(&class);
                    dom::storage_set(&storage_key, if input.checked() { "true" } else { "false" });
                })?);
            }
        }

        Ok(listeners)
    }

    fn init_compact_view(&self, container: &Element) {
        let Some(toggle) = dom::get_one(&self.config.compact_toggle) else {
            log::warn!("compact-view toggle not found");
            return;
        };
        let Some(input) = toggle.dyn_ref::<HtmlInputElement>() else {
            return;
        };

        let compact =
            dom::storage_get(&self.config.compact_storage_key).as_deref() == Some("true");
        input.set_checked(compact);
        if compact {
            let _ = container.class_list().add_1(&self.config.compact_class);
        }
    }

    // ── filter state transitions ─────────────────────────────────────────

    fn on_field_change(&self, key: FilterKey, value: &str) {
        self.engine.borrow_mut().set_field(key, value);
        self.update_reset_buttons();
        self.apply_filters();
    }

    /// Clear every field and its control, then re-show everything.
    fn reset_all_ui(&self) {
        for key in FilterKey::ALL {
            if let Some(field) = dom::get_one(self.config.input_selector(key)) {
                dom::set_field_value(&field, "");
            }
        }
        self.engine.borrow_mut().reset_all();
        self.update_reset_buttons();
        self.apply_filters();
        self.rebuild_channel_options();
    }

    /// Show each per-field reset button only while its field holds a value.
    fn update_reset_buttons(&self) {
        for button in dom::get_all(&self.config.reset_field_button) {
            let Some(id) = button.get_attribute("data-for") else {
                continue;
            };
            let active = dom::get_one(&format!("#{id}"))
                .and_then(|field| dom::field_value(&field))
                .is_some_and(|value| !value.is_empty());
            dom::set_displayed(&button, active);
        }
    }

    // ── item processing ──────────────────────────────────────────────────

    fn read_item(&self, element: Element) -> ItemView {
        let channel = dom::attr_of(&element, &self.config.channel_name, "title")
            .unwrap_or_default();
        let title = dom::text_of(&element, &self.config.video_title);
        let duration_min = parse_duration(&dom::text_of(&element, &self.config.video_duration));
        ItemView {
            element,
            channel,
            title,
            duration_min,
        }
    }

    /// Record every item's channel in the registry and rebuild the dropdown.
    fn process_videos(&self) {
        let items = dom::get_all(&self.config.video_item);
        let mut added = 0;
        {
            let mut registry = self.registry.borrow_mut();
            for item in &items {
                let Some(name) = dom::attr_of(item, &self.config.channel_name, "title") else {
                    continue;
                };
                if !name.is_empty() && registry.insert(&name) {
                    added += 1;
                }
            }
        }
        if added > 0 {
            log::debug!("registered {added} new channels");
        }
        self.rebuild_channel_options();
    }

    /// Rebuild the channel dropdown from the sorted registry, keeping the
    /// current selection when that channel is still offered.
    fn rebuild_channel_options(&self) {
        let Some(select) = dom::get_one(&self.config.channel_filter) else {
            return;
        };
        let Some(select) = select.dyn_ref::<HtmlSelectElement>() else {
            return;
        };
        let Some(doc) = dom::document() else {
            return;
        };

        let current = select.value();
        select.set_inner_html("");

        let append = |value: &str, label: &str| {
            let Ok(option) = doc.create_element("option") else {
                return;
            };
            if let Some(option) = option.dyn_ref::<HtmlOptionElement>() {
                option.set_value(value);
            }
            option.set_text_content(Some(label));
            let _ = select.append_child(&option);
        };

        append("", "All Channels");
        let registry = self.registry.borrow();
        for name in registry.sorted() {
            append(name, name);
        }

        if !current.is_empty() && registry.contains(&current) {
            select.set_value(&current);
        } else {
            select.set_value("");
        }
    }

    // ── filter pass ──────────────────────────────────────────────────────

    /// One complete pass: decide visibility for every item, then refresh the
    /// stats line and the buttons that depend on the outcome.
    fn apply_filters(&self) {
        let engine = self.engine.borrow();
        let has_active = engine.has_active();

        let items: Vec<ItemView> = dom::get_all(&self.config.video_item)
            .into_iter()
            .map(|element| self.read_item(element))
            .collect();

        let mut visible: Vec<&ItemView> = Vec::new();
        for item in &items {
            let fields = VideoFields {
                channel: &item.channel,
                title: &item.title,
                duration_min: item.duration_min,
            };
            let shown = engine.is_visible(&fields);
            dom::set_displayed(&item.element, shown);
            if shown {
                visible.push(item);
            }
        }

        if let (Some(stats_el), Some(icon)) = (
            dom::get_one(&self.config.stats_text),
            dom::get_one(&self.config.stats_info_icon),
        ) {
            if has_active {
                let stats = engine.stats(visible.iter().map(|item| VideoFields {
                    channel: &item.channel,
                    title: &item.title,
                    duration_min: item.duration_min,
                }));
                stats_el.set_text_content(Some(&format!(
                    "{} videos • {} total",
                    stats.count, stats.total
                )));
                dom::set_displayed(&icon, true);
            } else {
                stats_el.set_text_content(Some(""));
                dom::set_displayed(&icon, false);
            }
        }

        if let Some(button) = dom::get_one(&self.config.reset_all_button) {
            let _ = button.class_list().toggle_with_force("active", has_active);
        }
        if let Some(button) = dom::get_one(&self.config.play_filtered_button) {
            dom::set_displayed(&button, has_active && visible.len() >= 2);
        }
    }

    // ── play filtered ────────────────────────────────────────────────────

    /// Open the currently visible videos as a new watch session. Fewer than
    /// two extractable ids is a silent no-op; one bad link skips one video.
    fn play_filtered(&self) {
        let mut ids: Vec<String> = Vec::new();
        for item in dom::get_all(&self.config.video_item) {
            if !dom::is_displayed(&item) {
                continue;
            }
            let Some(link) = item.query_selector(&self.config.video_title).ok().flatten() else {
                continue;
            };
            let href = link
                .dyn_ref::<web_sys::HtmlAnchorElement>()
                .map(|anchor| anchor.href())
                .or_else(|| link.get_attribute("href"));
            let Some(href) = href else { continue };
            match page::extract_video_id(&href) {
                Some(id) => ids.push(id.to_string()),
                None => log::warn!("no video id in item link {href}"),
            }
        }

        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let Some(url) = page::watch_videos_url(&id_refs) else {
            return;
        };
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.open_with_url_and_target(&url, "_blank") {
                log::error!("failed to open watch session: {err:?}");
            }
        }
    }

    // ── mutation watching ────────────────────────────────────────────────

    /// Re-run processing when the host loads more items into the container.
    /// Bursts of additions arrive as one batch of records and trigger one
    /// pass, not one per node.
    fn watch_item_loads(self: &Rc<Self>, container: &Element) -> Option<ObserverHandle> {
        let inner = Rc::clone(self);
        ObserverHandle::observe(
            container,
            move |records: js_sys::Array, _observer: MutationObserver| {
                if !batch_adds_items(&records, &inner.config.video_item) {
                    return;
                }
                inner.process_videos();
                inner.apply_filters();
            },
            true,
            false,
        )
    }

    /// The host is a single-page app: it swaps the document title and the
    /// address without reloading. Watching the title element is the change
    /// signal; the address comparison decides whether anything happened.
    fn watch_navigation(self: &Rc<Self>) -> Option<ObserverHandle> {
        let title = dom::get_one("title")?;
        let inner = Rc::clone(self);
        ObserverHandle::observe(
            &title,
            move |_records: js_sys::Array, _observer: MutationObserver| {
                let Some(current) = dom::current_url() else {
                    return;
                };
                if *inner.last_url.borrow() == current {
                    return;
                }
                *inner.last_url.borrow_mut() = current.clone();
                if !page::is_playlist_url(&current) {
                    return;
                }

                let epoch = inner.nav_epoch.get() + 1;
                inner.nav_epoch.set(epoch);
                log::debug!("playlist navigation to {current}");

                let inner = Rc::clone(&inner);
                wasm_bindgen_futures::spawn_local(async move {
                    match dom::wait_for_element(&inner.config.playlist_container).await {
                        Ok(_) => {
                            if inner.nav_epoch.get() != epoch {
                                return;
                            }
                            inner.registry.borrow_mut().clear();
                            inner.reset_all_ui();
                            inner.process_videos();
                        }
                        Err(err) => {
                            log::error!("playlist container never reappeared: {err:?}")
                        }
                    }
                });
            },
            true,
            true,
        )
    }
}

/// Does any added node in this record batch contain a playlist item?
fn batch_adds_items(records: &js_sys::Array, item_selector: &str) -> bool {
    for record in records.iter() {
        let Ok(record) = record.dyn_into::<MutationRecord>() else {
            continue;
        };
        let added = record.added_nodes();
        for i in 0..added.length() {
            let Some(node) = added.item(i) else { continue };
            let Some(element) = node.dyn_ref::<Element>() else {
                continue;
            };
            if element.matches(item_selector).unwrap_or(false)
                || element.query_selector(item_selector).ok().flatten().is_some()
            {
                return true;
            }
        }
    }
    false
}

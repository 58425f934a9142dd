//! DOM access layer.
//!
//! Every lookup goes against the live document and is re-evaluated on each
//! call; nothing here caches elements. The host page owns every node and may
//! replace any of them between two reads.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlInputElement, HtmlSelectElement,
    MutationObserver, MutationObserverInit, Node,
};

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

/// Current page address, as the host's in-app navigation updates it.
pub fn current_url() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

/// First matching live element, or absent.
pub fn get_one(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

/// All matching live elements in document order.
pub fn get_all(selector: &str) -> Vec<Element> {
    let Some(doc) = document() else {
        return Vec::new();
    };
    let Ok(list) = doc.query_selector_all(selector) else {
        return Vec::new();
    };
    let mut elements = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(node) = list.item(i) {
            if let Ok(element) = node.dyn_into::<Element>() {
                elements.push(element);
            }
        }
    }
    elements
}

/// Resolve once the document has finished parsing. Content scripts can be
/// injected while the host page is still loading.
pub async fn document_ready(doc: &Document) -> Result<(), JsValue> {
    if doc.ready_state() != "loading" {
        return Ok(());
    }

    let doc = doc.clone();
    let promise = Promise::new(&mut |resolve, _reject| {
        let resolve = resolve.clone();
        let callback = Closure::once_into_js(move |_event: Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        if let Err(err) = doc.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            log::error!("failed to listen for DOMContentLoaded: {err:?}");
        }
    });
    JsFuture::from(promise).await?;
    Ok(())
}

/// Resolve with the first element matching `selector`, installing a
/// body-subtree mutation watch if it is not present yet.
///
/// The fast path returns without any observation overhead. The slow path has
/// no timeout: the future stays pending until the element appears, and the
/// watch disconnects itself the moment it does.
pub async fn wait_for_element(selector: &str) -> Result<Element, JsValue> {
    if let Some(element) = get_one(selector) {
        return Ok(element);
    }

    let selector = selector.to_string();
    let promise = Promise::new(&mut |resolve, _reject| {
        let sel = selector.clone();
        let resolve = resolve.clone();
        let callback = Closure::wrap(Box::new(
            move |_records: js_sys::Array, observer: MutationObserver| {
                if let Some(element) = get_one(&sel) {
                    observer.disconnect();
                    if let Err(err) = resolve.call1(&JsValue::NULL, &element) {
                        log::error!("element waiter failed to resolve: {err:?}");
                    }
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log::error!("failed to create mutation observer: {err:?}");
                return;
            }
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        match document().and_then(|doc| doc.body()) {
            Some(body) => {
                if let Err(err) = observer.observe_with_options(&body, &init) {
                    log::error!("failed to observe document body: {err:?}");
                }
            }
            None => log::error!("document body unavailable; element waiter cannot start"),
        }
        // A closure cannot be dropped from inside its own invocation; this
        // one stays alive until the page goes away (one per wait).
        callback.forget();
    });

    let value = JsFuture::from(promise).await?;
    value.dyn_into::<Element>()
}

// =============================================================================
// Observer / Listener Handles
// =============================================================================

/// A live mutation watch over a scoped subtree. Disconnects on drop.
pub struct ObserverHandle {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl ObserverHandle {
    /// Watch `target` for childList changes, optionally across its whole
    /// subtree and for character-data edits, delivering batched records.
    pub fn observe(
        target: &Node,
        handler: impl FnMut(js_sys::Array, MutationObserver) + 'static,
        subtree: bool,
        character_data: bool,
    ) -> Option<ObserverHandle> {
        let callback = Closure::wrap(
            Box::new(handler) as Box<dyn FnMut(js_sys::Array, MutationObserver)>
        );
        let observer = match MutationObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => observer,
            Err(err) => {
                log::error!("failed to create mutation observer: {err:?}");
                return None;
            }
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(subtree);
        init.set_character_data(character_data);
        if let Err(err) = observer.observe_with_options(target, &init) {
            log::error!("failed to start mutation observer: {err:?}");
            return None;
        }
        Some(ObserverHandle {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// An attached event listener. Removed from its target on drop.
pub struct ListenerHandle {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl ListenerHandle {
    pub fn attach(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<ListenerHandle, JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
        Ok(ListenerHandle {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

// =============================================================================
// Element Helpers
// =============================================================================

/// Delegation helper: the closest ancestor of the event target matching
/// `selector`, if any.
pub fn closest_match(event: &Event, selector: &str) -> Option<Element> {
    let target = event.target()?;
    let element = target.dyn_into::<Element>().ok()?;
    element.closest(selector).ok().flatten()
}

/// Value of a form field, whether input or select.
pub fn field_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        return Some(input.value());
    }
    if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        return Some(select.value());
    }
    None
}

pub fn set_field_value(element: &Element, value: &str) {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        select.set_value(value);
    }
}

/// Show or hide an element through its inline display style, the way the
/// host page expects items to disappear.
pub fn set_displayed(element: &Element, displayed: bool) {
    let Some(html) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    let style = html.style();
    let result = if displayed {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
    if let Err(err) = result {
        log::warn!("failed to update display style: {err:?}");
    }
}

pub fn is_displayed(element: &Element) -> bool {
    element
        .dyn_ref::<HtmlElement>()
        .map(|html| {
            html.style()
                .get_property_value("display")
                .map(|display| display != "none")
                .unwrap_or(true)
        })
        .unwrap_or(true)
}

/// Trimmed text content of the first `selector` match under `parent`, or ""
/// when it is missing.
pub fn text_of(parent: &Element, selector: &str) -> String {
    parent
        .query_selector(selector)
        .ok()
        .flatten()
        .and_then(|element| element.text_content())
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

/// Attribute of the first `selector` match under `parent`.
pub fn attr_of(parent: &Element, selector: &str, attr: &str) -> Option<String> {
    parent
        .query_selector(selector)
        .ok()
        .flatten()?
        .get_attribute(attr)
}

// =============================================================================
// Persisted Preference
// =============================================================================

pub fn storage_get(key: &str) -> Option<String> {
    web_sys::window()?
        .local_storage()
        .ok()
        .flatten()?
        .get_item(key)
        .ok()
        .flatten()
}

pub fn storage_set(key: &str, value: &str) {
    let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
    if let Some(storage) = storage {
        if let Err(err) = storage.set_item(key, value) {
            log::warn!("localStorage write failed: {err:?}");
        }
    }
}

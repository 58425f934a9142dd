//! Browser-side tests for the DOM access layer, the debounce, and the
//! persisted preference. These need a real document; the harness skips them
//! off-wasm.
#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_test::*;
use web_sys::Document;

use plf_wasm::debounce::Debounced;
use plf_wasm::dom;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn append_div(id: &str) {
    let doc = document();
    let div = doc.create_element("div").unwrap();
    div.set_id(id);
    doc.body().unwrap().append_child(&div).unwrap();
}

#[wasm_bindgen_test]
fn get_one_and_get_all_are_live_queries() {
    append_div("live-a");
    append_div("live-b");

    assert!(dom::get_one("#live-a").is_some());
    assert!(dom::get_one("#live-missing").is_none());

    let before = dom::get_all("div[id^='live-']").len();
    append_div("live-c");
    let after = dom::get_all("div[id^='live-']").len();
    assert_eq!(after, before + 1);
}

#[wasm_bindgen_test]
async fn wait_for_element_resolves_immediately_when_present() {
    append_div("already-here");
    let element = dom::wait_for_element("#already-here").await.unwrap();
    assert_eq!(element.id(), "already-here");
}

#[wasm_bindgen_test]
async fn wait_for_element_resolves_on_later_insertion() {
    Timeout::new(20, || append_div("added-later")).forget();
    let element = dom::wait_for_element("#added-later").await.unwrap();
    assert_eq!(element.id(), "added-later");
}

#[wasm_bindgen_test]
async fn debounce_delivers_only_the_trailing_call() {
    let delivered: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&delivered);
    let debounced = Debounced::new(30, move |value: u32| sink.borrow_mut().push(value));

    debounced.call(1);
    debounced.call(2);
    debounced.call(3);
    TimeoutFuture::new(120).await;

    assert_eq!(*delivered.borrow(), vec![3]);
}

#[wasm_bindgen_test]
async fn cancelled_debounce_never_fires() {
    let delivered: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&delivered);
    let debounced = Debounced::new(30, move |value: u32| sink.borrow_mut().push(value));

    debounced.call(1);
    debounced.cancel();
    TimeoutFuture::new(120).await;

    assert!(delivered.borrow().is_empty());
}

#[wasm_bindgen_test]
fn preference_round_trips_through_storage() {
    dom::storage_set("plf-test-pref", "true");
    assert_eq!(dom::storage_get("plf-test-pref").as_deref(), Some("true"));

    dom::storage_set("plf-test-pref", "false");
    assert_eq!(dom::storage_get("plf-test-pref").as_deref(), Some("false"));
}

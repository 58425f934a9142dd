//! WebAssembly content script for Playlist Filters

pub mod assets;
pub mod debounce;
pub mod dom;
pub mod enhancer;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use enhancer::Enhancer;
use plf_core::SelectorConfig;

thread_local! {
    static ENHANCER: RefCell<Option<Enhancer>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

/// Initialize the enhancer against the current page.
///
/// `config_json`, when given, overrides any subset of the built-in YouTube
/// selector configuration. Pending until the playlist container appears;
/// initializing twice without a page reload is an error.
#[wasm_bindgen]
pub async fn init(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => SelectorConfig::from_json(&json)
            .map_err(|err| JsValue::from_str(&err.to_string()))?,
        None => SelectorConfig::default(),
    };

    if is_initialized() {
        return Err(JsValue::from_str(
            "Already initialized. Reload the page to reinitialize.",
        ));
    }

    let enhancer = Enhancer::boot(config).await?;
    ENHANCER.with(|slot| *slot.borrow_mut() = Some(enhancer));
    Ok(())
}

#[wasm_bindgen]
pub fn is_initialized() -> bool {
    ENHANCER.with(|slot| slot.borrow().is_some())
}

/// Tear down the enhancer's observers and listeners.
#[wasm_bindgen]
pub fn dispose() {
    if let Some(enhancer) = ENHANCER.with(|slot| slot.borrow_mut().take()) {
        enhancer.dispose();
    }
}

//! Bundled asset retrieval and injection.
//!
//! The stylesheet and the filter-panel markup are opaque text blobs served
//! alongside the wasm bundle; both are injected verbatim. A failed fetch is
//! logged and leaves the page partially unstyled or without the injected UI,
//! never broken.

use gloo_net::http::Request;
use web_sys::Element;

use plf_core::SelectorConfig;

use crate::dom;

async fn fetch_text(path: &str) -> Result<String, gloo_net::Error> {
    let response = Request::get(path).send().await?;
    response.text().await
}

/// Append the bundled stylesheet to `<head>`.
pub async fn inject_styles(config: &SelectorConfig) {
    let css = match fetch_text(&config.stylesheet_path).await {
        Ok(css) => css,
        Err(err) => {
            log::error!("failed to load styles: {err}");
            return;
        }
    };

    let Some(doc) = dom::document() else { return };
    let Some(head) = doc.head() else { return };
    match doc.create_element("style") {
        Ok(style) => {
            style.set_text_content(Some(&css));
            if let Err(err) = head.append_child(&style) {
                log::error!("failed to inject styles: {err:?}");
            }
        }
        Err(err) => log::error!("failed to create style element: {err:?}"),
    }
}

/// Build the filter panel from the bundled fragment and insert it as the
/// playlist container's first child.
pub async fn inject_panel(config: &SelectorConfig, container: &Element) {
    let html = match fetch_text(&config.panel_template_path).await {
        Ok(html) => html,
        Err(err) => {
            log::error!("failed to load filter panel template: {err}");
            return;
        }
    };

    let Some(doc) = dom::document() else { return };
    let panel = match doc.create_element("div") {
        Ok(panel) => panel,
        Err(err) => {
            log::error!("failed to create filter panel: {err:?}");
            return;
        }
    };
    panel.set_class_name(&config.filter_panel_class);
    panel.set_inner_html(&html);

    if let Err(err) = container.insert_before(&panel, container.first_child().as_ref()) {
        log::error!("failed to inject filter panel: {err:?}");
    }
}

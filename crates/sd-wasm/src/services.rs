//! Remote helpers exposed as promise-returning functions.
//!
//! Each call builds its client from the compiled-in `ServiceConfig` and
//! resolves with plain text or a JSON string. They never reject: failures
//! resolve with the same placeholders the native clients return.

use sd_services::{IdeaClient, ImageSearchClient, ServiceConfig};
use wasm_bindgen::prelude::*;

/// Resolves to a JSON array of slogan strings.
#[wasm_bindgen]
pub fn generate_design_ideas(prompt: String, product_name: String) -> js_sys::Promise {
    wasm_bindgen_futures::future_to_promise(async move {
        let client = IdeaClient::new(ServiceConfig::default());
        let ideas = client.generate_design_ideas(&prompt, &product_name).await;
        Ok(JsValue::from_str(
            &serde_json::to_string(&ideas).unwrap_or_else(|_| "[]".to_string()),
        ))
    })
}

/// Resolves to a one-sentence printability assessment.
#[wasm_bindgen]
pub fn analyze_design_complexity(layer_count: usize, colors: usize) -> js_sys::Promise {
    wasm_bindgen_futures::future_to_promise(async move {
        let client = IdeaClient::new(ServiceConfig::default());
        let text = client.analyze_design_complexity(layer_count, colors).await;
        Ok(JsValue::from_str(&text))
    })
}

/// Resolves to a JSON array of `{id, previewURL, largeImageURL, tags, user}`.
#[wasm_bindgen]
pub fn search_images(query: String) -> js_sys::Promise {
    wasm_bindgen_futures::future_to_promise(async move {
        let client = ImageSearchClient::new(ServiceConfig::default());
        let hits = client.search_images(&query).await;
        Ok(JsValue::from_str(
            &serde_json::to_string(&hits).unwrap_or_else(|_| "[]".to_string()),
        ))
    })
}

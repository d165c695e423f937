//! Endpoints and credentials for the external services.
//!
//! API keys are baked in at build time from `GEMINI_API_KEY` and
//! `PIXABAY_API_KEY`. A missing key is not an error until a request is made.

/// Configuration shared by the service clients.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    /// Base URL of the generative language API (without the model path).
    pub gemini_endpoint: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,

    pub pixabay_endpoint: String,
    pub pixabay_api_key: Option<String>,
    /// Results per image search. Default: **20**.
    pub per_page: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            gemini_endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-3-flash-preview".to_string(),
            gemini_api_key: build_key(option_env!("GEMINI_API_KEY")),
            pixabay_endpoint: "https://pixabay.com/api/".to_string(),
            pixabay_api_key: build_key(option_env!("PIXABAY_API_KEY")),
            per_page: 20,
        }
    }
}

fn build_key(value: Option<&'static str>) -> Option<String> {
    value.map(str::trim).filter(|k| !k.is_empty()).map(str::to_string)
}

//! Slogan ideas and printability hints from a generative language model.
//!
//! Both calls fail closed: any transport, status or parse problem is logged
//! and replaced by a human-readable placeholder.

use crate::config::ServiceConfig;
use crate::error::ClientError;
use serde::{Deserialize, Serialize};

const IDEAS_FALLBACK: &str = "خطا در تولید ایده. دوباره تلاش کنید.";
const ANALYSIS_FALLBACK: &str = "امکان تحلیل طرح وجود ندارد.";
const ANALYSIS_UNAVAILABLE: &str = "تحلیل در دسترس نیست.";

// ─── Wire format ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// The part of a `generateContent` response we read.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if it has any.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }
}

// ─── Prompts ─────────────────────────────────────────────────────────────

pub fn ideas_prompt(prompt: &str, product_name: &str) -> String {
    format!(
        "You are a creative director for a streetwear fashion brand in Iran.\n\
         The user wants design ideas for a {product_name}.\n\
         Theme/Keywords: \"{prompt}\".\n\n\
         Provide 3 short, catchy, and creative slogans or design concepts in Persian (Farsi).\n\
         Keep them under 10 words each.\n\
         Format: Just the slogans, one per line. No numbering."
    )
}

pub fn complexity_prompt(layer_count: usize, colors: usize) -> String {
    format!(
        "Analyze the complexity of a print-on-demand design with {layer_count} layers \
         and approximately {colors} distinct colors.\n\
         Give a 1 sentence assessment of printability (Easy, Medium, Hard) and a tip. \
         Respond in Persian (Farsi)."
    )
}

/// Non-empty trimmed lines of a model reply.
pub fn split_ideas(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

// ─── Client ──────────────────────────────────────────────────────────────

pub struct IdeaClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl IdeaClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Three short Persian slogans for `product_name`, one per entry. On
    /// failure, a single entry explaining the error.
    pub async fn generate_design_ideas(&self, prompt: &str, product_name: &str) -> Vec<String> {
        match self.generate(&ideas_prompt(prompt, product_name)).await {
            Ok(Some(text)) => split_ideas(&text),
            Ok(None) => Vec::new(),
            Err(e) => {
                log::error!("design ideas request failed: {e}");
                vec![IDEAS_FALLBACK.to_string()]
            }
        }
    }

    /// One-sentence printability assessment with a tip.
    pub async fn analyze_design_complexity(&self, layer_count: usize, colors: usize) -> String {
        match self.generate(&complexity_prompt(layer_count, colors)).await {
            Ok(Some(text)) => text,
            Ok(None) => ANALYSIS_UNAVAILABLE.to_string(),
            Err(e) => {
                log::error!("complexity analysis request failed: {e}");
                ANALYSIS_FALLBACK.to_string()
            }
        }
    }

    /// `Ok(None)` when the model answered without text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, ClientError> {
        let key = self
            .config
            .gemini_api_key
            .as_deref()
            .ok_or(ClientError::MissingKey("GEMINI_API_KEY"))?;
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.gemini_endpoint.trim_end_matches('/'),
            self.config.gemini_model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ideas_are_trimmed_non_empty_lines() {
        let text = "  سبک زندگی آزاد \n\n\tهنر در خیابان\n   \nرنگ تو\n";
        assert_eq!(
            split_ideas(text),
            vec!["سبک زندگی آزاد", "هنر در خیابان", "رنگ تو"]
        );
    }

    #[test]
    fn prompt_names_the_product_and_theme() {
        let p = ideas_prompt("کوه", "هودی");
        assert!(p.contains("design ideas for a هودی."));
        assert!(p.contains("Theme/Keywords: \"کوه\"."));
        assert!(complexity_prompt(4, 3).contains("with 4 layers and approximately 3 distinct"));
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hi" }] }] })
        );
    }
}

//! Integration tests: recorded payloads and fail-closed behavior.
//!
//! No test talks to the real services. Failures are provoked with missing
//! keys or a closed local port.

use pretty_assertions::assert_eq;
use sd_editor::assets::{AssetError, AssetFetcher};
use sd_services::ideas::{GenerateResponse, split_ideas};
use sd_services::images::SearchResponse;
use sd_services::*;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Nothing listens on the discard port, so connections are refused fast.
const CLOSED: &str = "http://127.0.0.1:9";

fn offline_config() -> ServiceConfig {
    ServiceConfig {
        gemini_endpoint: CLOSED.to_string(),
        gemini_api_key: Some("test".into()),
        pixabay_endpoint: format!("{CLOSED}/api/"),
        pixabay_api_key: Some("test".into()),
        ..Default::default()
    }
}

// ─── Recorded payloads ───────────────────────────────────────────────────

#[test]
fn generate_response_joins_parts_into_ideas() {
    let parsed: GenerateResponse =
        serde_json::from_str(include_str!("fixtures/generate_content.json")).unwrap();
    let ideas = split_ideas(&parsed.text().unwrap());
    assert_eq!(ideas, vec!["رویاهای شهری", "آزادی در هر قدم", "رنگِ خیابان"]);
}

#[test]
fn blocked_generation_has_no_text() {
    let parsed: GenerateResponse =
        serde_json::from_str(r#"{ "promptFeedback": { "blockReason": "SAFETY" } }"#).unwrap();
    assert_eq!(parsed.text(), None);
}

#[test]
fn search_response_maps_hits() {
    let parsed: SearchResponse =
        serde_json::from_str(include_str!("fixtures/search.json")).unwrap();
    assert_eq!(parsed.hits.len(), 2);
    assert_eq!(parsed.hits[0].tags, "tiger, animal, wild");
    assert!(parsed.hits[0].full_url.ends_with("_1280.png"));
    assert_eq!(parsed.hits[1].user, "");
}

// ─── Fail closed ─────────────────────────────────────────────────────────

#[tokio::test]
async fn ideas_fall_back_to_one_message() {
    init_logs();
    let client = IdeaClient::new(offline_config());
    let ideas = client.generate_design_ideas("کوه", "تی‌شرت").await;
    assert_eq!(ideas, vec!["خطا در تولید ایده. دوباره تلاش کنید."]);

    let keyless = IdeaClient::new(ServiceConfig {
        gemini_api_key: None,
        ..offline_config()
    });
    assert_eq!(
        keyless.analyze_design_complexity(3, 2).await,
        "امکان تحلیل طرح وجود ندارد."
    );
}

#[tokio::test]
async fn search_falls_back_to_empty() {
    init_logs();
    let client = ImageSearchClient::new(offline_config());
    assert!(client.search_images("").await.is_empty());
}

#[tokio::test]
async fn fetch_errors_name_the_url() {
    init_logs();
    let url = format!("{CLOSED}/logo.png");
    let err = HttpFetcher::new().fetch(&url).await.unwrap_err();
    let AssetError::Fetch { url: failed, .. } = &err else {
        panic!("expected a fetch error, got {err:?}");
    };
    assert_eq!(failed, &url);
}

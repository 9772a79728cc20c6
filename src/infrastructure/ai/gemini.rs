//! Google Gemini client used for sneaker recognition and outfit generation.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use actix_web::web::Bytes;
use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    constants::MAX_OUTFIT_SUGGESTIONS,
    entities::{
        outfit::SuggestionSet, sneaker::SneakerAnalysis, trend::TrendItem, wardrobe::WardrobeItem,
    },
    repositories::{analysis::SneakerAnalyzer, suggestion::OutfitSuggester},
    settings::AppConfig,
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```(?:json|JSON)?[ \t]*\r?\n?").expect("valid fence regex"));

const ANALYSIS_PROMPT: &str = r#"You are a sneaker expert. Identify the sneaker in this photo.
Respond with ONLY a JSON object of the form:
{"brand": string, "model": string, "colors": string[], "style": string, "confidence": number}
- "colors" lists the dominant colorways, most prominent first
- "style" is one word such as casual, streetwear, athletic, retro, luxury
- "confidence" is between 0 and 1
If the photo does not show a sneaker, answer with an empty "brand"."#;

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to create HTTP client for Gemini API, using default client");
                reqwest::Client::default()
            });

        GeminiClient {
            http_client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.gemini_api_key, &config.gemini_model)
    }

    /// Sends one `generateContent` call and returns the first text part.
    async fn generate(&self, parts: Vec<Value>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let request_body = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.4
            }
        });

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_json) = serde_json::from_str::<Value>(&error_text) {
                if let Some(message) = error_json
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                {
                    return Err(anyhow::anyhow!("Gemini API error ({}): {}", status, message));
                }
            }

            return Err(anyhow::anyhow!(
                "Gemini API request failed: {} - {}",
                status,
                error_text
            ));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .context("No text in Gemini API response")
    }
}

#[async_trait]
impl SneakerAnalyzer for GeminiClient {
    async fn analyze(&self, image: Bytes, mime_type: &str) -> Result<SneakerAnalysis> {
        tracing::debug!(
            model = %self.model,
            image_size = image.len(),
            "Sending sneaker analysis request to Gemini"
        );

        let encoded = base64::engine::general_purpose::STANDARD.encode(&image);
        let text = self
            .generate(vec![
                json!({ "text": ANALYSIS_PROMPT }),
                json!({ "inline_data": { "mime_type": mime_type, "data": encoded } }),
            ])
            .await?;

        parse_model_json(&text)
    }
}

#[async_trait]
impl OutfitSuggester for GeminiClient {
    async fn suggest(
        &self,
        analysis: &SneakerAnalysis,
        trends: &[TrendItem],
        wardrobe: &[WardrobeItem],
    ) -> Result<SuggestionSet> {
        let prompt = suggestion_prompt(analysis, trends, wardrobe);
        let text = self.generate(vec![json!({ "text": prompt })]).await?;
        parse_model_json(&text)
    }
}

fn suggestion_prompt(
    analysis: &SneakerAnalysis,
    trends: &[TrendItem],
    wardrobe: &[WardrobeItem],
) -> String {
    let wardrobe_section = if wardrobe.is_empty() {
        "The user has not listed any wardrobe items; suggest pieces they could buy (owned = false).".to_string()
    } else {
        let listed = wardrobe
            .iter()
            .map(|item| format!("- {}", item.summary()))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "The user owns these items. Prefer them and mark them owned = true:\n{listed}"
        )
    };

    let trend_section = if trends.is_empty() {
        String::new()
    } else {
        let titles = trends
            .iter()
            .take(6)
            .map(|t| format!("- {}", t.title))
            .collect::<Vec<_>>()
            .join("\n");
        format!("\nCurrently trending looks with this sneaker:\n{titles}\n")
    };

    format!(
        r#"You are a fashion stylist. Build exactly {count} outfits around this sneaker:
{name} (colors: {colors}; style: {style}).

{wardrobe_section}
{trend_section}
Respond with ONLY a JSON object of the form:
{{"outfits": [{{"items": [{{"name": string, "owned": boolean}}], "confidence": number, "occasion": string, "reasoning": string}}]}}
"confidence" is between 0 and 1."#,
        count = MAX_OUTFIT_SUGGESTIONS,
        name = analysis.display_name(),
        colors = analysis.colors.join(", "),
        style = analysis.style,
    )
}

/// Parses a model answer as JSON, tolerating Markdown code fences and stray
/// prose around the object.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let cleaned = cleaned.trim();

    let candidate = match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => &cleaned[start..=end],
        _ => cleaned,
    };

    serde_json::from_str(candidate).with_context(|| {
        tracing::warn!(raw = %text, "Model answer is not the expected JSON");
        "Failed to parse JSON response from model"
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn parses_fenced_json() {
        let text = "```json\n{\"brand\": \"Nike\", \"model\": \"Dunk Low\", \"colors\": [\"white\", \"black\"], \"style\": \"streetwear\", \"confidence\": 0.92}\n```";
        let analysis: SneakerAnalysis = parse_model_json(text).unwrap();
        assert_eq!(analysis.brand, "Nike");
        assert_eq!(analysis.colors, vec!["white", "black"]);
    }

    #[test]
    fn parses_json_surrounded_by_prose() {
        let text = "Sure! Here you go:\n{\"outfits\": []}\nEnjoy.";
        let set: SuggestionSet = parse_model_json(text).unwrap();
        assert!(set.outfits.is_empty());
    }

    #[test]
    fn rejects_non_json_answers() {
        let result: Result<SuggestionSet> = parse_model_json("I cannot help with that.");
        assert!(result.is_err());
    }

    #[test]
    fn suggestion_prompt_lists_owned_items_and_trends() {
        let wardrobe = vec![WardrobeItem {
            id: Uuid::new_v4(),
            user_id: "user-42".into(),
            item_type: "jeans".into(),
            color: "indigo".into(),
            description: "straight fit".into(),
            created_at: Utc::now(),
        }];
        let trends = vec![TrendItem {
            image_url: "https://i.pinimg.com/736x/a.jpg".into(),
            title: "Dunk low with wide jeans".into(),
            source: "pinterest".into(),
        }];

        let prompt = suggestion_prompt(&SneakerAnalysis::fallback(), &trends, &wardrobe);
        assert!(prompt.contains("exactly 3 outfits"));
        assert!(prompt.contains("- indigo jeans (straight fit)"));
        assert!(prompt.contains("Dunk low with wide jeans"));
        assert!(prompt.contains("Unknown Sneaker"));
    }

    #[test]
    fn empty_wardrobe_asks_for_purchasable_pieces() {
        let prompt = suggestion_prompt(&SneakerAnalysis::fallback(), &[], &[]);
        assert!(prompt.contains("owned = false"));
        assert!(!prompt.contains("trending"));
    }
}

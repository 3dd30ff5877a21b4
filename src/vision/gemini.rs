//! Gemini vision client
//!
//! Sends the photo as inline base64 data to `models/{model}:generateContent`
//! together with a fixed instruction and a response schema, then parses the
//! first candidate's text as the identified-food array.

use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

use super::{parse_identified_foods, FoodImageAnalyzer, IdentifiedFood, VisionError};
use crate::config::VisionConfig;

const INSTRUCTION: &str = "Você é um nutricionista especializado na culinária brasileira. \
Identifique cada alimento visível nesta foto de refeição e estime quantos gramas de cada um estão no prato. \
Responda somente com um array JSON em que cada item tem \"foodName\", o nome do alimento em português do Brasil \
no formato das tabelas de composição (por exemplo \"Arroz, branco, cozido\"), e \"quantityGrams\", o peso \
estimado em gramas. Não inclua texto fora do JSON.";

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Clone)]
pub struct GeminiAnalyzer {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiAnalyzer {
    pub fn new(config: &VisionConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }
}

/// Request body: image part, instruction part and the JSON response schema
fn request_body(image: &[u8], mime_type: &str) -> Value {
    json!({
        "contents": [{
            "parts": [
                { "inlineData": { "mimeType": mime_type, "data": STANDARD.encode(image) } },
                { "text": INSTRUCTION }
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "foodName": {
                            "type": "STRING",
                            "description": "Nome específico do alimento em português do Brasil."
                        },
                        "quantityGrams": {
                            "type": "NUMBER",
                            "description": "Quantidade estimada do alimento em gramas."
                        }
                    },
                    "required": ["foodName", "quantityGrams"]
                }
            }
        }
    })
}

/// Text of the first part of the first candidate
fn first_candidate_text(body: &str) -> Result<String, VisionError> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;
    response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|t| !t.trim().is_empty())
        .ok_or(VisionError::EmptyResponse)
}

#[async_trait]
impl FoodImageAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<Vec<IdentifiedFood>, VisionError> {
        let api_key = self.api_key.as_deref().ok_or(VisionError::MissingApiKey)?;

        debug!(model = %self.model, bytes = image.len(), mime_type, "sending photo for analysis");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request_body(image, mime_type))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(%status, "vision API error");
            return Err(VisionError::Api { status: status.as_u16(), body });
        }

        let text = first_candidate_text(&body)?;
        let items = parse_identified_foods(&text)?;
        debug!(items = items.len(), "photo analysis complete");
        Ok(items)
    }
}

impl fmt::Debug for GeminiAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiAnalyzer")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> VisionConfig {
        VisionConfig {
            api_key: api_key.map(str::to_string),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://example.test/".to_string(),
        }
    }

    #[test]
    fn test_endpoint() {
        let analyzer = GeminiAnalyzer::new(&config(Some("k")));
        assert_eq!(
            analyzer.endpoint(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = request_body(b"abc", "image/jpeg");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "YWJj");
        assert!(parts[1]["text"].as_str().unwrap().contains("quantityGrams"));

        let schema = &body["generationConfig"]["responseSchema"];
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"], json!(["foodName", "quantityGrams"]));
    }

    #[test]
    fn test_first_candidate_text() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "[]"}], "role": "model"}}]}"#;
        assert_eq!(first_candidate_text(body).unwrap(), "[]");

        assert!(matches!(first_candidate_text(r#"{"candidates": []}"#), Err(VisionError::EmptyResponse)));
        assert!(matches!(first_candidate_text("{}"), Err(VisionError::EmptyResponse)));
        assert!(matches!(
            first_candidate_text(r#"{"candidates": [{"content": {"parts": [{"text": "  "}]}}]}"#),
            Err(VisionError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let analyzer = GeminiAnalyzer::new(&config(None));
        let result = analyzer.analyze(b"\x89PNG\r\n\x1a\n", "image/png").await;
        assert!(matches!(result, Err(VisionError::MissingApiKey)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let analyzer = GeminiAnalyzer::new(&config(Some("secret-key")));
        let printed = format!("{:?}", analyzer);
        assert!(!printed.contains("secret-key"));
    }
}

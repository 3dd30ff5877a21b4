//! Food photo analysis
//!
//! An external vision model looks at a meal photo and answers with a JSON
//! array of `{"foodName": string, "quantityGrams": number}` items. This module
//! owns that contract, the analyzer seam and the matching of identified names
//! against the reference table. The HTTP client lives in [`gemini`].

pub mod gemini;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::FoodRecord;
use crate::reference::{FoodMatcher, FoodTable};

pub use gemini::GeminiAnalyzer;

/// The only message shown to the user when analysis fails; the caller may retry
pub const ANALYSIS_FAILED_MESSAGE: &str = "Não foi possível analisar a imagem. Tente novamente.";

/// One item the vision model found in the photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifiedFood {
    pub food_name: String,
    pub quantity_grams: f64,
}

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("no API key configured for the vision service")]
    MissingApiKey,

    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image format")]
    UnsupportedImage,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("vision API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("vision API returned no content")]
    EmptyResponse,

    #[error("malformed analysis result: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid analysis result: {0}")]
    Schema(String),
}

impl VisionError {
    /// Message for the end user, whatever went wrong
    pub fn user_message(&self) -> &'static str {
        ANALYSIS_FAILED_MESSAGE
    }
}

/// A service that identifies foods and estimates their weight from a photo
#[async_trait]
pub trait FoodImageAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8], mime_type: &str) -> Result<Vec<IdentifiedFood>, VisionError>;
}

/// MIME type from the image's magic bytes
pub fn detect_mime_type(image: &[u8]) -> Result<&'static str, VisionError> {
    let format = image::guess_format(image).map_err(|_| VisionError::UnsupportedImage)?;
    Ok(format.to_mime_type())
}

/// Sniff the format and hand the image to the analyzer
pub async fn analyze_image(
    analyzer: &dyn FoodImageAnalyzer,
    image: &[u8],
) -> Result<Vec<IdentifiedFood>, VisionError> {
    let mime_type = detect_mime_type(image)?;
    analyzer.analyze(image, mime_type).await
}

/// Parse the model's JSON text.
///
/// The whole response is rejected when any item lacks a field, has the wrong
/// type, or carries a negative or non-finite quantity.
pub fn parse_identified_foods(text: &str) -> Result<Vec<IdentifiedFood>, VisionError> {
    let items: Vec<IdentifiedFood> = serde_json::from_str(text.trim())?;

    if let Some(bad) = items
        .iter()
        .find(|item| !item.quantity_grams.is_finite() || item.quantity_grams < 0.0)
    {
        return Err(VisionError::Schema(format!(
            "quantityGrams for '{}' must be a non-negative number, got {}",
            bad.food_name, bad.quantity_grams
        )));
    }

    Ok(items)
}

/// An identified item with the reference food it resolved to, if any
#[derive(Debug, Clone, Serialize)]
pub struct MatchedFood<'a> {
    pub identified: IdentifiedFood,
    pub food: Option<&'a FoodRecord>,
}

impl MatchedFood<'_> {
    /// Matched and with a quantity worth logging
    pub fn is_loggable(&self) -> bool {
        self.food.is_some() && self.identified.quantity_grams > 0.0
    }
}

/// Resolve every identified item against the table, keeping input order
pub fn match_identified_foods<'a>(
    items: Vec<IdentifiedFood>,
    table: &'a FoodTable,
    matcher: &dyn FoodMatcher,
) -> Vec<MatchedFood<'a>> {
    items
        .into_iter()
        .map(|identified| {
            let food = matcher.find(&identified.food_name, table.all());
            MatchedFood { identified, food }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::FirstSegmentMatcher;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    struct StubAnalyzer {
        answer: &'static str,
    }

    #[async_trait]
    impl FoodImageAnalyzer for StubAnalyzer {
        async fn analyze(&self, _image: &[u8], mime_type: &str) -> Result<Vec<IdentifiedFood>, VisionError> {
            assert_eq!(mime_type, "image/png");
            parse_identified_foods(self.answer)
        }
    }

    #[test]
    fn test_parse_valid_response() {
        let items = parse_identified_foods(
            r#"[{"foodName": "Arroz, branco, cozido", "quantityGrams": 150},
                {"foodName": "Feijão carioca", "quantityGrams": 80.5}]"#,
        )
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].food_name, "Arroz, branco, cozido");
        assert_eq!(items[0].quantity_grams, 150.0);
        assert_eq!(items[1].quantity_grams, 80.5);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_identified_foods("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_whole_response() {
        let missing_field = r#"[{"foodName": "Arroz", "quantityGrams": 100}, {"foodName": "Feijão"}]"#;
        assert!(matches!(parse_identified_foods(missing_field), Err(VisionError::Parse(_))));

        let wrong_type = r#"[{"foodName": "Arroz", "quantityGrams": "100g"}]"#;
        assert!(matches!(parse_identified_foods(wrong_type), Err(VisionError::Parse(_))));

        let negative = r#"[{"foodName": "Arroz", "quantityGrams": -5}]"#;
        assert!(matches!(parse_identified_foods(negative), Err(VisionError::Schema(_))));

        assert!(matches!(parse_identified_foods("not json"), Err(VisionError::Parse(_))));
        assert!(matches!(parse_identified_foods(r#"{"foodName": "Arroz"}"#), Err(VisionError::Parse(_))));
    }

    #[test]
    fn test_user_message_is_generic() {
        assert_eq!(VisionError::MissingApiKey.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert_eq!(VisionError::EmptyResponse.user_message(), ANALYSIS_FAILED_MESSAGE);
    }

    #[test]
    fn test_detect_mime_type() {
        assert_eq!(detect_mime_type(PNG_HEADER).unwrap(), "image/png");
        assert_eq!(detect_mime_type(b"\xFF\xD8\xFF\xE0\0\x10JFIF").unwrap(), "image/jpeg");
        assert!(matches!(detect_mime_type(b"plain text"), Err(VisionError::UnsupportedImage)));
    }

    #[test]
    fn test_match_identified_foods() {
        let table = FoodTable::builtin();
        let items = vec![
            IdentifiedFood { food_name: "Feijão, carioca".into(), quantity_grams: 80.0 },
            IdentifiedFood { food_name: "Pizza".into(), quantity_grams: 200.0 },
            IdentifiedFood { food_name: "Tomate".into(), quantity_grams: 0.0 },
        ];

        let matched = match_identified_foods(items, &table, &FirstSegmentMatcher);
        assert_eq!(matched.len(), 3);
        assert_eq!(matched[0].food.map(|f| f.id), Some(2));
        assert!(matched[0].is_loggable());
        assert!(matched[1].food.is_none());
        assert!(!matched[1].is_loggable());
        assert_eq!(matched[2].food.map(|f| f.id), Some(8));
        assert!(!matched[2].is_loggable());
    }

    #[tokio::test]
    async fn test_analyze_image_with_stub() {
        let analyzer = StubAnalyzer {
            answer: r#"[{"foodName": "Salmão, grelhado", "quantityGrams": 120}]"#,
        };
        let items = analyze_image(&analyzer, PNG_HEADER).await.unwrap();
        assert_eq!(items, vec![IdentifiedFood { food_name: "Salmão, grelhado".into(), quantity_grams: 120.0 }]);
    }

    #[tokio::test]
    async fn test_analyze_image_rejects_unknown_format() {
        let analyzer = StubAnalyzer { answer: "[]" };
        let result = analyze_image(&analyzer, b"GIF? no").await;
        assert!(matches!(result, Err(VisionError::UnsupportedImage)));
    }
}

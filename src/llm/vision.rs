use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::config::VisionConfig;

pub const MAX_IMAGE_BYTES: usize = 8 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png"];

const IDENTIFY_INSTRUCTION: &str = "Identify what food this is and return only the food name, be as \
     specific as possible. For example include any sauces or specific ingredients that you can \
     clearly identify. If unsure, reply exactly: Upload the photo from a different angle and try again.";

const NO_RESULT: &str = "No result";

/// Why an uploaded image was refused.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ImageError {
    #[error("unsupported image type: {0} (expected image/jpeg or image/png)")]
    UnsupportedType(String),
    #[error("image is not valid base64")]
    InvalidBase64,
    #[error("image is empty")]
    Empty,
    #[error("image exceeds the 8 MiB limit")]
    TooLarge,
}

/// A checked base64 image, ready to be sent inline.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
}

impl InlineImage {
    /// Accepts raw base64 or a `data:<mime>;base64,` URL. The mime type of a
    /// data URL wins over `mime_type`.
    pub fn parse(raw: &str, mime_type: &str) -> Result<Self, ImageError> {
        let raw = raw.trim();
        let (mime_type, data) = match raw
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
        {
            Some((mime, data)) => (mime, data),
            None => (mime_type, raw),
        };

        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(ImageError::UnsupportedType(mime_type));
        }
        // base64 expands 3 bytes to 4 chars
        if data.len() / 4 * 3 > MAX_IMAGE_BYTES + 3 {
            return Err(ImageError::TooLarge);
        }
        let decoded = STANDARD.decode(data).map_err(|_| ImageError::InvalidBase64)?;
        if decoded.is_empty() {
            return Err(ImageError::Empty);
        }
        if decoded.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge);
        }

        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RequestPart<'a> {
    Inline { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct InlineData<'a> {
    data: &'a str,
    mime_type: &'a str,
}

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
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Ask the vision model what food is in the image.
pub async fn identify_food(
    client: &reqwest::Client,
    config: &VisionConfig,
    image: &InlineImage,
) -> Result<String> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .context("VISION_API_KEY is not configured")?;
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        config.base_url, config.model
    );

    let req = GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                RequestPart::Inline {
                    inline_data: InlineData {
                        data: &image.data,
                        mime_type: &image.mime_type,
                    },
                },
                RequestPart::Text {
                    text: IDENTIFY_INSTRUCTION,
                },
            ],
        }],
    };

    let resp = client
        .post(&url)
        .query(&[("key", api_key)])
        .json(&req)
        .send()
        .await
        .context("Failed to call Gemini generateContent API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Gemini API returned {status}: {body}");
    }

    let body: GenerateContentResponse = resp.json().await?;
    Ok(extract_label(body))
}

fn extract_label(body: GenerateContentResponse) -> String {
    let text: String = body
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        NO_RESULT.to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_B64: &str = "iVBORw0KGgo=";

    #[test]
    fn test_parse_plain_base64() {
        let image = InlineImage::parse(PNG_B64, "image/png").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, PNG_B64);
    }

    #[test]
    fn test_parse_data_url_overrides_mime() {
        let image = InlineImage::parse(&format!("data:image/png;base64,{PNG_B64}"), "image/jpeg")
            .unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, PNG_B64);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            InlineImage::parse(PNG_B64, "image/gif").unwrap_err(),
            ImageError::UnsupportedType("image/gif".to_string())
        );
        assert_eq!(
            InlineImage::parse("not base64!!", "image/jpeg").unwrap_err(),
            ImageError::InvalidBase64
        );
        assert_eq!(InlineImage::parse("", "image/jpeg").unwrap_err(), ImageError::Empty);
    }

    #[test]
    fn test_parse_rejects_oversize() {
        let big = STANDARD.encode(vec![0u8; MAX_IMAGE_BYTES + 10]);
        assert_eq!(
            InlineImage::parse(&big, "image/jpeg").unwrap_err(),
            ImageError::TooLarge
        );
    }

    #[test]
    fn test_extract_label_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "Spaghetti "}, {"text": "carbonara\n"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_label(body), "Spaghetti carbonara");
    }

    #[test]
    fn test_extract_label_defaults_to_no_result() {
        let body: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(extract_label(body), "No result");
        let body: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": [{"content": {"parts": [{}]}}]}"#).unwrap();
        assert_eq!(extract_label(body), "No result");
    }

    #[test]
    fn test_request_shape() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    RequestPart::Inline {
                        inline_data: InlineData {
                            data: "AAAA",
                            mime_type: "image/png",
                        },
                    },
                    RequestPart::Text { text: "what is it" },
                ],
            }],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inline_data"]["mime_type"], "image/png");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "what is it");
    }
}

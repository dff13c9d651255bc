use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    config::GeminiConfig,
    error::{Error, Result},
    models::{GenerationRequest, ResponsePart},
    orchestrator::ImageModelBackend,
};

/// Image generation over the `generateContent` endpoint.
#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl ImageClient {
    pub(crate) fn new(http: reqwest::Client, config: GeminiConfig) -> Self {
        Self { http, config }
    }

    /// Run one generation round trip and return the response parts in
    /// order. Image payloads are normalized to raw bytes here; nothing
    /// downstream sees base64.
    pub async fn generate(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<ResponsePart>> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, model_id
        );
        let body = request_body(request);

        log::info!("Generating image with model: {}", model_id);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, body));
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Error::ResponseParse(e.to_string()))?;

        normalize_parts(payload)
    }
}

#[async_trait]
impl ImageModelBackend for ImageClient {
    async fn generate(
        &self,
        model_id: &str,
        request: &GenerationRequest,
    ) -> Result<Vec<ResponsePart>> {
        ImageClient::generate(self, model_id, request).await
    }
}

/// Build the request payload: the ordered reference images first, then the
/// prompt text, plus the output-size configuration.
fn request_body(request: &GenerationRequest) -> Value {
    let mut parts: Vec<Value> = request
        .images
        .iter()
        .map(|img| {
            json!({
                "inlineData": {
                    "mimeType": img.mime_type,
                    "data": BASE64.encode(&img.bytes),
                }
            })
        })
        .collect();
    parts.push(json!({ "text": request.prompt }));

    json!({
        "contents": [{ "role": "user", "parts": parts }],
        "generationConfig": {
            "responseModalities": ["TEXT", "IMAGE"],
            "imageConfig": { "imageSize": request.resolution.as_str() },
        },
    })
}

fn api_error(status: reqwest::StatusCode, body: String) -> Error {
    let message = match status.as_u16() {
        400 => format!("bad request: {}", body),
        401 | 403 => "API key was rejected".to_string(),
        404 => format!("model not found: {}", body),
        429 => format!("rate limited: {}", body),
        500..=599 => format!("server error: {}", body),
        _ => body,
    };
    Error::Api {
        status: status.as_u16(),
        message,
    }
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
    parts: Vec<RawPart>,
}

/// A wire-level part carries either text or inline image data; parts with
/// neither are dropped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<RawInlineData>,
}

#[derive(Debug, Deserialize)]
struct RawInlineData {
    data: InlinePayload,
}

/// The API serializes image bytes as a base64 string; raw byte arrays are
/// accepted as well.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InlinePayload {
    Base64(String),
    Raw(Vec<u8>),
}

impl InlinePayload {
    fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            InlinePayload::Base64(text) => BASE64
                .decode(text.as_bytes())
                .map_err(|e| Error::ResponseParse(format!("invalid base64 image data: {}", e))),
            InlinePayload::Raw(bytes) => Ok(bytes),
        }
    }
}

fn normalize_parts(response: GenerateContentResponse) -> Result<Vec<ResponsePart>> {
    let mut parts = Vec::new();
    for candidate in response.candidates {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            if let Some(text) = part.text {
                parts.push(ResponsePart::Text(text));
            } else if let Some(inline) = part.inline_data {
                parts.push(ResponsePart::Image(inline.data.into_bytes()?));
            }
        }
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InputImage, Resolution};
    use std::path::PathBuf;

    fn input_image(bytes: Vec<u8>) -> InputImage {
        InputImage {
            path: PathBuf::from("ref.png"),
            mime_type: "image/png",
            width: 4,
            height: 4,
            bytes,
        }
    }

    fn request(images: Vec<InputImage>, resolution: Resolution) -> GenerationRequest {
        GenerationRequest {
            prompt: "a lighthouse at dusk".to_string(),
            images,
            resolution,
        }
    }

    #[test]
    fn test_request_body_prompt_only() {
        let body = request_body(&request(vec![], Resolution::OneK));

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0]["text"], "a lighthouse at dusk");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "1K");
    }

    #[test]
    fn test_request_body_images_precede_prompt() {
        let body = request_body(&request(
            vec![input_image(vec![1, 2]), input_image(vec![3, 4])],
            Resolution::TwoK,
        ));

        let parts = body["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0]["inlineData"]["data"], BASE64.encode([1u8, 2]));
        assert_eq!(parts[1]["inlineData"]["data"], BASE64.encode([3u8, 4]));
        assert_eq!(parts[2]["text"], "a lighthouse at dusk");
        assert_eq!(body["generationConfig"]["imageConfig"]["imageSize"], "2K");
    }

    #[test]
    fn test_inline_payload_base64_normalizes_to_bytes() {
        let payload = InlinePayload::Base64(BASE64.encode(b"hello"));
        assert_eq!(payload.into_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_inline_payload_raw_passes_through() {
        let payload = InlinePayload::Raw(vec![9, 8, 7]);
        assert_eq!(payload.into_bytes().unwrap(), vec![9, 8, 7]);
    }

    #[test]
    fn test_inline_payload_rejects_bad_base64() {
        let err = InlinePayload::Base64("%%not base64%%".into())
            .into_bytes()
            .unwrap_err();
        assert!(matches!(err, Error::ResponseParse(_)));
    }

    #[test]
    fn test_normalize_parts_tags_text_and_images() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image." },
                        { "inlineData": { "mimeType": "image/png", "data": BASE64.encode([1u8, 2, 3]) } },
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let parts = normalize_parts(response).unwrap();
        assert_eq!(
            parts,
            vec![
                ResponsePart::Text("Here is your image.".into()),
                ResponsePart::Image(vec![1, 2, 3]),
            ]
        );
    }

    #[test]
    fn test_normalize_parts_accepts_snake_case_inline_data() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "inline_data": { "data": [4, 5] } },
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        let parts = normalize_parts(response).unwrap();
        assert_eq!(parts, vec![ResponsePart::Image(vec![4, 5])]);
    }

    #[test]
    fn test_normalize_parts_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(normalize_parts(response).unwrap().is_empty());
    }

    #[test]
    fn test_api_error_carries_status() {
        let err = api_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 429);
                assert!(message.contains("slow down"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

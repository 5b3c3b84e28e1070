use std::env;

use nanostyle_contracts::encoding::{ImageEncoding, DEFAULT_IMAGE_MIME};
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use serde_json::{json, Value};

use crate::client::{GenerationRequest, ImageGenerator};
use crate::error::GenerationError;
use crate::media::truncate_text;

pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const API_KEY_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY", "API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub api_key_vars: Vec<String>,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: non_empty_env("GEMINI_API_BASE")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_GEMINI_API_BASE.to_string()),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            api_key_vars: API_KEY_VARS.iter().map(|key| key.to_string()).collect(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model.trim().to_string();
        }
        self
    }

    pub fn endpoint(&self) -> String {
        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }

    /// Looked up on every call so a key exported mid-session is picked up.
    pub fn resolve_api_key(&self) -> Result<String, GenerationError> {
        self.api_key_vars
            .iter()
            .find_map(|key| non_empty_env(key))
            .ok_or_else(|| GenerationError::MissingCredential(self.api_key_vars.join(" or ")))
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

pub struct GeminiGenerator {
    config: GeminiConfig,
    http: HttpClient,
}

impl GeminiGenerator {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: HttpClient::new(),
        }
    }

    fn post(&self, api_key: &str, payload: &Value) -> Result<HttpResponse, GenerationError> {
        let endpoint = self.config.endpoint();
        self.http
            .post(&endpoint)
            .query(&[("key", api_key)])
            .json(payload)
            .send()
            .map_err(|err| {
                GenerationError::service(format!(
                    "Gemini request failed ({endpoint}): {}",
                    err.without_url()
                ))
            })
    }
}

impl ImageGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    fn label(&self) -> &str {
        "Gemini"
    }

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<ImageEncoding>, GenerationError> {
        let api_key = self.config.resolve_api_key()?;
        let payload = build_payload(request);
        let response = self.post(&api_key, &payload)?;
        let response_payload = response_json_or_error(response)?;
        extract_image(&response_payload)
    }
}

pub fn build_payload(request: &GenerationRequest) -> Value {
    let mut parts: Vec<Value> = request
        .images
        .iter()
        .map(|image| {
            json!({
                "inlineData": {
                    "mimeType": image.mime_type,
                    "data": image.base64_payload(),
                }
            })
        })
        .collect();
    parts.push(json!({ "text": request.prompt }));

    json!({
        "contents": [{
            "role": "user",
            "parts": parts,
        }],
        "generationConfig": {
            "responseModalities": ["IMAGE"],
            "imageConfig": {
                "aspectRatio": request.aspect_ratio,
            },
        },
    })
}

pub fn extract_image(response_payload: &Value) -> Result<Option<ImageEncoding>, GenerationError> {
    let parts = response_payload
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    for part in parts {
        let Some(inline) = part
            .get("inlineData")
            .or_else(|| part.get("inline_data"))
            .and_then(Value::as_object)
        else {
            continue;
        };
        let data = inline
            .get("data")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if data.is_empty() {
            continue;
        }
        let mime_type = inline
            .get("mimeType")
            .or_else(|| inline.get("mime_type"))
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME);
        let image = ImageEncoding::from_base64(Some(mime_type), data).map_err(|err| {
            GenerationError::generation_failed(format!("Gemini image decode failed: {err}"))
        })?;
        return Ok(Some(image));
    }

    Ok(None)
}

fn response_json_or_error(response: HttpResponse) -> Result<Value, GenerationError> {
    let status = response.status();
    let code = status.as_u16();
    let body = response.text().map_err(|err| {
        GenerationError::service(format!(
            "Gemini response body read failed: {}",
            err.without_url()
        ))
    })?;
    if !status.is_success() {
        return Err(GenerationError::service(service_error_message(code, &body)));
    }
    serde_json::from_str(&body).map_err(|err| {
        GenerationError::service(format!("Gemini returned invalid JSON payload: {err}"))
    })
}

fn service_error_message(code: u16, body: &str) -> String {
    let upstream = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        value
            .get("error")
            .and_then(|error| error.get("message"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
    });
    upstream.unwrap_or_else(|| {
        format!(
            "Gemini request failed ({code}): {}",
            truncate_text(body.trim(), 512)
        )
    })
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn offline_config() -> GeminiConfig {
        GeminiConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            api_key_vars: vec!["NANOSTYLE_TEST_KEY_THAT_IS_NEVER_SET".to_string()],
        }
    }

    #[test]
    fn endpoint_prefixes_models_path() {
        let mut config = offline_config();
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:9/models/gemini-2.5-flash-image:generateContent"
        );
        config.model = "models/custom".to_string();
        assert_eq!(
            config.endpoint(),
            "http://127.0.0.1:9/models/custom:generateContent"
        );
        assert_eq!(config.with_model("  ").model, "models/custom");
    }

    #[test]
    fn payload_puts_images_before_text_and_requests_portrait() {
        let request = GenerationRequest::with_images(
            "combine",
            vec![
                ImageEncoding::new("image/jpeg", b"person".to_vec()),
                ImageEncoding::new("image/png", b"outfit".to_vec()),
            ],
        );
        let payload = build_payload(&request);
        let parts = &payload["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], json!("image/jpeg"));
        assert_eq!(parts[0]["inlineData"]["data"], json!("cGVyc29u"));
        assert_eq!(parts[1]["inlineData"]["mimeType"], json!("image/png"));
        assert_eq!(parts[2]["text"], json!("combine"));
        assert_eq!(
            payload["generationConfig"]["imageConfig"]["aspectRatio"],
            json!("3:4")
        );
        assert_eq!(
            payload["generationConfig"]["responseModalities"],
            json!(["IMAGE"])
        );
    }

    #[test]
    fn text_only_payload_has_single_part() {
        let payload = build_payload(&GenerationRequest::text("red jacket"));
        assert_eq!(payload["contents"][0]["parts"], json!([{ "text": "red jacket" }]));
    }

    #[test]
    fn extract_image_skips_text_parts() -> anyhow::Result<()> {
        let response = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your outfit" },
                        { "inlineData": { "mimeType": "image/webp", "data": "QUJD" } }
                    ]
                }
            }]
        });
        let image = extract_image(&response)?;
        assert_eq!(image, Some(ImageEncoding::new("image/webp", b"ABC".to_vec())));
        Ok(())
    }

    #[test]
    fn extract_image_accepts_snake_case_and_defaults_mime() -> anyhow::Result<()> {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "inline_data": { "data": "QUJD" } }] }
            }]
        });
        let image = extract_image(&response)?;
        assert_eq!(image.map(|image| image.mime_type), Some("image/png".to_string()));
        Ok(())
    }

    #[test]
    fn extract_image_returns_none_without_payload() -> anyhow::Result<()> {
        assert_eq!(extract_image(&json!({}))?, None);
        let text_only = json!({
            "candidates": [{ "content": { "parts": [{ "text": "sorry" }] } }]
        });
        assert_eq!(extract_image(&text_only)?, None);
        Ok(())
    }

    #[test]
    fn extract_image_rejects_corrupt_base64() {
        let response = json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "data": "***" } }] }
            }]
        });
        assert_eq!(
            extract_image(&response).err().map(|err| err.kind()),
            Some("generation_failed")
        );
    }

    #[test]
    fn missing_credential_is_raised_before_any_request() {
        let generator = GeminiGenerator::new(offline_config());
        let err = generator
            .generate(&GenerationRequest::text("anything"))
            .err();
        assert!(matches!(err, Some(GenerationError::MissingCredential(_))));
    }

    #[test]
    fn service_error_prefers_upstream_message() {
        let body = r#"{"error": {"code": 429, "message": "quota exceeded"}}"#;
        assert_eq!(service_error_message(429, body), "quota exceeded");
        assert_eq!(
            service_error_message(502, "bad gateway"),
            "Gemini request failed (502): bad gateway"
        );
    }
}

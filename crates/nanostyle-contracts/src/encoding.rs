use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

pub const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEncoding {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageEncoding {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let mime_type = mime_type.into();
        let mime_type = if mime_type.trim().is_empty() {
            DEFAULT_IMAGE_MIME.to_string()
        } else {
            mime_type.trim().to_string()
        };
        Self { mime_type, bytes }
    }

    /// Decodes a base64 payload, optionally wrapped in a `data:` prefix.
    pub fn from_base64(mime_type: Option<&str>, payload: &str) -> Result<Self, String> {
        let data = strip_data_uri_prefix(payload).trim();
        let bytes = BASE64
            .decode(data.as_bytes())
            .map_err(|err| format!("invalid base64 image payload: {err}"))?;
        let mime = mime_type
            .map(str::to_string)
            .or_else(|| data_uri_mime(payload))
            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());
        Ok(Self::new(mime, bytes))
    }

    pub fn base64_payload(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload())
    }

    pub fn extension(&self) -> &'static str {
        match self.mime_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

pub fn strip_data_uri_prefix(value: &str) -> &str {
    match value.split_once(',') {
        Some((_, tail)) => tail,
        None => value,
    }
}

fn data_uri_mime(value: &str) -> Option<String> {
    let header = value.strip_prefix("data:")?.split(',').next()?;
    let mime = header.split(';').next()?.trim();
    if mime.is_empty() {
        return None;
    }
    Some(mime.to_string())
}

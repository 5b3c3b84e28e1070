use chrono::Utc;
use serde::Serialize;

use crate::encoding::ImageEncoding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Person,
    Outfit,
}

impl AssetCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Outfit => "outfit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    Embedded(ImageEncoding),
    Remote(String),
}

impl AssetSource {
    pub fn as_embedded(&self) -> Option<&ImageEncoding> {
        match self {
            Self::Embedded(encoding) => Some(encoding),
            Self::Remote(_) => None,
        }
    }

    pub fn to_url(&self) -> String {
        match self {
            Self::Embedded(encoding) => encoding.to_data_uri(),
            Self::Remote(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub id: String,
    pub source: AssetSource,
    pub category: AssetCategory,
    pub label: Option<String>,
    pub is_generated: bool,
}

impl ImageAsset {
    pub fn preset(id: &str, category: AssetCategory, url: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            source: AssetSource::Remote(url.to_string()),
            category,
            label: Some(label.to_string()),
            is_generated: false,
        }
    }

    pub fn uploaded(
        id: String,
        category: AssetCategory,
        encoding: ImageEncoding,
        filename: &str,
    ) -> Self {
        Self {
            id,
            source: AssetSource::Embedded(encoding),
            category,
            label: Some(filename.to_string()).filter(|value| !value.trim().is_empty()),
            is_generated: false,
        }
    }

    pub fn generated_outfit(id: String, encoding: ImageEncoding, prompt: &str) -> Self {
        Self {
            id,
            source: AssetSource::Embedded(encoding),
            category: AssetCategory::Outfit,
            label: Some(prompt.to_string()),
            is_generated: true,
        }
    }

    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or("Asset")
    }

    /// Browser-shaped record. Embedded payloads are summarized by size unless
    /// `include_payload` is set.
    pub fn record(&self, include_payload: bool) -> AssetRecord<'_> {
        let url = match (&self.source, include_payload) {
            (AssetSource::Embedded(encoding), false) => {
                format!("data:{};base64,<{} bytes>", encoding.mime_type, encoding.len())
            }
            (source, _) => source.to_url(),
        };
        AssetRecord {
            id: &self.id,
            url,
            category: self.category,
            label: self.label.as_deref(),
            is_generated: self.is_generated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord<'a> {
    pub id: &'a str,
    pub url: String,
    #[serde(rename = "type")]
    pub category: AssetCategory,
    pub label: Option<&'a str>,
    #[serde(rename = "isGenerated")]
    pub is_generated: bool,
}

#[derive(Debug, Default)]
pub struct AssetIdGenerator {
    sequence: u64,
}

impl AssetIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!(
            "{prefix}-{}-{}",
            Utc::now().timestamp_millis(),
            self.sequence
        )
    }
}

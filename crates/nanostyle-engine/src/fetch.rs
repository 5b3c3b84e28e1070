use nanostyle_contracts::encoding::ImageEncoding;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;

use crate::client::ImageFetcher;
use crate::error::GenerationError;
use crate::media::{sniff_image_mime, truncate_text};

#[derive(Default)]
pub struct HttpFetcher {
    http: HttpClient,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<ImageEncoding, GenerationError> {
        let response = self.http.get(url).send().map_err(|err| {
            GenerationError::fetch_failed(format!(
                "failed downloading image ({url}): {}",
                err.without_url()
            ))
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::fetch_failed(format!(
                "image download failed ({}) for {url}: {}",
                status.as_u16(),
                truncate_text(body.trim(), 256)
            )));
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or_default().trim().to_string());
        let bytes = response
            .bytes()
            .map_err(|err| {
                GenerationError::fetch_failed(format!(
                    "failed reading image bytes ({url}): {}",
                    err.without_url()
                ))
            })?
            .to_vec();
        encoding_from_download(url, content_type.as_deref(), bytes)
    }
}

pub(crate) fn encoding_from_download(
    url: &str,
    content_type: Option<&str>,
    bytes: Vec<u8>,
) -> Result<ImageEncoding, GenerationError> {
    if bytes.is_empty() {
        return Err(GenerationError::fetch_failed(format!(
            "image download returned no data ({url})"
        )));
    }
    let declared = content_type
        .map(str::to_ascii_lowercase)
        .filter(|value| !value.is_empty());
    let mime = match declared.as_deref() {
        Some(value) if value.starts_with("image/") => value.to_string(),
        None | Some("application/octet-stream") | Some("binary/octet-stream") => {
            sniff_image_mime(&bytes)
                .map(str::to_string)
                .ok_or_else(|| {
                    GenerationError::fetch_failed(format!("{url} did not return an image"))
                })?
        }
        Some(other) => {
            return Err(GenerationError::fetch_failed(format!(
                "{url} did not return an image (content-type {other})"
            )))
        }
    };
    Ok(ImageEncoding::new(mime, bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn declared_image_type_is_kept() -> anyhow::Result<()> {
        let image = encoding_from_download("https://img.test/a", Some("image/jpeg"), vec![1, 2])?;
        assert_eq!(image.mime_type, "image/jpeg");
        Ok(())
    }

    #[test]
    fn generic_type_is_sniffed() -> anyhow::Result<()> {
        let image = encoding_from_download(
            "https://img.test/a",
            Some("application/octet-stream"),
            PNG_HEADER.to_vec(),
        )?;
        assert_eq!(image.mime_type, "image/png");
        Ok(())
    }

    #[test]
    fn non_image_responses_fail() {
        let html =
            encoding_from_download("https://img.test/a", Some("text/html"), b"<html>".to_vec());
        assert_eq!(html.err().map(|err| err.kind()), Some("fetch_failed"));

        let unknown = encoding_from_download("https://img.test/a", None, b"plain".to_vec());
        assert_eq!(unknown.err().map(|err| err.kind()), Some("fetch_failed"));

        let empty = encoding_from_download("https://img.test/a", Some("image/png"), Vec::new());
        assert!(empty.is_err());
    }

    #[test]
    fn unreachable_host_is_fetch_failed() {
        let err = HttpFetcher::new().fetch("http://127.0.0.1:9/p1.jpg").err();
        assert_eq!(err.map(|err| err.kind()), Some("fetch_failed"));
    }
}

use std::fs;
use std::path::Path;

use nanostyle_contracts::encoding::{ImageEncoding, DEFAULT_IMAGE_MIME};

use crate::error::UploadError;
use crate::media::{mime_for_path, sniff_image_mime};

pub const UPLOAD_HINT: &str = "PNG, JPG up to 5MB";

pub fn upload_file<F>(path: &Path, on_upload: F) -> Result<(), UploadError>
where
    F: FnOnce(ImageEncoding, &str),
{
    let (encoding, filename) = read_image_file(path)?;
    on_upload(encoding, &filename);
    Ok(())
}

pub fn read_image_file(path: &Path) -> Result<(ImageEncoding, String), UploadError> {
    let bytes = fs::read(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(UploadError::Empty(path.to_path_buf()));
    }
    let mime = mime_for_path(path)
        .or_else(|| sniff_image_mime(&bytes))
        .unwrap_or(DEFAULT_IMAGE_MIME);
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok((ImageEncoding::new(mime, bytes), filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_reports_bytes_mime_and_filename() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("me.jpeg");
        fs::write(&path, [0xff, 0xd8, 0xff, 0xe0])?;

        let mut received = None;
        upload_file(&path, |encoding, filename| {
            received = Some((encoding, filename.to_string()));
        })?;

        let (encoding, filename) = received.ok_or_else(|| anyhow::anyhow!("handler not called"))?;
        assert_eq!(filename, "me.jpeg");
        assert_eq!(encoding.mime_type, "image/jpeg");
        assert_eq!(encoding.bytes, vec![0xff, 0xd8, 0xff, 0xe0]);
        Ok(())
    }

    #[test]
    fn extensionless_files_are_sniffed() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("photo");
        fs::write(&path, [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])?;
        let (encoding, _) = read_image_file(&path)?;
        assert_eq!(encoding.mime_type, "image/png");
        Ok(())
    }

    #[test]
    fn missing_and_empty_files_skip_the_handler() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let empty = temp.path().join("empty.png");
        fs::write(&empty, b"")?;

        let mut calls = 0;
        assert!(upload_file(&temp.path().join("nope.png"), |_, _| calls += 1).is_err());
        assert!(matches!(
            upload_file(&empty, |_, _| calls += 1),
            Err(UploadError::Empty(_))
        ));
        assert_eq!(calls, 0);
        Ok(())
    }
}

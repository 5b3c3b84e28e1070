use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use nanostyle_contracts::encoding::ImageEncoding;
use sha2::{Digest, Sha256};

use crate::client::{GenerationRequest, ImageGenerator};
use crate::error::GenerationError;

const DRYRUN_WIDTH: u32 = 384;
const DRYRUN_HEIGHT: u32 = 512;

#[derive(Debug, Default, Clone, Copy)]
pub struct DryrunGenerator;

impl ImageGenerator for DryrunGenerator {
    fn name(&self) -> &str {
        "dryrun"
    }

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<ImageEncoding>, GenerationError> {
        let (r, g, b) = color_from_request(request);
        let mut image = RgbImage::new(DRYRUN_WIDTH, DRYRUN_HEIGHT);
        for pixel in image.pixels_mut() {
            *pixel = Rgb([r, g, b]);
        }
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| GenerationError::service(format!("dryrun encode failed: {err}")))?;
        Ok(Some(ImageEncoding::new("image/png", bytes)))
    }
}

fn color_from_request(request: &GenerationRequest) -> (u8, u8, u8) {
    let mut hasher = Sha256::new();
    hasher.update(request.prompt.as_bytes());
    for image in &request.images {
        hasher.update(&image.bytes);
    }
    let digest = hasher.finalize();
    (digest[0], digest[1], digest[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dryrun_renders_portrait_png() -> anyhow::Result<()> {
        let image = DryrunGenerator
            .generate(&GenerationRequest::text("red jacket"))?
            .ok_or_else(|| anyhow::anyhow!("dryrun returned no image"))?;
        assert_eq!(image.mime_type, "image/png");

        let decoded = image::load_from_memory(&image.bytes)?;
        assert_eq!((decoded.width(), decoded.height()), (384, 512));
        Ok(())
    }

    #[test]
    fn colour_depends_on_inputs() {
        let text = GenerationRequest::text("same");
        let with_image = GenerationRequest::with_images(
            "same",
            vec![ImageEncoding::new("image/png", vec![1, 2, 3])],
        );
        assert_eq!(color_from_request(&text), color_from_request(&text.clone()));
        assert_ne!(color_from_request(&text), color_from_request(&with_image));
    }
}

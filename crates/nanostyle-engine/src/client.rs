use nanostyle_contracts::encoding::ImageEncoding;

use crate::error::GenerationError;

pub const PORTRAIT_ASPECT_RATIO: &str = "3:4";

const TRY_ON_INSTRUCTIONS: &str = "Act as an expert fashion AI.
Create a photorealistic full-body image of the person shown in the first image, wearing the outfit shown in the second image.

Requirements:
1. PRESERVE the person's identity, facial features, skin tone, and body pose exactly from the first image.
2. REPLACE the original clothing with the new outfit from the second image.
3. Fit the new outfit naturally onto the person's body, respecting physics, lighting, and wrinkles.
4. Maintain the background of the person image if possible, or use a high-quality studio background.
5. Output a high-resolution full-body shot.";

pub fn outfit_prompt(description: &str) -> String {
    format!(
        "A high-quality, professional fashion photography shot of the following clothing item on a plain neutral background: {}. Flat lay or mannequin style. Full view of the garment.",
        description.trim()
    )
}

pub fn try_on_prompt() -> &'static str {
    TRY_ON_INSTRUCTIONS
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub images: Vec<ImageEncoding>,
    pub aspect_ratio: String,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            images: Vec::new(),
            aspect_ratio: PORTRAIT_ASPECT_RATIO.to_string(),
        }
    }

    pub fn with_images(prompt: impl Into<String>, images: Vec<ImageEncoding>) -> Self {
        Self {
            images,
            ..Self::text(prompt)
        }
    }
}

pub trait ImageGenerator {
    fn name(&self) -> &str;

    fn label(&self) -> &str {
        self.name()
    }

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<ImageEncoding>, GenerationError>;
}

pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<ImageEncoding, GenerationError>;
}

impl<T: ImageGenerator + ?Sized> ImageGenerator for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<ImageEncoding>, GenerationError> {
        (**self).generate(request)
    }
}

impl<T: ImageGenerator + ?Sized> ImageGenerator for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<ImageEncoding>, GenerationError> {
        (**self).generate(request)
    }
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for Box<T> {
    fn fetch(&self, url: &str) -> Result<ImageEncoding, GenerationError> {
        (**self).fetch(url)
    }
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for &T {
    fn fetch(&self, url: &str) -> Result<ImageEncoding, GenerationError> {
        (**self).fetch(url)
    }
}

pub struct GenerationClient<G, F> {
    generator: G,
    fetcher: F,
}

impl<G: ImageGenerator, F: ImageFetcher> GenerationClient<G, F> {
    pub fn new(generator: G, fetcher: F) -> Self {
        Self { generator, fetcher }
    }

    pub fn generate_outfit_image(
        &self,
        description: &str,
    ) -> Result<ImageEncoding, GenerationError> {
        if description.trim().is_empty() {
            return Err(GenerationError::generation_failed(
                "Describe the outfit before generating it.",
            ));
        }
        let request = GenerationRequest::text(outfit_prompt(description));
        self.generator.generate(&request)?.ok_or_else(|| {
            GenerationError::generation_failed(format!(
                "No image data returned from {}.",
                self.generator.label()
            ))
        })
    }

    pub fn generate_try_on_result(
        &self,
        person: &ImageEncoding,
        outfit: &ImageEncoding,
    ) -> Result<ImageEncoding, GenerationError> {
        let request = GenerationRequest::with_images(
            try_on_prompt(),
            vec![person.clone(), outfit.clone()],
        );
        self.generator.generate(&request)?.ok_or_else(|| {
            GenerationError::generation_failed(format!(
                "No try-on result returned from {}.",
                self.generator.label()
            ))
        })
    }

    pub fn remote_url_to_embedding(&self, url: &str) -> Result<ImageEncoding, GenerationError> {
        self.fetcher.fetch(url)
    }
}

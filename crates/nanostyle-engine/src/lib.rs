use nanostyle_contracts::workflow::WorkflowState;

mod client;
mod dryrun;
mod error;
mod fetch;
mod gemini;
mod media;
mod upload;
mod workflow;

#[cfg(test)]
mod testing;

pub use client::{
    outfit_prompt, try_on_prompt, GenerationClient, GenerationRequest, ImageFetcher,
    ImageGenerator, PORTRAIT_ASPECT_RATIO,
};
pub use dryrun::DryrunGenerator;
pub use error::{GenerationError, UploadError};
pub use fetch::HttpFetcher;
pub use gemini::{
    build_payload, extract_image, GeminiConfig, GeminiGenerator, API_KEY_VARS,
    DEFAULT_GEMINI_API_BASE, DEFAULT_IMAGE_MODEL,
};
pub use upload::{read_image_file, upload_file, UPLOAD_HINT};
pub use workflow::{OutfitJob, TryOnJob, WorkflowController};

pub type DynGenerator = Box<dyn ImageGenerator>;

pub type DefaultController = WorkflowController<DynGenerator, HttpFetcher>;

pub fn default_controller(generator: DynGenerator, state: WorkflowState) -> DefaultController {
    WorkflowController::with_state(GenerationClient::new(generator, HttpFetcher::new()), state)
}

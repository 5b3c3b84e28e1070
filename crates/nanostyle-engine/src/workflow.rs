use nanostyle_contracts::assets::{AssetCategory, AssetIdGenerator, AssetSource, ImageAsset};
use nanostyle_contracts::encoding::ImageEncoding;
use nanostyle_contracts::events::{payload, EventWriter};
use nanostyle_contracts::workflow::{Stage, WorkflowState};
use serde_json::json;

use crate::client::{GenerationClient, ImageFetcher, ImageGenerator};
use crate::error::GenerationError;

const OUTFIT_FALLBACK_ERROR: &str = "Failed to generate outfit. Please try again.";
const TRY_ON_FALLBACK_ERROR: &str = "Failed to perform virtual try-on. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutfitJob {
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnJob {
    pub person: ImageAsset,
    pub outfit: ImageAsset,
}

/// Sole owner and writer of [`WorkflowState`].
///
/// Long-running operations come in two halves (`begin_*` / `complete_*`) so a
/// front end can keep the in-flight window open between them; the
/// `request_*` methods run both halves around one blocking call. Failures end
/// up in `state.error` and never escape.
pub struct WorkflowController<G, F> {
    client: GenerationClient<G, F>,
    state: WorkflowState,
    ids: AssetIdGenerator,
    events: Option<EventWriter>,
}

impl<G: ImageGenerator, F: ImageFetcher> WorkflowController<G, F> {
    pub fn new(client: GenerationClient<G, F>) -> Self {
        Self::with_state(client, WorkflowState::with_presets())
    }

    pub fn with_state(client: GenerationClient<G, F>, state: WorkflowState) -> Self {
        Self {
            client,
            state,
            ids: AssetIdGenerator::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: EventWriter) -> Self {
        self.events = Some(events);
        self
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn result_image(&self) -> Option<&ImageEncoding> {
        self.state.result_image.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_generating_outfit || self.state.is_generating_result
    }

    pub fn select_person(&mut self, id: &str) -> bool {
        self.select(AssetCategory::Person, id)
    }

    pub fn select_outfit(&mut self, id: &str) -> bool {
        self.select(AssetCategory::Outfit, id)
    }

    pub fn select(&mut self, category: AssetCategory, id: &str) -> bool {
        if !self.state.assets(category).iter().any(|asset| asset.id == id) {
            return false;
        }
        if self.state.selected_id(category) == Some(id) {
            return true;
        }
        let slot = match category {
            AssetCategory::Person => &mut self.state.selected_person_id,
            AssetCategory::Outfit => &mut self.state.selected_outfit_id,
        };
        *slot = Some(id.to_string());
        self.emit(
            "selection_changed",
            json!({ "category": category.as_str(), "asset_id": id }),
        );
        true
    }

    pub fn set_outfit_prompt(&mut self, text: &str) {
        self.state.outfit_prompt = text.to_string();
    }

    pub fn dismiss_error(&mut self) {
        self.state.error = None;
    }

    pub fn add_uploaded_asset(
        &mut self,
        encoding: ImageEncoding,
        category: AssetCategory,
        filename: &str,
    ) -> String {
        let id = self.ids.next_id("upload");
        let asset = ImageAsset::uploaded(id.clone(), category, encoding, filename);
        self.insert_and_select(asset);
        id
    }

    /// Admits an outfit generation, or returns `None` when the prompt is blank
    /// or another generation is still in flight.
    pub fn begin_outfit_generation(&mut self, prompt: &str) -> Option<OutfitJob> {
        if prompt.trim().is_empty() || self.state.is_generating_outfit {
            return None;
        }
        self.state.is_generating_outfit = true;
        self.state.error = None;
        self.emit("outfit_generation_started", json!({ "prompt": prompt }));
        Some(OutfitJob {
            prompt: prompt.to_string(),
        })
    }

    /// Applies the outcome of `job`. Returns the new asset id on success.
    pub fn complete_outfit_generation(
        &mut self,
        job: OutfitJob,
        result: Result<ImageEncoding, GenerationError>,
    ) -> Option<String> {
        self.state.is_generating_outfit = false;
        match result {
            Ok(encoding) => {
                let id = self.ids.next_id("gen");
                let asset = ImageAsset::generated_outfit(id.clone(), encoding, &job.prompt);
                self.insert_and_select(asset);
                self.state.outfit_prompt.clear();
                self.emit(
                    "outfit_generation_finished",
                    json!({ "prompt": job.prompt, "asset_id": id }),
                );
                Some(id)
            }
            Err(err) => {
                self.emit(
                    "outfit_generation_failed",
                    json!({ "prompt": job.prompt, "kind": err.kind(), "error": err.to_string() }),
                );
                self.fail(&err, OUTFIT_FALLBACK_ERROR);
                None
            }
        }
    }

    pub fn request_outfit_generation(&mut self, prompt: &str) -> bool {
        let Some(job) = self.begin_outfit_generation(prompt) else {
            return false;
        };
        let result = self.client.generate_outfit_image(&job.prompt);
        self.complete_outfit_generation(job, result);
        true
    }

    /// Admits a try-on when both selections resolve and none is in flight.
    /// Clears the previous error and result.
    pub fn begin_try_on(&mut self) -> Option<TryOnJob> {
        if self.state.is_generating_result {
            return None;
        }
        let person = self.state.selected_person()?.clone();
        let outfit = self.state.selected_outfit()?.clone();

        self.state.is_generating_result = true;
        self.state.error = None;
        self.state.result_image = None;
        self.emit(
            "try_on_started",
            json!({ "person_id": person.id, "outfit_id": outfit.id }),
        );
        Some(TryOnJob { person, outfit })
    }

    pub fn run_try_on(&self, job: &TryOnJob) -> Result<ImageEncoding, GenerationError> {
        let person = self.resolve(&job.person)?;
        let outfit = self.resolve(&job.outfit)?;
        self.client.generate_try_on_result(&person, &outfit)
    }

    /// Stores the result and moves to [`Stage::Result`], or records the error
    /// and leaves the stage alone.
    pub fn complete_try_on(
        &mut self,
        job: TryOnJob,
        result: Result<ImageEncoding, GenerationError>,
    ) -> bool {
        self.state.is_generating_result = false;
        match result {
            Ok(image) => {
                self.emit(
                    "try_on_finished",
                    json!({
                        "person_id": job.person.id,
                        "outfit_id": job.outfit.id,
                        "mime_type": image.mime_type,
                        "bytes": image.len(),
                    }),
                );
                self.state.result_image = Some(image);
                self.set_stage(Stage::Result);
                true
            }
            Err(err) => {
                self.emit(
                    "try_on_failed",
                    json!({
                        "person_id": job.person.id,
                        "outfit_id": job.outfit.id,
                        "kind": err.kind(),
                        "error": err.to_string(),
                    }),
                );
                self.fail(&err, TRY_ON_FALLBACK_ERROR);
                false
            }
        }
    }

    pub fn request_try_on(&mut self) -> bool {
        let Some(job) = self.begin_try_on() else {
            return false;
        };
        let result = self.run_try_on(&job);
        self.complete_try_on(job, result);
        true
    }

    /// Moves forward one stage where the guards allow it. From the outfit
    /// stage this runs the try-on; the stage only changes if it succeeds.
    pub fn advance(&mut self) -> Stage {
        match self.state.stage {
            Stage::SelectPerson => {
                if self.state.can_proceed_to_outfit() {
                    self.set_stage(Stage::SelectOutfit);
                }
            }
            Stage::SelectOutfit => {
                if self.state.can_proceed_to_result() {
                    self.request_try_on();
                }
            }
            Stage::Result => {}
        }
        self.state.stage
    }

    pub fn go_back(&mut self) -> Stage {
        if let Some(previous) = self.state.stage.previous() {
            self.set_stage(previous);
        }
        self.state.stage
    }

    fn resolve(&self, asset: &ImageAsset) -> Result<ImageEncoding, GenerationError> {
        match &asset.source {
            AssetSource::Embedded(encoding) => Ok(encoding.clone()),
            AssetSource::Remote(url) => self.client.remote_url_to_embedding(url),
        }
    }

    fn insert_and_select(&mut self, asset: ImageAsset) {
        let category = asset.category;
        let id = asset.id.clone();
        self.emit(
            "asset_added",
            json!({
                "category": category.as_str(),
                "asset_id": id,
                "label": asset.label,
                "is_generated": asset.is_generated,
            }),
        );
        match category {
            AssetCategory::Person => {
                self.state.people.insert(0, asset);
                self.state.selected_person_id = Some(id);
            }
            AssetCategory::Outfit => {
                self.state.outfits.insert(0, asset);
                self.state.selected_outfit_id = Some(id);
            }
        }
    }

    fn set_stage(&mut self, stage: Stage) {
        if self.state.stage == stage {
            return;
        }
        let from = self.state.stage;
        self.state.stage = stage;
        self.emit("stage_changed", json!({ "from": from, "to": stage }));
    }

    fn fail(&mut self, err: &GenerationError, fallback: &str) {
        let message = err.to_string();
        self.state.error = Some(if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        });
    }

    fn emit(&self, event_type: &str, value: serde_json::Value) {
        let Some(events) = self.events.as_ref() else {
            return;
        };
        if let Err(err) = events.emit(event_type, payload(value)) {
            eprintln!("nanostyle: failed to record {event_type} event: {err:#}");
        }
    }
}

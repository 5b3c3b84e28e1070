use crate::assets::{default_outfits, default_people, AssetCategory, ImageAsset};
use crate::encoding::ImageEncoding;

use super::stage::Stage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowState {
    pub stage: Stage,
    pub people: Vec<ImageAsset>,
    pub outfits: Vec<ImageAsset>,
    pub selected_person_id: Option<String>,
    pub selected_outfit_id: Option<String>,
    pub outfit_prompt: String,
    pub is_generating_outfit: bool,
    pub is_generating_result: bool,
    pub result_image: Option<ImageEncoding>,
    pub error: Option<String>,
}

impl WorkflowState {
    pub fn new(people: Vec<ImageAsset>, outfits: Vec<ImageAsset>) -> Self {
        Self {
            stage: Stage::SelectPerson,
            people,
            outfits,
            selected_person_id: None,
            selected_outfit_id: None,
            outfit_prompt: String::new(),
            is_generating_outfit: false,
            is_generating_result: false,
            result_image: None,
            error: None,
        }
    }

    pub fn with_presets() -> Self {
        Self::new(default_people(), default_outfits())
    }

    pub fn assets(&self, category: AssetCategory) -> &[ImageAsset] {
        match category {
            AssetCategory::Person => &self.people,
            AssetCategory::Outfit => &self.outfits,
        }
    }

    pub fn selected_id(&self, category: AssetCategory) -> Option<&str> {
        match category {
            AssetCategory::Person => self.selected_person_id.as_deref(),
            AssetCategory::Outfit => self.selected_outfit_id.as_deref(),
        }
    }

    pub fn selected_person(&self) -> Option<&ImageAsset> {
        find(&self.people, self.selected_person_id.as_deref())
    }

    pub fn selected_outfit(&self) -> Option<&ImageAsset> {
        find(&self.outfits, self.selected_outfit_id.as_deref())
    }

    pub fn can_proceed_to_outfit(&self) -> bool {
        self.selected_person_id.is_some()
    }

    pub fn can_proceed_to_result(&self) -> bool {
        self.selected_outfit_id.is_some()
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::with_presets()
    }
}

fn find<'a>(assets: &'a [ImageAsset], id: Option<&str>) -> Option<&'a ImageAsset> {
    let id = id?;
    assets.iter().find(|asset| asset.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_starts_at_person_stage_with_presets() {
        let state = WorkflowState::default();
        assert_eq!(state.stage, Stage::SelectPerson);
        assert_eq!(state.people.len(), 3);
        assert_eq!(state.outfits.len(), 3);
        assert!(!state.can_proceed_to_outfit());
        assert!(state.selected_person().is_none());
    }

    #[test]
    fn selected_lookups_resolve_by_id() {
        let mut state = WorkflowState::default();
        state.selected_person_id = Some("p2".to_string());
        state.selected_outfit_id = Some("missing".to_string());
        assert_eq!(state.selected_person().map(|asset| asset.id.as_str()), Some("p2"));
        assert!(state.selected_outfit().is_none());
        assert_eq!(state.selected_id(AssetCategory::Person), Some("p2"));
    }
}

mod gallery;
mod progress;
mod stage;
mod state;

pub use gallery::{gallery_tiles, select_at, GalleryTile, GENERATED_BADGE};
pub use progress::{progress_markers, render_progress, StepMarker};
pub use stage::Stage;
pub use state::WorkflowState;

use nanostyle_contracts::workflow::{
    gallery_tiles, render_progress, GalleryTile, Stage, WorkflowState,
};
use nanostyle_engine::UPLOAD_HINT;

pub(crate) const APP_TITLE: &str = "NanoStyle AI";
const OUTFIT_EXAMPLE: &str = "A vintage red leather jacket with gold studs";

pub(crate) fn render_screen(state: &WorkflowState, busy: bool, model_label: &str) -> String {
    let mut lines = vec![
        format!("{APP_TITLE} · {model_label}"),
        render_progress(state.stage),
        String::new(),
    ];
    if let Some(error) = state.error.as_deref() {
        lines.push(format!("! {error}"));
        lines.push(String::new());
    }

    match state.stage {
        Stage::SelectPerson => {
            lines.push("Choose a Model".to_string());
            lines.push("Upload your own photo or pick a preset model.".to_string());
            lines.push(format!("  /upload <path>  Upload your full-body photo ({UPLOAD_HINT})"));
            lines.push(render_gallery(
                "Presets",
                &gallery_tiles(&state.people, state.selected_person_id.as_deref()),
            ));
        }
        Stage::SelectOutfit => {
            lines.push("Pick an Outfit".to_string());
            lines.push("Select, upload, or generate a unique style.".to_string());
            lines.push("AI Outfit Designer".to_string());
            lines.push(format!("  Describe a clothing item (e.g., \"{OUTFIT_EXAMPLE}\")"));
            if state.is_generating_outfit {
                lines.push("  Generating outfit…".to_string());
            } else if state.outfit_prompt.trim().is_empty() {
                lines.push("  /generate <description>".to_string());
            } else {
                lines.push(format!("  Prompt: {} (/generate to run)", state.outfit_prompt));
            }
            lines.push(format!("  /upload <path>  Upload outfit photo ({UPLOAD_HINT})"));
            lines.push(render_gallery(
                "Wardrobe",
                &gallery_tiles(&state.outfits, state.selected_outfit_id.as_deref()),
            ));
        }
        Stage::Result => {
            lines.push("Your New Look".to_string());
            match state.result_image.as_ref() {
                Some(image) => {
                    lines.push(format!(
                        "  Result ready: {} ({} bytes)",
                        image.mime_type,
                        image.len()
                    ));
                    lines.push(
                        "  /save [path] to download, /back to try another outfit".to_string(),
                    );
                }
                None => lines.push("  Loading result...".to_string()),
            }
        }
    }

    if let Some(footer) = render_footer(state, busy) {
        lines.push(String::new());
        lines.push(footer);
    }
    lines.join("\n")
}

pub(crate) fn render_gallery(title: &str, tiles: &[GalleryTile]) -> String {
    let mut lines = vec![title.to_ascii_uppercase()];
    for tile in tiles {
        let mark = if tile.selected { "[x]" } else { "[ ]" };
        let badge = tile
            .badge
            .map(|badge| format!(" <{badge}>"))
            .unwrap_or_default();
        lines.push(format!(
            "  {mark} {}. {}{badge}  ({})",
            tile.index + 1,
            tile.label,
            tile.id
        ));
    }
    lines.join("\n")
}

fn render_footer(state: &WorkflowState, busy: bool) -> Option<String> {
    let (label, enabled) = match state.stage {
        Stage::SelectPerson => ("Next Step", state.can_proceed_to_outfit()),
        Stage::SelectOutfit => ("Visualize Look", state.can_proceed_to_result()),
        Stage::Result => return None,
    };
    let back = if state.stage > Stage::SelectPerson {
        "/back  "
    } else {
        ""
    };
    let action = if busy {
        format!("{label} (working…)")
    } else if enabled {
        format!("/next  {label}")
    } else {
        format!("{label} (select an image first)")
    };
    Some(format!("{back}{action}"))
}

#[cfg(test)]
mod tests {
    use nanostyle_contracts::assets::ImageAsset;
    use nanostyle_contracts::encoding::ImageEncoding;

    use super::*;

    #[test]
    fn person_screen_lists_presets_and_disables_next() {
        let state = WorkflowState::default();
        let screen = render_screen(&state, false, "gemini-2.5-flash-image");
        assert!(screen.starts_with("NanoStyle AI · gemini-2.5-flash-image"));
        assert!(screen.contains("[1] Person"));
        assert!(screen.contains("  [ ] 1. Model A  (p1)"));
        assert!(screen.contains("Next Step (select an image first)"));
        assert!(!screen.contains("/back"));
    }

    #[test]
    fn outfit_screen_shows_badge_selection_and_error() {
        let mut state = WorkflowState::default();
        state.stage = Stage::SelectOutfit;
        state.outfits.insert(
            0,
            ImageAsset::generated_outfit(
                "gen-1".to_string(),
                ImageEncoding::new("image/png", vec![1]),
                "red jacket",
            ),
        );
        state.selected_outfit_id = Some("gen-1".to_string());
        state.error = Some("quota exceeded".to_string());

        let screen = render_screen(&state, false, "dryrun");
        assert!(screen.contains("! quota exceeded"));
        assert!(screen.contains("  [x] 1. red jacket <AI>  (gen-1)"));
        assert!(screen.contains("/back  /next  Visualize Look"));
    }

    #[test]
    fn busy_flag_replaces_next_action() {
        let mut state = WorkflowState::default();
        state.stage = Stage::SelectOutfit;
        state.selected_outfit_id = Some("c1".to_string());
        state.is_generating_outfit = true;
        let screen = render_screen(&state, true, "dryrun");
        assert!(screen.contains("Generating outfit…"));
        assert!(screen.contains("Visualize Look (working…)"));
    }

    #[test]
    fn result_screen_has_no_footer() {
        let mut state = WorkflowState::default();
        state.stage = Stage::Result;
        state.result_image = Some(ImageEncoding::new("image/png", vec![0; 4]));
        let screen = render_screen(&state, false, "dryrun");
        assert!(screen.contains("Result ready: image/png (4 bytes)"));
        assert!(!screen.contains("Visualize Look"));
    }
}

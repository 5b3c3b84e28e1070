use super::stage::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMarker {
    pub stage: Stage,
    pub number: usize,
    pub label: &'static str,
    pub active: bool,
    pub current: bool,
}

pub fn progress_markers(current: Stage) -> [StepMarker; 3] {
    Stage::ALL.map(|stage| StepMarker {
        stage,
        number: stage.ordinal() + 1,
        label: stage.label(),
        active: stage.ordinal() <= current.ordinal(),
        current: stage == current,
    })
}

/// One-line rendering: `[1] Person` for the current step, `(n)` for reached
/// steps and a bare number for the rest.
pub fn render_progress(current: Stage) -> String {
    progress_markers(current)
        .iter()
        .map(|marker| {
            let number = if marker.current {
                format!("[{}]", marker.number)
            } else if marker.active {
                format!("({})", marker.number)
            } else {
                format!(" {} ", marker.number)
            };
            format!("{number} {}", marker.label)
        })
        .collect::<Vec<String>>()
        .join(" ── ")
}

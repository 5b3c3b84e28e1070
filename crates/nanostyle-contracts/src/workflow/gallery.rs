use crate::assets::ImageAsset;

pub const GENERATED_BADGE: &str = "AI";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryTile {
    pub index: usize,
    pub id: String,
    pub label: String,
    pub selected: bool,
    pub badge: Option<&'static str>,
}

pub fn gallery_tiles(assets: &[ImageAsset], selected_id: Option<&str>) -> Vec<GalleryTile> {
    assets
        .iter()
        .enumerate()
        .map(|(index, asset)| GalleryTile {
            index,
            id: asset.id.clone(),
            label: asset.display_label().to_string(),
            selected: selected_id == Some(asset.id.as_str()),
            badge: asset.is_generated.then_some(GENERATED_BADGE),
        })
        .collect()
}

/// Forwards a click on tile `index` to `on_select`. Returns false when the
/// index is out of range, in which case the handler is not called.
pub fn select_at<F>(assets: &[ImageAsset], index: usize, on_select: F) -> bool
where
    F: FnOnce(&ImageAsset),
{
    match assets.get(index) {
        Some(asset) => {
            on_select(asset);
            true
        }
        None => false,
    }
}

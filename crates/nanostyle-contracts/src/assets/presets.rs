use super::asset::{AssetCategory, ImageAsset};

const PEOPLE: &[(&str, &str, &str)] = &[
    (
        "p1",
        "https://images.unsplash.com/photo-1534528741775-53994a69daeb?q=80&w=1000&auto=format&fit=crop",
        "Model A",
    ),
    (
        "p2",
        "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?q=80&w=1000&auto=format&fit=crop",
        "Model B",
    ),
    (
        "p3",
        "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?q=80&w=1000&auto=format&fit=crop",
        "Model C",
    ),
];

const OUTFITS: &[(&str, &str, &str)] = &[
    (
        "c1",
        "https://images.unsplash.com/photo-1591047139829-d91aecb6caea?q=80&w=1000&auto=format&fit=crop",
        "Denim Jacket",
    ),
    (
        "c2",
        "https://images.unsplash.com/photo-1583743814966-8936f5b7be1a?q=80&w=1000&auto=format&fit=crop",
        "Black T-Shirt",
    ),
    (
        "c3",
        "https://images.unsplash.com/photo-1515886657613-9f3515b0c78f?q=80&w=1000&auto=format&fit=crop",
        "Summer Dress",
    ),
];

pub fn default_people() -> Vec<ImageAsset> {
    build(AssetCategory::Person, PEOPLE)
}

pub fn default_outfits() -> Vec<ImageAsset> {
    build(AssetCategory::Outfit, OUTFITS)
}

fn build(category: AssetCategory, rows: &[(&str, &str, &str)]) -> Vec<ImageAsset> {
    rows.iter()
        .map(|(id, url, label)| ImageAsset::preset(id, category, url, label))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn presets_have_unique_ids_per_category() {
        for (category, assets) in [
            (AssetCategory::Person, default_people()),
            (AssetCategory::Outfit, default_outfits()),
        ] {
            let ids: HashSet<&str> = assets.iter().map(|asset| asset.id.as_str()).collect();
            assert_eq!(ids.len(), assets.len());
            assert!(assets.iter().all(|asset| asset.category == category));
            assert!(assets.iter().all(|asset| !asset.is_generated));
        }
    }

    #[test]
    fn preset_order_is_stable() {
        let ids: Vec<String> = default_outfits().into_iter().map(|asset| asset.id).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
        assert_eq!(default_people()[0].display_label(), "Model A");
    }
}

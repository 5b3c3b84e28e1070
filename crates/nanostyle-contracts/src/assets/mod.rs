mod asset;
mod presets;

pub use asset::{AssetCategory, AssetIdGenerator, AssetRecord, AssetSource, ImageAsset};
pub use presets::{default_outfits, default_people};

pub mod assets;
pub mod config;
pub mod export;
pub mod factory;
pub mod layers;
pub mod props;
pub mod shortcuts;
pub mod sync;

pub use assets::{AssetError, AssetFetcher, ImageSource, LoadedAsset, load_asset};
pub use config::{EditorConfig, TextOptions};
pub use export::ExportedImage;
pub use layers::LayerEntry;
pub use props::{PropertyJson, ShadowSpec, TextOptionsSpec};
pub use shortcuts::{FocusTarget, KeyInput, ShortcutAction, ShortcutMap};
pub use sync::{Editor, FillMode, ScaleAxis, ShadowField};

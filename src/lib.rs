pub mod asset;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod loaders;
pub mod math;
pub mod projection;
pub mod render;
pub mod scenes;
pub mod tracking;

pub use asset::{AssetSource, SceneAsset};
pub use config::Config;
pub use projection::{OffAxisProjector, WindowGeometry};
pub use scenes::create_default_model;

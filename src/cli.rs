// cli.rs - Command-line interface configuration
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::tracking::TrackingMode;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartMode {
    #[default]
    Idle,
    Camera,
    Manual,
}

impl From<StartMode> for TrackingMode {
    fn from(mode: StartMode) -> Self {
        match mode {
            StartMode::Idle => TrackingMode::Idle,
            StartMode::Camera => TrackingMode::CameraTracking,
            StartMode::Manual => TrackingMode::ManualTracking,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "parallax-portal")]
#[command(about = "Head-tracked window-into-a-scene viewer", long_about = None)]
pub struct Cli {
    /// glTF/GLB model to show instead of the built-in figure
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// JSON file overriding tracking, projection and animation parameters
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Camera device index (overrides the config file)
    #[arg(long = "camera-index")]
    pub camera_index: Option<i32>,

    /// Tracking mode to enter on startup
    #[arg(long, value_enum, default_value_t = StartMode::Idle)]
    pub mode: StartMode,

    /// Hide the overlay; keyboard shortcuts still work
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["parallax-portal"]);
        assert!(cli.model.is_none());
        assert_eq!(cli.mode, StartMode::Idle);
        assert!(!cli.no_ui);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::parse_from([
            "parallax-portal",
            "--model",
            "robot.glb",
            "--camera-index",
            "1",
            "--mode",
            "manual",
            "--no-ui",
        ]);
        assert_eq!(cli.model, Some(PathBuf::from("robot.glb")));
        assert_eq!(cli.camera_index, Some(1));
        assert_eq!(TrackingMode::from(cli.mode), TrackingMode::ManualTracking);
        assert!(cli.no_ui);
    }
}

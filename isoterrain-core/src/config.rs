use crate::camera::Zoom;
use crate::coordinates::Viewport;
use crate::projection::Projection;
use crate::render::HoverLift;
use crate::worldgen::{TerrainDistribution, TerrainWeights};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

pub const DEFAULT_GRID_SIZE: i32 = 128;
pub const DEFAULT_TILE_SIZE: i32 = 64;
pub const MIN_TILE_SIZE: i32 = 16;
pub const MAX_TILE_SIZE: i32 = 256;
pub const ZOOM_STEP: i32 = 16;
pub const VERTICAL_RATIO: i32 = 7;
pub const HEIGHT_SCALE: i32 = 8;
pub const MAX_HEIGHT: i32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub grid_size: i32,
    pub seed: u64,
    pub viewport: Viewport,
    pub initial_tile_size: i32,
    pub min_tile_size: i32,
    pub max_tile_size: i32,
    pub zoom_step: i32,
    pub vertical_ratio: i32,
    pub height_scale: i32,
    pub max_height: i32,
    pub terrain_weights: TerrainWeights,
    pub hover_lift: i32,
    pub hover_bob_amplitude: i32,
    pub hover_bob_period_secs: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            seed: 42,
            viewport: Viewport::default(),
            initial_tile_size: DEFAULT_TILE_SIZE,
            min_tile_size: MIN_TILE_SIZE,
            max_tile_size: MAX_TILE_SIZE,
            zoom_step: ZOOM_STEP,
            vertical_ratio: VERTICAL_RATIO,
            height_scale: HEIGHT_SCALE,
            max_height: MAX_HEIGHT,
            terrain_weights: TerrainWeights::default(),
            hover_lift: 6,
            hover_bob_amplitude: 2,
            hover_bob_period_secs: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveGridSize(i32),
    NonPositiveTileSize(i32),
    InvalidZoomRange { min: i32, max: i32 },
    InitialTileSizeOutOfRange { initial: i32, min: i32, max: i32 },
    NonPositiveZoomStep(i32),
    NonPositiveVerticalRatio(i32),
    EmptyViewport { width: i32, height: i32 },
    NonPositiveMaxHeight(i32),
    NoTerrainWeights,
    NonPositiveBobPeriod(f32),
    GridSizeMismatch { configured: i32, actual: i32 },
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveGridSize(size) => {
                write!(f, "grid size must be positive, got {size}")
            }
            ConfigError::NonPositiveTileSize(size) => {
                write!(f, "tile size must be positive, got {size}")
            }
            ConfigError::InvalidZoomRange { min, max } => {
                write!(f, "minimum tile size {min} exceeds maximum {max}")
            }
            ConfigError::InitialTileSizeOutOfRange { initial, min, max } => {
                write!(f, "initial tile size {initial} outside [{min}, {max}]")
            }
            ConfigError::NonPositiveZoomStep(step) => {
                write!(f, "zoom step must be positive, got {step}")
            }
            ConfigError::NonPositiveVerticalRatio(ratio) => {
                write!(f, "vertical ratio must be positive, got {ratio}")
            }
            ConfigError::EmptyViewport { width, height } => {
                write!(f, "viewport must have positive size, got {width}x{height}")
            }
            ConfigError::NonPositiveMaxHeight(height) => {
                write!(f, "max height must be positive, got {height}")
            }
            ConfigError::NoTerrainWeights => f.write_str("at least one terrain weight must be set"),
            ConfigError::NonPositiveBobPeriod(period) => {
                write!(f, "hover bob period must be positive, got {period}")
            }
            ConfigError::GridSizeMismatch { configured, actual } => {
                write!(f, "configured grid size {configured} but grid has size {actual}")
            }
            ConfigError::Parse(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl ViewConfig {
    /// Parses a possibly partial JSON document; missing fields keep their defaults.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: ViewConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size <= 0 {
            return Err(ConfigError::NonPositiveGridSize(self.grid_size));
        }
        if self.min_tile_size <= 0 {
            return Err(ConfigError::NonPositiveTileSize(self.min_tile_size));
        }
        if self.min_tile_size > self.max_tile_size {
            return Err(ConfigError::InvalidZoomRange {
                min: self.min_tile_size,
                max: self.max_tile_size,
            });
        }
        if !(self.min_tile_size..=self.max_tile_size).contains(&self.initial_tile_size) {
            return Err(ConfigError::InitialTileSizeOutOfRange {
                initial: self.initial_tile_size,
                min: self.min_tile_size,
                max: self.max_tile_size,
            });
        }
        if self.zoom_step <= 0 {
            return Err(ConfigError::NonPositiveZoomStep(self.zoom_step));
        }
        if self.vertical_ratio <= 0 {
            return Err(ConfigError::NonPositiveVerticalRatio(self.vertical_ratio));
        }
        if self.viewport.width <= 0 || self.viewport.height <= 0 {
            return Err(ConfigError::EmptyViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.max_height <= 0 {
            return Err(ConfigError::NonPositiveMaxHeight(self.max_height));
        }
        if self.terrain_weights.total() == 0 {
            return Err(ConfigError::NoTerrainWeights);
        }
        if !(self.hover_bob_period_secs > 0.0) {
            return Err(ConfigError::NonPositiveBobPeriod(self.hover_bob_period_secs));
        }
        Ok(())
    }

    pub fn zoom(&self) -> Zoom {
        Zoom::new(
            self.initial_tile_size,
            self.min_tile_size,
            self.max_tile_size,
            self.zoom_step,
        )
    }

    pub fn projection(&self) -> Projection {
        Projection::new(self.viewport, self.vertical_ratio, self.height_scale)
    }

    pub fn distribution(&self) -> TerrainDistribution {
        TerrainDistribution::new(self.terrain_weights, self.max_height)
    }

    pub fn hover_lift(&self) -> HoverLift {
        HoverLift::new(
            self.hover_lift,
            self.hover_bob_amplitude,
            self.hover_bob_period_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ViewConfig::default().validate(), Ok(()));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ViewConfig::from_json(r#"{ "grid_size": 4, "seed": 9 }"#).unwrap();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.seed, 9);
        assert_eq!(config.initial_tile_size, DEFAULT_TILE_SIZE);
        assert_eq!(config.viewport, Viewport::new(1280, 720));
    }

    #[test]
    fn rejects_non_positive_grid_size() {
        let config = ViewConfig {
            grid_size: 0,
            ..ViewConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveGridSize(0)));
    }

    #[test]
    fn rejects_non_positive_tile_size() {
        let config = ViewConfig {
            min_tile_size: -16,
            ..ViewConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NonPositiveTileSize(-16)));
    }

    #[test]
    fn rejects_initial_size_outside_zoom_range() {
        let config = ViewConfig {
            initial_tile_size: 512,
            ..ViewConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InitialTileSizeOutOfRange { initial: 512, .. })
        ));
    }

    #[test]
    fn rejects_non_positive_vertical_ratio() {
        for ratio in [0, -7] {
            let config = ViewConfig {
                vertical_ratio: ratio,
                ..ViewConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::NonPositiveVerticalRatio(ratio))
            );
        }
    }

    #[test]
    fn rejects_empty_weights() {
        let config = ViewConfig {
            terrain_weights: TerrainWeights {
                grass: 0,
                dirt: 0,
                rocky: 0,
                water: 0,
            },
            ..ViewConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoTerrainWeights));
    }

    #[test]
    fn parse_errors_are_reported() {
        let err = ViewConfig::from_json("{ grid_size: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("invalid config"));
    }

    #[test]
    fn json_values_are_validated() {
        assert_eq!(
            ViewConfig::from_json(r#"{ "zoom_step": 0 }"#),
            Err(ConfigError::NonPositiveZoomStep(0))
        );
    }
}

pub mod camera;
pub mod config;
pub mod coordinates;
pub mod input;
pub mod picking;
pub mod projection;
pub mod render;
pub mod screen_cache;
pub mod terrain;
pub mod tile;
pub mod view;
pub mod worldgen;

pub use camera::{Camera, PanDirection, Zoom, ZoomDirection};
pub use config::{ConfigError, MAX_TILE_SIZE, MIN_TILE_SIZE, ViewConfig};
pub use coordinates::{GridCoord, ScreenPoint, ScreenRect, Viewport};
pub use input::InputEvent;
pub use picking::pick;
pub use projection::Projection;
pub use render::{HoverLift, RenderStats, RenderSurface};
pub use screen_cache::TileScreenCache;
pub use terrain::TerrainType;
pub use tile::{GridError, Tile, TileGrid};
pub use view::{HudSnapshot, TerrainView};
pub use worldgen::{TerrainDistribution, TerrainWeights, generate, generate_seeded};

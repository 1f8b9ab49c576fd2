use crate::camera::Camera;
use crate::coordinates::ScreenRect;
use crate::projection::Projection;
use crate::tile::{Tile, TileGrid};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    camera: Camera,
    tile_size: i32,
    projection: Projection,
}

/// Screen rectangle of every tile, indexed like the tile grid.
///
/// Rendering and picking both read from here so that what is drawn and what is
/// pickable can never disagree.
#[derive(Debug, Clone, Default)]
pub struct TileScreenCache {
    rects: Vec<ScreenRect>,
    key: Option<CacheKey>,
    rebuilds: u64,
}

impl TileScreenCache {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rects: Vec::with_capacity(capacity),
            key: None,
            rebuilds: 0,
        }
    }

    pub fn rebuild(
        &mut self,
        tiles: &[Tile],
        camera: Camera,
        tile_size: i32,
        projection: &Projection,
    ) {
        self.rects.clear();
        self.rects.extend(
            tiles
                .iter()
                .map(|tile| projection.sprite_rect(tile, camera, tile_size)),
        );
        self.key = Some(CacheKey {
            camera,
            tile_size,
            projection: *projection,
        });
        self.rebuilds += 1;
        debug!(
            tiles = tiles.len(),
            camera_x = camera.x,
            camera_y = camera.y,
            tile_size,
            "rebuilt tile screen cache"
        );
    }

    /// Rebuilds only when the inputs differ from the last rebuild. Returns whether it rebuilt.
    pub fn refresh(
        &mut self,
        grid: &TileGrid,
        camera: Camera,
        tile_size: i32,
        projection: &Projection,
    ) -> bool {
        if self.is_current(grid.len(), camera, tile_size, projection) {
            return false;
        }
        self.rebuild(grid.tiles(), camera, tile_size, projection);
        true
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    pub fn is_valid(&self) -> bool {
        self.key.is_some()
    }

    pub fn is_current(
        &self,
        tile_count: usize,
        camera: Camera,
        tile_size: i32,
        projection: &Projection,
    ) -> bool {
        self.rects.len() == tile_count
            && self.key
                == Some(CacheKey {
                    camera,
                    tile_size,
                    projection: *projection,
                })
    }

    pub fn rect(&self, index: usize) -> Option<ScreenRect> {
        if !self.is_valid() {
            return None;
        }
        self.rects.get(index).copied()
    }

    pub fn rects(&self) -> &[ScreenRect] {
        if self.is_valid() { &self.rects } else { &[] }
    }

    pub fn tile_size(&self) -> Option<i32> {
        self.key.map(|key| key.tile_size)
    }

    /// Unsaturated x of tile (0, 0) under the inputs of the last rebuild.
    pub fn origin_x(&self) -> Option<i64> {
        self.key
            .map(|key| key.projection.origin_x(key.camera, key.tile_size))
    }

    pub fn len(&self) -> usize {
        self.rects().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn rebuild_count(&self) -> u64 {
        self.rebuilds
    }
}

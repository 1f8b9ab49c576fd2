use crate::camera::Camera;
use crate::coordinates::{GridCoord, ScreenPoint, ScreenRect, Viewport};
use crate::tile::Tile;

/// Fixed parameters of the grid-to-screen transform.
///
/// ```text
/// iso_x = (gx - gy) * tile_size / 2
/// iso_y = (gx + gy) * tile_size / vertical_ratio - height * height_scale
/// sx    = viewport.width / 2 + iso_x - camera.x * tile_size
/// sy    = iso_y - camera.y * tile_size
/// ```
///
/// Divisions floor. Intermediate math is 64-bit and the result saturates into `i32`.
/// `vertical_ratio` must be positive; [`ViewConfig::validate`](crate::ViewConfig::validate)
/// rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projection {
    pub viewport: Viewport,
    pub vertical_ratio: i32,
    pub height_scale: i32,
}

impl Projection {
    pub fn new(viewport: Viewport, vertical_ratio: i32, height_scale: i32) -> Self {
        Self {
            viewport,
            vertical_ratio,
            height_scale,
        }
    }

    pub fn project(
        &self,
        position: GridCoord,
        height: i32,
        camera: Camera,
        tile_size: i32,
    ) -> ScreenPoint {
        let (gx, gy) = (position.x as i64, position.y as i64);
        let size = tile_size as i64;
        let ratio = self.vertical_ratio as i64;

        let iso_x = ((gx - gy) * size).div_euclid(2);
        let iso_y = ((gx + gy) * size).div_euclid(ratio) - height as i64 * self.height_scale as i64;

        let sx = self.origin_x(camera, tile_size) + iso_x;
        let sy = iso_y - camera.y as i64 * size;

        ScreenPoint::new(saturate(sx), saturate(sy))
    }

    /// Unsaturated screen x of tile (0, 0) before any height lift.
    ///
    /// Every tile on diagonal `d = gx - gy` starts at `origin_x + floor(d * tile_size / 2)`.
    pub fn origin_x(&self, camera: Camera, tile_size: i32) -> i64 {
        self.viewport.center_x() as i64 - camera.x as i64 * tile_size as i64
    }

    pub fn sprite_rect(&self, tile: &Tile, camera: Camera, tile_size: i32) -> ScreenRect {
        let origin = self.project(tile.position, tile.height, camera, tile_size);
        ScreenRect::new(
            origin.x,
            origin.y,
            sprite_width(tile_size),
            sprite_height(tile_size),
        )
    }
}

pub fn sprite_width(tile_size: i32) -> i32 {
    tile_size
}

/// Half the width, keeping the 2:1 diamond aspect.
pub fn sprite_height(tile_size: i32) -> i32 {
    tile_size / 2
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

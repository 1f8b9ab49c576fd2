use crate::coordinates::{GridCoord, ScreenRect, Viewport};
use crate::screen_cache::TileScreenCache;
use crate::terrain::TerrainType;
use crate::tile::TileGrid;
use std::f32::consts::TAU;

/// Drawing target supplied by the host.
pub trait RenderSurface {
    fn clear(&mut self);

    /// Sprite resources load independently of the render loop; checked every frame.
    fn sprite_ready(&self, terrain: TerrainType) -> bool;

    fn draw_sprite(&mut self, terrain: TerrainType, rect: ScreenRect);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub drawn: usize,
    pub skipped_not_ready: usize,
    pub culled: usize,
}

/// Vertical lift applied to the hovered tile, optionally bobbing over time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverLift {
    pub lift: i32,
    pub amplitude: i32,
    pub period_secs: f32,
}

impl HoverLift {
    pub fn new(lift: i32, amplitude: i32, period_secs: f32) -> Self {
        Self {
            lift,
            amplitude,
            period_secs,
        }
    }

    pub fn offset_at(&self, time_secs: f64) -> i32 {
        if self.amplitude == 0 || !(self.period_secs > 0.0) {
            return self.lift;
        }
        let phase = (time_secs.rem_euclid(self.period_secs as f64) / self.period_secs as f64) as f32;
        let bob = (phase * TAU).sin() * self.amplitude as f32;
        self.lift + bob.round() as i32
    }
}

/// Paints tiles in ascending `(gy, gx)` order so later tiles cover earlier ones.
///
/// The hovered tile is drawn `hover_offset` pixels higher than its cached rectangle.
pub fn render(
    grid: &TileGrid,
    cache: &TileScreenCache,
    hovered: Option<GridCoord>,
    hover_offset: i32,
    viewport: Viewport,
    surface: &mut impl RenderSurface,
) -> RenderStats {
    let mut stats = RenderStats::default();
    surface.clear();

    for (tile, rect) in grid.tiles().iter().zip(cache.rects()) {
        let rect = if hovered == Some(tile.position) {
            rect.offset_y(-hover_offset)
        } else {
            *rect
        };

        if !rect.intersects_viewport(viewport) {
            stats.culled += 1;
            continue;
        }

        if !surface.sprite_ready(tile.terrain) {
            stats.skipped_not_ready += 1;
            continue;
        }

        surface.draw_sprite(tile.terrain, rect);
        stats.drawn += 1;
    }

    stats
}

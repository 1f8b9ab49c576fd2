use crate::camera::{Camera, PanDirection, Zoom, ZoomDirection};
use crate::config::{ConfigError, ViewConfig};
use crate::coordinates::{GridCoord, ScreenPoint, ScreenRect, Viewport};
use crate::input::InputEvent;
use crate::picking;
use crate::projection::Projection;
use crate::render::{self, HoverLift, RenderStats, RenderSurface};
use crate::screen_cache::TileScreenCache;
use crate::terrain::TerrainType;
use crate::tile::{Tile, TileGrid};
use crate::worldgen::generate;
use fastrand::Rng;
use serde::Serialize;
use tracing::{info, warn};

/// Advisory state for a host HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudSnapshot {
    pub hovered: Option<GridCoord>,
    pub hovered_terrain: Option<TerrainType>,
    pub hovered_height: Option<i32>,
    pub cursor: Option<ScreenPoint>,
    pub camera: Camera,
    pub tile_size: i32,
}

/// Single owner of the terrain, camera, zoom, screen cache and hover state.
///
/// State changes only invalidate the screen cache; it is rebuilt lazily by the
/// next pick or render.
pub struct TerrainView {
    projection: Projection,
    grid: TileGrid,
    camera: Camera,
    zoom: Zoom,
    cache: TileScreenCache,
    hover_lift: HoverLift,
    hovered: Option<GridCoord>,
    cursor: Option<ScreenPoint>,
    needs_redraw: bool,
}

impl TerrainView {
    pub fn new(config: &ViewConfig) -> Result<Self, ConfigError> {
        let mut rng = Rng::with_seed(config.seed);
        Self::with_rng(config, &mut rng)
    }

    pub fn with_rng(config: &ViewConfig, rng: &mut Rng) -> Result<Self, ConfigError> {
        validate(config)?;
        let grid = generate(config.grid_size, &config.distribution(), rng)
            .map_err(|_| ConfigError::NonPositiveGridSize(config.grid_size))?;
        Self::with_grid(config, grid)
    }

    pub fn with_grid(config: &ViewConfig, grid: TileGrid) -> Result<Self, ConfigError> {
        validate(config)?;
        if grid.size() != config.grid_size {
            return Err(ConfigError::GridSizeMismatch {
                configured: config.grid_size,
                actual: grid.size(),
            });
        }

        info!(
            grid_size = grid.size(),
            viewport_width = config.viewport.width,
            viewport_height = config.viewport.height,
            tile_size = config.initial_tile_size,
            "terrain view ready"
        );

        Ok(Self {
            projection: config.projection(),
            cache: TileScreenCache::with_capacity(grid.len()),
            grid,
            camera: Camera::default(),
            zoom: config.zoom(),
            hover_lift: config.hover_lift(),
            hovered: None,
            cursor: None,
            needs_redraw: true,
        })
    }

    /// Returns whether the event changed camera, zoom or hover state.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Pan { direction } => self.pan(direction),
            InputEvent::Zoom { direction } => self.zoom(direction),
            InputEvent::PointerMoved { position } => self.pointer_moved(position),
            InputEvent::PointerLeft => self.pointer_left(),
        }
    }

    pub fn pan(&mut self, direction: PanDirection) -> bool {
        self.camera.pan(direction);
        self.view_changed();
        true
    }

    pub fn zoom(&mut self, direction: ZoomDirection) -> bool {
        if !self.zoom.apply(direction) {
            return false;
        }
        self.view_changed();
        true
    }

    pub fn pointer_moved(&mut self, position: ScreenPoint) -> bool {
        if !self.projection.viewport.contains(position) {
            return self.pointer_left();
        }

        self.cursor = Some(position);
        let hovered = self.resolve_hover(position);
        self.set_hovered(hovered)
    }

    pub fn pointer_left(&mut self) -> bool {
        self.cursor = None;
        self.set_hovered(None)
    }

    pub fn refresh_cache(&mut self) -> bool {
        self.cache.refresh(
            &self.grid,
            self.camera,
            self.zoom.tile_size(),
            &self.projection,
        )
    }

    pub fn pick(&mut self, position: ScreenPoint) -> Option<&Tile> {
        self.refresh_cache();
        picking::pick(position, &self.grid, &self.cache, self.projection.viewport)
    }

    pub fn render(&mut self, surface: &mut impl RenderSurface, time_secs: f64) -> RenderStats {
        self.refresh_cache();
        let offset = self.hover_lift.offset_at(time_secs);
        render::render(
            &self.grid,
            &self.cache,
            self.hovered,
            offset,
            self.projection.viewport,
            surface,
        )
    }

    /// Consumes the pending redraw request; any number of changes since the last call yield one.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn screen_rect(&mut self, coord: GridCoord) -> Option<ScreenRect> {
        let index = self.grid.index_of(coord)?;
        self.refresh_cache();
        self.cache.rect(index)
    }

    pub fn hud(&self) -> HudSnapshot {
        let hovered_tile = self.hovered_tile();
        HudSnapshot {
            hovered: self.hovered,
            hovered_terrain: hovered_tile.map(|tile| tile.terrain),
            hovered_height: hovered_tile.map(|tile| tile.height),
            cursor: self.cursor,
            camera: self.camera,
            tile_size: self.zoom.tile_size(),
        }
    }

    pub fn hovered(&self) -> Option<GridCoord> {
        self.hovered
    }

    pub fn hovered_tile(&self) -> Option<&Tile> {
        self.hovered.and_then(|coord| self.grid.tile_at(coord))
    }

    pub fn cursor(&self) -> Option<ScreenPoint> {
        self.cursor
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn tile_size(&self) -> i32 {
        self.zoom.tile_size()
    }

    pub fn viewport(&self) -> Viewport {
        self.projection.viewport
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tile_at(&self, coord: GridCoord) -> Option<&Tile> {
        self.grid.tile_at(coord)
    }

    pub fn cache(&self) -> &TileScreenCache {
        &self.cache
    }

    fn view_changed(&mut self) {
        self.cache.invalidate();
        self.needs_redraw = true;
        if let Some(cursor) = self.cursor {
            self.hovered = self.resolve_hover(cursor);
        }
    }

    fn resolve_hover(&mut self, position: ScreenPoint) -> Option<GridCoord> {
        self.pick(position).map(|tile| tile.position)
    }

    fn set_hovered(&mut self, hovered: Option<GridCoord>) -> bool {
        if self.hovered == hovered {
            return false;
        }
        self.hovered = hovered;
        self.needs_redraw = true;
        true
    }
}

fn validate(config: &ViewConfig) -> Result<(), ConfigError> {
    config.validate().inspect_err(|err| {
        warn!(error = %err, "rejected view configuration");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingSurface {
        draws: Vec<(TerrainType, ScreenRect)>,
    }

    impl RenderSurface for CountingSurface {
        fn clear(&mut self) {
            self.draws.clear();
        }

        fn sprite_ready(&self, _terrain: TerrainType) -> bool {
            true
        }

        fn draw_sprite(&mut self, terrain: TerrainType, rect: ScreenRect) {
            self.draws.push((terrain, rect));
        }
    }

    fn small_config() -> ViewConfig {
        ViewConfig {
            grid_size: 4,
            initial_tile_size: 64,
            vertical_ratio: 7,
            ..ViewConfig::default()
        }
    }

    fn flat_view() -> TerrainView {
        let config = small_config();
        let grid = TileGrid::from_fn(config.grid_size, |_| (TerrainType::Grass, 0)).unwrap();
        TerrainView::with_grid(&config, grid).unwrap()
    }

    #[test]
    fn scenario_projection_matches_reference_points() {
        let mut view = flat_view();
        assert_eq!(
            view.screen_rect(GridCoord::new(0, 0)),
            Some(ScreenRect::new(640, 0, 64, 32))
        );
        assert_eq!(
            view.screen_rect(GridCoord::new(1, 1)),
            Some(ScreenRect::new(640, 18, 64, 32))
        );
    }

    #[test]
    fn hover_follows_pointer_and_clears_off_viewport() {
        let mut view = flat_view();
        assert!(view.handle(InputEvent::pointer(640, 0)));
        assert_eq!(view.hovered(), Some(GridCoord::new(0, 0)));
        assert_eq!(view.cursor(), Some(ScreenPoint::new(640, 0)));

        assert!(view.handle(InputEvent::pointer(-20, 300)));
        assert_eq!(view.hovered(), None);
        assert_eq!(view.cursor(), None);
    }

    #[test]
    fn pointer_left_clears_hover() {
        let mut view = flat_view();
        view.handle(InputEvent::pointer(640, 0));
        assert!(view.handle(InputEvent::PointerLeft));
        assert_eq!(view.hud().hovered, None);
        assert!(!view.handle(InputEvent::PointerLeft));
    }

    #[test]
    fn panning_re_resolves_hover_under_stationary_cursor() {
        let mut view = flat_view();
        view.handle(InputEvent::pointer(640, 0));
        assert_eq!(view.hovered(), Some(GridCoord::new(0, 0)));

        view.handle(InputEvent::pan(PanDirection::Left));
        // The whole grid shifted right by one tile size.
        let expected = view.pick(ScreenPoint::new(640, 0)).map(|tile| tile.position);
        assert_eq!(view.hovered(), expected);
        assert_ne!(view.hovered(), Some(GridCoord::new(0, 0)));
    }

    #[test]
    fn pan_round_trip_restores_camera_and_rects() {
        let mut view = flat_view();
        view.refresh_cache();
        let original = view.cache().rects().to_vec();

        for _ in 0..3 {
            view.handle(InputEvent::pan(PanDirection::Right));
        }
        for _ in 0..3 {
            view.handle(InputEvent::pan(PanDirection::Left));
        }

        assert_eq!(view.camera(), Camera::default());
        view.refresh_cache();
        assert_eq!(view.cache().rects(), original.as_slice());
    }

    #[test]
    fn repeated_zoom_out_holds_minimum() {
        let mut view = flat_view();
        for _ in 0..50 {
            view.handle(InputEvent::zoom(ZoomDirection::Out));
        }
        assert_eq!(view.tile_size(), small_config().min_tile_size);
        assert!(!view.handle(InputEvent::zoom(ZoomDirection::Out)));
    }

    #[test]
    fn changes_coalesce_into_one_redraw() {
        let mut view = flat_view();
        assert!(view.take_redraw());
        assert!(!view.take_redraw());

        view.handle(InputEvent::pan(PanDirection::Up));
        view.handle(InputEvent::zoom(ZoomDirection::In));
        view.handle(InputEvent::pan(PanDirection::Down));
        assert!(view.take_redraw());
        assert!(!view.take_redraw());
    }

    #[test]
    fn cache_rebuilds_lazily_once_per_change_batch() {
        let mut view = flat_view();
        let mut surface = CountingSurface::default();
        view.render(&mut surface, 0.0);
        assert_eq!(view.cache().rebuild_count(), 1);

        view.render(&mut surface, 0.1);
        assert_eq!(view.cache().rebuild_count(), 1);

        view.handle(InputEvent::pan(PanDirection::Right));
        view.handle(InputEvent::pan(PanDirection::Right));
        assert_eq!(view.cache().rebuild_count(), 1);
        view.render(&mut surface, 0.2);
        assert_eq!(view.cache().rebuild_count(), 2);
    }

    #[test]
    fn render_lifts_hovered_tile() {
        let mut config = small_config();
        config.hover_bob_amplitude = 0;
        let grid = TileGrid::from_fn(config.grid_size, |_| (TerrainType::Dirt, 0)).unwrap();
        let mut view = TerrainView::with_grid(&config, grid).unwrap();
        view.handle(InputEvent::pointer(640, 0));

        let mut surface = CountingSurface::default();
        let stats = view.render(&mut surface, 0.0);
        assert_eq!(stats.drawn, 16);
        assert_eq!(surface.draws[0].1, ScreenRect::new(640, -config.hover_lift, 64, 32));
    }

    #[test]
    fn hud_reports_hovered_tile_details() {
        let mut view = flat_view();
        view.handle(InputEvent::pointer(650, 20));
        let hud = view.hud();
        assert_eq!(hud.hovered, Some(GridCoord::new(1, 1)));
        assert_eq!(hud.hovered_terrain, Some(TerrainType::Grass));
        assert_eq!(hud.hovered_height, Some(0));
        assert_eq!(hud.cursor, Some(ScreenPoint::new(650, 20)));
        assert_eq!(hud.tile_size, 64);
    }

    #[test]
    fn seeded_views_generate_identical_terrain() {
        let config = ViewConfig {
            grid_size: 16,
            ..ViewConfig::default()
        };
        let first = TerrainView::new(&config).unwrap();
        let second = TerrainView::new(&config).unwrap();
        assert_eq!(first.grid(), second.grid());
        assert_eq!(first.grid().len(), 256);
    }

    #[test]
    fn default_view_holds_full_grid() {
        let view = TerrainView::new(&ViewConfig::default()).unwrap();
        assert_eq!(view.grid().len(), 128 * 128);
        assert!(view.tile_at(GridCoord::new(127, 127)).is_some());
        assert!(view.tile_at(GridCoord::new(128, 0)).is_none());
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = ViewConfig {
            grid_size: -1,
            ..ViewConfig::default()
        };
        assert!(matches!(
            TerrainView::new(&config),
            Err(ConfigError::NonPositiveGridSize(-1))
        ));

        let grid = TileGrid::from_fn(3, |_| (TerrainType::Grass, 0)).unwrap();
        assert!(matches!(
            TerrainView::with_grid(&small_config(), grid),
            Err(ConfigError::GridSizeMismatch {
                configured: 4,
                actual: 3
            })
        ));
    }
}

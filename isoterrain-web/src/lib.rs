#[cfg(feature = "generated-atlas")]
use iso_gen_sprites::generator::build_sprite_atlas;
use iso_gen_sprites::layout;
use isoterrain_core::{
    HudSnapshot, InputEvent, PanDirection, RenderSurface, ScreenPoint, ScreenRect, TerrainType,
    TerrainView, ViewConfig, ZoomDirection,
};
#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;
use std::collections::HashMap;
use std::ptr;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Mutex, OnceLock};

const WINDOW_TITLE: &str = "Isometric Terrain Viewer";
const SPRITE_ATLAS_PATH: &str = "assets/terrain.png";
#[cfg(not(target_arch = "wasm32"))]
const CONFIG_ENV_VAR: &str = "ISOTERRAIN_CONFIG";
const BACKGROUND: Color = Color::from_rgba(20, 23, 31, 255);
const HUD_FONT_SIZE: f32 = 24.0;
const HUD_LINE_HEIGHT: f32 = 26.0;

static PENDING_PAN_X: AtomicI32 = AtomicI32::new(0);
static PENDING_PAN_Y: AtomicI32 = AtomicI32::new(0);
static PENDING_ZOOM: AtomicI32 = AtomicI32::new(0);
static PENDING_POINTER_LEFT: AtomicBool = AtomicBool::new(false);

#[derive(Default)]
struct HudUi {
    hovered: Option<(i32, i32)>,
    cursor: Option<(i32, i32)>,
    json: String,
}

fn hud_ui() -> &'static Mutex<HudUi> {
    static HUD_UI: OnceLock<Mutex<HudUi>> = OnceLock::new();
    HUD_UI.get_or_init(|| Mutex::new(HudUi::default()))
}

#[unsafe(no_mangle)]
pub extern "C" fn pan_camera_up() {
    queue_pan(0, -1);
}

#[unsafe(no_mangle)]
pub extern "C" fn pan_camera_down() {
    queue_pan(0, 1);
}

#[unsafe(no_mangle)]
pub extern "C" fn pan_camera_left() {
    queue_pan(-1, 0);
}

#[unsafe(no_mangle)]
pub extern "C" fn pan_camera_right() {
    queue_pan(1, 0);
}

/// Called by the host page when the cursor leaves the canvas; macroquad keeps
/// reporting the last in-window position.
#[unsafe(no_mangle)]
pub extern "C" fn pointer_left() {
    PENDING_POINTER_LEFT.store(true, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn zoom_in() {
    log_ui_action("zoom in");
    PENDING_ZOOM.fetch_add(1, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn zoom_out() {
    log_ui_action("zoom out");
    PENDING_ZOOM.fetch_sub(1, Ordering::SeqCst);
}

#[unsafe(no_mangle)]
pub extern "C" fn hovered_tile_present() -> i32 {
    let ui = hud_ui().lock().unwrap();
    if ui.hovered.is_some() { 1 } else { 0 }
}

#[unsafe(no_mangle)]
pub extern "C" fn hovered_tile_x() -> i32 {
    let ui = hud_ui().lock().unwrap();
    ui.hovered.map_or(-1, |(x, _)| x)
}

#[unsafe(no_mangle)]
pub extern "C" fn hovered_tile_y() -> i32 {
    let ui = hud_ui().lock().unwrap();
    ui.hovered.map_or(-1, |(_, y)| y)
}

#[unsafe(no_mangle)]
pub extern "C" fn cursor_present() -> i32 {
    let ui = hud_ui().lock().unwrap();
    if ui.cursor.is_some() { 1 } else { 0 }
}

#[unsafe(no_mangle)]
pub extern "C" fn cursor_x() -> i32 {
    let ui = hud_ui().lock().unwrap();
    ui.cursor.map_or(0, |(x, _)| x)
}

#[unsafe(no_mangle)]
pub extern "C" fn cursor_y() -> i32 {
    let ui = hud_ui().lock().unwrap();
    ui.cursor.map_or(0, |(_, y)| y)
}

#[unsafe(no_mangle)]
pub extern "C" fn hud_json_ptr() -> *const u8 {
    let ui = hud_ui().lock().unwrap();
    if ui.json.is_empty() {
        ptr::null()
    } else {
        ui.json.as_ptr()
    }
}

#[unsafe(no_mangle)]
pub extern "C" fn hud_json_len() -> usize {
    let ui = hud_ui().lock().unwrap();
    ui.json.len()
}

fn queue_pan(dx: i32, dy: i32) {
    PENDING_PAN_X.fetch_add(dx, Ordering::SeqCst);
    PENDING_PAN_Y.fetch_add(dy, Ordering::SeqCst);
}

fn take_pending_events() -> Vec<InputEvent> {
    let dx = PENDING_PAN_X.swap(0, Ordering::SeqCst);
    let dy = PENDING_PAN_Y.swap(0, Ordering::SeqCst);
    let zoom = PENDING_ZOOM.swap(0, Ordering::SeqCst);
    let left = PENDING_POINTER_LEFT.swap(false, Ordering::SeqCst);
    let mut events = pan_events_for_delta(dx, dy);
    events.extend(zoom_events_for_delta(zoom));
    events.extend(pointer_left_event(left));
    events
}

fn pointer_left_event(left: bool) -> Option<InputEvent> {
    left.then_some(InputEvent::PointerLeft)
}

fn log_ui_action(label: &str) {
    #[cfg(target_arch = "wasm32")]
    miniquad::info!("{}", label);
    #[cfg(not(target_arch = "wasm32"))]
    tracing::info!("{}", label);
}

/// One unit-step pan event per unit of queued delta.
fn pan_events_for_delta(dx: i32, dy: i32) -> Vec<InputEvent> {
    let horizontal = if dx < 0 {
        PanDirection::Left
    } else {
        PanDirection::Right
    };
    let vertical = if dy < 0 {
        PanDirection::Up
    } else {
        PanDirection::Down
    };

    std::iter::repeat_n(InputEvent::pan(horizontal), dx.unsigned_abs() as usize)
        .chain(std::iter::repeat_n(
            InputEvent::pan(vertical),
            dy.unsigned_abs() as usize,
        ))
        .collect()
}

fn zoom_events_for_delta(delta: i32) -> Vec<InputEvent> {
    let direction = if delta < 0 {
        ZoomDirection::Out
    } else {
        ZoomDirection::In
    };
    vec![InputEvent::zoom(direction); delta.unsigned_abs() as usize]
}

fn key_event(key: KeyCode) -> Option<InputEvent> {
    match key {
        KeyCode::Up | KeyCode::W => Some(InputEvent::pan(PanDirection::Up)),
        KeyCode::Down | KeyCode::S => Some(InputEvent::pan(PanDirection::Down)),
        KeyCode::Left | KeyCode::A => Some(InputEvent::pan(PanDirection::Left)),
        KeyCode::Right | KeyCode::D => Some(InputEvent::pan(PanDirection::Right)),
        KeyCode::Equal | KeyCode::KpAdd => Some(InputEvent::zoom(ZoomDirection::In)),
        KeyCode::Minus | KeyCode::KpSubtract => Some(InputEvent::zoom(ZoomDirection::Out)),
        _ => None,
    }
}

const BOUND_KEYS: [KeyCode; 12] = [
    KeyCode::Up,
    KeyCode::W,
    KeyCode::Down,
    KeyCode::S,
    KeyCode::Left,
    KeyCode::A,
    KeyCode::Right,
    KeyCode::D,
    KeyCode::Equal,
    KeyCode::KpAdd,
    KeyCode::Minus,
    KeyCode::KpSubtract,
];

fn sprite_region(terrain: TerrainType) -> Rect {
    let (x, y) = layout::sprite_position(terrain).pixel_origin();
    Rect::new(
        x as f32,
        y as f32,
        layout::SPRITE_PIXEL_WIDTH as f32,
        layout::SPRITE_PIXEL_HEIGHT as f32,
    )
}

struct SpriteAtlas {
    texture: Option<Texture2D>,
    regions: HashMap<TerrainType, Rect>,
}

impl SpriteAtlas {
    async fn load_from_assets() -> Self {
        let texture = match load_image(SPRITE_ATLAS_PATH).await {
            Ok(image) => Some(Texture2D::from_image(&image)),
            Err(err) => {
                tracing::warn!(
                    path = SPRITE_ATLAS_PATH,
                    error = %err,
                    "sprite atlas missing, using generated fallback"
                );
                Self::generated_texture()
            }
        };

        if let Some(texture) = &texture {
            texture.set_filter(FilterMode::Linear);
        }

        let regions = layout::TERRAIN_SPRITES
            .iter()
            .map(|&terrain| (terrain, sprite_region(terrain)))
            .collect();

        Self { texture, regions }
    }

    #[cfg(feature = "generated-atlas")]
    fn generated_texture() -> Option<Texture2D> {
        let atlas = build_sprite_atlas();
        let (width, height) = atlas.dimensions();
        let width = u16::try_from(width).ok()?;
        let height = u16::try_from(height).ok()?;
        Some(Texture2D::from_rgba8(width, height, atlas.as_raw()))
    }

    /// Without the generator every terrain stays not-ready and is skipped.
    #[cfg(not(feature = "generated-atlas"))]
    fn generated_texture() -> Option<Texture2D> {
        None
    }

    fn is_ready(&self, terrain: TerrainType) -> bool {
        self.texture.is_some() && self.regions.contains_key(&terrain)
    }

    fn source_rect(&self, terrain: TerrainType) -> Option<Rect> {
        self.regions.get(&terrain).copied()
    }
}

struct AtlasSurface<'a> {
    atlas: &'a SpriteAtlas,
}

impl RenderSurface for AtlasSurface<'_> {
    fn clear(&mut self) {
        clear_background(BACKGROUND);
    }

    fn sprite_ready(&self, terrain: TerrainType) -> bool {
        self.atlas.is_ready(terrain)
    }

    fn draw_sprite(&mut self, terrain: TerrainType, rect: ScreenRect) {
        let (Some(texture), Some(source)) =
            (self.atlas.texture.as_ref(), self.atlas.source_rect(terrain))
        else {
            return;
        };

        draw_texture_ex(
            texture,
            rect.x as f32,
            rect.y as f32,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(rect.width as f32, rect.height as f32)),
                source: Some(source),
                ..Default::default()
            },
        );
    }
}

pub struct GameState {
    view: TerrainView,
    atlas: SpriteAtlas,
    last_pointer: Option<ScreenPoint>,
    fps: f32,
    fps_frame_count: u32,
    fps_last_update_time: f64,
}

impl GameState {
    pub async fn new(view: TerrainView) -> Self {
        let atlas = SpriteAtlas::load_from_assets().await;
        let mut game = Self {
            view,
            atlas,
            last_pointer: None,
            fps: 0.0,
            fps_frame_count: 0,
            fps_last_update_time: get_time(),
        };
        game.sync_hud_ui();
        game
    }

    fn collect_events(&mut self) -> Vec<InputEvent> {
        let mut events: Vec<InputEvent> = BOUND_KEYS
            .iter()
            .filter(|&&key| is_key_pressed(key))
            .filter_map(|&key| key_event(key))
            .collect();

        let (mouse_x, mouse_y) = mouse_position();
        let pointer = ScreenPoint::from_f32(mouse_x, mouse_y);
        if self.last_pointer != Some(pointer) {
            self.last_pointer = Some(pointer);
            events.push(InputEvent::PointerMoved { position: pointer });
        }

        // Queued host events go last so a leave in the same frame wins over the stale position.
        events.extend(take_pending_events());
        events
    }

    fn apply_events(&mut self, events: &[InputEvent]) {
        for &event in events {
            self.view.handle(event);
        }

        // Cursor moves within one tile change the HUD without a redraw.
        if self.view.take_redraw() || !events.is_empty() {
            self.sync_hud_ui();
        }
    }

    fn update_fps_if_due(&mut self) {
        let now = get_time();
        self.fps_frame_count += 1;
        let elapsed = now - self.fps_last_update_time;
        if elapsed >= 1.0 {
            self.fps = self.fps_frame_count as f32 / elapsed as f32;
            self.fps_frame_count = 0;
            self.fps_last_update_time = now;
        }
    }

    fn render(&mut self) {
        let mut surface = AtlasSurface { atlas: &self.atlas };
        let stats = self.view.render(&mut surface, get_time());
        self.draw_hud(stats.drawn);
    }

    fn draw_hud(&self, drawn: usize) {
        let hud = self.view.hud();
        let hovered = match (hud.hovered, hud.hovered_terrain, hud.hovered_height) {
            (Some(coord), Some(terrain), Some(height)) => format!(
                "tile: {}, {} ({}, height {})",
                coord.x,
                coord.y,
                terrain.key(),
                height
            ),
            _ => "tile: none".to_string(),
        };
        let cursor = hud.cursor.map_or_else(
            || "cursor: outside".to_string(),
            |point| format!("cursor: {}, {}", point.x, point.y),
        );
        let camera = format!(
            "camera: {}, {}  tile size: {}  drawn: {}  fps: {:.0}",
            hud.camera.x, hud.camera.y, hud.tile_size, drawn, self.fps
        );

        for (line, text) in [hovered, cursor, camera].iter().enumerate() {
            draw_text(
                text,
                20.0,
                40.0 + line as f32 * HUD_LINE_HEIGHT,
                HUD_FONT_SIZE,
                WHITE,
            );
        }
    }

    fn sync_hud_ui(&self) {
        let hud = self.view.hud();
        let mut ui = hud_ui().lock().unwrap();
        ui.hovered = hud.hovered.map(|coord| (coord.x, coord.y));
        ui.cursor = hud.cursor.map(|point| (point.x, point.y));
        ui.json = hud_json(&hud);
    }
}

fn hud_json(hud: &HudSnapshot) -> String {
    serde_json::to_string(hud).unwrap_or_default()
}

pub fn load_config() -> ViewConfig {
    config_from_env().unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn config_from_env() -> Option<ViewConfig> {
    let path = std::env::var(CONFIG_ENV_VAR).ok()?;
    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|source| ViewConfig::from_json(&source).map_err(|err| err.to_string()));

    match parsed {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(path = %path, error = %err, "falling back to default config");
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn config_from_env() -> Option<ViewConfig> {
    None
}

pub fn window_conf() -> Conf {
    let config = load_config();
    Conf {
        window_title: WINDOW_TITLE.to_string(),
        window_width: config.viewport.width,
        window_height: config.viewport.height,
        window_resizable: false,
        ..Default::default()
    }
}

pub async fn run() {
    install_panic_hook();
    init_tracing();

    let config = load_config();
    let view = match TerrainView::new(&config) {
        Ok(view) => view,
        Err(err) => {
            tracing::error!(error = %err, "cannot start terrain view");
            return;
        }
    };
    let mut game = GameState::new(view).await;

    loop {
        let events = game.collect_events();
        game.apply_events(&events);
        game.update_fps_if_due();

        // The surface is double buffered, so every frame repaints; the cache only rebuilds on change.
        game.render();

        next_frame().await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

#[cfg(target_arch = "wasm32")]
fn init_tracing() {}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}

#[cfg(test)]
mod tests {
    use super::*;
    use isoterrain_core::{Camera, GridCoord};

    #[test]
    fn arrow_and_zoom_keys_decode_to_events() {
        assert_eq!(
            key_event(KeyCode::Left),
            Some(InputEvent::pan(PanDirection::Left))
        );
        assert_eq!(
            key_event(KeyCode::Equal),
            Some(InputEvent::zoom(ZoomDirection::In))
        );
        assert_eq!(
            key_event(KeyCode::Minus),
            Some(InputEvent::zoom(ZoomDirection::Out))
        );
        assert_eq!(key_event(KeyCode::Space), None);
    }

    #[test]
    fn every_bound_key_decodes() {
        assert!(BOUND_KEYS.iter().all(|&key| key_event(key).is_some()));
    }

    #[test]
    fn queued_pan_delta_expands_to_unit_steps() {
        let events = pan_events_for_delta(-2, 1);
        assert_eq!(
            events,
            vec![
                InputEvent::pan(PanDirection::Left),
                InputEvent::pan(PanDirection::Left),
                InputEvent::pan(PanDirection::Down),
            ]
        );
        assert!(pan_events_for_delta(0, 0).is_empty());
    }

    #[test]
    fn queued_pointer_leave_becomes_event() {
        assert_eq!(pointer_left_event(true), Some(InputEvent::PointerLeft));
        assert_eq!(pointer_left_event(false), None);
    }

    #[test]
    fn queued_pointer_leave_clears_hover() {
        let config = ViewConfig {
            grid_size: 4,
            ..ViewConfig::default()
        };
        let mut view = TerrainView::new(&config).unwrap();
        view.handle(InputEvent::pointer(640, 4));
        assert!(view.hovered().is_some());

        for event in pointer_left_event(true) {
            assert!(view.handle(event));
        }
        assert_eq!(view.hovered(), None);
        assert_eq!(view.cursor(), None);
    }

    #[test]
    fn queued_zoom_delta_expands_to_steps() {
        assert_eq!(
            zoom_events_for_delta(-2),
            vec![InputEvent::zoom(ZoomDirection::Out); 2]
        );
        assert!(zoom_events_for_delta(0).is_empty());
    }

    #[test]
    fn sprite_regions_follow_atlas_layout() {
        let region = sprite_region(TerrainType::Rocky);
        let (x, y) = layout::sprite_position(TerrainType::Rocky).pixel_origin();
        assert_eq!(region, Rect::new(x as f32, y as f32, 64.0, 32.0));
    }

    #[test]
    fn hud_json_reports_hovered_tile() {
        let hud = HudSnapshot {
            hovered: Some(GridCoord::new(3, 4)),
            hovered_terrain: Some(TerrainType::Water),
            hovered_height: Some(1),
            cursor: Some(ScreenPoint::new(10, 20)),
            camera: Camera::default(),
            tile_size: 64,
        };
        let json: serde_json::Value = serde_json::from_str(&hud_json(&hud)).unwrap();
        assert_eq!(json["hovered"]["x"], 3);
        assert_eq!(json["hovered_terrain"], "water");
        assert_eq!(json["tile_size"], 64);
    }
}

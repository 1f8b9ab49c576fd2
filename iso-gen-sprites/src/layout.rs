use isoterrain_core::TerrainType;

pub const SPRITE_PIXEL_WIDTH: u32 = 64;
pub const SPRITE_PIXEL_HEIGHT: u32 = SPRITE_PIXEL_WIDTH / 2;
pub const ATLAS_COLUMNS: u32 = 2;

pub const TERRAIN_SPRITES: [TerrainType; 4] = TerrainType::ALL;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpritePosition {
    pub column: u32,
    pub row: u32,
}

impl SpritePosition {
    pub fn pixel_origin(self) -> (u32, u32) {
        (
            self.column * SPRITE_PIXEL_WIDTH,
            self.row * SPRITE_PIXEL_HEIGHT,
        )
    }
}

pub fn sprite_index(terrain: TerrainType) -> u32 {
    terrain.index() as u32
}

pub const fn sprite_count() -> u32 {
    TERRAIN_SPRITES.len() as u32
}

pub const fn atlas_grid_size() -> (u32, u32) {
    let columns = ATLAS_COLUMNS;
    let rows = (sprite_count() + columns - 1) / columns;
    (columns, rows)
}

pub const fn atlas_pixel_size() -> (u32, u32) {
    let (columns, rows) = atlas_grid_size();
    (columns * SPRITE_PIXEL_WIDTH, rows * SPRITE_PIXEL_HEIGHT)
}

pub fn sprite_position(terrain: TerrainType) -> SpritePosition {
    sprite_position_for_index(sprite_index(terrain))
}

pub fn sprite_position_for_index(index: u32) -> SpritePosition {
    SpritePosition {
        column: index % ATLAS_COLUMNS,
        row: index / ATLAS_COLUMNS,
    }
}

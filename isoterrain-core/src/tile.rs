use crate::coordinates::GridCoord;
use crate::terrain::TerrainType;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: GridCoord,
    pub terrain: TerrainType,
    pub height: i32,
}

impl Tile {
    pub fn new(position: GridCoord, terrain: TerrainType, height: i32) -> Self {
        Self {
            position,
            terrain,
            height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    NonPositiveSize(i32),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::NonPositiveSize(size) => write!(f, "grid size must be positive, got {size}"),
        }
    }
}

impl Error for GridError {}

/// Square tile grid stored in ascending `(gy, gx)` order; index = `gy * size + gx`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    size: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn from_fn(
        size: i32,
        mut tile_for: impl FnMut(GridCoord) -> (TerrainType, i32),
    ) -> Result<Self, GridError> {
        if size <= 0 {
            return Err(GridError::NonPositiveSize(size));
        }

        let mut tiles = Vec::with_capacity((size as usize) * (size as usize));
        for y in 0..size {
            for x in 0..size {
                let position = GridCoord::new(x, y);
                let (terrain, height) = tile_for(position);
                tiles.push(Tile::new(position, terrain, height));
            }
        }

        Ok(Self { size, tiles })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, coord: GridCoord) -> bool {
        (0..self.size).contains(&coord.x) && (0..self.size).contains(&coord.y)
    }

    pub fn index_of(&self, coord: GridCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.x as usize + coord.y as usize * self.size as usize)
    }

    pub fn tile_at(&self, coord: GridCoord) -> Option<&Tile> {
        self.index_of(coord).map(|index| &self.tiles[index])
    }

    /// Indices of every tile with `gx - gy == diagonal`, in ascending `gy` order.
    pub fn diagonal_indices(&self, diagonal: i32) -> impl Iterator<Item = usize> + '_ {
        let start_y = (-diagonal).max(0);
        let end_y = (self.size - diagonal).min(self.size);
        let size = self.size as usize;
        (start_y..end_y.max(start_y)).map(move |y| (y + diagonal) as usize + y as usize * size)
    }
}

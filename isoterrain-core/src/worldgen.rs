use fastrand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::terrain::TerrainType;
use crate::tile::{GridError, TileGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainWeights {
    pub grass: u32,
    pub dirt: u32,
    pub rocky: u32,
    pub water: u32,
}

impl TerrainWeights {
    pub fn weight(&self, terrain: TerrainType) -> u32 {
        match terrain {
            TerrainType::Grass => self.grass,
            TerrainType::Dirt => self.dirt,
            TerrainType::Rocky => self.rocky,
            TerrainType::Water => self.water,
        }
    }

    pub fn total(&self) -> u32 {
        TerrainType::ALL
            .iter()
            .map(|&terrain| self.weight(terrain))
            .fold(0u32, u32::saturating_add)
    }
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            grass: 6,
            dirt: 2,
            rocky: 1,
            water: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainDistribution {
    pub weights: TerrainWeights,
    pub max_height: i32,
}

impl TerrainDistribution {
    pub fn new(weights: TerrainWeights, max_height: i32) -> Self {
        Self {
            weights,
            max_height,
        }
    }

    pub fn sample_terrain(&self, rng: &mut Rng) -> TerrainType {
        let total = self.weights.total();
        if total == 0 {
            return TerrainType::Grass;
        }

        let mut roll = rng.u32(0..total);
        for terrain in TerrainType::ALL {
            let weight = self.weights.weight(terrain);
            if roll < weight {
                return terrain;
            }
            roll -= weight;
        }
        TerrainType::Grass
    }

    pub fn sample_height(&self, rng: &mut Rng) -> i32 {
        if self.max_height <= 0 {
            return 0;
        }
        rng.i32(0..self.max_height)
    }
}

impl Default for TerrainDistribution {
    fn default() -> Self {
        Self::new(TerrainWeights::default(), crate::config::MAX_HEIGHT)
    }
}

/// Draws every tile independently from `distribution`, in ascending `(gy, gx)` order.
pub fn generate(
    grid_size: i32,
    distribution: &TerrainDistribution,
    rng: &mut Rng,
) -> Result<TileGrid, GridError> {
    let grid = TileGrid::from_fn(grid_size, |_| {
        let terrain = distribution.sample_terrain(rng);
        let height = distribution.sample_height(rng);
        (terrain, height)
    })?;
    info!(grid_size, tiles = grid.len(), "generated terrain");
    Ok(grid)
}

pub fn generate_seeded(
    grid_size: i32,
    seed: u64,
    distribution: &TerrainDistribution,
) -> Result<TileGrid, GridError> {
    let mut rng = Rng::with_seed(seed);
    generate(grid_size, distribution, &mut rng)
}

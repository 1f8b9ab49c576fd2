use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerrainType {
    Grass,
    Dirt,
    Rocky,
    Water,
}

impl TerrainType {
    pub const ALL: [TerrainType; 4] = [
        TerrainType::Grass,
        TerrainType::Dirt,
        TerrainType::Rocky,
        TerrainType::Water,
    ];

    /// Stable key used to resolve the sprite resource for this terrain.
    pub fn key(self) -> &'static str {
        match self {
            TerrainType::Grass => "grass",
            TerrainType::Dirt => "dirt",
            TerrainType::Rocky => "rocky",
            TerrainType::Water => "water",
        }
    }

    pub fn index(self) -> usize {
        match self {
            TerrainType::Grass => 0,
            TerrainType::Dirt => 1,
            TerrainType::Rocky => 2,
            TerrainType::Water => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_declaration_order() {
        for (expected, terrain) in TerrainType::ALL.iter().enumerate() {
            assert_eq!(terrain.index(), expected);
        }
    }

    #[test]
    fn serializes_as_snake_case_key() {
        let json = serde_json::to_string(&TerrainType::Rocky).unwrap();
        assert_eq!(json, "\"rocky\"");
    }
}

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pan offset in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Camera {
    pub x: i32,
    pub y: i32,
}

impl Camera {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn pan(&mut self, direction: PanDirection) {
        let (dx, dy) = direction.delta();
        self.x = self.x.saturating_add(dx);
        self.y = self.y.saturating_add(dy);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

impl PanDirection {
    pub fn delta(self) -> (i32, i32) {
        match self {
            PanDirection::Up => (0, -1),
            PanDirection::Down => (0, 1),
            PanDirection::Left => (-1, 0),
            PanDirection::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            PanDirection::Up => PanDirection::Down,
            PanDirection::Down => PanDirection::Up,
            PanDirection::Left => PanDirection::Right,
            PanDirection::Right => PanDirection::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoomDirection {
    In,
    Out,
}

/// Sprite width in pixels, stepped and clamped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zoom {
    tile_size: i32,
    min: i32,
    max: i32,
    step: i32,
}

impl Zoom {
    pub fn new(initial: i32, min: i32, max: i32, step: i32) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        Self {
            tile_size: initial.clamp(min, max),
            min,
            max,
            step: step.max(1),
        }
    }

    pub fn tile_size(&self) -> i32 {
        self.tile_size
    }

    /// Returns whether the tile size changed.
    pub fn apply(&mut self, direction: ZoomDirection) -> bool {
        let requested = match direction {
            ZoomDirection::In => self.tile_size.saturating_add(self.step),
            ZoomDirection::Out => self.tile_size.saturating_sub(self.step),
        };
        let next = requested.clamp(self.min, self.max);

        if next != requested {
            debug!(requested, clamped = next, "zoom clamped");
        }

        if next == self.tile_size {
            return false;
        }

        self.tile_size = next;
        true
    }
}

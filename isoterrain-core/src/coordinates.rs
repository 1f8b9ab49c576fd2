use serde::{Deserialize, Serialize};

/// Grid cell position. `x` is `gx`, `y` is `gy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Ordering key for overlap resolution: later draws win, ties go to the larger `gx`.
    pub fn draw_order_key(self) -> (i32, i32) {
        (self.x + self.y, self.x)
    }

    /// Index of the isometric diagonal the cell sits on; constant screen-x band per diagonal.
    pub fn diagonal(self) -> i32 {
        self.x - self.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncates a float pointer position towards negative infinity.
    pub fn from_f32(x: f32, y: f32) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
        }
    }
}

/// Integer pixel rectangle, half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        let (px, py) = (point.x as i64, point.y as i64);
        let (x, y) = (self.x as i64, self.y as i64);
        px >= x && px < x + self.width as i64 && py >= y && py < y + self.height as i64
    }

    pub fn offset_y(&self, dy: i32) -> Self {
        Self {
            y: self.y.saturating_add(dy),
            ..*self
        }
    }

    pub fn intersects_viewport(&self, viewport: Viewport) -> bool {
        let (x, y) = (self.x as i64, self.y as i64);
        x + (self.width as i64) > 0
            && y + (self.height as i64) > 0
            && x < viewport.width as i64
            && y < viewport.height as i64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0..self.width).contains(&point.x) && (0..self.height).contains(&point.y)
    }

    pub fn center_x(&self) -> i32 {
        self.width.div_euclid(2)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = ScreenRect::new(10, 20, 64, 32);
        assert!(rect.contains(ScreenPoint::new(10, 20)));
        assert!(rect.contains(ScreenPoint::new(73, 51)));
        assert!(!rect.contains(ScreenPoint::new(74, 20)));
        assert!(!rect.contains(ScreenPoint::new(10, 52)));
        assert!(!rect.contains(ScreenPoint::new(9, 20)));
    }

    #[test]
    fn rect_contains_handles_extreme_points() {
        let rect = ScreenRect::new(i32::MAX - 4, 0, 64, 32);
        assert!(rect.contains(ScreenPoint::new(i32::MAX, 0)));
        assert!(!rect.contains(ScreenPoint::new(i32::MIN, i32::MIN)));
    }

    #[test]
    fn viewport_rejects_points_on_far_edges() {
        let viewport = Viewport::new(1280, 720);
        assert!(viewport.contains(ScreenPoint::new(0, 0)));
        assert!(viewport.contains(ScreenPoint::new(1279, 719)));
        assert!(!viewport.contains(ScreenPoint::new(1280, 0)));
        assert!(!viewport.contains(ScreenPoint::new(0, -1)));
    }

    #[test]
    fn viewport_intersection_excludes_fully_outside_rects() {
        let viewport = Viewport::new(100, 100);
        assert!(ScreenRect::new(-63, 0, 64, 32).intersects_viewport(viewport));
        assert!(!ScreenRect::new(-64, 0, 64, 32).intersects_viewport(viewport));
        assert!(!ScreenRect::new(0, 100, 64, 32).intersects_viewport(viewport));
    }

    #[test]
    fn pointer_positions_floor_towards_negative() {
        assert_eq!(ScreenPoint::from_f32(-0.5, 3.9), ScreenPoint::new(-1, 3));
    }

    #[test]
    fn draw_order_key_prefers_sum_then_gx() {
        assert!(GridCoord::new(1, 1).draw_order_key() > GridCoord::new(0, 1).draw_order_key());
        assert!(GridCoord::new(2, 0).draw_order_key() > GridCoord::new(1, 1).draw_order_key());
    }
}

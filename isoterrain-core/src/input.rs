use crate::camera::{PanDirection, ZoomDirection};
use crate::coordinates::ScreenPoint;
use serde::{Deserialize, Serialize};

/// Logical input already decoded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Pan { direction: PanDirection },
    Zoom { direction: ZoomDirection },
    /// Position relative to the viewport origin; may lie outside it.
    PointerMoved { position: ScreenPoint },
    PointerLeft,
}

impl InputEvent {
    pub fn pan(direction: PanDirection) -> Self {
        InputEvent::Pan { direction }
    }

    pub fn zoom(direction: ZoomDirection) -> Self {
        InputEvent::Zoom { direction }
    }

    pub fn pointer(x: i32, y: i32) -> Self {
        InputEvent::PointerMoved {
            position: ScreenPoint::new(x, y),
        }
    }
}

use crate::coordinates::{ScreenPoint, Viewport};
use crate::screen_cache::TileScreenCache;
use crate::tile::{Tile, TileGrid};

/// Returns the topmost tile whose cached rectangle contains `cursor`.
///
/// Overlaps resolve by draw order: the greatest `gx + gy` wins, ties go to the
/// greater `gx`. Every tile on one grid diagonal (`gx - gy` constant) shares a
/// horizontal span, so only the diagonals whose span can reach `cursor.x` are
/// tested.
pub fn pick<'a>(
    cursor: ScreenPoint,
    grid: &'a TileGrid,
    cache: &TileScreenCache,
    viewport: Viewport,
) -> Option<&'a Tile> {
    if !viewport.contains(cursor) {
        return None;
    }
    if grid.is_empty() || cache.len() != grid.len() {
        return None;
    }

    let tile_size = cache.tile_size()? as i64;
    if tile_size <= 0 {
        return None;
    }

    // Diagonal d starts at origin + d * size / 2. The cached rects saturate, so the
    // origin comes from the projection inputs rather than tile (0, 0)'s rect.
    let base_x = cache.origin_x()?;
    let relative = cursor.x as i64 - base_x;
    let band = (2 * relative).div_euclid(tile_size);

    let last_diagonal = (grid.size() - 1) as i64;
    let first = (band - 2).max(-last_diagonal);
    let last = (band + 1).min(last_diagonal);
    if first > last {
        return None;
    }

    let mut best: Option<&Tile> = None;
    for diagonal in first..=last {
        for index in grid.diagonal_indices(diagonal as i32) {
            let Some(rect) = cache.rect(index) else {
                continue;
            };
            if !rect.contains(cursor) {
                continue;
            }

            let candidate = &grid.tiles()[index];
            let replace = best.map_or(true, |current| {
                candidate.position.draw_order_key() > current.position.draw_order_key()
            });
            if replace {
                best = Some(candidate);
            }
        }
    }

    best
}

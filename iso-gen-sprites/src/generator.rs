use image::{GenericImage, Rgba, RgbaImage};
use isoterrain_core::TerrainType;

use crate::layout;

const AA_SAMPLES_PER_AXIS: u32 = 4;
const AA_SAMPLE_COUNT: u32 = AA_SAMPLES_PER_AXIS * AA_SAMPLES_PER_AXIS;

// Cube geometry inside one sprite cell, in sprite pixels.
const TOP_CENTER_Y: f32 = 10.0;
const TOP_HALF_HEIGHT: f32 = 10.0;
const SIDE_DEPTH: f32 = 12.0;
const OUTLINE_BAND: f32 = 0.06;

#[derive(Clone, Copy)]
struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

fn color_from_rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
    Color {
        r: r as f32 / 255.0,
        g: g as f32 / 255.0,
        b: b as f32 / 255.0,
        a: a as f32 / 255.0,
    }
}

fn palette_color(terrain: TerrainType) -> Color {
    match terrain {
        TerrainType::Grass => color_from_rgba(92, 158, 70, 255),
        TerrainType::Dirt => color_from_rgba(143, 99, 63, 255),
        TerrainType::Rocky => color_from_rgba(120, 120, 120, 255),
        TerrainType::Water => color_from_rgba(58, 110, 190, 255),
    }
}

fn apply_saturation_and_brightness(color: Color, saturation: f32, brightness: f32) -> Color {
    let intensity = (color.r + color.g + color.b) / 3.0;
    let adjust = |channel: f32| -> f32 {
        let saturated = intensity + (channel - intensity) * saturation;
        (saturated * brightness).clamp(0.0, 1.0)
    };

    Color {
        r: adjust(color.r),
        g: adjust(color.g),
        b: adjust(color.b),
        a: color.a,
    }
}

fn left_face_tint(color: Color) -> Color {
    apply_saturation_and_brightness(color, 1.1, 0.72)
}

fn right_face_tint(color: Color) -> Color {
    apply_saturation_and_brightness(color, 1.15, 0.52)
}

fn outline_tint(color: Color) -> Color {
    apply_saturation_and_brightness(color, 0.8, 0.35)
}

#[derive(Clone, Copy)]
struct CubeShades {
    top: Color,
    outline: Color,
    left: Color,
    right: Color,
}

impl CubeShades {
    fn for_terrain(terrain: TerrainType) -> Self {
        let base = palette_color(terrain);
        Self {
            top: base,
            outline: outline_tint(base),
            left: left_face_tint(base),
            right: right_face_tint(base),
        }
    }
}

fn sample_color(shades: &CubeShades, x: f32, y: f32) -> Option<Color> {
    let half_width = layout::SPRITE_PIXEL_WIDTH as f32 * 0.5;
    let dx = (x - half_width).abs() / half_width;
    let dy = (y - TOP_CENTER_Y).abs() / TOP_HALF_HEIGHT;
    let diamond = dx + dy;

    if diamond <= 1.0 {
        if diamond >= 1.0 - OUTLINE_BAND {
            return Some(shades.outline);
        }
        return Some(shades.top);
    }

    // Lower diamond edge at this column; the side faces hang below it.
    let edge_y = TOP_CENTER_Y + TOP_HALF_HEIGHT * (1.0 - dx);
    if dx > 1.0 || y < edge_y || y > edge_y + SIDE_DEPTH {
        return None;
    }

    if x < half_width {
        Some(shades.left)
    } else {
        Some(shades.right)
    }
}

fn render_cube(terrain: TerrainType) -> RgbaImage {
    let width = layout::SPRITE_PIXEL_WIDTH;
    let height = layout::SPRITE_PIXEL_HEIGHT;
    let shades = CubeShades::for_terrain(terrain);
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let samples_per_axis = AA_SAMPLES_PER_AXIS as f32;
    let inv_sample_count = 1.0 / AA_SAMPLE_COUNT as f32;

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0.0f32; 4];
            let mut has_coverage = false;

            for sy in 0..AA_SAMPLES_PER_AXIS {
                for sx in 0..AA_SAMPLES_PER_AXIS {
                    let sample_x = x as f32 + (sx as f32 + 0.5) / samples_per_axis;
                    let sample_y = y as f32 + (sy as f32 + 0.5) / samples_per_axis;

                    if let Some(color) = sample_color(&shades, sample_x, sample_y) {
                        has_coverage = true;
                        sum[0] += color.r;
                        sum[1] += color.g;
                        sum[2] += color.b;
                        sum[3] += color.a;
                    }
                }
            }

            if has_coverage {
                let to_u8 = |channel: f32| -> u8 {
                    (channel * inv_sample_count * 255.0).round().clamp(0.0, 255.0) as u8
                };
                let pixel = Rgba([
                    to_u8(sum[0]),
                    to_u8(sum[1]),
                    to_u8(sum[2]),
                    to_u8(sum[3]),
                ]);

                image.put_pixel(x, y, pixel);
            }
        }
    }

    image
}

/// One shaded isometric cube per terrain type, laid out by [`layout::sprite_position`].
pub fn build_sprite_atlas() -> RgbaImage {
    let (width_px, height_px) = layout::atlas_pixel_size();
    let mut atlas = RgbaImage::from_pixel(width_px, height_px, Rgba([0, 0, 0, 0]));

    for terrain in layout::TERRAIN_SPRITES {
        let sprite = render_cube(terrain);
        let (offset_x, offset_y) = layout::sprite_position(terrain).pixel_origin();
        atlas
            .copy_from(&sprite, offset_x, offset_y)
            .expect("sprite cell should always fit inside the atlas");
    }

    atlas
}

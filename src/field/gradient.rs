use super::noise::hash12;
use super::{AnchorPalette, BlendMode, Rgb, mix3};

// Share of the blend-mode result in the final mix for every mode except Smooth.
pub const BLEND_MERGE_WEIGHT: f32 = 0.85;

const GRAIN_KEY: [f32; 2] = [12.9898, 78.233];
const GRAIN_AMOUNT: f32 = 0.02;
const WAVE_TINT: f32 = 0.08;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeColors {
    pub top: Rgb,
    pub bottom: Rgb,
    pub left: Rgb,
    pub right: Rgb,
}

pub fn edge_colors(p: [f32; 2], palette: &AnchorPalette) -> EdgeColors {
    let [c1, c2, c3, c4, c5, c6, c7, c8] = palette.colors;
    let [x, y] = p;

    let (top, bottom) = if x < 0.5 {
        (mix3(c1, c5, x * 2.0), mix3(c4, c7, x * 2.0))
    } else {
        let k = (x - 0.5) * 2.0;
        (mix3(c5, c2, k), mix3(c7, c3, k))
    };
    let (left, right) = if y < 0.5 {
        (mix3(c1, c8, y * 2.0), mix3(c2, c6, y * 2.0))
    } else {
        let k = (y - 0.5) * 2.0;
        (mix3(c8, c4, k), mix3(c6, c3, k))
    };

    EdgeColors {
        top,
        bottom,
        left,
        right,
    }
}

pub fn blend(a: Rgb, b: Rgb, mode: BlendMode) -> Rgb {
    match mode {
        BlendMode::Smooth => mix3(a, b, 0.5),
        BlendMode::Multiply => [a[0] * b[0], a[1] * b[1], a[2] * b[2]],
        BlendMode::Screen => [
            1.0 - (1.0 - a[0]) * (1.0 - b[0]),
            1.0 - (1.0 - a[1]) * (1.0 - b[1]),
            1.0 - (1.0 - a[2]) * (1.0 - b[2]),
        ],
        BlendMode::Overlay => [
            overlay(a[0], b[0]),
            overlay(a[1], b[1]),
            overlay(a[2], b[2]),
        ],
    }
}

#[inline]
fn overlay(a: f32, b: f32) -> f32 {
    if a < 0.5 {
        2.0 * a * b
    } else {
        1.0 - 2.0 * (1.0 - a) * (1.0 - b)
    }
}

pub fn composite(sample: [f32; 2], wave: f32, palette: &AnchorPalette, mode: BlendMode) -> Rgb {
    let edges = edge_colors(sample, palette);
    let [x, y] = sample;

    let horizontal = mix3(edges.top, edges.bottom, y);
    let vertical = mix3(edges.left, edges.right, x);
    let gradient = mix3(horizontal, vertical, 0.5);

    let mut color = match mode {
        BlendMode::Smooth => gradient,
        _ => mix3(gradient, blend(edges.top, edges.bottom, mode), BLEND_MERGE_WEIGHT),
    };

    let grain = hash12(sample, GRAIN_KEY) * GRAIN_AMOUNT;
    color = [color[0] + grain, color[1] + grain, color[2] + grain];

    let avg = palette.average();
    let lift = (wave * 2.0).sin() * 0.1;
    let tint = [
        (avg[0] + lift).clamp(0.0, 1.0),
        (avg[1] + lift).clamp(0.0, 1.0),
        (avg[2] + lift).clamp(0.0, 1.0),
    ];
    mix3(color, tint, WAVE_TINT)
}

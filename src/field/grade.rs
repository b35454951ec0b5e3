use super::{Grade, Rgb, clamp01, mix};

const LUMA: [f32; 3] = [0.299, 0.587, 0.114];

pub fn apply_grade(color: Rgb, grade: Grade) -> Rgb {
    let c = color.map(|v| (v + grade.brightness - 0.5) * grade.contrast + 0.5);
    let luma = c[0] * LUMA[0] + c[1] * LUMA[1] + c[2] * LUMA[2];
    clamp01(c.map(|v| mix(luma, v, grade.saturation)))
}

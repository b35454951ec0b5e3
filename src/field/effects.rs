use std::f32::consts::TAU;

use super::noise::{fract, fractal_noise, hash12};
use super::tone::tone_map;
use super::{Effect, GlassDirection, ParameterSet, Rgb, Viewport, mix, mix3, smoothstep};

const GRAIN_FPS: f32 = 24.0;
const FILM_NOISE_CAP: f32 = 0.2;
const BLOOM_LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];
const BLOOM_THRESHOLD: f32 = 0.2;

// Coordinate-space stage that runs before the field is distorted. Only the
// fluted glass, lens and pixelation effects move the query point.
pub fn warp_coordinate(uv: [f32; 2], viewport: Viewport, params: &ParameterSet) -> [f32; 2] {
    let mut uv = uv;
    if params.effect == Effect::FlutedGlass {
        uv = glass_warp(uv, params);
    }
    match params.effect {
        Effect::LensDistortion => {
            let [x, y] = lens_warp(uv, params.fx.lens_distortion);
            [x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)]
        }
        Effect::Pixelation => pixelate(uv, viewport, params.fx.pixel_size),
        _ => uv,
    }
}

fn glass_warp(uv: [f32; 2], params: &ParameterSet) -> [f32; 2] {
    let glass = params.fx.glass;
    let slices = glass.frequency * 0.8;
    let amp = 0.015 * glass.distortion;
    let shift = |v: f32| {
        let p = fract(v * slices);
        v + amp * (p * TAU).sin() * (1.0 - 0.5 * (p - 0.5).abs())
    };
    match glass.direction {
        GlassDirection::Vertical => [shift(uv[0]), uv[1]],
        GlassDirection::Horizontal => [uv[0], shift(uv[1])],
    }
}

// Positive k bulges outward (barrel), negative pinches (pincushion).
fn lens_warp(uv: [f32; 2], k: f32) -> [f32; 2] {
    let off = [uv[0] - 0.5, uv[1] - 0.5];
    let factor = 1.0 + k * (off[0] * off[0] + off[1] * off[1]);
    [0.5 + off[0] * factor, 0.5 + off[1] * factor]
}

fn pixelate(uv: [f32; 2], viewport: Viewport, size: f32) -> [f32; 2] {
    if size <= 1.0 {
        return uv;
    }
    let cx = viewport.width / size;
    let cy = viewport.height / size;
    [(uv[0] * cx).floor() / cx, (uv[1] * cy).floor() / cy]
}

pub fn apply_effect(color: Rgb, uv: [f32; 2], t: f32, params: &ParameterSet) -> Rgb {
    let fx = &params.fx;
    match params.effect {
        Effect::None | Effect::LensDistortion | Effect::Pixelation => color,
        Effect::FilmNoise => film_noise(color, uv, t, params.wave_speed, fx.film_noise),
        Effect::ToneMapping => tone_map(color, fx.tone_curve),
        Effect::ChromaticAberration => {
            let k = fx.chromatic_aberration * 50.0;
            [
                mix(color[0], color[0] * 0.9, k),
                color[1],
                mix(color[2], color[2] * 0.9, k),
            ]
        }
        Effect::Bloom => bloom(color, fx.bloom),
        Effect::TrailBlur => trail(color, uv, t, fx.trail_blur),
        Effect::Watercolor => watercolor(color, uv, t, fx.watercolor),
        Effect::FlutedGlass => glass_banding(color, uv, params),
    }
}

// Grain advances at a fixed 24 steps per wall-clock second whatever the
// animation speed, so the animated time is divided back out.
fn film_noise(color: Rgb, uv: [f32; 2], t: f32, speed: f32, intensity: f32) -> Rgb {
    let base = [uv[0] * 1000.0, uv[1] * 1000.0];
    let step = (t / speed.max(0.001) * GRAIN_FPS).floor();
    let shifted = |k: f32, m: f32| [base[0] * k + step * m, base[1] * k + step * m];

    let j1 = hash12(shifted(1.0, 0.123), [78.233, 127.1]);
    let j2 = hash12(shifted(1.0, 0.456), [183.3, 269.5]);
    let jc = [base[0] + j1 * 2.0, base[1] + j2 * 2.0];
    let sample = |k: f32, m: f32, key: [f32; 2]| {
        hash12([jc[0] * k + step * m, jc[1] * k + step * m], key)
    };

    let r1 = sample(1.0, 1.0, [127.1, 311.7]);
    let r2 = sample(1.3, 2.7, [269.5, 183.3]);
    let r3 = sample(0.7, 4.3, [419.2, 371.9]);
    let r4 = sample(1.7, 6.1, [521.7, 241.3]);

    let noise = ((r1 + r2 + r3 + r4) * 0.25 - 0.5) * (0.8 + j1 * 0.4);
    let n = noise * intensity.min(FILM_NOISE_CAP);
    [color[0] + n, color[1] + n, color[2] + n]
}

fn bloom(color: Rgb, intensity: f32) -> Rgb {
    let lum = color[0] * BLOOM_LUMA[0] + color[1] * BLOOM_LUMA[1] + color[2] * BLOOM_LUMA[2];
    let bright = (lum - BLOOM_THRESHOLD).max(0.0);
    if bright == 0.0 {
        return color;
    }
    let gain = 1.0 + bright * 2.0 + bright * bright * 4.0;
    mix3(color, color.map(|v| v * gain), intensity)
}

fn trail(color: Rgb, uv: [f32; 2], t: f32, intensity: f32) -> Rgb {
    if intensity <= 0.0 {
        return color;
    }
    let g1 = 0.8 + 0.2 * (t + uv[0] * 10.0).sin();
    let g2 = 0.9 + 0.1 * (t * 0.7 + uv[1] * 15.0).cos();
    let c = mix3(color, color.map(|v| v * g1), intensity * 0.3);
    mix3(c, color.map(|v| v * g2), intensity * 0.2)
}

fn watercolor(color: Rgb, uv: [f32; 2], t: f32, i: f32) -> Rgb {
    if i <= 0.0 {
        return color;
    }
    let layer = |offset: [f32; 2], drift: f32, freq: f32, speed: f32| {
        let p = [uv[0] + offset[0] * i * drift, uv[1] + offset[1] * i * drift];
        fractal_noise([p[0] * freq + t * speed, p[1] * freq + t * speed])
    };
    let b1 = layer(
        [(t * 0.3 + uv[1] * 4.0).sin(), (t * 0.2 + uv[0] * 3.0).cos()],
        0.03,
        8.0,
        0.15,
    );
    let b2 = layer(
        [(t * 0.5 + uv[0] * 6.0).cos(), (t * 0.4 + uv[1] * 5.0).sin()],
        0.02,
        12.0,
        0.1,
    );
    let b3 = layer(
        [(t * 0.7 + uv[0] * 8.0).sin(), (t * 0.6 + uv[1] * 7.0).cos()],
        0.015,
        20.0,
        0.08,
    );

    // Channel shuffle; each step reads the channel already updated above it.
    let mut shuffled = color;
    shuffled[0] = mix(shuffled[0], shuffled[1], (b1 - 0.5) * i * 0.4);
    shuffled[1] = mix(shuffled[1], shuffled[2], (b2 - 0.5) * i * 0.3);
    shuffled[2] = mix(shuffled[2], shuffled[0], (b3 - 0.5) * i * 0.35);

    let shifted = [
        color[0] + (b2 - 0.5) * i * 0.25,
        color[1] + (b3 - 0.5) * i * 0.2,
        color[2] + (b1 - 0.5) * i * 0.3,
    ];

    let mut c = mix3(color, shuffled, smoothstep(0.3, 0.7, b1) * i * 0.6);
    c = mix3(c, shifted, smoothstep(0.4, 0.8, b2) * i * 0.4);

    let paper = fractal_noise([uv[0] * 150.0 + t * 0.05, uv[1] * 150.0 + t * 0.05]) * 0.03 * i;
    c = c.map(|v| v + paper * 0.5);

    let dir = [(t * 0.1).sin(), (t * 0.08).cos()];
    let len = (dir[0] * dir[0] + dir[1] * dir[1]).sqrt().max(f32::EPSILON);
    let fp = [
        uv[0] + dir[0] / len * i * 0.01,
        uv[1] + dir[1] / len * i * 0.01,
    ];
    let flow = fractal_noise([fp[0] * 25.0 + t * 0.12, fp[1] * 25.0 + t * 0.12]);
    let rotated = mix3(c, [c[1], c[2], c[0]], (flow - 0.5) * i * 0.3);
    mix3(c, rotated, smoothstep(0.4, 0.9, flow) * i * 0.5)
}

fn glass_banding(color: Rgb, uv: [f32; 2], params: &ParameterSet) -> Rgb {
    let glass = params.fx.glass;
    if glass.intensity <= 0.0 {
        return color;
    }
    let slices = glass.frequency * 0.8;
    let along = match glass.direction {
        GlassDirection::Vertical => uv[0],
        GlassDirection::Horizontal => uv[1],
    };
    let p = fract(along * slices);
    let mut band = 1.0 - (p - 0.5).abs() * 2.0;
    band = smoothstep(0.0, 1.0, band);
    band = smoothstep(0.1, 0.9, band);
    band = smoothstep(0.2, 0.8, band);

    let shade = 1.0 + (band - 0.5) * 0.06 * glass.intensity;
    let highlight = smoothstep(0.3, 0.7, band * 0.015 * glass.intensity) * 0.4;
    color.map(|v| v * shade + highlight)
}

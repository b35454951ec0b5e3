use super::effects::warp_coordinate;
use super::noise::{dot2, fractal_noise, hash11, lattice_noise};
use super::{MAX_TWIRL_SOURCES, MAX_WAVES, ParameterSet, TwirlPlacement, Viewport};

const RING: f32 = 6.28318;
const SAMPLE_MIN: f32 = 0.01;
const SAMPLE_MAX: f32 = 0.99;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Distorted {
    // Coordinate after the pre-pass warps; effects read this one.
    pub uv: [f32; 2],
    // Where the gradient is sampled, kept inside [0.01, 0.99].
    pub sample: [f32; 2],
    pub wave: f32,
}

pub fn distort(uv: [f32; 2], t: f32, viewport: Viewport, params: &ParameterSet) -> Distorted {
    let uv = warp_coordinate(uv, viewport, params);
    let aspect = viewport.aspect();
    let zoom = params.wave_zoom;

    let mut pos = [(uv[0] * 2.0 - 1.0) * aspect * zoom, (uv[1] * 2.0 - 1.0) * zoom];
    pos = apply_twirl(pos, t, aspect, params);
    pos = apply_turbulence(pos, t, params.turbulence);
    pos = apply_noise_displacement(pos, t, params.noise_displacement);

    let wave = wave_sum(pos, t, params);
    let scale = 0.08 / (1.0 + params.wave_amplitude * 0.3);
    let sample = [
        (uv[0] + wave * scale).clamp(SAMPLE_MIN, SAMPLE_MAX),
        (uv[1] + wave * scale).clamp(SAMPLE_MIN, SAMPLE_MAX),
    ];

    Distorted { uv, sample, wave }
}

pub fn twirl_center(
    i: u32,
    sources: u32,
    t: f32,
    aspect: f32,
    params: &ParameterSet,
) -> [f32; 2] {
    let fi = i as f32;
    match params.twirl_placement {
        TwirlPlacement::Center => [
            (t * (0.08 + fi * 0.02) + fi * 2.0).sin() * (0.4 + fi * 0.1),
            (t * (0.06 + fi * 0.03) + fi * 1.5).cos() * (0.5 + fi * 0.1),
        ],
        TwirlPlacement::Corners => {
            let zoom = params.wave_zoom;
            let radius = (aspect * zoom).min(zoom) * 0.9;
            if sources <= 3 {
                let angle = fi * (RING / sources.max(1) as f32) + t * 0.02;
                [angle.cos() * radius, angle.sin() * radius]
            } else {
                let base = (i % 3) as f32;
                let base_angle = base * (RING / 3.0) + t * 0.02;
                let anchor = [base_angle.cos() * radius, base_angle.sin() * radius];
                if i < 3 {
                    anchor
                } else {
                    let a = base_angle + 1.57 + fi * 0.5;
                    [anchor[0] + a.cos() * 0.3, anchor[1] + a.sin() * 0.3]
                }
            }
        }
        TwirlPlacement::Random => {
            let [sx, sy] = params.twirl_seed;
            let base = [
                (fi * 2.4 + sx + fi).cos() * 1.5,
                (fi * 1.8 + sy + fi).sin() * 1.2,
            ];
            [
                base[0] + (t * (0.06 + fi * 0.015) + fi * 3.14 + sx).sin() * (0.3 + fi * 0.1),
                base[1] + (t * (0.05 + fi * 0.02) + fi * 2.1 + sy).cos() * (0.25 + fi * 0.08),
            ]
        }
    }
}

pub fn twirl_strength(i: u32, dist: f32, params: &ParameterSet) -> f32 {
    let fi = i as f32;
    let tw = params.twirl;
    match params.twirl_placement {
        TwirlPlacement::Center => tw * (30.0 / (1.0 + fi * 0.5)),
        TwirlPlacement::Corners => tw * (1.0 / (1.0 + dist * 1.5)) * (25.0 / (1.0 + fi * 0.4)),
        TwirlPlacement::Random => {
            tw * (1.0 / (1.0 + dist * (2.0 + fi * 0.5))) * (20.0 / (1.0 + fi * 0.3))
        }
    }
}

// Sources are applied in order, each one acting on the output of the last.
pub fn apply_twirl(pos: [f32; 2], t: f32, aspect: f32, params: &ParameterSet) -> [f32; 2] {
    let sources = params.twirl_sources.min(MAX_TWIRL_SOURCES);
    if params.twirl <= 0.0 || sources == 0 {
        return pos;
    }
    (0..sources).fold(pos, |pos, i| twirl_source(pos, i, sources, t, aspect, params))
}

// One source's pull on `pos`.
pub fn twirl_source(
    pos: [f32; 2],
    i: u32,
    sources: u32,
    t: f32,
    aspect: f32,
    params: &ParameterSet,
) -> [f32; 2] {
    let fi = i as f32;
    let center = twirl_center(i, sources, t, aspect, params);
    let dist = ((pos[0] - center[0]).powi(2) + (pos[1] - center[1]).powi(2)).sqrt();
    let strength = twirl_strength(i, dist, params);

    // The center only shapes angle and falloff; rotation is about the origin.
    let angle = dist * params.twirl * (1.2 + fi * 0.2) + t * (0.03 + fi * 0.01);
    let (s, c) = (angle * (0.7 - fi * 0.08)).sin_cos();
    let rotated = [pos[0] * c - pos[1] * s, pos[0] * s + pos[1] * c];
    [
        pos[0] + (rotated[0] - pos[0]) * strength,
        pos[1] + (rotated[1] - pos[1]) * strength,
    ]
}

pub fn apply_turbulence(pos: [f32; 2], t: f32, amount: f32) -> [f32; 2] {
    if amount <= 0.0 {
        return pos;
    }
    let tp = [pos[0] * 1.5 + t * 0.05, pos[1] * 1.5 + t * 0.05];
    let tx = fractal_noise(tp) * amount;
    let ty = fractal_noise([tp[0] + 100.0, tp[1] + 50.0]) * amount;
    [pos[0] + tx * 0.8, pos[1] + ty * 0.6]
}

pub fn apply_noise_displacement(pos: [f32; 2], t: f32, amount: f32) -> [f32; 2] {
    if amount <= 0.0 {
        return pos;
    }
    let p = [pos[0] * 3.0 + t * 0.1, pos[1] * 3.0 + t * 0.1];
    [
        pos[0] + lattice_noise(p) * amount,
        pos[1] + lattice_noise([p[0] + 100.0, p[1] + 100.0]) * amount,
    ]
}

fn wave_sum(pos: [f32; 2], t: f32, params: &ParameterSet) -> f32 {
    let mut wave = 0.0;
    for i in 0..params.wave_count.min(MAX_WAVES) {
        let fi = i as f32;
        let mut angle = fi * 0.5 * params.wave_frequency;
        if params.direction_drift > 0.0 {
            angle += (t * 0.1 + fi * 2.0).sin() * params.direction_drift;
        }
        let dir = [angle.cos(), angle.sin()];

        let phase = if params.phase_randomness > 0.0 {
            hash11(fi, 12.9898) * params.phase_randomness
        } else {
            0.0
        };
        let amp_var = wave_gain(i, params.amplitude_variation);

        let d = dot2(pos, dir) + t + fi * 0.7 + phase * 6.28;
        wave += d.sin() * params.wave_amplitude * amp_var / (fi + 1.0);
    }
    wave
}

// Per-wave amplitude multiplier, floored at 0.1.
pub fn wave_gain(i: u32, amplitude_variation: f32) -> f32 {
    if amplitude_variation > 0.0 {
        (1.0 + (hash11(i as f32, 78.233) - 0.5) * amplitude_variation).max(0.1)
    } else {
        1.0
    }
}

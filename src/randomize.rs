use fastrand::Rng;

use crate::field::{BlendMode, EffectSettings, GlassSettings, MAX_WAVES, ParameterSet, TwirlPlacement};
use crate::palette::{
    ContrastHints, Rgb8, Scheme, generate_palette_detailed, has_dark_colors, with_midpoints,
};

const DARK_CHANCE: f32 = 0.45;

#[derive(Debug, Clone, PartialEq)]
pub struct Randomized {
    pub params: ParameterSet,
    pub colors: [Rgb8; 8],
    pub scheme: Scheme,
    pub dark: bool,
}

pub fn hints_for(params: &ParameterSet) -> ContrastHints {
    ContrastHints {
        zoom: params.wave_zoom,
        twirl: params.twirl,
    }
}

fn pick_palette(rng: &mut Rng, hints: ContrastHints) -> ([Rgb8; 8], Scheme, bool) {
    let scheme = if rng.f32() < 0.5 {
        Scheme::Analogous
    } else {
        Scheme::Complementary
    };
    let dark = rng.f32() < DARK_CHANCE;
    let generated = generate_palette_detailed(rng, scheme, dark, hints);
    (with_midpoints(generated.corners), scheme, dark)
}

// Seeds for Random twirl placement, drawn in [0, 10).
pub fn twirl_seed(rng: &mut Rng) -> [f32; 2] {
    [rng.f32() * 10.0, rng.f32() * 10.0]
}

// New anchors only; the contrast floor follows the current zoom and twirl.
pub fn randomize_colors(rng: &mut Rng, current: &ParameterSet) -> [Rgb8; 8] {
    pick_palette(rng, hints_for(current)).0
}

// Fresh palette and motion. Turbulence, noise displacement, amplitude
// variation and the grade carry over; the post effect is switched off.
pub fn randomize_all(rng: &mut Rng, current: &ParameterSet) -> Randomized {
    let (colors, scheme, dark) = pick_palette(rng, hints_for(current));

    let mut params = current.clone();
    params.wave_count = (4 + rng.u32(0..13)).min(MAX_WAVES);
    params.wave_amplitude = round_to(0.5 + rng.f32() * 9.5, 2);
    params.wave_zoom = round_to(0.5 + rng.f32() * 11.5, 1);
    params.wave_frequency = round_to(0.1 + rng.f32() * 2.9, 1);
    params.twirl = round_to(rng.f32() * 0.2, 3);
    params.wave_speed = round_to(0.2 + rng.f32() * 2.8, 1);
    params.phase_randomness = round_to(rng.f32() * 3.0, 1);
    params.direction_drift = round_to(rng.f32() * 2.0, 1);
    params.twirl_sources = 1 + rng.u32(0..6);
    params.twirl_placement = TwirlPlacement::all()[rng.usize(0..3)];
    params.twirl_seed = twirl_seed(rng);

    let mut blend = BlendMode::all()[rng.usize(0..4)];
    if matches!(blend, BlendMode::Multiply | BlendMode::Overlay) && has_dark_colors(&colors) {
        blend = if rng.bool() {
            BlendMode::Smooth
        } else {
            BlendMode::Screen
        };
    }
    params.blend_mode = blend;

    // Glass direction and distortion are not part of the reset.
    let glass = params.fx.glass;
    params.effect = Default::default();
    params.fx = EffectSettings {
        glass: GlassSettings {
            direction: glass.direction,
            distortion: glass.distortion,
            ..GlassSettings::default()
        },
        ..EffectSettings::default()
    };

    Randomized {
        params,
        colors,
        scheme,
        dark,
    }
}

fn round_to(v: f32, places: i32) -> f32 {
    let k = 10f32.powi(places);
    (v * k).round() / k
}

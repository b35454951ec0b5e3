use fastrand::Rng;
use gradient_field::field::{BlendMode, Effect, GlassDirection, Grade, ParameterSet};
use gradient_field::palette::{has_dark_colors, with_midpoints};
use gradient_field::randomize::{hints_for, randomize_all, randomize_colors};

fn busy_params() -> ParameterSet {
    let mut p = ParameterSet {
        turbulence: 0.7,
        noise_displacement: 0.4,
        amplitude_variation: 1.2,
        grade: Grade {
            brightness: 0.1,
            contrast: 2.0,
            saturation: 0.8,
        },
        effect: Effect::Bloom,
        ..ParameterSet::default()
    };
    p.fx.bloom = 0.8;
    p.fx.watercolor = 0.5;
    p.fx.glass.direction = GlassDirection::Horizontal;
    p.fx.glass.distortion = 2.5;
    p.fx.glass.intensity = 0.9;
    p
}

fn in_range(v: f32, lo: f32, hi: f32) -> bool {
    (lo..=hi).contains(&v)
}

fn is_rounded(v: f32, places: i32) -> bool {
    let k = 10f32.powi(places);
    ((v * k).round() - v * k).abs() < 1e-3
}

#[test]
fn randomized_motion_stays_in_range() {
    for seed in 0..200u64 {
        let mut rng = Rng::with_seed(seed);
        let p = randomize_all(&mut rng, &ParameterSet::default()).params;
        assert!((4..=12).contains(&p.wave_count), "seed {seed}: {}", p.wave_count);
        assert!(in_range(p.wave_amplitude, 0.5, 10.0));
        assert!(in_range(p.wave_zoom, 0.5, 12.0));
        assert!(in_range(p.wave_frequency, 0.1, 3.0));
        assert!(in_range(p.twirl, 0.0, 0.2));
        assert!(in_range(p.wave_speed, 0.2, 3.0));
        assert!(in_range(p.phase_randomness, 0.0, 3.0));
        assert!(in_range(p.direction_drift, 0.0, 2.0));
        assert!((1..=6).contains(&p.twirl_sources));
        assert!(p.twirl_seed.iter().all(|v| in_range(*v, 0.0, 10.0)));
    }
}

#[test]
fn randomized_values_are_rounded() {
    for seed in 0..50u64 {
        let p = randomize_all(&mut Rng::with_seed(seed), &ParameterSet::default()).params;
        assert!(is_rounded(p.wave_amplitude, 2), "{}", p.wave_amplitude);
        assert!(is_rounded(p.wave_zoom, 1), "{}", p.wave_zoom);
        assert!(is_rounded(p.wave_speed, 1), "{}", p.wave_speed);
        assert!(is_rounded(p.twirl, 3), "{}", p.twirl);
    }
}

#[test]
fn randomize_resets_effects_but_keeps_glass_shape() {
    let before = busy_params();
    let p = randomize_all(&mut Rng::with_seed(9), &before).params;
    assert_eq!(p.effect, Effect::None);
    assert_eq!(p.fx.bloom, 0.0);
    assert_eq!(p.fx.watercolor, 0.0);
    assert_eq!(p.fx.glass.intensity, 0.0);
    assert_eq!(p.fx.glass.direction, GlassDirection::Horizontal);
    assert_eq!(p.fx.glass.distortion, 2.5);
}

#[test]
fn randomize_carries_texture_and_grade() {
    let before = busy_params();
    let p = randomize_all(&mut Rng::with_seed(31), &before).params;
    assert_eq!(p.turbulence, before.turbulence);
    assert_eq!(p.noise_displacement, before.noise_displacement);
    assert_eq!(p.amplitude_variation, before.amplitude_variation);
    assert_eq!(p.grade, before.grade);
}

#[test]
fn dark_palettes_avoid_darkening_blends() {
    let mut saw_dark = false;
    for seed in 0..300u64 {
        let r = randomize_all(&mut Rng::with_seed(seed), &ParameterSet::default());
        if has_dark_colors(&r.colors) {
            saw_dark = true;
            assert!(
                !matches!(r.params.blend_mode, BlendMode::Multiply | BlendMode::Overlay),
                "seed {seed}: {:?}",
                r.params.blend_mode
            );
        }
    }
    assert!(saw_dark);
}

#[test]
fn randomized_edges_are_corner_midpoints() {
    for seed in 0..40u64 {
        let r = randomize_all(&mut Rng::with_seed(seed), &ParameterSet::default());
        let corners = [r.colors[0], r.colors[1], r.colors[2], r.colors[3]];
        assert_eq!(r.colors, with_midpoints(corners));

        let colors = randomize_colors(&mut Rng::with_seed(seed), &r.params);
        let corners = [colors[0], colors[1], colors[2], colors[3]];
        assert_eq!(colors, with_midpoints(corners));
    }
}

#[test]
fn color_randomize_is_seed_deterministic() {
    let p = ParameterSet::default();
    let a = randomize_colors(&mut Rng::with_seed(5), &p);
    let b = randomize_colors(&mut Rng::with_seed(5), &p);
    assert_eq!(a, b);
}

#[test]
fn hints_track_zoom_and_twirl() {
    let p = ParameterSet {
        wave_zoom: 11.0,
        twirl: 0.14,
        ..ParameterSet::default()
    };
    let h = hints_for(&p);
    assert_eq!(h.zoom, 11.0);
    assert_eq!(h.twirl, 0.14);
    assert!(h.extreme());
}

use super::{Rgb, ToneCurve, clamp01};

pub fn tone_map(color: Rgb, curve: ToneCurve) -> Rgb {
    let x = [color[0].max(0.0), color[1].max(0.0), color[2].max(0.0)];
    let out = match curve {
        ToneCurve::Aces => x.map(|v| {
            let a = v * (2.51 * v + 0.03);
            let b = v * (2.43 * v + 0.59) + 0.14;
            a / b
        }),
        ToneCurve::Reinhard => x.map(|v| v / (1.0 + v)),
        ToneCurve::Uncharted2 => {
            let white = uncharted2(11.2);
            x.map(|v| uncharted2(v * 2.0) / white)
        }
        ToneCurve::Cinematic => x.map(|v| rational(v, 6.2, 0.5, 1.7, 0.06)),
        ToneCurve::WarmFilm => {
            let t = tint(x, [1.1, 1.05, 0.95]);
            t.map(|v| rational(v, 2.8, 0.15, 0.75, 0.1))
        }
        ToneCurve::CoolFilm => {
            let t = tint(x, [0.95, 1.02, 1.15]);
            t.map(|v| rational(v, 2.6, 0.2, 0.8, 0.12))
        }
        ToneCurve::HighContrast => x.map(|v| rational(v.powf(0.8), 3.2, 0.1, 1.2, 0.08)),
        ToneCurve::Vintage => {
            let t = tint(x.map(|v| v.powf(1.2)), [1.08, 1.03, 0.92]);
            t.map(|v| rational(v, 2.2, 0.3, 0.9, 0.15))
        }
    };
    clamp01(out)
}

// x(ax + b) / (x(ax + c) + d)
#[inline]
fn rational(x: f32, a: f32, b: f32, c: f32, d: f32) -> f32 {
    (x * (a * x + b)) / (x * (a * x + c) + d)
}

#[inline]
fn tint(x: Rgb, k: [f32; 3]) -> Rgb {
    [x[0] * k[0], x[1] * k[1], x[2] * k[2]]
}

fn uncharted2(x: f32) -> f32 {
    const A: f32 = 0.15;
    const B: f32 = 0.50;
    const C: f32 = 0.10;
    const D: f32 = 0.20;
    const E: f32 = 0.02;
    const F: f32 = 0.30;
    ((x * (A * x + C * B) + D * E) / (x * (A * x + B) + D * F)) - E / F
}

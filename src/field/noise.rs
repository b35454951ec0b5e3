const HASH_SCALE: f32 = 43758.5453;
const GRAD_KEY_A: [f32; 2] = [127.1, 311.7];
const GRAD_KEY_B: [f32; 2] = [269.5, 183.3];
const OCTAVES: usize = 4;

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
pub fn dot2(a: [f32; 2], b: [f32; 2]) -> f32 {
    a[0] * b[0] + a[1] * b[1]
}

#[inline]
pub fn hash12(p: [f32; 2], key: [f32; 2]) -> f32 {
    fract((dot2(p, key)).sin() * HASH_SCALE)
}

#[inline]
pub fn hash11(x: f32, key: f32) -> f32 {
    fract((x * key).sin() * HASH_SCALE)
}

pub fn hash2(p: [f32; 2]) -> [f32; 2] {
    let a = hash12(p, GRAD_KEY_A) * 2.0 - 1.0;
    let b = hash12(p, GRAD_KEY_B) * 2.0 - 1.0;
    let len = (a * a + b * b).sqrt();
    if len <= f32::EPSILON {
        return [1.0, 0.0];
    }
    [a / len, b / len]
}

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// Gradient noise on the unit lattice, roughly in [-0.7, 0.7].
pub fn lattice_noise(p: [f32; 2]) -> f32 {
    let i = [p[0].floor(), p[1].floor()];
    let f = [p[0] - i[0], p[1] - i[1]];

    let corner = |dx: f32, dy: f32| {
        let g = hash2([i[0] + dx, i[1] + dy]);
        dot2(g, [f[0] - dx, f[1] - dy])
    };
    let a = corner(0.0, 0.0);
    let b = corner(1.0, 0.0);
    let c = corner(0.0, 1.0);
    let d = corner(1.0, 1.0);

    let u = [fade(f[0]), fade(f[1])];
    mix(mix(a, b, u[0]), mix(c, d, u[0]), u[1])
}

pub fn fractal_noise(p: [f32; 2]) -> f32 {
    let mut p = p;
    let mut sum = 0.0;
    let mut amp = 0.5;
    for _ in 0..OCTAVES {
        sum += amp * lattice_noise(p);
        p = [p[0] * 2.0, p[1] * 2.0];
        amp *= 0.5;
    }
    sum
}

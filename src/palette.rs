use fastrand::Rng;

pub type Rgb8 = [u8; 3];

pub const MAX_ATTEMPTS: u32 = 10;
pub const FALLBACK_GRAY: Rgb8 = [0x80, 0x80, 0x80];

const DARK_LEVELS: [f32; 4] = [0.08, 0.18, 0.28, 0.35];
const LIGHT_LEVELS: [f32; 4] = [0.25, 0.45, 0.65, 0.80];
const DARK_BACKGROUND_LUMA: f32 = 0.45;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    Analogous,
    Complementary,
}

impl Scheme {
    pub fn label(self) -> &'static str {
        match self {
            Self::Analogous => "analogous",
            Self::Complementary => "complementary",
        }
    }
}

// Current zoom and twirl. Strong zoom-out or twirl smears neighbouring hues
// together, so the generator asks for more separation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContrastHints {
    pub zoom: f32,
    pub twirl: f32,
}

impl Default for ContrastHints {
    fn default() -> Self {
        Self {
            zoom: 2.0,
            twirl: 0.05,
        }
    }
}

impl ContrastHints {
    pub fn zoomed_in(&self) -> bool {
        self.zoom < 2.0
    }

    pub fn zoomed_out(&self) -> bool {
        self.zoom > 8.0
    }

    pub fn high_twirl(&self) -> bool {
        self.twirl > 0.12
    }

    pub fn extreme(&self) -> bool {
        (self.zoomed_out() && self.high_twirl()) || self.zoom > 10.0 || self.twirl > 0.15
    }

    fn stressed(&self) -> bool {
        self.zoomed_out() || self.high_twirl()
    }

    // Each tier below overrides the one before it.
    fn tiered(&self, base: f32, zoomed_in: f32, extreme: f32, stressed: f32) -> f32 {
        let mut v = base;
        if self.zoomed_in() {
            v = zoomed_in;
        }
        if self.extreme() {
            v = extreme;
        } else if self.stressed() {
            v = stressed;
        }
        v
    }

    pub fn min_contrast(&self) -> f32 {
        self.tiered(0.15, 0.25, 0.35, 0.28)
    }

    pub fn analogous_spread(&self) -> f32 {
        self.tiered(25.0, 50.0, 70.0, 40.0)
    }

    pub fn saturation_jitter(&self) -> f32 {
        self.tiered(0.2, 0.2, 0.35, 0.25)
    }

    pub fn lightness_jitter(&self) -> f32 {
        self.tiered(0.08, 0.12, 0.15, 0.10)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneratedPalette {
    pub corners: [Rgb8; 4],
    pub attempts: u32,
    pub contrast_met: bool,
}

pub fn generate_palette(rng: &mut Rng, scheme: Scheme, dark: bool, hints: ContrastHints) -> [Rgb8; 4] {
    generate_palette_detailed(rng, scheme, dark, hints).corners
}

// Retries until every pair clears the contrast floor, then gives up and keeps
// the last attempt.
pub fn generate_palette_detailed(
    rng: &mut Rng,
    scheme: Scheme,
    dark: bool,
    hints: ContrastHints,
) -> GeneratedPalette {
    let base_hue = (rng.f32() * 360.0).floor();
    let base_sat = (0.55 + rng.f32() * 0.25).clamp(0.35, 0.85);
    let min_contrast = hints.min_contrast();

    let mut attempts = 0;
    loop {
        attempts += 1;
        let corners = palette_attempt(rng, scheme, dark, hints, base_hue, base_sat);
        let met = has_minimum_contrast(&corners, min_contrast);
        if met || attempts >= MAX_ATTEMPTS {
            if !met {
                tracing::debug!(
                    attempts,
                    min_contrast,
                    "palette retry budget exhausted, keeping last attempt"
                );
            }
            return GeneratedPalette {
                corners,
                attempts,
                contrast_met: met,
            };
        }
    }
}

fn palette_attempt(
    rng: &mut Rng,
    scheme: Scheme,
    dark: bool,
    hints: ContrastHints,
    base_hue: f32,
    base_sat: f32,
) -> [Rgb8; 4] {
    let hues = match scheme {
        Scheme::Complementary => [0.0, 180.0, 30.0, 210.0].map(|o| (base_hue + o) % 360.0),
        Scheme::Analogous => {
            let s = hints.analogous_spread();
            [0.0, s * 0.7, s * 1.3, s * 0.4].map(|o| (base_hue + o) % 360.0)
        }
    };
    let levels = if dark { DARK_LEVELS } else { LIGHT_LEVELS };
    let s_jitter = hints.saturation_jitter();
    let l_jitter = hints.lightness_jitter();

    let mut out = [[0u8; 3]; 4];
    for (i, slot) in out.iter_mut().enumerate() {
        let s = (base_sat + (rng.f32() - 0.5) * s_jitter).clamp(0.15, 0.95);
        let l = (levels[i] + (rng.f32() - 0.5) * l_jitter).clamp(0.05, 0.95);
        *slot = hsl_to_rgb8(hues[i], s, l);
    }
    out
}

pub fn has_minimum_contrast(colors: &[Rgb8], min: f32) -> bool {
    for (i, a) in colors.iter().enumerate() {
        for b in &colors[i + 1..] {
            if color_distance(*a, *b) < min {
                return false;
            }
        }
    }
    true
}

// Weighted RGB distance on 0..1 channels, weights 2/4/3.
pub fn color_distance(a: Rgb8, b: Rgb8) -> f32 {
    let d = |i: usize| (a[i] as f32 - b[i] as f32) / 255.0;
    let (dr, dg, db) = (d(0), d(1), d(2));
    (2.0 * dr * dr + 4.0 * dg * dg + 3.0 * db * db).sqrt()
}

pub fn midpoint(a: Rgb8, b: Rgb8) -> Rgb8 {
    let avg = |i: usize| ((a[i] as u16 + b[i] as u16 + 1) / 2) as u8;
    [avg(0), avg(1), avg(2)]
}

// Corners in, eight anchors out: corners then top, right, bottom, left midpoints.
pub fn with_midpoints(c: [Rgb8; 4]) -> [Rgb8; 8] {
    [
        c[0],
        c[1],
        c[2],
        c[3],
        midpoint(c[0], c[1]),
        midpoint(c[1], c[2]),
        midpoint(c[2], c[3]),
        midpoint(c[3], c[0]),
    ]
}

pub fn parse_hex(s: &str) -> Option<Rgb8> {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    // An 8-digit form carries a trailing alpha byte, which is ignored.
    if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn to_hex(c: Rgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", c[0], c[1], c[2])
}

// Hue in degrees, saturation and lightness in 0..1.
pub fn hsl_to_rgb8(h: f32, s: f32, l: f32) -> Rgb8 {
    let h = (h / 360.0).rem_euclid(1.0);
    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_channel(p, q, h + 1.0 / 3.0),
            hue_channel(p, q, h),
            hue_channel(p, q, h - 1.0 / 3.0),
        )
    };
    let to8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to8(r), to8(g), to8(b)]
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

pub fn rgb8_to_hsl(c: Rgb8) -> (f32, f32, f32) {
    let [r, g, b] = c.map(|v| v as f32 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return (0.0, 0.0, l);
    }
    let d = max - min;
    let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h * 60.0, s, l)
}

pub fn luma(c: Rgb8) -> f32 {
    (0.299 * c[0] as f32 + 0.587 * c[1] as f32 + 0.114 * c[2] as f32) / 255.0
}

pub fn is_light(c: Rgb8) -> bool {
    luma(c) > 0.6
}

pub fn is_dark(c: Rgb8) -> bool {
    luma(c) < 0.3
}

pub fn average_luma(colors: &[Rgb8]) -> f32 {
    if colors.is_empty() {
        return 0.0;
    }
    colors.iter().map(|c| luma(*c)).sum::<f32>() / colors.len() as f32
}

// Overlay text on top of the field switches to light ink below this average.
pub fn is_dark_background(colors: &[Rgb8]) -> bool {
    average_luma(colors) < DARK_BACKGROUND_LUMA
}

pub fn has_dark_colors(colors: &[Rgb8]) -> bool {
    colors.iter().filter(|c| is_dark(**c)).count() >= 4
}

pub fn has_light_colors(colors: &[Rgb8]) -> bool {
    colors.iter().any(|c| is_light(*c))
}

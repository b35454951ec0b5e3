mod distort;
mod effects;
mod grade;
mod gradient;
pub mod noise;
mod tone;

use rayon::prelude::*;

pub use distort::{
    Distorted, apply_noise_displacement, apply_turbulence, apply_twirl, distort, twirl_center,
    twirl_source, twirl_strength, wave_gain,
};
pub use effects::{apply_effect, warp_coordinate};
pub use grade::apply_grade;
pub use gradient::{BLEND_MERGE_WEIGHT, EdgeColors, blend, composite, edge_colors};
pub use tone::tone_map;

pub type Rgb = [f32; 3];

pub const MAX_WAVES: u32 = 12;
pub const MAX_TWIRL_SOURCES: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TwirlPlacement {
    #[default]
    Center,
    Random,
    Corners,
}

impl TwirlPlacement {
    pub const fn all() -> [Self; 3] {
        [Self::Center, Self::Random, Self::Corners]
    }

    // Any index outside 0 and 2 behaves like random scatter.
    pub fn from_index(i: i64) -> Self {
        match i {
            0 => Self::Center,
            2 => Self::Corners,
            _ => Self::Random,
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::Center => 0,
            Self::Random => 1,
            Self::Corners => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Random => "random",
            Self::Corners => "corners",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Smooth,
    Multiply,
    Screen,
    Overlay,
}

impl BlendMode {
    pub const fn all() -> [Self; 4] {
        [Self::Smooth, Self::Multiply, Self::Screen, Self::Overlay]
    }

    pub fn from_index(i: i64) -> Self {
        match i {
            1 => Self::Multiply,
            2 => Self::Screen,
            3 => Self::Overlay,
            _ => Self::Smooth,
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn next(self) -> Self {
        Self::from_index(((self.index() + 1) % 4) as i64)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum Effect {
    #[default]
    None = 0,
    FilmNoise = 1,
    ToneMapping = 2,
    ChromaticAberration = 3,
    Bloom = 4,
    LensDistortion = 5,
    Pixelation = 6,
    TrailBlur = 7,
    Watercolor = 8,
    FlutedGlass = 9,
}

impl Effect {
    pub const COUNT: u32 = 10;

    pub const fn all() -> [Self; 10] {
        [
            Self::None,
            Self::FilmNoise,
            Self::ToneMapping,
            Self::ChromaticAberration,
            Self::Bloom,
            Self::LensDistortion,
            Self::Pixelation,
            Self::TrailBlur,
            Self::Watercolor,
            Self::FlutedGlass,
        ]
    }

    // Unrecognized selectors pass color through untouched.
    pub fn from_index(i: i64) -> Self {
        if !(0..Self::COUNT as i64).contains(&i) {
            return Self::None;
        }
        Self::all()[i as usize]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn next(self) -> Self {
        Self::from_index(((self.index() + 1) % Self::COUNT) as i64)
    }

    pub fn prev(self) -> Self {
        Self::from_index(((self.index() + Self::COUNT - 1) % Self::COUNT) as i64)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::FilmNoise => "film noise",
            Self::ToneMapping => "tone mapping",
            Self::ChromaticAberration => "chromatic aberration",
            Self::Bloom => "bloom",
            Self::LensDistortion => "lens distortion",
            Self::Pixelation => "pixelation",
            Self::TrailBlur => "trail blur",
            Self::Watercolor => "watercolor",
            Self::FlutedGlass => "fluted glass",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum ToneCurve {
    #[default]
    Aces = 0,
    Reinhard = 1,
    Uncharted2 = 2,
    Cinematic = 3,
    WarmFilm = 4,
    CoolFilm = 5,
    HighContrast = 6,
    Vintage = 7,
}

impl ToneCurve {
    pub const fn all() -> [Self; 8] {
        [
            Self::Aces,
            Self::Reinhard,
            Self::Uncharted2,
            Self::Cinematic,
            Self::WarmFilm,
            Self::CoolFilm,
            Self::HighContrast,
            Self::Vintage,
        ]
    }

    pub fn from_index(i: i64) -> Self {
        if !(0..8).contains(&i) {
            return Self::Aces;
        }
        Self::all()[i as usize]
    }

    pub fn index(self) -> u32 {
        self as u32
    }

    pub fn next(self) -> Self {
        Self::from_index(((self.index() + 1) % 8) as i64)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Aces => "ACES",
            Self::Reinhard => "Reinhard",
            Self::Uncharted2 => "Uncharted 2",
            Self::Cinematic => "cinematic",
            Self::WarmFilm => "warm film",
            Self::CoolFilm => "cool film",
            Self::HighContrast => "high contrast",
            Self::Vintage => "vintage",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GlassDirection {
    #[default]
    Vertical,
    Horizontal,
}

impl GlassDirection {
    pub fn from_index(i: i64) -> Self {
        if i == 0 { Self::Vertical } else { Self::Horizontal }
    }

    pub fn index(self) -> u32 {
        match self {
            Self::Vertical => 0,
            Self::Horizontal => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlassSettings {
    pub intensity: f32,
    pub frequency: f32,
    pub direction: GlassDirection,
    pub distortion: f32,
}

impl Default for GlassSettings {
    fn default() -> Self {
        Self {
            intensity: 0.0,
            frequency: 50.0,
            direction: GlassDirection::Vertical,
            distortion: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSettings {
    pub film_noise: f32,
    pub bloom: f32,
    pub chromatic_aberration: f32,
    pub lens_distortion: f32,
    pub pixel_size: f32,
    pub trail_blur: f32,
    pub watercolor: f32,
    pub glass: GlassSettings,
    pub tone_curve: ToneCurve,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            film_noise: 0.0,
            bloom: 0.0,
            chromatic_aberration: 0.0,
            lens_distortion: 0.0,
            pixel_size: 1.0,
            trail_blur: 0.0,
            watercolor: 0.0,
            glass: GlassSettings::default(),
            tone_curve: ToneCurve::Aces,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grade {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Grade {
    pub const NEUTRAL: Self = Self {
        brightness: 0.0,
        contrast: 1.0,
        saturation: 1.0,
    };
}

impl Default for Grade {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.5,
            saturation: 1.5,
        }
    }
}

// Per-frame snapshot of every knob the field reads. Values are used as given;
// range checks belong to whoever builds the set.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterSet {
    pub wave_count: u32,
    pub wave_amplitude: f32,
    pub wave_frequency: f32,
    pub wave_zoom: f32,
    pub wave_speed: f32,
    pub twirl: f32,
    pub twirl_sources: u32,
    pub twirl_placement: TwirlPlacement,
    pub twirl_seed: [f32; 2],
    pub turbulence: f32,
    pub noise_displacement: f32,
    pub phase_randomness: f32,
    pub amplitude_variation: f32,
    pub direction_drift: f32,
    pub blend_mode: BlendMode,
    pub effect: Effect,
    pub fx: EffectSettings,
    pub grade: Grade,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            wave_count: 5,
            wave_amplitude: 1.5,
            wave_frequency: 1.0,
            wave_zoom: 4.5,
            wave_speed: 0.0,
            twirl: 0.0,
            twirl_sources: 1,
            twirl_placement: TwirlPlacement::Center,
            twirl_seed: [0.0, 0.0],
            turbulence: 0.0,
            noise_displacement: 0.0,
            phase_randomness: 0.0,
            amplitude_variation: 0.0,
            direction_drift: 0.0,
            blend_mode: BlendMode::Smooth,
            effect: Effect::None,
            fx: EffectSettings::default(),
            grade: Grade::default(),
        }
    }
}

// Eight anchors: four corners (top-left, top-right, bottom-right, bottom-left)
// followed by the top, right, bottom and left edge midpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnchorPalette {
    pub colors: [Rgb; 8],
}

impl AnchorPalette {
    pub fn from_rgb8(colors: &[[u8; 3]; 8]) -> Self {
        let mut out = [[0.0; 3]; 8];
        for (dst, src) in out.iter_mut().zip(colors.iter()) {
            *dst = [
                src[0] as f32 / 255.0,
                src[1] as f32 / 255.0,
                src[2] as f32 / 255.0,
            ];
        }
        Self { colors: out }
    }

    pub fn average(&self) -> Rgb {
        let mut sum = [0.0f32; 3];
        for c in &self.colors {
            sum[0] += c[0];
            sum[1] += c[1];
            sum[2] += c[2];
        }
        [sum[0] / 8.0, sum[1] / 8.0, sum[2] / 8.0]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1) as f32,
            height: height.max(1) as f32,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

#[inline]
pub(crate) fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub(crate) fn mix3(a: Rgb, b: Rgb, t: f32) -> Rgb {
    [mix(a[0], b[0], t), mix(a[1], b[1], t), mix(a[2], b[2], t)]
}

#[inline]
pub(crate) fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub(crate) fn clamp01(c: Rgb) -> Rgb {
    [c[0].clamp(0.0, 1.0), c[1].clamp(0.0, 1.0), c[2].clamp(0.0, 1.0)]
}

/// Color of the field at `uv` (both axes in [0, 1], origin bottom-left) at time `t`.
pub fn evaluate(
    uv: [f32; 2],
    t: f32,
    viewport: Viewport,
    params: &ParameterSet,
    palette: &AnchorPalette,
) -> Rgb {
    let d = distort(uv, t, viewport, params);
    let color = composite(d.sample, d.wave, palette, params.blend_mode);
    let color = apply_effect(color, d.uv, t, params);
    apply_grade(color, params.grade)
}

pub struct FrameInput {
    pub t: f32,
    pub w: usize,
    pub h: usize,
    pub scale: usize,
}

pub struct FieldEngine {
    front: Vec<u8>,
    w: usize,
    h: usize,
}

impl Default for FieldEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldEngine {
    pub fn new() -> Self {
        Self {
            front: Vec::new(),
            w: 0,
            h: 0,
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        if self.w == w && self.h == h {
            return;
        }
        self.w = w;
        self.h = h;
        self.front.clear();
        self.front.resize(w.saturating_mul(h).saturating_mul(4), 0);
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn frame(&self) -> &[u8] {
        &self.front
    }

    pub fn render(
        &mut self,
        input: &FrameInput,
        params: &ParameterSet,
        palette: &AnchorPalette,
    ) -> &[u8] {
        self.resize(input.w, input.h);
        let (w, h) = (self.w, self.h);
        if w == 0 || h == 0 {
            return &self.front;
        }

        // A block never needs to outgrow the frame.
        let scale = input.scale.clamp(1, w.max(h));
        let viewport = Viewport::new(w, h);
        let t = input.t;

        // One chunk per band of `scale` rows; each band fills its blocks from
        // the sample taken at the block's top-left pixel.
        self.front
            .par_chunks_mut(w * 4 * scale)
            .enumerate()
            .for_each(|(band, rows)| {
                let y0 = band * scale;
                let band_rows = rows.len() / (w * 4);
                for bx in (0..w).step_by(scale) {
                    let uv = [
                        (bx as f32 + 0.5) / w as f32,
                        1.0 - (y0 as f32 + 0.5) / h as f32,
                    ];
                    let c = evaluate(uv, t, viewport, params, palette);
                    let px = [to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), 255];
                    let bw = scale.min(w - bx);
                    for row in 0..band_rows {
                        let start = (row * w + bx) * 4;
                        for dst in rows[start..start + bw * 4].chunks_exact_mut(4) {
                            dst.copy_from_slice(&px);
                        }
                    }
                }
            });

        &self.front
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}

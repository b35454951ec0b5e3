use std::fmt;
use std::path::{Path, PathBuf};

use crate::field::{
    AnchorPalette, BlendMode, Effect, GlassDirection, ParameterSet, ToneCurve, TwirlPlacement,
};
use crate::palette::{Rgb8, midpoint, parse_hex, to_hex};

const BUILTIN_PRESETS: &str = include_str!("../assets/presets.txt");
const UNTITLED: &str = "untitled";

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub name: String,
    pub params: ParameterSet,
    pub colors: [Rgb8; 8],
    // Set when the record pins its own twirl seeds; otherwise the session's
    // seeds stay in effect.
    pub twirl_seed: Option<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PresetError {
    Io(String),
    Parse { line: usize, message: String },
    InvalidValue { field: &'static str, message: String },
    MissingField(&'static str),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid value for {field}: {message}")
            }
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
        }
    }
}

impl std::error::Error for PresetError {}

impl Preset {
    pub fn new(name: impl Into<String>, params: ParameterSet, colors: [Rgb8; 8]) -> Self {
        Self {
            name: name.into(),
            params,
            colors,
            twirl_seed: None,
        }
    }

    pub fn palette(&self) -> AnchorPalette {
        AnchorPalette::from_rgb8(&self.colors)
    }

    // First preset in `text`; a record with no section header is one preset.
    pub fn parse(text: &str) -> Result<Self, PresetError> {
        parse_presets(text)?
            .into_iter()
            .next()
            .ok_or(PresetError::MissingField("color1"))
    }

    pub fn to_record(&self) -> String {
        let p = &self.params;
        let fx = &p.fx;
        let mut lines = vec![format!("[{}]", self.name)];
        for (i, c) in self.colors.iter().enumerate() {
            lines.push(format!("color{}={}", i + 1, to_hex(*c)));
        }
        let fields = [
            ("waveCount", p.wave_count.to_string()),
            ("waveAmplitude", p.wave_amplitude.to_string()),
            ("waveZoom", p.wave_zoom.to_string()),
            ("waveFrequency", p.wave_frequency.to_string()),
            ("waveTwirl", p.twirl.to_string()),
            ("twirlSources", p.twirl_sources.to_string()),
            ("twirlLocation", p.twirl_placement.index().to_string()),
            ("waveSpeed", p.wave_speed.to_string()),
            ("turbulence", p.turbulence.to_string()),
            ("noiseDisplacement", p.noise_displacement.to_string()),
            ("phaseRandomness", p.phase_randomness.to_string()),
            ("amplitudeVariation", p.amplitude_variation.to_string()),
            ("directionDrift", p.direction_drift.to_string()),
            ("blendMode", p.blend_mode.index().to_string()),
            ("filmEffect", p.effect.index().to_string()),
            ("filmNoiseIntensity", fx.film_noise.to_string()),
            ("bloomIntensity", fx.bloom.to_string()),
            ("caAmount", fx.chromatic_aberration.to_string()),
            ("lensDistortion", fx.lens_distortion.to_string()),
            ("pixelationSize", fx.pixel_size.to_string()),
            ("trailBlur", fx.trail_blur.to_string()),
            ("watercolor", fx.watercolor.to_string()),
            ("glassStripesIntensity", fx.glass.intensity.to_string()),
            ("glassStripesFrequency", fx.glass.frequency.to_string()),
            ("glassStripesDirection", fx.glass.direction.index().to_string()),
            ("glassStripesDistortion", fx.glass.distortion.to_string()),
            ("toneMappingLUT", fx.tone_curve.index().to_string()),
            ("brightness", p.grade.brightness.to_string()),
            ("contrast", p.grade.contrast.to_string()),
            ("saturation", p.grade.saturation.to_string()),
        ];
        for (key, value) in fields {
            lines.push(format!("{key}={value}"));
        }
        if let Some([x, y]) = self.twirl_seed {
            lines.push(format!("twirlSeedX={x}"));
            lines.push(format!("twirlSeedY={y}"));
        }
        lines.join("\n")
    }
}

pub fn parse_presets(text: &str) -> Result<Vec<Preset>, PresetError> {
    let mut out = Vec::new();
    let mut draft: Option<Draft> = None;

    for (line_idx, raw) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest.strip_suffix(']').map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(PresetError::Parse {
                    line: line_no,
                    message: "expected [<preset name>]".to_string(),
                });
            }
            if let Some(done) = draft.take() {
                out.push(done.finish()?);
            }
            draft = Some(Draft::new(name));
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(PresetError::Parse {
                line: line_no,
                message: "expected <key>=<value>".to_string(),
            });
        };
        draft
            .get_or_insert_with(|| Draft::new(UNTITLED))
            .apply(key.trim(), value.trim(), line_no)?;
    }

    if let Some(done) = draft {
        out.push(done.finish()?);
    }
    Ok(out)
}

struct Draft {
    name: String,
    colors: [Option<Rgb8>; 8],
    twirl_seed: [Option<f32>; 2],
    params: ParameterSet,
}

impl Draft {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            colors: [None; 8],
            twirl_seed: [None; 2],
            params: ParameterSet::default(),
        }
    }

    fn apply(&mut self, key: &str, value: &str, line: usize) -> Result<(), PresetError> {
        if let Some(idx) = color_slot(key) {
            let c = parse_hex(value).ok_or_else(|| PresetError::InvalidValue {
                field: COLOR_KEYS[idx],
                message: format!("expected #rrggbb or #rrggbbaa, got '{value}'"),
            })?;
            self.colors[idx] = Some(c);
            return Ok(());
        }

        let p = &mut self.params;
        match key {
            "name" if value.is_empty() => {
                return Err(PresetError::InvalidValue {
                    field: "name",
                    message: "must not be empty".to_string(),
                });
            }
            "name" => self.name = value.to_string(),
            "waveCount" => p.wave_count = parse_count(value, "waveCount")?,
            "waveAmplitude" => p.wave_amplitude = parse_num(value, "waveAmplitude")?,
            "waveZoom" => p.wave_zoom = parse_num(value, "waveZoom")?,
            "waveFrequency" => p.wave_frequency = parse_num(value, "waveFrequency")?,
            "waveTwirl" => p.twirl = parse_num(value, "waveTwirl")?,
            "twirlSources" => p.twirl_sources = parse_count(value, "twirlSources")?,
            "twirlLocation" => {
                p.twirl_placement = TwirlPlacement::from_index(parse_index(value, "twirlLocation")?)
            }
            "twirlSeedX" => self.twirl_seed[0] = Some(parse_num(value, "twirlSeedX")?),
            "twirlSeedY" => self.twirl_seed[1] = Some(parse_num(value, "twirlSeedY")?),
            "waveSpeed" => p.wave_speed = parse_num(value, "waveSpeed")?,
            "turbulence" => p.turbulence = parse_num(value, "turbulence")?,
            "noiseDisplacement" => p.noise_displacement = parse_num(value, "noiseDisplacement")?,
            "phaseRandomness" => p.phase_randomness = parse_num(value, "phaseRandomness")?,
            "amplitudeVariation" => {
                p.amplitude_variation = parse_num(value, "amplitudeVariation")?
            }
            "directionDrift" => p.direction_drift = parse_num(value, "directionDrift")?,
            "blendMode" => p.blend_mode = BlendMode::from_index(parse_index(value, "blendMode")?),
            "filmEffect" => p.effect = Effect::from_index(parse_index(value, "filmEffect")?),
            "filmNoiseIntensity" => p.fx.film_noise = parse_num(value, "filmNoiseIntensity")?,
            "bloomIntensity" => p.fx.bloom = parse_num(value, "bloomIntensity")?,
            "caAmount" => p.fx.chromatic_aberration = parse_num(value, "caAmount")?,
            "lensDistortion" => p.fx.lens_distortion = parse_num(value, "lensDistortion")?,
            "pixelationSize" => p.fx.pixel_size = parse_num(value, "pixelationSize")?,
            "trailBlur" => p.fx.trail_blur = parse_num(value, "trailBlur")?,
            "watercolor" => p.fx.watercolor = parse_num(value, "watercolor")?,
            "glassStripesIntensity" => {
                p.fx.glass.intensity = parse_num(value, "glassStripesIntensity")?
            }
            "glassStripesFrequency" => {
                p.fx.glass.frequency = parse_num(value, "glassStripesFrequency")?
            }
            "glassStripesDirection" => {
                p.fx.glass.direction =
                    GlassDirection::from_index(parse_index(value, "glassStripesDirection")?)
            }
            "glassStripesDistortion" => {
                p.fx.glass.distortion = parse_num(value, "glassStripesDistortion")?
            }
            "toneMappingLUT" => {
                p.fx.tone_curve = ToneCurve::from_index(parse_index(value, "toneMappingLUT")?)
            }
            "brightness" => p.grade.brightness = parse_num(value, "brightness")?,
            "contrast" => p.grade.contrast = parse_num(value, "contrast")?,
            "saturation" => p.grade.saturation = parse_num(value, "saturation")?,
            _ => tracing::warn!(line, key, preset = %self.name, "ignoring unknown preset field"),
        }
        Ok(())
    }

    fn finish(self) -> Result<Preset, PresetError> {
        let mut corners = [[0u8; 3]; 4];
        for (i, slot) in corners.iter_mut().enumerate() {
            *slot = self.colors[i].ok_or(PresetError::MissingField(COLOR_KEYS[i]))?;
        }
        let derived = [
            midpoint(corners[0], corners[1]),
            midpoint(corners[1], corners[2]),
            midpoint(corners[2], corners[3]),
            midpoint(corners[3], corners[0]),
        ];
        let mut colors = [[0u8; 3]; 8];
        colors[..4].copy_from_slice(&corners);
        for i in 0..4 {
            colors[4 + i] = self.colors[4 + i].unwrap_or(derived[i]);
        }

        let twirl_seed = match self.twirl_seed {
            [None, None] => None,
            [x, y] => Some([x.unwrap_or(0.0), y.unwrap_or(0.0)]),
        };
        let mut params = self.params;
        if let Some(seed) = twirl_seed {
            params.twirl_seed = seed;
        }
        clamp_to_ranges(&mut params);
        Ok(Preset {
            name: self.name,
            params,
            colors,
            twirl_seed,
        })
    }
}

const COLOR_KEYS: [&str; 8] = [
    "color1", "color2", "color3", "color4", "color5", "color6", "color7", "color8",
];

fn color_slot(key: &str) -> Option<usize> {
    COLOR_KEYS.iter().position(|k| *k == key)
}

fn parse_num(value: &str, field: &'static str) -> Result<f32, PresetError> {
    let v = value.parse::<f32>().map_err(|_| PresetError::InvalidValue {
        field,
        message: format!("expected a number, got '{value}'"),
    })?;
    if !v.is_finite() {
        return Err(PresetError::InvalidValue {
            field,
            message: "value must be finite".to_string(),
        });
    }
    Ok(v)
}

fn parse_index(value: &str, field: &'static str) -> Result<i64, PresetError> {
    Ok(parse_num(value, field)?.round() as i64)
}

fn parse_count(value: &str, field: &'static str) -> Result<u32, PresetError> {
    Ok(parse_index(value, field)?.clamp(0, u32::MAX as i64) as u32)
}

// Control ranges exposed to users. The field itself accepts anything.
pub fn clamp_to_ranges(p: &mut ParameterSet) {
    p.wave_count = p.wave_count.min(crate::field::MAX_WAVES);
    p.wave_amplitude = p.wave_amplitude.clamp(0.0, 10.0);
    p.wave_zoom = p.wave_zoom.clamp(0.1, 20.0);
    p.wave_frequency = p.wave_frequency.clamp(0.0, 10.0);
    p.twirl = p.twirl.clamp(0.0, 0.5);
    p.twirl_sources = p.twirl_sources.min(crate::field::MAX_TWIRL_SOURCES);
    p.wave_speed = p.wave_speed.clamp(0.0, 5.0);
    p.turbulence = p.turbulence.clamp(0.0, 2.0);
    p.noise_displacement = p.noise_displacement.clamp(0.0, 2.0);
    p.phase_randomness = p.phase_randomness.clamp(0.0, 3.0);
    p.amplitude_variation = p.amplitude_variation.clamp(0.0, 3.0);
    p.direction_drift = p.direction_drift.clamp(0.0, 2.0);

    let fx = &mut p.fx;
    fx.film_noise = fx.film_noise.clamp(0.0, 0.2);
    fx.bloom = fx.bloom.clamp(0.0, 2.0);
    fx.chromatic_aberration = fx.chromatic_aberration.clamp(0.0, 0.05);
    fx.lens_distortion = fx.lens_distortion.clamp(-2.0, 2.0);
    fx.pixel_size = fx.pixel_size.clamp(1.0, 64.0);
    fx.trail_blur = fx.trail_blur.clamp(0.0, 1.0);
    fx.watercolor = fx.watercolor.clamp(0.0, 1.0);
    fx.glass.intensity = fx.glass.intensity.clamp(0.0, 1.0);
    fx.glass.frequency = fx.glass.frequency.clamp(1.0, 200.0);
    fx.glass.distortion = fx.glass.distortion.clamp(0.0, 5.0);

    p.grade.brightness = p.grade.brightness.clamp(-1.0, 1.0);
    p.grade.contrast = p.grade.contrast.clamp(0.0, 3.0);
    p.grade.saturation = p.grade.saturation.clamp(0.0, 3.0);
}

#[derive(Debug, Clone, Default)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl PresetLibrary {
    pub fn builtin() -> Result<Self, PresetError> {
        Ok(Self {
            presets: parse_presets(BUILTIN_PRESETS)?,
        })
    }

    pub fn from_presets(presets: Vec<Preset>) -> Self {
        Self { presets }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Preset>, PresetError> {
        let text =
            std::fs::read_to_string(path.as_ref()).map_err(|e| PresetError::Io(e.to_string()))?;
        parse_presets(&text)
    }

    // Presets with a name already in the library replace the existing entry.
    pub fn merge(&mut self, presets: Vec<Preset>) {
        for preset in presets {
            match self.presets.iter_mut().find(|p| p.name == preset.name) {
                Some(slot) => *slot = preset,
                None => self.presets.push(preset),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Preset> {
        self.presets.get(idx)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    // Index, then exact name, then substring; name matches ignore case.
    pub fn find(&self, query: &str) -> Option<usize> {
        let query = query.trim();
        if let Ok(idx) = query.parse::<usize>() {
            return (idx < self.presets.len()).then_some(idx);
        }
        let needle = query.to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.presets
            .iter()
            .position(|p| p.name.to_ascii_lowercase() == needle)
            .or_else(|| {
                self.presets
                    .iter()
                    .position(|p| p.name.to_ascii_lowercase().contains(&needle))
            })
    }
}

// Writes `preset` into the record file at `path`, replacing a section with the
// same name. The file is swapped in through a temporary sibling.
pub fn save_preset(path: &Path, preset: &Preset) -> Result<(), PresetError> {
    if preset.name.trim().is_empty() || preset.name.contains(['[', ']', '\n']) {
        return Err(PresetError::InvalidValue {
            field: "name",
            message: format!("'{}' cannot be used as a section name", preset.name),
        });
    }
    let mut presets = match std::fs::read_to_string(path) {
        Ok(text) => parse_presets(&text)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(PresetError::Io(err.to_string())),
    };
    match presets.iter_mut().find(|p| p.name == preset.name) {
        Some(slot) => *slot = preset.clone(),
        None => presets.push(preset.clone()),
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PresetError::Io(e.to_string()))?;
    }
    let mut body = String::from("# gradient_field presets v1\n");
    for p in &presets {
        body.push('\n');
        body.push_str(&p.to_record());
        body.push('\n');
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, &body).map_err(|e| PresetError::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| PresetError::Io(e.to_string()))?;
    tracing::info!(path = %path.display(), preset = %preset.name, "saved preset");
    Ok(())
}

pub fn presets_storage_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("gradient_field").join("presets.txt"));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("gradient_field")
            .join("presets.txt"),
    )
}

use crate::config::Config;
use crate::field::{AnchorPalette, Effect, FieldEngine, FrameInput, MAX_WAVES, ParameterSet};
use crate::logging::{self, LogTarget};
use crate::palette::{FALLBACK_GRAY, is_dark_background};
use crate::preset::{Preset, PresetLibrary, presets_storage_path, save_preset};
use crate::randomize::{randomize_all, randomize_colors, twirl_seed};
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use crate::terminal::TerminalGuard;
use anyhow::{Context, bail};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use fastrand::Rng;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const HUD_ROWS: u16 = 2;
const SPEED_STEP: f32 = 0.1;
const ZOOM_STEP: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

pub struct Session {
    library: PresetLibrary,
    active: Option<usize>,
    current: Preset,
    palette: AnchorPalette,
    speed_override: Option<f32>,
    save_path: Option<PathBuf>,
    twirl_seed: [f32; 2],
    t: f32,
    paused: bool,
    show_hud: bool,
    show_help: bool,
    status: String,
}

impl Session {
    pub fn new(
        library: PresetLibrary,
        speed_override: Option<f32>,
        save_path: Option<PathBuf>,
        rng: &mut Rng,
    ) -> Self {
        let current = library.get(0).cloned().unwrap_or_else(|| {
            Preset::new("untitled", ParameterSet::default(), [FALLBACK_GRAY; 8])
        });
        let mut session = Self {
            active: (!library.is_empty()).then_some(0),
            palette: current.palette(),
            library,
            current,
            speed_override,
            save_path,
            twirl_seed: twirl_seed(rng),
            t: 0.0,
            paused: false,
            show_hud: true,
            show_help: false,
            status: String::new(),
        };
        session.apply_twirl_seed();
        session.apply_speed_override();
        session
    }

    pub fn preset(&self) -> &Preset {
        &self.current
    }

    pub fn params(&self) -> &ParameterSet {
        &self.current.params
    }

    pub fn palette(&self) -> &AnchorPalette {
        &self.palette
    }

    pub fn library(&self) -> &PresetLibrary {
        &self.library
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    // Random-placement seeds in effect for presets that do not pin their own.
    pub fn twirl_seed(&self) -> [f32; 2] {
        self.twirl_seed
    }

    pub fn time(&self) -> f32 {
        self.t
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn show_hud(&self) -> bool {
        self.show_hud
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn dark_background(&self) -> bool {
        is_dark_background(&self.current.colors)
    }

    // Animated time runs at the preset's speed while not paused.
    pub fn advance(&mut self, dt: f32) {
        if !self.paused {
            self.t += dt * self.current.params.wave_speed;
        }
    }

    pub fn select(&mut self, idx: usize) -> bool {
        let Some(preset) = self.library.get(idx) else {
            return false;
        };
        self.current = preset.clone();
        self.active = Some(idx);
        self.apply_twirl_seed();
        self.apply_speed_override();
        self.refresh_palette();
        self.status = format!("preset {}", self.current.name);
        tracing::info!(preset = %self.current.name, index = idx, "loaded preset");
        true
    }

    pub fn step_preset(&mut self, forward: bool) {
        let n = self.library.len();
        if n == 0 {
            return;
        }
        let next = match self.active {
            Some(i) if forward => (i + 1) % n,
            Some(i) => (i + n - 1) % n,
            None => 0,
        };
        self.select(next);
    }

    pub fn randomize_all(&mut self, rng: &mut Rng) {
        let r = randomize_all(rng, &self.current.params);
        let name = format!("random-{:04}", rng.u32(0..10_000));
        self.twirl_seed = r.params.twirl_seed;
        self.current = Preset::new(name, r.params, r.colors);
        self.current.twirl_seed = Some(self.twirl_seed);
        self.active = None;
        self.apply_speed_override();
        self.refresh_palette();
        self.status = format!(
            "randomized ({}{})",
            r.scheme.label(),
            if r.dark { ", dark" } else { "" }
        );
    }

    pub fn randomize_colors(&mut self, rng: &mut Rng) {
        self.current.colors = randomize_colors(rng, &self.current.params);
        self.refresh_palette();
        self.status = "new colors".to_string();
    }

    pub fn save(&mut self) {
        let Some(path) = self.save_path.clone() else {
            self.status = "no preset file to save into".to_string();
            return;
        };
        // The saved record keeps the layout currently on screen.
        self.current.twirl_seed = Some(self.current.params.twirl_seed);
        match save_preset(&path, &self.current) {
            Ok(()) => self.status = format!("saved {} to {}", self.current.name, path.display()),
            Err(err) => {
                tracing::warn!(error = %err, path = %path.display(), "saving preset failed");
                self.status = format!("save failed: {err}");
            }
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, mods: KeyModifiers, rng: &mut Rng) -> KeyOutcome {
        match code {
            KeyCode::Char('c') if mods.contains(KeyModifiers::CONTROL) => return KeyOutcome::Quit,
            KeyCode::Char('q') | KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('r') => self.randomize_all(rng),
            KeyCode::Char('c') => self.randomize_colors(rng),
            KeyCode::Right => self.step_preset(true),
            KeyCode::Left => self.step_preset(false),
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('s') => self.save(),
            KeyCode::Char('i') => self.show_hud = !self.show_hud,
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = !self.show_help,
            other => adjust_params(&mut self.current.params, other),
        }
        KeyOutcome::Continue
    }

    pub fn hud_text(&self, fps: f32) -> String {
        let p = &self.current.params;
        let effect = match p.effect {
            Effect::ToneMapping => format!("{} ({})", p.effect.label(), p.fx.tone_curve.label()),
            other => other.label().to_string(),
        };
        let first = format!(
            "{} | {} | blend {} | waves {} | zoom {:.1} | twirl {:.3} x{} {} | speed {:.1}{} | {:.1} fps",
            self.current.name,
            effect,
            p.blend_mode.label(),
            p.wave_count,
            p.wave_zoom,
            p.twirl,
            p.twirl_sources,
            p.twirl_placement.label(),
            p.wave_speed,
            if self.paused { " (paused)" } else { "" },
            fps,
        );
        let second = if self.status.is_empty() {
            "h help | r randomize | c colors | <-/-> presets | q quit".to_string()
        } else {
            self.status.clone()
        };
        format!("{first}\n{second}")
    }

    fn apply_twirl_seed(&mut self) {
        self.current.params.twirl_seed = self.current.twirl_seed.unwrap_or(self.twirl_seed);
    }

    fn apply_speed_override(&mut self) {
        if let Some(speed) = self.speed_override {
            self.current.params.wave_speed = speed.max(0.0);
        }
    }

    fn refresh_palette(&mut self) {
        self.palette = self.current.palette();
    }
}

fn adjust_params(p: &mut ParameterSet, code: KeyCode) {
    match code {
        KeyCode::Char('e') => {
            let next = p.effect.next();
            set_effect(p, next);
        }
        KeyCode::Char('E') => {
            let prev = p.effect.prev();
            set_effect(p, prev);
        }
        KeyCode::Char('t') => {
            p.fx.tone_curve = p.fx.tone_curve.next();
            p.effect = Effect::ToneMapping;
        }
        KeyCode::Char('b') => p.blend_mode = p.blend_mode.next(),
        KeyCode::Char('w') => p.wave_count = (p.wave_count + 1).min(MAX_WAVES),
        KeyCode::Char('W') => p.wave_count = p.wave_count.saturating_sub(1),
        KeyCode::Char('z') => p.wave_zoom = (p.wave_zoom + ZOOM_STEP).min(20.0),
        KeyCode::Char('Z') => p.wave_zoom = (p.wave_zoom - ZOOM_STEP).max(0.5),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            p.wave_speed = round_tenth((p.wave_speed + SPEED_STEP).min(5.0))
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            p.wave_speed = round_tenth((p.wave_speed - SPEED_STEP).max(0.0))
        }
        _ => {}
    }
}

// Picking an effect whose strength is zero would look like nothing happened.
fn set_effect(p: &mut ParameterSet, effect: Effect) {
    p.effect = effect;
    let fx = &mut p.fx;
    match effect {
        Effect::FilmNoise if fx.film_noise <= 0.0 => fx.film_noise = 0.12,
        Effect::ChromaticAberration if fx.chromatic_aberration <= 0.0 => {
            fx.chromatic_aberration = 0.01
        }
        Effect::Bloom if fx.bloom <= 0.0 => fx.bloom = 0.4,
        Effect::LensDistortion if fx.lens_distortion == 0.0 => fx.lens_distortion = 0.6,
        Effect::Pixelation if fx.pixel_size <= 1.0 => fx.pixel_size = 4.0,
        Effect::TrailBlur if fx.trail_blur <= 0.0 => fx.trail_blur = 0.5,
        Effect::Watercolor if fx.watercolor <= 0.0 => fx.watercolor = 0.6,
        Effect::FlutedGlass if fx.glass.intensity <= 0.0 => fx.glass.intensity = 0.5,
        _ => {}
    }
}

fn round_tenth(v: f32) -> f32 {
    (v * 10.0).round() / 10.0
}

pub fn help_text() -> &'static str {
    "gradient-field keys\n\
     \n\
     q / Esc      quit\n\
     r            randomize everything\n\
     c            randomize colors only\n\
     <- / ->      previous / next preset\n\
     e / E        next / previous effect\n\
     t            next tone curve\n\
     b            next blend mode\n\
     w / W        more / fewer waves\n\
     z / Z        zoom out / in\n\
     + / -        faster / slower\n\
     space        pause\n\
     s            save current preset\n\
     i            toggle HUD\n\
     h / ?        toggle this help"
}

fn load_library(cfg: &Config) -> anyhow::Result<PresetLibrary> {
    let mut library = PresetLibrary::builtin().context("parse built-in presets")?;
    if let Some(path) = cfg.preset_file.as_deref() {
        if path.exists() {
            let extra = PresetLibrary::load(path)
                .with_context(|| format!("load presets from {}", path.display()))?;
            tracing::info!(path = %path.display(), count = extra.len(), "loaded preset file");
            library.merge(extra);
        }
    }
    Ok(library)
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let log_target = match cfg.log_file.as_deref() {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Off,
    };
    logging::init(cfg.log_level, log_target)?;

    let mut rng = cfg.seed.map(Rng::with_seed).unwrap_or_else(Rng::new);
    let library = load_library(&cfg)?;
    let save_path = cfg.preset_file.clone().or_else(presets_storage_path);
    let mut session = Session::new(library, cfg.speed, save_path, &mut rng);

    if let Some(query) = cfg.preset.as_deref() {
        let Some(idx) = session.library().find(query) else {
            bail!("unknown preset '{query}'");
        };
        session.select(idx);
    }
    if cfg.randomize {
        session.randomize_all(&mut rng);
    }

    let mut size = crossterm::terminal::size().context("get terminal size")?;
    if size.0 < 4 || size.1 < 2 {
        bail!("terminal too small (need at least 4x2, got {}x{})", size.0, size.1);
    }

    let _term = TerminalGuard::enter()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut renderer = HalfBlockRenderer::new();
    let mut engine = FieldEngine::new();
    let mut fps = FpsCounter::new();
    let scale = cfg.scale.max(1);
    let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
    let mut last = Instant::now();

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if session.handle_key(k.code, k.modifiers, &mut rng) == KeyOutcome::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => size = (c, r),
                _ => {}
            }
        }
        // Resize events are not delivered by every terminal.
        size = crossterm::terminal::size().unwrap_or(size);

        session.advance(now.duration_since(last).as_secs_f32());
        last = now;

        let (cols, rows) = size;
        let hud_rows = if session.show_hud() { HUD_ROWS.min(rows.saturating_sub(1)) } else { 0 };
        let visual_rows = rows.saturating_sub(hud_rows).max(1);
        let w = cols as usize;
        let h = visual_rows as usize * 2;

        let input = FrameInput {
            t: session.time(),
            w,
            h,
            scale,
        };
        let pixels = engine.render(&input, session.params(), session.palette());

        let hud = if session.show_hud() {
            session.hud_text(fps.fps())
        } else {
            String::new()
        };
        let frame = Frame {
            term_cols: cols,
            term_rows: rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: pixels,
            hud: &hud,
            hud_rows,
            overlay: session.show_help().then(help_text),
            dark_background: session.dark_background(),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        fps.tick();

        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

struct FpsCounter {
    since: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            since: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let dt = self.since.elapsed().as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.since = Instant::now();
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

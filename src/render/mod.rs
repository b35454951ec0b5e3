mod halfblock;

pub use halfblock::HalfBlockRenderer;

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub overlay: Option<&'a str>,
    // Average anchor luma is low; overlays switch to light ink.
    pub dark_background: bool,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ink {
    pub fg: (u8, u8, u8),
    pub bg: (u8, u8, u8),
    pub title: (u8, u8, u8),
}

impl Ink {
    pub fn for_background(dark: bool) -> Self {
        if dark {
            Self {
                fg: (236, 242, 255),
                bg: (10, 14, 24),
                title: (255, 236, 160),
            }
        } else {
            Self {
                fg: (24, 26, 34),
                bg: (246, 244, 238),
                title: (120, 40, 150),
            }
        }
    }
}

// Hard-wraps each line to `width` chars. Blank lines survive.
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.lines() {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}

// Centered box over the field. The first line is drawn as a title.
pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
    ink: Ink,
) -> anyhow::Result<()> {
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if text.trim().is_empty() || cols < 8 || rows < 4 {
        return Ok(());
    }

    let lines = wrap_lines(text, cols.saturating_sub(6));
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, cols.saturating_sub(6).max(1));
    let box_w = inner_w + 4;
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_h = body_h + 2;

    let left = (cols.saturating_sub(box_w)) / 2 + 1;
    let top = (rows.saturating_sub(box_h)) / 2 + 1;
    let edge = format!("+{}+", "-".repeat(box_w - 2));

    let (fr, fg, fb) = ink.fg;
    let (br, bg, bb) = ink.bg;
    let (tr, tg, tb) = ink.title;
    write!(out, "\x1b[0m\x1b[38;2;{fr};{fg};{fb}m\x1b[48;2;{br};{bg};{bb}m")?;
    write!(out, "\x1b[{top};{left}H{edge}")?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = top + 1 + i;
        let pad = inner_w.saturating_sub(line.chars().count());
        if i == 0 {
            write!(
                out,
                "\x1b[{row};{left}H| \x1b[1m\x1b[38;2;{tr};{tg};{tb}m{line}\x1b[22m\x1b[38;2;{fr};{fg};{fb}m{} |",
                " ".repeat(pad)
            )?;
        } else {
            write!(out, "\x1b[{row};{left}H| {line}{} |", " ".repeat(pad))?;
        }
    }
    write!(out, "\x1b[{};{left}H{edge}", top + box_h - 1)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}

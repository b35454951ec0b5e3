use crate::render::{Frame, Ink, Renderer, draw_overlay_popup};
use std::io::Write;

const UPPER_HALF: char = '\u{2580}';

type Rgb8 = (u8, u8, u8);

// Two field rows per terminal row: foreground paints the upper pixel through
// `▀`, background the lower one. Color escapes are skipped when unchanged.
#[derive(Default)]
pub struct HalfBlockRenderer {
    fg: Option<Rgb8>,
    bg: Option<Rgb8>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_fg(&mut self, out: &mut dyn Write, c: Rgb8) -> std::io::Result<()> {
        if self.fg != Some(c) {
            write!(out, "\x1b[38;2;{};{};{}m", c.0, c.1, c.2)?;
            self.fg = Some(c);
        }
        Ok(())
    }

    fn set_bg(&mut self, out: &mut dyn Write, c: Rgb8) -> std::io::Result<()> {
        if self.bg != Some(c) {
            write!(out, "\x1b[48;2;{};{};{}m", c.0, c.1, c.2)?;
            self.bg = Some(c);
        }
        Ok(())
    }

    fn paint_field(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> std::io::Result<()> {
        let w = frame.pixel_width;
        let px = |x: usize, y: usize| {
            let i = (y * w + x) * 4;
            (frame.pixels_rgba[i], frame.pixels_rgba[i + 1], frame.pixels_rgba[i + 2])
        };
        for row in 0..frame.visual_rows as usize {
            for x in 0..w {
                self.set_fg(out, px(x, row * 2))?;
                self.set_bg(out, px(x, row * 2 + 1))?;
                write!(out, "{UPPER_HALF}")?;
            }
            out.write_all(b"\r\n")?;
        }
        Ok(())
    }

    fn paint_hud(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> std::io::Result<()> {
        let cols = frame.term_cols as usize;
        let mut lines = frame.hud.lines();
        for i in 0..frame.hud_rows as usize {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", frame.visual_rows as usize + i + 1)?;
            if let Some(line) = lines.next() {
                let clipped: String = line.chars().take(cols).collect();
                out.write_all(clipped.as_bytes())?;
            }
        }
        self.fg = None;
        self.bg = None;
        Ok(())
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let w = frame.pixel_width;
        let h = frame.pixel_height;
        if frame.term_cols == 0 || frame.visual_rows == 0 || w == 0 || h == 0 {
            return Ok(());
        }
        // Buffer must match the grid exactly: one column per pixel, two pixels per row.
        if w != frame.term_cols as usize || h != frame.visual_rows as usize * 2 {
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }

        let need = w * h * 4;
        if frame.pixels_rgba.len() < need {
            out.write_all(b"\x1b[H\x1b[0m\x1b[2J")?;
            write!(
                out,
                "pixel buffer too small (need {need}, got {})",
                frame.pixels_rgba.len()
            )?;
        } else {
            // Autowrap off while painting full-width rows.
            out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
            self.fg = None;
            self.bg = None;
            self.paint_field(frame, out)?;
            self.paint_hud(frame, out)?;
            if let Some(text) = frame.overlay {
                let ink = Ink::for_background(frame.dark_background);
                draw_overlay_popup(out, frame.term_cols, frame.term_rows, text, ink)?;
            }
            out.write_all(b"\x1b[?7h")?;
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}

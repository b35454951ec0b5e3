use gradient_field::render::{Frame, HalfBlockRenderer, Ink, Renderer, draw_overlay_popup, wrap_lines};

/// Build a solid-color RGBA pixel buffer.
fn solid_pixels(w: usize, h: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for px in buf.chunks_exact_mut(4) {
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = 255;
    }
    buf
}

/// Upper rows red, lower rows blue, so every cell splits in two.
fn striped_pixels(w: usize, h: usize) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) * 4;
            if y % 2 == 0 {
                buf[i] = 255;
            } else {
                buf[i + 2] = 255;
            }
            buf[i + 3] = 255;
        }
    }
    buf
}

fn make_frame<'a>(
    cols: u16,
    visual_rows: u16,
    pw: usize,
    ph: usize,
    pixels: &'a [u8],
    sync: bool,
) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 2,
        visual_rows,
        pixel_width: pw,
        pixel_height: ph,
        pixels_rgba: pixels,
        hud: "sunset | none | 30.0 fps\nh help",
        hud_rows: 2,
        overlay: None,
        dark_background: false,
        sync_updates: sync,
    }
}

fn render(frame: &Frame<'_>) -> String {
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(frame, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

// ── Half-block renderer ──

#[test]
fn halfblock_renders_solid_frame() {
    let pixels = solid_pixels(30, 8, 200, 100, 50);
    let s = render(&make_frame(30, 4, 30, 8, &pixels, false));
    assert!(s.contains("\x1b[H"), "missing home cursor");
    assert!(s.contains("\x1b[?7l"), "missing autowrap-off");
    assert!(s.contains("\x1b[?7h"), "missing autowrap-on");
    assert!(s.contains("38;2;200;100;50"), "missing FG color");
    assert!(s.contains("48;2;200;100;50"), "missing BG color");
    assert_eq!(s.matches('\u{2580}').count(), 120);
    assert!(s.contains("sunset | none"), "HUD text missing");
    assert!(s.contains("h help"));
}

#[test]
fn halfblock_skips_repeated_colors() {
    let pixels = solid_pixels(6, 8, 10, 20, 30);
    let s = render(&make_frame(6, 4, 6, 8, &pixels, false));
    assert_eq!(s.matches("\x1b[38;2;").count(), 1);
    assert_eq!(s.matches("\x1b[48;2;").count(), 1);
}

#[test]
fn halfblock_splits_cells_between_rows() {
    let pixels = striped_pixels(3, 2);
    let s = render(&make_frame(3, 1, 3, 2, &pixels, false));
    assert!(s.contains("\x1b[38;2;255;0;0m"));
    assert!(s.contains("\x1b[48;2;0;0;255m"));
}

#[test]
fn halfblock_sync_brackets() {
    let pixels = solid_pixels(4, 4, 1, 2, 3);
    let s = render(&make_frame(4, 2, 4, 4, &pixels, true));
    assert!(s.starts_with("\x1b[?2026h"));
    assert!(s.ends_with("\x1b[?2026l"));

    let s = render(&make_frame(4, 2, 4, 4, &pixels, false));
    assert!(!s.contains("2026"));
}

#[test]
fn halfblock_ignores_mismatched_buffers() {
    let pixels = solid_pixels(5, 4, 1, 2, 3);
    assert!(render(&make_frame(4, 2, 5, 4, &pixels, true)).is_empty());
    assert!(render(&make_frame(0, 2, 0, 4, &pixels, true)).is_empty());
}

#[test]
fn halfblock_reports_short_buffers() {
    let pixels = vec![0u8; 8];
    let s = render(&make_frame(4, 2, 4, 4, &pixels, true));
    assert!(s.contains("pixel buffer too small"));
    assert!(s.ends_with("\x1b[?2026l"));
}

#[test]
fn halfblock_clips_hud_to_width() {
    let pixels = solid_pixels(4, 2, 0, 0, 0);
    let mut frame = make_frame(4, 1, 4, 2, &pixels, false);
    frame.hud = "abcdefgh";
    frame.hud_rows = 1;
    let s = render(&frame);
    assert!(s.contains("abcd"));
    assert!(!s.contains("abcde"));
}

#[test]
fn halfblock_draws_overlay_with_ink() {
    let pixels = solid_pixels(40, 20, 0, 0, 0);
    let mut frame = make_frame(40, 10, 40, 20, &pixels, false);
    frame.overlay = Some("keys\nq quit");
    frame.dark_background = true;
    let s = render(&frame);
    let ink = Ink::for_background(true);
    let (r, g, b) = ink.fg;
    assert!(s.contains(&format!("38;2;{r};{g};{b}")));
    assert!(s.contains("q quit"));
}

#[test]
fn halfblock_name() {
    assert_eq!(HalfBlockRenderer::new().name(), "halfblock");
}

// ── Overlay ──

#[test]
fn overlay_box_is_centered_and_titled() {
    let mut out = Vec::new();
    draw_overlay_popup(&mut out, 40, 12, "Title\nbody line", Ink::for_background(false)).unwrap();
    let s = String::from_utf8(out).unwrap();
    assert!(s.contains("+-"));
    assert!(s.contains("\x1b[1m"));
    assert!(s.contains("Title"));
    assert!(s.contains("| body line |"));
    assert!(s.ends_with("\x1b[0m"));
}

#[test]
fn overlay_skips_tiny_terminals_and_blank_text() {
    let mut out = Vec::new();
    draw_overlay_popup(&mut out, 6, 3, "hello", Ink::for_background(true)).unwrap();
    draw_overlay_popup(&mut out, 40, 12, "   ", Ink::for_background(true)).unwrap();
    assert!(out.is_empty());
}

#[test]
fn ink_contrasts_with_background() {
    let dark = Ink::for_background(true);
    let light = Ink::for_background(false);
    assert_ne!(dark, light);
    let sum = |c: (u8, u8, u8)| c.0 as u32 + c.1 as u32 + c.2 as u32;
    assert!(sum(dark.fg) > sum(dark.bg));
    assert!(sum(light.fg) < sum(light.bg));
}

#[test]
fn wrap_lines_hard_wraps_and_keeps_blanks() {
    assert_eq!(wrap_lines("abcdef", 4), vec!["abcd", "ef"]);
    assert_eq!(wrap_lines("a\n\nb", 10), vec!["a", "", "b"]);
    assert_eq!(wrap_lines("xyz", 0), vec!["x", "y", "z"]);
}

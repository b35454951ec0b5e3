use anyhow::Context;
use crossterm::{
    cursor, execute,
    terminal::{self, ClearType},
};
use std::io::{Stdout, Write, stdout};

// Raw mode plus alternate screen for the lifetime of the guard. Dropping it,
// or panicking while it is alive, puts the terminal back.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode().context("enable raw mode")?;
        let guard = Self { _private: () };

        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));

        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )
        .context("prepare alternate screen")?;
        Ok(guard)
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

// Undoes everything the renderer may leave enabled: synchronized output,
// disabled autowrap and SGR colors.
fn restore() {
    let _ = terminal::disable_raw_mode();
    let mut out = stdout();
    let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
    let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = out.flush();
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

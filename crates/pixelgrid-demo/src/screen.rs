#![forbid(unsafe_code)]

//! Terminal ownership for the demo.
//!
//! [`DemoScreen`] switches to raw mode on the alternate screen with the
//! cursor hidden and owns stdout for drawing frames. A single `restore`
//! routine puts the terminal back; it runs from `Drop` or from the panic
//! hook, whichever comes first, and only once.

use std::io::{self, Stdout, Write};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::{cursor, execute, terminal};
use pixelgrid::CELL_COUNT;

use crate::render::{self, CellPaint};

/// Set while the terminal is in demo mode.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// The demo's hold on the terminal.
#[derive(Debug)]
pub struct DemoScreen {
    out: Stdout,
    frames: u64,
}

impl DemoScreen {
    /// Take over the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or the alternate screen cannot be
    /// entered. Whatever was already switched is put back first.
    pub fn enter() -> io::Result<Self> {
        install_panic_hook();
        terminal::enable_raw_mode()?;
        ACTIVE.store(true, Ordering::SeqCst);

        let mut out = io::stdout();
        if let Err(err) = execute!(out, terminal::EnterAlternateScreen, cursor::Hide) {
            restore();
            return Err(err);
        }
        tracing::info!("demo screen entered");
        Ok(Self { out, frames: 0 })
    }

    /// Draw one frame: the grid and its status line.
    pub fn present(&mut self, paints: &[CellPaint; CELL_COUNT], status: &str) -> io::Result<()> {
        render::draw(&mut self.out, paints, status)?;
        self.frames += 1;
        Ok(())
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Drop for DemoScreen {
    fn drop(&mut self) {
        restore();
        tracing::info!(frames = self.frames, "demo screen restored");
    }
}

fn restore() {
    if !ACTIVE.swap(false, Ordering::SeqCst) {
        return;
    }
    let mut out = io::stdout();
    let _ = execute!(out, cursor::Show, terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));
    });
}

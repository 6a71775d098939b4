#![forbid(unsafe_code)]

//! Terminal rendering of a grid held in a [`MemorySurface`].
//!
//! The renderer reads the surface the same way a style sheet would: the lit
//! class, the named tint classes, and the `--pixel-on` property on each cell
//! and on the container. Cell tints beat the container accent, which beats
//! the default color. Glow halos are the lit color faded toward transparent
//! and composited over [`BACKGROUND`].

use std::io::{self, Write};

use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, queue, terminal};
use pixelgrid::core::color::{PROP_ON, TintScope};
use pixelgrid::{
    CELL_COUNT, ColorToken, Instance, MemorySurface, NamedColor, NodeId, Rgb, Surface,
};

/// Color of cells with no tint anywhere.
pub const DEFAULT_TINT: NamedColor = NamedColor::Cyan;
/// Backdrop the grid is painted on; halos blend into it.
pub const BACKGROUND: Rgb = Rgb::new(12, 12, 20);

const CELL_WIDTH: u16 = 6;
const CELL_HEIGHT: u16 = 3;
const GAP: u16 = 2;
const ORIGIN: (u16, u16) = (4, 2);

/// What to draw for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPaint {
    /// Whether the surface marks the cell lit.
    pub lit: bool,
    /// Fill color for the cell's current state.
    pub color: Rgb,
    /// Halo color when the cell is lit and glow is enabled.
    pub halo: Option<Rgb>,
}

/// Read the tint a node carries, if any.
#[must_use]
pub fn surface_tint(surface: &MemorySurface, node: &NodeId, scope: TintScope) -> Option<ColorToken> {
    let named = NamedColor::ALL.into_iter().find(|color| {
        let class = match scope {
            TintScope::Container => color.container_class(),
            TintScope::Cell => color.cell_class(),
        };
        surface.has_class(node, class)
    });
    if let Some(color) = named {
        return Some(ColorToken::Named(color));
    }
    surface
        .property(node, PROP_ON)
        .and_then(|value| ColorToken::parse(&value))
}

/// Resolve every cell's paint from the instance's surface.
#[must_use]
pub fn paint_cells(instance: &Instance<MemorySurface>) -> [CellPaint; CELL_COUNT] {
    let surface = instance.container();
    let accent = surface_tint(surface, &surface.root(), TintScope::Container);
    let glowing = instance.bloom().is_enabled();

    std::array::from_fn(|i| {
        let node = &instance.cells()[i];
        let token = surface_tint(surface, node, TintScope::Cell)
            .or_else(|| accent.clone())
            .unwrap_or(ColorToken::Named(DEFAULT_TINT));
        let lit = surface.is_lit(i);
        CellPaint {
            lit,
            color: if lit { token.on_rgb() } else { token.off_rgb() },
            halo: (lit && glowing).then(|| token.glow_rgba().over(BACKGROUND)),
        }
    })
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

fn cell_origin(index: usize) -> (u16, u16) {
    let col = (index % 3) as u16;
    let row = (index / 3) as u16;
    (
        ORIGIN.0 + col * (CELL_WIDTH + GAP),
        ORIGIN.1 + row * (CELL_HEIGHT + GAP / 2),
    )
}

/// Draw the grid and a status line.
pub fn draw<W: Write>(out: &mut W, paints: &[CellPaint; CELL_COUNT], status: &str) -> io::Result<()> {
    queue!(
        out,
        SetBackgroundColor(term_color(BACKGROUND)),
        terminal::Clear(terminal::ClearType::All)
    )?;

    // Halos first so neighbouring cells paint over them.
    for (i, paint) in paints.iter().enumerate() {
        let Some(halo) = paint.halo else { continue };
        let (x, y) = cell_origin(i);
        let ring = "░".repeat(usize::from(CELL_WIDTH + 2));
        queue!(out, SetForegroundColor(term_color(halo)))?;
        for dy in 0..CELL_HEIGHT + 2 {
            queue!(
                out,
                cursor::MoveTo(x.saturating_sub(1), (y + dy).saturating_sub(1)),
                Print(&ring)
            )?;
        }
    }

    let block = "█".repeat(usize::from(CELL_WIDTH));
    for (i, paint) in paints.iter().enumerate() {
        let (x, y) = cell_origin(i);
        queue!(out, SetForegroundColor(term_color(paint.color)))?;
        for dy in 0..CELL_HEIGHT {
            queue!(out, cursor::MoveTo(x, y + dy), Print(&block))?;
        }
    }

    let status_row = ORIGIN.1 + 3 * (CELL_HEIGHT + GAP / 2) + 1;
    queue!(
        out,
        SetForegroundColor(Color::Reset),
        cursor::MoveTo(ORIGIN.0, status_row),
        Print(status),
        cursor::MoveTo(ORIGIN.0, status_row + 1),
        Print("n/p preset  space play/stop  b glow  q quit"),
        ResetColor,
    )?;
    out.flush()
}

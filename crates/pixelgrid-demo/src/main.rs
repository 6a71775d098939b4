#![forbid(unsafe_code)]

//! PixelGrid demo binary entry point.

use std::fs::File;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use pixelgrid::{Catalog, EngineConfig, MonotonicClock};
use pixelgrid_demo::app::{Command, Control, DemoApp};
use pixelgrid_demo::cli::Opts;
use pixelgrid_demo::render;
use pixelgrid_demo::screen::DemoScreen;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PIXELGRID_LOG";
const LOG_FILE: &str = "pixelgrid-demo.log";
/// Upper bound on how long the loop sleeps between redraws.
const FRAME: Duration = Duration::from_millis(33);

fn main() {
    let opts = Opts::parse();
    init_logging();

    let catalog = match &opts.catalog {
        Some(path) => match pixelgrid::load_catalog(path) {
            Ok(catalog) => Arc::new(catalog),
            Err(e) => {
                eprintln!("Failed to load catalog {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => Arc::clone(Catalog::shared()),
    };

    if opts.list {
        for name in catalog.names() {
            println!("{name}");
        }
        return;
    }

    let mut app = DemoApp::new(&opts, catalog, EngineConfig::from_env());
    if let Err(e) = run(&mut app) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

fn run(app: &mut DemoApp) -> io::Result<()> {
    let clock = MonotonicClock::start();
    let mut screen = DemoScreen::enter()?;

    loop {
        if app.tick(&clock) == Control::Quit {
            break;
        }
        if let Some(instance) = app.instance() {
            screen.present(&render::paint_cells(instance), &app.status_line())?;
        }

        let wait = app.next_wake().map_or(FRAME, |wake| wake.min(FRAME));
        if !event::poll(wait)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(command) = Command::from_key(key)
            && app.apply(command) == Control::Quit
        {
            break;
        }
    }

    app.shutdown();
    tracing::debug!(frames = screen.frames(), "event loop finished");
    drop(screen);
    Ok(())
}

/// Send logs to a file when `PIXELGRID_LOG` holds a filter.
fn init_logging() {
    let Ok(filter) = std::env::var(LOG_ENV) else {
        return;
    };
    let file = match File::create(LOG_FILE) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open {LOG_FILE}: {e}; logging disabled");
            return;
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

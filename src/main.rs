use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

use term_deck::app::App;
use term_deck::catalog::{Catalog, default_targets};
use term_deck::commands;
use term_deck::drivers::InputDriver;
use term_deck::drivers::console::{ConsoleInputDriver, ConsoleOutput};
use term_deck::event_loop::{ControlFlow, EventLoop};
use term_deck::store::{JsonStore, MemoryStore, SettingsStore};
use term_deck::tracing_sub;

#[derive(Debug, Parser)]
#[command(
    name = "term-deck",
    version,
    about = "Side panel hosting a deck of external destinations"
)]
struct Args {
    /// JSON file listing the selectable targets
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Directory for persisted order, selection, and options
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Localhost TCP port accepting control commands; 0 disables the relay
    #[arg(long, default_value_t = 0)]
    control_port: u16,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    tracing_sub::init(args.log_file.as_deref());

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path).map_err(io::Error::other)?,
        None => Catalog::new(default_targets()),
    };
    let store: Box<dyn SettingsStore> = match &args.state_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            Box::new(JsonStore::open(&dir.join("state.json")))
        }
        None => Box::new(MemoryStore::new()),
    };
    let command_rx = if args.control_port != 0 {
        Some(commands::spawn_listener(args.control_port)?)
    } else {
        None
    };

    let mut app = App::new(catalog, store, command_rx);
    app.startup(Instant::now());

    let mut output = ConsoleOutput::new()?;
    output.enter()?;
    let mut driver = ConsoleInputDriver::new();
    driver.set_mouse_capture(true)?;

    let mut event_loop = EventLoop::new(driver, Duration::from_millis(16));
    let result = event_loop.run(|_, event| {
        let now = Instant::now();
        match event {
            Some(event) => Ok(app.handle_event(&event, now)),
            None => {
                app.service(now);
                output.draw(|mut frame| app.render(&mut frame))?;
                Ok(ControlFlow::Continue)
            }
        }
    });

    event_loop.driver().set_mouse_capture(false)?;
    output.exit()?;
    result
}

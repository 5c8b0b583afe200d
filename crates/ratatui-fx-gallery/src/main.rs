//! Interactive gallery for the `ratatui-fx` catalog.
//!
//! Run `fx-gallery --list` to print every slug, or `fx-gallery --effect sand-particles
//! --props '{"count": 800}'` to open straight on one effect.

mod app;

use anyhow::Context;
use app::App;
use clap::Parser;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui_fx::FxEnv;
use ratatui_fx::Props;
use ratatui_fx::core::crossterm_input::input_event_from_crossterm;
use ratatui_fx::registry::Catalog;
use ratatui_fx::registry::Category;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "fx-gallery", version, about = "Browse the ratatui-fx effect catalog")]
struct Args {
    /// Slug of the effect to open first.
    #[arg(short, long)]
    effect: Option<String>,

    /// JSON object of props for the first effect.
    #[arg(long, requires = "effect")]
    props: Option<String>,

    /// Start with reduced motion: effects render one static frame.
    #[arg(long)]
    reduced_motion: bool,

    /// Frame rate cap while an effect is animating.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Print the catalog and exit.
    #[arg(long)]
    list: bool,

    /// Write logs here. Filter with `RUST_LOG` (default `info`).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;

    let catalog = Catalog::builtin();
    if args.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let index = match &args.effect {
        Some(slug) => catalog
            .position(slug)
            .with_context(|| format!("unknown effect {slug:?}; try --list"))?,
        None => 0,
    };
    let props = match &args.props {
        Some(json) => Props::from_json(json).context("parsing --props")?,
        None => Props::new(),
    };
    let env = FxEnv {
        reduced_motion: args.reduced_motion,
        ..FxEnv::default()
    };
    let mut app = App::new(catalog, index, props, env)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let frame_budget = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let res = run(&mut terminal, &mut app, frame_budget);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    frame_budget: Duration,
) -> anyhow::Result<()> {
    let mut last_frame = Instant::now();
    loop {
        terminal.draw(|f| app.draw(f))?;

        // Without a pending frame, block until input arrives.
        let idle = !app.frame_requested();
        let timeout = if idle {
            Duration::from_millis(500)
        } else {
            frame_budget.saturating_sub(last_frame.elapsed())
        };
        if crossterm::event::poll(timeout)? {
            // drain everything queued so a burst of mouse moves costs one frame
            loop {
                if let Some(event) = input_event_from_crossterm(crossterm::event::read()?) {
                    if !app.handle_event(&event)? {
                        return Ok(());
                    }
                }
                if !crossterm::event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        let now = Instant::now();
        if idle {
            // time spent waiting for input is not simulated
            app.tick(frame_budget, now);
            last_frame = now;
        } else if now.duration_since(last_frame) >= frame_budget {
            app.tick(now.duration_since(last_frame), now);
            last_frame = now;
        }
    }
}

fn init_logging(path: Option<&PathBuf>) -> anyhow::Result<()> {
    // The terminal belongs to the UI, so logs only go to a file.
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    tracing::info!("fx-gallery starting");
    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    for category in Category::ALL {
        println!("{category}");
        for entry in catalog.by_category(category) {
            println!("  {:<18} {}", entry.slug, entry.description);
        }
    }
}

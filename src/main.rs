//! # App Census CLI Entry Point
//!
//! Lists the applications on this machine, ranked by whether they have a
//! Start Menu shortcut and then by how often they have been launched.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive table
//! appcensus
//!
//! # Print the ranked list and exit
//! appcensus --list
//! appcensus --list --json
//!
//! # Save the Start Menu apps, one per line, and exit
//! appcensus --export software.txt
//!
//! # Read usage counters from a snapshot instead of the registry
//! appcensus --usage-file usage.json --list
//!
//! # Capture the registry counters into a snapshot
//! appcensus --save-snapshot usage.json
//! ```
//!
//! ## Key Bindings
//!
//! - `q` / `Esc` - Quit
//! - `j` / `Down`, `k` / `Up` - Move selection
//! - `PageDown` / `PageUp` - Move by a page
//! - `g` / `G` - Jump to top / bottom
//! - `/` - Search by name
//! - `f` - Toggle Start Menu apps only
//! - `s` - Save Start Menu apps as a text file

use appcensus::census::{run_census, Census};
use appcensus::config::Config;
use appcensus::inventory::{export_known_shortcuts, ranked_to_json, RankedEntry};
use appcensus::sources::{SnapshotUsageStore, UsageSource};
use appcensus::ui::{self, app::format_last_run, App};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Trait for reading terminal events (allows dependency injection for testing)
trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// App Census - installed applications ranked by Start Menu presence and usage
#[derive(Parser, Debug)]
#[command(name = "appcensus")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory applications from Start Menu shortcuts and launch counters", long_about = None)]
struct Args {
    /// Start Menu root to scan (repeatable; replaces the configured roots)
    #[arg(long = "root", value_name = "DIR")]
    roots: Vec<PathBuf>,

    /// Usage-store section to read (repeatable; replaces the configured sections)
    #[arg(long = "section", value_name = "ID")]
    sections: Vec<String>,

    /// Read usage counters from a JSON snapshot instead of the registry
    #[arg(long, value_name = "FILE")]
    usage_file: Option<PathBuf>,

    /// Print the ranked list and exit
    #[arg(long)]
    list: bool,

    /// Print the list as JSON (with --list)
    #[arg(long, requires = "list")]
    json: bool,

    /// Save the Start Menu apps to FILE and exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Capture the usage-store sections to a JSON snapshot and exit
    #[arg(long, value_name = "FILE", conflicts_with_all = ["list", "export"])]
    save_snapshot: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn usage_source(&self) -> UsageSource {
        match &self.usage_file {
            Some(path) => UsageSource::Snapshot(path.clone()),
            None => UsageSource::System,
        }
    }
}

fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "appcensus=debug,info"
    } else {
        "appcensus=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();
    setup_logging(args.verbose);

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    run_application(args).await
}

/// Resolve configuration: file first, then command-line overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    if !args.roots.is_empty() {
        config.shortcut_roots = args.roots.clone();
    }
    if !args.sections.is_empty() {
        config.usage_sections = args.sections.clone();
    }

    Ok(config)
}

async fn run_application(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let source = args.usage_source();

    if let Some(path) = &args.save_snapshot {
        let store = source.open()?;
        let json = SnapshotUsageStore::capture(store.as_ref(), &config.usage_sections)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write usage snapshot: {}", path.display()))?;
        println!("Saved usage snapshot to {}", path.display());
        return Ok(());
    }

    let census = run_census(&config, source).await?;

    if args.list || args.export.is_some() {
        if let Some(path) = &args.export {
            let written = export_known_shortcuts(&census.entries, path)?;
            println!("Saved {} names to {}", written, path.display());
        }
        if args.list {
            print_census(&census, args.json)?;
        }
        return Ok(());
    }

    if census.entries.is_empty() {
        eprintln!("Warning: No applications found");
        eprintln!("Searched in:");
        for root in &config.shortcut_roots {
            eprintln!("  {}", root.display());
        }
        eprintln!(
            "\nUse --root to point at a Start Menu folder or --usage-file to read a snapshot."
        );
        std::process::exit(1);
    }

    run_interactive(census.entries)
}

fn print_census(census: &Census, json: bool) -> Result<()> {
    if json {
        println!("{}", ranked_to_json(&census.entries)?);
        return Ok(());
    }

    print!("{}", format_table(&census.entries));
    println!(
        "\nTotal: {} entries ({} shortcuts, {} usage records)",
        census.entries.len(),
        census.shortcut_count,
        census.record_count
    );
    Ok(())
}

fn format_table(entries: &[RankedEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("App Name".len());

    let mut out = format!(
        "{:<width$}  {:>11}  {:<16}  {}\n",
        "App Name",
        "Usage Count",
        "From Start Menu?",
        "Last Run",
        width = width
    );
    for entry in entries {
        out.push_str(&format!(
            "{:<width$}  {:>11}  {:<16}  {}\n",
            entry.name,
            entry.count,
            if entry.is_known_shortcut { "Yes" } else { "No" },
            format_last_run(entry.last_run),
            width = width
        ));
    }
    out
}

fn run_interactive(entries: Vec<RankedEntry>) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let mut app = App::new(entries);
    let mut event_reader = CrosstermEventReader;
    let run_result = run_app(&mut app, &mut event_reader, &mut |app: &App| {
        terminal
            .draw(|f| ui::render(f, app))
            .context("Failed to draw terminal UI")?;
        Ok(())
    });

    // Restore terminal (always runs, even if run_app failed)
    let cleanup_result = cleanup_terminal(&mut terminal);

    run_result?;
    cleanup_result?;

    Ok(())
}

/// Draw, read one event, apply it; until the app asks to quit.
fn run_app(
    app: &mut App,
    event_reader: &mut dyn EventReader,
    draw: &mut dyn FnMut(&App) -> Result<()>,
) -> Result<()> {
    while !app.should_quit {
        draw(app)?;

        let Some(event) = event_reader.read_event(Duration::from_millis(250))? else {
            continue;
        };

        if let Event::Key(key) = event {
            // Windows reports both press and release
            if key.kind == KeyEventKind::Press {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}

/// Clean up terminal state
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;

    terminal.show_cursor().context("Failed to show cursor")?;

    Ok(())
}

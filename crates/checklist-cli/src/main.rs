mod cli;
mod config;
mod edit;
mod tui;

use crate::cli::ConfigCommand;
use checklist_grid::ChecklistGrid;
use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Starter tasks shown on first launch; the grid itself keeps no state
/// between runs.
const STARTER_TASKS: &[&str] = &[
    "Vitamin D Intake",
    "Morning Workout",
    "Weight Check",
    "Mood Tracking",
    "Reading (30 mins)",
    "Meditation",
    "Coding Practice",
];

/// Entry point wiring the CLI to the interactive grid.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let cli = cli::Cli::parse();
    let config = config::load()?;
    match cli.command.unwrap_or(cli::Command::Tui) {
        cli::Command::Tui => tui::launch(seed_grid())?,
        cli::Command::Version => print_version(),
        cli::Command::Config(ConfigCommand::Init) => init_config(&config)?,
        cli::Command::Edit {
            image,
            prompt,
            output,
        } => edit::run(image, prompt, output, &config).await?,
    }

    Ok(())
}

fn init_tracing() {
    // Respect user-provided filters, default to info to avoid noisy stdout.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn print_version() {
    println!("checklist-cli {}", env!("CARGO_PKG_VERSION"));
}

fn init_config(config: &config::Config) -> Result<()> {
    let path = config::write_default_if_missing(config)?;
    println!("Config initialized at {}", path.display());
    Ok(())
}

/// Fresh grid viewing the current month, seeded with the starter tasks.
fn seed_grid() -> ChecklistGrid {
    let mut grid = ChecklistGrid::new();
    for title in STARTER_TASKS {
        grid.add_task(title);
    }
    grid
}

//! chartpad: a terminal chart builder.
//!
//! Edit bar and pie chart data with a live preview, save chart
//! configurations to a local JSON store, and browse or delete saved
//! charts from the same dashboard.

mod app;
mod cli;
mod data;
mod editor;
mod ui;

use anyhow::Result;
use cli::{AppConfig, Cli, Commands};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Open {
            chart,
            color_palette,
            data_dir,
        } => {
            let config = AppConfig::from_open_command(chart, color_palette, data_dir);

            // Run the TUI application
            app::run(config)?;
        }
    }

    Ok(())
}

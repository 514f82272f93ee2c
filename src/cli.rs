//! Command-line interface argument parsing for chartpad.
//!
//! - `chartpad open`
//! - `chartpad open --chart pie`
//! - `chartpad open --color-palette "#FF0000,#00FF00,#0000FF"`
//! - `chartpad open --data-dir /tmp/charts`

use clap::{Parser, Subcommand};

use crate::data::ChartKind;

/// A terminal chart builder.
///
/// Edit bar and pie charts with live preview, save them to a local
/// store, and browse or delete saved charts.
#[derive(Parser, Debug)]
#[command(name = "chartpad")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the chart builder
    Open {
        /// Chart editor to open first
        #[arg(short, long, value_parser = ["bar", "pie"], default_value = "bar")]
        chart: String,

        /// Comma-separated hex color palette for new data rows
        /// Example: "#FF0000,#00FF00,#0000FF"
        #[arg(short = 'p', long)]
        color_palette: Option<String>,

        /// Directory for saved chart collections
        /// Defaults to $CHARTPAD_DIR, then the platform data dir
        #[arg(long)]
        data_dir: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub start_chart: ChartKind,
    pub color_palette: Vec<String>,
    pub data_dir: std::path::PathBuf,
}

impl AppConfig {
    /// Create AppConfig from CLI Commands
    pub fn from_open_command(
        chart: String,
        color_palette: Option<String>,
        data_dir: Option<String>,
    ) -> Self {
        let start_chart = match chart.as_str() {
            "pie" => ChartKind::Pie,
            _ => ChartKind::Bar,
        };

        // Parse color palette
        let colors = color_palette
            .map(|p| p.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(default_palette);

        // Determine data directory
        let data_dir = data_dir.map(std::path::PathBuf::from).unwrap_or_else(|| {
            // Check CHARTPAD_DIR environment variable first
            if let Ok(dir) = std::env::var("CHARTPAD_DIR") {
                std::path::PathBuf::from(dir)
            } else {
                dirs::data_dir()
                    .unwrap_or_else(|| std::path::PathBuf::from("."))
                    .join("chartpad")
            }
        });

        AppConfig {
            start_chart,
            color_palette: colors,
            data_dir,
        }
    }
}

/// Default palette for new data rows
pub fn default_palette() -> Vec<String> {
    vec![
        "#3B82F6".to_string(), // Blue
        "#10B981".to_string(), // Green
        "#F59E0B".to_string(), // Amber
        "#EF4444".to_string(), // Red
        "#8B5CF6".to_string(), // Violet
        "#06B6D4".to_string(), // Cyan
        "#84CC16".to_string(), // Lime
        "#F97316".to_string(), // Orange
    ]
}

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{conflicts::ConflictsArgs, cost::CostArgs, layout::LayoutArgs};

/// Trip planner itinerary tools.
///
/// Reads a trip document (activities, transport options, exchange rates) and
/// reports the day timeline layout, scheduling conflicts and costs.
#[derive(Debug, Parser)]
#[command(name = "tp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show lanes and timeline positions for each day.
    Layout(LayoutArgs),

    /// List every pair of overlapping activities in the trip.
    Conflicts(ConflictsArgs),

    /// Show costs per day and for the whole trip in the base currency.
    Cost(CostArgs),
}

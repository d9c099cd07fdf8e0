//! Demo walkthrough CLI
//!
//! A command-line tool for checking walkthrough progress, poking the demo
//! application's persistence and load endpoints, and completing steps.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{load_test, persistence, probes, status, steps};
use dashboard_lib::{ClientConfig, HttpDemoApi};
use std::time::Duration;

/// Demo walkthrough CLI
#[derive(Parser)]
#[command(name = "democtl")]
#[command(author, version, about = "CLI for the OpenShift walkthrough demo", long_about = None)]
pub struct Cli {
    /// Demo application URL (falls back to DEMO_API_URL, then the config file)
    #[arg(long, env = "DEMO_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show walkthrough progress and deployment info
    Status,

    /// Show container and network metrics
    Metrics,

    /// Database persistence commands
    #[command(subcommand)]
    Persistence(PersistenceCommands),

    /// Walkthrough step commands
    #[command(subcommand)]
    Step(StepCommands),

    /// CPU/memory load test commands
    #[command(subcommand)]
    LoadTest(LoadTestCommands),

    /// Show health probe configuration
    Probes,

    /// Check the health, readiness and startup endpoints
    Health,

    /// Ask the traffic generator for a burst of requests
    Traffic,
}

#[derive(Subcommand)]
pub enum PersistenceCommands {
    /// Show database statistics
    Stats,

    /// Write a test entry and show it
    Test {
        /// Data to store (defaults to a timestamped test entry)
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum StepCommands {
    /// Mark a step as completed
    Complete {
        /// Step number (1-6)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=6))]
        id: u32,
    },

    /// Complete whichever step is current
    Current,
}

#[derive(Subcommand)]
pub enum LoadTestCommands {
    /// Start a load test
    Start {
        /// Duration in seconds
        #[arg(long, short, default_value_t = 120)]
        duration: u64,

        /// Generate memory load instead of CPU load
        #[arg(long)]
        memory: bool,

        /// Follow progress until the test finishes
        #[arg(long, short)]
        watch: bool,
    },

    /// Stop the running load test
    Stop,

    /// Show load test progress
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let api_url = match cli.api_url {
        Some(url) => url,
        None => config::Config::load()?.api_url_or_default(),
    };

    // Initialize client
    let client = HttpDemoApi::new(&ClientConfig {
        base_url: api_url,
        request_timeout: Duration::from_secs(cli.timeout),
    })
    .context("Failed to create demo API client")?;

    // Execute command
    match cli.command {
        Commands::Status => status::show_status(&client, cli.format).await?,
        Commands::Metrics => status::show_metrics(&client, cli.format).await?,
        Commands::Persistence(cmd) => match cmd {
            PersistenceCommands::Stats => persistence::show_stats(&client, cli.format).await?,
            PersistenceCommands::Test { data } => {
                persistence::write_test_entry(&client, data, cli.format).await?
            }
        },
        Commands::Step(cmd) => match cmd {
            StepCommands::Complete { id } => steps::complete(&client, id, cli.format).await?,
            StepCommands::Current => steps::complete_current(&client, cli.format).await?,
        },
        Commands::LoadTest(cmd) => match cmd {
            LoadTestCommands::Start {
                duration,
                memory,
                watch,
            } => load_test::start(&client, duration, !memory, watch, cli.format).await?,
            LoadTestCommands::Stop => load_test::stop(&client, cli.format).await?,
            LoadTestCommands::Status => load_test::show_status(&client, cli.format).await?,
        },
        Commands::Probes => probes::show_probes(&client, cli.format).await?,
        Commands::Health => probes::check_health(&client, cli.format).await?,
        Commands::Traffic => probes::generate_traffic(&client, cli.format).await?,
    }

    Ok(())
}

//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use dashboard_lib::models::StepStatus;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// One line of a two-column key/value table
#[derive(Tabled)]
pub struct Field {
    #[tabled(rename = "Field")]
    pub name: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl Field {
    pub fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print rows as a rounded table
pub fn print_table<T: Tabled>(rows: Vec<T>) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Show "Unknown" for blank server strings
pub fn or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        "Unknown".to_string()
    } else {
        value.to_string()
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_mb(value: f64) -> String {
    format!("{:.0} MB", value)
}

pub fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}

/// Color a step status
pub fn color_step_status(status: StepStatus) -> String {
    let label = status.as_str();
    match status {
        StepStatus::Completed => label.green().to_string(),
        StepStatus::Current => label.yellow().bold().to_string(),
        StepStatus::Pending => label.dimmed().to_string(),
    }
}

/// Color an HTTP status code
pub fn color_status_code(code: u16) -> String {
    match code {
        200..=299 => code.to_string().green().to_string(),
        300..=499 => code.to_string().yellow().to_string(),
        _ => code.to_string().red().to_string(),
    }
}

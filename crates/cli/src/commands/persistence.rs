//! Database persistence commands

use anyhow::{Context, Result};
use dashboard_lib::{models::PersistenceStats, DemoApi, HttpDemoApi};

use super::accepted;
use crate::output::{or_unknown, print_json, print_success, print_table, Field, OutputFormat};

fn stats_fields(stats: &PersistenceStats) -> Vec<Field> {
    let mut fields = vec![
        Field::new("Total Entries", stats.total_entries),
        Field::new("Database", or_unknown(&stats.database_type)),
    ];
    if let Some(latest) = &stats.latest_entry {
        fields.push(Field::new("Last Entry", &latest.timestamp));
        fields.push(Field::new("Last Data", &latest.data));
    }
    fields
}

/// Show database statistics
pub async fn show_stats(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let stats = client.persistence_stats().await?;

    match format {
        OutputFormat::Json => print_json(&stats)?,
        OutputFormat::Table => print_table(stats_fields(&stats)),
    }

    Ok(())
}

/// Write a test entry and show it
pub async fn write_test_entry(
    client: &HttpDemoApi,
    data: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let data = data.unwrap_or_else(|| {
        format!(
            "Database test entry {}",
            chrono::Utc::now().timestamp_millis()
        )
    });

    let response = client.create_persistence_entry(&data).await?;
    accepted(response.success, response.error.clone())?;
    let entry = response
        .entry
        .context("Server accepted the entry but did not return it")?;

    match format {
        OutputFormat::Json => print_json(&entry)?,
        OutputFormat::Table => {
            print_success("Database persistence working");
            print_table(vec![
                Field::new("Entry ID", entry.id),
                Field::new("Data", &entry.data),
                Field::new("Time", &entry.timestamp),
            ]);
        }
    }

    Ok(())
}

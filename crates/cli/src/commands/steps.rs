//! Walkthrough step commands

use anyhow::Result;
use dashboard_lib::{models::StepCompletion, steps::LAST_STEP, DemoApi, HttpDemoApi};

use super::accepted;
use crate::output::{print_info, print_json, print_success, OutputFormat};

fn report(step_id: u32, completion: &StepCompletion, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(completion)?,
        OutputFormat::Table => {
            print_success(&format!("Step {} completed", step_id));
            if completion.current_step > LAST_STEP {
                print_success("🎉 ALL STEPS COMPLETED! 🎉");
            } else {
                print_info(&format!("Current step is now {}", completion.current_step));
            }
        }
    }
    Ok(())
}

/// Mark a step as completed
pub async fn complete(client: &HttpDemoApi, step_id: u32, format: OutputFormat) -> Result<()> {
    let completion = client.complete_step(step_id).await?;
    accepted(completion.success, None)?;
    report(step_id, &completion, format)
}

/// Complete whichever step the server says is current
pub async fn complete_current(client: &HttpDemoApi, format: OutputFormat) -> Result<()> {
    let current = client.status().await?.current_step;
    if current > LAST_STEP {
        print_success("All steps completed! 🎉");
        return Ok(());
    }

    complete(client, current, format).await
}

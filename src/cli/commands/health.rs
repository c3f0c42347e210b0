//! Health Command
//!
//! Check both AI services.

use crate::cli::util::CommandContext;
use crate::types::{PhotomonixError, Result};

pub async fn run(ctx: &CommandContext, json: bool) -> Result<()> {
    let report = ctx.health_checker()?.check().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        ctx.output.header("Service health");
        ctx.output.health(&report.suggestion);
        ctx.output.health(&report.generation);
    }

    if report.all_healthy() {
        Ok(())
    } else {
        Err(PhotomonixError::Service(
            "One or more services are offline".to_string(),
        ))
    }
}

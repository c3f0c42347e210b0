//! Suggest Command
//!
//! Analyze an image and print categorized enhancement ideas.
//!
//! Usage:
//!   photomonix suggest <IMAGE> [--json]

use std::path::Path;

use crate::cli::util::{CommandContext, format_file_size, read_image};
use crate::types::Result;

pub async fn run(ctx: &CommandContext, image_path: &Path, json: bool) -> Result<()> {
    let image = read_image(image_path).await?;
    let enhancer = ctx.enhancer()?;

    ctx.output.info(&format!(
        "Analyzing {} ({})",
        image.name,
        format_file_size(image.len())
    ));

    let suggestions = enhancer.suggestions(&image).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
        return Ok(());
    }

    ctx.output.header("Suggested enhancements");
    for (category, ideas) in suggestions.categories() {
        ctx.output.section(category);
        for idea in ideas {
            ctx.output.item(idea);
        }
    }
    ctx.output.success(&format!(
        "{} suggestions in {} categories",
        suggestions.total(),
        suggestions.0.len()
    ));
    Ok(())
}

//! Options Command
//!
//! List the enhancement categories and options that can be passed to
//! `generate -o Category=Option`.

use crate::catalog::{ENHANCEMENT_CATEGORIES, category_options, total_options};
use crate::cli::util::CommandContext;
use crate::types::{PhotomonixError, Result};

pub fn run(ctx: &CommandContext, category: Option<&str>) -> Result<()> {
    if let Some(name) = category {
        let options = category_options(name);
        if options.is_empty() {
            return Err(PhotomonixError::validation(format!(
                "Unknown category '{}'",
                name
            )));
        }
        ctx.output.section(name);
        for option in options {
            ctx.output.item(option);
        }
        return Ok(());
    }

    ctx.output.header("Enhancement options");
    for entry in ENHANCEMENT_CATEGORIES {
        ctx.output.section(entry.name);
        for option in entry.options {
            ctx.output.item(option);
        }
    }
    ctx.output.info(&format!(
        "{} options in {} categories",
        total_options(),
        ENHANCEMENT_CATEGORIES.len()
    ));
    Ok(())
}

//! Generate Command
//!
//! Produce enhanced variants of an image and save them as PNG files.
//!
//! Usage:
//!   photomonix generate <IMAGE> -o Background="Studio background" \
//!       -o Lighting="Soft box lighting" [--notes TEXT] [--out DIR]

use std::path::PathBuf;

use secrecy::SecretString;

use crate::cli::progress::ConsoleProgress;
use crate::cli::util::{CommandContext, read_image, write_images};
use crate::types::{GenerationRequest, Result, SelectedOptions};

pub struct GenerateOptions {
    pub image: PathBuf,
    /// `Category=Option` pairs
    pub options: Vec<String>,
    pub notes: Option<String>,
    pub out: PathBuf,
    /// Tokens to record against the user after a successful run
    pub track_tokens: Option<u64>,
    pub access_token: Option<SecretString>,
}

pub async fn run(ctx: &CommandContext, opts: GenerateOptions) -> Result<()> {
    let mut selected = SelectedOptions::new();
    for pair in &opts.options {
        let (category, option) = SelectedOptions::parse_pair(pair)?;
        selected.select(category, option);
    }

    let image = read_image(&opts.image).await?;
    let request =
        GenerationRequest::new(image, selected).with_notes(opts.notes.unwrap_or_default());
    let enhancer = ctx.enhancer()?;

    let progress = ConsoleProgress::new("Generating").enabled(!ctx.quiet);
    let result = enhancer.generate(&request, Some(progress.callback())).await;
    progress.finish();
    let result = result?;

    if result.images.is_empty() {
        ctx.output.warning("The service returned no images");
        return Ok(());
    }

    let written = write_images(&opts.out, &result.images).await?;
    ctx.output
        .success(&format!("Generated {} image(s)", written.len()));
    for path in &written {
        ctx.output.item(&path.display().to_string());
    }
    if !result.enh_text.is_empty() {
        ctx.output.field("Enhancements", &result.enh_text);
    }

    match (opts.track_tokens, opts.access_token.as_ref()) {
        (Some(tokens), Some(access_token)) => {
            let usage = ctx.token_tracker()?.track(tokens, access_token).await;
            ctx.output.field(
                "Tokens",
                &format!(
                    "{} used, {} remaining of {}",
                    usage.tokens_used, usage.tokens_remaining, usage.total_tokens
                ),
            );
        }
        (Some(_), None) => ctx
            .output
            .warning("Token usage not recorded: no access token given"),
        _ => {}
    }

    Ok(())
}

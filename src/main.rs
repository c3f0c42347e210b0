use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photomonix::cli::CommandContext;
use photomonix::cli::commands::auth::AuthAction;
use photomonix::cli::commands::generate::GenerateOptions;
use secrecy::SecretString;

#[derive(Parser)]
#[command(name = "photomonix")]
#[command(version, about = "AI image enhancement from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze an image and list suggested enhancements
    Suggest {
        #[arg(help = "Image to analyze (JPEG, PNG or WebP)")]
        image: PathBuf,
        #[arg(long, help = "Print suggestions as JSON")]
        json: bool,
    },

    /// Generate enhanced variants of an image
    Generate {
        #[arg(help = "Image to enhance (JPEG, PNG or WebP)")]
        image: PathBuf,
        #[arg(
            short = 'o',
            long = "option",
            value_name = "CATEGORY=OPTION",
            help = "Enhancement to apply, repeatable"
        )]
        options: Vec<String>,
        #[arg(long, help = "Free-text reference notes (max 1000 characters)")]
        notes: Option<String>,
        #[arg(long, default_value = ".", help = "Directory for generated images")]
        out: PathBuf,
        #[arg(long, value_name = "N", help = "Record N tokens against your account")]
        track_tokens: Option<u64>,
        #[arg(long, env = "PHOTOMONIX_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,
    },

    /// Check that the AI services are reachable
    Health {
        #[arg(long, help = "Print the report as JSON")]
        json: bool,
    },

    /// List available enhancement categories and options
    Options {
        #[arg(help = "Only show this category")]
        category: Option<String>,
    },

    /// Account management
    Auth {
        #[command(subcommand)]
        action: AuthCommand,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AuthCommand {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "PHOTOMONIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "PHOTOMONIX_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, help = "Print the access token to stdout")]
        show_token: bool,
    },
    /// Sign out
    Logout {
        #[arg(long, env = "PHOTOMONIX_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },
    /// Confirm an email address with the emailed token
    VerifyEmail { token: String },
    /// Send the verification email again
    ResendVerification {
        #[arg(long)]
        email: String,
    },
    /// Request a password reset email
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using the emailed reset token
    ResetPassword {
        token: String,
        #[arg(long, env = "PHOTOMONIX_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show your profile
    Profile {
        #[arg(long, env = "PHOTOMONIX_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Write the default global configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ Something went wrong ━━━\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        eprintln!("\n\x1b[33mPlease try again. If the problem persists, rerun with --verbose.\x1b[0m");
        eprintln!();

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn secret(value: String) -> SecretString {
    SecretString::from(value)
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Config commands run without a command context
    if let Commands::Config { action } = &cli.command {
        match action {
            ConfigAction::Show { format } => photomonix::cli::commands::config::show(format)?,
            ConfigAction::Path => photomonix::cli::commands::config::path()?,
            ConfigAction::Init { force } => photomonix::cli::commands::config::init(*force)?,
        }
        return Ok(());
    }

    let ctx = CommandContext::load(cli.quiet)?;
    let rt = Runtime::new()?;

    match cli.command {
        Commands::Suggest { image, json } => {
            rt.block_on(photomonix::cli::commands::suggest::run(&ctx, &image, json))?;
        }
        Commands::Generate {
            image,
            options,
            notes,
            out,
            track_tokens,
            access_token,
        } => {
            rt.block_on(photomonix::cli::commands::generate::run(
                &ctx,
                GenerateOptions {
                    image,
                    options,
                    notes,
                    out,
                    track_tokens,
                    access_token: access_token.map(secret),
                },
            ))?;
        }
        Commands::Health { json } => {
            rt.block_on(photomonix::cli::commands::health::run(&ctx, json))?;
        }
        Commands::Options { category } => {
            photomonix::cli::commands::options::run(&ctx, category.as_deref())?;
        }
        Commands::Auth { action } => {
            let action = match action {
                AuthCommand::Register {
                    name,
                    email,
                    password,
                } => AuthAction::Register {
                    name,
                    email,
                    password: secret(password),
                },
                AuthCommand::Login {
                    email,
                    password,
                    show_token,
                } => AuthAction::Login {
                    email,
                    password: secret(password),
                    show_token,
                },
                AuthCommand::Logout { access_token } => AuthAction::Logout {
                    access_token: secret(access_token),
                },
                AuthCommand::VerifyEmail { token } => AuthAction::VerifyEmail { token },
                AuthCommand::ResendVerification { email } => {
                    AuthAction::ResendVerification { email }
                }
                AuthCommand::ForgotPassword { email } => AuthAction::ForgotPassword { email },
                AuthCommand::ResetPassword { token, password } => AuthAction::ResetPassword {
                    token,
                    password: secret(password),
                },
                AuthCommand::Profile { access_token } => AuthAction::Profile {
                    access_token: secret(access_token),
                },
            };
            rt.block_on(photomonix::cli::commands::auth::run(&ctx, action))?;
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

//! Auth Commands
//!
//! Account management against the auth service. Sessions are not persisted
//! between invocations; commands that need a session take the access token
//! explicitly.

use secrecy::{ExposeSecret, SecretString};

use crate::api::{AuthClient, Credentials, Registration};
use crate::cli::util::CommandContext;
use crate::types::{AuthResponse, PhotomonixError, Result};

pub enum AuthAction {
    Register {
        name: String,
        email: String,
        password: SecretString,
    },
    Login {
        email: String,
        password: SecretString,
        show_token: bool,
    },
    Logout {
        access_token: SecretString,
    },
    VerifyEmail {
        token: String,
    },
    ResendVerification {
        email: String,
    },
    ForgotPassword {
        email: String,
    },
    ResetPassword {
        token: String,
        password: SecretString,
    },
    Profile {
        access_token: SecretString,
    },
}

pub async fn run(ctx: &CommandContext, action: AuthAction) -> Result<()> {
    let client = ctx.auth_client()?;

    match action {
        AuthAction::Register {
            name,
            email,
            password,
        } => {
            let registration = Registration {
                name,
                email,
                password: password.expose_secret().to_string(),
            };
            let response = client.register(&registration).await?;
            report(ctx, &response)?;
            if response.requires_verification.unwrap_or(false) {
                ctx.output
                    .info("Check your inbox and run `photomonix auth verify-email <TOKEN>`");
            }
        }
        AuthAction::Login {
            email,
            password,
            show_token,
        } => {
            let credentials = Credentials {
                email,
                password: password.expose_secret().to_string(),
            };
            let response = client.login(&credentials).await?;
            report(ctx, &response)?;
            print_session(ctx, &client, show_token);
        }
        AuthAction::Logout { access_token } => {
            client.set_access_token(access_token.expose_secret());
            report(ctx, &client.logout().await?)?;
        }
        AuthAction::VerifyEmail { token } => {
            let response = client.verify_email(&token).await?;
            report(ctx, &response)?;
            print_session(ctx, &client, false);
        }
        AuthAction::ResendVerification { email } => {
            report(ctx, &client.resend_verification(&email).await?)?;
        }
        AuthAction::ForgotPassword { email } => {
            report(ctx, &client.forgot_password(&email).await?)?;
        }
        AuthAction::ResetPassword { token, password } => {
            let password = password.expose_secret();
            let response = client
                .reset_password_with_token(&token, password, password)
                .await?;
            report(ctx, &response)?;
        }
        AuthAction::Profile { access_token } => {
            client.set_access_token(access_token.expose_secret());
            let response = client.profile().await?;
            report(ctx, &response)?;
            if let Some(profile) = response.profile() {
                ctx.output.field("Name", &profile.name);
                ctx.output.field("Email", &profile.email);
                ctx.output.field("Member since", &profile.created_at);
            }
        }
    }

    Ok(())
}

/// Print the outcome; unsuccessful responses become errors
fn report(ctx: &CommandContext, response: &AuthResponse) -> Result<()> {
    if response.success {
        ctx.output.success(response.summary());
        Ok(())
    } else {
        Err(PhotomonixError::Auth(response.summary().to_string()))
    }
}

fn print_session(ctx: &CommandContext, client: &AuthClient, show_token: bool) {
    if let Some(user) = client.user() {
        ctx.output
            .field("Signed in", &format!("{} <{}>", user.name, user.email));
    }
    if show_token && let Some(token) = client.access_token() {
        println!("{}", token.expose_secret());
    }
}

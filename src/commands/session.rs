//! Session CLI commands.

use clap::Args;

use pulsewatch_core::error::AppError;
use pulsewatch_entity::user::LoginCredentials;

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,

    /// Account password
    #[arg(short, long, env = "PULSEWATCH_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Sign in.
pub async fn login(ctx: &AppContext, args: &LoginArgs, format: OutputFormat) -> Result<(), AppError> {
    // A stale stored token is replaced by the new login.
    if ctx.session.restore().await.ok().flatten().is_some() {
        ctx.session.logout().await?;
    }

    let user = ctx
        .session
        .login(LoginCredentials::new(&args.email, &args.password))
        .await?;

    output::print_success(&format!("Signed in as {} ({})", user.email, user.role));
    if format == OutputFormat::Json {
        output::print_item(&user, format);
    }
    Ok(())
}

/// Sign out.
pub async fn logout(ctx: &AppContext) -> Result<(), AppError> {
    if ctx.session.restore().await?.is_none() {
        output::print_warning("No active session");
        return Ok(());
    }
    ctx.session.logout().await?;
    output::print_success("Signed out");
    Ok(())
}

/// Show the signed-in user.
pub async fn whoami(ctx: &AppContext, format: OutputFormat) -> Result<(), AppError> {
    let user = ctx.resume().await?;
    output::print_item(&user, format);

    if format == OutputFormat::Table {
        let granted: Vec<&str> = ctx
            .session
            .permissions()
            .granted()
            .into_iter()
            .map(|cap| cap.as_str())
            .collect();
        output::print_kv("capabilities", &granted.join(", "));
    }
    Ok(())
}

/// Refresh the stored token.
pub async fn refresh(ctx: &AppContext) -> Result<(), AppError> {
    ctx.resume().await?;
    ctx.session.refresh().await?;
    output::print_success("Session refreshed");
    Ok(())
}

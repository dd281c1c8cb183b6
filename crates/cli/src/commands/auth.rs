//! `login`, `register`, `logout`, `whoami`.

use clap::Args;
use secrecy::SecretString;
use stockroom_storefront::AppContext;
use stockroom_storefront::api::{Credentials, Registration};

use super::CliError;
use crate::output;

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    email: String,

    /// Account password
    #[arg(long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// Account email
    #[arg(short, long)]
    email: String,

    /// Account password
    #[arg(long, env = "STOCKROOM_PASSWORD", hide_env_values = true)]
    password: String,
}

pub async fn login(ctx: &mut AppContext, args: LoginArgs) -> Result<(), CliError> {
    let credentials = Credentials {
        email: args.email.trim().to_owned(),
        password: SecretString::from(args.password),
    };
    let role = ctx.login(&credentials).await?;
    tracing::debug!(%role, "Logged in");
    if let Some(profile) = ctx.auth.session().profile() {
        output::profile(profile);
    }
    Ok(())
}

pub async fn register(ctx: &mut AppContext, args: RegisterArgs) -> Result<(), CliError> {
    if args.name.trim().is_empty() {
        return Err(CliError::InvalidInput("Name is required".to_owned()));
    }
    let registration = Registration {
        name: args.name.trim().to_owned(),
        email: args.email.trim().to_owned(),
        password: SecretString::from(args.password),
    };
    ctx.register(&registration).await?;
    if let Some(profile) = ctx.auth.session().profile() {
        output::profile(profile);
    }
    Ok(())
}

pub fn logout(ctx: &mut AppContext) {
    let next = ctx.logout();
    tracing::debug!(next, "Logged out");
}

pub fn whoami(ctx: &AppContext) {
    match ctx.auth.session().profile() {
        Some(profile) => output::profile(profile),
        None => output::line("Not logged in."),
    }
}

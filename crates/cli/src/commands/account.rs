//! Login, registration, and session commands.

use clap::Args;

use bazaar_storefront::services::{LoginForm, RegisterForm};
use bazaar_storefront::{AppState, StorefrontError};

use crate::output;

#[derive(Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    email: String,

    /// Account password
    #[arg(short, long)]
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
    #[arg(short, long)]
    password: String,
}

pub async fn login(state: &AppState, args: LoginArgs) -> Result<(), StorefrontError> {
    let form = LoginForm {
        email: args.email,
        password: args.password,
    };
    let redirect = state.auth().login(&form).await?;
    output::line(format!("Logged in. Next: {redirect}"));
    if redirect == "/admin" {
        output::line("Try: bazaar admin dashboard");
    }
    Ok(())
}

pub async fn register(state: &AppState, args: RegisterArgs) -> Result<(), StorefrontError> {
    let form = RegisterForm {
        name: args.name,
        email: args.email,
        password: args.password,
    };
    state.auth().register(&form).await?;
    output::line("Registered. Log in with: bazaar login -e <email> -p <password>");
    Ok(())
}

pub fn logout(state: &AppState) -> Result<(), StorefrontError> {
    state.auth().logout()?;
    output::line("Logged out.");
    Ok(())
}

pub fn whoami(state: &AppState) {
    let session = state.session();
    let status = match (session.is_logged_in(), session.is_admin()) {
        (false, _) => "Not logged in.",
        (true, false) => "Logged in.",
        (true, true) => "Logged in as admin.",
    };
    output::line(status);
}

// src/cli/auth.rs

//! `strato auth` subcommands.

use crate::cli::client::ApiClient;
use crate::cli::credentials::CredentialStore;
use crate::cli::{AuthCommand, prompt, prompt_password};
use anyhow::Result;

pub async fn run(cmd: AuthCommand, api: &ApiClient, store: &CredentialStore) -> Result<()> {
    match cmd {
        AuthCommand::Login { user, one_time } => login(api, store, user, one_time).await,
        AuthCommand::Logout => logout(store),
    }
}

async fn login(
    api: &ApiClient,
    store: &CredentialStore,
    user: Option<String>,
    one_time: bool,
) -> Result<()> {
    let user = match user.or_else(|| store.username()) {
        Some(user) => user,
        None => prompt("Enter your username")?,
    };
    let password = prompt_password("Enter your password")?;

    println!("Logging in as {user}...");
    let response = api.login(&user, &password).await?;

    if !one_time {
        store.save_login(
            &user,
            &response.access_token,
            response.expires_at,
            &response.user_permissions,
        )?;
    }
    println!("Login successful!");
    Ok(())
}

fn logout(store: &CredentialStore) -> Result<()> {
    store.clear()?;
    println!("Logged out successfully.");
    Ok(())
}

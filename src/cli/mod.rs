// src/cli/mod.rs

//! The `strato` command-line client.

mod client;
pub mod credentials;

mod auth;
mod dns_zone;
mod ec2;
mod s3;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::ApiClient;
use credentials::CredentialStore;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "strato",
    version,
    about = "Strato CLI - Manage your cloud resources."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and out of the Strato backend.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Manage compute instances.
    #[command(subcommand)]
    Ec2(Ec2Command),
    /// Manage object-storage buckets.
    #[command(subcommand)]
    S3(S3Command),
    /// Manage DNS zones.
    #[command(subcommand, name = "dns-zone")]
    DnsZone(DnsZoneCommand),
}

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Log in interactively. Prompts for anything not given as a flag.
    Login {
        /// Username for login.
        #[arg(short = 'u', long = "user")]
        user: Option<String>,
        /// One-time login (do not save credentials).
        #[arg(short = 'o')]
        one_time: bool,
    },
    /// Log out and clear stored credentials.
    Logout,
}

#[derive(Subcommand)]
pub enum Ec2Command {
    /// Launch a new instance.
    Create {
        /// AMI ID or name.
        #[arg(long)]
        ami: Option<String>,
        /// Instance type.
        #[arg(short = 't', long = "type")]
        instance_type: Option<String>,
        /// Name for the instance.
        #[arg(short = 'n', long)]
        name: Option<String>,
    },
    /// List your instances.
    List,
    /// Terminate an instance.
    Delete {
        /// Name or ID of the instance to delete.
        instance: String,
    },
    /// Start a stopped instance.
    Start {
        /// Name or ID of the instance to start.
        instance: String,
    },
    /// Stop a running instance.
    Stop {
        /// Name or ID of the instance to stop.
        instance: String,
    },
}

#[derive(Subcommand)]
pub enum S3Command {
    /// Create a bucket.
    Create {
        /// Name of the bucket.
        #[arg(short = 'n', long)]
        name: Option<String>,
        /// Make the bucket publicly accessible.
        #[arg(long)]
        public: bool,
    },
    /// List your buckets.
    List,
    /// Delete a bucket.
    Delete {
        /// Name of the bucket to delete.
        bucket: String,
    },
    /// Upload a local file into a bucket.
    Upload {
        /// Name of the target bucket.
        bucket: String,
        /// Object key to store the file under.
        key: String,
        /// Path of the local file to upload.
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum DnsZoneCommand {
    /// Create a DNS zone.
    Create {
        /// Name of the DNS zone to create.
        name: String,
    },
    /// Delete a DNS zone.
    Delete {
        /// Name or zone ID of the DNS zone to delete.
        zone: String,
    },
    /// List your DNS zones.
    List,
}

/// Runs the parsed CLI command.
pub async fn run(cli: Cli) -> Result<()> {
    let store = CredentialStore::open()?;
    let api = ApiClient::new(client::backend_url());

    let Some(command) = cli.command else {
        banner(&store);
        return Ok(());
    };

    match command {
        Command::Auth(cmd) => auth::run(cmd, &api, &store).await,
        Command::Ec2(cmd) => ec2::run(cmd, &api, &store).await,
        Command::S3(cmd) => s3::run(cmd, &api, &store).await,
        Command::DnsZone(cmd) => dns_zone::run(cmd, &api, &store).await,
    }
}

/// Shown when the CLI is invoked without a subcommand.
fn banner(store: &CredentialStore) {
    println!("Strato CLI v{}", env!("CARGO_PKG_VERSION"));
    println!("Configured to use Backend: {}", client::backend_url());
    match store.username() {
        Some(user) if store.token().is_ok() => println!("Logged in as: {user}"),
        _ => println!("Not logged in. Run 'strato auth login' to log in."),
    }
}

/// Prompts on stdout and reads one trimmed line from stdin.
fn prompt(label: &str) -> Result<String> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Prompts for a password with terminal echo suppressed.
fn prompt_password(label: &str) -> Result<String> {
    Ok(rpassword::prompt_password(format!("{label}: "))?)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    // Pins the password reader rpassword falls back to under piped stdin:
    // one line, trailing newline stripped, nothing echoed back.
    #[test]
    fn test_password_reader_strips_the_line_ending() {
        let mut input = Cursor::new("hunter2\n");
        let password = rpassword::read_password_from_bufread(&mut input).unwrap();
        assert_eq!(password, "hunter2");
    }
}

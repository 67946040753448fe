// src/cli/s3.rs

//! `strato s3` subcommands.

use crate::cli::client::ApiClient;
use crate::cli::credentials::CredentialStore;
use crate::cli::{S3Command, prompt};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub async fn run(cmd: S3Command, api: &ApiClient, store: &CredentialStore) -> Result<()> {
    match cmd {
        S3Command::Create { name, public } => create(api, store, name, public).await,
        S3Command::List => list(api, store).await,
        S3Command::Delete { bucket } => {
            let token = store.token()?;
            println!("Requesting deletion of bucket '{bucket}'...");
            let response = api.s3_delete(&token, &bucket).await?;
            println!("Bucket '{}' deleted successfully.", response.bucket_name);
            Ok(())
        }
        S3Command::Upload { bucket, key, file } => upload(api, store, bucket, key, file).await,
    }
}

async fn create(
    api: &ApiClient,
    store: &CredentialStore,
    name: Option<String>,
    public: bool,
) -> Result<()> {
    let token = store.token()?;
    let name = match name {
        Some(name) => name,
        None => prompt("Enter a name for the bucket")?,
    };
    if public {
        let confirmation =
            prompt("Are you sure you want to make the bucket publicly accessible? [y/N]")?;
        if !confirmation.eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    println!("Requesting creation of bucket '{name}'...");
    let response = api.s3_create(&token, &name, public).await?;
    println!("Bucket {} created successfully.", response.bucket_name);
    if let Some(url) = response.url {
        println!("Bucket's URL: {url}");
    }
    Ok(())
}

async fn list(api: &ApiClient, store: &CredentialStore) -> Result<()> {
    let token = store.token()?;
    println!("Requesting S3 buckets list...");
    let response = api.s3_list(&token).await?;

    if response.buckets.is_empty() {
        println!(
            "No S3 buckets found (Note: you can only see buckets \
             that are owned by you and managed by Strato)."
        );
        return Ok(());
    }

    println!("\nYour S3 buckets:");
    println!("{}", "-".repeat(40));
    for bucket in response.buckets {
        println!("{}", bucket.name);
    }
    Ok(())
}

async fn upload(
    api: &ApiClient,
    store: &CredentialStore,
    bucket: String,
    key: String,
    file: PathBuf,
) -> Result<()> {
    let token = store.token()?;
    // Raw bytes: uploads are not restricted to text files.
    let content = std::fs::read(&file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;

    println!("Uploading '{}' to bucket '{bucket}'...", file.display());
    let response = api.s3_upload(&token, &bucket, &key, &content).await?;
    println!(
        "Object '{}' uploaded to bucket '{}'.",
        response.key, response.bucket_name
    );
    Ok(())
}

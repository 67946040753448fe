// src/cli/dns_zone.rs

//! `strato dns-zone` subcommands.

use crate::cli::DnsZoneCommand;
use crate::cli::client::ApiClient;
use crate::cli::credentials::CredentialStore;
use anyhow::Result;

pub async fn run(cmd: DnsZoneCommand, api: &ApiClient, store: &CredentialStore) -> Result<()> {
    let token = store.token()?;
    match cmd {
        DnsZoneCommand::Create { name } => {
            let result = api.zone_create(&token, &name).await?;
            println!("DNS zone '{}' created successfully", result.zone_id);
        }
        DnsZoneCommand::Delete { zone } => {
            let result = api.zone_delete(&token, &zone).await?;
            println!("DNS zone '{}' deleted successfully.", result.zone_id);
        }
        DnsZoneCommand::List => {
            let result = api.zone_list(&token).await?;
            if result.zones.is_empty() {
                println!("No DNS zones found.");
                return Ok(());
            }
            println!("Your DNS zones:");
            for zone in result.zones {
                println!("{} ({})", zone.name, zone.zone_id);
            }
        }
    }
    Ok(())
}

// src/cli/ec2.rs

//! `strato ec2` subcommands.

use crate::cli::client::ApiClient;
use crate::cli::credentials::CredentialStore;
use crate::cli::{Ec2Command, prompt};
use anyhow::Result;
use tabled::{Table, Tabled};

pub async fn run(cmd: Ec2Command, api: &ApiClient, store: &CredentialStore) -> Result<()> {
    match cmd {
        Ec2Command::Create {
            ami,
            instance_type,
            name,
        } => create(api, store, ami, instance_type, name).await,
        Ec2Command::List => list(api, store).await,
        Ec2Command::Delete { instance } => {
            println!("Requesting deletion of EC2 instance {instance}...");
            let token = store.token()?;
            let status = api.ec2_delete(&token, &instance).await?;
            println!("Instance {} is now {}.", status.instance_id, status.status);
            Ok(())
        }
        Ec2Command::Start { instance } => {
            println!("Requesting to start EC2 instance {instance}...");
            let token = store.token()?;
            let status = api.ec2_start(&token, &instance).await?;
            println!("Instance {} is now {}.", status.instance_id, status.status);
            Ok(())
        }
        Ec2Command::Stop { instance } => {
            println!("Requesting to stop EC2 instance {instance}...");
            let token = store.token()?;
            let status = api.ec2_stop(&token, &instance).await?;
            println!("Instance {} is now {}.", status.instance_id, status.status);
            Ok(())
        }
    }
}

async fn create(
    api: &ApiClient,
    store: &CredentialStore,
    ami: Option<String>,
    instance_type: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let token = store.token()?;
    // The cached snapshot drives the interactive choices; the server
    // re-evaluates the live permissions on every create.
    let permissions = store.permissions();

    let instance_type = match instance_type {
        Some(t) => t,
        None => {
            println!("Please choose an instance type.");
            println!("Available instance types:");
            for available in &permissions.allowed_instance_types {
                println!("{available}");
            }
            prompt("Enter the instance type")?
        }
    };

    let ami = match ami {
        Some(ami) => ami,
        None => {
            println!("Please choose an AMI.");
            println!("Available AMIs:");
            for (alias, id) in &permissions.ami_choices {
                println!("{alias}: {id}");
            }
            prompt("AMI ID or name")?
        }
    };

    let name = match name {
        Some(name) => name,
        None => prompt("Enter a name for the EC2 instance")?,
    };

    println!("Launching EC2 instance...");
    let response = api.ec2_create(&token, &name, &instance_type, &ami).await?;
    println!(
        "EC2 instance {} created successfully.",
        response.instance_id
    );
    println!("Public IP: {}", response.instance_public_ip);
    Ok(())
}

#[derive(Tabled)]
struct InstanceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Instance ID")]
    instance_id: String,
    #[tabled(rename = "Public IP Address")]
    public_ip: String,
    #[tabled(rename = "State")]
    state: String,
}

async fn list(api: &ApiClient, store: &CredentialStore) -> Result<()> {
    let token = store.token()?;
    println!("Requesting EC2 instances list...");
    let response = api.ec2_list(&token).await?;

    if let Some(user) = store.username() {
        println!("EC2 instances for user {user}:");
    }
    let rows: Vec<InstanceRow> = response
        .instances
        .into_iter()
        .map(|instance| InstanceRow {
            name: instance.name,
            instance_id: instance.instance_id,
            public_ip: instance.public_ip,
            state: instance.state,
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

//! Secret Santa CLI client

mod client;
mod messages;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::messages::{DeliveryOutcome, DeliveryReport, Participant};

#[derive(Parser)]
#[command(name = "santa-cli")]
#[command(about = "CLI client for the Secret Santa organizer")]
#[command(version)]
struct Cli {
    /// Server URL (default: ws://localhost:3000/ws)
    #[arg(short, long, default_value = "ws://localhost:3000/ws")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register participants, assign Secret Santas and send notifications
    Organize {
        /// Participant as NAME=PHONE (repeat for each person)
        #[arg(short, long = "participant", value_parser = parse_participant, required = true)]
        participants: Vec<(String, String)>,
    },
}

/// Split `NAME=PHONE` at the last `=`
fn parse_participant(value: &str) -> std::result::Result<(String, String), String> {
    match value.rsplit_once('=') {
        Some((name, phone)) => Ok((name.trim().to_string(), phone.trim().to_string())),
        None => Err(format!("expected NAME=PHONE, got '{}'", value)),
    }
}

fn validate_server(server: &str) -> Result<()> {
    let url = url::Url::parse(server)?;
    match url.scheme() {
        "ws" | "wss" => Ok(()),
        other => Err(anyhow!("Server URL must use ws or wss, got {}", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "santa_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();
    validate_server(&cli.server)?;

    match cli.command {
        Commands::Organize { participants } => run_organize(&cli.server, &participants).await,
    }
}

async fn run_organize(server: &str, participants: &[(String, String)]) -> Result<()> {
    let mut client = client::SantaClient::connect(server).await?;

    for (name, phone) in participants {
        let added = client.add_participant(name, phone).await?;
        println!("{} added with phone number {}", added.name, added.phone);
    }

    let roster = client.list_participants().await?;
    println!("{} participants registered", roster.len());

    let report = client.assign(print_assignment).await?;
    print_report(&report);

    if report
        .deliveries
        .iter()
        .any(|d| matches!(d.outcome, DeliveryOutcome::Failed { .. }))
    {
        println!("Secret Santas assigned; some notifications failed.");
    } else {
        println!("Secret Santas assigned and notifications sent!");
    }

    Ok(())
}

fn print_assignment(participants: &[Participant]) {
    println!("Assignments:");
    println!("{:─<60}", "");
    for participant in participants {
        println!(
            "  {} -> {}",
            participant.name,
            participant.assigned_to.as_deref().unwrap_or("?")
        );
    }
}

fn print_report(report: &DeliveryReport) {
    println!("Notifications:");
    println!("{:─<60}", "");
    for delivery in &report.deliveries {
        match &delivery.outcome {
            DeliveryOutcome::Sent { receipt } => println!(
                "  sent    {} ({}) {}",
                delivery.name,
                delivery.phone,
                receipt.sid.as_deref().unwrap_or("")
            ),
            DeliveryOutcome::Failed { error } => println!(
                "  FAILED  {} ({}) {}",
                delivery.name, delivery.phone, error
            ),
        }
    }
}

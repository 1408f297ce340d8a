use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bench-cli")]
#[command(about = "Client for the bench-orchestrator HTTP endpoints", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service and database health
    Health,
    /// Fetch the composite profile of a user
    Profile {
        email: String,
    },
    /// Aggregate an order batch read from a JSON file
    Aggregate {
        /// File containing `{"orders": [...]}`
        file: PathBuf,
        /// Correlation token sent as `x-client-id`
        #[arg(long)]
        client_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            let status = res.status();
            println!("{} {}", status, res.text().await?);
        }
        Commands::Profile { email } => {
            let res = client
                .get(format!("{}/db/user-profile/{}", cli.url, email))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Aggregate { file, client_id } => {
            let body = std::fs::read(&file)?;
            let mut req = client
                .post(format!("{}/analytics/aggregate", cli.url))
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
            if let Some(client_id) = client_id {
                req = req.header("x-client-id", client_id);
            }
            print_response(req.send().await?).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if let Some(id) = res.headers().get("x-request-id").and_then(|v| v.to_str().ok()) {
        eprintln!("x-request-id: {}", id);
    }
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

use clap::{Parser, Subcommand};
use reqwest::{Client, Response, Url};
use serde_json::json;
use std::error::Error;

#[derive(Parser)]
#[command(name = "ler-cli")]
#[command(about = "Lead Enrichment Router CLI", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich an email address or domain
    Enrich {
        #[arg(value_name = "EMAIL_OR_DOMAIN")]
        input: String,
    },

    /// Check whether input is a valid email or domain
    Validate {
        #[arg(value_name = "INPUT")]
        input: String,
    },

    /// Search for leads with a natural-language description
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// Use the direct lookup instead of AI mode
        #[arg(long)]
        no_ai: bool,
    },

    /// List enrichment history
    History {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show one history entry
    HistoryGet {
        #[arg(value_name = "HISTORY_ID")]
        id: String,
    },

    /// Search history inputs
    HistorySearch {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// Show history size and capacity
    HistoryStats,

    /// Delete all history
    ClearHistory,

    /// Check server health
    Health,
}

/// Endpoint URL with percent-encoded path segments appended
fn url(endpoint: &str, segments: &[&str]) -> Result<Url, Box<dyn Error>> {
    let mut url = Url::parse(endpoint)?;
    url.path_segments_mut()
        .map_err(|_| format!("Endpoint cannot be a base URL: {}", endpoint))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_body(response: Response) -> Result<(), Box<dyn Error>> {
    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let endpoint = cli.endpoint.as_str();

    let response = match cli.command {
        Commands::Enrich { input } => {
            client
                .post(url(endpoint, &["api", "enrich"])?)
                .json(&json!({ "input_data": input }))
                .send()
                .await?
        }

        Commands::Validate { input } => {
            client
                .get(url(endpoint, &["api", "enrich", "validate", &input])?)
                .send()
                .await?
        }

        Commands::Search { query, no_ai } => {
            client
                .post(url(endpoint, &["api", "ai", "enrich"])?)
                .json(&json!({
                    "input": query,
                    "use_ai_agent": !no_ai,
                }))
                .send()
                .await?
        }

        Commands::History { limit } => {
            let mut request = client.get(url(endpoint, &["api", "history"])?);
            if let Some(limit) = limit {
                request = request.query(&[("limit", limit)]);
            }
            request.send().await?
        }

        Commands::HistoryGet { id } => {
            client
                .get(url(endpoint, &["api", "history", &id])?)
                .send()
                .await?
        }

        Commands::HistorySearch { query } => {
            client
                .get(url(endpoint, &["api", "history", "search", &query])?)
                .send()
                .await?
        }

        Commands::HistoryStats => {
            client
                .get(url(endpoint, &["api", "history", "stats"])?)
                .send()
                .await?
        }

        Commands::ClearHistory => {
            client
                .delete(url(endpoint, &["api", "history"])?)
                .send()
                .await?
        }

        Commands::Health => client.get(url(endpoint, &["health"])?).send().await?,
    };

    print_body(response).await
}

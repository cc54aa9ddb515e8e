// ShopAI CLI - AI-Powered Product Recommendations

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::{Deserialize, Serialize};
use shopai_core::{load_catalog, Product};
use shopai_rank::LocalScorer;
use std::io::{self, Write};

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_CATALOG: &str = "data/catalog.json";

#[derive(Parser)]
#[command(name = "shopai")]
#[command(author = "ShopAI Team")]
#[command(version = "0.1.0")]
#[command(about = "AI-Powered Product Recommendation CLI", long_about = None)]
struct Cli {
    /// API server URL
    #[arg(short, long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API key for authentication (or set SHOPAI_API_KEY env var)
    #[arg(short = 'k', long, env = "SHOPAI_API_KEY")]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend products for a natural language query
    Recommend {
        /// What you are looking for, e.g. "laptop under 700"
        query: String,

        /// Catalog file (JSON array of products)
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        catalog: String,

        /// Rank locally without contacting the server
        #[arg(long)]
        offline: bool,
    },

    /// List the products in a catalog file
    Products {
        /// Catalog file (JSON array of products)
        #[arg(short, long, default_value = DEFAULT_CATALOG)]
        catalog: String,
    },

    /// Check server health status
    Status,
}

// API types
#[derive(Serialize)]
struct RecommendRequest<'a> {
    query: &'a str,
    products: &'a [Product],
}

#[derive(Deserialize)]
struct RecommendResponse {
    recommendations: Vec<Product>,
    #[serde(default)]
    reasoning: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    provider: Option<String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    llm_provider: Option<String>,
    #[serde(default)]
    llm_model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Build client with optional API key header
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(ref key) = cli.api_key {
        headers.insert("X-API-Key", reqwest::header::HeaderValue::from_str(key)?);
    }
    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    match cli.command {
        Commands::Recommend {
            query,
            catalog,
            offline,
        } => {
            let products = load_catalog(&catalog)?;
            if offline {
                recommend_offline(&query, &products);
            } else {
                recommend_remote(&client, &cli.api_url, &query, &products).await?;
            }
        }
        Commands::Products { catalog } => {
            let products = load_catalog(&catalog)?;
            show_products(&products);
        }
        Commands::Status => {
            check_status(&client, &cli.api_url).await?;
        }
    }

    Ok(())
}

async fn recommend_remote(
    client: &reqwest::Client,
    api_url: &str,
    query: &str,
    products: &[Product],
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{} \"{}\"", "🛒 Recommending:".cyan().bold(), query);
    println!("{}", "─".repeat(60).dimmed());

    let url = format!("{}/api/recommend", api_url);
    let response = client
        .post(&url)
        .json(&RecommendRequest { query, products })
        .send()
        .await?;

    if !response.status().is_success() {
        let error = response.text().await?;
        println!("{} {}", "Error:".red().bold(), error);
        return Ok(());
    }

    let result: RecommendResponse = response.json().await?;

    if result.recommendations.is_empty() {
        println!("{}", "No matching products.".yellow());
    } else {
        println!("{}", product_table(&result.recommendations, None));
    }

    println!("\n{}", "─".repeat(60).dimmed());
    if !result.reasoning.is_empty() {
        println!("{}", result.reasoning);
    }
    println!(
        "{} {} | {} {}",
        "Source:".dimmed(),
        result.source.as_deref().unwrap_or("unknown").cyan(),
        "Provider:".dimmed(),
        result.provider.as_deref().unwrap_or("-").cyan()
    );

    Ok(())
}

fn recommend_offline(query: &str, products: &[Product]) {
    println!("\n{} \"{}\"", "🛒 Recommending (offline):".cyan().bold(), query);
    println!("{}", "─".repeat(60).dimmed());

    let scorer = LocalScorer::new();
    let analyzed = scorer.analyzer().analyze(query);
    let ranked = scorer.rank(query, products);

    if ranked.is_empty() {
        println!("{}", "No matching products.".yellow());
    } else {
        let scores: Vec<u32> = ranked.iter().map(|s| s.score).collect();
        let items: Vec<Product> = ranked.into_iter().map(|s| s.product).collect();
        println!("{}", product_table(&items, Some(&scores)));
    }

    println!("\n{}", "─".repeat(60).dimmed());
    let terms: Vec<&str> = analyzed.terms.iter().map(String::as_str).collect();
    println!("{} {}", "Terms:".dimmed(), terms.join(", ").magenta());
    if let Some(budget) = analyzed.budget {
        println!("{} {}", "Budget:".dimmed(), format_price(budget).magenta());
    }
}

fn show_products(products: &[Product]) {
    println!("\n{}", "📦 Catalog".cyan().bold());
    println!("{}", "─".repeat(60).dimmed());

    if products.is_empty() {
        println!("{}", "Catalog is empty.".yellow());
        return;
    }
    println!("{}", product_table(products, None));
    println!("\n{} {}", "Products:".dimmed(), products.len().to_string().green());
}

async fn check_status(
    client: &reqwest::Client,
    api_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n{}", "🔧 System Status".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    print!("  API Server ({})... ", api_url);
    io::stdout().flush()?;

    match client.get(format!("{}/health", api_url)).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await?;
            println!("{} ({})", "✓ Running".green(), health.status);
            match health.llm_provider {
                Some(provider) => println!(
                    "  LLM ranking... {} ({}, {})",
                    "✓ Enabled".green(),
                    provider,
                    health.llm_model.as_deref().unwrap_or("default model")
                ),
                None => println!("  LLM ranking... {}", "local scorer only".yellow()),
            }
        }
        Ok(resp) => {
            println!("{} ({})", "✗ Error".red(), resp.status());
        }
        Err(e) => {
            println!("{} ({})", "✗ Down".red(), e);
        }
    }

    println!();
    Ok(())
}

fn product_table(products: &[Product], scores: Option<&[u32]>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["ID", "Name", "Brand", "Category", "Price"];
    if scores.is_some() {
        header.push("Score");
    }
    table.set_header(header);

    for (i, p) in products.iter().enumerate() {
        let mut row = vec![
            p.id.to_string(),
            truncate(&p.name, 32),
            p.brand_str().to_string(),
            p.category_str().to_string(),
            format_price(p.price).green().to_string(),
        ];
        if let Some(score) = scores.and_then(|s| s.get(i)) {
            row.push(score.to_string().yellow().to_string());
        }
        table.add_row(row);
    }
    table
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("${:.0}", price)
    } else {
        format!("${:.2}", price)
    }
}

// Truncate on char boundaries
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

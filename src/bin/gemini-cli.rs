use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "gemini-cli")]
#[command(about = "Command-line client for the Gemini proxy", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Proxy path the handler is mounted on
    #[arg(short, long, default_value = "/api/gemini-proxy")]
    path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a prompt through the proxy
    Prompt {
        text: String,

        /// responseMimeType for the generation config
        #[arg(long)]
        mime_type: Option<String>,

        #[arg(long)]
        temperature: Option<f64>,

        /// Print only the first candidate's text
        #[arg(long)]
        text_only: bool,
    },
    /// Check proxy health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Prompt {
            text,
            mime_type,
            temperature,
            text_only,
        } => {
            let body = json!({
                "prompt": text,
                "generationConfig": generation_config(mime_type, temperature),
            });
            let res = client
                .post(format!("{}{}", base, cli.path))
                .json(&body)
                .send()
                .await?;
            print_response(res, text_only).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res, false).await?;
        }
    }

    Ok(())
}

fn generation_config(mime_type: Option<String>, temperature: Option<f64>) -> Value {
    let mut config = Map::new();
    if let Some(mime) = mime_type {
        config.insert("responseMimeType".into(), Value::String(mime));
    }
    if let Some(t) = temperature {
        config.insert("temperature".into(), json!(t));
    }
    Value::Object(config)
}

fn first_candidate_text(value: &Value) -> Option<&str> {
    value
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
}

async fn print_response(res: reqwest::Response, text_only: bool) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: proxy returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    match first_candidate_text(&json).filter(|_| text_only) {
        Some(text) => println!("{}", text),
        None => println!("{}", serde_json::to_string_pretty(&json)?),
    }
    Ok(())
}

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;

use host_mirror::handler::{HeaderMirror, OnMissing, Outcome, HOST, X_HOST};

#[derive(Parser)]
#[command(name = "mirror-cli")]
#[command(about = "Invoke and inspect the host-mirror handler", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an event file (or `-` for stdin) to a running server
    Invoke { event: PathBuf },
    /// Run the handler in-process on an event file (or `-` for stdin)
    Local {
        event: PathBuf,
        #[arg(long, default_value = HOST)]
        source: String,
        #[arg(long, default_value = X_HOST)]
        target: String,
        #[arg(long, default_value = "reject")]
        on_missing: OnMissing,
    },
    /// Check server health
    Health,
    /// Show the server's active mirror settings
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Invoke { event } => {
            let body = read_event(&event)?;
            let res = client
                .post(format!("{}/invoke", cli.url))
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Local {
            event,
            source,
            target,
            on_missing,
        } => {
            let mirror = HeaderMirror::new(&source, &target, on_missing)?;
            match mirror.apply_json(&read_event(&event)?)? {
                Outcome::Forwarded(request) => {
                    println!("{}", serde_json::to_string_pretty(&request)?);
                }
                Outcome::Rejected(rejection) => {
                    eprintln!("Rejected: {}", rejection);
                    std::process::exit(2);
                }
            }
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Config => {
            let res = client.get(format!("{}/config", cli.url)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn read_event(path: &Path) -> std::io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read(path)
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let rendered = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{}", rendered);
    } else {
        eprintln!("Error: server returned status {}", status);
        eprintln!("{}", rendered);
        std::process::exit(1);
    }
    Ok(())
}

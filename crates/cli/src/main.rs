mod config;
mod error;
mod render;

use std::io::{self, BufRead, Write};

use chat::{GeminiBackend, Session};
use clap::{Parser, Subcommand};
use config::Config;
use error::Result;
use render::TermRenderer;

const SYSTEM_PROMPT: &str = "You are Skiff, a helpful assistant. Use the available tools when \
    they help answer the question, and keep final answers concise.";
const CONFIG_FILE: &str = "skiff.toml";

#[derive(Parser)]
#[command(name = "skiff")]
#[command(about = "A chat client that drives an LLM through tool calls", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat session
    Chat,
    /// List the registered tools
    Tools,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Chat) | None => cmd_chat().await,
        Some(Commands::Tools) => cmd_tools(),
    }
}

async fn cmd_chat() -> Result<()> {
    println!("skiff v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let api_key = config.api_key()?;
    let model = config.backend.model.clone();

    let backend = GeminiBackend::builder(api_key, &model).build();
    let registry = tools::demo::registry()?;

    let mut session = Session::new(backend, registry)
        .with_system(SYSTEM_PROMPT)
        .with_limits(config.limits.to_limits())
        .with_sink(TermRenderer);

    println!("Session ID: {}", session.id());
    println!("Model: {model}");
    println!("Type 'quit' or Ctrl+D to exit.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "exit" {
            break;
        }

        // The renderer prints tool activity and the final answer as events
        // arrive; only failures need reporting here.
        if let Err(e) = session.send(input).await {
            eprintln!("Error: {e}\n");
        }
    }

    println!("\nSession ended.");
    Ok(())
}

fn cmd_tools() -> Result<()> {
    let registry = tools::demo::registry()?;

    for spec in registry.specs() {
        println!("{:<24}  {}", spec.name, spec.description);
        for field in &spec.fields {
            let required = if spec.required.contains(&field.name) {
                " (required)"
            } else {
                ""
            };
            println!("    - {} [{}]{required}: {}", field.name, field.kind.as_str(), field.description);
        }
    }

    Ok(())
}

fn load_config() -> Result<Config> {
    if std::path::Path::new(CONFIG_FILE).exists() {
        Ok(Config::load(CONFIG_FILE)?)
    } else {
        Ok(Config::default())
    }
}

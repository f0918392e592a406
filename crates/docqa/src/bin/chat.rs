//! Interactive terminal shell
//!
//! Run with: cargo run -p docqa --features cli --bin docqa-chat -- invoice.pdf

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use docqa::{AppConfig, Assistant, Error};

#[derive(Parser)]
#[command(name = "docqa-chat", about = "Ask questions about a PDF document", version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// PDF document to load
    document: PathBuf,
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docqa=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    let assistant = Assistant::from_config(config)?;
    let mut session = assistant.new_session();

    let filename = cli
        .document
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf")
        .to_string();
    let data = tokio::fs::read(&cli.document).await?;

    let bar = spinner(&format!("Processing {}...", filename));
    let summary = match assistant.load_document(&mut session, &filename, data).await {
        Ok(summary) => summary,
        Err(e) => {
            bar.finish_and_clear();
            eprintln!("{} {}", style("error:").red().bold(), e);
            return Err(e.into());
        }
    };
    bar.finish_and_clear();

    println!(
        "{} {} ({} chunks, {})",
        style("Loaded").green().bold(),
        summary.filename,
        summary.chunk_count,
        summary.extraction_method.display_name()
    );
    println!("{}", summary.welcome_message());
    println!(
        "{}",
        style("Commands: /clear, /reset, /quit").dim()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"\n> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let question = line.trim();

        match question {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                assistant.clear_conversation(&mut session);
                println!("{}", style("Conversation cleared.").yellow());
                continue;
            }
            "/reset" => {
                assistant.reset(&mut session).await?;
                println!("{}", style("Session reset.").yellow());
                break;
            }
            _ => {}
        }

        let bar = spinner("Thinking...");
        let outcome = assistant.ask(&mut session, question).await;
        bar.finish_and_clear();

        match outcome {
            Ok(response) if response.accepted => {
                println!("{}", response.answer);
                for source in &response.sources {
                    println!(
                        "  {} {} #{} ({:.2})",
                        style("source").dim(),
                        source.source,
                        source.chunk_index,
                        source.similarity
                    );
                }
            }
            Ok(response) => println!("{}", style(response.answer).yellow()),
            Err(Error::InputRejected(msg)) => println!("{}", style(msg).yellow()),
            Err(e) if e.is_recoverable() => {
                println!("{} {}", style("error:").red().bold(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

//! # FinSense Terminal Coach
//!
//! Chat with the AI coach from a terminal, using the same data the web app
//! shows.
//!
//! ## Usage
//! ```bash
//! FINSENSE_USER_ID=demo-user FINSENSE_ACCESS_TOKEN=... \
//!     cargo run -p finsense-coach --bin finsense-chat
//!
//! # Explicit config file
//! cargo run -p finsense-coach --bin finsense-chat -- --config ./coach.toml
//! ```
//!
//! Type `/quit` (or send EOF) to leave. Ctrl-C while a reply is streaming
//! abandons that exchange; nothing from it is saved.

use anyhow::Context;
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use finsense_coach::{CoachClient, CoachConfig, CoachSession};
use finsense_core::{compute_summary, ChatRole, FinancialContext, HealthLabel, WireMessage};
use finsense_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut config_path: Option<PathBuf> = None;
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("FinSense Terminal Coach");
                println!();
                println!("Usage: finsense-chat [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --config <PATH>  coach.toml to load (default: platform config dir)");
                println!("  -h, --help           Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let config = CoachConfig::load(config_path).context("loading coach config")?;
    let user_id = config.user.id.clone();

    let db = Database::new(DbConfig::new(&config.user.db_path))
        .await
        .context("opening database")?;

    let context = load_context(&db, &user_id).await?;
    println!(
        "Health score: {} ({})  |  This month: spent {}, saved {}",
        context.health_score,
        HealthLabel::from_score(context.health_score),
        context.total_expenses,
        context.total_savings
    );
    println!("Ask the coach anything. /quit to leave.");
    println!();

    let client = CoachClient::new(&config)?;
    let mut session = CoachSession::open(client, db.chat(), &user_id).await?;
    let printer = tokio::spawn(print_replies(session.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" {
            break;
        }

        let outcome = tokio::select! {
            result = session.send(line, Some(context.clone())) => Some(result),
            _ = tokio::signal::ctrl_c() => None,
        };

        match outcome {
            Some(Ok(_)) => println!(),
            Some(Err(err)) => eprintln!("\n⚠ {}", err.notification()),
            None => {
                session.cancel();
                eprintln!("\n⚠ Reply cancelled");
            }
        }
    }

    printer.abort();
    db.close().await;
    info!("Chat session ended");
    Ok(())
}

/// This month's aggregate picture for the coach.
async fn load_context(db: &Database, user_id: &str) -> anyhow::Result<FinancialContext> {
    let transactions = db.transactions().list(user_id).await?;
    let budgets = db.budgets().list(user_id).await?;
    let goals = db.goals().list(user_id).await?;
    let profile = db.profiles().get_or_create(user_id).await?;

    let summary = compute_summary(
        &transactions,
        &budgets,
        &goals,
        Some(&profile),
        Utc::now().date_naive(),
    );
    Ok(FinancialContext::from(&summary))
}

/// Prints the growing assistant reply as new text arrives.
async fn print_replies(mut updates: watch::Receiver<Vec<WireMessage>>) {
    let mut seen_messages = updates.borrow().len();
    let mut printed = 0usize;

    while updates.changed().await.is_ok() {
        let messages = updates.borrow_and_update().clone();

        let Some(last) = messages.last() else {
            continue;
        };
        if last.role != ChatRole::Assistant {
            seen_messages = messages.len();
            continue;
        }

        // Rolled back to an older reply that was printed already.
        if messages.len() < seen_messages {
            seen_messages = messages.len();
            printed = last.content.len();
            continue;
        }

        if messages.len() != seen_messages {
            seen_messages = messages.len();
            printed = 0;
            print!("coach> ");
        }

        if let Some(fresh) = last.content.get(printed..) {
            print!("{}", fresh);
            printed = last.content.len();
        }
        let _ = std::io::stdout().flush();
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,finsense=info,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

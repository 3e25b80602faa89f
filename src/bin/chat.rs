//! Terminal chat client
//!
//! Reads messages from stdin and sends them through a running chat relay

use anyhow::Result;
use chat_relay::models::chat::DEFAULT_MODEL;
use chat_relay::ui::{
    format_cost, ChatSession, HttpRelayTransport, PriceTable, TurnOutcome, MODEL_CATALOG,
};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "chat", version, about = "Chat with a model through the chat relay")]
struct Cli {
    /// Base URL of the relay
    #[arg(long, env = "CHAT_RELAY_URL", default_value = "http://localhost:5000")]
    relay_url: String,

    /// Model for the first message
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Print replies as rendered HTML instead of raw markdown
    #[arg(long)]
    html: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let transport = HttpRelayTransport::new(&cli.relay_url)?;
    let mut session = ChatSession::new(Arc::new(PriceTable::builtin()), cli.model);

    print_banner(&session, transport.endpoint());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();

        if input == "/quit" {
            break;
        }
        if input == "/models" {
            for option in MODEL_CATALOG {
                println!("  {:<20} {}", option.id, option.label);
            }
            continue;
        }
        if let Some(model) = input.strip_prefix("/model ") {
            match session.set_model(model.trim()) {
                Ok(()) => println!("Model: {}", session.model()),
                Err(e) => eprintln!("{}", e),
            }
            continue;
        }

        match session.submit(&line, &transport).await {
            TurnOutcome::Ignored => {}
            TurnOutcome::Replied => {
                if let Some(last) = session.transcript().last() {
                    println!("\n{}:", last.role);
                    if cli.html {
                        if let Some(rendered) = session.rendered_transcript().last() {
                            println!("{}", rendered.html);
                        }
                    } else {
                        println!("{}", last.content);
                    }
                }
                println!("Request Cost: {}", format_cost(session.current_cost()));
                println!("Total Cost per session: {}\n", format_cost(session.total_cost()));
            }
            TurnOutcome::Failed => {
                eprintln!("Error: {}", session.last_error().unwrap_or("unknown error"));
            }
        }
    }

    Ok(())
}

fn print_banner(session: &ChatSession, endpoint: &str) {
    println!("Local ChatGPT via {}", endpoint);
    println!("Model: {}", session.model());
    println!("Commands: /model <id>, /models, /quit\n");
}

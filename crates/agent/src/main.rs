//! Offline agent entry point.
//!
//! This is the main binary that boots the agent on stdio transport: the
//! host delivers interception events as newline-delimited JSON on stdin and
//! reads replies from stdout. Logging goes to stderr to avoid interfering
//! with the event protocol on stdout.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::EnvFilter;

mod agent;
mod events;
mod lifecycle;
mod notify;
mod precache;
mod response;
mod router;
mod strategy;
mod work;

#[cfg(test)]
mod testutil;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = shltr_core::AgentConfig::load()?;
    tracing::info!(generation = %config.generation, "starting offline agent on stdio transport");

    let mut agent = agent::ServiceAgent::new(config).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match serde_json::from_str::<events::HostEvent>(&line) {
            Ok(event) => agent.handle_event(event).await,
            Err(e) => events::AgentReply::Error { message: format!("unrecognized event: {e}") },
        };

        let mut encoded = serde_json::to_vec(&reply)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    // Host closed stdin; let in-flight background refreshes land before exit.
    agent.settle().await;

    Ok(())
}

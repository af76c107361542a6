use anyhow::Result;
use clue::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}

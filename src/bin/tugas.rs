use anyhow::Result;
use tugas::cli::start;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the CLI, initialize logging, and get the action to run
    let action = start()?;

    // Handle the action
    action.execute().await?;

    Ok(())
}

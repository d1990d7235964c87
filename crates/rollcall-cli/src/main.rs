//! rollcall - readiness barrier for multi-node jobs

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    rollcall_cli::run().await
}

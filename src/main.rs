use anyhow::Result;
use spoofing_sim::cli::run_cli;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    run_cli().await
}

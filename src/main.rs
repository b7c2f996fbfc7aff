mod cli;

use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    customer_matrix_lib::load_env();
    customer_matrix_lib::init_tracing();

    let args = cli::Cli::parse();
    cli::run(args).await
}

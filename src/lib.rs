pub mod ai;
pub mod commands;
pub mod config;
pub mod contexts;
pub mod error;
pub mod export;
pub mod links;
pub mod store;
pub mod tasks;
pub mod workflow;

use tracing_subscriber::EnvFilter;

pub use commands::{DashboardState, Notice};
pub use config::AppConfig;
pub use error::{DashboardError, NoticeLevel, Result};

/// Load `.env` from the working directory, falling back to the parent
pub fn load_env() {
    if dotenvy::dotenv().is_err() {
        let _ = dotenvy::from_path("../.env");
    }
}

/// Initialize tracing with RUST_LOG env filter.
///
/// Default: warn for most crates, info for this library. Output goes to
/// stderr so stdout stays clean for command results.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,customer_matrix_lib=info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

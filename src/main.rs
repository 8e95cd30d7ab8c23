//! latvia-explorer CLI entry point
//!
//! Random places in Latvia - CLI + web app

use latvia_explorer::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e.user_message());
        std::process::exit(1);
    }
}

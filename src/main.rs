use account_backend::app::app::App;
use account_backend::util::logger::Logger;
use dotenv::dotenv;
use tracing::{error, info, warn};

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let app = App::new().await?;
    app.start().await
}

#[tokio::main]
async fn main() {
    // Load .env before the logger so RUST_LOG / LOG_DIR from the file apply
    let dotenv_result = dotenv();

    let logger = match Logger::new() {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("Failed to initialise logging: {}", e);
            std::process::exit(1);
        }
    };

    info!("Starting account backend");
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => warn!("Failed to load .env file: {} (using system env vars)", e),
    }

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            error!("Account backend stopped: {}", e);
            1
        }
    };

    // Flush the file writers before exiting
    drop(logger);
    std::process::exit(exit_code);
}

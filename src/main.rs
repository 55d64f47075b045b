use contact_manager::config::AppConfig;
use contact_manager::console::Console;
use contact_manager::{ContactListController, HttpContactStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, quieter HTTP internals; RUST_LOG still wins
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("reqwest", LevelFilter::Warn)
        .filter_module("hyper", LevelFilter::Warn)
        .parse_default_env()
        .init();

    let config = AppConfig::load()?;
    println!("Contact manager: contacts API at {}", config.api.base_url);
    println!("Type `help` for commands.");

    let store = Arc::new(HttpContactStore::new(config.api.base_url.clone()));
    let controller = ContactListController::new(store);

    let mut console = Console::new(
        controller,
        tokio::io::stdin(),
        tokio::io::stdout(),
        config.ui.confirm_deletes,
    );
    console.run().await
}

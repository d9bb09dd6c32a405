//! Cartkeeper command-line entry point.
//!
//! Loads configuration, opens the configured storage and prints a summary
//! of every cart, newest first.

use std::error::Error;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cartkeeper::adapters::{
    FileCartRepository, FileVaultRepository, InMemoryCartRepository, InMemoryVaultRepository,
};
use cartkeeper::application::{ListCartsHandler, ListCartsQuery};
use cartkeeper::config::{AppConfig, LoggingConfig, StorageBackend};
use cartkeeper::domain::ledger::{BudgetStatus, CartSummary};
use cartkeeper::ports::{CartRepository, VaultRepository};

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_summary(summary: &CartSummary) {
    let budget = match summary.budget_delta.status {
        BudgetStatus::Over => format!("{:.2} over budget", summary.budget_delta.amount),
        BudgetStatus::Under => format!("{:.2} left", summary.budget_delta.remaining()),
        BudgetStatus::OnBudget => "on budget".to_string(),
    };
    println!(
        "{} [{}] {} items, planned {:.2}, spent {:.2} of {:.2} ({})",
        summary.name,
        summary.status,
        summary.item_count,
        summary.cart_value,
        summary.spent_so_far,
        summary.budget,
        budget
    );
    for store in &summary.stores {
        println!(
            "    {}: {} items, planned {:.2}, spent {:.2}",
            store.store, store.item_count, store.value, store.spent
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_logging(&config.logging);

    let (vault, carts): (Arc<dyn VaultRepository>, Arc<dyn CartRepository>) =
        match config.storage.backend {
            StorageBackend::File => (
                Arc::new(FileVaultRepository::new(&config.storage.data_dir)),
                Arc::new(FileCartRepository::new(&config.storage.data_dir)),
            ),
            StorageBackend::Memory => (
                Arc::new(InMemoryVaultRepository::new()),
                Arc::new(InMemoryCartRepository::new()),
            ),
        };
    tracing::info!(
        backend = ?config.storage.backend,
        data_dir = %config.storage.data_dir.display(),
        "Storage opened"
    );

    let summaries = ListCartsHandler::new(vault, carts)
        .handle(ListCartsQuery::default())
        .await?;

    if summaries.is_empty() {
        println!("No carts yet.");
    }
    for summary in &summaries {
        print_summary(summary);
    }
    Ok(())
}

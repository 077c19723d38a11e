// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Night Canteen - late-night ordering from the terminal.
//!
//! This is the binary entry point.

mod app;
mod shell;

use std::path::PathBuf;
use std::process::ExitCode;

use canteen_config::CanteenConfig;
use canteen_core::CanteenError;
use canteen_order::{Customer, render_invoice};
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::app::App;

/// Night Canteen - late-night ordering from the terminal.
#[derive(Parser, Debug)]
#[command(name = "canteen", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard lookup.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the menu.
    Menu,
    /// Place an order in one shot.
    Order {
        #[arg(long)]
        name: String,
        #[arg(long)]
        room: String,
        #[arg(long)]
        mobile: String,
        /// Item to add as `id` or `id:quantity`; repeatable.
        #[arg(long = "item", required = true, value_name = "ID[:QTY]")]
        items: Vec<String>,
        /// Write the invoice to this path after a successful order.
        #[arg(long, value_name = "PATH")]
        invoice: Option<PathBuf>,
    },
    /// Send feedback to the canteen.
    Feedback {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Launch the interactive ordering shell (default).
    Shell,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => canteen_config::load_and_validate_path(path),
        None => canteen_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            canteen_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.app.log_level);

    match run(cli.command.unwrap_or(Commands::Shell), config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: CanteenConfig) -> Result<(), CanteenError> {
    let app = App::new(config).await?;
    if matches!(command, Commands::Order { .. } | Commands::Feedback { .. }) {
        replay_queued(&app).await;
    }
    match command {
        Commands::Menu => {
            shell::print_menu(&app.menu, &app.config.shop.currency_symbol);
            Ok(())
        }
        Commands::Order {
            name,
            room,
            mobile,
            items,
            invoice,
        } => {
            if !app.hours.is_open_now() {
                eprintln!("{}", format!("Note: we're open {}.", app.hours).yellow());
            }
            app.checkout.cart().clear()?;
            app.fill_cart(&items)?;
            app.checkout
                .place_order(&Customer::new(&name, &room, &mobile))
                .await?;
            println!("{}", "Order placed successfully!".green());

            if let (Some(path), Some(order)) = (invoice, app.checkout.last_order()) {
                let html = render_invoice(&order, &app.config.shop, &app.hours);
                tokio::fs::write(&path, html).await.map_err(|e| CanteenError::Storage {
                    message: format!("failed to write {}: {e}", path.display()),
                    source: Some(Box::new(e)),
                })?;
                println!("Invoice written to {}", path.display());
            }
            Ok(())
        }
        Commands::Feedback { text } => {
            app.checkout.submit_feedback(&text.join(" ")).await?;
            println!("{}", "Thank you for your feedback!".green());
            Ok(())
        }
        Commands::Shell => shell::run_shell(app).await,
    }
}

/// Sends failures queued by earlier runs before a one-shot submission.
async fn replay_queued(app: &App) {
    let report = app.diagnostics.retry_failed().await;
    if report.recovered > 0 {
        println!(
            "{}",
            format!("Delivered {} earlier submission(s).", report.recovered).green()
        );
    }
    if report.remaining > 0 {
        eprintln!(
            "{}",
            format!("{} earlier submission(s) still queued.", report.remaining).dimmed()
        );
    }
}

/// Initialize the tracing subscriber with the configured log level.
///
/// Logs go to stderr so command output stays pipeable.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("canteen={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_requires_items() {
        let parsed = Cli::try_parse_from([
            "canteen", "order", "--name", "Asha", "--room", "B-214", "--mobile", "9876543210",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn order_collects_repeated_items() {
        let cli = Cli::try_parse_from([
            "canteen", "order", "--name", "Asha", "--room", "B-214", "--mobile", "9876543210",
            "--item", "5:2", "--item", "3",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Order { items, invoice, .. }) => {
                assert_eq!(items, ["5:2", "3"]);
                assert!(invoice.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["canteen", "menu", "--config", "/tmp/c.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Some(Commands::Menu)));
    }

    #[test]
    fn no_subcommand_means_shell() {
        let cli = Cli::try_parse_from(["canteen"]).unwrap();
        assert!(cli.command.is_none());
    }
}

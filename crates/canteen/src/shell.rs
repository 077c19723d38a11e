// SPDX-FileCopyrightText: 2026 Night Canteen Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `canteen shell` command implementation.
//!
//! An interactive ordering session with a colored prompt and readline
//! history. The cart and submission ledgers come from the session file, so
//! a retry sweep scheduled shortly after start replays failures left by
//! earlier runs.

use std::path::PathBuf;

use canteen_core::CanteenError;
use canteen_order::{Customer, Menu, Order, format_amount, render_invoice};
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde_json::Value;
use tracing::debug;

use crate::app::App;

const DEFAULT_INVOICE_PATH: &str = "invoice.html";

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Menu,
    Add(String),
    Increase(String),
    Decrease(String),
    Cart,
    /// `checkout` with no arguments prompts for the details.
    Checkout(Option<Customer>),
    Feedback(String),
    Bill(Option<PathBuf>),
    New,
    Stats,
    Retry,
    Config,
    Hours,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let id_arg = |usage: &str| {
            if rest.is_empty() {
                Err(format!("usage: {usage} <item id>"))
            } else {
                Ok(rest.to_string())
            }
        };

        match word {
            "menu" => Ok(Self::Menu),
            "add" => id_arg("add").map(Self::Add),
            "inc" | "+" => id_arg("inc").map(Self::Increase),
            "dec" | "-" => id_arg("dec").map(Self::Decrease),
            "cart" => Ok(Self::Cart),
            "checkout" => parse_checkout(rest),
            "feedback" if rest.is_empty() => Err("usage: feedback <text>".into()),
            "feedback" => Ok(Self::Feedback(rest.to_string())),
            "bill" => Ok(Self::Bill((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "new" => Ok(Self::New),
            "stats" => Ok(Self::Stats),
            "retry" => Ok(Self::Retry),
            "config" => Ok(Self::Config),
            "hours" => Ok(Self::Hours),
            "help" | "?" => Ok(Self::Help),
            "/quit" | "/exit" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`, type `help`")),
        }
    }
}

/// `checkout <name> <room> <mobile...>`; the mobile may contain spaces.
fn parse_checkout(rest: &str) -> Result<ShellCommand, String> {
    if rest.is_empty() {
        return Ok(ShellCommand::Checkout(None));
    }
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(name), Some(room)) => {
            let mobile = parts.collect::<Vec<_>>().join(" ");
            if mobile.is_empty() {
                return Err("usage: checkout <name> <room> <mobile>".into());
            }
            Ok(ShellCommand::Checkout(Some(Customer::new(name, room, &mobile))))
        }
        _ => Err("usage: checkout <name> <room> <mobile>".into()),
    }
}

/// Runs the `canteen shell` interactive REPL.
pub async fn run_shell(app: App) -> Result<(), CanteenError> {
    let mut rl = DefaultEditor::new()
        .map_err(|e| CanteenError::Internal(format!("failed to initialize readline: {e}")))?;

    let _sweep = app.schedule_retry_sweep();

    println!("{}", format!("{} shell", app.config.shop.name).bold().green());
    print_hours_banner(&app);
    println!("Type {} for commands, {} to exit.\n", "help".yellow(), "/quit".yellow());

    let prompt = format!("{}> ", "canteen".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = match ShellCommand::parse(trimmed) {
                    Ok(ShellCommand::Quit) => break,
                    Ok(command) => command,
                    Err(usage) => {
                        eprintln!("{}", usage.yellow());
                        continue;
                    }
                };

                if let Err(e) = handle_command(&app, &mut rl, command).await {
                    report_error(&e);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    let stats = app.diagnostics.stats();
    if stats.total > 0 {
        println!("{}", format!("session: {stats}").dimmed());
    }
    Ok(())
}

async fn handle_command(
    app: &App,
    rl: &mut DefaultEditor,
    command: ShellCommand,
) -> Result<(), CanteenError> {
    debug!(?command, "shell command");
    let cart = app.checkout.cart();
    let currency = app.config.shop.currency_symbol.as_str();
    match command {
        ShellCommand::Menu => print_menu(&app.menu, currency),
        ShellCommand::Add(id) => {
            let item = app
                .menu
                .find(&id)
                .ok_or_else(|| CanteenError::Order(format!("item {id} is not on the menu")))?;
            let order = cart.add_item(item)?;
            success(&format!("{} added to order!", item.name));
            print_cart(&order, currency);
        }
        ShellCommand::Increase(id) => print_cart(&cart.change_quantity(&app.menu, &id, 1)?, currency),
        ShellCommand::Decrease(id) => print_cart(&cart.change_quantity(&app.menu, &id, -1)?, currency),
        ShellCommand::Cart => print_cart(&cart.current(), currency),
        ShellCommand::Checkout(customer) => {
            if cart.current().is_empty() {
                return Err(CanteenError::Order("Please add items to your order first".into()));
            }
            let customer = match customer {
                Some(customer) => customer,
                None => prompt_customer(rl)?,
            };
            println!("{}", "Placing your order...".dimmed());
            let response = app.checkout.place_order(&customer).await?;
            success(&format!("Order placed successfully! {}", ack_message(&response)));
            println!("Type {} to save your invoice.", "bill".yellow());
        }
        ShellCommand::Feedback(text) => {
            app.checkout.submit_feedback(&text).await?;
            success("Thank you for your feedback!");
        }
        ShellCommand::Bill(path) => {
            let order = app
                .checkout
                .last_order()
                .ok_or_else(|| CanteenError::Order("No bill available yet".into()))?;
            let html = render_invoice(&order, &app.config.shop, &app.hours);
            let path = path.unwrap_or_else(|| PathBuf::from(DEFAULT_INVOICE_PATH));
            tokio::fs::write(&path, html).await.map_err(|e| CanteenError::Storage {
                message: format!("failed to write {}: {e}", path.display()),
                source: Some(Box::new(e)),
            })?;
            success(&format!("Invoice written to {}", path.display()));
        }
        ShellCommand::New => {
            cart.reset()?;
            success("Ready for a new order!");
        }
        ShellCommand::Stats => println!("{}", app.diagnostics.stats()),
        ShellCommand::Retry => {
            let report = app.diagnostics.retry_failed().await;
            println!(
                "retried {}, delivered {}, still queued {}",
                report.replayed, report.recovered, report.remaining
            );
        }
        ShellCommand::Config => {
            let config = app.diagnostics.config();
            println!("endpoint:        {}", config.endpoint);
            println!("fallbacks:       {}", config.fallback_endpoints.len());
            println!("max retries:     {}", config.max_retries);
            println!("retry delay:     {} ms", config.retry_delay_ms);
            println!("attempt timeout: {} ms", config.timeout_ms);
        }
        ShellCommand::Hours => print_hours_banner(app),
        ShellCommand::Help => print_help(),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn prompt_customer(rl: &mut DefaultEditor) -> Result<Customer, CanteenError> {
    let mut ask = |label: &str| {
        rl.readline(&format!("{label}: "))
            .map_err(|e| CanteenError::Order(format!("checkout cancelled: {e}")))
    };
    let name = ask("Name")?;
    let room = ask("Room")?;
    let mobile = ask("Mobile")?;
    Ok(Customer::new(&name, &room, &mobile))
}

/// The `message` field of an acknowledgement, if it has one.
fn ack_message(response: &Value) -> String {
    response
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn success(message: &str) {
    println!("{}", message.green());
}

fn report_error(error: &CanteenError) {
    match error {
        CanteenError::Order(message) => eprintln!("{}", message.yellow()),
        CanteenError::Validation { .. } => eprintln!("{}", error.to_string().yellow()),
        CanteenError::Exhausted { .. } => {
            eprintln!("{}: {error}", "Failed to place order".red());
            eprintln!("{}", "It has been queued and will be retried.".dimmed());
        }
        _ => eprintln!("{}: {error}", "error".red()),
    }
}

pub fn print_menu(menu: &Menu, currency: &str) {
    for item in menu.items() {
        println!(
            "{:>4}  {:<22} {:>6}  {}",
            item.id.to_string().cyan(),
            item.name.bold(),
            format!("{currency}{}", format_amount(item.price)),
            item.description.as_deref().unwrap_or_default().dimmed()
        );
    }
}

fn print_cart(order: &Order, currency: &str) {
    if order.is_empty() {
        println!("{}", "No items selected yet.".dimmed());
        return;
    }
    for line in &order.items {
        println!(
            "{:>4}  {:<22} x{:<3} {currency}{}",
            line.id.to_string().cyan(),
            line.name,
            line.quantity,
            format_amount(line.subtotal())
        );
    }
    println!("{}", format!("Total Amount: {currency}{}", format_amount(order.total)).bold());
}

fn print_hours_banner(app: &App) {
    if app.hours.is_open_now() {
        println!("{} ({})", "We're open".green(), app.hours);
    } else {
        println!("{} Open {}.", "We're closed right now.".yellow(), app.hours);
    }
}

fn print_help() {
    let rows = [
        ("menu", "show the menu"),
        ("add <id>", "add an item to the order"),
        ("inc <id> / dec <id>", "change an item's quantity"),
        ("cart", "show the current order"),
        ("checkout [name room mobile]", "place the order"),
        ("feedback <text>", "send feedback"),
        ("bill [path]", "write the invoice for the last order"),
        ("new", "start a new order"),
        ("stats", "submission statistics"),
        ("retry", "retry failed submissions now"),
        ("config", "show submission settings"),
        ("hours", "show opening hours"),
        ("/quit", "exit"),
    ];
    for (command, help) in rows {
        println!("  {:<30} {}", command.yellow(), help);
    }
}

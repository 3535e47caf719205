//! Countertop CLI - On-device register state management tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the persisted register state
//! ct-cli state show --state-dir ./state
//!
//! # Clear all persisted register state
//! ct-cli state clear --state-dir ./state
//!
//! # Clear a single document
//! ct-cli state clear --state-dir ./state --key saved-carts
//! ```
//!
//! # Commands
//!
//! - `state show` - Pretty-print the persisted cart, customer, and saved carts
//! - `state clear` - Delete persisted state documents

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "ct-cli")]
#[command(author, version, about = "Countertop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage on-device register state
    State {
        #[command(subcommand)]
        action: StateAction,
    },
}

#[derive(Subcommand)]
enum StateAction {
    /// Pretty-print the persisted register documents
    Show {
        /// Register state directory
        #[arg(short, long, default_value = "./state")]
        state_dir: PathBuf,
    },
    /// Delete persisted register documents
    Clear {
        /// Register state directory
        #[arg(short, long, default_value = "./state")]
        state_dir: PathBuf,

        /// Clear only this document (default: all)
        #[arg(short, long)]
        key: Option<StateKeyArg>,
    },
}

/// Persisted document selector.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum StateKeyArg {
    Cart,
    Customer,
    SavedCarts,
}

impl From<StateKeyArg> for countertop_register::StateKey {
    fn from(key: StateKeyArg) -> Self {
        match key {
            StateKeyArg::Cart => Self::Cart,
            StateKeyArg::Customer => Self::Customer,
            StateKeyArg::SavedCarts => Self::SavedCarts,
        }
    }
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::State { action } => match action {
            StateAction::Show { state_dir } => commands::state::show(&state_dir)?,
            StateAction::Clear { state_dir, key } => {
                commands::state::clear(&state_dir, key.map(Into::into))?;
            }
        },
    }
    Ok(())
}

//! Doraemon Delights CLI - menu and checkout tools.
//!
//! # Usage
//!
//! ```bash
//! # Print the menu, or one category of it
//! delights menu
//! delights menu --category desserts
//!
//! # Price a cart
//! delights quote mc1=2 dr1 dorayaki-delight=3
//!
//! # Check a checkout form saved as JSON
//! delights validate order.json
//! ```
//!
//! # Commands
//!
//! - `menu` - List catalog items
//! - `quote` - Price a cart from `ITEM_ID[=QTY]` arguments
//! - `validate` - Validate a checkout form (exit code 1 when invalid)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use delights_core::StaticCatalog;

mod commands;

#[derive(Parser)]
#[command(name = "delights")]
#[command(author, version, about = "Doraemon Delights CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the menu
    Menu {
        /// Only show one category (slug, e.g. `side-dishes`)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Price a cart
    Quote {
        /// Cart lines as `ITEM_ID=QTY` (quantity defaults to 1)
        #[arg(required = true)]
        lines: Vec<String>,
    },
    /// Validate a checkout form stored as JSON
    Validate {
        /// Path to the JSON form
        file: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{output}");
            }
        }
        Err(e) => {
            tracing::error!("Command failed");
            #[allow(clippy::print_stderr)]
            {
                eprintln!("{e}");
            }
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, commands::CliError> {
    let catalog = StaticCatalog::house_menu();

    match cli.command {
        Commands::Menu { category } => commands::menu::run(&catalog, category.as_deref()),
        Commands::Quote { lines } => commands::quote::run(&catalog, &lines),
        Commands::Validate { file } => commands::validate::run(&file),
    }
}

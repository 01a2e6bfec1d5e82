//! Freshcart CLI - Database migrations and pricing diagnostics.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! freshcart-cli migrate
//!
//! # Show the pricing context a user would get
//! freshcart-cli pricing --user user-5f2c
//!
//! # ...with an explicitly selected store
//! freshcart-cli pricing --user user-5f2c --customer 42
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "freshcart-cli")]
#[command(author, version, about = "Freshcart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Resolve and print a user's pricing context
    Pricing {
        /// User ID as issued by the identity service
        #[arg(short, long)]
        user: String,

        /// Explicitly selected customer (store) ID
        #[arg(short, long)]
        customer: Option<i32>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Pricing { user, customer } => {
            let summary = commands::pricing::resolve(&user, customer).await?;
            #[allow(clippy::print_stdout)]
            {
                println!("{summary}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_pricing_args() {
        let cli = Cli::try_parse_from(["freshcart-cli", "pricing", "--user", "U1", "--customer", "42"])
            .map_err(|e| e.to_string());
        assert!(matches!(
            cli,
            Ok(Cli {
                command: Commands::Pricing { ref user, customer: Some(42) }
            }) if user == "U1"
        ));
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// TrashCoin bridge CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "trashcoin-cli", about = "TrashCoin wallet bridge CLI", disable_help_subcommand = true)]
pub struct Cli {
    /// Path to the bridge configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Connect the wallet and show the account balance
    Balance,
    /// Verify a waste drop-off and mint tokens to the recycler
    Mint {
        /// Recycler's ledger address
        #[arg(long)]
        to: String,
        /// Number of verified items
        #[arg(long)]
        quantity: String,
        /// Waste category (e.g. plastic, glass)
        #[arg(long)]
        category: String,
    },
    /// Redeem (burn) tokens from the connected account
    Redeem {
        #[arg(long)]
        quantity: String,
    },
    /// Transfer tokens to another account
    Transfer {
        #[arg(long)]
        to: String,
        #[arg(long)]
        quantity: String,
    },
    /// Grant the verifier role to an account
    AddVerifier {
        #[arg(long)]
        address: String,
    },
    /// Revoke the verifier role from an account
    RemoveVerifier {
        #[arg(long)]
        address: String,
    },
    /// Show token name, symbol and decimals
    Info,
}

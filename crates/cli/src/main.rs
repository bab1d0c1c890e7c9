//! Lapak CLI - credential and store tooling.
//!
//! # Usage
//!
//! ```bash
//! # Show the identity a credential claims
//! lapak token inspect eyJhbGciOi... --format yaml
//!
//! # Dry-run the page guard for an allow-list
//! lapak token check eyJhbGciOi... --allow super_admin
//!
//! # Rank stores by distance
//! lapak stores nearby --file stores.json --lat -6.2 --lng 106.8 --radius-km 10
//! ```
//!
//! Pass `-` as the token to read it from stdin.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lapak_core::Role;
use lapak_core::guard::DEFAULT_REDIRECT_PATH;

mod commands;

use commands::token::OutputFormat;

#[derive(Parser)]
#[command(name = "lapak")]
#[command(author, version, about = "Lapak CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect credentials and dry-run the access guard
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Work with the nearby-store directory
    Stores {
        #[command(subcommand)]
        action: StoresAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Decode a credential and print the identity it claims
    Inspect {
        /// The bearer credential, or `-` for stdin
        token: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Show what a guarded page would do with this credential
    Check {
        /// The bearer credential, or `-` for stdin
        token: String,

        /// Allowed roles, comma separated (default: all roles)
        #[arg(short, long, value_delimiter = ',')]
        allow: Vec<Role>,

        /// Where signed-out users are sent
        #[arg(short, long, default_value = DEFAULT_REDIRECT_PATH)]
        redirect: String,

        /// Treat expired credentials as signed out
        #[arg(long)]
        reject_expired: bool,
    },
}

#[derive(Subcommand)]
enum StoresAction {
    /// List stores closest first
    Nearby {
        /// JSON file with an array of store locations
        #[arg(short, long)]
        file: PathBuf,

        /// Latitude of the shopper
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the shopper
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Only list stores within this many kilometres
        #[arg(long)]
        radius_km: Option<f64>,
    },
}

fn main() {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = io::stdout().lock();
    match cli.command {
        Commands::Token { action } => match action {
            TokenAction::Inspect { token, format } => {
                let token = commands::token::read_token(&token, io::stdin().lock())?;
                commands::token::inspect(&token, format, &mut out)?;
            }
            TokenAction::Check {
                token,
                allow,
                redirect,
                reject_expired,
            } => {
                let token = commands::token::read_token(&token, io::stdin().lock())?;
                let options = commands::token::CheckOptions {
                    allow,
                    redirect,
                    reject_expired,
                };
                commands::token::check(&token, &options, &mut out)?;
            }
        },
        Commands::Stores { action } => match action {
            StoresAction::Nearby {
                file,
                lat,
                lng,
                radius_km,
            } => commands::stores::nearby(&file, lat, lng, radius_km, &mut out)?,
        },
    }
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Searelay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! searelay - SeaTalk webhook relay.
//!
//! This is the binary entry point for the relay.

mod serve;

use clap::{Parser, Subcommand};

/// searelay - SeaTalk webhook relay.
#[derive(Parser, Debug)]
#[command(name = "searelay", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay server.
    Serve,
    /// Load and validate configuration, then exit.
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match searelay_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            searelay_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Check) => {
            println!(
                "searelay: config ok (bind {}:{}, signature verification {})",
                config.service.host,
                config.service.port,
                if config.seatalk.signing_secret.is_some() {
                    "on"
                } else {
                    "off"
                }
            );
        }
        None => {
            println!("searelay: use --help for available commands");
        }
    }
}

// Copyright 2026 SeriesHub Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use serieshub::cli::{self, output};
use serieshub::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "serieshub",
    about = "SeriesHub: anime and donghua catalog scraper",
    version,
    after_help = "Run 'serieshub <command> --help' for details on each command."
)]
struct Cli {
    /// Output results and logs as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Navigation timeout for rendered pages, in milliseconds
    #[arg(long, global = true)]
    nav_timeout: Option<u64>,

    /// Path to the Chromium binary
    #[arg(long, global = true)]
    chromium: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the REST API
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = cli::serve::DEFAULT_PORT)]
        port: u16,
    },
    /// Search a catalog by name
    Search {
        /// Source type ("anime" or "donghua")
        source_type: String,
        /// Free-text query
        query: String,
    },
    /// Show a series and its episode list
    Details {
        /// Source type ("anime" or "donghua")
        source_type: String,
        /// Series slug (e.g. "one-piece-tv")
        name_id: String,
    },
    /// List the video servers of one episode
    Videos {
        /// Source type ("anime" or "donghua")
        source_type: String,
        /// Series slug
        name_id: String,
        /// Episode number
        episode_id: u32,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "serieshub=debug" } else { "serieshub=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.json {
        std::env::set_var(output::JSON_ENV, "1");
    }
    init_tracing(cli.verbose, cli.json);

    let config = Config::from_env()
        .with_navigation_timeout(cli.nav_timeout)
        .with_chromium_path(cli.chromium);

    let result = match cli.command {
        Commands::Serve { port } => cli::serve::run(config, port).await,
        Commands::Search { source_type, query } => {
            cli::lookup::search(&config, &source_type, &query).await
        }
        Commands::Details {
            source_type,
            name_id,
        } => cli::lookup::details(&config, &source_type, &name_id).await,
        Commands::Videos {
            source_type,
            name_id,
            episode_id,
        } => cli::lookup::videos(&config, &source_type, &name_id, episode_id).await,
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if output::is_json() {
            output::print_json(&output::error_body(e));
        } else {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}

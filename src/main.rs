// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use cryptrack::auth::FileCredentialStore;
use cryptrack::config::Config;
use cryptrack::{cli, commands, db, logging};

fn main() -> Result<()> {
    let config = Config::from_env()?;
    logging::init(&config.logging);

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    config.paths.ensure_dir()?;
    let store = db::Store::open(&config.paths)
        .with_context(|| format!("Open store at {}", config.paths.database.display()))?;
    let creds = FileCredentialStore::new(&config.paths.session_file);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", config.paths.database.display());
        }
        Some(("user", sub)) => commands::user::handle(&store, &creds, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&store, &creds, sub)?,
        Some(("portfolio", sub)) => commands::portfolio::handle(&store, &creds, &config, sub)?,
        Some(("market", sub)) => commands::market::handle(&config, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, &creds, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

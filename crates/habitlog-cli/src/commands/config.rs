//! Config subcommand.
//!
//! Edits go through [`Config::set`] and are validated against what the
//! habit client will actually do with them before anything is saved.

use clap::Subcommand;
use habitlog_core::{Config, HttpLogStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key (e.g. "api.base_url")
    Get {
        key: String,
        /// Apply environment overrides such as HABITLOG_BASE_URL
        #[arg(long)]
        effective: bool,
    },
    /// Change one value and save ("none" clears optional values)
    Set { key: String, value: String },
    /// Print the whole config file
    List {
        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
    /// Print where the config file lives
    Path,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key, effective } => {
            let mut config = Config::load()?;
            if effective {
                config.api = config.api();
            }
            let value = config.get(&key).ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            if key.starts_with("api.") {
                // Rejects base URLs the HTTP client could not use.
                HttpLogStore::from_config(&config.api)?;
            }
            config.save()?;
            let saved = config.get(&key).unwrap_or(value);
            println!("{key} = {saved}");
        }
        ConfigAction::List { json } => {
            let config = Config::load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", toml::to_string_pretty(&config)?);
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

pub mod completions;
pub mod config;
pub mod count;
pub mod market;
pub mod record;
pub mod stats;
pub mod user;

use chrono::{NaiveDate, Utc};
use clap::Args;
use kakeibo_core::Config;

/// `--user`, shared by every per-user command.
#[derive(Args, Debug, Clone, Default)]
pub struct UserArg {
    /// User name (defaults to `session.default_user`)
    #[arg(long, short)]
    pub user: Option<String>,
}

impl UserArg {
    pub fn resolve(&self, config: &Config) -> String {
        self.user
            .clone()
            .unwrap_or_else(|| config.session.default_user.clone())
    }
}

/// Today in the configured display offset.
pub fn today(config: &Config) -> NaiveDate {
    Utc::now()
        .with_timezone(&config.display.offset())
        .date_naive()
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

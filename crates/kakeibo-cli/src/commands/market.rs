use chrono::Utc;
use clap::Subcommand;
use kakeibo_core::ledger::{apply_market, MarketPreset};
use kakeibo_core::storage::Database;

use super::print_json;

#[derive(Subcommand)]
pub enum MarketAction {
    /// Record the latest price of an item, in Gold
    Set { item: String, gold: f64 },
    /// List stored prices
    List,
    /// Show core and cell prices (10k G) for a preset: kisho or senki
    Apply { preset: MarketPreset },
}

pub fn run(action: MarketAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        MarketAction::Set { item, gold } => {
            if !gold.is_finite() || gold < 0.0 {
                return Err(format!("invalid price: {gold}").into());
            }
            db.set_price(&item, gold, Utc::now())?;
            println!("ok");
        }
        MarketAction::List => print_json(&db.prices()?)?,
        MarketAction::Apply { preset } => {
            let quote = apply_market(&db, preset);
            if quote.is_empty() {
                eprintln!("no prices stored for {preset}");
            }
            print_json(&quote)?;
        }
    }
    Ok(())
}

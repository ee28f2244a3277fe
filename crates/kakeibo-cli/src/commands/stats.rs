use chrono::Datelike;
use clap::Subcommand;
use kakeibo_core::ledger::{filter_month, months, totals, weekly_cumulative_profit, RecordStore};
use kakeibo_core::storage::Database;
use kakeibo_core::Config;

use super::{print_json, today, UserArg};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Months that have records, newest first
    Months {
        #[command(flatten)]
        who: UserArg,
    },
    /// Item and profit totals
    Totals {
        /// Only this month, YYYY-MM
        #[arg(long)]
        month: Option<String>,
        #[command(flatten)]
        who: UserArg,
    },
    /// Weekly cumulative profit for one year
    Weekly {
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[command(flatten)]
        who: UserArg,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;

    match action {
        StatsAction::Months { who } => {
            let records = db.records_for_user(&who.resolve(&config))?;
            print_json(&months(&records))?;
        }
        StatsAction::Totals { month, who } => {
            let records = db.records_for_user(&who.resolve(&config))?;
            print_json(&totals(filter_month(&records, month.as_deref())))?;
        }
        StatsAction::Weekly { year, who } => {
            let records = db.records_for_user(&who.resolve(&config))?;
            let year = year.unwrap_or_else(|| today(&config).year());
            print_json(&weekly_cumulative_profit(&records, year))?;
        }
    }
    Ok(())
}

//! Farming ledger.
//!
//! This module provides:
//! - Profit arithmetic for a counted session
//! - Ledger rows and the storage interface they are saved through
//! - Month filters, totals and the weekly cumulative profit curve
//! - Market price presets for filling in cell and core prices

mod market;
mod profit;
mod record;
mod stats;
mod store;

pub use market::{apply_market, MarketPreset, MarketQuote, PriceSource, FRAGMENTS_PER_CELL};
pub use profit::{calculate_profit, cycles_for_laps, ProfitInputs, DEFAULT_COMMISSION, GOLD_PER_UNIT};
pub use record::{LedgerRecord, NewRecord, RecordPatch};
pub use stats::{
    filter_month, months, totals, week_start, weekly_cumulative_profit, years, LedgerTotals,
    WeeklyProfit,
};
pub use store::{RecordStore, UserRecord};

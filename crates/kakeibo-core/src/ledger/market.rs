//! Market price presets.
//!
//! Prices come from a [`PriceSource`] in Gold and are converted to the
//! 10k G units the ledger uses.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use super::profit::GOLD_PER_UNIT;

/// A full cell can be assembled from this many cell fragments.
pub const FRAGMENTS_PER_CELL: f64 = 20.0;
const FRAGMENT_SUFFIX: &str = "のかけら";

pub trait PriceSource {
    /// Latest price of `item` in Gold.
    fn latest_price(&self, item: &str) -> Option<f64>;
}

impl PriceSource for HashMap<String, f64> {
    fn latest_price(&self, item: &str) -> Option<f64> {
        self.get(item).copied()
    }
}

/// Core/cell item pairs farmed together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPreset {
    Kisho,
    Senki,
}

impl MarketPreset {
    pub fn core_item(self) -> &'static str {
        match self {
            Self::Kisho => "輝晶核",
            Self::Senki => "閃輝晶核",
        }
    }

    pub fn cell_item(self) -> &'static str {
        match self {
            Self::Kisho => "魔因細胞",
            Self::Senki => "閃魔細胞",
        }
    }

    pub fn fragment_item(self) -> String {
        format!("{}{FRAGMENT_SUFFIX}", self.cell_item())
    }
}

impl fmt::Display for MarketPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kisho => "kisho",
            Self::Senki => "senki",
        })
    }
}

impl FromStr for MarketPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kisho" => Ok(Self::Kisho),
            "senki" => Ok(Self::Senki),
            other => Err(format!("unknown market preset: {other}")),
        }
    }
}

/// Prices ready to drop into the ledger form, in 10k G.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MarketQuote {
    pub core_price: Option<f64>,
    pub cell_cost: Option<f64>,
}

impl MarketQuote {
    pub fn is_empty(&self) -> bool {
        self.core_price.is_none() && self.cell_cost.is_none()
    }
}

/// Look up the preset's items. A cell is priced at the cheaper of buying it
/// whole or assembling it from fragments.
pub fn apply_market(source: &impl PriceSource, preset: MarketPreset) -> MarketQuote {
    let core = source.latest_price(preset.core_item());
    let cell = source.latest_price(preset.cell_item());
    let fragment = source.latest_price(&preset.fragment_item());

    let cell = cell.map(|c| match fragment {
        Some(f) => c.min(f * FRAGMENTS_PER_CELL),
        None => c,
    });

    MarketQuote {
        core_price: core.map(|g| round_to(g / GOLD_PER_UNIT, 1)),
        cell_cost: cell.map(|g| round_to(g / GOLD_PER_UNIT, 2)),
    }
}

fn round_to(v: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn converts_gold_to_units() {
        let src = prices(&[("輝晶核", 1_234_567.0), ("魔因細胞", 71_234.0)]);
        let q = apply_market(&src, MarketPreset::Kisho);
        assert_eq!(q.core_price, Some(123.5));
        assert_eq!(q.cell_cost, Some(7.12));
    }

    #[test]
    fn fragments_cap_the_cell_price() {
        let src = prices(&[("閃魔細胞", 100_000.0), ("閃魔細胞のかけら", 3_000.0)]);
        let q = apply_market(&src, MarketPreset::Senki);
        assert_eq!(q.cell_cost, Some(6.0));
        assert_eq!(q.core_price, None);
    }

    #[test]
    fn missing_prices_leave_quote_empty() {
        let q = apply_market(&HashMap::new(), MarketPreset::Kisho);
        assert!(q.is_empty());
    }

    #[test]
    fn preset_parsing() {
        assert_eq!("Senki".parse::<MarketPreset>().unwrap(), MarketPreset::Senki);
        assert_eq!(MarketPreset::Kisho.fragment_item(), "魔因細胞のかけら");
        assert!("gold".parse::<MarketPreset>().is_err());
    }
}

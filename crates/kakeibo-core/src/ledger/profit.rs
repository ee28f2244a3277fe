//! Session profit.
//!
//! Prices are entered in units of 10,000 Gold ("man" G); the result is in Gold.

use serde::{Deserialize, Serialize};

use crate::counter::Counts;

/// Auction house cut applied to every sale.
pub const DEFAULT_COMMISSION: f64 = 0.05;
/// Gold per price unit.
pub const GOLD_PER_UNIT: f64 = 10_000.0;
/// Cells consumed per lap pack.
const CELLS_PER_PACK: f64 = 30.0;
const LAPS_PER_PACK: f64 = 4.0;
const LAPS_PER_MEAL: f64 = 5.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitInputs {
    pub counts: Counts,
    /// Price of one cell, in 10k G.
    pub cell_cost: f64,
    /// Sale price of one core, in 10k G.
    pub core_price: f64,
    /// Price of one meal buff, in 10k G.
    pub meal_cost: f64,
    pub meal_num: u32,
}

/// Net profit in Gold, truncated toward zero.
///
/// Fragments sell as 45/99 and 75/99 of a core. Every lap (wipes included)
/// burns a quarter of a 30-cell pack; each meal lasts five laps.
pub fn calculate_profit(inputs: &ProfitInputs, commission: f64) -> i64 {
    let c = &inputs.counts;
    let core_equivalents =
        c.frag_45 as f64 * 45.0 / 99.0 + c.frag_75 as f64 * 75.0 / 99.0 + c.core as f64;
    let revenue = inputs.core_price * core_equivalents * (1.0 - commission);
    let cells = inputs.cell_cost * CELLS_PER_PACK * c.total() as f64 / LAPS_PER_PACK;
    let meals = inputs.meal_cost * (inputs.meal_num as f64 / LAPS_PER_MEAL);
    ((revenue - cells - meals) * GOLD_PER_UNIT) as i64
}

/// Cell packs needed for `laps`.
pub fn cycles_for_laps(laps: u64) -> u64 {
    laps.div_ceil(LAPS_PER_PACK as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_zero_profit() {
        assert_eq!(calculate_profit(&ProfitInputs::default(), DEFAULT_COMMISSION), 0);
    }

    #[test]
    fn core_only() {
        let inputs = ProfitInputs {
            counts: Counts::new(0, 0, 4, 0),
            cell_cost: 7.0,
            core_price: 100.0,
            ..Default::default()
        };
        // 100 * 4 * 0.95 = 380, minus 7 * 30 * 4 / 4 = 210
        assert_eq!(calculate_profit(&inputs, DEFAULT_COMMISSION), 1_700_000);
    }

    #[test]
    fn fragments_wipes_and_meals() {
        let inputs = ProfitInputs {
            counts: Counts::new(99, 0, 0, 1),
            cell_cost: 0.0,
            core_price: 10.0,
            meal_cost: 5.0,
            meal_num: 10,
        };
        // 10 * 45 * 0.95 = 427.5, minus 5 * 2 = 10
        assert_eq!(calculate_profit(&inputs, DEFAULT_COMMISSION), 4_175_000);
    }

    #[test]
    fn losses_are_negative() {
        let inputs = ProfitInputs {
            counts: Counts::new(0, 0, 0, 4),
            cell_cost: 1.0,
            ..Default::default()
        };
        assert_eq!(calculate_profit(&inputs, DEFAULT_COMMISSION), -300_000);
    }

    #[test]
    fn cycles_round_up() {
        assert_eq!(cycles_for_laps(0), 0);
        assert_eq!(cycles_for_laps(4), 1);
        assert_eq!(cycles_for_laps(5), 2);
    }
}

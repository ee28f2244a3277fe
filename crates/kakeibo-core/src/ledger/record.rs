use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profit::{calculate_profit, ProfitInputs};
use crate::counter::Counts;
use crate::error::ValidationError;

/// One saved farming session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub id: Uuid,
    pub username: String,
    pub date: NaiveDate,
    pub frag_45: u32,
    pub frag_75: u32,
    pub core: u32,
    pub wipes: u32,
    pub cell_cost: f64,
    pub core_price: f64,
    pub meal_cost: f64,
    pub meal_num: u32,
    /// Gold. Always derived from the other fields.
    pub profit: i64,
    pub created_at: DateTime<Utc>,
}

impl LedgerRecord {
    pub fn counts(&self) -> Counts {
        Counts::new(self.frag_45, self.frag_75, self.core, self.wipes)
    }

    pub fn profit_inputs(&self) -> ProfitInputs {
        ProfitInputs {
            counts: self.counts(),
            cell_cost: self.cell_cost,
            core_price: self.core_price,
            meal_cost: self.meal_cost,
            meal_num: self.meal_num,
        }
    }

    /// `YYYY-MM`.
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Apply a patch and recompute the profit.
    pub fn apply(&mut self, patch: &RecordPatch, commission: f64) -> Result<(), ValidationError> {
        if let Some(v) = patch.frag_45 {
            self.frag_45 = v;
        }
        if let Some(v) = patch.frag_75 {
            self.frag_75 = v;
        }
        if let Some(v) = patch.core {
            self.core = v;
        }
        if let Some(v) = patch.wipes {
            self.wipes = v;
        }
        if let Some(v) = patch.cell_cost {
            self.cell_cost = non_negative("cell_cost", v)?;
        }
        if let Some(v) = patch.core_price {
            self.core_price = non_negative("core_price", v)?;
        }
        if let Some(v) = patch.meal_cost {
            self.meal_cost = non_negative("meal_cost", v)?;
        }
        if let Some(v) = patch.meal_num {
            self.meal_num = v;
        }
        self.profit = calculate_profit(&self.profit_inputs(), commission);
        Ok(())
    }
}

/// Input for a new record; id, profit and creation time are filled in on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub username: String,
    pub date: NaiveDate,
    pub inputs: ProfitInputs,
}

impl NewRecord {
    pub fn into_record(self, commission: f64, now: DateTime<Utc>) -> Result<LedgerRecord, ValidationError> {
        let i = self.inputs;
        if self.username.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "username".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(LedgerRecord {
            id: Uuid::new_v4(),
            username: self.username,
            date: self.date,
            frag_45: i.counts.frag_45,
            frag_75: i.counts.frag_75,
            core: i.counts.core,
            wipes: i.counts.wipes,
            cell_cost: non_negative("cell_cost", i.cell_cost)?,
            core_price: non_negative("core_price", i.core_price)?,
            meal_cost: non_negative("meal_cost", i.meal_cost)?,
            meal_num: i.meal_num,
            profit: calculate_profit(&i, commission),
            created_at: now,
        })
    }
}

/// Editable fields of a stored record. Date, profit and owner are fixed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    pub frag_45: Option<u32>,
    pub frag_75: Option<u32>,
    pub core: Option<u32>,
    pub wipes: Option<u32>,
    pub cell_cost: Option<f64>,
    pub core_price: Option<f64>,
    pub meal_cost: Option<f64>,
    pub meal_num: Option<u32>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn non_negative(field: &str, v: f64) -> Result<f64, ValidationError> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(ValidationError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a non-negative price, got {v}"),
        })
    }
}

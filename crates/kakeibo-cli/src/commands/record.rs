use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use kakeibo_core::ledger::{filter_month, RecordStore};
use kakeibo_core::storage::Database;
use kakeibo_core::{Config, Counts, Event, NewRecord, ProfitInputs, RecordPatch};
use uuid::Uuid;

use super::{print_json, today, UserArg};

/// Editable record fields. Prices are in 10k G.
#[derive(Args, Debug, Default)]
pub struct RecordFields {
    #[arg(long)]
    frag45: Option<u32>,
    #[arg(long)]
    frag75: Option<u32>,
    #[arg(long)]
    core: Option<u32>,
    #[arg(long)]
    wipes: Option<u32>,
    #[arg(long)]
    cell_cost: Option<f64>,
    #[arg(long)]
    core_price: Option<f64>,
    #[arg(long)]
    meal_cost: Option<f64>,
    #[arg(long)]
    meal_num: Option<u32>,
}

impl RecordFields {
    fn patch(&self) -> RecordPatch {
        RecordPatch {
            frag_45: self.frag45,
            frag_75: self.frag75,
            core: self.core,
            wipes: self.wipes,
            cell_cost: self.cell_cost,
            core_price: self.core_price,
            meal_cost: self.meal_cost,
            meal_num: self.meal_num,
        }
    }
}

#[derive(Subcommand)]
pub enum RecordAction {
    /// Save a session to the ledger
    Add {
        /// Session date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Take the counts from the user's counting session
        #[arg(long)]
        from_session: bool,
        #[command(flatten)]
        fields: RecordFields,
        #[command(flatten)]
        who: UserArg,
    },
    /// List records, oldest first
    List {
        /// Only this month, YYYY-MM
        #[arg(long)]
        month: Option<String>,
        #[command(flatten)]
        who: UserArg,
    },
    /// Edit a record; its profit is recomputed
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: RecordFields,
    },
    /// Delete a record
    Delete { id: Uuid },
}

pub fn run(action: RecordAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let commission = config.ledger.commission;

    match action {
        RecordAction::Add {
            date,
            from_session,
            fields,
            who,
        } => {
            let username = who.resolve(&config);
            let base = if from_session {
                db.load_session(&username)?.counts
            } else {
                Counts::default()
            };
            let counts = Counts::new(
                fields.frag45.unwrap_or(base.frag_45),
                fields.frag75.unwrap_or(base.frag_75),
                fields.core.unwrap_or(base.core),
                fields.wipes.unwrap_or(base.wipes),
            );
            let now = Utc::now();
            let record = NewRecord {
                username: username.clone(),
                date: date.unwrap_or_else(|| today(&config)),
                inputs: ProfitInputs {
                    counts,
                    cell_cost: fields.cell_cost.unwrap_or(config.ledger.default_cell_cost),
                    core_price: fields.core_price.unwrap_or(config.ledger.default_core_price),
                    meal_cost: fields.meal_cost.unwrap_or(0.0),
                    meal_num: fields.meal_num.unwrap_or(0),
                },
            }
            .into_record(commission, now)?;

            db.add_record(&record)?;
            db.touch_user(&username, now)?;
            print_json(&Event::RecordAdded {
                id: record.id.to_string(),
                username,
                profit: record.profit,
                at: now,
            })?;
        }
        RecordAction::List { month, who } => {
            let records = db.records_for_user(&who.resolve(&config))?;
            print_json(&filter_month(&records, month.as_deref()))?;
        }
        RecordAction::Update { id, fields } => {
            let patch = fields.patch();
            if patch.is_empty() {
                return Err("nothing to update".into());
            }
            let record = db.update_record(id, &patch, commission)?;
            print_json(&record)?;
        }
        RecordAction::Delete { id } => {
            if !db.delete_record(id)? {
                return Err(format!("no record with id {id}").into());
            }
            println!("deleted {id}");
        }
    }
    Ok(())
}

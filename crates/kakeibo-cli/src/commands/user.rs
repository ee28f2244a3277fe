use chrono::Utc;
use clap::Subcommand;
use kakeibo_core::ledger::RecordStore;
use kakeibo_core::storage::Database;

use super::print_json;

#[derive(Subcommand)]
pub enum UserAction {
    /// Register a user
    Create { name: String },
    /// List users, most recently active first
    List,
}

pub fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        UserAction::Create { name } => {
            let name = name.trim();
            if name.is_empty() {
                return Err("user name must not be empty".into());
            }
            db.create_user(name, Utc::now())?;
            println!("user created: {name}");
        }
        UserAction::List => print_json(&db.list_users()?)?,
    }
    Ok(())
}

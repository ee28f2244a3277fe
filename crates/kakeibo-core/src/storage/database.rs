//! SQLite-based ledger storage.
//!
//! Provides persistent storage for:
//! - Users and their ledger records
//! - Market prices, in Gold
//! - Key-value store for application state (per-user counting sessions)

use chrono::{DateTime, NaiveDate, Utc};
use indoc::indoc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use uuid::Uuid;

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::ledger::{LedgerRecord, PriceSource, RecordStore, UserRecord};
use crate::session::SessionContext;

const SESSION_KEY_PREFIX: &str = "count_session:";

const RECORD_COLUMNS: &str = "id, username, date, frag_45, frag_75, core, wipes, \
     cell_cost, core_price, meal_cost, meal_num, profit, created_at";

/// SQLite database for the ledger.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/kakeibo/kakeibo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("kakeibo.db"))
    }

    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| DatabaseError::OpenFailed {
            path: ":memory:".into(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(indoc! {"
                CREATE TABLE IF NOT EXISTS users (
                    username      TEXT PRIMARY KEY,
                    created_at    TEXT NOT NULL,
                    last_activity TEXT
                );

                CREATE TABLE IF NOT EXISTS records (
                    id          TEXT PRIMARY KEY,
                    username    TEXT NOT NULL,
                    date        TEXT NOT NULL,
                    frag_45     INTEGER NOT NULL DEFAULT 0,
                    frag_75     INTEGER NOT NULL DEFAULT 0,
                    core        INTEGER NOT NULL DEFAULT 0,
                    wipes       INTEGER NOT NULL DEFAULT 0,
                    cell_cost   REAL NOT NULL DEFAULT 0,
                    core_price  REAL NOT NULL DEFAULT 0,
                    meal_cost   REAL NOT NULL DEFAULT 0,
                    meal_num    INTEGER NOT NULL DEFAULT 0,
                    profit      INTEGER NOT NULL,
                    created_at  TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS prices (
                    item       TEXT PRIMARY KEY,
                    gold       REAL NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS kv (
                    key   TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_records_username_date ON records(username, date);
            "})
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Get a value from the kv store.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Set a value in the kv store.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// # Errors
    /// Returns an error if the delete fails.
    pub fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// The saved counting session for `username`, or a fresh one.
    ///
    /// A stored session that no longer parses is logged and replaced by a
    /// fresh context rather than blocking the user.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn load_session(&self, username: &str) -> Result<SessionContext> {
        let key = format!("{SESSION_KEY_PREFIX}{username}");
        let Some(json) = self.kv_get(&key)? else {
            return Ok(SessionContext::new(username));
        };
        match serde_json::from_str::<SessionContext>(&json) {
            Ok(mut ctx) => {
                ctx.username = username.to_string();
                Ok(ctx)
            }
            Err(e) => {
                tracing::warn!(user = username, error = %e, "discarding unreadable session");
                Ok(SessionContext::new(username))
            }
        }
    }

    /// # Errors
    /// Returns an error if the context cannot be serialized or stored.
    pub fn save_session(&self, ctx: &SessionContext) -> Result<()> {
        let json = serde_json::to_string(ctx)?;
        self.kv_set(&format!("{SESSION_KEY_PREFIX}{}", ctx.username), &json)
    }

    /// Record the latest market price of `item`, in Gold.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn set_price(&self, item: &str, gold: f64, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO prices (item, gold, updated_at) VALUES (?1, ?2, ?3)",
            params![item, gold, at.to_rfc3339()],
        )?;
        Ok(())
    }

    /// Every stored price, by item name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn prices(&self) -> Result<Vec<(String, f64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT item, gold FROM prices ORDER BY item")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

impl PriceSource for Database {
    fn latest_price(&self, item: &str) -> Option<f64> {
        self.conn
            .query_row(
                "SELECT gold FROM prices WHERE item = ?1",
                params![item],
                |row| row.get(0),
            )
            .optional()
            .unwrap_or_else(|e| {
                tracing::warn!(item, error = %e, "price lookup failed");
                None
            })
    }
}

/// Columns exactly as stored; decoded in [`RawRecordRow::decode`].
struct RawRecordRow {
    id: String,
    username: String,
    date: String,
    frag_45: u32,
    frag_75: u32,
    core: u32,
    wipes: u32,
    cell_cost: f64,
    core_price: f64,
    meal_cost: f64,
    meal_num: u32,
    profit: i64,
    created_at: String,
}

impl RawRecordRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            date: row.get(2)?,
            frag_45: row.get(3)?,
            frag_75: row.get(4)?,
            core: row.get(5)?,
            wipes: row.get(6)?,
            cell_cost: row.get(7)?,
            core_price: row.get(8)?,
            meal_cost: row.get(9)?,
            meal_num: row.get(10)?,
            profit: row.get(11)?,
            created_at: row.get(12)?,
        })
    }

    fn decode(self) -> Result<LedgerRecord, DatabaseError> {
        let corrupt = |message: String| DatabaseError::CorruptRow {
            table: "records",
            message,
        };
        Ok(LedgerRecord {
            id: Uuid::parse_str(&self.id).map_err(|e| corrupt(format!("id {}: {e}", self.id)))?,
            date: NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
                .map_err(|e| corrupt(format!("date {}: {e}", self.date)))?,
            created_at: parse_timestamp(&self.created_at).map_err(corrupt)?,
            username: self.username,
            frag_45: self.frag_45,
            frag_75: self.frag_75,
            core: self.core,
            wipes: self.wipes,
            cell_cost: self.cell_cost,
            core_price: self.core_price,
            meal_cost: self.meal_cost,
            meal_num: self.meal_num,
            profit: self.profit,
        })
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("timestamp {raw}: {e}"))
}

impl Database {
    fn query_records(&self, sql: &str, param: &str) -> Result<Vec<LedgerRecord>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params![param], RawRecordRow::from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.decode()?);
        }
        Ok(out)
    }
}

impl RecordStore for Database {
    fn create_user(&self, username: &str, at: DateTime<Utc>) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO users (username, created_at) VALUES (?1, ?2)",
            params![username, at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<UserRecord>> {
        let mut stmt = self.conn.prepare(indoc! {"
            SELECT username, created_at, last_activity
            FROM users
            ORDER BY COALESCE(last_activity, created_at) DESC, username
        "})?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let corrupt = |message: String| DatabaseError::CorruptRow {
            table: "users",
            message,
        };
        let mut users = Vec::new();
        for row in rows {
            let (username, created_at, last_activity) = row?;
            users.push(UserRecord {
                username,
                created_at: parse_timestamp(&created_at).map_err(corrupt)?,
                last_activity: last_activity
                    .as_deref()
                    .map(parse_timestamp)
                    .transpose()
                    .map_err(corrupt)?,
            });
        }
        Ok(users)
    }

    fn touch_user(&self, username: &str, at: DateTime<Utc>) -> Result<()> {
        let ts = at.to_rfc3339();
        self.conn.execute(
            indoc! {"
                INSERT INTO users (username, created_at, last_activity) VALUES (?1, ?2, ?2)
                ON CONFLICT(username) DO UPDATE SET last_activity = excluded.last_activity
            "},
            params![username, ts],
        )?;
        Ok(())
    }

    fn add_record(&self, record: &LedgerRecord) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO records ({RECORD_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)"
            ),
            params![
                record.id.to_string(),
                record.username,
                record.date.format("%Y-%m-%d").to_string(),
                record.frag_45,
                record.frag_75,
                record.core,
                record.wipes,
                record.cell_cost,
                record.core_price,
                record.meal_cost,
                record.meal_num,
                record.profit,
                record.created_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(id = %record.id, user = %record.username, "record stored");
        Ok(())
    }

    fn records_for_user(&self, username: &str) -> Result<Vec<LedgerRecord>> {
        self.query_records(
            &format!(
                "SELECT {RECORD_COLUMNS} FROM records WHERE username = ?1 ORDER BY date, created_at"
            ),
            username,
        )
    }

    fn get_record(&self, id: Uuid) -> Result<Option<LedgerRecord>> {
        let mut found = self.query_records(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
            &id.to_string(),
        )?;
        Ok(found.pop())
    }

    fn replace_record(&self, record: &LedgerRecord) -> Result<()> {
        self.conn.execute(
            indoc! {"
                UPDATE records SET
                    frag_45 = ?2, frag_75 = ?3, core = ?4, wipes = ?5,
                    cell_cost = ?6, core_price = ?7, meal_cost = ?8, meal_num = ?9,
                    profit = ?10
                WHERE id = ?1
            "},
            params![
                record.id.to_string(),
                record.frag_45,
                record.frag_75,
                record.core,
                record.wipes,
                record.cell_cost,
                record.core_price,
                record.meal_cost,
                record.meal_num,
                record.profit,
            ],
        )?;
        Ok(())
    }

    fn delete_record(&self, id: Uuid) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1", params![id.to_string()])?;
        Ok(n > 0)
    }
}

//! # Kakeibo Core Library
//!
//! This library provides the core logic for the kakeibo farming ledger: live
//! counting of farmed items, the count history timeline, and the profit
//! ledger the counted sessions are saved into. The CLI is a thin layer over
//! the same library.
//!
//! ## Architecture
//!
//! - **Counting**: Four saturating counters, diffed against a baseline after
//!   every user action; only increases of the running total are logged
//! - **Interval Log**: Timestamped count events turned into intervals, with
//!   the last one left open until the next event
//! - **Timeline**: Intervals laid out as a scene graph and serialized to SVG,
//!   colored by a six-band latency gradient
//! - **Ledger**: Profit arithmetic, stored records, monthly and weekly aggregates
//! - **Storage**: SQLite ledger storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`SessionController`]: Runs one observe/append/render pass per action
//! - [`TimelineRenderer`]: Turns intervals into a [`TimelineView`]
//! - [`Database`]: Ledger and session persistence
//! - [`Config`]: Application configuration management

pub mod counter;
pub mod error;
pub mod events;
pub mod gradient;
pub mod interval_log;
pub mod ledger;
pub mod session;
pub mod storage;
pub mod timeline;

pub use counter::{diff, ChangeEvent, CounterKind, CounterState, Counts};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use gradient::{color_for_duration, Rgb};
pub use interval_log::{CountEvent, EventKind, Interval, IntervalLog, RawCountEvent};
pub use ledger::{LedgerRecord, NewRecord, ProfitInputs, RecordPatch, RecordStore};
pub use session::{Clock, FixedClock, SessionContext, SessionController, SystemClock};
pub use storage::{Config, Database};
pub use timeline::{TimelineConfig, TimelineRenderer, TimelineSummary, TimelineView};

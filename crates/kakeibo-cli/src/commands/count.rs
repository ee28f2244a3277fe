use chrono::Utc;
use clap::Subcommand;
use kakeibo_core::ledger::RecordStore;
use kakeibo_core::storage::Database;
use kakeibo_core::timeline::{TimelineSummary, TimelineView};
use kakeibo_core::{Config, CounterKind, Counts, SessionController};
use serde::Serialize;
use std::path::PathBuf;

use super::{print_json, UserArg};

#[derive(Subcommand)]
pub enum CountAction {
    /// Increment a counter (45, 75, core, wipe)
    Add {
        kind: CounterKind,
        #[arg(long, default_value_t = 1)]
        by: u32,
        #[command(flatten)]
        who: UserArg,
    },
    /// Decrement a counter
    Sub {
        kind: CounterKind,
        #[arg(long, default_value_t = 1)]
        by: u32,
        #[command(flatten)]
        who: UserArg,
    },
    /// Overwrite counters; omitted ones keep their value
    Set {
        #[arg(long)]
        frag45: Option<u32>,
        #[arg(long)]
        frag75: Option<u32>,
        #[arg(long)]
        core: Option<u32>,
        #[arg(long)]
        wipes: Option<u32>,
        #[command(flatten)]
        who: UserArg,
    },
    /// Start the timeline clock
    Start {
        #[command(flatten)]
        who: UserArg,
    },
    /// Clear counters and history
    Reset {
        #[command(flatten)]
        who: UserArg,
    },
    /// Print counters, laps and the timeline summary as JSON
    Status {
        #[command(flatten)]
        who: UserArg,
    },
    /// Render the count history timeline as SVG
    Render {
        /// Write the SVG here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        who: UserArg,
    },
}

impl CountAction {
    fn who(&self) -> &UserArg {
        match self {
            Self::Add { who, .. }
            | Self::Sub { who, .. }
            | Self::Set { who, .. }
            | Self::Start { who }
            | Self::Reset { who }
            | Self::Status { who }
            | Self::Render { who, .. } => who,
        }
    }
}

#[derive(Serialize)]
struct CountStatus<'a> {
    user: &'a str,
    counts: &'a Counts,
    laps: u64,
    cycles: u64,
    summary: TimelineSummary,
}

fn print_status(ctl: &SessionController, warn_minutes: f64) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = ctl.context();
    print_json(&CountStatus {
        user: &ctx.username,
        counts: &ctx.counts,
        laps: ctl.laps(),
        cycles: ctl.cycles(),
        summary: ctl.summary(warn_minutes),
    })
}

pub fn run(action: CountAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let db = Database::open()?;
    let username = action.who().resolve(&config);
    let mut ctl = SessionController::new(db.load_session(&username)?);
    let warn = config.timeline.warn_minutes;

    // One pass per invocation: apply, observe, report, save.
    match action {
        CountAction::Add { kind, by, .. } => match ctl.adjust(kind, i64::from(by)) {
            Some(event) => print_json(&event)?,
            None => print_status(&ctl, warn)?,
        },
        CountAction::Sub { kind, by, .. } => {
            ctl.adjust(kind, -i64::from(by));
            print_status(&ctl, warn)?;
        }
        CountAction::Set {
            frag45,
            frag75,
            core,
            wipes,
            ..
        } => {
            let current = *ctl.counts();
            let counts = Counts::new(
                frag45.unwrap_or(current.frag_45),
                frag75.unwrap_or(current.frag_75),
                core.unwrap_or(current.core),
                wipes.unwrap_or(current.wipes),
            );
            match ctl.set_counts(counts) {
                Some(event) => print_json(&event)?,
                None => print_status(&ctl, warn)?,
            }
        }
        CountAction::Start { .. } => match ctl.start() {
            Some(event) => print_json(&event)?,
            None => eprintln!("already counting"),
        },
        CountAction::Reset { .. } => print_json(&ctl.reset())?,
        CountAction::Status { .. } => {
            ctl.record_if_increased();
            print_status(&ctl, warn)?;
        }
        CountAction::Render { out, .. } => match ctl.render(&config.renderer()) {
            TimelineView::NotStarted(placeholder) => {
                println!("{}", placeholder.message);
                eprintln!("hint: run `kakeibo-cli count start` to {}", placeholder.action_label.to_lowercase());
            }
            TimelineView::Drawn(rendered) => {
                let svg = rendered.svg();
                match out {
                    Some(path) => {
                        std::fs::write(&path, svg)?;
                        println!("wrote {}", path.display());
                        println!("{}", rendered.summary.elapsed_caption());
                        println!("{}", rendered.summary.mean_caption());
                    }
                    None => println!("{svg}"),
                }
            }
        },
    }

    db.touch_user(&username, Utc::now())?;
    db.save_session(ctl.context())?;
    Ok(())
}

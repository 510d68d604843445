//! Habit list subcommand.
//!
//! Each invocation loads one day through the sync engine, applies at most one
//! edit, waits for the engine to reconcile and prints the resulting view.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use habitlog_core::{parse_day, Config, DateCursor, HttpLogStore, SyncEngine, SyncState, SyncView};

const DISPLAY_FORMAT: &str = "%a, %-d %b %Y";

/// Which day to operate on. Defaults to today.
#[derive(Args)]
pub struct DayArgs {
    /// Day as YYYY-MM-DD
    #[arg(long, conflicts_with = "offset")]
    date: Option<String>,
    /// Days relative to today (e.g. -1 for yesterday)
    #[arg(long, allow_hyphen_values = true)]
    offset: Option<i64>,
    /// Print the view as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
pub enum HabitsAction {
    /// List habits and their logged values for a day
    List {
        #[command(flatten)]
        day: DayArgs,
    },
    /// Add 1 to a habit's value
    Inc {
        /// Habit ID
        id: i64,
        #[command(flatten)]
        day: DayArgs,
    },
    /// Subtract 1 from a habit's value
    Dec {
        /// Habit ID
        id: i64,
        #[command(flatten)]
        day: DayArgs,
    },
    /// Set a habit's value
    Set {
        /// Habit ID
        id: i64,
        /// New value
        #[arg(allow_hyphen_values = true)]
        value: f64,
        #[command(flatten)]
        day: DayArgs,
    },
}

enum Edit {
    Increment,
    Decrement,
    Set(f64),
}

pub fn run(action: HabitsAction) -> Result<(), Box<dyn std::error::Error>> {
    let (id, edit, day) = match action {
        HabitsAction::List { day } => return show(&day, None),
        HabitsAction::Inc { id, day } => (id, Edit::Increment, day),
        HabitsAction::Dec { id, day } => (id, Edit::Decrement, day),
        HabitsAction::Set { id, value, day } => (id, Edit::Set(value), day),
    };
    show(&day, Some((id, edit)))
}

fn show(args: &DayArgs, edit: Option<(i64, Edit)>) -> Result<(), Box<dyn std::error::Error>> {
    let target = resolve_day(args)?;
    let store = HttpLogStore::from_config(&Config::load_or_default().api())?;

    let rt = super::runtime()?;
    let view = rt.block_on(async move {
        let engine = SyncEngine::with_cursor(store, DateCursor::today());
        engine.load_for_day(target).wait().await;

        if let Some((id, edit)) = edit {
            if engine.state().snapshot().and_then(|s| s.find(id)).is_none() {
                return Err(format!("no habit with id {id} on {target}"));
            }
            let task = match edit {
                Edit::Increment => engine.increment(id),
                Edit::Decrement => engine.decrement(id),
                Edit::Set(value) => engine.set_value(id, value),
            };
            task.wait().await;
        }
        Ok(engine.view())
    })?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print_view(&view);
    }

    match &view.state {
        SyncState::Error(message) => Err(message.clone().into()),
        _ => Ok(()),
    }
}

fn resolve_day(args: &DayArgs) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    let cursor = DateCursor::today();
    if let Some(date) = &args.date {
        return parse_day(date).map_err(|e| format!("invalid date '{date}': {e}").into());
    }
    match args.offset {
        Some(offset) => {
            let shifted = cursor.shift(offset);
            if offset != 0 && shifted == cursor {
                return Err(format!("offset {offset} is out of range").into());
            }
            Ok(shifted.day())
        }
        None => Ok(cursor.day()),
    }
}

fn print_view(view: &SyncView) {
    let day = view.cursor.day().format(DISPLAY_FORMAT);
    if view.cursor.is_today() {
        println!("{day} (today)");
    } else {
        println!("{day}");
    }

    match &view.state {
        SyncState::Loading => println!("  loading..."),
        SyncState::Error(_) => {}
        SyncState::Success(snapshot) if snapshot.is_empty() => println!("  no habits"),
        SyncState::Success(snapshot) => {
            for habit in snapshot.habits() {
                let value = habit
                    .logged_value
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "-".into());
                println!("  [{}] {:<24} {value}", habit.id, habit.name);
            }
        }
    }
}

//! Daily reminder subcommand.
//!
//! Wake-ups registered through [`TokioTimerHost`] live only as long as this
//! process, so `run` is the long-lived owner of the chain. The one-shot
//! actions work on the persisted record and report what the chain would do.

use chrono::Local;
use clap::Subcommand;
use habitlog_core::reminder::notice::{CHANNEL_DESCRIPTION, CHANNEL_NAME};
use habitlog_core::{
    compute_next_trigger, Config, Event, FileRecordStore, RecurringScheduler, Reminder, ReminderSink, TokioTimerHost,
    Wakeup,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

const DISPLAY_FORMAT: &str = "%a, %-d %b %Y %H:%M %Z";

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Arm the daily reminder if it was never armed before
    Arm,
    /// Keep the reminder chain alive in the foreground
    Run {
        /// Print reminder events as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Cancel the pending wake-up, keeping the armed-once record
    Cancel,
    /// Cancel and clear the armed-once record, and turn the reminder off
    Disable,
    /// Show the armed-once record and the next trigger
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print when the next reminder would fire
    Next,
}

type Scheduler = RecurringScheduler<TokioTimerHost, FileRecordStore>;

/// Prints the reminder to the terminal.
struct TerminalSink {
    json: bool,
}

impl ReminderSink for TerminalSink {
    fn show_reminder(&self, reminder: &Reminder) {
        if !self.json {
            println!("\x07{}: {}", reminder.title, reminder.body);
        }
    }
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ReminderAction::Arm => {
            ensure_enabled()?;
            let rt = super::runtime()?;
            let (scheduler, _wakeups) = scheduler()?;
            scheduler.resume()?;
            // The registration itself ends with this process; only the
            // record outlives it.
            match rt.block_on(async { scheduler.arm_if_not_already() })? {
                Some(armed) => println!(
                    "reminder record initialised, next trigger {}",
                    armed.trigger_at.format(DISPLAY_FORMAT)
                ),
                None => println!("reminder record already initialised"),
            }
            println!("keep `habitlog reminder run` running to receive reminders");
        }
        ReminderAction::Run { json } => {
            ensure_enabled()?;
            let rt = super::runtime()?;
            rt.block_on(run_chain(json))?;
        }
        ReminderAction::Cancel => {
            let (scheduler, _wakeups) = scheduler()?;
            scheduler.stop()?;
            println!("reminder cancelled; a running `habitlog reminder run` stops before its next firing");
        }
        ReminderAction::Disable => {
            let (scheduler, _wakeups) = scheduler()?;
            scheduler.disable()?;
            let mut config = Config::load()?;
            config.reminder.enabled = false;
            config.save()?;
            println!("reminder disabled; a running `habitlog reminder run` stops before its next firing");
        }
        ReminderAction::Status { json } => {
            let (scheduler, _wakeups) = scheduler()?;
            let status = scheduler.status()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                let armed = match status.armed_once {
                    Some(true) => "yes",
                    Some(false) => "no (cleared)",
                    None => "never",
                };
                println!("{CHANNEL_NAME}: {CHANNEL_DESCRIPTION}");
                println!("armed once:   {armed}");
                println!("stopped:      {}", if status.stopped { "yes" } else { "no" });
                println!("next trigger: {}", status.next_trigger_at.format(DISPLAY_FORMAT));
            }
        }
        ReminderAction::Next => {
            println!("{}", compute_next_trigger(&Local::now()).format(DISPLAY_FORMAT));
        }
    }
    Ok(())
}

fn scheduler() -> habitlog_core::error::Result<(Scheduler, UnboundedReceiver<Wakeup>)> {
    let (host, wakeups) = TokioTimerHost::new();
    let records = FileRecordStore::open_default()?;
    Ok((RecurringScheduler::new(host, records), wakeups))
}

fn ensure_enabled() -> Result<(), Box<dyn std::error::Error>> {
    if Config::load_or_default().reminder.enabled {
        Ok(())
    } else {
        Err("reminder is disabled (habitlog config set reminder.enabled true)".into())
    }
}

async fn run_chain(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut wakeups) = scheduler()?;
    let sink = TerminalSink { json };
    scheduler.resume()?;

    // A fresh process has no registrations, same as a host restart.
    let armed = match scheduler.arm_if_not_already()? {
        Some(armed) => armed,
        None => scheduler.on_host_restart()?,
    };
    report(&armed.to_event(), json)?;

    while let Some(wakeup) = wakeups.recv().await {
        info!(identity = %wakeup.identity, scheduled_for = %wakeup.scheduled_for, "reminder due");
        // `cancel` and `disable` run in other processes and can only leave
        // their mark in the records and the config.
        if scheduler.is_stopped() || !Config::load_or_default().reminder.enabled {
            info!("reminder stopped from elsewhere, letting the chain lapse");
            if !json {
                println!("reminder stopped");
            }
            return Ok(());
        }
        // Never plan the successor from a wall clock that lags the trigger.
        let now = Local::now().max(wakeup.scheduled_for);
        let event = scheduler.on_fire_at(now, &sink);
        report(&event, json)?;
        if matches!(event, Event::ReminderFired { next_trigger_at: None, .. }) {
            return Err("could not re-arm the daily reminder".into());
        }
    }
    Ok(())
}

fn report(event: &Event, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        Event::ReminderArmed { trigger_at, precise, .. } => {
            let timing = if *precise { "" } else { " (best effort)" };
            println!(
                "next reminder {}{timing}",
                trigger_at.with_timezone(&Local).format(DISPLAY_FORMAT)
            );
        }
        Event::ReminderFired {
            next_trigger_at: Some(next),
            ..
        } => println!("next reminder {}", next.with_timezone(&Local).format(DISPLAY_FORMAT)),
        Event::ReminderFired { next_trigger_at: None, .. } => {}
        Event::ReminderCancelled { .. } => println!("reminder cancelled"),
    }
    Ok(())
}

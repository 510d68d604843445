use serde::{Deserialize, Serialize};

pub const CHANNEL_ID: &str = "daily_habits_reminder";
pub const CHANNEL_NAME: &str = "Daily Habits Reminder";
pub const CHANNEL_DESCRIPTION: &str = "Reminds you to log your habits at 11 AM every day";
pub const NOTIFICATION_ID: u32 = 1001;

/// What the presentation layer shows when the daily trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub notification_id: u32,
    pub channel_id: String,
    pub title: String,
    pub body: String,
    /// Open the habit list on today when the reminder is acted on.
    pub open_today: bool,
}

impl Reminder {
    pub fn daily() -> Self {
        Self {
            notification_id: NOTIFICATION_ID,
            channel_id: CHANNEL_ID.into(),
            title: "Time to log your habits".into(),
            body: "Tap to open the daily wizard".into(),
            open_today: true,
        }
    }
}

//! Countdown section data and time arithmetic.

use std::cmp::Ordering;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Accent color of a countdown card.
pub enum CountdownColor {
    #[default]
    Blue,
    Green,
    Purple,
    Pink,
    Orange,
    Red,
    Yellow,
}

impl CountdownColor {
    pub const ALL: [Self; 7] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Pink,
        Self::Orange,
        Self::Red,
        Self::Yellow,
    ];

    pub fn css_name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Orange => "orange",
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }

    pub fn from_css_name(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.css_name() == raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What the countdown is counting toward.
pub enum CountdownCategory {
    Vacation,
    Deadline,
    Event,
    Birthday,
    #[default]
    Other,
}

impl CountdownCategory {
    pub const ALL: [Self; 5] = [
        Self::Vacation,
        Self::Deadline,
        Self::Event,
        Self::Birthday,
        Self::Other,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::Deadline => "deadline",
            Self::Event => "event",
            Self::Birthday => "birthday",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Vacation => "Vacation",
            Self::Deadline => "Deadline",
            Self::Event => "Event",
            Self::Birthday => "Birthday",
            Self::Other => "Other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Vacation => "🏖️",
            Self::Deadline => "⏰",
            Self::Event => "🎉",
            Self::Birthday => "🎂",
            Self::Other => "📌",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.slug() == raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One stored countdown.
pub struct Countdown {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD` in local time.
    pub target_date: String,
    /// Optional `HH:MM`; end of day is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_time: Option<String>,
    #[serde(default)]
    pub color: CountdownColor,
    #[serde(default)]
    pub category: CountdownCategory,
}

impl Countdown {
    /// Resolves the local instant this countdown ends at, or `None` if the stored strings are
    /// malformed.
    pub fn target(&self) -> Option<NaiveDateTime> {
        parse_target(&self.target_date, self.target_time.as_deref()).ok()
    }

    pub fn time_remaining(&self, now: NaiveDateTime) -> Option<TimeRemaining> {
        self.target().map(|target| TimeRemaining::between(now, target))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// User-entered fields for creating or editing a countdown.
pub struct CountdownDraft {
    pub title: String,
    pub target_date: String,
    pub target_time: String,
    pub color: CountdownColor,
    pub category: CountdownCategory,
}

impl CountdownDraft {
    pub fn from_countdown(countdown: &Countdown) -> Self {
        Self {
            title: countdown.title.clone(),
            target_date: countdown.target_date.clone(),
            target_time: countdown.target_time.clone().unwrap_or_default(),
            color: countdown.color,
            category: countdown.category,
        }
    }

    fn validate(&self) -> Result<(String, String, Option<String>), CountdownInputError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CountdownInputError::EmptyTitle);
        }
        let date = self.target_date.trim();
        let time = Some(self.target_time.trim()).filter(|time| !time.is_empty());
        parse_target(date, time)?;
        Ok((title.to_string(), date.to_string(), time.map(str::to_string)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Rejected countdown input.
pub enum CountdownInputError {
    #[error("a countdown needs a title")]
    EmptyTitle,
    #[error("`{0}` is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("`{0}` is not an HH:MM time")]
    InvalidTime(String),
}

fn parse_target(date: &str, time: Option<&str>) -> Result<NaiveDateTime, CountdownInputError> {
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| CountdownInputError::InvalidDate(date.to_string()))?;
    let time = match time {
        Some(raw) => NaiveTime::parse_from_str(raw, TIME_FORMAT)
            .map_err(|_| CountdownInputError::InvalidTime(raw.to_string()))?,
        None => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
    };
    Ok(date.and_time(time))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Whole-unit breakdown of the time left until a target.
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub is_past: bool,
}

impl TimeRemaining {
    pub const PAST: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        is_past: true,
    };

    pub fn between(now: NaiveDateTime, target: NaiveDateTime) -> Self {
        let total = (target - now).num_seconds();
        if total <= 0 {
            return Self::PAST;
        }
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
            is_past: false,
        }
    }

    /// Compact `1d 2h 3m 4s` form with leading zero units dropped.
    pub fn compact(&self) -> String {
        if self.is_past {
            return "Past".to_string();
        }
        let mut parts = Vec::new();
        if self.days > 0 {
            parts.push(format!("{}d", self.days));
        }
        if self.days > 0 || self.hours > 0 {
            parts.push(format!("{}h", self.hours));
        }
        if self.days > 0 || self.hours > 0 || self.minutes > 0 {
            parts.push(format!("{}m", self.minutes));
        }
        parts.push(format!("{}s", self.seconds));
        parts.join(" ")
    }

    /// Coarse human description, e.g. `3 weeks remaining`.
    pub fn relative(&self) -> String {
        if self.is_past {
            return "This date has passed".to_string();
        }
        let days = self.days;
        if days == 0 {
            if self.hours == 0 {
                return match self.minutes {
                    0 => "Less than a minute!".to_string(),
                    1 => "1 minute remaining".to_string(),
                    n => format!("{n} minutes remaining"),
                };
            }
            return match self.hours {
                1 => "1 hour remaining".to_string(),
                n => format!("{n} hours remaining"),
            };
        }
        match days {
            1 => "Tomorrow!".to_string(),
            2..=6 => format!("{days} days remaining"),
            7..=13 => "1 week remaining".to_string(),
            14..=29 => format!("{} weeks remaining", days / 7),
            30..=59 => "1 month remaining".to_string(),
            _ => format!("{} months remaining", days / 30),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Persisted `countdown` section.
pub struct CountdownSection {
    #[serde(default)]
    pub countdowns: Vec<Countdown>,
}

impl CountdownSection {
    /// Validates `draft` and stores it as a new countdown, returning its id.
    pub fn add(&mut self, draft: &CountdownDraft, now_ms: u64) -> Result<String, CountdownInputError> {
        let (title, target_date, target_time) = draft.validate()?;
        let id = self.unique_id(now_ms);
        self.countdowns.push(Countdown {
            id: id.clone(),
            title,
            target_date,
            target_time,
            color: draft.color,
            category: draft.category,
        });
        Ok(id)
    }

    /// Replaces the editable fields of countdown `id`. Returns `Ok(false)` for an unknown id.
    pub fn update(&mut self, id: &str, draft: &CountdownDraft) -> Result<bool, CountdownInputError> {
        let (title, target_date, target_time) = draft.validate()?;
        let Some(countdown) = self.countdowns.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        countdown.title = title;
        countdown.target_date = target_date;
        countdown.target_time = target_time;
        countdown.color = draft.color;
        countdown.category = draft.category;
        Ok(true)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.countdowns.len();
        self.countdowns.retain(|countdown| countdown.id != id);
        self.countdowns.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Countdown> {
        self.countdowns.iter().find(|countdown| countdown.id == id)
    }

    /// Upcoming countdowns nearest first, then passed ones. Malformed entries sort last.
    pub fn sorted(&self, now: NaiveDateTime) -> Vec<Countdown> {
        let mut sorted = self.countdowns.clone();
        sorted.sort_by(|a, b| compare_for_display(a, b, now));
        sorted
    }

    fn unique_id(&self, now_ms: u64) -> String {
        let mut suffix = 0u32;
        loop {
            let candidate = if suffix == 0 {
                format!("countdown-{now_ms}")
            } else {
                format!("countdown-{now_ms}-{suffix}")
            };
            if self.get(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }
}

fn compare_for_display(a: &Countdown, b: &Countdown, now: NaiveDateTime) -> Ordering {
    match (a.target(), b.target()) {
        (Some(a), Some(b)) => {
            let a_past = a <= now;
            let b_past = b <= now;
            a_past.cmp(&b_past).then(a.cmp(&b))
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

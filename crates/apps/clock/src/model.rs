//! World clock locations, reminders, and time formatting.
//!
//! Offsets are fixed standard-time offsets; daylight saving is not modeled.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOCAL_LOCATION_ID: &str = "1";
const REMINDER_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A city the location picker can add.
pub struct TimezonePreset {
    pub city: &'static str,
    pub country: &'static str,
    pub timezone: &'static str,
    /// Minutes east of UTC.
    pub offset_minutes: i32,
}

const fn preset(
    city: &'static str,
    country: &'static str,
    timezone: &'static str,
    offset_minutes: i32,
) -> TimezonePreset {
    TimezonePreset {
        city,
        country,
        timezone,
        offset_minutes,
    }
}

pub const TIMEZONE_PRESETS: &[TimezonePreset] = &[
    preset("New York", "USA", "America/New_York", -300),
    preset("Los Angeles", "USA", "America/Los_Angeles", -480),
    preset("Chicago", "USA", "America/Chicago", -360),
    preset("Denver", "USA", "America/Denver", -420),
    preset("Toronto", "Canada", "America/Toronto", -300),
    preset("Mexico City", "Mexico", "America/Mexico_City", -360),
    preset("São Paulo", "Brazil", "America/Sao_Paulo", -180),
    preset("London", "UK", "Europe/London", 0),
    preset("Paris", "France", "Europe/Paris", 60),
    preset("Berlin", "Germany", "Europe/Berlin", 60),
    preset("Madrid", "Spain", "Europe/Madrid", 60),
    preset("Rome", "Italy", "Europe/Rome", 60),
    preset("Amsterdam", "Netherlands", "Europe/Amsterdam", 60),
    preset("Moscow", "Russia", "Europe/Moscow", 180),
    preset("Dubai", "UAE", "Asia/Dubai", 240),
    preset("Mumbai", "India", "Asia/Kolkata", 330),
    preset("Singapore", "Singapore", "Asia/Singapore", 480),
    preset("Hong Kong", "Hong Kong", "Asia/Hong_Kong", 480),
    preset("Tokyo", "Japan", "Asia/Tokyo", 540),
    preset("Seoul", "South Korea", "Asia/Seoul", 540),
    preset("Shanghai", "China", "Asia/Shanghai", 480),
    preset("Bangkok", "Thailand", "Asia/Bangkok", 420),
    preset("Sydney", "Australia", "Australia/Sydney", 600),
    preset("Melbourne", "Australia", "Australia/Melbourne", 600),
    preset("Auckland", "New Zealand", "Pacific/Auckland", 720),
    preset("Cairo", "Egypt", "Africa/Cairo", 120),
    preset("Lagos", "Nigeria", "Africa/Lagos", 60),
    preset("Johannesburg", "South Africa", "Africa/Johannesburg", 120),
];

/// Case-insensitive city/country match. A blank query matches nothing.
pub fn search_presets(query: &str) -> Vec<&'static TimezonePreset> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    TIMEZONE_PRESETS
        .iter()
        .filter(|preset| {
            preset.city.to_lowercase().contains(&query)
                || preset.country.to_lowercase().contains(&query)
        })
        .collect()
}

/// `3:05:09 PM` or `15:05:09`.
pub fn format_time(time: NaiveTime, use_24_hour: bool) -> String {
    if use_24_hour {
        return time.format("%H:%M:%S").to_string();
    }
    let (pm, hour) = time.hour12();
    format!(
        "{hour}:{:02}:{:02} {}",
        time.minute(),
        time.second(),
        if pm { "PM" } else { "AM" }
    )
}

/// `Monday, June 10, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// `UTC`, `UTC+5:30`, or `UTC-8`.
pub fn format_utc_offset(offset_minutes: i32) -> String {
    if offset_minutes == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let magnitude = offset_minutes.unsigned_abs();
    match magnitude % 60 {
        0 => format!("UTC{sign}{}", magnitude / 60),
        minutes => format!("UTC{sign}{}:{minutes:02}", magnitude / 60),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockLocation {
    pub id: String,
    pub city: String,
    pub country: String,
    pub timezone: String,
    /// Minutes east of UTC.
    #[serde(default)]
    pub offset: i32,
}

impl ClockLocation {
    pub fn local(offset_minutes: i32) -> Self {
        Self {
            id: LOCAL_LOCATION_ID.to_string(),
            city: "Local Time".to_string(),
            country: String::new(),
            timezone: "local".to_string(),
            offset: offset_minutes,
        }
    }

    /// Wall-clock time at this location for the UTC instant `now`.
    pub fn wall_clock(&self, now: DateTime<Utc>) -> NaiveDateTime {
        now.naive_utc() + Duration::minutes(i64::from(self.offset))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub location_id: String,
    pub location_name: String,
    pub timezone: String,
    /// `YYYY-MM-DDTHH:MM` in the viewer's local time.
    pub date_time: String,
    pub description: String,
    #[serde(default)]
    pub notify: bool,
    #[serde(default)]
    pub notified: bool,
}

impl Reminder {
    pub fn due_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date_time, REMINDER_FORMAT).ok()
    }

    pub fn is_past(&self, local_now: NaiveDateTime) -> bool {
        self.due_at().is_some_and(|due| due < local_now)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Which locations a new reminder is attached to.
pub enum ReminderTarget {
    Location(String),
    AllLocations,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReminderInputError {
    #[error("a reminder needs a description")]
    EmptyDescription,
    #[error("`{0}` is not a valid date and time")]
    InvalidDateTime(String),
    #[error("no location with id `{0}`")]
    UnknownLocation(String),
    #[error("add a location before creating reminders")]
    NoLocations,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Persisted `clock` section.
pub struct ClockSection {
    #[serde(default)]
    pub locations: Vec<ClockLocation>,
    #[serde(default)]
    pub active_location_id: Option<String>,
    #[serde(default)]
    pub reminders: Vec<Reminder>,
    #[serde(default)]
    pub use_24_hour: bool,
}

impl ClockSection {
    /// Fresh section with only the viewer's local clock.
    pub fn with_local(offset_minutes: i32) -> Self {
        Self {
            locations: vec![ClockLocation::local(offset_minutes)],
            active_location_id: Some(LOCAL_LOCATION_ID.to_string()),
            reminders: Vec::new(),
            use_24_hour: false,
        }
    }

    pub fn location(&self, id: &str) -> Option<&ClockLocation> {
        self.locations.iter().find(|location| location.id == id)
    }

    pub fn active_location(&self) -> Option<&ClockLocation> {
        self.active_location_id
            .as_deref()
            .and_then(|id| self.location(id))
            .or_else(|| self.locations.first())
    }

    /// Adds `preset` unless a location in the same timezone exists. Returns the new id.
    pub fn add_location(&mut self, preset: &TimezonePreset, now_ms: u64) -> Option<String> {
        if self
            .locations
            .iter()
            .any(|location| location.timezone == preset.timezone)
        {
            return None;
        }
        let id = unique_id(now_ms, |candidate| self.location(candidate).is_some());
        self.locations.push(ClockLocation {
            id: id.clone(),
            city: preset.city.to_string(),
            country: preset.country.to_string(),
            timezone: preset.timezone.to_string(),
            offset: preset.offset_minutes,
        });
        Some(id)
    }

    /// Removes a location. If it was active, the first remaining location becomes active.
    pub fn remove_location(&mut self, id: &str) -> bool {
        let before = self.locations.len();
        self.locations.retain(|location| location.id != id);
        if self.locations.len() == before {
            return false;
        }
        if self.active_location_id.as_deref() == Some(id) {
            self.active_location_id = self.locations.first().map(|location| location.id.clone());
        }
        true
    }

    pub fn set_active(&mut self, id: &str) -> bool {
        if self.location(id).is_none() {
            return false;
        }
        self.active_location_id = Some(id.to_string());
        true
    }

    /// Creates one reminder per targeted location and returns their ids.
    pub fn add_reminder(
        &mut self,
        target: &ReminderTarget,
        date: &str,
        time: &str,
        description: &str,
        notify: bool,
        now_ms: u64,
    ) -> Result<Vec<String>, ReminderInputError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ReminderInputError::EmptyDescription);
        }
        let date_time = format!("{}T{}", date.trim(), time.trim());
        if NaiveDateTime::parse_from_str(&date_time, REMINDER_FORMAT).is_err() {
            return Err(ReminderInputError::InvalidDateTime(date_time));
        }
        let locations: Vec<ClockLocation> = match target {
            ReminderTarget::Location(id) => vec![self
                .location(id)
                .cloned()
                .ok_or_else(|| ReminderInputError::UnknownLocation(id.clone()))?],
            ReminderTarget::AllLocations => self.locations.clone(),
        };
        if locations.is_empty() {
            return Err(ReminderInputError::NoLocations);
        }

        let mut ids = Vec::with_capacity(locations.len());
        for location in locations {
            let id = unique_id(now_ms, |candidate| {
                self.reminders.iter().any(|reminder| reminder.id == candidate)
            });
            self.reminders.push(Reminder {
                id: id.clone(),
                location_id: location.id,
                location_name: location.city,
                timezone: location.timezone,
                date_time: date_time.clone(),
                description: description.to_string(),
                notify,
                notified: false,
            });
            ids.push(id);
        }
        Ok(ids)
    }

    pub fn remove_reminder(&mut self, id: &str) -> bool {
        let before = self.reminders.len();
        self.reminders.retain(|reminder| reminder.id != id);
        self.reminders.len() != before
    }

    /// Marks every due, not yet notified reminder as notified and returns them.
    pub fn take_due_reminders(&mut self, local_now: NaiveDateTime) -> Vec<Reminder> {
        let mut due = Vec::new();
        for reminder in &mut self.reminders {
            if !reminder.notify || reminder.notified {
                continue;
            }
            if reminder.due_at().is_some_and(|at| at <= local_now) {
                reminder.notified = true;
                due.push(reminder.clone());
            }
        }
        due
    }

    /// Reminders ordered by due time; unparsable ones last.
    pub fn reminders_by_due_time(&self) -> Vec<Reminder> {
        let mut sorted = self.reminders.clone();
        sorted.sort_by_key(|reminder| (reminder.due_at().is_none(), reminder.due_at()));
        sorted
    }
}

fn unique_id(now_ms: u64, taken: impl Fn(&str) -> bool) -> String {
    let base = now_ms.to_string();
    let mut candidate = base.clone();
    let mut suffix = 1u32;
    while taken(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    candidate
}

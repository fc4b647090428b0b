//! Demo data sources: habits, calendar events and free-text notes.
//!
//! Each structured record is flattened to a single line of text before
//! ingestion. The flattening format is presentation only.

use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::Error;
use crate::ingest::IngestItem;

pub const HABITS_FILE: &str = "habits.json";
pub const CALENDAR_FILE: &str = "calendar.json";
pub const NOTES_FILE: &str = "notes.txt";

/// A recurring habit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Habit {
    pub habit: String,
    pub time: String,
    pub frequency: String,
}

impl fmt::Display for Habit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Habit: {} at {} ({})", self.habit, self.time, self.frequency)
    }
}

/// A calendar entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Event: {} on {} at {}", self.title, self.date, self.time)
    }
}

#[derive(Debug, Deserialize)]
struct CalendarFile {
    #[serde(default)]
    events: Vec<Value>,
}

/// Everything found in a demo data directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoData {
    pub habits: Vec<Habit>,
    pub events: Vec<CalendarEvent>,
    pub notes: Vec<String>,
    /// Records dropped because they did not match their file's shape.
    pub skipped: usize,
}

impl DemoData {
    /// Load `habits.json`, `calendar.json` and `notes.txt` from `dir`.
    ///
    /// Missing files are skipped. A file that is not valid JSON, or whose top
    /// level has the wrong shape, is an error; a single malformed record inside
    /// a valid file is logged, counted in `skipped` and dropped.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        if !dir.is_dir() {
            return Err(Error::FileNotFound(dir.to_path_buf()));
        }
        let mut skipped = 0;

        let habits: Vec<Habit> = match read_optional(&dir.join(HABITS_FILE))? {
            Some(content) => {
                let values: Vec<Value> = serde_json::from_str(&content)?;
                parse_records(values, HABITS_FILE, &mut skipped)
            }
            None => Vec::new(),
        };

        let events: Vec<CalendarEvent> = match read_optional(&dir.join(CALENDAR_FILE))? {
            Some(content) => {
                let file: CalendarFile = serde_json::from_str(&content)?;
                parse_records(file.events, CALENDAR_FILE, &mut skipped)
            }
            None => Vec::new(),
        };

        let notes = read_optional(&dir.join(NOTES_FILE))?
            .map(|content| parse_notes(&content))
            .unwrap_or_default();

        info!(
            dir = %dir.display(),
            habits = habits.len(),
            events = events.len(),
            notes = notes.len(),
            skipped,
            "loaded demo data"
        );
        Ok(DemoData {
            habits,
            events,
            notes,
            skipped,
        })
    }

    /// Flatten every record into ingestion items: habits, then events, then notes.
    pub fn items(&self) -> Vec<IngestItem> {
        let habits = self
            .habits
            .iter()
            .map(|habit| IngestItem::new(habit.to_string(), "habits"));
        let events = self
            .events
            .iter()
            .map(|event| IngestItem::new(event.to_string(), "calendar"));
        let notes = self
            .notes
            .iter()
            .map(|note| IngestItem::new(note.clone(), "notes"));
        habits.chain(events).chain(notes).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.habits.is_empty() && self.events.is_empty() && self.notes.is_empty()
    }
}

/// Load a demo directory and flatten it into ordered ingestion items.
pub fn load_demo_items(dir: &Path) -> Result<Vec<IngestItem>, Error> {
    Ok(DemoData::load(dir)?.items())
}

/// One trimmed note per non-blank line.
pub fn parse_notes(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deserialize each record on its own, dropping the ones that do not fit.
fn parse_records<T: DeserializeOwned>(values: Vec<Value>, file: &str, skipped: &mut usize) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(file, position, error = %e, "skipping malformed record");
                *skipped += 1;
                None
            }
        })
        .collect()
}

fn read_optional(path: &Path) -> Result<Option<String>, Error> {
    if !path.exists() {
        warn!(path = %path.display(), "source file not found, skipping");
        return Ok(None);
    }
    Ok(Some(std::fs::read_to_string(path)?))
}

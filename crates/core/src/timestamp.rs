use chrono::{DateTime, Datelike, Local, Timelike};
use regex::Captures;
use std::fmt;

/// Six calendar components as they were found in a filename, a metadata
/// field or the file system. Values are not range checked: a malformed
/// filename carrying day `99` is formatted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl Timestamp {
    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        }
    }

    /// Builds a timestamp from the first six capture groups of `caps`.
    /// Every group must be a 2 or 4 digit decimal substring.
    pub fn from_captures(caps: &Captures<'_>) -> Option<Self> {
        let mut values = [0u32; 6];
        for (index, value) in values.iter_mut().enumerate() {
            *value = parse_component(caps.get(index + 1)?.as_str())?;
        }
        let [year, month, day, hour, minute, second] = values;
        Some(Self::new(
            i32::try_from(year).ok()?,
            month,
            day,
            hour,
            minute,
            second,
        ))
    }

    pub fn from_local(date: &DateTime<Local>) -> Self {
        Self::new(
            date.year(),
            date.month(),
            date.day(),
            date.hour(),
            date.minute(),
            date.second(),
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

fn parse_component(raw: &str) -> Option<u32> {
    if !matches!(raw.len(), 2 | 4) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

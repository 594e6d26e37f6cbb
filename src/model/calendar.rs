//! Discretized weekly calendar.
//!
//! A [`Calendar`] is the fixed, ordered grid of (day, time-of-day) slots that
//! sessions are placed into. It is generated from a [`CalendarConfig`]:
//! a slot starts at `start + k * session_minutes` for every `k` whose session
//! ends no later than `end`.
//!
//! ```
//! use u_timetable::model::{Calendar, CalendarConfig, TimeOfDay};
//!
//! let config = CalendarConfig::default()
//!     .with_hours(TimeOfDay::new(8, 0).unwrap(), TimeOfDay::new(18, 0).unwrap())
//!     .with_session_minutes(120);
//! let calendar = Calendar::new(&config).unwrap();
//! assert_eq!(calendar.slots_per_day(), 5);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CalendarError;

/// Teaching day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All teaching days in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Zero-based position in the week.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        f.write_str(name)
    }
}

/// Wall-clock time of day with minute resolution.
///
/// Serialized as `"HH:MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    /// Returns `None` when `hour > 23` or `minute > 59`.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Minutes after midnight.
    pub fn minutes(self) -> u16 {
        self.minutes
    }

    pub fn hour(self) -> u16 {
        self.minutes / 60
    }

    pub fn minute(self) -> u16 {
        self.minutes % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CalendarError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        TimeOfDay::new(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parameters from which the slot grid is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Start of the first slot.
    pub start: TimeOfDay,
    /// No session may end after this time.
    pub end: TimeOfDay,
    /// Length of one session in minutes.
    pub session_minutes: u16,
    /// Teaching days, in week order.
    pub days: Vec<Day>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            start: TimeOfDay { minutes: 8 * 60 },
            end: TimeOfDay { minutes: 17 * 60 },
            session_minutes: 60,
            days: Day::ALL.to_vec(),
        }
    }
}

impl CalendarConfig {
    /// Sets the teaching hours.
    pub fn with_hours(mut self, start: TimeOfDay, end: TimeOfDay) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Sets the session length.
    pub fn with_session_minutes(mut self, minutes: u16) -> Self {
        self.session_minutes = minutes;
        self
    }

    /// Restricts the teaching days.
    pub fn with_days(mut self, days: impl IntoIterator<Item = Day>) -> Self {
        self.days = days.into_iter().collect();
        self
    }

    /// Checks the configuration without building the grid.
    pub fn validate(&self) -> Result<(), CalendarError> {
        if self.session_minutes == 0 {
            return Err(CalendarError::ZeroSessionLength);
        }
        if self.end <= self.start {
            return Err(CalendarError::EmptyDay {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// The ordered weekly slot grid.
///
/// Slots are addressed either by `(day, slot)` where `slot` is the zero-based
/// period within the day, or by a flat index in `0..slot_count()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    days: Vec<Day>,
    times: Vec<TimeOfDay>,
    day_position: [Option<usize>; 5],
}

impl Calendar {
    /// Builds the grid from a configuration.
    ///
    /// Duplicate days are collapsed and days are kept in week order.
    ///
    /// # Errors
    /// Returns [`CalendarError`] for a zero session length or an empty day.
    pub fn new(config: &CalendarConfig) -> Result<Self, CalendarError> {
        config.validate()?;
        Ok(Self::generate(config))
    }

    fn generate(config: &CalendarConfig) -> Self {
        let mut days = config.days.clone();
        days.sort();
        days.dedup();

        let mut times = Vec::new();
        let step = u32::from(config.session_minutes);
        let end = u32::from(config.end.minutes());
        let mut t = u32::from(config.start.minutes());
        while t + step <= end {
            // t < end <= 23:59, so it fits in u16
            times.push(TimeOfDay { minutes: t as u16 });
            t += step;
        }

        let mut day_position = [None; 5];
        for (pos, day) in days.iter().enumerate() {
            day_position[day.index()] = Some(pos);
        }

        Self {
            days,
            times,
            day_position,
        }
    }

    /// Teaching days in week order.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Start times of the periods in one day.
    pub fn times(&self) -> &[TimeOfDay] {
        &self.times
    }

    pub fn slots_per_day(&self) -> usize {
        self.times.len()
    }

    /// Total number of (day, slot) pairs.
    pub fn slot_count(&self) -> usize {
        self.days.len() * self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Start time of a period, if it exists.
    pub fn time_of(&self, slot: usize) -> Option<TimeOfDay> {
        self.times.get(slot).copied()
    }

    /// Flat index of `(day, slot)`, or `None` if outside the grid.
    pub fn flat_index(&self, day: Day, slot: usize) -> Option<usize> {
        let pos = self.day_position[day.index()]?;
        (slot < self.times.len()).then(|| pos * self.times.len() + slot)
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    pub fn from_flat(&self, index: usize) -> Option<(Day, usize)> {
        let per_day = self.times.len();
        if per_day == 0 {
            return None;
        }
        let day = *self.days.get(index / per_day)?;
        Some((day, index % per_day))
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::generate(&CalendarConfig::default())
    }
}

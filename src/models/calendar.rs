//! Weekly calendar model.
//!
//! A timetable week is a grid of teaching days × numbered periods.
//! Each (day, period) cell is a `Timeslot`. Periods are 1-based ordinals
//! within a day; one period value is reserved for lunch and can never
//! host a class.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A day of the teaching week.
///
/// Serialized with the three-letter abbreviation (`"Mon"`, `"Tue"`, ...),
/// which is how timeslot catalogs name days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    #[serde(alias = "Monday")]
    Mon,
    #[serde(alias = "Tuesday")]
    Tue,
    #[serde(alias = "Wednesday")]
    Wed,
    #[serde(alias = "Thursday")]
    Thu,
    #[serde(alias = "Friday")]
    Fri,
    #[serde(alias = "Saturday")]
    Sat,
    #[serde(alias = "Sunday")]
    Sun,
}

impl Day {
    /// Monday through Friday, in calendar order.
    pub const WEEKDAYS: [Day; 5] = [Day::Mon, Day::Tue, Day::Wed, Day::Thu, Day::Fri];

    /// Three-letter abbreviation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
            Day::Sun => "Sun",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single (day, period) cell of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timeslot {
    /// Teaching day.
    pub day: Day,
    /// Period ordinal within the day (1-based).
    pub period: u32,
}

impl Timeslot {
    /// Creates a timeslot.
    pub fn new(day: Day, period: u32) -> Self {
        Self { day, period }
    }

    /// Builds the full grid `days × 1..=periods_per_day`, day-major.
    pub fn grid(days: &[Day], periods_per_day: u32) -> Vec<Timeslot> {
        days.iter()
            .flat_map(|&day| (1..=periods_per_day).map(move |period| Timeslot::new(day, period)))
            .collect()
    }

    /// Whether this slot falls on the given period.
    #[inline]
    pub fn is_period(&self, period: u32) -> bool {
        self.period == period
    }
}

impl fmt::Display for Timeslot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} p{}", self.day, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_is_day_major() {
        let grid = Timeslot::grid(&[Day::Mon, Day::Tue], 3);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], Timeslot::new(Day::Mon, 1));
        assert_eq!(grid[2], Timeslot::new(Day::Mon, 3));
        assert_eq!(grid[3], Timeslot::new(Day::Tue, 1));
    }

    #[test]
    fn test_day_display() {
        assert_eq!(Day::Wed.to_string(), "Wed");
        assert_eq!(Timeslot::new(Day::Tue, 8).to_string(), "Tue p8");
    }

    #[test]
    fn test_day_serde_names() {
        let day: Day = serde_json::from_str("\"Thu\"").unwrap();
        assert_eq!(day, Day::Thu);
        let long: Day = serde_json::from_str("\"Friday\"").unwrap();
        assert_eq!(long, Day::Fri);
        assert_eq!(serde_json::to_string(&Day::Mon).unwrap(), "\"Mon\"");
    }

    #[test]
    fn test_weekday_order() {
        let mut days = vec![Day::Fri, Day::Mon, Day::Wed];
        days.sort();
        assert_eq!(days, vec![Day::Mon, Day::Wed, Day::Fri]);
        assert_eq!(Day::WEEKDAYS.len(), 5);
    }
}

//! Ordered table of review intervals, in days, indexed by review level.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Intervals used when no table is configured.
pub const DEFAULT_INTERVALS: [u32; 6] = [1, 3, 7, 14, 30, 60];

/// Maps a review level to the number of days until the next review.
///
/// The table is never empty, so `max_level()` is always a valid index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntervalTable {
    days: Vec<u32>,
}

impl IntervalTable {
    pub fn new(days: Vec<u32>) -> Result<Self, ConfigError> {
        if days.is_empty() {
            return Err(ConfigError::EmptyIntervalTable);
        }
        if let Some(zero) = days.iter().find(|&&d| d == 0) {
            return Err(ConfigError::InvalidInterval(zero.to_string()));
        }
        Ok(Self { days })
    }

    /// Highest valid review level.
    pub fn max_level(&self) -> u32 {
        (self.days.len() - 1) as u32
    }

    /// Clamps an arbitrary level into the table's range.
    pub fn clamp(&self, level: u32) -> u32 {
        level.min(self.max_level())
    }

    /// Days until the next review for `level`, clamped into range.
    pub fn days(&self, level: u32) -> u32 {
        self.days[self.clamp(level) as usize]
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.days
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            days: DEFAULT_INTERVALS.to_vec(),
        }
    }
}

impl FromStr for IntervalTable {
    type Err = ConfigError;

    /// Parses a comma separated list such as `"1,3,7,14,30,60"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let days = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u32>()
                    .map_err(|_| ConfigError::InvalidInterval(part.to_string()))
            })
            .collect::<Result<Vec<u32>, _>>()?;

        Self::new(days)
    }
}

impl fmt::Display for IntervalTable {
    /// Renders the progression the way the review screen explains it: `1d → 3d → 7d`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.days.iter().map(|d| format!("{d}d")).collect();
        write!(f, "{}", parts.join(" → "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = IntervalTable::default();
        assert_eq!(table.as_slice(), &[1, 3, 7, 14, 30, 60]);
        assert_eq!(table.max_level(), 5);
    }

    #[test]
    fn test_days_clamps_out_of_range_level() {
        let table = IntervalTable::default();
        assert_eq!(table.days(0), 1);
        assert_eq!(table.days(5), 60);
        assert_eq!(table.days(42), 60);
        assert_eq!(table.clamp(u32::MAX), 5);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            IntervalTable::new(Vec::new()),
            Err(ConfigError::EmptyIntervalTable)
        ));
        assert!(matches!(
            "".parse::<IntervalTable>(),
            Err(ConfigError::EmptyIntervalTable)
        ));
    }

    #[test]
    fn test_parse_from_list() {
        let table: IntervalTable = " 2, 4 ,8".parse().unwrap();
        assert_eq!(table.as_slice(), &[2, 4, 8]);
    }

    #[test]
    fn test_parse_rejects_garbage_and_zero() {
        assert!(matches!(
            "1,x,3".parse::<IntervalTable>(),
            Err(ConfigError::InvalidInterval(s)) if s == "x"
        ));
        assert!("1,0,3".parse::<IntervalTable>().is_err());
        assert!("-1".parse::<IntervalTable>().is_err());
    }

    #[test]
    fn test_display() {
        let table = IntervalTable::new(vec![1, 3, 7]).unwrap();
        assert_eq!(table.to_string(), "1d → 3d → 7d");
    }
}

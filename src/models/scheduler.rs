//! Spaced repetition scheduler driven by a fixed interval table.
//!
//! Each learned word sits at a review level, an index into the interval table:
//! - "Remembered" advances the level by one (saturating at the last level) and
//!   schedules the next review `table[level]` days later
//! - "Forgotten" resets the level to 0 and schedules the next review
//!   `table[0]` days later, whatever the previous level was
//! - The last level is "mastered" but stays eligible for review
//!
//! All operations take the current time as a parameter and never mutate their
//! input; callers persist the returned record.

use super::{IntervalTable, ReviewableWord};
use chrono::{DateTime, Days, Duration, TimeZone, Utc};
use std::fmt;

/// Which learned words a review pass covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReviewFilter {
    /// Words whose next review date is absent or not in the future.
    #[default]
    Due,
    /// Words learned on the same calendar day as "now".
    Today,
    /// Every learned word.
    All,
}

/// Human-facing label for a word's position in the interval table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewStatus {
    New,
    DueAfter { days: u32 },
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::New => write!(f, "new"),
            ReviewStatus::DueAfter { days: 1 } => write!(f, "due after 1 day"),
            ReviewStatus::DueAfter { days } => write!(f, "due after {days} days"),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ReviewScheduler {
    intervals: IntervalTable,
}

impl ReviewScheduler {
    pub fn new(intervals: IntervalTable) -> Self {
        Self { intervals }
    }

    pub fn intervals(&self) -> &IntervalTable {
        &self.intervals
    }

    /// A word without a next review date counts as due.
    pub fn is_due(&self, word: &ReviewableWord, now: DateTime<Utc>) -> bool {
        word.next_review_date.is_none_or(|next| next <= now)
    }

    pub fn due_count(&self, words: &[ReviewableWord], now: DateTime<Utc>) -> usize {
        words.iter().filter(|w| self.is_due(w, now)).count()
    }

    /// Returns the words matching `filter`, in source order.
    ///
    /// "Today" compares calendar days in `now`'s time zone, so a word learned
    /// at 23:59 the previous evening is excluded even if it is only minutes old.
    pub fn select_for_review<'a, Tz: TimeZone>(
        &self,
        words: &'a [ReviewableWord],
        filter: ReviewFilter,
        now: &DateTime<Tz>,
    ) -> Vec<&'a ReviewableWord> {
        match filter {
            ReviewFilter::All => words.iter().collect(),
            ReviewFilter::Due => {
                let now = now.with_timezone(&Utc);
                words.iter().filter(|w| self.is_due(w, now)).collect()
            }
            ReviewFilter::Today => {
                let today = now.date_naive();
                let tz = now.timezone();
                words
                    .iter()
                    .filter(|w| w.learned_at.with_timezone(&tz).date_naive() == today)
                    .collect()
            }
        }
    }

    /// Moves the word one level up the table, saturating at the last level.
    pub fn record_remembered<Tz: TimeZone>(
        &self,
        word: &ReviewableWord,
        now: DateTime<Tz>,
    ) -> ReviewableWord {
        let next_level = self
            .intervals
            .clamp(self.intervals.clamp(word.review_level).saturating_add(1));
        self.reviewed(word, next_level, now)
    }

    /// Sends the word back to level 0 regardless of its previous level.
    pub fn record_forgotten<Tz: TimeZone>(
        &self,
        word: &ReviewableWord,
        now: DateTime<Tz>,
    ) -> ReviewableWord {
        self.reviewed(word, 0, now)
    }

    pub fn describe_status(&self, word: &ReviewableWord) -> ReviewStatus {
        match self.intervals.clamp(word.review_level) {
            0 => ReviewStatus::New,
            level => ReviewStatus::DueAfter {
                days: self.intervals.days(level),
            },
        }
    }

    /// Intervals are calendar days in `now`'s zone: the wall-clock time of
    /// the next review stays the same across a DST change.
    fn reviewed<Tz: TimeZone>(
        &self,
        word: &ReviewableWord,
        level: u32,
        now: DateTime<Tz>,
    ) -> ReviewableWord {
        let days = self.intervals.days(level);
        let next = now
            .clone()
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or_else(|| now.clone() + Duration::days(i64::from(days)));
        ReviewableWord {
            review_level: level,
            review_count: word.review_count.saturating_add(1),
            next_review_date: Some(next.with_timezone(&Utc)),
            last_reviewed_at: Some(now.with_timezone(&Utc)),
            ..word.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Word;
    use chrono::{FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime};

    /// Central European time around the 2024 spring change:
    /// UTC+1 until 2024-03-31 01:00 UTC, UTC+2 afterwards.
    #[derive(Clone, Copy, Debug)]
    struct SpringForward;

    impl SpringForward {
        fn winter() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }

        fn summer() -> FixedOffset {
            FixedOffset::east_opt(7200).unwrap()
        }

        fn change_utc() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 3, 31)
                .unwrap()
                .and_hms_opt(1, 0, 0)
                .unwrap()
        }
    }

    impl TimeZone for SpringForward {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SpringForward
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            // 02:00 local is the first wall-clock moment of summer time
            if *local < Self::change_utc() + Duration::hours(1) {
                LocalResult::Single(Self::winter())
            } else {
                LocalResult::Single(Self::summer())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < Self::change_utc() {
                Self::winter()
            } else {
                Self::summer()
            }
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn word(id: i64, learned_at: DateTime<Utc>) -> ReviewableWord {
        ReviewableWord::learned(&Word::new(id, format!("word{id}")), learned_at)
    }

    fn at_level(level: u32) -> ReviewableWord {
        let mut w = word(1, at(2024, 1, 1, 8, 0));
        w.review_level = level;
        w.review_count = 4;
        w
    }

    #[test]
    fn test_remembered_saturates_at_last_level() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);
        let mut w = at_level(5);

        for _ in 0..4 {
            w = scheduler.record_remembered(&w, now);
            assert_eq!(w.review_level, 5);
            assert_eq!(w.next_review_date, Some(now + Duration::days(60)));
        }
        assert_eq!(w.review_count, 8);
    }

    #[test]
    fn test_forgotten_resets_from_any_level() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);

        for level in 0..=5 {
            let w = scheduler.record_forgotten(&at_level(level), now);
            assert_eq!(w.review_level, 0);
            assert_eq!(w.next_review_date, Some(now + Duration::days(1)));
            assert_eq!(w.last_reviewed_at, Some(now));
        }
    }

    #[test]
    fn test_review_count_increments_once_per_decision() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);
        let w = at_level(2);

        assert_eq!(scheduler.record_remembered(&w, now).review_count, 5);
        assert_eq!(scheduler.record_forgotten(&w, now).review_count, 5);

        let words = vec![w.clone()];
        let selected = scheduler.select_for_review(&words, ReviewFilter::All, &now);
        assert_eq!(selected[0].review_count, 4);
    }

    #[test]
    fn test_due_filter_includes_past_and_exactly_now() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);

        let mut past = word(1, at(2024, 1, 1, 8, 0));
        past.next_review_date = Some(now - Duration::hours(3));
        let mut exact = word(2, at(2024, 1, 1, 8, 0));
        exact.next_review_date = Some(now);
        let mut future = word(3, at(2024, 1, 1, 8, 0));
        future.next_review_date = Some(now + Duration::seconds(1));
        let mut unscheduled = word(4, at(2024, 1, 1, 8, 0));
        unscheduled.next_review_date = None;

        let words = vec![past, future, exact, unscheduled];
        let ids: Vec<i64> = scheduler
            .select_for_review(&words, ReviewFilter::Due, &now)
            .iter()
            .map(|w| w.id)
            .collect();

        assert_eq!(ids, vec![1, 2, 4]);
        assert_eq!(scheduler.due_count(&words, now), 3);
    }

    #[test]
    fn test_today_filter_uses_calendar_day() {
        let scheduler = ReviewScheduler::default();
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = seoul.with_ymd_and_hms(2024, 1, 15, 0, 1, 0).unwrap();

        let late_today = seoul.with_ymd_and_hms(2024, 1, 15, 23, 59, 0).unwrap();
        let late_yesterday = seoul.with_ymd_and_hms(2024, 1, 14, 23, 59, 0).unwrap();
        let words = vec![
            word(1, late_today.with_timezone(&Utc)),
            word(2, late_yesterday.with_timezone(&Utc)),
        ];

        let ids: Vec<i64> = scheduler
            .select_for_review(&words, ReviewFilter::Today, &now)
            .iter()
            .map(|w| w.id)
            .collect();

        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_all_filter_keeps_source_order() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);
        let mut future = word(9, now);
        future.next_review_date = Some(now + Duration::days(30));
        let words = vec![future, word(2, now), word(5, now)];

        let ids: Vec<i64> = scheduler
            .select_for_review(&words, ReviewFilter::All, &now)
            .iter()
            .map(|w| w.id)
            .collect();

        assert_eq!(ids, vec![9, 2, 5]);
    }

    #[test]
    fn test_level_progression_from_zero() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);
        let mut w = at_level(0);

        for (level, days) in [(1, 3), (2, 7), (3, 14)] {
            w = scheduler.record_remembered(&w, now);
            assert_eq!(w.review_level, level);
            assert_eq!(w.next_review_date, Some(now + Duration::days(days)));
        }
    }

    #[test]
    fn test_transitions_leave_input_untouched() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);
        let original = at_level(3);
        let snapshot = original.clone();

        let remembered = scheduler.record_remembered(&original, now);
        let forgotten = scheduler.record_forgotten(&original, now);

        assert_eq!(original, snapshot);
        assert_ne!(remembered, original);
        assert_ne!(forgotten, original);
        assert_eq!(remembered.learned_at, original.learned_at);
    }

    #[test]
    fn test_out_of_range_level_is_clamped() {
        let scheduler = ReviewScheduler::default();
        let now = at(2024, 2, 1, 12, 0);
        let w = at_level(99);

        assert_eq!(
            scheduler.describe_status(&w),
            ReviewStatus::DueAfter { days: 60 }
        );
        let next = scheduler.record_remembered(&w, now);
        assert_eq!(next.review_level, 5);
    }

    #[test]
    fn test_describe_status() {
        let scheduler = ReviewScheduler::default();
        assert_eq!(scheduler.describe_status(&at_level(0)).to_string(), "new");
        assert_eq!(
            scheduler.describe_status(&at_level(2)).to_string(),
            "due after 7 days"
        );
    }

    #[test]
    fn test_injected_table() {
        let table = IntervalTable::new(vec![2, 5]).unwrap();
        let scheduler = ReviewScheduler::new(table);
        let now = at(2024, 2, 1, 12, 0);

        let forgotten = scheduler.record_forgotten(&at_level(1), now);
        assert_eq!(forgotten.next_review_date, Some(now + Duration::days(2)));

        let up = scheduler.record_remembered(&forgotten, now);
        let up = scheduler.record_remembered(&up, now);
        assert_eq!(up.review_level, 1);
        assert_eq!(up.next_review_date, Some(now + Duration::days(5)));
        assert_eq!(
            scheduler.describe_status(&up),
            ReviewStatus::DueAfter { days: 5 }
        );
    }

    #[test]
    fn test_intervals_are_calendar_days_across_dst_change() {
        let scheduler = ReviewScheduler::default();
        let now = SpringForward
            .with_ymd_and_hms(2024, 3, 30, 9, 0, 0)
            .single()
            .unwrap();
        assert_eq!(now.with_timezone(&Utc), at(2024, 3, 30, 8, 0));

        let forgotten = scheduler.record_forgotten(&at_level(3), now);
        assert_eq!(forgotten.next_review_date, Some(at(2024, 3, 31, 7, 0)));
        assert_eq!(forgotten.last_reviewed_at, Some(at(2024, 3, 30, 8, 0)));

        let next_local = forgotten
            .next_review_date
            .unwrap()
            .with_timezone(&SpringForward);
        assert_eq!(next_local.time(), NaiveTime::from_hms_opt(9, 0, 0).unwrap());
    }
}

//! Review session management for the spaced repetition pass over learned words.
//! Tracks which word of the filtered queue is shown and feeds review decisions
//! through the scheduler.

use super::{ReviewFilter, ReviewScheduler, ReviewableWord};
use chrono::{DateTime, TimeZone};

/// Navigation state of the review screen.
///
/// The queue itself is never stored: it is recomputed from the learned word
/// list on every frame so it always reflects the latest persisted records.
#[derive(Clone, Debug, Default)]
pub struct ReviewSession {
    pub filter: ReviewFilter,
    pub current_index: usize,
    pub show_meaning: bool,
    pub show_example: bool,
}

impl ReviewSession {
    pub fn new(filter: ReviewFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn queue<'a, Tz: TimeZone>(
        &self,
        scheduler: &ReviewScheduler,
        words: &'a [ReviewableWord],
        now: &DateTime<Tz>,
    ) -> Vec<&'a ReviewableWord> {
        scheduler.select_for_review(words, self.filter, now)
    }

    /// Switching filters starts again from the first word.
    pub fn set_filter(&mut self, filter: ReviewFilter) {
        self.filter = filter;
        self.current_index = 0;
        self.hide_details();
    }

    pub fn current<'a>(&self, queue: &[&'a ReviewableWord]) -> Option<&'a ReviewableWord> {
        if queue.is_empty() {
            return None;
        }
        queue.get(self.current_index.min(queue.len() - 1)).copied()
    }

    pub fn toggle_meaning(&mut self) {
        self.show_meaning = !self.show_meaning;
    }

    pub fn toggle_example(&mut self) {
        self.show_example = !self.show_example;
    }

    /// Moves forward, wrapping to the first word after the last.
    pub fn next(&mut self, len: usize) {
        self.hide_details();
        if self.current_index + 1 < len {
            self.current_index += 1;
        } else {
            self.current_index = 0;
        }
    }

    /// Moves back, wrapping to the last word before the first.
    pub fn previous(&mut self, len: usize) {
        self.hide_details();
        if self.current_index > 0 {
            self.current_index -= 1;
        } else {
            self.current_index = len.saturating_sub(1);
        }
    }

    /// Applies "remembered" to the current word and moves on.
    ///
    /// Returns the updated record for the caller to persist.
    pub fn remembered<Tz: TimeZone>(
        &mut self,
        scheduler: &ReviewScheduler,
        queue: &[&ReviewableWord],
        now: DateTime<Tz>,
    ) -> Option<ReviewableWord> {
        let updated = scheduler.record_remembered(self.current(queue)?, now);
        self.advance_after_decision(queue.len());
        Some(updated)
    }

    /// Applies "forgotten" to the current word and moves on.
    pub fn forgotten<Tz: TimeZone>(
        &mut self,
        scheduler: &ReviewScheduler,
        queue: &[&ReviewableWord],
        now: DateTime<Tz>,
    ) -> Option<ReviewableWord> {
        let updated = scheduler.record_forgotten(self.current(queue)?, now);
        self.advance_after_decision(queue.len());
        Some(updated)
    }

    /// Keeps the index in range after the current word was removed from a
    /// queue that held `len_before` words.
    pub fn after_remove(&mut self, len_before: usize) {
        self.hide_details();
        if self.current_index + 1 >= len_before {
            self.current_index = len_before.saturating_sub(2);
        }
    }

    /// 1-based position and queue length, for the progress bar.
    pub fn progress(&self, len: usize) -> (usize, usize) {
        if len == 0 {
            return (0, 0);
        }
        (self.current_index.min(len - 1) + 1, len)
    }

    fn advance_after_decision(&mut self, len_before: usize) {
        match self.filter {
            // Every decision schedules the word into the future, so it leaves
            // the due queue and the following word slides into this slot.
            ReviewFilter::Due => {
                self.hide_details();
                if self.current_index + 1 >= len_before {
                    self.current_index = 0;
                }
            }
            ReviewFilter::Today | ReviewFilter::All => self.next(len_before),
        }
    }

    fn hide_details(&mut self) {
        self.show_meaning = false;
        self.show_example = false;
    }
}

//! Study mode: random walk over words the learner has not marked as known.

use super::{ReviewableWord, Word};
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

#[derive(Clone, Debug, Default)]
pub struct StudySession {
    current_id: Option<i64>,
    history: Vec<i64>,
    pub show_meaning: bool,
    pub show_example: bool,
}

/// Words still worth studying: everything except the known ones.
pub fn study_candidates<'a>(words: &'a [Word], known_ids: &[i64]) -> Vec<&'a Word> {
    words.iter().filter(|w| !known_ids.contains(&w.id)).collect()
}

fn pick_random<R: Rng + ?Sized>(
    candidates: &[&Word],
    exclude: Option<i64>,
    rng: &mut R,
) -> Option<i64> {
    let pool: Vec<&&Word> = candidates
        .iter()
        .filter(|w| Some(w.id) != exclude)
        .collect();
    pool.choose(rng).map(|w| w.id)
}

impl StudySession {
    /// Starts on a random candidate.
    pub fn start<R: Rng + ?Sized>(words: &[Word], known_ids: &[i64], rng: &mut R) -> Self {
        let candidates = study_candidates(words, known_ids);
        Self {
            current_id: pick_random(&candidates, None, rng),
            ..Self::default()
        }
    }

    pub fn current<'a>(&self, words: &'a [Word]) -> Option<&'a Word> {
        let id = self.current_id?;
        words.iter().find(|w| w.id == id)
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn is_learned(&self, learned: &[ReviewableWord]) -> bool {
        self.current_id
            .is_some_and(|id| learned.iter().any(|w| w.id == id))
    }

    pub fn toggle_meaning(&mut self) {
        self.show_meaning = !self.show_meaning;
    }

    pub fn toggle_example(&mut self) {
        self.show_example = !self.show_example;
    }

    /// Remembers the current word in the history and picks another one.
    pub fn next_word<R: Rng + ?Sized>(&mut self, words: &[Word], known_ids: &[i64], rng: &mut R) {
        if let Some(id) = self.current_id {
            self.history.push(id);
        }
        let candidates = study_candidates(words, known_ids);
        self.current_id = pick_random(&candidates, self.current_id, rng);
        self.hide_details();
    }

    pub fn previous_word(&mut self) {
        if let Some(id) = self.history.pop() {
            self.current_id = Some(id);
            self.hide_details();
        }
    }

    /// Enters the current word into the review pool and moves on.
    ///
    /// Returns `None` when there is no current word or it is already learned;
    /// the session advances either way.
    pub fn mark_learned<R: Rng + ?Sized>(
        &mut self,
        words: &[Word],
        known_ids: &[i64],
        learned: &[ReviewableWord],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<ReviewableWord> {
        let record = match self.current(words) {
            Some(word) if !learned.iter().any(|w| w.id == word.id) => {
                Some(ReviewableWord::learned(word, now))
            }
            _ => None,
        };
        self.next_word(words, known_ids, rng);
        record
    }

    /// Marks the current word as known and moves on without recording history.
    ///
    /// Returns the id the caller must add to the known list.
    pub fn mark_known<R: Rng + ?Sized>(
        &mut self,
        words: &[Word],
        known_ids: &[i64],
        rng: &mut R,
    ) -> Option<i64> {
        let id = self.current_id?;
        let candidates = study_candidates(words, known_ids);
        self.current_id = pick_random(&candidates, Some(id), rng);
        self.history.retain(|&h| h != id);
        self.hide_details();
        Some(id)
    }

    fn hide_details(&mut self) {
        self.show_meaning = false;
        self.show_example = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn words() -> Vec<Word> {
        ["abandon", "benign", "coherent", "diligent"]
            .iter()
            .enumerate()
            .map(|(i, w)| Word::new(i as i64 + 1, *w))
            .collect()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_candidates_skip_known() {
        let words = words();
        let ids: Vec<i64> = study_candidates(&words, &[2, 4]).iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_next_never_repeats_current() {
        let words = words();
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = StudySession::start(&words, &[], &mut rng);

        for _ in 0..20 {
            let before = session.current(&words).map(|w| w.id);
            session.next_word(&words, &[], &mut rng);
            assert_ne!(session.current(&words).map(|w| w.id), before);
        }
    }

    #[test]
    fn test_previous_walks_history() {
        let words = words();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = StudySession::start(&words, &[], &mut rng);
        let first = session.current(&words).map(|w| w.id);

        assert!(!session.can_go_back());
        session.next_word(&words, &[], &mut rng);
        assert!(session.can_go_back());
        session.previous_word();
        assert_eq!(session.current(&words).map(|w| w.id), first);
    }

    #[test]
    fn test_mark_learned_creates_record_once() {
        let words = words();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = StudySession::start(&words, &[], &mut rng);
        let current = session.current(&words).map(|w| w.id).unwrap();

        let record = session
            .mark_learned(&words, &[], &[], now(), &mut rng)
            .unwrap();
        assert_eq!(record.id, current);
        assert_eq!(record.next_review_date, Some(now()));

        session.previous_word();
        let again = session.mark_learned(&words, &[], &[record], now(), &mut rng);
        assert!(again.is_none());
    }

    #[test]
    fn test_mark_known_skips_history() {
        let words = words();
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = StudySession::start(&words, &[], &mut rng);
        let known = session.mark_known(&words, &[], &mut rng).unwrap();

        assert_ne!(session.current(&words).map(|w| w.id), Some(known));
        assert!(!session.can_go_back());
    }

    #[test]
    fn test_everything_known_ends_session() {
        let words = words();
        let mut rng = StdRng::seed_from_u64(5);
        let session = StudySession::start(&words, &[1, 2, 3, 4], &mut rng);
        assert!(session.current(&words).is_none());
    }
}

//! Background thread that runs dictionary lookups for the UI.
//!
//! The UI sends requests and polls for outcomes once per frame, so a slow
//! network never blocks rendering.

use super::{DictionaryClient, DictionaryEntry, DictionaryError};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

/// Pause between consecutive requests to stay clear of the API's rate limit.
const REQUEST_PAUSE: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupTarget {
    /// Preview in the "add word" dialog.
    NewWord,
    /// Fill in an existing study word.
    Word(i64),
}

pub struct LookupRequest {
    pub target: LookupTarget,
    pub word: String,
}

pub struct LookupOutcome {
    pub target: LookupTarget,
    pub word: String,
    pub result: Result<DictionaryEntry, DictionaryError>,
}

pub struct LookupWorker {
    requests: Sender<LookupRequest>,
    outcomes: Receiver<LookupOutcome>,
    pending: usize,
}

impl LookupWorker {
    pub fn spawn(client: DictionaryClient) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<LookupRequest>();
        let (outcome_tx, outcome_rx) = mpsc::channel();

        thread::spawn(move || {
            for request in request_rx {
                let result = client.lookup(&request.word);
                if let Err(e) = &result {
                    tracing::warn!(word = %request.word, "lookup failed: {e}");
                }
                let outcome = LookupOutcome {
                    target: request.target,
                    word: request.word,
                    result,
                };
                if outcome_tx.send(outcome).is_err() {
                    break;
                }
                thread::sleep(REQUEST_PAUSE);
            }
            tracing::debug!("lookup worker stopped");
        });

        Self {
            requests: request_tx,
            outcomes: outcome_rx,
            pending: 0,
        }
    }

    pub fn request(&mut self, target: LookupTarget, word: impl Into<String>) {
        let request = LookupRequest {
            target,
            word: word.into(),
        };
        if self.requests.send(request).is_ok() {
            self.pending += 1;
        } else {
            tracing::error!("lookup worker is gone, request dropped");
        }
    }

    /// Lookups sent but not yet collected.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Collects every outcome that is ready without blocking.
    pub fn poll(&mut self) -> Vec<LookupOutcome> {
        let mut ready = Vec::new();
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => {
                    self.pending = self.pending.saturating_sub(1);
                    ready.push(outcome);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.pending = 0;
                    break;
                }
            }
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Instant;

    #[test]
    fn test_failed_lookup_comes_back_as_outcome() {
        // A port that was just released has no listener.
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let client = DictionaryClient::new(
            format!("http://127.0.0.1:{port}/entries"),
            Duration::from_secs(2),
        )
        .unwrap();
        let mut worker = LookupWorker::spawn(client);
        worker.request(LookupTarget::Word(42), "run");
        assert_eq!(worker.pending(), 1);

        let deadline = Instant::now() + Duration::from_secs(10);
        let mut outcomes = Vec::new();
        while outcomes.is_empty() && Instant::now() < deadline {
            outcomes = worker.poll();
            thread::sleep(Duration::from_millis(20));
        }

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].target, LookupTarget::Word(42));
        assert!(outcomes[0].result.is_err());
        assert_eq!(worker.pending(), 0);
    }
}

use super::{DictionaryEntry, DictionaryError, parse_response};
use reqwest::StatusCode;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

/// Blocking client for the free dictionary API. Run it off the UI thread.
#[derive(Clone)]
pub struct DictionaryClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl DictionaryClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, DictionaryError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { base_url, client })
    }

    /// Fetches and parses the first entry for `word`.
    pub fn lookup(&self, word: &str) -> Result<DictionaryEntry, DictionaryError> {
        let url = self.entry_url(word)?;
        tracing::debug!(%url, "dictionary lookup");

        let response = self.client.get(url).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(DictionaryError::NotFound(word.to_string())),
            status if !status.is_success() => return Err(DictionaryError::Api(status.as_u16())),
            _ => {}
        }

        let body = response.text()?;
        parse_response(&body)?.ok_or_else(|| DictionaryError::Empty(word.to_string()))
    }

    /// URL of the entry for `word`, with the word percent-encoded as one path segment.
    pub fn entry_url(&self, word: &str) -> Result<Url, DictionaryError> {
        let invalid = || DictionaryError::InvalidUrl(self.base_url.clone());
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(word.trim());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> DictionaryClient {
        DictionaryClient::new(base.to_string(), Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_entry_url_encodes_word() {
        let url = client(DEFAULT_BASE_URL).entry_url(" ice cream ").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.dictionaryapi.dev/api/v2/entries/en/ice%20cream"
        );
    }

    #[test]
    fn test_entry_url_tolerates_trailing_slash() {
        let url = client("http://localhost:8080/entries/").entry_url("run").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/entries/run");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            client("not a url").entry_url("run"),
            Err(DictionaryError::InvalidUrl(_))
        ));
    }
}

//! Remote profanity screening with a bounded memo cache.

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::{
    collections::{HashMap, VecDeque},
    sync::Mutex,
    time::Duration,
};
use tracing::warn;

/// Text-classification endpoint used to screen descriptions.
pub const DEFAULT_API_URL: &str = "https://vector.profanity.dev";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CACHE_CAPACITY: usize = 1000;

#[derive(Debug, Deserialize)]
struct Verdict {
    #[serde(default, rename = "isProfanity")]
    is_profanity: bool,
}

/// Classifies text by calling a remote profanity-detection service.
///
/// The checker never fails its caller: a timeout, transport error, or
/// non-success response from the service is logged and treated as a clean
/// verdict. Verdicts are memoized so that repeated submissions of the same
/// text don't hit the service again.
#[derive(Debug)]
pub struct ProfanityChecker {
    client: Client,
    url: String,
    cache: Mutex<VerdictCache>,
}

impl ProfanityChecker {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_API_URL)
    }

    /// Use an alternate classification endpoint.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            cache: Mutex::new(VerdictCache::new(CACHE_CAPACITY)),
        }
    }

    /// Check whether `text` contains profanity. Empty text is always clean
    /// and never leaves the process.
    pub async fn contains_profanity(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        if let Some(verdict) = self.cached(text) {
            return verdict;
        }
        let verdict = self.query(text).await;
        // fail-open verdicts are cached too, just like real ones
        self.cache.lock().unwrap().insert(text.to_string(), verdict);
        verdict
    }

    // the lock is never held across an await
    fn cached(&self, text: &str) -> Option<bool> {
        self.cache.lock().unwrap().get(text)
    }

    async fn query(&self, text: &str) -> bool {
        let response = self
            .client
            .post(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .json(&json!({ "message": text }))
            .send()
            .await;
        match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<Verdict>().await {
                    Ok(verdict) => verdict.is_profanity,
                    Err(e) => {
                        warn!("profanity API returned an undecodable body: {e}");
                        false
                    }
                }
            }
            Ok(response) => {
                warn!("profanity API returned status code {}", response.status());
                false
            }
            Err(e) => {
                warn!("profanity API request failed: {e}");
                false
            }
        }
    }
}

impl Default for ProfanityChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Size-bounded memo cache keyed by the exact submitted text. Once the
/// capacity is reached, the oldest entry is evicted first.
#[derive(Debug)]
struct VerdictCache {
    verdicts: HashMap<String, bool>,
    order: VecDeque<String>,
    capacity: usize,
}

impl VerdictCache {
    fn new(capacity: usize) -> Self {
        Self {
            verdicts: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, text: &str) -> Option<bool> {
        self.verdicts.get(text).copied()
    }

    fn insert(&mut self, text: String, verdict: bool) {
        if self.verdicts.insert(text.clone(), verdict).is_none() {
            self.order.push_back(text);
        }
        while self.verdicts.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.verdicts.remove(&oldest);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Serve canned HTTP responses on an ephemeral local port and return the
    /// base URL to reach them.
    async fn mock_service(status: &'static str, body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock service");
        let addr = listener.local_addr().expect("no local addr");
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = vec![0u8; 16 * 1024];
                let mut read = 0;
                loop {
                    match socket.read(&mut buf[read..]).await {
                        Ok(0) => break,
                        Ok(n) => {
                            read += n;
                            if request_complete(&buf[..read]) {
                                break;
                            }
                        }
                        Err(_) => return,
                    }
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                     content-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        format!("http://{addr}")
    }

    fn request_complete(data: &[u8]) -> bool {
        let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&data[..pos]);
        let content_length = headers
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())?
            })
            .unwrap_or(0);
        data.len() >= pos + 4 + content_length
    }

    #[test(tokio::test)]
    async fn empty_text_is_always_clean() {
        // closed port: any remote call would fail rather than short-circuit
        let checker = ProfanityChecker::with_url("http://127.0.0.1:9");
        assert!(!checker.contains_profanity("").await);
    }

    #[test(tokio::test)]
    async fn positive_verdict_is_reported() {
        let url = mock_service("200 OK", r#"{"isProfanity": true}"#).await;
        let checker = ProfanityChecker::with_url(url);
        assert!(checker.contains_profanity("rude words").await);
    }

    #[test(tokio::test)]
    async fn negative_verdict_is_reported() {
        let url = mock_service("200 OK", r#"{"isProfanity": false}"#).await;
        let checker = ProfanityChecker::with_url(url);
        assert!(!checker.contains_profanity("kind words").await);
    }

    #[test(tokio::test)]
    async fn missing_verdict_field_reads_as_clean() {
        let url = mock_service("200 OK", r#"{}"#).await;
        let checker = ProfanityChecker::with_url(url);
        assert!(!checker.contains_profanity("anything").await);
    }

    #[test(tokio::test)]
    async fn server_error_fails_open() {
        let url = mock_service("500 Internal Server Error", r#"{"error": "down"}"#).await;
        let checker = ProfanityChecker::with_url(url);
        assert!(!checker.contains_profanity("anything").await);
    }

    #[test(tokio::test)]
    async fn unreachable_service_fails_open() {
        let checker = ProfanityChecker::with_url("http://127.0.0.1:9");
        assert!(!checker.contains_profanity("anything").await);
    }

    #[test(tokio::test)]
    async fn verdicts_are_memoized() {
        let url = mock_service("200 OK", r#"{"isProfanity": true}"#).await;
        let checker = ProfanityChecker::with_url(url);
        assert!(checker.contains_profanity("rude words").await);

        // swap in a dead endpoint: a second lookup must come from the cache
        let cached = ProfanityChecker {
            url: "http://127.0.0.1:9".to_string(),
            ..checker
        };
        assert!(cached.contains_profanity("rude words").await);
    }

    #[test]
    fn cache_evicts_oldest_entries() {
        let mut cache = VerdictCache::new(2);
        cache.insert("one".to_string(), true);
        cache.insert("two".to_string(), false);
        cache.insert("three".to_string(), true);
        assert_eq!(cache.get("one"), None);
        assert_eq!(cache.get("two"), Some(false));
        assert_eq!(cache.get("three"), Some(true));
    }

    #[test]
    fn cache_reinsert_does_not_grow_order() {
        let mut cache = VerdictCache::new(2);
        cache.insert("one".to_string(), true);
        cache.insert("one".to_string(), false);
        cache.insert("two".to_string(), true);
        assert_eq!(cache.get("one"), Some(false));
        assert_eq!(cache.get("two"), Some(true));
    }
}

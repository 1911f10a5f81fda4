//! Search execution against the asynchronous cookie protocol
//!
//! A search runs in cycles. Each cycle submits the query with the current
//! `from`/`size` window, receives an `af_cookie`, then polls
//! `/{resource}/results/{cookie}` until the page is full or the service
//! reports 100% completion. The window then moves forward by the size just
//! used.
//!
//! The service serves at most [`RESULT_CEILING`] results per query. The last
//! window is shrunk to end exactly on the ceiling and no submission is made
//! past it.
//!
//! The service has been seen to discard a cookie while it is still being
//! polled. That case is reported as [`Error::CursorLost`] with the number of
//! polls, the time spent and the last completion figure seen, since it is not
//! known whether retrying helps.

use crate::error::{Error, Result};
use crate::query::QueryDocument;
use crate::transport::{Body, Transport, body_from};
use futures::Stream;
use futures::stream;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Hard limit on results retrievable by one search
pub const RESULT_CEILING: u32 = 4000;
/// Scope sent with every search submission
pub const SEARCH_SCOPE: &str = "Global";

/// A single search hit, kept as the service sent it
pub type Record = Value;

pub type PageStream = Pin<Box<dyn Stream<Item = Result<Page>> + Send>>;

/// Bounds on the wait for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Delay between two polls of the same cookie
    pub interval: Duration,
    /// Give up after this many polls for one page
    pub max_attempts: Option<u32>,
    /// Give up once this much time passed since the submission
    pub max_wait: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            max_attempts: Some(1200),
            max_wait: Some(Duration::from_secs(600)),
        }
    }
}

impl PollPolicy {
    fn exhausted(&self, attempts: u32, elapsed: Duration) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
            || self.max_wait.is_some_and(|max| elapsed >= max)
    }
}

/// One poll answer
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub hits: Vec<Record>,
    pub af_complete_percentage: Option<f64>,
}

impl Page {
    /// Completion reported by the service; a missing figure counts as done.
    pub fn completion(&self) -> f64 {
        self.af_complete_percentage.unwrap_or(100.0)
    }

    /// Whether polling may stop on this answer.
    pub fn is_ready(&self, requested_size: u32) -> bool {
        self.hits.len() == requested_size as usize || self.completion() == 100.0
    }
}

#[derive(Debug, Deserialize)]
struct Submission {
    af_cookie: String,
    af_complete_percentage: Option<f64>,
}

#[derive(Serialize)]
struct SubmissionBody<'a> {
    query: &'a QueryDocument,
    size: u32,
    from: u32,
    sort: &'a Value,
    scope: &'a str,
}

/// Everything one search carries from cycle to cycle
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Search endpoint, e.g. `/samples/search`
    pub path: String,
    pub query: QueryDocument,
    pub page_size: u32,
    /// `from` of the next submission; never decreases
    pub offset: u32,
    pub sort: Value,
    pub scope: String,
}

impl SearchState {
    pub fn new(path: impl Into<String>, query: QueryDocument, page_size: u32) -> Self {
        Self {
            path: path.into(),
            query,
            page_size,
            offset: 0,
            sort: json!({ "create_date": { "order": "desc" } }),
            scope: SEARCH_SCOPE.to_string(),
        }
    }

    /// Size of the next submission, or `None` once the ceiling is reached.
    pub fn next_size(&self) -> Option<u32> {
        if self.offset >= RESULT_CEILING {
            return None;
        }
        Some(self.page_size.min(RESULT_CEILING - self.offset))
    }

    /// `/{resource}/results/{cookie}` for the resource of the search path.
    pub fn results_path(&self, cookie: &str) -> String {
        let resource = self
            .path
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        format!("/{}/results/{}", resource, cookie)
    }

    fn submission_body(&self, size: u32) -> Result<Body> {
        body_from(&SubmissionBody {
            query: &self.query,
            size,
            from: self.offset,
            sort: &self.sort,
            scope: &self.scope,
        })
    }
}

/// Drives one search through its submit/poll cycles.
#[derive(Debug)]
pub struct SearchPoller {
    transport: Arc<dyn Transport>,
    policy: PollPolicy,
    state: SearchState,
    finished: bool,
}

impl SearchPoller {
    pub fn new(transport: Arc<dyn Transport>, state: SearchState, policy: PollPolicy) -> Self {
        Self {
            transport,
            policy,
            state,
            finished: false,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Next accepted, non-empty page; `None` at the end of the results.
    ///
    /// Once `None` or an error was returned, no further requests are made.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.finished {
            return Ok(None);
        }

        let result = self.run_cycle().await;
        if !matches!(result, Ok(Some(_))) {
            self.finished = true;
        }
        result
    }

    /// Pages as a lazy stream; the next cycle starts only when polled.
    pub fn into_pages(self) -> PageStream {
        Box::pin(stream::try_unfold(self, |mut poller| async move {
            let page = poller.next_page().await?;
            Ok::<_, Error>(page.map(|page| (page, poller)))
        }))
    }

    async fn run_cycle(&mut self) -> Result<Option<Page>> {
        let Some(size) = self.state.next_size() else {
            info!(
                "Search on {} reached the {} result ceiling",
                self.state.path, RESULT_CEILING
            );
            return Ok(None);
        };

        let body = self.state.submission_body(size)?;
        debug!(
            "Submitting search on {} (from={}, size={})",
            self.state.path, self.state.offset, size
        );

        let started = Instant::now();
        let submission: Submission = self
            .transport
            .post(&self.state.path, Some(body), &[])
            .await?
            .json()?;
        self.state.offset += size;

        let page = self.poll(&submission, size, started).await?;

        if page.hits.is_empty() {
            info!("Search on {} has no more results", self.state.path);
            return Ok(None);
        }
        Ok(Some(page))
    }

    async fn poll(&self, submission: &Submission, size: u32, started: Instant) -> Result<Page> {
        let path = self.state.results_path(&submission.af_cookie);
        let mut attempts: u32 = 0;
        let mut last_percentage = submission.af_complete_percentage;

        loop {
            if attempts > 0 {
                if self.policy.exhausted(attempts, started.elapsed()) {
                    warn!(
                        "Giving up on {} after {} polls ({:?})",
                        path,
                        attempts,
                        started.elapsed()
                    );
                    return Err(Error::PollExhausted {
                        attempts,
                        elapsed: started.elapsed(),
                        last_percentage,
                    });
                }
                if !self.policy.interval.is_zero() {
                    tokio::time::sleep(self.policy.interval).await;
                }
            }
            attempts += 1;

            let page: Page = match self.transport.post(&path, None, &[]).await {
                Ok(response) => response.json()?,
                Err(Error::Client(failure)) if failure.is_cookie_not_found() => {
                    warn!("Cookie for {} went away after {} polls", path, attempts);
                    return Err(Error::CursorLost {
                        attempts,
                        elapsed: started.elapsed(),
                        last_percentage,
                        source: failure,
                    });
                }
                Err(e) => return Err(e),
            };

            if page.is_ready(size) {
                debug!(
                    "Accepted {} hits from {} after {} polls",
                    page.hits.len(),
                    path,
                    attempts
                );
                return Ok(page);
            }

            if page.af_complete_percentage.is_some() {
                last_percentage = page.af_complete_percentage;
            }
            debug!(
                "Poll {} of {}: {} hits, {}% complete",
                attempts,
                path,
                page.hits.len(),
                page.completion()
            );
        }
    }
}

use crate::config::{ClientConfig, DEFAULT_PAGE_SIZE};
use crate::error::Result;
use crate::poller::{PageStream, PollPolicy, SearchPoller, SearchState};
use crate::query::SearchQuery;
use crate::resources::{Samples, Sessions, Tags};
use crate::stream::{RecordStream, records};
use crate::transport::{ApiResponse, Body, HttpTransport, Transport};
use std::sync::Arc;

/// Entry point to the AutoFocus API.
///
/// Cloning is cheap. Each search gets its own state, so clones may run
/// searches concurrently.
#[derive(Debug, Clone)]
pub struct AutoFocus {
    transport: Arc<dyn Transport>,
    page_size: u32,
    poll_policy: PollPolicy,
}

impl AutoFocus {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            page_size: DEFAULT_PAGE_SIZE,
            poll_policy: PollPolicy::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport))
            .with_page_size(config.page_size)
            .with_poll_policy(config.poll.policy()))
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// One plain request, for endpoints outside the search protocol.
    pub async fn request(
        &self,
        path: &str,
        body: Option<Body>,
        params: &[(String, String)],
    ) -> Result<ApiResponse> {
        self.transport.post(path, body, params).await
    }

    /// Run `query` against the search endpoint at `path`, page by page.
    ///
    /// The credential and the query are checked here, before any request.
    pub fn search_pages(&self, path: &str, query: &SearchQuery) -> Result<PageStream> {
        self.transport.ensure_credential()?;
        let document = query.build()?;

        let state = SearchState::new(path, document, self.page_size);
        let poller = SearchPoller::new(self.transport.clone(), state, self.poll_policy.clone());
        Ok(poller.into_pages())
    }

    /// Run `query` against the search endpoint at `path`, hit by hit.
    pub fn search(&self, path: &str, query: &SearchQuery) -> Result<RecordStream> {
        Ok(records(self.search_pages(path, query)?))
    }

    pub fn samples(&self) -> Samples<'_> {
        Samples::new(self)
    }

    pub fn sessions(&self) -> Sessions<'_> {
        Sessions::new(self)
    }

    pub fn tags(&self) -> Tags<'_> {
        Tags::new(self)
    }
}

use crate::client::AutoFocus;
use crate::error::Result;
use crate::query::SearchQuery;
use crate::stream::{TypedStream, sources};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const SESSIONS_SEARCH_PATH: &str = "/sessions/search";

/// A session (one observed delivery of a sample), from a search hit's `_source`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub sha256: Option<String>,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub app: Option<String>,
    pub src_ip: Option<String>,
    pub dst_ip: Option<String>,
    pub src_country: Option<String>,
    pub dst_country: Option<String>,
    pub device_country: Option<String>,
    pub region: Option<String>,
    pub tstamp: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct Sessions<'a> {
    client: &'a AutoFocus,
}

impl<'a> Sessions<'a> {
    pub(crate) fn new(client: &'a AutoFocus) -> Self {
        Self { client }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<TypedStream<Session>> {
        Ok(sources(self.client.search(SESSIONS_SEARCH_PATH, query)?))
    }
}

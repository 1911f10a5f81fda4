use crate::client::AutoFocus;
use crate::error::{Error, Result};
use crate::query::SearchQuery;
use crate::stream::{TypedStream, sources};
use crate::transport::body_from;
use futures::TryStreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

pub const SAMPLES_SEARCH_PATH: &str = "/samples/search";

static HASH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Fa-f0-9]{32}|[A-Fa-f0-9]{40}|[A-Fa-f0-9]{64})$").unwrap()
});

/// A sample (file), from a search hit's `_source`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sample {
    pub sha256: String,
    pub md5: Option<String>,
    pub sha1: Option<String>,
    pub ssdeep: Option<String>,
    pub filetype: Option<String>,
    pub size: Option<u64>,
    pub malware: Option<i64>,
    pub create_date: Option<String>,
    pub finish_date: Option<String>,
    pub tag: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Sample {
    pub async fn analyses(&self, client: &AutoFocus, request: &AnalysisRequest) -> Result<Value> {
        client.samples().analyses(&self.sha256, request).await
    }
}

/// Body of `/sample/{sha256}/analysis`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub sections: Vec<String>,
    pub platforms: Vec<String>,
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self {
            sections: vec!["file".to_string()],
            platforms: vec!["win7".to_string(), "winxp".to_string()],
        }
    }
}

pub struct Samples<'a> {
    client: &'a AutoFocus,
}

impl<'a> Samples<'a> {
    pub(crate) fn new(client: &'a AutoFocus) -> Self {
        Self { client }
    }

    pub fn search(&self, query: &SearchQuery) -> Result<TypedStream<Sample>> {
        Ok(sources(self.client.search(SAMPLES_SEARCH_PATH, query)?))
    }

    /// Analysis sections of a sample, as the service returns them.
    pub async fn analyses(&self, sha256: &str, request: &AnalysisRequest) -> Result<Value> {
        let path = format!("/sample/{}/analysis", sha256);
        self.client
            .request(&path, Some(body_from(request)?), &[])
            .await?
            .json()
    }

    /// Look a sample up by md5, sha1 or sha256.
    pub async fn get(&self, hash: &str) -> Result<Sample> {
        if !HASH_RE.is_match(hash) {
            return Err(Error::InvalidHash(hash.to_string()));
        }

        let field = match hash.len() {
            32 => "sample.md5",
            40 => "sample.sha1",
            _ => "sample.sha256",
        };
        debug!("Looking up sample by {}", field);

        let mut found = self.search(&SearchQuery::field(field, hash))?;
        found
            .try_next()
            .await?
            .ok_or_else(|| Error::NotFound(hash.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::PollPolicy;
    use crate::testing::{Reply, ScriptedTransport};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const MD5: &str = "7c49955374b0b8105d6ca34dafeb3769";
    const SHA1: &str = "bd3ccbddd8e3da2f4de04974e744e2a776539cf5";
    const SHA256: &str = "585fa6e62424037461b8cb9e6b59597e54f2b74510b1efea2a14be4f58bae4eb";

    fn client(transport: Arc<ScriptedTransport>) -> AutoFocus {
        AutoFocus::new(transport).with_poll_policy(PollPolicy {
            interval: Duration::ZERO,
            ..Default::default()
        })
    }

    fn found(sha256: &str) -> Vec<Reply> {
        vec![
            Reply::ok(json!({"af_cookie": "c1"})),
            Reply::ok(json!({
                "hits": [{"_source": {"sha256": sha256, "md5": MD5, "sha1": SHA1, "malware": 1, "tag": ["Unit42.Foo"]}}],
                "af_complete_percentage": 100
            })),
        ]
    }

    #[rstest]
    #[case(MD5, "sample.md5")]
    #[case(SHA1, "sample.sha1")]
    #[case(SHA256, "sample.sha256")]
    #[tokio::test]
    async fn test_get_picks_field_by_length(#[case] hash: &str, #[case] field: &str) {
        let transport = ScriptedTransport::new(found(SHA256));
        let af = client(transport.clone());

        let sample = af.samples().get(hash).await.unwrap();
        assert_eq!(sample.sha256, SHA256);
        assert_eq!(sample.md5.as_deref(), Some(MD5));
        assert_eq!(sample.tag, vec!["Unit42.Foo".to_string()]);

        let requests = transport.requests();
        assert_eq!(requests[0].path, SAMPLES_SEARCH_PATH);
        assert_eq!(
            requests[0].body_value()["query"]["children"][0],
            json!({"field": field, "operator": "is", "value": hash})
        );
        // Only the first page is needed
        assert_eq!(requests.len(), 2);
    }

    #[rstest]
    #[case("")]
    #[case("xyz")]
    #[case("7c49955374b0b8105d6ca34dafeb376")]
    #[case("7c49955374b0b8105d6ca34dafeb3769z")]
    #[case("g85fa6e62424037461b8cb9e6b59597e54f2b74510b1efea2a14be4f58bae4eb")]
    #[tokio::test]
    async fn test_get_rejects_bad_hash(#[case] hash: &str) {
        let transport = ScriptedTransport::new(vec![]);
        let af = client(transport.clone());

        assert!(matches!(af.samples().get(hash).await, Err(Error::InvalidHash(_))));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let transport = ScriptedTransport::new(vec![
            Reply::ok(json!({"af_cookie": "c1"})),
            Reply::ok(json!({"hits": [], "af_complete_percentage": 100})),
        ]);
        let af = client(transport);

        assert!(matches!(af.samples().get(MD5).await, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_analyses_body() {
        let transport = ScriptedTransport::new(vec![Reply::ok(json!({"file": {"win7": []}}))]);
        let af = client(transport.clone());
        let sample = Sample {
            sha256: SHA256.to_string(),
            ..Default::default()
        };

        let analyses = sample
            .analyses(&af, &AnalysisRequest::default())
            .await
            .unwrap();
        assert_eq!(analyses, json!({"file": {"win7": []}}));

        let request = &transport.requests()[0];
        assert_eq!(request.path, format!("/sample/{}/analysis", SHA256));
        assert_eq!(
            request.body_value(),
            json!({"sections": ["file"], "platforms": ["win7", "winxp"]})
        );
    }
}

use super::Command;
use crate::error::Result;
use autofocus::{AnalysisRequest, AutoFocus};

/// Sample lookup by hash
pub struct SampleCommand {
    client: AutoFocus,
    hash: String,
}

impl SampleCommand {
    pub fn new(client: AutoFocus, hash: String) -> Self {
        Self { client, hash }
    }
}

#[async_trait::async_trait]
impl Command for SampleCommand {
    async fn execute(&self) -> Result<()> {
        let sample = self.client.samples().get(&self.hash).await?;
        println!("{}", serde_json::to_string_pretty(&sample)?);
        Ok(())
    }
}

pub struct AnalysisCommand {
    client: AutoFocus,
    sha256: String,
    request: AnalysisRequest,
}

impl AnalysisCommand {
    pub fn new(client: AutoFocus, sha256: String, sections: Vec<String>, platforms: Vec<String>) -> Self {
        let defaults = AnalysisRequest::default();
        let request = AnalysisRequest {
            sections: if sections.is_empty() { defaults.sections } else { sections },
            platforms: if platforms.is_empty() { defaults.platforms } else { platforms },
        };
        Self {
            client,
            sha256,
            request,
        }
    }
}

#[async_trait::async_trait]
impl Command for AnalysisCommand {
    async fn execute(&self) -> Result<()> {
        let analyses = self
            .client
            .samples()
            .analyses(&self.sha256, &self.request)
            .await?;
        println!("{}", serde_json::to_string_pretty(&analyses)?);
        Ok(())
    }
}

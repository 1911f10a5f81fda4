use super::Command;
use crate::error::Result;
use autofocus::{AutoFocus, ListTagsParams};

pub struct ListTagsCommand {
    client: AutoFocus,
    params: ListTagsParams,
}

impl ListTagsCommand {
    pub fn new(client: AutoFocus, params: ListTagsParams) -> Self {
        Self { client, params }
    }
}

#[async_trait::async_trait]
impl Command for ListTagsCommand {
    async fn execute(&self) -> Result<()> {
        for tag in self.client.tags().list(&self.params).await? {
            println!("{}", serde_json::to_string(&tag)?);
        }
        Ok(())
    }
}

pub struct TagCommand {
    client: AutoFocus,
    name: String,
}

impl TagCommand {
    pub fn new(client: AutoFocus, name: String) -> Self {
        Self { client, name }
    }
}

#[async_trait::async_trait]
impl Command for TagCommand {
    async fn execute(&self) -> Result<()> {
        let tag = self.client.tags().get(&self.name).await?;
        println!("{}", serde_json::to_string_pretty(&tag)?);
        Ok(())
    }
}

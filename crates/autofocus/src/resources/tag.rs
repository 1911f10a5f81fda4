use crate::client::AutoFocus;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString};

pub const TAGS_LIST_PATH: &str = "/tags/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Query parameters of the tag listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListTagsParams {
    pub scope: String,
    pub sort_by: String,
    pub order: SortOrder,
    pub page_size: u32,
    pub page_num: u32,
}

impl Default for ListTagsParams {
    fn default() -> Self {
        Self {
            scope: "Visible".to_string(),
            sort_by: "name".to_string(),
            order: SortOrder::Asc,
            page_size: 1000,
            page_num: 0,
        }
    }
}

impl ListTagsParams {
    fn to_query(&self) -> Vec<(String, String)> {
        vec![
            ("scope".to_string(), self.scope.clone()),
            ("sortBy".to_string(), self.sort_by.clone()),
            ("order".to_string(), self.order.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
            ("pageNum".to_string(), self.page_num.to_string()),
        ]
    }
}

/// A tag as it appears in the listing.
///
/// The listing leaves out comments, references, review and support id; use
/// [`TagSummary::load_full`] to fetch them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagSummary {
    pub public_tag_name: String,
    pub tag_name: Option<String>,
    pub tag_class: Option<String>,
    pub tag_definition_scope: Option<String>,
    pub tag_definition_status: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub count: Option<u64>,
    pub lasthit: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TagSummary {
    pub async fn load_full(&self, client: &AutoFocus) -> Result<Tag> {
        client.tags().get(&self.public_tag_name).await
    }
}

/// A tag with every detail, from `/tag/{name}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub comments: Vec<Value>,
    #[serde(default)]
    pub refs: Option<Value>,
    #[serde(default)]
    pub review: Option<Value>,
    #[serde(default)]
    pub support_id: Option<Value>,
    #[serde(flatten)]
    pub summary: TagSummary,
}

#[derive(Deserialize)]
struct TagListResponse {
    tags: Vec<TagSummary>,
}

#[derive(Deserialize)]
struct TagResponse {
    tag: Tag,
}

pub struct Tags<'a> {
    client: &'a AutoFocus,
}

impl<'a> Tags<'a> {
    pub(crate) fn new(client: &'a AutoFocus) -> Self {
        Self { client }
    }

    pub async fn list(&self, params: &ListTagsParams) -> Result<Vec<TagSummary>> {
        let resp: TagListResponse = self
            .client
            .request(TAGS_LIST_PATH, None, &params.to_query())
            .await?
            .json()?;
        Ok(resp.tags)
    }

    pub async fn get(&self, tag_name: &str) -> Result<Tag> {
        let path = format!("/tag/{}", tag_name);
        let resp: TagResponse = self.client.request(&path, None, &[]).await?.json()?;
        Ok(resp.tag)
    }
}

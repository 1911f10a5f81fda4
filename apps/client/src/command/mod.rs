pub mod lookup;
pub mod search;
pub mod tags;

use crate::error::Result;
use futures::{Stream, TryStreamExt};
use serde::Serialize;

pub use lookup::{AnalysisCommand, SampleCommand};
pub use search::{RawSearchCommand, SearchCommand};
pub use tags::{ListTagsCommand, TagCommand};

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}

/// Print each item as one JSON line, stopping after `limit` items.
async fn print_json_lines<T, S>(mut items: S, limit: Option<usize>) -> Result<usize>
where
    T: Serialize,
    S: Stream<Item = autofocus::Result<T>> + Unpin,
{
    let mut printed = 0;
    while limit.is_none_or(|limit| printed < limit) {
        let Some(item) = items.try_next().await? else {
            break;
        };
        println!("{}", serde_json::to_string(&item)?);
        printed += 1;
    }
    Ok(printed)
}

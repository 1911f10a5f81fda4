//! Flattening search pages into records

use crate::error::{Error, Result};
use crate::poller::{PageStream, Record};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::pin::Pin;

pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Record>> + Send>>;
pub type TypedStream<T> = Pin<Box<dyn Stream<Item = Result<T>> + Send>>;

/// Hits of every page, in page order.
///
/// At most one page is held; the next one is requested only after the
/// current page's hits were consumed. The first error ends the stream.
pub fn records(pages: PageStream) -> RecordStream {
    Box::pin(
        pages
            .map_ok(|page| stream::iter(page.hits.into_iter().map(Ok::<Record, Error>)))
            .try_flatten(),
    )
}

/// Deserialize the `_source` payload of each hit.
pub fn sources<T>(records: RecordStream) -> TypedStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(records.map(|record| record.and_then(from_source)))
}

pub fn from_source<T: DeserializeOwned>(mut hit: Record) -> Result<T> {
    let source = hit
        .get_mut("_source")
        .map(Value::take)
        .ok_or_else(|| Error::UnexpectedResponse(format!("search hit without _source: {hit}")))?;
    Ok(serde_json::from_value(source)?)
}

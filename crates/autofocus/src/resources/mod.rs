//! Typed views over the AutoFocus resource collections
//!
//! Records keep the fields this crate knows about as named members; anything
//! else the service sends lands in an `extra` map.

mod sample;
mod session;
mod tag;

pub use sample::{AnalysisRequest, Sample, Samples};
pub use session::{Session, Sessions};
pub use tag::{ListTagsParams, SortOrder, Tag, TagSummary, Tags};

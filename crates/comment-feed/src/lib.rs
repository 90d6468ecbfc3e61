//! # Comment feed
//!
//! Polls a live chat comment endpoint. Each call performs one GET with `live_id` and an optional
//! `pageToken`, decodes the `{ status, comments: [...] }` envelope, normalizes records into
//! [`Comment`](livechat_core::Comment), drops empty and `#`-prefixed comments, and drops any
//! comment id this fetcher has already returned.
//!
//! The seen-set lives as long as the [`CommentFetcher`]; it is never pruned or persisted.

mod envelope;
mod fetcher;
mod seen;

pub use envelope::{CommentEnvelope, RawComment};
pub use fetcher::{CommentFetcher, CommentSource, FeedError};
pub use seen::SeenComments;

//! HTTP comment fetcher with a process-lifetime seen-set.

use std::sync::Mutex;

use async_trait::async_trait;
use livechat_core::Comment;
use reqwest::{header, Client, Url};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::envelope::CommentEnvelope;
use crate::seen::SeenComments;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Invalid comment feed URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Comment feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Comment feed body could not be decoded (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// Anything that yields the new, relayable comments of a live session.
#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Fetches once and returns only comments not returned before. `page_token` may be empty.
    async fn fetch_new_comments(
        &self,
        live_id: &str,
        page_token: &str,
    ) -> anyhow::Result<Vec<Comment>>;
}

/// Fetches comments from a fixed base URL and remembers every id it has returned.
pub struct CommentFetcher {
    client: Client,
    base_url: Url,
    seen: Mutex<SeenComments>,
}

impl CommentFetcher {
    pub fn new(base_url: &str) -> Result<Self, FeedError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, FeedError> {
        let base_url = Url::parse(base_url).map_err(|e| FeedError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url,
            seen: Mutex::new(SeenComments::new()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Number of distinct comment ids returned so far.
    pub fn seen_count(&self) -> usize {
        self.lock_seen().len()
    }

    /// Request URL for one poll: base URL + `live_id` + `pageToken` when non-empty.
    pub fn request_url(&self, live_id: &str, page_token: &str) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("live_id", live_id);
            if !page_token.is_empty() {
                query.append_pair("pageToken", page_token);
            }
        }
        url
    }

    /// One GET, decode, filter, dedupe. Mutates the seen-set.
    #[instrument(skip(self))]
    pub async fn fetch(&self, live_id: &str, page_token: &str) -> Result<Vec<Comment>, FeedError> {
        let url = self.request_url(live_id, page_token);
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        let envelope: CommentEnvelope =
            serde_json::from_str(&body).map_err(|source| FeedError::Decode { status, source })?;

        debug!(
            status,
            raw_count = envelope.comments.len(),
            "comment feed envelope decoded"
        );

        let candidates = envelope.comments.into_iter().map(Comment::from);
        let comments = self.admit_new(candidates);

        info!(
            new_count = comments.len(),
            seen_total = self.seen_count(),
            "comments fetched"
        );
        Ok(comments)
    }

    /// Keeps relayable comments whose id has not been returned before, recording their ids.
    /// Comments rejected by the text filter never enter the seen-set.
    pub fn admit_new(&self, candidates: impl IntoIterator<Item = Comment>) -> Vec<Comment> {
        let mut seen = self.lock_seen();
        candidates
            .into_iter()
            .filter(Comment::is_relayable)
            .filter(|comment| seen.admit(&comment.comment_id))
            .collect()
    }

    fn lock_seen(&self) -> std::sync::MutexGuard<'_, SeenComments> {
        self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CommentSource for CommentFetcher {
    async fn fetch_new_comments(
        &self,
        live_id: &str,
        page_token: &str,
    ) -> anyhow::Result<Vec<Comment>> {
        Ok(self.fetch(live_id, page_token).await?)
    }
}

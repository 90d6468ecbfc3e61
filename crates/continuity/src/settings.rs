//! Settings store: where the live id, system prompt and continuity state are read from each cycle.

use async_trait::async_trait;
use livechat_core::Result;
use tokio::sync::RwLock;

use crate::state::ContinuityState;

/// Everything one relay cycle reads from the settings store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelaySettings {
    pub live_id: String,
    /// Passed through to the comment endpoint as `pageToken` when non-empty.
    pub next_page_token: String,
    pub system_prompt: Option<String>,
    pub continuity: ContinuityState,
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fresh copy of the settings, read at the start of every cycle.
    async fn snapshot(&self) -> Result<RelaySettings>;

    /// Writes back `continuation_count`, `no_comment_count` and `sleep_mode` from a transition.
    /// `continuity_mode` is only read by the relay; the stored flag is left as is.
    async fn save_continuity(&self, state: ContinuityState) -> Result<()>;
}

/// Process-local settings store.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    inner: RwLock<RelaySettings>,
}

impl InMemorySettingsStore {
    pub fn new(settings: RelaySettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    pub async fn set_live_id(&self, live_id: impl Into<String>) {
        self.inner.write().await.live_id = live_id.into();
    }

    pub async fn set_continuity_mode(&self, enabled: bool) {
        self.inner.write().await.continuity.continuity_mode = enabled;
    }
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
    async fn snapshot(&self) -> Result<RelaySettings> {
        Ok(self.inner.read().await.clone())
    }

    async fn save_continuity(&self, state: ContinuityState) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.continuity.continuation_count = state.continuation_count;
        inner.continuity.no_comment_count = state.no_comment_count;
        inner.continuity.sleep_mode = state.sleep_mode;
        Ok(())
    }
}

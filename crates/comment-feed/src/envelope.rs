//! Wire shapes of the comment endpoint response.

use livechat_core::Comment;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Response body: `{ "status": ..., "comments": [ ... ] }`. `status` is carried but not interpreted.
#[derive(Debug, Deserialize)]
pub struct CommentEnvelope {
    #[serde(default)]
    pub status: Value,
    pub comments: Vec<RawComment>,
}

/// One upstream record. Missing fields decode to empty strings; numbers are kept as their text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawComment {
    #[serde(default, deserialize_with = "lenient_string")]
    pub user_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub profile_image_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub comment: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub created_at: String,
}

impl From<RawComment> for Comment {
    fn from(raw: RawComment) -> Self {
        Comment {
            user_name: raw.user_name,
            user_icon_url: raw.profile_image_url,
            user_comment: raw.comment,
            comment_id: raw.id,
            created_at: raw.created_at,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{Aesthetic, BoardId, CommentColor, CommentId, JoinCode, ViewToken};

pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBoardRequest {
    pub aesthetic: Aesthetic,
    pub recipient_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub join_code: JoinCode,
    /// The join-code lookup answers with a reduced record that omits the
    /// view token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_token: Option<ViewToken>,
    #[serde(default)]
    pub aesthetic: Aesthetic,
    pub recipient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    pub author: String,
    pub message: String,
    pub color: CommentColor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub author: String,
    pub message: String,
    pub color: CommentColor,
    pub created_at: String,
}

impl Comment {
    /// Server timestamps are either RFC 3339 or naive ISO-8601 local time.
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.created_at.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

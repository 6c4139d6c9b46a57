use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One assistant exchange. The table stores the user message and the reply
/// as a pair per row, not one row per turn. Older rows used the `message` /
/// `response` column names.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: String,
    #[serde(alias = "message")]
    pub user_message: String,
    #[serde(alias = "response")]
    pub ai_response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize)]
pub struct NewChatMessage {
    pub user_id: String,
    pub user_message: String,
    pub ai_response: String,
    pub last_message: String,
    pub created_at: DateTime<Utc>,
}

/// Short form of the user message shown in the recent-chats list.
pub fn preview(text: &str) -> String {
    let mut short: String = text.chars().take(100).collect();
    if text.chars().count() > 100 {
        short.push_str("...");
    }
    short
}

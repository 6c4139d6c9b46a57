use serde::{Deserialize, Serialize};

/// Tickets start out pending; nothing in this system ever moves them past
/// that state.
pub const STATUS_PENDING: &str = "pending";

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ContactMessage {
    pub user_id: String,
    pub subject: String,
    pub message: String,
    pub status: String,
}

impl ContactMessage {
    pub fn pending(user_id: &str, subject: &str, message: &str) -> Self {
        ContactMessage {
            user_id: user_id.to_string(),
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
            status: STATUS_PENDING.to_string(),
        }
    }
}

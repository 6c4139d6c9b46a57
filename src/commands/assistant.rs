use crate::entities::chat::{preview, ChatMessage, NewChatMessage};
use crate::entities::profile::Profile;
use crate::gateway;
use crate::State;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

/// How long the delete call may take before the screen gives up on it.
pub const DELETE_TIMEOUT: Duration = Duration::from_secs(10);

/// How many exchanges the recent-chats list shows.
pub const RECENT_LIMIT: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("AI request failed: {0}")]
    Api(reqwest::StatusCode),

    #[error("Invalid response format from AI")]
    ResponseFormat,

    #[error("Chat {0} was not found")]
    MissingChat(i64),

    #[error("Chat {0} does not belong to the current user")]
    NotOwner(i64),

    #[error("Delete operation timed out")]
    Timeout,

    #[error("Gateway error {0}")]
    Gateway(#[from] gateway::Error),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

// we must manually implement serde::Serialize
impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

/// Sends one message and persists the exchange pair for the recent-chats
/// list. Blank input is rejected locally without a round trip; a malformed
/// upstream reply is a retryable error and nothing is persisted for it.
pub async fn send(state: &State, text: &str) -> Result<String, Error> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Error::EmptyMessage);
    }
    let user = state.gateway.require_user().await?;
    let reply = generate(state, text).await?;

    let row = NewChatMessage {
        user_id: user.id,
        user_message: text.to_string(),
        ai_response: reply.clone(),
        last_message: preview(text),
        created_at: Utc::now(),
    };
    // A failed history write costs the transcript entry, not the reply.
    if let Err(err) = state.gateway.insert("chat_history", &row).await {
        warn!("Could not persist chat exchange: {err}");
    }
    Ok(reply)
}

/// The caller's latest exchanges, newest first.
pub async fn list_recent(state: &State, limit: usize) -> Result<Vec<ChatMessage>, Error> {
    let user = state.gateway.require_user().await?;
    Ok(state
        .gateway
        .select_recent("chat_history", &user.id, limit)
        .await?)
}

/// Deletes one exchange. The row is re-fetched first; a row that is missing
/// or belongs to someone else is refused before the delete endpoint is ever
/// contacted.
pub async fn delete(state: &State, chat_id: i64) -> Result<(), Error> {
    let user = state.gateway.require_user().await?;
    let row: Option<ChatMessage> = state
        .gateway
        .select_one("chat_history", &chat_id.to_string())
        .await?;
    check_ownership(row.as_ref(), &user.id, chat_id)?;

    match tokio::time::timeout(
        DELETE_TIMEOUT,
        state.gateway.delete("chat_history", &chat_id.to_string()),
    )
    .await
    {
        Ok(result) => {
            result?;
            info!("Deleted chat {chat_id}");
            Ok(())
        }
        Err(_) => Err(Error::Timeout),
    }
}

/// The one explicit connectivity probe: sends a fixed greeting and reports
/// whether the endpoint answered sensibly. Nothing is persisted.
pub async fn test_connection(state: &State) -> bool {
    let probe = "Hello, this is a test message. Please respond with a simple greeting.";
    match generate(state, probe).await {
        Ok(_) => true,
        Err(err) => {
            warn!("Connection test failed: {err}");
            false
        }
    }
}

/// Asks the assistant to review a profile. The prompt is rebuilt from the
/// profile fields on every call; nothing is persisted.
pub async fn analyze_profile(state: &State, profile: &Profile) -> Result<String, Error> {
    generate(state, &analysis_prompt(profile)).await
}

async fn generate(state: &State, prompt: &str) -> Result<String, Error> {
    let url = format!("{}?key={}", state.config.ai_url, state.config.ai_key);
    let body = GenerateRequest {
        contents: vec![Content {
            parts: vec![Part {
                text: prompt.to_string(),
            }],
        }],
    };
    let res = state
        .gateway
        .http()
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .json(&body)
        .send()
        .await?;
    if !res.status().is_success() {
        return Err(Error::Api(res.status()));
    }
    let raw = res.text().await?;
    let parsed: GenerateResponse =
        serde_json::from_str(&raw).map_err(|_| Error::ResponseFormat)?;
    reply_text(parsed).ok_or(Error::ResponseFormat)
}

fn reply_text(response: GenerateResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .next()
        .map(|part| part.text)
        .filter(|text| !text.is_empty())
}

fn check_ownership(row: Option<&ChatMessage>, user_id: &str, chat_id: i64) -> Result<(), Error> {
    match row {
        None => Err(Error::MissingChat(chat_id)),
        Some(chat) if chat.user_id != user_id => Err(Error::NotOwner(chat_id)),
        Some(_) => Ok(()),
    }
}

fn analysis_prompt(profile: &Profile) -> String {
    let or_missing = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("Not provided")
            .to_string()
    };
    format!(
        "Please analyze this professional profile and provide suggestions for improvement:\n\
         Name: {}\n\
         Title: {}\n\
         Bio: {}\n\n\
         Please provide specific suggestions for:\n\
         1. Profile completeness\n\
         2. Skills presentation\n\
         3. Professional image\n\
         4. Areas for improvement",
        or_missing(&profile.full_name),
        or_missing(&profile.title),
        or_missing(&profile.bio),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn chat(id: i64, user_id: &str) -> ChatMessage {
        ChatMessage {
            id,
            user_id: user_id.to_string(),
            user_message: "hi".to_string(),
            ai_response: "hello".to_string(),
            last_message: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn request_body_matches_the_wire_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: "hi".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&body).expect("request json");
        assert_eq!(
            json,
            serde_json::json!({ "contents": [{ "parts": [{ "text": "hi" }] }] })
        );
    }

    #[test]
    fn well_formed_replies_parse() {
        let raw = r#"{
            "candidates": [{ "content": { "parts": [{ "text": "Hello there" }] } }]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).expect("response");
        assert_eq!(reply_text(parsed).as_deref(), Some("Hello there"));
    }

    #[test]
    fn malformed_replies_yield_nothing() {
        for raw in [
            r#"{}"#,
            r#"{ "candidates": [] }"#,
            r#"{ "candidates": [{}] }"#,
            r#"{ "candidates": [{ "content": { "parts": [] } }] }"#,
            r#"{ "candidates": [{ "content": { "parts": [{ "text": "" }] } }] }"#,
        ] {
            let parsed: GenerateResponse = serde_json::from_str(raw).expect("response");
            assert_eq!(reply_text(parsed), None, "{raw}");
        }
    }

    #[test]
    fn foreign_rows_are_refused_before_any_delete() {
        let row = chat(7, "someone-else");
        assert!(matches!(
            check_ownership(Some(&row), "me", 7),
            Err(Error::NotOwner(7))
        ));
        assert!(matches!(
            check_ownership(None, "me", 7),
            Err(Error::MissingChat(7))
        ));
        let mine = chat(8, "me");
        assert!(check_ownership(Some(&mine), "me", 8).is_ok());
    }

    #[test]
    fn analysis_prompt_marks_missing_fields() {
        let mut profile = Profile::skeleton("u1", None);
        profile.full_name = Some("Ada".to_string());
        let prompt = analysis_prompt(&profile);
        assert!(prompt.contains("Name: Ada"));
        assert!(prompt.contains("Title: Not provided"));
        assert!(prompt.contains("Profile completeness"));
    }
}

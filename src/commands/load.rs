use crate::commands::assistant::RECENT_LIMIT;
use crate::entities::chat::ChatMessage;
use crate::entities::profile::Profile;
use crate::gateway;
use crate::State;
use serde::Serialize;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Gateway error {0}")]
    Gateway(#[from] gateway::Error),
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

/// Everything the first screen needs after launch.
#[derive(Debug, Serialize)]
pub struct Load {
    pub profile: Option<Profile>,
    pub recent_chats: Vec<ChatMessage>,
}

/// Initial load for the signed-in user. A missing profile row is the normal
/// empty state; signed-out callers get an empty load and the shell shows
/// the login screen.
pub async fn load(state: &State) -> Result<Load, Error> {
    let Some(user) = state.gateway.session_user().await else {
        return Ok(Load {
            profile: None,
            recent_chats: Vec::new(),
        });
    };

    let (profile, recent_chats) = futures::try_join!(
        state.gateway.select_one::<Profile>("profiles", &user.id),
        state
            .gateway
            .select_recent::<ChatMessage>("chat_history", &user.id, RECENT_LIMIT),
    )?;
    info!(
        "Loaded {} with {} recent chats",
        user.id,
        recent_chats.len()
    );
    Ok(Load {
        profile,
        recent_chats,
    })
}

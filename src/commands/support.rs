use crate::entities::contact::ContactMessage;
use crate::gateway;
use crate::State;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Please fill in all fields")]
    MissingFields,

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

/// Files a support ticket. Tickets are written once with a pending status;
/// no workflow in this system ever advances them.
pub async fn submit(state: &State, subject: &str, message: &str) -> Result<(), Error> {
    if subject.trim().is_empty() || message.trim().is_empty() {
        return Err(Error::MissingFields);
    }
    let user = state.gateway.require_user().await?;
    let ticket = ContactMessage::pending(&user.id, subject, message);
    state.gateway.insert("contact_messages", &ticket).await?;
    info!("Submitted support ticket for {}", user.id);
    Ok(())
}

use crate::gateway::{self, AuthUser};
use crate::State;
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

/// Creates the account and, through the gateway, the minimal profile row
/// that the rest of the app loads against.
pub async fn sign_up(state: &State, email: &str, password: &str) -> Result<AuthUser, Error> {
    Ok(state.gateway.sign_up(email, password).await?)
}

pub async fn sign_in(state: &State, email: &str, password: &str) -> Result<AuthUser, Error> {
    Ok(state.gateway.sign_in(email, password).await?)
}

pub async fn sign_out(state: &State) -> Result<(), Error> {
    state.gateway.sign_out().await?;
    info!("Signed out");
    Ok(())
}

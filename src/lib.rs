//! Cross-platform core of the Nexia profile sharing app: profile data and
//! validation, the public-profile URL resolver, QR encode/decode, the chat
//! transcript store and the remote gateway the shells drive it all through.

pub mod commands;
pub mod config;
pub mod entities;
pub mod gateway;
pub mod layout;
pub mod theme;
pub mod vcard;

pub use config::Config;

use gateway::Gateway;
use theme::{Preferences, ThemeStore};
use tracing::warn;

/// Context object handed down to every screen. Shells build exactly one at
/// startup with the preference store for their platform and drop it through
/// [`State::teardown`] on exit; nothing in the crate reads ambient state.
pub struct State {
    pub config: Config,
    pub gateway: Gateway,
    pub theme: ThemeStore,
}

impl State {
    pub fn init(config: Config, prefs: Box<dyn Preferences>) -> Result<Self, gateway::Error> {
        let gateway = Gateway::new(&config)?;
        let theme = ThemeStore::load(prefs);
        Ok(State {
            config,
            gateway,
            theme,
        })
    }

    /// Best-effort shutdown: ends the backend session and writes the theme
    /// preference back out. Failures are logged, never raised — the process
    /// is exiting either way.
    pub async fn teardown(&self) {
        if let Err(err) = self.gateway.sign_out().await {
            warn!("Sign-out during teardown failed: {err}");
        }
        self.theme.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{MemoryPrefs, ThemeMode};

    #[test]
    fn init_builds_a_ready_context() {
        let state = State::init(Config::default(), Box::new(MemoryPrefs::default()))
            .expect("state");
        assert_eq!(state.theme.mode(), ThemeMode::Light);
        assert_eq!(state.config.app_url, config::PRODUCTION_APP_URL);
    }
}

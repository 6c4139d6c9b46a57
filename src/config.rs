use std::env;
use tracing::warn;

/// Canonical production origin for shareable profile links.
pub const PRODUCTION_APP_URL: &str = "https://nexia.naveennuwantha.lk";

const DEFAULT_BACKEND_URL: &str = "https://nexia.supabase.co";
const DEFAULT_AI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Clone, Debug)]
pub struct Config {
    /// Origin used for outbound share links on production web.
    pub app_url: String,
    /// Backend-as-a-service root (auth, tables, storage).
    pub backend_url: String,
    /// Anonymous API key sent with every backend call.
    pub anon_key: String,
    /// Generative-AI endpoint, single-turn.
    pub ai_url: String,
    pub ai_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        let anon_key = env::var("NEXIA_ANON_KEY").unwrap_or_else(|_| {
            warn!("Backend anon key wasn't set");
            String::new()
        });
        let ai_key = env::var("NEXIA_AI_KEY").unwrap_or_else(|_| {
            warn!("AI api key wasn't set");
            String::new()
        });
        Config {
            app_url: env::var("NEXIA_APP_URL").unwrap_or_else(|_| PRODUCTION_APP_URL.to_string()),
            backend_url: env::var("NEXIA_BACKEND_URL")
                .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            anon_key,
            ai_url: env::var("NEXIA_AI_URL").unwrap_or_else(|_| DEFAULT_AI_URL.to_string()),
            ai_key,
        }
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Config {
            app_url: PRODUCTION_APP_URL.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            anon_key: "test-anon-key".to_string(),
            ai_url: DEFAULT_AI_URL.to_string(),
            ai_key: "test-ai-key".to_string(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// Preference key the theme choice is stored under.
pub const THEME_KEY: &str = "theme";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    fn from_stored(value: &str) -> Self {
        if value == "dark" {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        }
    }
}

/// Small key-value store behind the theme (and any future) preference.
/// Shells pick the implementation at composition time: file-backed on
/// native, bridged to the browser's storage on web, in-memory in tests.
/// Storage trouble is never fatal; it only costs the persisted preference.
pub trait Preferences: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

#[derive(Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl Preferences for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().expect("prefs lock").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .lock()
            .expect("prefs lock")
            .insert(key.to_string(), value.to_string());
    }
}

/// One small JSON file of string pairs.
pub struct FilePrefs {
    path: PathBuf,
}

impl FilePrefs {
    pub fn new(path: PathBuf) -> Self {
        FilePrefs { path }
    }

    fn read_all(&self) -> HashMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("Ignoring unreadable preferences file: {err}");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }
}

impl Preferences for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.read_all();
        values.insert(key.to_string(), value.to_string());
        if let Some(dir) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                warn!("Could not create preferences dir: {err}");
                return;
            }
        }
        let raw = serde_json::to_string(&values).expect("serialize prefs");
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!("Could not persist preferences: {err}");
        }
    }
}

/// Process-wide light/dark flag with a persisted preference. Owned by the
/// context object and passed down; nothing reads it ambiently.
pub struct ThemeStore {
    mode: Mutex<ThemeMode>,
    prefs: Box<dyn Preferences>,
}

impl ThemeStore {
    /// Loads the stored preference; absence writes and returns the light
    /// default, matching first-launch behavior.
    pub fn load(prefs: Box<dyn Preferences>) -> Self {
        let mode = match prefs.get(THEME_KEY) {
            Some(stored) => ThemeMode::from_stored(&stored),
            None => {
                prefs.set(THEME_KEY, ThemeMode::Light.as_str());
                ThemeMode::Light
            }
        };
        ThemeStore {
            mode: Mutex::new(mode),
            prefs,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        *self.mode.lock().expect("theme lock")
    }

    pub fn is_dark(&self) -> bool {
        self.mode() == ThemeMode::Dark
    }

    /// Flips the mode and persists the choice.
    pub fn toggle(&self) -> ThemeMode {
        let mut mode = self.mode.lock().expect("theme lock");
        *mode = match *mode {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        };
        self.prefs.set(THEME_KEY, mode.as_str());
        *mode
    }

    /// Writes the current mode back out; part of context teardown.
    pub fn flush(&self) {
        self.prefs.set(THEME_KEY, self.mode().as_str());
    }
}

//! User preferences
//!
//! Persisted in LocalStorage. Only preferences live here; loaded files are never stored.

use serde::{Deserialize, Serialize};

/// Console log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    pub fn to_level(self) -> log::Level {
        match self {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
        }
    }
}

/// Ranking tool preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shuffle query order on load
    pub shuffle_on_load: bool,
    /// Fixed shuffle seed; a fresh one is drawn per load when unset
    pub seed: Option<u64>,
    /// Show "Rank N:" before each candidate
    pub show_rank_labels: bool,
    pub log_level: LogLevel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shuffle_on_load: true,
            seed: None,
            show_rank_labels: true,
            log_level: LogLevel::Info,
        }
    }
}

impl Settings {
    /// Seed to shuffle with for the next load, or `None` to keep file order.
    ///
    /// `fresh` is only called when no fixed seed is configured.
    pub fn shuffle_seed(&self, fresh: impl FnOnce() -> u64) -> Option<u64> {
        if !self.shuffle_on_load {
            return None;
        }
        Some(self.seed.unwrap_or_else(fresh))
    }

    /// Copy values from the preferences form.
    ///
    /// A blank seed clears it. An unparsable seed or log level keeps the current value.
    pub fn apply_form(
        &mut self,
        shuffle: bool,
        seed: &str,
        show_rank_labels: bool,
        log_level: &str,
    ) {
        self.shuffle_on_load = shuffle;
        self.show_rank_labels = show_rank_labels;

        let seed = seed.trim();
        if seed.is_empty() {
            self.seed = None;
        } else {
            match seed.parse() {
                Ok(seed) => self.seed = Some(seed),
                Err(e) => log::warn!("Ignoring seed {:?}: {}", seed, e),
            }
        }

        match LogLevel::from_str(log_level) {
            Some(level) => self.log_level = level,
            None => log::warn!("Unknown log level {:?}", log_level),
        }
    }

    /// Seed as shown in the preferences form
    pub fn seed_text(&self) -> String {
        self.seed.map(|s| s.to_string()).unwrap_or_default()
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "jsonl_ranker_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

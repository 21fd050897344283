//! Best score across sessions
//!
//! Stored as a plain decimal string so older saves keep loading.

use crate::persistence::Storage;

/// Best score seen so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "medievalInvadersHighScore";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Record a score; returns true if it beat the previous best
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Load from storage; missing or corrupt values read as 0
    pub fn load(storage: &dyn Storage) -> Self {
        let best = storage
            .get(Self::STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        log::info!("Loaded high score {best}");
        Self { best }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        storage.set(Self::STORAGE_KEY, &self.best.to_string());
    }
}

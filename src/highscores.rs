//! Best score persistence
//!
//! A single integer in LocalStorage. Missing or unreadable values count as 0.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub score: i32,
}

impl BestScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "vocab_pop_best_score";

    pub fn new(score: i32) -> Self {
        Self { score }
    }

    /// Parse a stored value; anything unreadable is treated as no record
    pub fn parse(stored: Option<&str>) -> Self {
        stored
            .and_then(|s| s.trim().parse::<i32>().ok())
            .map(Self::new)
            .unwrap_or_default()
    }

    /// Record a finished round's score. Returns true if it beat the record.
    pub fn submit(&mut self, score: i32) -> bool {
        if score > self.score {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Load best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(Self::STORAGE_KEY).ok())
            .flatten();

        let best = Self::parse(stored.as_deref());
        log::info!("Best score: {}", best.score);
        best
    }

    /// Save best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.score.to_string())
                .is_err()
            {
                log::warn!("Failed to save best score");
            } else {
                log::info!("Best score saved ({})", self.score);
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

//! Meta-progression that survives between runs
//!
//! One record: banked currency plus upgrade levels. It is read once at
//! startup and written after every purchase and every successful extraction.
//! Missing or corrupt data falls back to the defaults.

mod store;

pub use store::{JsonFileStore, MemoryStore, SaveStore, StoreError, load_or_default};

use serde::{Deserialize, Serialize};

/// Upgrade levels (all start at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Upgrades {
    pub damage_level: u32,
    pub fire_rate_level: u32,
    pub speed_level: u32,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            damage_level: 1,
            fire_rate_level: 1,
            speed_level: 1,
        }
    }
}

/// The persisted record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveData {
    /// Currency banked from won runs, minus purchases
    pub total_currency: u64,
    pub upgrades: Upgrades,
}

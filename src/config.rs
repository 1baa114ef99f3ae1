//! Tunable parameters for a [`crate::store::FileStore`].
//!
//! Kept deliberately small: the store has no persistence and no quota
//! enforcement, so the only knobs worth exposing are the symlink hop
//! bound used by path resolution and the space figures reported through
//! the `basic`/`memory` file-store attribute views (§6).

use serde::Deserialize;

/// Default bound on symbolic-link hops during path resolution.
pub const DEFAULT_MAX_LINK_HOPS: u32 = 100;

/// Large, fixed placeholder reported as `totalSpace`/`usableSpace` for a
/// store with no real backing capacity.
const DEFAULT_REPORTED_SPACE: u64 = 64 * 1024 * 1024 * 1024;

/// Configuration for a [`crate::store::FileStore`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Maximum number of symbolic-link hops a single path resolution may
    /// follow before failing with "maximum link depth exceeded".
    pub max_link_hops: u32,
    /// Value reported for the `totalSpace` file-store attribute.
    pub total_space: u64,
    /// Value reported for the `usableSpace` file-store attribute.
    pub usable_space: u64,
    /// Value reported for the `unallocatedSpace` file-store attribute.
    pub unallocated_space: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            max_link_hops: DEFAULT_MAX_LINK_HOPS,
            total_space: DEFAULT_REPORTED_SPACE,
            usable_space: DEFAULT_REPORTED_SPACE,
            unallocated_space: DEFAULT_REPORTED_SPACE,
        }
    }
}

impl StoreConfig {
    /// Parses a configuration from TOML text, falling back to defaults
    /// for any field left unspecified.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

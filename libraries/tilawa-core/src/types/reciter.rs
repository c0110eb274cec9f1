//! Reciter identity

use serde::{Deserialize, Serialize};

/// An audio narrator whose recordings the resolver can look up
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reciter {
    /// Resolver-facing identifier (e.g. "Alafasy_128kbps")
    pub id: String,

    /// Display name, used as the track artist
    pub name: String,
}

impl Reciter {
    /// Create a reciter
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Default for Reciter {
    fn default() -> Self {
        Self::new("Alafasy_128kbps", "Mishary Rashid Alafasy")
    }
}

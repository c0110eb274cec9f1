/// Core error types for Tilawa
use thiserror::Error;

/// Result type alias using `TilawaError`
pub type Result<T> = std::result::Result<T, TilawaError>;

/// Core error type for Tilawa
#[derive(Error, Debug)]
pub enum TilawaError {
    /// The external audio engine rejected a command
    #[error("Audio engine error: {0}")]
    Engine(String),

    /// The recitation resolver failed (network, malformed response, ...)
    #[error("Recitation resolver error: {0}")]
    Resolver(String),

    /// Durable storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A verse key that is not of the form `sura:ayah`
    #[error("Invalid verse key: {0:?}")]
    InvalidVerseKey(String),

    /// A verse outside the surah table
    #[error("Invalid verse: surah {sura}, ayah {ayah}")]
    InvalidVerse { sura: u16, ayah: u16 },

    /// A mushaf page outside `1..=604`
    #[error("Invalid page: {0}")]
    InvalidPage(u16),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl TilawaError {
    /// Create an engine error
    pub fn engine(msg: impl Into<String>) -> Self {
        Self::Engine(msg.into())
    }

    /// Create a resolver error
    pub fn resolver(msg: impl Into<String>) -> Self {
        Self::Resolver(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

//! Tilawa CLI Library
//!
//! Command-line front end for the recitation player: configuration, a URL
//! template resolver, and a simulated audio engine.
//!
//! This library exposes the components for testing purposes.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolver;

// Re-export commonly used types for convenience
pub use app::App;
pub use config::CliConfig;
pub use engine::SimulatedEngine;
pub use error::{CliError, Result};
pub use resolver::UrlTemplateResolver;

//! Internationalization module
//!
//! Translation tables for the supported languages (ko, en, ja), override
//! layering and request language resolution.

pub mod loader;

// Re-export commonly used i18n components
pub use loader::{I18n, LanguageStats, TranslationParams, TranslationStats};

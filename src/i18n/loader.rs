//! Translation loader and i18n management
//!
//! Base tables are read from `{translations_dir}/{lang}.json`; optional
//! override tables from `{overrides_dir}/{lang}.json` are merged on top key
//! by key. Lookups fall back to the default language, then to the key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::fs;
use tracing::{debug, error, info, warn};

use crate::config::I18nConfig;
use crate::utils::errors::{FiveMGolfError, Result};

/// Main internationalization manager
#[derive(Debug, Clone)]
pub struct I18n {
    /// Merged translations by language code
    translations: HashMap<String, Map<String, Value>>,
    default_language: String,
    supported_languages: Vec<String>,
    translations_dir: PathBuf,
    overrides_dir: Option<PathBuf>,
}

/// Translation parameters for message formatting
pub type TranslationParams = HashMap<String, String>;

/// Merge `overlay` into `base`; nested objects merge, everything else replaces
fn merge_tables(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge_tables(existing, nested),
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

async fn read_table(path: &Path) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path).await?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        _ => Err(FiveMGolfError::Config(format!(
            "Invalid translation file format: {}",
            path.display()
        ))),
    }
}

impl I18n {
    pub fn new(config: &I18nConfig) -> Self {
        Self {
            translations: HashMap::new(),
            default_language: config.default_language.clone(),
            supported_languages: config.supported_languages.clone(),
            translations_dir: PathBuf::from(&config.translations_dir),
            overrides_dir: config.overrides_dir.as_ref().map(PathBuf::from),
        }
    }

    /// Build and load in one step
    pub async fn load(config: &I18nConfig) -> Result<Self> {
        let mut i18n = Self::new(config);
        i18n.load_translations().await?;
        Ok(i18n)
    }

    /// Load base and override tables for every supported language
    pub async fn load_translations(&mut self) -> Result<()> {
        let supported_languages = self.supported_languages.clone();
        for lang_code in &supported_languages {
            let file_path = self.translations_dir.join(format!("{}.json", lang_code));

            let mut table = match read_table(&file_path).await {
                Ok(table) => table,
                Err(e) if lang_code == &self.default_language => {
                    return Err(FiveMGolfError::Config(format!(
                        "Failed to load default language translations {}: {}",
                        file_path.display(),
                        e
                    )));
                }
                Err(e) => {
                    warn!(lang = %lang_code, error = %e, "Translation table unavailable");
                    continue;
                }
            };

            if let Some(overrides_dir) = &self.overrides_dir {
                let override_path = overrides_dir.join(format!("{}.json", lang_code));
                if override_path.exists() {
                    match read_table(&override_path).await {
                        Ok(overrides) => merge_tables(&mut table, overrides),
                        Err(e) => error!(lang = %lang_code, error = %e, "Ignoring broken override table"),
                    }
                }
            }

            debug!(lang = %lang_code, keys = count_keys(&table), "Translation table loaded");
            self.translations.insert(lang_code.clone(), table);
            info!("Loaded translations for language: {}", lang_code);
        }

        Ok(())
    }

    /// Get a translated message
    pub fn t(&self, key: &str, lang: &str, params: Option<&TranslationParams>) -> String {
        let effective_lang = self.effective_language(lang);

        let text = self
            .lookup(key, effective_lang)
            .or_else(|| self.lookup(key, &self.default_language));

        match text {
            Some(text) => format_message(text, params),
            None => {
                warn!("Translation key '{}' not found in any language", key);
                key.to_string()
            }
        }
    }

    pub fn is_language_supported(&self, lang: &str) -> bool {
        self.supported_languages.iter().any(|l| l == lang)
    }

    fn effective_language<'a>(&'a self, lang: &'a str) -> &'a str {
        if self.translations.contains_key(lang) {
            lang
        } else {
            &self.default_language
        }
    }

    fn lookup(&self, key: &str, lang: &str) -> Option<&str> {
        let mut current = self.translations.get(lang)?.get(key.split('.').next()?)?;
        for part in key.split('.').skip(1) {
            current = current.get(part)?;
        }
        current.as_str()
    }

    /// Merged table for a language, for clients layering their own overrides
    pub fn table(&self, lang: &str) -> Option<Value> {
        self.translations.get(lang).cloned().map(Value::Object)
    }

    pub fn supported_languages(&self) -> &[String] {
        &self.supported_languages
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Pick the request language: explicit query, then `Accept-Language`, then default
    pub fn resolve_language(&self, query: Option<&str>, accept_language: Option<&str>) -> String {
        if let Some(lang) = query.map(|q| q.trim().to_lowercase()) {
            if self.is_language_supported(&lang) {
                return lang;
            }
        }

        if let Some(header) = accept_language {
            let mut candidates: Vec<(f32, String)> = header
                .split(',')
                .filter_map(|entry| {
                    let mut parts = entry.trim().split(';');
                    let tag = parts.next()?.trim();
                    let primary = tag.split('-').next()?.to_lowercase();
                    let quality = parts
                        .find_map(|p| p.trim().strip_prefix("q="))
                        .and_then(|q| q.parse::<f32>().ok())
                        .unwrap_or(1.0);
                    Some((quality, primary))
                })
                .collect();
            // stable sort keeps header order among equal weights
            candidates.sort_by(|a, b| b.0.total_cmp(&a.0));

            if let Some((_, lang)) = candidates
                .into_iter()
                .find(|(q, lang)| *q > 0.0 && self.is_language_supported(lang))
            {
                return lang;
            }
        }

        self.default_language.clone()
    }

    pub fn get_stats(&self) -> TranslationStats {
        let mut languages: Vec<LanguageStats> = self
            .translations
            .iter()
            .map(|(code, table)| LanguageStats {
                code: code.clone(),
                key_count: count_keys(table),
            })
            .collect();
        languages.sort_by(|a, b| a.code.cmp(&b.code));

        TranslationStats {
            total_keys: self
                .translations
                .get(&self.default_language)
                .map_or(0, count_keys),
            languages,
        }
    }
}

/// Substitute `{name}` placeholders
fn format_message(template: &str, params: Option<&TranslationParams>) -> String {
    let mut result = template.to_string();
    if let Some(params) = params {
        for (key, value) in params {
            result = result.replace(&format!("{{{}}}", key), value);
        }
    }
    result
}

fn count_keys(obj: &Map<String, Value>) -> usize {
    obj.values()
        .map(|value| match value {
            Value::Object(nested) => count_keys(nested),
            _ => 1,
        })
        .sum()
}

#[derive(Debug, Clone)]
pub struct TranslationStats {
    pub languages: Vec<LanguageStats>,
    pub total_keys: usize,
}

#[derive(Debug, Clone)]
pub struct LanguageStats {
    pub code: String,
    pub key_count: usize,
}

//! # Localization
//!
//! User-facing messages are Fluent resources under `locales/<lang>/main.ftl`.
//! English and French ship embedded in the binary; a directory can override them.

use anyhow::{Context, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use unic_langid::LanguageIdentifier;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "fr"];

const EMBEDDED_EN: &str = include_str!("../locales/en/main.ftl");
const EMBEDDED_FR: &str = include_str!("../locales/fr/main.ftl");

fn embedded_resource(language: &str) -> &'static str {
    match language {
        "fr" => EMBEDDED_FR,
        _ => EMBEDDED_EN,
    }
}

/// Localization manager holding one bundle per supported language
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a manager from the embedded resources
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();
        for language in SUPPORTED_LANGUAGES {
            let bundle = Self::create_bundle(language, embedded_resource(language).to_string())?;
            bundles.insert(language.to_string(), bundle);
        }
        Ok(Self { bundles })
    }

    /// Create a manager reading `<dir>/<lang>/main.ftl`
    ///
    /// Languages without a file in `dir` use the embedded resource.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut bundles = HashMap::new();
        for language in SUPPORTED_LANGUAGES {
            let path = dir.join(language).join("main.ftl");
            let source = if path.exists() {
                debug!("Loading locale resource {}", path.display());
                fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?
            } else {
                embedded_resource(language).to_string()
            };
            bundles.insert(language.to_string(), Self::create_bundle(language, source)?);
        }
        Ok(Self { bundles })
    }

    fn create_bundle(language: &str, source: String) -> Result<FluentBundle<FluentResource>> {
        let locale: LanguageIdentifier = language
            .parse()
            .with_context(|| format!("Invalid language identifier '{language}'"))?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        bundle.set_use_isolating(false);

        let resource = match FluentResource::try_new(source) {
            Ok(resource) => resource,
            Err((resource, errors)) => {
                warn!("{} syntax errors in '{language}' locale resource", errors.len());
                resource
            }
        };
        if let Err(errors) = bundle.add_resource(resource) {
            warn!("{} conflicting messages in '{language}' locale resource", errors.len());
        }
        Ok(bundle)
    }

    /// Message in the given language, falling back to English
    pub fn get_message_in_language(
        &self,
        key: &str,
        language: &str,
        args: Option<&HashMap<&str, &str>>,
    ) -> String {
        let Some(bundle) = self
            .bundles
            .get(language)
            .or_else(|| self.bundles.get(DEFAULT_LANGUAGE))
        else {
            return format!("Missing translation: {key}");
        };

        let Some(pattern) = bundle.get_message(key).and_then(|msg| msg.value()) else {
            return format!("Missing translation: {key}");
        };

        let fluent_args = args.map(|args| {
            let mut fluent_args = FluentArgs::new();
            for (name, value) in args {
                fluent_args.set(*name, *value);
            }
            fluent_args
        });

        let mut errors = vec![];
        let value = bundle.format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            debug!("Formatting '{key}' produced {} errors", errors.len());
        }
        value.into_owned()
    }

    /// Message in the default language
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        self.get_message_in_language(key, DEFAULT_LANGUAGE, args)
    }
}

/// Supported language for a locale tag such as `fr-CA` or `fr_FR.UTF-8`
pub fn detect_language(locale: Option<&str>) -> &'static str {
    let Some(locale) = locale else {
        return DEFAULT_LANGUAGE;
    };
    let primary = locale
        .split(['-', '_', '.'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|language| **language == primary)
        .copied()
        .unwrap_or(DEFAULT_LANGUAGE)
}

static LOCALIZATION_MANAGER: OnceLock<LocalizationManager> = OnceLock::new();
static ACTIVE_LANGUAGE: OnceLock<&'static str> = OnceLock::new();

/// Initialize the global localization manager and active language
///
/// The language comes from `LANG`. Calling this more than once is harmless.
pub fn init_localization() -> Result<()> {
    if LOCALIZATION_MANAGER.get().is_none() {
        let manager = LocalizationManager::new()?;
        let _ = LOCALIZATION_MANAGER.set(manager);
    }
    let language = detect_language(std::env::var("LANG").ok().as_deref());
    let _ = ACTIVE_LANGUAGE.set(language);
    Ok(())
}

fn active_language() -> &'static str {
    ACTIVE_LANGUAGE.get().copied().unwrap_or(DEFAULT_LANGUAGE)
}

fn format_global(key: &str, args: Option<&HashMap<&str, &str>>) -> String {
    match LOCALIZATION_MANAGER.get() {
        Some(manager) => manager.get_message_in_language(key, active_language(), args),
        None => format!("Missing translation: {key}"),
    }
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    format_global(key, None)
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
    format_global(key, Some(&args_map))
}

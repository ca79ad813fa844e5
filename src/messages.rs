//! Message catalog for every user-facing string the bot sends.
//!
//! Strings live in `locales/en/main.ftl`, embedded at compile time and
//! formatted through a thread-safe Fluent bundle so the catalog can be
//! shared between dispatcher tasks.

use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource};
use unic_langid::LanguageIdentifier;

const EN_RESOURCE: &str = include_str!("../locales/en/main.ftl");

/// Message catalog for the Ring the Bell bot
pub struct Messages {
    bundle: FluentBundle<FluentResource>,
}

impl Messages {
    /// Create the catalog from the embedded English resource
    pub fn new() -> Result<Self> {
        Self::from_source(EN_RESOURCE.to_string())
    }

    /// Create a catalog from raw Fluent source
    pub fn from_source(source: String) -> Result<Self> {
        let locale: LanguageIdentifier = "en".parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Output goes to Telegram verbatim; bidi isolation marks would leak into it.
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source)
            .map_err(|(_, errors)| anyhow!("Failed to parse message catalog: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Failed to load message catalog: {errors:?}"))?;

        Ok(Self { bundle })
    }

    /// Get a message by key
    pub fn get(&self, key: &str) -> String {
        self.format(key, None)
    }

    /// Get a message with simple string arguments
    pub fn get_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut fluent_args = FluentArgs::new();
        for (name, value) in args {
            fluent_args.set(*name, *value);
        }
        self.format(key, Some(&fluent_args))
    }

    fn format(&self, key: &str, args: Option<&FluentArgs>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {key}"),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {key}"),
        };

        let mut errors = vec![];
        let value = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            tracing::warn!(key, errors = ?errors, "Message formatted with errors");
        }
        value.into_owned()
    }
}

impl std::fmt::Debug for Messages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Messages").finish_non_exhaustive()
    }
}

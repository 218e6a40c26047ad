//! Explicit replacements for ambient UI state: who is signed in, which shop the
//! requests are scoped to, and how user-facing strings are resolved.

use std::collections::HashMap;

/// Identity and tenant scope of the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub shop_id: String,
    pub user_id: Option<String>,
    pub access_token: Option<String>,
}

impl SessionContext {
    /// A session for an anonymous customer on a shop's public booking page.
    pub fn public(shop_id: impl Into<String>) -> Self {
        Self {
            shop_id: shop_id.into(),
            user_id: None,
            access_token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Resolves message keys to display strings.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

pub const GENERIC_ERROR_KEY: &str = "errors.generic";

/// A flat key → string table. Unknown keys resolve to the key itself.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// English strings for the booking and calendar screens.
    pub fn english() -> Self {
        Self::new()
            .with(GENERIC_ERROR_KEY, "Something went wrong. Please try again.")
            .with("wizard.step.service", "Choose a service")
            .with("wizard.step.barber", "Choose a barber")
            .with("wizard.step.datetime", "Pick a date and time")
            .with("wizard.step.details", "Your details")
            .with("wizard.step.confirmation", "Booked")
            .with("status.PENDING", "Pending")
            .with("status.CONFIRMED", "Confirmed")
            .with("status.COMPLETED", "Completed")
            .with("status.CANCELLED", "Cancelled")
            .with("status.NO_SHOW", "No-show")
    }
}

impl Translator for Catalog {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

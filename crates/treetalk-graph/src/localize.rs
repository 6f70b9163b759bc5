//! Localization interface.
//!
//! Nodes keep their raw text as the editable source of truth. A
//! [`LocalizedRef`] points into an external string table; when it resolves,
//! the localized value replaces the raw text for display only.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Reference to an entry in an external string table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalizedRef {
    pub table: String,
    pub entry: String,
}

impl LocalizedRef {
    pub fn new(table: impl Into<String>, entry: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            entry: entry.into(),
        }
    }
}

/// Resolves localized references to display strings.
pub trait Localizer {
    /// Look up the display string for `reference`, if the table has one.
    fn resolve(&self, reference: &LocalizedRef) -> Option<String>;
}

/// A localizer that never resolves anything; raw text is always displayed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalization;

impl Localizer for NoLocalization {
    fn resolve(&self, _reference: &LocalizedRef) -> Option<String> {
        None
    }
}

/// In-memory string table keyed by `(table, entry)`.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: HashMap<(String, String), String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a localized value.
    pub fn insert(
        &mut self,
        table: impl Into<String>,
        entry: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.entries
            .insert((table.into(), entry.into()), value.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for StringTable {
    fn resolve(&self, reference: &LocalizedRef) -> Option<String> {
        self.entries
            .get(&(reference.table.clone(), reference.entry.clone()))
            .cloned()
    }
}

/// Pick the text to display: the localized value wins if it resolves,
/// otherwise the raw text.
pub fn display_text<'a>(
    raw: &'a str,
    localized: Option<&LocalizedRef>,
    localizer: &dyn Localizer,
) -> Cow<'a, str> {
    match localized.and_then(|r| localizer.resolve(r)) {
        Some(value) => Cow::Owned(value),
        None => Cow::Borrowed(raw),
    }
}

/// Graph-level character identity shown next to each line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized: Option<LocalizedRef>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            localized: None,
        }
    }

    pub fn with_localized(mut self, reference: LocalizedRef) -> Self {
        self.localized = Some(reference);
        self
    }

    pub fn display_name<'a>(&'a self, localizer: &dyn Localizer) -> Cow<'a, str> {
        display_text(&self.name, self.localized.as_ref(), localizer)
    }
}

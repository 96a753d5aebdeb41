//! Ordered slug → branch version registry.
//!
//! The registry is the single source of truth for which documentation
//! versions exist and where each one builds from. It round-trips through a
//! JSON object whose entry order is significant: the first entry is by
//! definition the latest major version, and the same file feeds the
//! version-switcher UI in the generated site.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ConfigError;

/// One published documentation version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    /// Publish-path segment, e.g. "2.0", "1", "en/1.45".
    pub slug: String,
    /// Source-control branch or tag the slug builds from.
    pub branch: String,
}

/// Ordered collection of [`VersionEntry`] values.
///
/// Immutable after construction; build it once in the CLI and pass it by
/// reference into every component that needs slug ↔ branch mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRegistry {
    entries: Vec<VersionEntry>,
}

impl VersionRegistry {
    /// Build a registry from entries, validating slug uniqueness.
    pub fn from_entries(entries: Vec<VersionEntry>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::Validation(
                "version registry must contain at least one entry".to_owned(),
            ));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.slug.is_empty() {
                return Err(ConfigError::Validation(
                    "version registry slug cannot be empty".to_owned(),
                ));
            }
            if entry.branch.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "version registry entry '{}' has an empty branch",
                    entry.slug
                )));
            }
            if entries[..i].iter().any(|prior| prior.slug == entry.slug) {
                return Err(ConfigError::Validation(format!(
                    "duplicate slug '{}' in version registry",
                    entry.slug
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load the registry from a JSON file, preserving document order.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::NotFound(path.to_path_buf()))?;
        Self::from_json_str(&content)
    }

    /// Parse a registry from a JSON object string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let registry: Self = serde_json::from_str(json)?;
        Self::from_entries(registry.entries)
    }

    /// Serialize the registry as a pretty JSON object in entry order.
    pub fn to_json_string(&self) -> String {
        // Serialization of a slug map cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write the registry to a JSON file (version-switcher UI input).
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut json = self.to_json_string();
        json.push('\n');
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The latest major version (first entry).
    #[must_use]
    pub fn latest(&self) -> &VersionEntry {
        &self.entries[0]
    }

    /// Slug of the latest major version.
    #[must_use]
    pub fn latest_slug(&self) -> &str {
        &self.latest().slug
    }

    /// Branch of the latest major version.
    #[must_use]
    pub fn latest_branch(&self) -> &str {
        &self.latest().branch
    }

    /// Reverse lookup: slug published from `branch`.
    #[must_use]
    pub fn slug_for_branch(&self, branch: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.branch == branch)
            .map(|entry| entry.slug.as_str())
    }

    /// Forward lookup: branch that `slug` builds from.
    #[must_use]
    pub fn branch_for_slug(&self, slug: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.slug == slug)
            .map(|entry| entry.branch.as_str())
    }

    /// Entries in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &VersionEntry> {
        self.entries.iter()
    }

    /// Number of registered versions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no entries (never true after validation).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a VersionRegistry {
    type Item = &'a VersionEntry;
    type IntoIter = std::slice::Iter<'a, VersionEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for VersionRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.slug, &entry.branch)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for VersionRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RegistryVisitor;

        impl<'de> Visitor<'de> for RegistryVisitor {
            type Value = VersionRegistry;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object mapping slug to branch")
            }

            // Map entries are visited in document order, which is exactly
            // the order the registry must preserve.
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((slug, branch)) = access.next_entry::<String, String>()? {
                    entries.push(VersionEntry { slug, branch });
                }
                Ok(VersionRegistry { entries })
            }
        }

        deserializer.deserialize_map(RegistryVisitor)
    }
}

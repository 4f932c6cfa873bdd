//! Dependency specifiers and the shared version-range table.
//!
//! Submodules name their dependencies either as full specifiers
//! (`xgboost>=2.0,<2.2`) or as bare names that are looked up in the table of
//! ranges shared across the framework, so that a package like `numpy` gets
//! the same range wherever it appears.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use crate::config::DependencySettings;
use crate::ui;

/// Name, optional `[extras]`, optional comparator followed by anything.
pub const SPECIFIER_PATTERN: &str =
    r"^[A-Za-z0-9_.\-]+(\[[A-Za-z0-9_.,\s\-]+\])?\s*((>=|<=|==|!=|~=|<|>).*)?$";

fn specifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SPECIFIER_PATTERN).expect("specifier pattern is valid"))
}

/// Check whether a string is an acceptable dependency specifier.
///
/// ```
/// use agbuild::deps::validate;
///
/// assert!(validate("numpy>=1.25.0,<2.1.4"));
/// assert!(validate("transformers[sentencepiece]>=4.38.0,<5"));
/// assert!(!validate("not a valid dep!!"));
/// ```
pub fn validate(spec: &str) -> bool {
    specifier_regex().is_match(spec.trim())
}

/// Keep the valid specifiers, warning about each dropped one.
pub fn filter_valid<I>(entries: I, origin: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    entries
        .into_iter()
        .filter_map(|entry| {
            let trimmed = entry.trim();
            if validate(trimmed) {
                Some(trimmed.to_string())
            } else {
                ui::warn(&format!(
                    "Dropping invalid dependency '{}' declared in {}",
                    entry, origin
                ));
                None
            }
        })
        .collect()
}

/// Version ranges for packages shared across submodules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTable {
    ranges: BTreeMap<String, String>,
}

impl DependencyTable {
    pub fn new(ranges: BTreeMap<String, String>) -> Self {
        Self { ranges }
    }

    /// Build the effective table: configured ranges, then `extra` on top,
    /// then lite-mode exclusions.
    pub fn from_settings(settings: &DependencySettings, lite: bool) -> Self {
        let mut ranges = settings.table.clone();
        ranges.extend(settings.extra.clone());

        if lite {
            for package in &settings.lite_excluded {
                ranges.remove(package);
            }
        }

        Self { ranges }
    }

    pub fn range(&self, package: &str) -> Option<&str> {
        self.ranges.get(package).map(String::as_str)
    }

    pub fn contains(&self, package: &str) -> bool {
        self.ranges.contains_key(package)
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Replace a bare table name with its ranged specifier; anything else is
    /// returned as given.
    pub fn resolve(&self, package: &str) -> String {
        match self.range(package) {
            Some(range) => format!("{}{}", package, range),
            None => package.to_string(),
        }
    }

    pub fn dependency_version_ranges(&self, packages: &[String]) -> Vec<String> {
        packages.iter().map(|p| self.resolve(p)).collect()
    }

    /// Every table entry as a full specifier.
    pub fn specifiers(&self) -> Vec<String> {
        self.ranges
            .iter()
            .map(|(name, range)| format!("{}{}", name, range))
            .collect()
    }
}

/// Specifiers collected from many descriptors, deduplicated by exact text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    entries: BTreeSet<String>,
}

impl DependencySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the specifier was already present.
    pub fn insert(&mut self, spec: impl Into<String>) -> bool {
        self.entries.insert(spec.into())
    }

    pub fn contains(&self, spec: &str) -> bool {
        self.entries.contains(spec)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries.into_iter().collect()
    }
}

impl Extend<String> for DependencySet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<String> for DependencySet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

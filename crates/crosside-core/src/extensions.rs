//! Extension identifier handling

use std::collections::HashSet;

use serde::Serialize;

/// Install and uninstall lists for bringing an installation in line with a
/// desired set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionDiff {
    pub to_install: Vec<String>,
    pub to_delete: Vec<String>,
}

impl ExtensionDiff {
    /// Both lists must already be normalised.
    pub fn compute(installed: &[String], desired: &[String]) -> Self {
        let installed_set: HashSet<&str> = installed.iter().map(String::as_str).collect();
        let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();

        Self {
            to_install: desired
                .iter()
                .filter(|id| !installed_set.contains(id.as_str()))
                .cloned()
                .collect(),
            to_delete: installed
                .iter()
                .filter(|id| !desired_set.contains(id.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty() && self.to_delete.is_empty()
    }
}

/// What the extension host did with a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Applied; `failed` lists identifiers that could not be installed or
    /// removed
    Fulfilled { failed: Vec<String> },
    /// The user declined; nothing was changed
    Declined,
}

/// Case folding, exclusion and protection rules for identifiers.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    exclude: HashSet<String>,
    protected: Vec<String>,
}

impl ExtensionFilter {
    pub fn new<E, P>(exclude: E, protected: P) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            exclude: exclude.into_iter().map(|id| id.as_ref().to_lowercase()).collect(),
            protected: protected.into_iter().map(|id| id.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn is_excluded(&self, id: &str) -> bool {
        self.exclude.contains(&id.to_lowercase())
    }

    /// Lowercase, drop excluded identifiers and duplicates, keep order.
    pub fn normalize<I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut seen = HashSet::new();
        ids.into_iter()
            .map(|id| id.as_ref().trim().to_lowercase())
            .filter(|id| !id.is_empty() && !self.exclude.contains(id))
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }

    pub fn is_protected(&self, id: &str) -> bool {
        let id = id.to_lowercase();
        self.protected.contains(&id)
    }

    /// Changes that bring `installed` in line with the `stored` list.
    ///
    /// Protected identifiers are never uninstalled.
    pub fn plan<I, S>(&self, installed: I, stored: S) -> ExtensionDiff
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let mut diff = ExtensionDiff::compute(&self.normalize(installed), &self.normalize(stored));
        diff.to_delete.retain(|id| !self.is_protected(id));
        diff
    }

    /// List to store for an installation's `installed` set.
    ///
    /// Identifiers already in `stored` keep their stored spelling, and
    /// stored entries that are excluded from syncing stay where they are.
    pub fn storage_list(&self, stored: &[String], installed: &[String]) -> Vec<String> {
        let mut list: Vec<String> = installed
            .iter()
            .map(|id| {
                stored
                    .iter()
                    .find(|s| s.eq_ignore_ascii_case(id))
                    .cloned()
                    .unwrap_or_else(|| id.clone())
            })
            .collect();

        list.extend(stored.iter().filter(|s| self.is_excluded(s)).cloned());
        list
    }
}

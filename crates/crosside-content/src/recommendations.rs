//! Merging of extension recommendation lists
//!
//! An `extensions.json` manifest looks like
//!
//! ```jsonc
//! {
//!   "recommendations": [
//!     // Themes
//!     "dracula-theme.theme-dracula",
//!     // Languages
//!     "rust-lang.rust-analyzer"
//!   ]
//! }
//! ```
//!
//! Users group entries with comments, so the list is edited in place:
//! identifiers no longer wanted are spliced out along with the comments
//! attached to them, new ones are appended, everything else stays put.

use std::collections::HashSet;

use crate::document::{Document, Scalar, Value, root_object_mut};
use crate::{Error, Result};

const RECOMMENDATIONS: &str = "recommendations";

/// Identifiers to drop from and append to a recommendation list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationsDiff {
    /// Present but not desired, in list order
    pub to_remove: Vec<String>,
    /// Desired but not present, in desired order
    pub to_add: Vec<String>,
}

impl RecommendationsDiff {
    /// Exact, case-sensitive set difference between two identifier lists.
    pub fn compute<P, D>(present: &[P], desired: &[D]) -> Self
    where
        P: AsRef<str>,
        D: AsRef<str>,
    {
        let present_set: HashSet<&str> = present.iter().map(AsRef::as_ref).collect();
        let desired_set: HashSet<&str> = desired.iter().map(AsRef::as_ref).collect();

        let mut seen = HashSet::new();
        let to_remove = present
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !desired_set.contains(id) && seen.insert(*id))
            .map(str::to_string)
            .collect();

        let mut seen = HashSet::new();
        let to_add = desired
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| !present_set.contains(id) && seen.insert(*id))
            .map(str::to_string)
            .collect();

        Self { to_remove, to_add }
    }

    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

/// Result of reconciling a document against a desired list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub text: String,
    pub diff: RecommendationsDiff,
}

impl Reconciled {
    pub fn changed(&self) -> bool {
        !self.diff.is_empty()
    }
}

/// Identifiers listed under `recommendations`, in document order.
///
/// Non-string entries are ignored.
pub fn read_recommendations(source: &str) -> Result<Vec<String>> {
    let document = Document::parse(source)?;
    let list = document
        .root()
        .as_object()
        .and_then(|root| root.get(RECOMMENDATIONS))
        .and_then(Value::as_array)
        .ok_or_else(missing_list)?;
    Ok(list.values().filter_map(Value::as_str).collect())
}

/// Rewrite the `recommendations` list of `document` to hold `desired`.
///
/// Returns the serialized document. When the list already matches as a set
/// the document is left untouched and serializes to its original bytes;
/// otherwise the output ends with a line break.
pub fn apply_desired_recommendations<S: AsRef<str>>(
    document: &mut Document,
    desired: &[S],
) -> Result<String> {
    reconcile(document, desired).map(|reconciled| reconciled.text)
}

/// Parse `source` and reconcile its recommendations against `desired`.
pub fn update_recommendations<S: AsRef<str>>(source: &str, desired: &[S]) -> Result<Reconciled> {
    let mut document = Document::parse(source)?;
    let reconciled = reconcile(&mut document, desired)?;
    if !reconciled.changed() {
        return Ok(Reconciled {
            text: source.to_string(),
            diff: reconciled.diff,
        });
    }
    Ok(reconciled)
}

/// A fresh manifest holding `ids`, two-space indented.
pub fn recommendations_document<S: AsRef<str>>(ids: &[S]) -> String {
    let ids: Vec<&str> = ids.iter().map(AsRef::as_ref).collect();
    let manifest = serde_json::json!({ RECOMMENDATIONS: ids });
    // serializing a map of strings cannot fail
    let mut text = serde_json::to_string_pretty(&manifest).unwrap_or_default();
    text.push('\n');
    text
}

fn reconcile<S: AsRef<str>>(document: &mut Document, desired: &[S]) -> Result<Reconciled> {
    let list = root_object_mut(document)?
        .get_mut(RECOMMENDATIONS)
        .and_then(Value::as_array_mut)
        .ok_or_else(missing_list)?;

    let present: Vec<String> = list.values().filter_map(Value::as_str).collect();
    let diff = RecommendationsDiff::compute(&present, desired);

    if diff.is_empty() {
        return Ok(Reconciled {
            text: document.to_string(),
            diff,
        });
    }

    let removed: HashSet<&str> = diff.to_remove.iter().map(String::as_str).collect();
    list.retain(|value| {
        value
            .as_str()
            .is_none_or(|id| !removed.contains(id.as_str()))
    });
    for id in &diff.to_add {
        list.push(Scalar::string(id).into());
    }

    tracing::debug!(
        removed = diff.to_remove.len(),
        added = diff.to_add.len(),
        "reconciled recommendations"
    );

    document.ensure_trailing_newline();
    Ok(Reconciled {
        text: document.to_string(),
        diff,
    })
}

fn missing_list() -> Error {
    Error::structure("expected an object with a \"recommendations\" array")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn diff_is_exact_and_ordered() {
        let diff = RecommendationsDiff::compute(&["a", "B", "c", "a"], &["c", "b", "d", "d"]);
        assert_eq!(diff.to_remove, vec!["a", "B"]);
        assert_eq!(diff.to_add, vec!["b", "d"]);
    }

    #[test]
    fn empty_diff() {
        let diff = RecommendationsDiff::compute(&["a", "b"], &["b", "a"]);
        assert!(diff.is_empty());
    }

    #[test]
    fn fresh_document_is_pretty_and_newline_terminated() {
        assert_eq!(
            recommendations_document(&["a", "b"]),
            "{\n  \"recommendations\": [\n    \"a\",\n    \"b\"\n  ]\n}\n"
        );
    }

    #[test]
    fn fresh_empty_document() {
        assert_eq!(
            recommendations_document::<&str>(&[]),
            "{\n  \"recommendations\": []\n}\n"
        );
    }
}

//! Results of reconciliation passes

use std::fmt;

use serde::Serialize;

use crate::kind::ArtifactKind;

/// What one pass did for one artifact kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// No storage copy existed; it was created from the target side
    Seeded,
    PulledFromStorage,
    PushedToStorage,
    Unchanged,
    /// The user declined the extension changes
    Declined,
    /// Extensions were applied but some items failed
    PartiallyApplied { failed: Vec<String> },
    Skipped { reason: String },
    Failed { error: String },
}

impl Outcome {
    /// Whether the pass left work undone.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::PartiallyApplied { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeded => f.write_str("seeded storage"),
            Self::PulledFromStorage => f.write_str("updated from storage"),
            Self::PushedToStorage => f.write_str("pushed to storage"),
            Self::Unchanged => f.write_str("up to date"),
            Self::Declined => f.write_str("declined"),
            Self::PartiallyApplied { failed } => {
                write!(f, "partially applied, failed: {}", failed.join(", "))
            }
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReport {
    pub kind: ArtifactKind,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl KindReport {
    pub fn new(kind: ArtifactKind, outcome: Outcome) -> Self {
        Self { kind, outcome }
    }
}

impl fmt::Display for KindReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.outcome)
    }
}

/// Reports of a full profile sync, one per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileReport {
    pub kinds: Vec<KindReport>,
}

impl ProfileReport {
    pub fn new(kinds: Vec<KindReport>) -> Self {
        Self { kinds }
    }

    /// False when any kind failed or was only partially applied.
    pub fn success(&self) -> bool {
        !self.kinds.iter().any(|r| r.outcome.is_failure())
    }

    pub fn get(&self, kind: ArtifactKind) -> Option<&KindReport> {
        self.kinds.iter().find(|r| r.kind == kind)
    }
}

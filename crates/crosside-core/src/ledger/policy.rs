//! Pure reconciliation decisions
//!
//! Two tiers exist. The ledger tier compares the storage copy's timestamp
//! with the time recorded at the last reconciliation. The filesystem tier
//! compares the modification times of both files directly and is used when
//! the ledger tier cannot gather its inputs.

use std::fmt;

use serde::Serialize;

use crate::time::Timestamp;

/// Which side holds the authoritative content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    StorageNewer,
    TargetNewer,
    Equal,
}

impl Verdict {
    /// `1` storage newer, `-1` target newer, `0` equal.
    pub fn code(self) -> i8 {
        match self {
            Self::StorageNewer => 1,
            Self::TargetNewer => -1,
            Self::Equal => 0,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::StorageNewer => "storage newer",
            Self::TargetNewer => "target newer",
            Self::Equal => "equal",
        })
    }
}

/// Outcome of the ledger tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: Verdict,
    /// The ledger has no baseline yet and should record one
    pub seed: bool,
}

/// Decide from the storage timestamp and the recorded reconciliation time.
///
/// Without a recorded time storage wins and a baseline is requested.
pub fn decide(storage: Option<Timestamp>, recorded: Option<Timestamp>) -> Decision {
    match (storage, recorded) {
        (_, None) => Decision {
            verdict: Verdict::StorageNewer,
            seed: true,
        },
        (None, Some(_)) => Decision {
            verdict: Verdict::StorageNewer,
            seed: false,
        },
        (Some(storage), Some(recorded)) => Decision {
            verdict: match storage.cmp(&recorded) {
                std::cmp::Ordering::Greater => Verdict::StorageNewer,
                std::cmp::Ordering::Less => Verdict::TargetNewer,
                std::cmp::Ordering::Equal => Verdict::Equal,
            },
            seed: false,
        },
    }
}

/// Compare the two files' modification times directly.
///
/// `None` when either time is unknown.
pub fn compare_filesystem(storage: Option<Timestamp>, target: Option<Timestamp>) -> Option<Verdict> {
    let (storage, target) = (storage?, target?);
    Some(match storage.cmp(&target) {
        std::cmp::Ordering::Greater => Verdict::StorageNewer,
        std::cmp::Ordering::Less => Verdict::TargetNewer,
        std::cmp::Ordering::Equal => Verdict::Equal,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Ledger,
    Filesystem,
}

/// A verdict together with the tier that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    /// `None` when the filesystem tier had nothing to compare
    pub verdict: Option<Verdict>,
    pub tier: Tier,
}

impl Comparison {
    pub fn ledger(verdict: Verdict) -> Self {
        Self {
            verdict: Some(verdict),
            tier: Tier::Ledger,
        }
    }

    pub fn filesystem(verdict: Option<Verdict>) -> Self {
        Self {
            verdict,
            tier: Tier::Filesystem,
        }
    }

    /// Numeric form; an unknown verdict counts as equal.
    pub fn code(&self) -> i8 {
        self.verdict.map_or(0, Verdict::code)
    }
}

//! Comment-preserving JSON documents for crosside-sync
//!
//! Editor configuration files are "JSON with comments": line and block
//! comments, trailing commas and hand-made grouping are all common. This
//! crate parses them into a lossless tree ([`Document`]) that serializes
//! back to the exact input bytes, and supports targeted edits that leave
//! untouched parts of the file alone.
//!
//! [`recommendations`] builds on the tree to merge extension
//! recommendation lists without destroying their comment structure.

pub mod document;
pub mod error;
mod parser;
pub mod recommendations;
pub mod trivia;

pub use document::{Array, Document, Element, Member, Object, Scalar, ScalarKind, Value};
pub use error::{Error, Result};
pub use recommendations::{
    Reconciled, RecommendationsDiff, apply_desired_recommendations, read_recommendations,
    recommendations_document, update_recommendations,
};
pub use trivia::{Trivia, TriviaPiece};

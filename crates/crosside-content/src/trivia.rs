//! Whitespace and comments between tokens

use std::fmt;

/// One run of non-token text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriviaPiece {
    /// Spaces, tabs, newlines (and a byte order mark)
    Whitespace(String),
    /// `// ...` up to, but not including, the line break
    LineComment(String),
    /// `/* ... */` including both delimiters
    BlockComment(String),
}

impl TriviaPiece {
    fn as_str(&self) -> &str {
        match self {
            Self::Whitespace(s) | Self::LineComment(s) | Self::BlockComment(s) => s,
        }
    }

    fn is_comment(&self) -> bool {
        !matches!(self, Self::Whitespace(_))
    }
}

/// The exact text found between two tokens.
///
/// Trivia is kept verbatim so that an unmodified document serializes back
/// to its original bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    pieces: Vec<TriviaPiece>,
}

impl Trivia {
    pub fn new() -> Self {
        Self::default()
    }

    /// `line_break` (`"\n"` or `"\r\n"`) followed by `indent`.
    pub fn newline_indent(line_break: &str, indent: &str) -> Self {
        Self {
            pieces: vec![TriviaPiece::Whitespace(format!("{line_break}{indent}"))],
        }
    }

    /// Plain whitespace without a line break.
    pub fn spaces(text: &str) -> Self {
        if text.is_empty() {
            return Self::new();
        }
        Self {
            pieces: vec![TriviaPiece::Whitespace(text.to_string())],
        }
    }

    pub fn push(&mut self, piece: TriviaPiece) {
        self.pieces.push(piece);
    }

    pub fn extend(&mut self, other: Trivia) {
        self.pieces.extend(other.pieces);
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.iter().all(|p| p.as_str().is_empty())
    }

    pub fn pieces(&self) -> &[TriviaPiece] {
        &self.pieces
    }

    pub fn has_comments(&self) -> bool {
        self.pieces.iter().any(TriviaPiece::is_comment)
    }

    /// Comment texts in order of appearance.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.pieces
            .iter()
            .filter(|p| p.is_comment())
            .map(TriviaPiece::as_str)
    }

    pub fn contains_newline(&self) -> bool {
        self.pieces
            .iter()
            .any(|p| matches!(p, TriviaPiece::Whitespace(w) if w.contains('\n')))
    }

    /// True when the trivia opens with a line break, before any comment.
    pub fn starts_with_line_break(&self) -> bool {
        match self.pieces.first() {
            Some(TriviaPiece::Whitespace(w)) => {
                w.trim_start_matches([' ', '\t']).starts_with(['\n', '\r'])
            }
            _ => false,
        }
    }

    /// Indentation of the line the next token sits on.
    ///
    /// `Some` only when the trivia ends with a line break followed by
    /// horizontal whitespace, i.e. the following token starts its own line.
    pub fn line_indent(&self) -> Option<&str> {
        match self.pieces.last()? {
            TriviaPiece::Whitespace(w) => w.rfind('\n').map(|idx| &w[idx + 1..]),
            _ => None,
        }
    }

    /// Split off the part that stays on the current line.
    ///
    /// Everything before the first line break belongs to the preceding
    /// token (a same-line comment after `"id",`); the line break and what
    /// follows belong to whatever comes next.
    pub fn split_same_line(self) -> (Trivia, Trivia) {
        let mut same = Trivia::new();
        let mut rest = Trivia::new();
        let mut pieces = self.pieces.into_iter();

        for piece in pieces.by_ref() {
            match piece {
                TriviaPiece::Whitespace(w) if w.contains('\n') => {
                    let idx = w.find('\n').unwrap_or(0);
                    // a CRLF break stays whole
                    let idx = if w[..idx].ends_with('\r') { idx - 1 } else { idx };
                    let (before, after) = w.split_at(idx);
                    if !before.is_empty() {
                        same.push(TriviaPiece::Whitespace(before.to_string()));
                    }
                    rest.push(TriviaPiece::Whitespace(after.to_string()));
                    break;
                }
                other => same.push(other),
            }
        }
        rest.pieces.extend(pieces);
        (same, rest)
    }

    /// Drop the indentation after the final line break, keeping the break.
    pub(crate) fn trim_last_indent(&mut self) {
        if let Some(TriviaPiece::Whitespace(w)) = self.pieces.last_mut()
            && let Some(idx) = w.rfind('\n')
        {
            w.truncate(idx + 1);
        }
    }

    /// Drop spaces and tabs at the end, unless a comment ends the trivia.
    pub(crate) fn trim_end_spaces(&mut self) {
        if let Some(TriviaPiece::Whitespace(w)) = self.pieces.last_mut() {
            w.truncate(w.trim_end_matches([' ', '\t']).len());
            if w.is_empty() {
                self.pieces.pop();
            }
        }
    }

    /// Append text to the final whitespace piece, adding one if needed.
    pub(crate) fn push_whitespace(&mut self, text: &str) {
        match self.pieces.last_mut() {
            Some(TriviaPiece::Whitespace(w)) => w.push_str(text),
            _ => self.pieces.push(TriviaPiece::Whitespace(text.to_string())),
        }
    }
}

impl fmt::Display for Trivia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for piece in &self.pieces {
            f.write_str(piece.as_str())?;
        }
        Ok(())
    }
}

//! Lossless JSON-with-comments document tree
//!
//! Every token and every byte of whitespace or comment between tokens is
//! stored, so [`Document::parse`] followed by `to_string()` reproduces the
//! input exactly. Edits touch only the nodes they change.

use std::fmt;

use crate::parser::Parser;
use crate::trivia::Trivia;
use crate::{Error, Result};

/// Indentation unit used for nodes that have no sibling to copy from.
pub(crate) const INDENT: &str = "  ";

/// A parsed document: the root value surrounded by trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub(crate) leading: Trivia,
    pub(crate) root: Value,
    pub(crate) trailing: Trivia,
    pub(crate) line_break: &'static str,
}

impl Document {
    /// Parse JSON-with-comments text.
    ///
    /// Accepts `//` and `/* */` comments and trailing commas in objects and
    /// arrays. Anything else that is not valid JSON is rejected with
    /// [`Error::Syntax`].
    pub fn parse(source: &str) -> Result<Self> {
        Parser::new(source).document()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }

    /// The document as plain JSON, comments dropped.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        self.root.to_value()
    }

    /// Make sure the serialized document ends with a line break.
    pub fn ensure_trailing_newline(&mut self) {
        if !self.trailing.to_string().ends_with('\n') {
            self.trailing.push_whitespace(self.line_break);
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.leading, self.root, self.trailing)
    }
}

/// Any JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Object(Object),
    Array(Array),
    Scalar(Scalar),
}

impl Value {
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Decoded string content, `None` for anything but a string.
    pub fn as_str(&self) -> Option<String> {
        match self {
            Self::Scalar(s) => s.as_string(),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        match self {
            Self::Object(o) => {
                let mut map = serde_json::Map::new();
                for member in &o.members {
                    map.insert(member.key(), member.value.to_value()?);
                }
                Ok(serde_json::Value::Object(map))
            }
            Self::Array(a) => a
                .elements
                .iter()
                .map(|e| e.value.to_value())
                .collect::<Result<Vec<_>>>()
                .map(serde_json::Value::Array),
            Self::Scalar(s) => Ok(serde_json::from_str(&s.raw)?),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(o) => o.fmt(f),
            Self::Array(a) => a.fmt(f),
            Self::Scalar(s) => f.write_str(&s.raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    Bool,
    Null,
}

/// A leaf value kept in its source spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub(crate) kind: ScalarKind,
    pub(crate) raw: String,
}

impl Scalar {
    /// A string literal with standard JSON escaping.
    pub fn string(text: &str) -> Self {
        Self {
            kind: ScalarKind::String,
            raw: serde_json::Value::String(text.to_string()).to_string(),
        }
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The literal exactly as written, quotes and escapes included.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn as_string(&self) -> Option<String> {
        match self.kind {
            ScalarKind::String => serde_json::from_str(&self.raw).ok(),
            _ => None,
        }
    }
}

/// An object member with the trivia around each of its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub(crate) leading: Trivia,
    pub(crate) key: Scalar,
    pub(crate) after_key: Trivia,
    pub(crate) after_colon: Trivia,
    pub(crate) value: Value,
    pub(crate) pre_comma: Trivia,
    pub(crate) comma: bool,
    pub(crate) trailing: Trivia,
}

impl Member {
    pub fn key(&self) -> String {
        self.key.as_string().unwrap_or_default()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Comments on the lines above the member.
    pub fn leading(&self) -> &Trivia {
        &self.leading
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Object {
    pub(crate) members: Vec<Member>,
    pub(crate) tail: Trivia,
}

impl Object {
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|m| m.key() == key)
            .map(|m| &m.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.members
            .iter_mut()
            .find(|m| m.key() == key)
            .map(|m| &mut m.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.members.iter().map(Member::key)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for m in &self.members {
            write!(f, "{}{}{}:{}{}{}", m.leading, m.key.raw, m.after_key, m.after_colon, m.value, m.pre_comma)?;
            if m.comma {
                f.write_str(",")?;
            }
            write!(f, "{}", m.trailing)?;
        }
        write!(f, "{}}}", self.tail)
    }
}

/// An array element.
///
/// `leading` holds the lines above the element (group comments), `trailing`
/// what follows it on the same line, e.g. `"id", // pinned`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) leading: Trivia,
    pub(crate) value: Value,
    pub(crate) pre_comma: Trivia,
    pub(crate) comma: bool,
    pub(crate) trailing: Trivia,
}

impl Element {
    fn new(leading: Trivia, value: Value) -> Self {
        Self {
            leading,
            value,
            pre_comma: Trivia::new(),
            comma: false,
            trailing: Trivia::new(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn leading(&self) -> &Trivia {
        &self.leading
    }

    pub fn trailing(&self) -> &Trivia {
        &self.trailing
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    pub(crate) elements: Vec<Element>,
    /// Trivia between the last element and `]`.
    pub(crate) tail: Trivia,
    /// Nesting level of the array; the root value sits at 0.
    pub(crate) depth: usize,
    pub(crate) trailing_comma: bool,
    /// `"\n"` or `"\r\n"`, whichever the source document uses.
    pub(crate) line_break: &'static str,
}

impl Array {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter().map(|e| &e.value)
    }

    /// Remove the element at `index` together with its comments.
    ///
    /// A comment block above the removed element is a group header: it moves
    /// down to the next element when that one has no comments of its own.
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index >= self.elements.len() {
            return None;
        }
        let removed = self.elements.remove(index);
        let shared_line = index > 0 && !removed.leading.contains_newline();
        if removed.leading.has_comments()
            && let Some(next) = self.elements.get_mut(index)
            && !next.leading.has_comments()
        {
            next.leading = removed.leading;
        }
        if shared_line {
            self.trim_before_line_break(index - 1);
        }
        self.normalize_separators();
        Some(removed.value)
    }

    /// Keep only the elements for which `keep` returns true.
    ///
    /// Group headers of removed elements are handed on as in [`Array::remove`].
    pub fn retain(&mut self, mut keep: impl FnMut(&Value) -> bool) {
        let before = self.elements.len();
        let mut header: Option<Trivia> = None;
        // last kept element that lost a neighbour on its own line
        let mut loose: Option<usize> = None;
        let mut kept: Vec<Element> = Vec::with_capacity(before);

        for mut element in std::mem::take(&mut self.elements) {
            if keep(&element.value) {
                if let Some(leading) = header.take()
                    && !element.leading.has_comments()
                {
                    element.leading = leading;
                }
                if let Some(idx) = loose.take()
                    && element.leading.starts_with_line_break()
                {
                    kept[idx].trailing.trim_end_spaces();
                }
                kept.push(element);
            } else {
                if !element.leading.contains_newline() && !kept.is_empty() {
                    loose = Some(kept.len() - 1);
                }
                if element.leading.has_comments() {
                    header = Some(element.leading);
                }
            }
        }

        self.elements = kept;
        if let Some(idx) = loose {
            self.trim_before_line_break(idx);
        }
        if self.elements.len() != before {
            self.normalize_separators();
        }
    }

    /// Trim the spaces after element `idx` when a line break follows it.
    fn trim_before_line_break(&mut self, idx: usize) {
        let breaks = match self.elements.get(idx + 1) {
            Some(next) => next.leading.starts_with_line_break(),
            None => self.tail.starts_with_line_break(),
        };
        if breaks && let Some(element) = self.elements.get_mut(idx) {
            element.trailing.trim_end_spaces();
        }
    }

    /// Append a value after the last element.
    ///
    /// Multi-line lists get the new element on its own line with the
    /// indentation of its siblings; single-line lists stay on one line. A
    /// comment block left after the last element moves above the new one.
    pub fn push(&mut self, value: Value) {
        let leading = match self.element_indent() {
            Some(indent) => {
                let closing = self
                    .tail
                    .line_indent()
                    .map(str::to_string)
                    .unwrap_or_else(|| INDENT.repeat(self.depth));

                let leading = if self.tail.has_comments() {
                    let mut dangling = std::mem::take(&mut self.tail);
                    if dangling.line_indent().is_some() {
                        dangling.trim_last_indent();
                        dangling.push_whitespace(&indent);
                    } else {
                        // comment sat on the closing line
                        dangling.push_whitespace(&format!("{}{indent}", self.line_break));
                    }
                    dangling
                } else {
                    Trivia::newline_indent(self.line_break, &indent)
                };
                self.tail = Trivia::newline_indent(self.line_break, &closing);
                leading
            }
            None => Trivia::spaces(" "),
        };

        self.elements.push(Element::new(leading, value));
        self.normalize_separators();
    }

    /// Indentation for a new element, `None` for a single-line list.
    fn element_indent(&self) -> Option<String> {
        if let Some(indent) = self
            .elements
            .iter()
            .rev()
            .find_map(|e| e.leading.line_indent())
        {
            return Some(indent.to_string());
        }
        if !self.elements.is_empty() {
            return None;
        }
        let indent = match self.tail.line_indent() {
            Some(closing) => format!("{closing}{INDENT}"),
            None => INDENT.repeat(self.depth + 1),
        };
        Some(indent)
    }

    /// Put a comma after every element but the last; the last keeps one
    /// only if the source list had a trailing comma.
    fn normalize_separators(&mut self) {
        let count = self.elements.len();
        for (idx, element) in self.elements.iter_mut().enumerate() {
            let comma = idx + 1 < count || self.trailing_comma;
            if element.comma && !comma && !element.trailing.has_comments() {
                element.trailing = Trivia::new();
            }
            if !comma {
                element.pre_comma = Trivia::new();
            }
            element.comma = comma;
        }
        if count == 0 && !self.tail.has_comments() {
            self.tail = Trivia::new();
        }
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for e in &self.elements {
            write!(f, "{}{}{}", e.leading, e.value, e.pre_comma)?;
            if e.comma {
                f.write_str(",")?;
            }
            write!(f, "{}", e.trailing)?;
        }
        write!(f, "{}]", self.tail)
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

/// Require the root to be an object, as editor config files are.
pub(crate) fn root_object_mut(document: &mut Document) -> Result<&mut Object> {
    document
        .root
        .as_object_mut()
        .ok_or_else(|| Error::structure("document root is not an object"))
}

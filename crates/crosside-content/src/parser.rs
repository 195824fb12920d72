//! Recursive-descent parser producing the lossless tree

use crate::document::{Array, Document, Element, Member, Object, Scalar, ScalarKind, Value};
use crate::trivia::{Trivia, TriviaPiece};
use crate::{Error, Result};

/// Deepest container nesting accepted, matching serde_json's limit.
const MAX_DEPTH: usize = 128;

pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Line break style of the source, taken from its first line.
    line_break: &'static str,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        let line_break = match src.find('\n') {
            Some(idx) if src[..idx].ends_with('\r') => "\r\n",
            _ => "\n",
        };
        Self {
            src,
            pos: 0,
            line_break,
        }
    }

    pub(crate) fn document(mut self) -> Result<Document> {
        let leading = self.trivia()?;
        if self.at_end() {
            return Err(self.error("document is empty"));
        }
        let root = self.value(0)?;
        let trailing = self.trivia()?;
        if !self.at_end() {
            return Err(self.error("unexpected content after the root value"));
        }
        Ok(Document {
            leading,
            root,
            trailing,
            line_break: self.line_break,
        })
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<()> {
        if self.peek() == Some(wanted) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!("expected '{wanted}'")))
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let consumed = &self.src[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = match consumed.rfind('\n') {
            Some(idx) => consumed[idx + 1..].chars().count() + 1,
            None => consumed.chars().count() + 1,
        };
        Error::Syntax {
            line,
            column,
            message: message.into(),
        }
    }

    fn trivia(&mut self) -> Result<Trivia> {
        let mut trivia = Trivia::new();
        loop {
            let rest = self.rest();
            if rest.starts_with("//") {
                let end = match rest.find('\n') {
                    Some(idx) if rest[..idx].ends_with('\r') => idx - 1,
                    Some(idx) => idx,
                    None => rest.len(),
                };
                trivia.push(TriviaPiece::LineComment(rest[..end].to_string()));
                self.pos += end;
            } else if rest.starts_with("/*") {
                let Some(end) = rest[2..].find("*/") else {
                    return Err(self.error("unterminated block comment"));
                };
                let len = end + 4;
                trivia.push(TriviaPiece::BlockComment(rest[..len].to_string()));
                self.pos += len;
            } else {
                let len = rest
                    .find(|c: char| !is_whitespace(c))
                    .unwrap_or(rest.len());
                if len == 0 {
                    return Ok(trivia);
                }
                trivia.push(TriviaPiece::Whitespace(rest[..len].to_string()));
                self.pos += len;
            }
        }
    }

    fn value(&mut self, depth: usize) -> Result<Value> {
        if depth >= MAX_DEPTH && matches!(self.peek(), Some('{' | '[')) {
            return Err(self.error("nesting too deep"));
        }
        match self.peek() {
            Some('{') => self.object(depth).map(Value::Object),
            Some('[') => self.array(depth).map(Value::Array),
            Some('"') => self.string().map(Value::Scalar),
            Some(c) if c == '-' || c.is_ascii_digit() => self.number().map(Value::Scalar),
            Some(_) => self.literal().map(Value::Scalar),
            None => Err(self.error("unexpected end of document")),
        }
    }

    fn object(&mut self, depth: usize) -> Result<Object> {
        self.expect('{')?;
        let mut members: Vec<Member> = Vec::new();
        let mut carry = Trivia::new();

        loop {
            let mut leading = std::mem::take(&mut carry);
            leading.extend(self.trivia()?);

            if self.peek() == Some('}') {
                self.bump();
                return Ok(Object {
                    members,
                    tail: leading,
                });
            }
            if members.last().is_some_and(|m| !m.comma) {
                return Err(self.error("expected ',' or '}'"));
            }
            if self.peek() != Some('"') {
                return Err(self.error("expected a string key"));
            }

            let key = self.string()?;
            let after_key = self.trivia()?;
            self.expect(':')?;
            let after_colon = self.trivia()?;
            let value = self.value(depth + 1)?;
            let before = self.trivia()?;

            let (pre_comma, comma, after) = match self.peek() {
                Some(',') => {
                    self.bump();
                    (before, true, self.trivia()?)
                }
                Some('}') => (Trivia::new(), false, before),
                _ => return Err(self.error("expected ',' or '}'")),
            };
            let (trailing, rest) = after.split_same_line();
            carry = rest;

            members.push(Member {
                leading,
                key,
                after_key,
                after_colon,
                value,
                pre_comma,
                comma,
                trailing,
            });
        }
    }

    fn array(&mut self, depth: usize) -> Result<Array> {
        self.expect('[')?;
        let mut elements: Vec<Element> = Vec::new();
        let mut carry = Trivia::new();

        loop {
            let mut leading = std::mem::take(&mut carry);
            leading.extend(self.trivia()?);

            if self.peek() == Some(']') {
                self.bump();
                let trailing_comma = elements.last().is_some_and(|e| e.comma);
                return Ok(Array {
                    elements,
                    tail: leading,
                    depth,
                    trailing_comma,
                    line_break: self.line_break,
                });
            }
            if elements.last().is_some_and(|e| !e.comma) {
                return Err(self.error("expected ',' or ']'"));
            }

            let value = self.value(depth + 1)?;
            let before = self.trivia()?;

            let (pre_comma, comma, after) = match self.peek() {
                Some(',') => {
                    self.bump();
                    (before, true, self.trivia()?)
                }
                Some(']') => (Trivia::new(), false, before),
                _ => return Err(self.error("expected ',' or ']'")),
            };
            let (trailing, rest) = after.split_same_line();
            carry = rest;

            elements.push(Element {
                leading,
                value,
                pre_comma,
                comma,
                trailing,
            });
        }
    }

    fn string(&mut self) -> Result<Scalar> {
        let start = self.pos;
        self.expect('"')?;
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    self.bump();
                }
                Some('\n') | None => return Err(self.error("unterminated string")),
                Some(_) => self.bump(),
            }
        }

        let raw = &self.src[start..self.pos];
        if serde_json::from_str::<String>(raw).is_err() {
            return Err(self.error("invalid string literal"));
        }
        Ok(Scalar {
            kind: ScalarKind::String,
            raw: raw.to_string(),
        })
    }

    fn number(&mut self) -> Result<Scalar> {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')))
            .unwrap_or(rest.len());
        let raw = &rest[..len];
        if serde_json::from_str::<serde_json::Number>(raw).is_err() {
            return Err(self.error(format!("invalid number '{raw}'")));
        }
        self.pos += len;
        Ok(Scalar {
            kind: ScalarKind::Number,
            raw: raw.to_string(),
        })
    }

    fn literal(&mut self) -> Result<Scalar> {
        for (word, kind) in [
            ("true", ScalarKind::Bool),
            ("false", ScalarKind::Bool),
            ("null", ScalarKind::Null),
        ] {
            if self.rest().starts_with(word) {
                self.pos += word.len();
                return Ok(Scalar {
                    kind,
                    raw: word.to_string(),
                });
            }
        }
        Err(self.error("unexpected character"))
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{feff}')
}

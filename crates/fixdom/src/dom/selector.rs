//! CSS selector subset used by queries and the `toBe`/`toContain` matchers.
//!
//! Supported: type and universal selectors, `#id`, `.class`, attribute
//! selectors (`[a]`, `[a=v]`, `[a~=v]`, `[a^=v]`, `[a$=v]`, `[a*=v]`), the
//! descendant and child combinators, selector lists, and the pseudo-classes
//! `:checked :selected :disabled :enabled :visible :hidden :focus :empty
//! :first-child :last-child`.

use super::{Document, NodeId};
use crate::result::{FixdomError, FixdomResult};

/// A parsed selector list (`a, b`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    selectors: Vec<ComplexSelector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    /// Compounds left to right
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`
    combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    simple: Vec<Simple>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Simple {
    Id(String),
    Class(String),
    Attr {
        name: String,
        op: AttrOp,
        value: String,
    },
    Pseudo(Pseudo),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Includes,
    Prefix,
    Suffix,
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pseudo {
    Checked,
    Selected,
    Disabled,
    Enabled,
    Visible,
    Hidden,
    Focus,
    Empty,
    FirstChild,
    LastChild,
}

impl SelectorList {
    /// Parse a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`FixdomError::InvalidSelector`] for empty input or syntax
    /// outside the supported subset.
    pub fn parse(source: &str) -> FixdomResult<Self> {
        let mut cursor = Cursor {
            chars: source.chars().collect(),
            pos: 0,
            source,
        };
        let mut selectors = vec![cursor.complex()?];
        loop {
            cursor.skip_ws();
            match cursor.peek() {
                None => break,
                Some(',') => {
                    cursor.pos += 1;
                    selectors.push(cursor.complex()?);
                }
                Some(c) => return Err(cursor.error(&format!("unexpected '{c}'"))),
            }
        }
        Ok(Self { selectors })
    }

    /// Whether `node` matches any selector in the list.
    #[must_use]
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        doc.is_element(node)
            && self.selectors.iter().any(|complex| {
                let last = complex.compounds.len() - 1;
                matches_from(doc, node, complex, last)
            })
    }
}

fn matches_from(doc: &Document, node: NodeId, complex: &ComplexSelector, idx: usize) -> bool {
    if !matches_compound(doc, node, &complex.compounds[idx]) {
        return false;
    }
    if idx == 0 {
        return true;
    }
    match complex.combinators[idx - 1] {
        Combinator::Child => doc
            .parent_element(node)
            .is_some_and(|parent| matches_from(doc, parent, complex, idx - 1)),
        Combinator::Descendant => {
            let mut current = doc.parent_element(node);
            while let Some(ancestor) = current {
                if matches_from(doc, ancestor, complex, idx - 1) {
                    return true;
                }
                current = doc.parent_element(ancestor);
            }
            false
        }
    }
}

fn matches_compound(doc: &Document, node: NodeId, compound: &Compound) -> bool {
    if let Some(tag) = &compound.tag {
        if doc.tag_name(node) != Some(tag.as_str()) {
            return false;
        }
    }
    compound.simple.iter().all(|simple| match simple {
        Simple::Id(id) => doc.attr(node, "id") == Some(id.as_str()),
        Simple::Class(class) => doc.has_class(node, class),
        Simple::Attr { name, op, value } => {
            doc.attr(node, name).is_some_and(|actual| match op {
                AttrOp::Exists => true,
                AttrOp::Equals => actual == value,
                AttrOp::Includes => actual.split_whitespace().any(|w| w == value),
                AttrOp::Prefix => !value.is_empty() && actual.starts_with(value.as_str()),
                AttrOp::Suffix => !value.is_empty() && actual.ends_with(value.as_str()),
                AttrOp::Substring => !value.is_empty() && actual.contains(value.as_str()),
            })
        }
        Simple::Pseudo(pseudo) => match pseudo {
            Pseudo::Checked => doc.is_checked(node),
            Pseudo::Selected => doc.is_selected(node),
            Pseudo::Disabled => doc.is_disabled(node),
            Pseudo::Enabled => !doc.is_disabled(node),
            Pseudo::Visible => doc.is_visible(node),
            Pseudo::Hidden => !doc.is_visible(node),
            Pseudo::Focus => doc.focused() == Some(node),
            Pseudo::Empty => doc.children(node).is_empty(),
            Pseudo::FirstChild => doc
                .parent(node)
                .and_then(|p| doc.element_children(p).first().copied())
                == Some(node),
            Pseudo::LastChild => doc
                .parent(node)
                .and_then(|p| doc.element_children(p).last().copied())
                == Some(node),
        },
    })
}

struct Cursor<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
}

impl Cursor<'_> {
    fn error(&self, message: &str) -> FixdomError {
        FixdomError::InvalidSelector {
            selector: self.source.to_string(),
            message: format!("{message} at offset {}", self.pos),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn complex(&mut self) -> FixdomResult<ComplexSelector> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();
        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some('+' | '~') => return Err(self.error("sibling combinators are not supported")),
                Some(_) if had_ws => Combinator::Descendant,
                Some(c) => return Err(self.error(&format!("unexpected '{c}'"))),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }
        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> FixdomResult<Compound> {
        let mut compound = Compound::default();
        let mut universal = false;
        match self.peek() {
            Some('*') => {
                self.pos += 1;
                universal = true;
            }
            Some(c) if is_ident_char(c) => compound.tag = Some(self.ident()?.to_ascii_lowercase()),
            _ => {}
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.simple.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.simple.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.simple.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.simple.push(Simple::Pseudo(self.pseudo()?));
                }
                _ => break,
            }
        }
        if !universal && compound.tag.is_none() && compound.simple.is_empty() {
            return Err(self.error("expected a selector"));
        }
        Ok(compound)
    }

    fn ident(&mut self) -> FixdomResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected an identifier"));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> FixdomResult<Simple> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(Simple::Attr {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                });
            }
            Some('=') => AttrOp::Equals,
            Some('~') => AttrOp::Includes,
            Some('^') => AttrOp::Prefix,
            Some('$') => AttrOp::Suffix,
            Some('*') => AttrOp::Substring,
            _ => return Err(self.error("expected an attribute operator")),
        };
        self.pos += 1;
        if op != AttrOp::Equals {
            if self.peek() != Some('=') {
                return Err(self.error("expected '='"));
            }
            self.pos += 1;
        }
        self.skip_ws();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated string"));
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                value
            }
            _ => self.ident()?,
        };
        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(self.error("expected ']'"));
        }
        self.pos += 1;
        Ok(Simple::Attr { name, op, value })
    }

    fn pseudo(&mut self) -> FixdomResult<Pseudo> {
        let name = self.ident()?;
        Ok(match name.as_str() {
            "checked" => Pseudo::Checked,
            "selected" => Pseudo::Selected,
            "disabled" => Pseudo::Disabled,
            "enabled" => Pseudo::Enabled,
            "visible" => Pseudo::Visible,
            "hidden" => Pseudo::Hidden,
            "focus" => Pseudo::Focus,
            "empty" => Pseudo::Empty,
            "first-child" => Pseudo::FirstChild,
            "last-child" => Pseudo::LastChild,
            other => return Err(self.error(&format!("unsupported pseudo-class ':{other}'"))),
        })
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

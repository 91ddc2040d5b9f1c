//! Compound selector parsing and matching
//!
//! Supports the selector shapes the engine queries with: type, `*`, `#id`,
//! `.class`, attribute selectors, and the `:state()` pseudo-class for
//! custom element states. Combinators and selector lists are not part of
//! the engine's query surface.

use hview_dom::{DomTree, ElementData, NodeId};

/// Selector parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character '{0}' in selector")]
    UnexpectedChar(char),

    #[error("unclosed attribute selector")]
    UnclosedAttribute,

    #[error("unsupported pseudo-class ':{0}'")]
    UnsupportedPseudo(String),
}

/// A component of a compound selector
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorComponent {
    /// Universal selector *
    Universal,
    /// Type selector (tag name)
    Type(String),
    /// ID selector #id
    Id(String),
    /// Class selector .class
    Class(String),
    /// Attribute selector [attr], [attr=value], etc.
    Attribute(AttributeSelector),
    /// Custom-state pseudo-class :state(name)
    State(String),
}

/// Attribute selector
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    pub name: String,
    pub matcher: Option<AttributeMatcher>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeMatcher {
    /// [attr=value] - exact match
    Exact(String),
    /// [attr~=value] - whitespace-separated list contains
    Contains(String),
    /// [attr^=value] - starts with
    Prefix(String),
    /// [attr$=value] - ends with
    Suffix(String),
    /// [attr*=value] - contains substring
    Substring(String),
}

impl AttributeSelector {
    /// Check if an attribute value matches
    pub fn matches(&self, value: Option<&str>) -> bool {
        match (&self.matcher, value) {
            (None, Some(_)) => true, // [attr] - just check existence
            (_, None) => false,
            (Some(matcher), Some(val)) => match matcher {
                AttributeMatcher::Exact(expected) => val == expected,
                AttributeMatcher::Contains(expected) => {
                    val.split_whitespace().any(|w| w == expected)
                }
                AttributeMatcher::Prefix(expected) => val.starts_with(expected),
                AttributeMatcher::Suffix(expected) => val.ends_with(expected),
                AttributeMatcher::Substring(expected) => val.contains(expected),
            },
        }
    }
}

/// A parsed compound selector
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    components: Vec<SelectorComponent>,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl Selector {
    /// Parse a compound selector string
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }

        let mut components = Vec::new();
        let mut chars = input.chars().peekable();

        while let Some(&c) = chars.peek() {
            match c {
                '*' => {
                    chars.next();
                    components.push(SelectorComponent::Universal);
                }
                '#' => {
                    chars.next();
                    components.push(SelectorComponent::Id(take_ident(&mut chars)?));
                }
                '.' => {
                    chars.next();
                    components.push(SelectorComponent::Class(take_ident(&mut chars)?));
                }
                '[' => {
                    chars.next();
                    components.push(SelectorComponent::Attribute(take_attribute(&mut chars)?));
                }
                ':' => {
                    chars.next();
                    let name = take_ident(&mut chars)?;
                    if name != "state" || chars.peek() != Some(&'(') {
                        return Err(SelectorError::UnsupportedPseudo(name));
                    }
                    chars.next(); // '('
                    let state = take_ident(&mut chars)?;
                    if chars.next() != Some(')') {
                        return Err(SelectorError::UnsupportedPseudo(name));
                    }
                    components.push(SelectorComponent::State(state));
                }
                c if is_ident_char(c) => {
                    components.push(SelectorComponent::Type(
                        take_ident(&mut chars)?.to_ascii_lowercase(),
                    ));
                }
                c => return Err(SelectorError::UnexpectedChar(c)),
            }
        }

        if components.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self { components })
    }

    /// Match this selector against an element
    pub fn matches(&self, elem: &ElementData) -> bool {
        self.components.iter().all(|c| match c {
            SelectorComponent::Universal => true,
            SelectorComponent::Type(tag) => elem.tag_name == *tag,
            SelectorComponent::Id(id) => elem.id.as_deref() == Some(id.as_str()),
            SelectorComponent::Class(class) => elem.classes.iter().any(|c| c == class),
            SelectorComponent::Attribute(attr) => attr.matches(elem.get_attr(&attr.name)),
            SelectorComponent::State(state) => elem.has_state(state),
        })
    }

    /// Match against a node in a tree; non-elements never match
    pub fn matches_node(&self, tree: &DomTree, node: NodeId) -> bool {
        tree.get(node)
            .and_then(|n| n.as_element())
            .is_some_and(|e| self.matches(e))
    }
}

fn take_ident(
    chars: &mut std::iter::Peekable<std::str::Chars>,
) -> Result<String, SelectorError> {
    let mut out = String::new();
    while let Some(&c) = chars.peek() {
        if is_ident_char(c) {
            out.push(c);
            chars.next();
        } else {
            break;
        }
    }
    if out.is_empty() {
        return Err(SelectorError::Empty);
    }
    Ok(out)
}

fn take_attribute(
    chars: &mut std::iter::Peekable<std::str::Chars>,
) -> Result<AttributeSelector, SelectorError> {
    let name = take_ident(chars)?;

    let matcher = match chars.peek().copied() {
        Some(']') => None,
        Some(op) => {
            let op = match op {
                '=' => {
                    chars.next();
                    '='
                }
                '~' | '^' | '$' | '*' => {
                    chars.next();
                    if chars.next() != Some('=') {
                        return Err(SelectorError::UnclosedAttribute);
                    }
                    op
                }
                c => return Err(SelectorError::UnexpectedChar(c)),
            };

            let mut value = String::new();
            let quoted = matches!(chars.peek(), Some(&'"') | Some(&'\''));
            let quote = if quoted { chars.next() } else { None };
            while let Some(&c) = chars.peek() {
                if quoted && Some(c) == quote {
                    chars.next();
                    break;
                }
                if !quoted && c == ']' {
                    break;
                }
                value.push(c);
                chars.next();
            }

            Some(match op {
                '=' => AttributeMatcher::Exact(value),
                '~' => AttributeMatcher::Contains(value),
                '^' => AttributeMatcher::Prefix(value),
                '$' => AttributeMatcher::Suffix(value),
                '*' => AttributeMatcher::Substring(value),
                _ => unreachable!(),
            })
        }
        None => return Err(SelectorError::UnclosedAttribute),
    };

    if chars.next() != Some(']') {
        return Err(SelectorError::UnclosedAttribute);
    }
    Ok(AttributeSelector { name, matcher })
}

/// All elements under `root` (inclusive) matching `selector`, in document
/// order
pub fn query_all(tree: &DomTree, root: NodeId, selector: &Selector) -> Vec<NodeId> {
    tree.subtree(root)
        .into_iter()
        .filter(|&id| selector.matches_node(tree, id))
        .collect()
}

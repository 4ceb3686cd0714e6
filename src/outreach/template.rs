//! Message templates with named `{field}` placeholders.
//!
//! Syntax:
//! - `{name}` is replaced by the lead's `name` field
//! - `{{` and `}}` produce literal braces
//!
//! Templates are parsed once; rendering checks the row's fields against the
//! placeholder set before producing any output.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Rendering failed because the row lacks one or more placeholder fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<String>);

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.0.iter().map(|n| format!("{{{n}}}")).collect();
        write!(f, "no value for placeholder(s) {}", names.join(", "))
    }
}

impl std::error::Error for MissingFields {}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
    placeholders: BTreeSet<String>,
}

impl Template {
    /// Parse template text. Fails on unbalanced braces or empty placeholders.
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut segments = Vec::new();
        let mut placeholders = BTreeSet::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') | None => return Err("Unclosed `{` in template.".to_string()),
                            Some(c) => name.push(c),
                        }
                    }
                    let name = name.trim().to_string();
                    if name.is_empty() {
                        return Err("Empty `{}` placeholder in template.".to_string());
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut literal)));
                    }
                    placeholders.insert(name.clone());
                    segments.push(Segment::Field(name));
                }
                '}' => return Err("Unmatched `}` in template (use `}}` for a literal brace).".to_string()),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Text(literal));
        }

        Ok(Self { segments, placeholders })
    }

    /// Field names referenced by the template.
    pub fn placeholders(&self) -> &BTreeSet<String> {
        &self.placeholders
    }

    /// Render against a field map, failing if any placeholder has no value.
    pub fn render(&self, fields: &BTreeMap<String, String>) -> Result<String, MissingFields> {
        let missing: Vec<String> = self
            .placeholders
            .iter()
            .filter(|p| !fields.contains_key(p.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(MissingFields(missing));
        }

        let mut out = String::new();
        for seg in &self.segments {
            match seg {
                Segment::Text(t) => out.push_str(t),
                Segment::Field(name) => out.push_str(&fields[name]),
            }
        }
        Ok(out)
    }
}

//! XML Attribute storage
//!
//! Attributes of the most recent start tag, in document order, with a hash
//! index for lookup by name. Names are unique: the tokenizer rejects a
//! repeated name before the collection is handed out.

use std::borrow::Cow;
use std::collections::HashMap;

use memchr::memchr2;

use super::entities::decode_text;
use super::error::ErrorKind;

/// A parsed XML attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name (may include namespace prefix)
    pub name: String,
    /// Attribute value (normalized, entities decoded)
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered attribute list of one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Name of the attribute at `index`, in document order
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|a| a.name.as_str())
    }

    /// Entity-decoded value of the attribute at `index`
    pub fn value_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|a| a.value.as_str())
    }

    /// Entity-decoded value of the attribute called `name`
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.index.get(name).and_then(|&i| self.value_at(i))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.entries.iter()
    }

    /// Append an attribute.
    ///
    /// Fails with [`ErrorKind::AttributeDuplicate`] if the name is already
    /// present; the collection is left unchanged in that case.
    pub fn insert(&mut self, attribute: Attribute) -> Result<(), ErrorKind> {
        if self.index.contains_key(&attribute.name) {
            return Err(ErrorKind::AttributeDuplicate);
        }
        self.index.insert(attribute.name.clone(), self.entries.len());
        self.entries.push(attribute);
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Turn a raw (between the quotes) attribute value into its final form.
///
/// Tabs become two spaces and newlines are dropped, then entity references
/// are substituted.
pub fn normalize_value(raw: &str) -> Result<Cow<'_, str>, ErrorKind> {
    if memchr2(b'\t', b'\n', raw.as_bytes()).is_none() {
        return decode_text(raw);
    }

    let mut normalized = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        match c {
            '\t' => normalized.push_str("  "),
            '\n' => {}
            _ => normalized.push(c),
        }
    }

    let decoded = decode_text(&normalized)?.into_owned();
    Ok(Cow::Owned(decoded))
}

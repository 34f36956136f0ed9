//! Attribute-bearing tree nodes

use std::fmt;

use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::formatter::{FormatConfig, Formatter};
use crate::xml::XmlFormatter;

/// Attribute map of a node (keys are opaque, prefixes included)
pub type Attributes = IndexMap<String, String>;

/// Content held by a node
///
/// Exactly one variant is live at a time, so a node can never carry text
/// and children together.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Content {
    /// No content at all (`<name/>`)
    #[default]
    Empty,
    /// Leaf text; `Text(String::new())` is distinct from `Empty`
    Text(String),
    /// Ordered child nodes, owned by this node
    Children(Vec<Node>),
}

impl Content {
    /// Returns true if this is `Empty`
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns true if this is `Text`, including empty text
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns true if this is `Children`, including an empty list
    pub fn is_children(&self) -> bool {
        matches!(self, Self::Children(_))
    }

    /// Returns the text if this is `Text`, None otherwise
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the children if this is `Children`, None otherwise
    pub fn as_children(&self) -> Option<&[Node]> {
        match self {
            Self::Children(children) => Some(children),
            _ => None,
        }
    }

    /// Returns a mutable reference to the children if this is `Children`, None otherwise
    pub fn as_children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Children(children) => Some(children),
            _ => None,
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Vec<Node>> for Content {
    fn from(children: Vec<Node>) -> Self {
        Self::Children(children)
    }
}

/// A named node with attributes and content
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Node {
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "IndexMap::is_empty")
    )]
    pub attributes: Attributes,
    #[cfg_attr(feature = "serde", serde(default))]
    pub content: Content,
}

impl Node {
    /// Creates a node with no attributes and `Empty` content
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            content: Content::Empty,
        }
    }

    /// Creates a leaf node; the text is trimmed as by [`Node::set_text`]
    pub fn with_text(name: impl Into<String>, text: &str) -> Self {
        let mut node = Self::new(name);
        node.set_text(text);
        node
    }

    /// Creates a node owning the given children
    pub fn with_children(name: impl Into<String>, children: impl IntoIterator<Item = Self>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            content: Content::Children(children.into_iter().collect()),
        }
    }

    /// Builder-style attribute setter
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    /// Takes the content out, leaving `Empty` behind
    pub fn take_content(&mut self) -> Content {
        std::mem::take(&mut self.content)
    }

    // Attributes

    /// Returns the attribute value, or an empty string when it is absent
    pub fn get_attribute(&self, key: &str) -> &str {
        self.attributes.get(key).map_or("", String::as_str)
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Sets an attribute, returning the previous value if there was one
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.attributes.insert(key.into(), value.into())
    }

    /// Removes an attribute, keeping the order of the others
    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        self.attributes.shift_remove(key)
    }

    pub fn clear_attributes(&mut self) {
        self.attributes.clear();
    }

    // Children

    /// Returns all direct children with the given name, in order
    pub fn get_children_named(&self, name: &str) -> Vec<&Self> {
        self.get_all_children()
            .iter()
            .filter(|child| child.name == name)
            .collect()
    }

    /// Returns all direct children, or an empty slice for text/empty nodes
    pub fn get_all_children(&self) -> &[Self] {
        self.content.as_children().unwrap_or_default()
    }

    /// Calls `visit` once per direct child, in order
    pub fn walk_children<F>(&self, mut visit: F)
    where
        F: FnMut(&Self),
    {
        for child in self.get_all_children() {
            visit(child);
        }
    }

    pub fn find_first_named(&self, name: &str) -> Option<&Self> {
        self.get_all_children()
            .iter()
            .find(|child| child.name == name)
    }

    /// Returns the index of `child` when it is one of this node's children
    ///
    /// Comparison is by address, not by value, so two equal siblings are
    /// told apart.
    pub fn position_of(&self, child: &Self) -> Option<usize> {
        self.get_all_children()
            .iter()
            .position(|candidate| std::ptr::eq(candidate, child))
    }

    /// Returns true if the content is a non-empty child list
    pub fn has_children(&self) -> bool {
        !self.get_all_children().is_empty()
    }

    /// Appends a child
    ///
    /// `Empty` content (or text holding the empty string) becomes a
    /// one-element child list. Non-empty text is rejected and the node is
    /// left unchanged.
    pub fn add_child(&mut self, child: Self) -> Result<()> {
        match &mut self.content {
            Content::Children(children) => {
                children.push(child);
                return Ok(());
            }
            Content::Text(text) if !text.is_empty() => {
                return Err(Error::unpositioned(ErrorKind::ChildOnTextContent {
                    name: self.name.clone(),
                }));
            }
            Content::Text(_) | Content::Empty => {}
        }
        self.content = Content::Children(vec![child]);
        Ok(())
    }

    /// Removes and returns the child at `index`
    pub fn remove_child(&mut self, index: usize) -> Option<Self> {
        let children = self.content.as_children_mut()?;
        if index < children.len() {
            Some(children.remove(index))
        } else {
            None
        }
    }

    /// Replaces the child at `index`, returning the old one
    pub fn replace_child(&mut self, index: usize, with: Self) -> Option<Self> {
        let slot = self.content.as_children_mut()?.get_mut(index)?;
        Some(std::mem::replace(slot, with))
    }

    /// Removes every direct child with the given name and returns how many went
    pub fn remove_children_named(&mut self, name: &str) -> usize {
        let Some(children) = self.content.as_children_mut() else {
            return 0;
        };
        let before = children.len();
        children.retain(|child| child.name != name);
        before - children.len()
    }

    // Text

    /// Returns true if the content is non-empty text
    pub fn has_text(&self) -> bool {
        !self.get_text().is_empty()
    }

    /// Returns the text, or an empty string for child/empty nodes
    pub fn get_text(&self) -> &str {
        self.content.as_text().unwrap_or_default()
    }

    /// Sets trimmed text; whitespace-only text makes the node `Empty`
    pub fn set_text(&mut self, text: &str) {
        let text = text.trim();
        self.content = if text.is_empty() {
            Content::Empty
        } else {
            Content::Text(text.to_owned())
        };
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = if f.alternate() {
            FormatConfig::pretty()
        } else {
            FormatConfig::compact()
        };
        f.write_str(&XmlFormatter.format(self, &config))
    }
}

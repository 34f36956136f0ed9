//! Subtree filtering
//!
//! A filter is a node tree shaped like the part of the data tree the caller
//! wants back. At every level the filter node's content picks the mode:
//!
//! - text: the data node must carry exactly this text (a content match)
//! - empty: the data node is selected together with everything below it
//! - children: recurse; children carrying text act as criteria that some
//!   data child must satisfy, the others select structure
//!
//! The engine only borrows its inputs and builds a fresh result tree.

pub mod config;

pub use config::{FilterConfig, MixedSelection, DEFAULT_MAX_DEPTH};

use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::node::{Content, Node};

/// Returns true if every attribute of `filter` is present on `data` with the same value
pub fn matches_attributes(data: &Node, filter: &Node) -> bool {
    filter
        .attributes
        .iter()
        .all(|(key, value)| data.attributes.get(key) == Some(value))
}

/// Subtree filter engine
#[derive(Clone, Copy, Debug, Default)]
pub struct Filter {
    config: FilterConfig,
}

impl Filter {
    /// Create an engine with default configuration
    pub const fn new() -> Self {
        Self::with_config(FilterConfig::new())
    }

    /// Create an engine with custom configuration
    pub const fn with_config(config: FilterConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filter `data` by `filter`
    ///
    /// `Ok(None)` means nothing was selected. Errors are only raised when
    /// the recursion limit is hit.
    #[instrument(level = "debug", skip_all, fields(root = %data.name))]
    pub fn apply(&self, data: &Node, filter: &Node) -> Result<Option<Node>> {
        let result = self.filter_node(data, filter, 1)?;
        debug!(selected = result.is_some(), "subtree filter finished");
        Ok(result)
    }

    fn filter_node(&self, data: &Node, filter: &Node, depth: u16) -> Result<Option<Node>> {
        self.config.check_depth(depth)?;

        if data.name != filter.name {
            trace!(node = %data.name, expected = %filter.name, "name does not match");
            return Ok(None);
        }
        if !matches_attributes(data, filter) {
            trace!(node = %data.name, "attributes do not match");
            return Ok(None);
        }

        let mut result = Node {
            name: data.name.clone(),
            attributes: data.attributes.clone(),
            content: Content::Empty,
        };

        if filter.has_text() {
            if data.get_text() != filter.get_text() {
                trace!(node = %data.name, expected = filter.get_text(), "text does not match");
                return Ok(None);
            }
            result.content = Content::Text(data.get_text().to_owned());
            return Ok(Some(result));
        }

        if !filter.has_children() {
            result.content = data.content.clone();
            return Ok(Some(result));
        }

        let filters = filter.get_all_children();
        let criteria: Vec<&Node> = filters.iter().filter(|fc| fc.has_text()).collect();

        if criteria.is_empty() {
            let selectors: Vec<&Node> = filters.iter().collect();
            return self.assemble(data, result, &selectors, depth);
        }

        for criterion in &criteria {
            if !self.any_child_matches(data, criterion, depth)? {
                trace!(
                    node = %data.name,
                    criterion = %criterion.name,
                    "criterion not satisfied"
                );
                return Ok(None);
            }
        }

        if criteria.len() == filters.len() {
            result.content = data.content.clone();
            return Ok(Some(result));
        }

        let selectors: Vec<&Node> = match self.config.mixed {
            MixedSelection::WithCriteria => filters.iter().collect(),
            MixedSelection::SelectorsOnly => filters.iter().filter(|fc| !fc.has_text()).collect(),
        };
        self.assemble(data, result, &selectors, depth)
    }

    fn any_child_matches(&self, data: &Node, criterion: &Node, depth: u16) -> Result<bool> {
        for child in data.get_all_children() {
            if self.filter_node(child, criterion, depth.saturating_add(1))?.is_some() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Filters every data child by every selector, selector order first
    fn assemble(
        &self,
        data: &Node,
        mut result: Node,
        selectors: &[&Node],
        depth: u16,
    ) -> Result<Option<Node>> {
        let mut children = Vec::new();
        for selector in selectors {
            for child in data.get_all_children() {
                if let Some(filtered) = self.filter_node(child, selector, depth.saturating_add(1))? {
                    children.push(filtered);
                }
            }
        }

        if children.is_empty() {
            trace!(node = %data.name, "no children selected");
            return Ok(None);
        }
        result.content = Content::Children(children);
        Ok(Some(result))
    }
}

/// Filter `data` by `filter` with the default configuration
pub fn subtree_filter(data: &Node, filter: &Node) -> Result<Option<Node>> {
    Filter::new().apply(data, filter)
}

/// Filter `data` by `filter` with a custom configuration
pub fn subtree_filter_with_config(
    data: &Node,
    filter: &Node,
    config: FilterConfig,
) -> Result<Option<Node>> {
    Filter::with_config(config).apply(data, filter)
}

impl Node {
    /// Filter this tree by `filter`; see [`subtree_filter`]
    pub fn subtree_filter(&self, filter: &Self) -> Result<Option<Self>> {
        subtree_filter(self, filter)
    }
}

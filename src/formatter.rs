use crate::node::Node;

/// Configuration options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatConfig {
    /// Put every element on its own indented line
    pub pretty: bool,
    /// Number of spaces per indentation level when pretty
    pub indent_spaces: usize,
}

/// Default configuration for formatting (compact)
impl Default for FormatConfig {
    fn default() -> Self {
        Self::compact()
    }
}

impl FormatConfig {
    pub const fn compact() -> Self {
        Self {
            pretty: false,
            indent_spaces: 2,
        }
    }

    pub const fn pretty() -> Self {
        Self {
            pretty: true,
            indent_spaces: 2,
        }
    }

    /// Creates the indentation string for the given nesting level
    pub fn indentation(&self, level: usize) -> String {
        if self.pretty {
            " ".repeat(level.saturating_mul(self.indent_spaces))
        } else {
            String::new()
        }
    }
}

/// Trait for rendering a node tree as a string
///
/// Implementations must keep attributes verbatim and distinguish the three
/// content variants, so that the matching deserializer can rebuild an equal
/// tree.
pub trait Formatter {
    fn format(&self, node: &Node, config: &FormatConfig) -> String;
}

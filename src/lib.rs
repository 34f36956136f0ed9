//! subfilter - attribute-bearing node trees with subtree filtering
//!
//! A [`Node`] has a name, an attribute map and exactly one kind of
//! [`Content`]: text, ordered children, or nothing. [`subtree_filter`]
//! selects part of a data tree using a second tree of the same shape, the
//! way NETCONF subtree filters do.
//!
//! # Quick Start
//!
//! ```
//! use subfilter::{from_xml_str, subtree_filter, to_xml};
//! # fn main() -> Result<(), subfilter::Error> {
//! let data = from_xml_str(
//!     "<users>\
//!        <user><name>root</name><type>superuser</type></user>\
//!        <user><name>fred</name><type>admin</type></user>\
//!      </users>",
//! )?;
//! let filter = from_xml_str("<users><user><name>fred</name><type/></user></users>")?;
//!
//! let selected = subtree_filter(&data, &filter)?.map(|node| to_xml(&node));
//! assert_eq!(
//!     selected.as_deref(),
//!     Some("<users><user><name>fred</name><type>admin</type></user></users>")
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

use tracing::{debug, instrument};

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod node;
pub use node::{Attributes, Content, Node};

pub mod filter;
pub use filter::{
    matches_attributes, subtree_filter, subtree_filter_with_config, Filter, FilterConfig,
    MixedSelection,
};

pub mod formatter;
pub use formatter::{FormatConfig, Formatter};

pub mod xml;
pub use xml::{Config as XmlConfig, Parser as XmlParser, XmlFormatter};

/// Parse an XML document into a node tree
pub fn from_xml_str(s: &str) -> Result<Node> {
    let mut parser = XmlParser::new(s.as_bytes());
    parser.parse()
}

/// Parse an XML document from bytes
pub fn from_xml_bytes(bytes: &[u8]) -> Result<Node> {
    let mut parser = XmlParser::new(bytes);
    parser.parse()
}

/// Parse XML with custom limits
pub fn from_xml_str_with_config(s: &str, config: XmlConfig) -> Result<Node> {
    let mut parser = XmlParser::with_config(s.as_bytes(), config);
    parser.parse()
}

/// Render a node tree as compact XML
pub fn to_xml(node: &Node) -> String {
    XmlFormatter.format(node, &FormatConfig::compact())
}

/// Render a node tree as indented XML
pub fn to_xml_pretty(node: &Node) -> String {
    XmlFormatter.format(node, &FormatConfig::pretty())
}

/// Parse both documents and filter the first by the second
#[instrument(level = "debug", skip_all)]
pub fn filter_xml(data: &str, filter: &str) -> Result<Option<Node>> {
    let data = from_xml_str(data)?;
    let filter = from_xml_str(filter)?;
    debug!(data_root = %data.name, filter_root = %filter.name, "documents parsed");
    subtree_filter(&data, &filter)
}

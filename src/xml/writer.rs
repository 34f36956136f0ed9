//! XML serializer for [`Node`] trees

use crate::formatter::{FormatConfig, Formatter};
use crate::node::{Content, Node};

/// Renders nodes as XML elements
///
/// `Empty` content and an empty child list are both written as `<name/>`,
/// so the latter reads back as `Empty`. Text is trimmed on parse, which
/// means `Text("")` (written `<name></name>`) and text with surrounding
/// whitespace do not survive an XML round-trip either. Use the serde
/// representation when those distinctions matter.
#[derive(Clone, Copy, Debug, Default)]
pub struct XmlFormatter;

impl Formatter for XmlFormatter {
    fn format(&self, node: &Node, config: &FormatConfig) -> String {
        let mut out = String::new();
        write_node(&mut out, node, config, 0);
        out
    }
}

fn write_node(out: &mut String, node: &Node, config: &FormatConfig, level: usize) {
    out.push('<');
    out.push_str(&node.name);
    for (key, value) in &node.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }

    match &node.content {
        Content::Text(text) => {
            out.push('>');
            escape_into(out, text, false);
            write_close(out, &node.name);
        }
        Content::Children(children) if !children.is_empty() => {
            out.push('>');
            for child in children {
                if config.pretty {
                    out.push('\n');
                    out.push_str(&config.indentation(level + 1));
                }
                write_node(out, child, config, level + 1);
            }
            if config.pretty {
                out.push('\n');
                out.push_str(&config.indentation(level));
            }
            write_close(out, &node.name);
        }
        Content::Children(_) | Content::Empty => out.push_str("/>"),
    }
}

fn write_close(out: &mut String, name: &str) {
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn escape_into(out: &mut String, input: &str, attribute: bool) {
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(node: &Node) -> String {
        XmlFormatter.format(node, &FormatConfig::compact())
    }

    #[test]
    fn test_write_empty_and_text() {
        assert_eq!(compact(&Node::new("users")), "<users/>");
        assert_eq!(
            compact(&Node::with_text("name", "fred")),
            "<name>fred</name>"
        );
        assert_eq!(
            compact(&Node::with_children("users", Vec::new())),
            "<users/>"
        );
    }

    #[test]
    fn test_write_attributes_in_order() {
        let node = Node::new("top")
            .attr("xmlns", "http://example.com/schema/1.2/config")
            .attr("id", "a\"b");
        assert_eq!(
            compact(&node),
            "<top xmlns=\"http://example.com/schema/1.2/config\" id=\"a&quot;b\"/>"
        );
    }

    #[test]
    fn test_escape_text() {
        let node = Node::with_text("expr", "a < b && c > d");
        assert_eq!(
            compact(&node),
            "<expr>a &lt; b &amp;&amp; c &gt; d</expr>"
        );
    }

    #[test]
    fn test_pretty_output() {
        let node = Node::with_children(
            "user",
            [
                Node::with_text("name", "fred"),
                Node::with_children("company-info", [Node::with_text("id", "2")]),
            ],
        );
        let pretty = XmlFormatter.format(&node, &FormatConfig::pretty());
        let expected = "<user>\n  <name>fred</name>\n  <company-info>\n    <id>2</id>\n  </company-info>\n</user>";
        assert_eq!(pretty, expected);
    }
}

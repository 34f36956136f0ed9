//! XML adapter: deserializer and serializer for node trees

pub mod cursor;
pub mod parser;
pub mod writer;

pub use parser::{Config, Parser};
pub use writer::XmlFormatter;

//! htmlquery HTML
//!
//! HTML5 parsing built on html5ever, converted into the arena DOM, plus
//! the serializer used to render nodes back to markup.

mod parser;
mod serializer;

pub use hq_dom::{Document, DomTree, Node, NodeId};
pub use parser::{HtmlParser, ParseOptions};
pub use serializer::{HtmlSerializer, get_inner_html, get_outer_html};

use std::io::Read;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string with a base URL
pub fn parse_with_url(html: &str, url: &str) -> Result<Document, ParseError> {
    HtmlParser::new().parse_with_url(html, url)
}

/// Parse UTF-8 HTML from a byte stream
pub fn parse_reader<R: Read>(reader: R) -> Result<Document, ParseError> {
    HtmlParser::new().parse_reader(reader, "about:blank")
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read HTML input: {0}")]
    Io(#[from] std::io::Error),
}

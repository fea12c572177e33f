//! htmlquery
//!
//! XPath queries over HTML parsed into the arena DOM. A [`Navigator`]
//! exposes the tree to the XPath engine; the `find*` functions wrap the
//! compile, select and unwrap cycle, and the projection helpers turn
//! result nodes into text, attribute values or markup.

mod navigator;
mod project;
mod query;

pub use navigator::Navigator;
pub use project::{inner_text, output_html, select_attr};
pub use query::{
    QueryError, create_navigator, find, find_each, find_one, load_doc, query, query_all,
    query_each,
};

pub use hq_dom::{Document, DomTree, NodeId};
pub use hq_html::{ParseError, parse, parse_reader};
pub use hq_xpath::{NodeNavigator, NodeType, Value, XPath, XPathError};
